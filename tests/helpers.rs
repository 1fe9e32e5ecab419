//! Test helper utilities for generating synthetic CS16 bursts

use num_complex::Complex;
use std::f32::consts::PI;

/// 12-bit ADC full scale used by the capture pipeline.
pub const FULL_SCALE: f32 = 2048.0;

/// Generate a complex sine wave at a specific frequency
///
/// # Arguments
/// * `frequency` - Frequency in Hz
/// * `sample_rate` - Sample rate in Hz
/// * `num_samples` - Number of samples to generate
///
/// # Returns
/// Vector of raw CS16 samples scaled to the 12-bit ADC range
pub fn generate_sine_burst(
    frequency: f32,
    sample_rate: u32,
    num_samples: usize,
) -> Vec<Complex<i16>> {
    let mut burst = Vec::with_capacity(num_samples);
    let angular_freq = 2.0 * PI * frequency / sample_rate as f32;

    for n in 0..num_samples {
        let phase = angular_freq * n as f32;
        let i = (phase.cos() * (FULL_SCALE - 1.0)) as i16;
        let q = (phase.sin() * (FULL_SCALE - 1.0)) as i16;
        burst.push(Complex::new(i, q));
    }

    burst
}

/// Generate a DC burst (constant raw I and Q values)
pub fn generate_dc_burst(num_samples: usize, i_value: i16, q_value: i16) -> Vec<Complex<i16>> {
    vec![Complex::new(i_value, q_value); num_samples]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_sine_burst_length() {
        let burst = generate_sine_burst(1000.0, 96000, 100);
        assert_eq!(burst.len(), 100);
    }

    #[test]
    fn test_generate_sine_burst_dc() {
        // A 0 Hz sine is constant: I at full scale, Q at zero
        let burst = generate_sine_burst(0.0, 96000, 10);
        for sample in burst {
            assert_eq!(sample.re, 2047);
            assert_eq!(sample.im, 0);
        }
    }

    #[test]
    fn test_generate_dc_burst() {
        let burst = generate_dc_burst(50, -1024, 512);
        assert_eq!(burst.len(), 50);
        for sample in burst {
            assert_eq!(sample, Complex::new(-1024, 512));
        }
    }
}
