//! IQ Record Encoding Module
//!
//! This module converts a raw CS16 burst into normalized complex64 samples
//! with a single metadata element in front, and serializes the result as a
//! raw little-endian binary file (4-byte float real, 4-byte float imaginary
//! per element).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use num_complex::Complex;

use crate::error::Result;

/// ADC resolution of the receiver, in bits per I or Q component.
pub const ADC_BITS: u32 = 12;

/// Full-scale divisor normalizing raw ADC values into [-1, 1].
const FULL_SCALE: f32 = (1 << (ADC_BITS - 1)) as f32;

/**
 * Normalized IQ Record
 *
 * One channel's capture result: element 0 encodes `(sample_count,
 * center_freq)` as `(re, im)`, elements `1..=sample_count` are the
 * normalized samples.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct IqRecord {
    elements: Vec<Complex<f32>>,
}

impl IqRecord {
    /// Build a record from a raw CS16 burst.
    ///
    /// Every I and Q component is divided by `2^(ADC_BITS - 1)`, and the
    /// metadata element is prepended.
    pub fn from_raw(raw: &[Complex<i16>], center_freq: f64) -> Self {
        let mut elements = Vec::with_capacity(raw.len() + 1);
        elements.push(Complex::new(raw.len() as f32, center_freq as f32));
        elements.extend(raw.iter().map(|c| {
            Complex::new(c.re as f32 / FULL_SCALE, c.im as f32 / FULL_SCALE)
        }));
        Self { elements }
    }

    /// Metadata element: `(sample_count, center_freq)`
    pub fn metadata(&self) -> Complex<f32> {
        self.elements[0]
    }

    /// Normalized samples, metadata excluded
    pub fn samples(&self) -> &[Complex<f32>] {
        &self.elements[1..]
    }

    /// Number of samples in the burst, metadata excluded
    pub fn sample_count(&self) -> usize {
        self.elements.len() - 1
    }

    /// Write the record to `path` as raw little-endian complex64 values.
    ///
    /// A leading `~` in the path expands to the home directory.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = expanduser(path.as_ref().to_path_buf());
        let mut writer = BufWriter::new(File::create(path)?);
        for element in &self.elements {
            writer.write_all(&element.re.to_le_bytes())?;
            writer.write_all(&element.im.to_le_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn expanduser(path: PathBuf) -> PathBuf {
    // Check if the path starts with "~"
    if let Some(stripped) = path.to_str().and_then(|p| p.strip_prefix('~')) {
        if let Some(home_dir) = dirs::home_dir() {
            // Join the home directory with the rest of the path
            return home_dir.join(stripped.trim_start_matches('/'));
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_scale_is_12_bit() {
        assert_eq!(FULL_SCALE, 2048.0);
    }

    #[test]
    fn test_normalization() {
        let raw = vec![Complex::new(1024i16, -2048i16), Complex::new(2047, 0)];
        let record = IqRecord::from_raw(&raw, 100.0);

        let samples = record.samples();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], Complex::new(0.5, -1.0));
        assert_eq!(samples[1], Complex::new(2047.0 / 2048.0, 0.0));
    }

    #[test]
    fn test_metadata_element() {
        let raw = vec![Complex::new(0i16, 0i16); 5];
        let record = IqRecord::from_raw(&raw, 433_900_000.0);

        assert_eq!(record.metadata().re, 5.0);
        assert_eq!(record.metadata().im, 433_900_000.0f64 as f32);
        assert_eq!(record.sample_count(), 5);
    }

    #[test]
    fn test_empty_burst() {
        let record = IqRecord::from_raw(&[], 1000.0);
        assert_eq!(record.metadata(), Complex::new(0.0, 1000.0));
        assert!(record.samples().is_empty());
    }
}
