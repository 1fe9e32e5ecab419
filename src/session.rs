//! SoapySDR Device Session Module
//!
//! This module configures one or two receive channels of a SoapySDR device,
//! owns the pre-allocated sample buffers and the RX stream, and performs a
//! single fixed-length burst capture.

use std::thread;
use std::time::Duration;

use num_complex::Complex;
use soapysdr::{Device, Direction, RxStream};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::IqRecord;

/// Receive antenna port of the Lime RF front end.
const ANTENNA: &str = "LNAL";

/// Amplification stages forced to a neutral gain alongside AGC.
const GAIN_STAGES: [&str; 3] = ["TIA", "LNA", "PGA"];

/// Wait after stream activation so the gain and DC loops stabilize.
const SETTLE_DELAY: Duration = Duration::from_millis(800);

/// Upper bound for the single blocking read, in microseconds.
const READ_TIMEOUT_US: i64 = 5_000_000;

/**
 * Receive Channel Selection
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxChannel {
    /// First receive port (SoapySDR channel 0)
    Rx1,
    /// Second receive port (SoapySDR channel 1)
    Rx2,
}

impl RxChannel {
    /// Parse a user-facing channel number (1 or 2)
    pub fn from_number(number: u8) -> Result<Self> {
        match number {
            1 => Ok(RxChannel::Rx1),
            2 => Ok(RxChannel::Rx2),
            _ => Err(Error::config(format!(
                "channel number has to be 1 or 2, got {}",
                number
            ))),
        }
    }

    /// SoapySDR channel index for driver calls
    pub fn index(self) -> usize {
        match self {
            RxChannel::Rx1 => 0,
            RxChannel::Rx2 => 1,
        }
    }

    /// User-facing channel number
    pub fn number(self) -> u8 {
        match self {
            RxChannel::Rx1 => 1,
            RxChannel::Rx2 => 2,
        }
    }
}

/**
 * Burst Capture Configuration
 */
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureConfig {
    /// Device arguments (e.g., "driver=lime")
    pub device_args: String,
    /// Center frequency in Hz
    pub center_freq: f64,
    /// Capture duration in seconds
    pub duration: f64,
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Baseband filter bandwidth in Hz
    pub bandwidth: f64,
    /// Ordered channel plan: every configure/read/encode step walks this list
    pub channels: Vec<RxChannel>,
}

impl CaptureConfig {
    /// Create a new capture configuration for the default Lime driver
    pub fn new(
        center_freq: f64,
        duration: f64,
        sample_rate: f64,
        bandwidth: f64,
        channels: Vec<RxChannel>,
    ) -> Self {
        Self {
            device_args: "driver=lime".to_string(),
            center_freq,
            duration,
            sample_rate,
            bandwidth,
            channels,
        }
    }

    /// Number of complex samples in one burst: `floor(sample_rate * duration)`
    pub fn sample_count(&self) -> usize {
        (self.sample_rate * self.duration).floor() as usize
    }

    fn validate(&self) -> Result<()> {
        if self.channels.is_empty() || self.channels.len() > 2 {
            return Err(Error::config("channel amount has to be 1 or 2"));
        }
        if self.channels.len() == 2 && self.channels[0] == self.channels[1] {
            return Err(Error::config(format!(
                "channel {} selected twice",
                self.channels[0].number()
            )));
        }
        Ok(())
    }
}

/**
 * Device Session
 *
 * Owns the configured RX stream and one CS16 buffer per selected channel
 * for exactly one capture. `capture` consumes the session, so the stream
 * handle cannot outlive the burst it was opened for.
 */
pub struct DeviceSession {
    sample_count: usize,
    center_freq: f64,
    channels: Vec<RxChannel>,
    stream: RxStream<Complex<i16>>,
    buffers: Vec<Vec<Complex<i16>>>,
}

impl DeviceSession {
    /// Open the device and apply the configuration to every planned channel.
    ///
    /// An invalid channel plan fails before any driver call; nothing is
    /// allocated in that case. Driver failures propagate immediately, there
    /// is no retry.
    pub fn open(config: &CaptureConfig) -> Result<Self> {
        config.validate()?;
        let sample_count = config.sample_count();

        let device = Device::new(config.device_args.as_str())?;

        for channel in &config.channels {
            let index = channel.index();
            device.set_sample_rate(Direction::Rx, index, config.sample_rate)?;
            device.set_gain_mode(Direction::Rx, index, true)?;
            for stage in GAIN_STAGES {
                device.set_gain_element(Direction::Rx, index, stage, 0.0)?;
            }
            device.set_frequency(Direction::Rx, index, config.center_freq, ())?;
            device.set_bandwidth(Direction::Rx, index, config.bandwidth)?;
            device.set_antenna(Direction::Rx, index, ANTENNA)?;
            device.set_dc_offset_mode(Direction::Rx, index, false)?;
            debug!(channel = channel.number(), "RX channel configured");
        }

        let buffers = config
            .channels
            .iter()
            .map(|_| vec![Complex::new(0, 0); sample_count])
            .collect();

        let indices: Vec<usize> = config.channels.iter().map(|c| c.index()).collect();
        let stream = device.rx_stream::<Complex<i16>>(&indices)?;

        info!(
            sample_count,
            channels = config.channels.len(),
            "RX stream open at native CS16"
        );

        Ok(Self {
            sample_count,
            center_freq: config.center_freq,
            channels: config.channels.clone(),
            stream,
            buffers,
        })
    }

    /// Record one burst and encode it into one record per planned channel.
    ///
    /// The stream is activated, left to settle, read exactly once, then
    /// deactivated whether or not the read succeeded. Dropping the consumed
    /// session closes the underlying stream handle on every exit path.
    pub fn capture(mut self) -> Result<Vec<IqRecord>> {
        self.stream.activate(None)?;
        info!("stream active, settling for {:?}", SETTLE_DELAY);
        thread::sleep(SETTLE_DELAY);

        let read_result = {
            let mut targets: Vec<&mut [Complex<i16>]> =
                self.buffers.iter_mut().map(Vec::as_mut_slice).collect();
            self.stream.read(&mut targets, READ_TIMEOUT_US)
        };

        let deactivate_result = self.stream.deactivate(None);

        let read = match read_result {
            Ok(count) => count,
            Err(err) => {
                if let Err(e) = deactivate_result {
                    warn!("stream deactivation failed after read error: {}", e);
                }
                return Err(err.into());
            }
        };
        deactivate_result?;

        if read != self.sample_count {
            return Err(Error::Capture {
                expected: self.sample_count,
                read,
            });
        }
        debug!(samples = read, "burst read complete");

        let records = self
            .channels
            .iter()
            .zip(self.buffers.iter())
            .map(|(channel, buffer)| {
                debug!(channel = channel.number(), "encoding record");
                IqRecord::from_raw(buffer, self.center_freq)
            })
            .collect();

        Ok(records)
    }
}
