#![doc = include_str!("../README.md")]

pub mod error;
pub mod record;
pub mod session;

pub use error::{Error, Result};
pub use record::IqRecord;
pub use session::{CaptureConfig, DeviceSession, RxChannel};
