//! Fixed-duration IQ burst recorder for SoapySDR receivers
//!
//! Tunes one or two RX channels, records a single burst of
//! `samprate * time` complex samples, and writes one normalized complex64
//! file per channel.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing::{error, info};

use limecap::{CaptureConfig, DeviceSession, Error, Result, RxChannel};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fixed-duration IQ burst recorder for SoapySDR receivers", long_about = None)]
struct Args {
    /// Local oscillator frequency in Hz
    #[arg(long)]
    center: Option<f64>,

    /// Measurement time in seconds
    #[arg(long)]
    time: Option<f64>,

    /// Sampling rate in samples per second
    #[arg(long)]
    samprate: Option<f64>,

    /// Baseband filter bandwidth in Hz
    #[arg(long)]
    bw: Option<f64>,

    /// Channels to read data from (1 or 2, one or two values)
    #[arg(long, num_args = 1..=2, value_name = "CH")]
    channel: Vec<u8>,

    /// Path to the saved file, one per selected channel
    #[arg(long, num_args = 1..=2, value_name = "PATH")]
    filename: Vec<PathBuf>,

    /// SoapySDR device arguments
    #[arg(long = "args", default_value = "driver=lime", value_name = "ARGS")]
    device_args: String,

    /// List available SoapySDR devices and exit
    #[arg(long, default_value_t = false)]
    list_devices: bool,

    /// Verbosity level (-v=debug, -vv=trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .try_init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    if args.list_devices {
        return list_devices(&args.device_args);
    }

    let (Some(time), Some(samprate), Some(bw)) = (args.time, args.samprate, args.bw) else {
        return Err(Error::config("no parameters were given"));
    };
    if args.channel.is_empty() || args.filename.is_empty() {
        return Err(Error::config("no parameters were given"));
    }
    if args.channel.len() != args.filename.len() {
        return Err(Error::config("channels amount not equal to amount of files"));
    }

    let channels = args
        .channel
        .iter()
        .map(|&n| RxChannel::from_number(n))
        .collect::<Result<Vec<_>>>()?;

    let center = args.center.unwrap_or_default();
    info!("central frequency set to {} Hz", center);
    info!("measurement time set to {} sec", time);
    info!("sampling rate set to {} samples/sec", samprate);
    info!("bandwidth set to {} Hz", bw);
    info!("reading from channels {:?}", args.channel);

    let mut config = CaptureConfig::new(center, time, samprate, bw, channels);
    config.device_args = args.device_args.clone();

    let session = DeviceSession::open(&config)?;
    let records = session.capture()?;

    for (record, path) in records.iter().zip(&args.filename) {
        record.write_to(path)?;
        info!("file saved as {}", path.display());
    }

    Ok(())
}

fn list_devices(device_args: &str) -> Result<()> {
    let devices = soapysdr::enumerate(device_args)?;
    if devices.is_empty() {
        info!("no SoapySDR devices found");
        return Ok(());
    }
    for (index, device) in devices.iter().enumerate() {
        println!("[{}] {}", index, device);
    }
    Ok(())
}
