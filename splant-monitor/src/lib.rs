//! Host side companion to the `json` plant build: reads the line stream
//! off the serial console (or stdin), keeps the well formed readings and
//! reports them with a host timestamp

pub mod monitor;

use thiserror::Error;

pub use monitor::{LineOutcome, Monitor, Snapshot, Stats};

pub type MonitorResult<T> = std::result::Result<T, MonitorError>;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("I/O Error")]
    Io(#[from] std::io::Error),
    #[error("Serial port error")]
    Serial(#[from] tokio_serial::Error),
}
