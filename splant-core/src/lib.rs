//! Core lib for the smart talking plant builds.
//!
//! Everything here is hardware agnostic: sensor drivers are written
//! against the `embedded-hal` 1.0 traits, and the board specific glue
//! (pin setup, UART, ADC, timers, radio) lives in the `splant-esp32`
//! firmware package in this workspace.
//!
//! A build wires three sensors (PIR motion, DHT22 climate, gas) to one
//! output [`sink::Sink`] through a [`plant::Plant`], which services each
//! sensor on its own period. Which sink and which periods is decided by
//! the selected [`variant::Variant`]:
//!
//! 1. greeting: chatty log lines
//! 2. json: one JSON object per line on the serial console, consumed
//! by the `splant-monitor` host tool
//! 3. speaking: DFPlayer audio clips chosen by threshold
//! 4. wifi: log lines while keeping a WiFi station associated
//! 5. serial: one combined, tagged report per cycle
#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

pub mod dfplayer;
pub mod dht;
pub mod mood;
pub mod plant;
pub mod reading;
pub mod schedule;
pub mod sensor;
pub mod sink;
pub mod station;
pub mod variant;

#[cfg(test)]
pub(crate) mod testutil;

use thiserror::Error;

pub use plant::Plant;
pub use reading::{ClimateReading, Deci, GasReading, Message};
pub use variant::Variant;

/// Log target shared by every sink, mirrors the tag the plant prints on
/// the serial console
pub const TAG: &str = "SMART_PLANT";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    #[error("Sensor did not respond in time")]
    Timeout,
    #[error("Checksum mismatch")]
    Checksum,
    #[error("GPIO error")]
    Pin,
    #[error("ADC read error")]
    Adc,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkError {
    #[error("Write Error")]
    Write,
    #[error("Serialization Error")]
    Encode,
    #[error("Audio link error")]
    Link,
}

impl From<core::fmt::Error> for SinkError {
    fn from(_error: core::fmt::Error) -> SinkError {
        SinkError::Write
    }
}
