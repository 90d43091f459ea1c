//! Reading types produced by the plant's sensors, and the JSON
//! line schema they are reported with.

use alloc::string::String;
use core::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Fixed point value in tenths, the native resolution of the DHT22
/// for both temperature (°C) and relative humidity (%)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deci(i16);

impl Deci {
    pub const fn from_tenths(tenths: i16) -> Self {
        Self(tenths)
    }

    pub const fn from_whole(whole: i16) -> Self {
        Self(whole * 10)
    }

    pub const fn tenths(self) -> i16 {
        self.0
    }

    pub fn as_f32(self) -> f32 {
        self.0 as f32 / 10.0
    }
}

impl fmt::Display for Deci {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{}", abs / 10, abs % 10)
    }
}

impl Serialize for Deci {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f32(self.as_f32())
    }
}

impl<'de> Deserialize<'de> for Deci {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f32::deserialize(deserializer)?;
        if !value.is_finite() {
            return Err(de::Error::custom("reading is not a finite number"));
        }
        // no f32::round in core, round half away from zero by hand
        let scaled = value * 10.0;
        let scaled = if scaled >= 0.0 {
            scaled + 0.5
        } else {
            scaled - 0.5
        };
        let tenths = scaled as i32;
        i16::try_from(tenths)
            .map(Deci)
            .map_err(|_| de::Error::custom("reading out of range"))
    }
}

/// Temperature (°C) and relative humidity (%) pair from the DHT22
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClimateReading {
    pub temperature: Deci,
    pub humidity: Deci,
}

/// Gas sensor output: either the module's digital comparator pin, or
/// the raw analog sample when the analog output is wired to an ADC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasReading {
    Detected(bool),
    Level(u16),
}

impl GasReading {
    /// Raw levels carry no threshold, so they never count as detected
    pub fn is_detected(&self) -> bool {
        matches!(self, GasReading::Detected(true))
    }
}

/// One line of the JSON serial protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    Motion { motion: bool },
    Climate { temperature: Deci, humidity: Deci },
    Gas { gas: bool },
}

impl Message {
    pub fn motion(detected: bool) -> Self {
        Message::Motion { motion: detected }
    }

    pub fn gas(detected: bool) -> Self {
        Message::Gas { gas: detected }
    }

    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim())
    }

    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<ClimateReading> for Message {
    fn from(reading: ClimateReading) -> Self {
        Message::Climate {
            temperature: reading.temperature,
            humidity: reading.humidity,
        }
    }
}
