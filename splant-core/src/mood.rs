//! Threshold branching on the climate reading, and the fixed lines the
//! plant says about each reading.

use core::fmt;

use log::Level;

use crate::reading::{ClimateReading, Deci};

const CHILLY_BELOW: Deci = Deci::from_whole(20);
const HOT_ABOVE: Deci = Deci::from_whole(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Chilly,
    Pleasant,
    Hot,
}

impl Mood {
    /// Both thresholds (20.0 and 30.0) count as pleasant
    pub fn of(temperature: Deci) -> Self {
        if temperature < CHILLY_BELOW {
            Mood::Chilly
        } else if temperature > HOT_ABOVE {
            Mood::Hot
        } else {
            Mood::Pleasant
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub level: Level,
    pub text: &'static str,
}

impl Line {
    const fn info(text: &'static str) -> Self {
        Self {
            level: Level::Info,
            text,
        }
    }

    const fn warn(text: &'static str) -> Self {
        Self {
            level: Level::Warn,
            text,
        }
    }

    const fn error(text: &'static str) -> Self {
        Self {
            level: Level::Error,
            text,
        }
    }
}

/// What the plant says. `Greeter` is the chatty startup personality,
/// `Announcer` the short one shared by the audio and WiFi builds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Greeter,
    Announcer,
}

impl Script {
    pub fn banner(self) -> &'static [&'static str] {
        match self {
            Script::Greeter => &[
                "Hello! I am your Smart Talking Plant.",
                "Good morning! It's a new day to grow!",
                "Remember to check if I need water today!",
                "Ready to sense and speak! Let's grow together!",
            ],
            Script::Announcer => &["Smart Talking Plant Starting..."],
        }
    }

    /// The announcer stays quiet when nobody is around
    pub fn motion(self, detected: bool) -> Option<Line> {
        match (self, detected) {
            (Script::Greeter, true) => Some(Line::info(
                "Motion Detected! Somebody here? I’m so glad to see you.",
            )),
            (Script::Greeter, false) => Some(Line::info("No Motion. I guess I'm alone again.")),
            (Script::Announcer, true) => Some(Line::info("Motion Detected! Hello there!")),
            (Script::Announcer, false) => None,
        }
    }

    pub fn mood(self, mood: Mood) -> Line {
        match (self, mood) {
            (Script::Greeter, Mood::Chilly) => Line::info("It's quite chilly today. Stay warm!"),
            (Script::Greeter, Mood::Pleasant) => {
                Line::info("Such a pleasant weather. I'm feeling great!")
            }
            (Script::Greeter, Mood::Hot) => {
                Line::info("It's really hot! I hope you're staying hydrated.")
            }
            (Script::Announcer, Mood::Chilly) => Line::info("It's quite cold today."),
            (Script::Announcer, Mood::Pleasant) => Line::info("Such a pleasant day!"),
            (Script::Announcer, Mood::Hot) => Line::info("It's too hot today."),
        }
    }

    pub fn climate_failed(self) -> Line {
        match self {
            Script::Greeter => Line::error("Failed to read DHT22 sensor."),
            Script::Announcer => Line::error("Failed to read from DHT sensor"),
        }
    }

    pub fn gas(self, detected: bool) -> Line {
        match (self, detected) {
            (Script::Greeter, true) => Line::warn("Gas Detected! Be careful!"),
            (Script::Greeter, false) => Line::info("Air is fresh and clean."),
            (Script::Announcer, true) => Line::warn("Gas Detected! Stay safe!"),
            (Script::Announcer, false) => Line::info("Air is clean."),
        }
    }

    pub fn climate(self, reading: ClimateReading) -> ClimateSummary {
        ClimateSummary {
            script: self,
            reading,
        }
    }
}

/// Reading summary line, formatted per script
pub struct ClimateSummary {
    script: Script,
    reading: ClimateReading,
}

impl fmt::Display for ClimateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ClimateReading {
            temperature,
            humidity,
        } = self.reading;
        match self.script {
            Script::Greeter => write!(f, "Temp: {temperature}°C, 💧 Humidity: {humidity}%"),
            Script::Announcer => write!(f, "Temp: {temperature} C, Humidity: {humidity}%"),
        }
    }
}
