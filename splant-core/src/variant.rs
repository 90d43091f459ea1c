use crate::mood::Script;
use crate::schedule::{Periods, Schedule};

/// Build flavours of the plant. They all poll the same three sensors
/// and only differ in output and pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Chatty log lines
    Greeting,
    /// JSON lines for the host monitor
    Json,
    /// DFPlayer clips
    Speaking,
    /// Log lines, WiFi station kept associated
    Wifi,
    /// Combined tagged report, raw analog gas level
    Serial,
}

impl Variant {
    pub fn periods(self) -> Periods {
        match self {
            Variant::Greeting | Variant::Json => Periods {
                motion: 2000,
                climate: 3000,
                gas: 2000,
            },
            Variant::Speaking | Variant::Wifi => Periods {
                motion: 3000,
                climate: 5000,
                gas: 4000,
            },
            Variant::Serial => Periods::uniform(1000),
        }
    }

    pub fn is_combined(self) -> bool {
        matches!(self, Variant::Serial)
    }

    pub fn schedule(self) -> Schedule {
        if self.is_combined() {
            Schedule::combined(self.periods().motion)
        } else {
            Schedule::new(self.periods())
        }
    }

    /// Script for the variants that speak through the logger
    pub fn script(self) -> Option<Script> {
        match self {
            Variant::Greeting => Some(Script::Greeter),
            Variant::Speaking | Variant::Wifi => Some(Script::Announcer),
            Variant::Json | Variant::Serial => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Greeting => "greeting",
            Variant::Json => "json",
            Variant::Speaking => "speaking",
            Variant::Wifi => "wifi",
            Variant::Serial => "serial",
        }
    }

    /// The JSON stream has to stay machine readable, keep chatter off it
    pub fn log_level(self) -> log::LevelFilter {
        match self {
            Variant::Json => log::LevelFilter::Warn,
            _ => log::LevelFilter::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pacing_per_variant() {
        assert_eq!(Variant::Json.periods(), Variant::Greeting.periods());
        assert_eq!(Variant::Wifi.periods().climate, 5000);
        assert_eq!(Variant::Speaking.periods().gas, 4000);
        assert!(Variant::Serial.schedule().is_combined());
        assert!(!Variant::Wifi.schedule().is_combined());
    }

    #[test]
    fn scripts_and_levels() {
        assert_eq!(Variant::Greeting.script(), Some(Script::Greeter));
        assert_eq!(Variant::Wifi.script(), Some(Script::Announcer));
        assert_eq!(Variant::Json.script(), None);
        assert_eq!(Variant::Json.log_level(), log::LevelFilter::Warn);
        assert_eq!(Variant::Serial.name(), "serial");
    }
}
