//! Output sinks: where each reading ends up once it has been taken.

use core::fmt::Write;

use crate::dfplayer::{AudioLink, DfPlayer, Track};
use crate::mood::{Line, Mood, Script};
use crate::reading::{ClimateReading, GasReading, Message};
use crate::{SensorError, SinkError, TAG};

pub trait Sink {
    /// Printed once at startup
    fn banner(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    fn motion(&mut self, detected: bool) -> Result<(), SinkError>;

    fn climate(&mut self, reading: Result<ClimateReading, SensorError>) -> Result<(), SinkError>;

    fn gas(&mut self, reading: GasReading) -> Result<(), SinkError>;

    /// Called after all three sensors ran, for sinks reporting in cycles
    fn cycle_end(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Human readable log lines through the `log` facade
pub struct LogSink {
    script: Script,
}

impl LogSink {
    pub fn new(script: Script) -> Self {
        Self { script }
    }

    fn say(&self, line: Line) {
        log::log!(target: TAG, line.level, "{}", line.text);
    }
}

impl Sink for LogSink {
    fn banner(&mut self) -> Result<(), SinkError> {
        for line in self.script.banner() {
            log::info!(target: TAG, "{line}");
        }
        Ok(())
    }

    fn motion(&mut self, detected: bool) -> Result<(), SinkError> {
        if let Some(line) = self.script.motion(detected) {
            self.say(line);
        }
        Ok(())
    }

    fn climate(&mut self, reading: Result<ClimateReading, SensorError>) -> Result<(), SinkError> {
        match reading {
            Ok(reading) => {
                log::info!(target: TAG, "{}", self.script.climate(reading));
                self.say(self.script.mood(Mood::of(reading.temperature)));
            }
            Err(e) => {
                log::debug!(target: TAG, "DHT read error {e:?}");
                self.say(self.script.climate_failed());
            }
        }
        Ok(())
    }

    fn gas(&mut self, reading: GasReading) -> Result<(), SinkError> {
        match reading {
            GasReading::Detected(detected) => self.say(self.script.gas(detected)),
            GasReading::Level(level) => log::info!(target: TAG, "Gas level: {level}"),
        }
        Ok(())
    }
}

/// One JSON object per line, see [`Message`]
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, message: Message) -> Result<(), SinkError> {
        let line = message.to_line().map_err(|e| {
            log::error!("Serde failed {e:}");
            SinkError::Encode
        })?;
        self.out.write_str(&line)?;
        self.out.write_char('\n')?;
        Ok(())
    }
}

impl<W: Write> Sink for JsonSink<W> {
    fn motion(&mut self, detected: bool) -> Result<(), SinkError> {
        self.emit(Message::motion(detected))
    }

    /// Failed reads are dropped, the stream only carries valid readings
    fn climate(&mut self, reading: Result<ClimateReading, SensorError>) -> Result<(), SinkError> {
        match reading {
            Ok(reading) => self.emit(Message::from(reading)),
            Err(_) => Ok(()),
        }
    }

    fn gas(&mut self, reading: GasReading) -> Result<(), SinkError> {
        match reading {
            GasReading::Detected(detected) => self.emit(Message::gas(detected)),
            GasReading::Level(_) => Ok(()),
        }
    }
}

/// Plays a clip on the DFPlayer for every noteworthy reading, logging
/// with the announcer script alongside
pub struct AudioSink<L: AudioLink> {
    player: DfPlayer<L>,
    log: LogSink,
}

impl<L: AudioLink> AudioSink<L> {
    pub fn new(player: DfPlayer<L>) -> Self {
        Self {
            player,
            log: LogSink::new(Script::Announcer),
        }
    }

    pub fn player(&self) -> &DfPlayer<L> {
        &self.player
    }

    pub fn release(self) -> DfPlayer<L> {
        self.player
    }
}

impl<L: AudioLink> Sink for AudioSink<L> {
    fn banner(&mut self) -> Result<(), SinkError> {
        self.log.banner()
    }

    fn motion(&mut self, detected: bool) -> Result<(), SinkError> {
        self.log.motion(detected)?;
        if detected {
            self.player.play(Track::Visitor)?;
        }
        Ok(())
    }

    fn climate(&mut self, reading: Result<ClimateReading, SensorError>) -> Result<(), SinkError> {
        self.log.climate(reading)?;
        if let Ok(reading) = reading {
            self.player
                .play(Track::for_mood(Mood::of(reading.temperature)))?;
        }
        Ok(())
    }

    fn gas(&mut self, reading: GasReading) -> Result<(), SinkError> {
        self.log.gas(reading)?;
        if reading.is_detected() {
            self.player.play(Track::Gas)?;
        }
        Ok(())
    }
}

/// Tagged plain text report, all three sensors per cycle followed by a
/// separator line
pub struct SerialSink<W: Write> {
    out: W,
}

impl<W: Write> SerialSink<W> {
    const SEPARATOR: &'static str = "-----------------------------------";

    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for SerialSink<W> {
    fn banner(&mut self) -> Result<(), SinkError> {
        for tag in ["PIR_SENSOR", "DHT_SENSOR", "GAS_SENSOR"] {
            writeln!(self.out, "[{tag}] Setup complete")?;
        }
        Ok(())
    }

    fn motion(&mut self, detected: bool) -> Result<(), SinkError> {
        if detected {
            writeln!(self.out, "[PIR_SENSOR] Motion Detected: Who could it be?")?;
        } else {
            writeln!(self.out, "[PIR_SENSOR] No Motion")?;
        }
        Ok(())
    }

    fn climate(&mut self, reading: Result<ClimateReading, SensorError>) -> Result<(), SinkError> {
        match reading {
            Ok(ClimateReading {
                temperature,
                humidity,
            }) => writeln!(
                self.out,
                "[DHT_SENSOR] Temperature: {temperature} °C | Humidity: {humidity} %"
            )?,
            Err(_) => writeln!(self.out, "[DHT_SENSOR] Failed to read from sensor!")?,
        }
        Ok(())
    }

    fn gas(&mut self, reading: GasReading) -> Result<(), SinkError> {
        match reading {
            GasReading::Level(level) => writeln!(self.out, "[GAS_SENSOR] Gas Level: {level}")?,
            GasReading::Detected(detected) => {
                writeln!(self.out, "[GAS_SENSOR] Gas Detected: {detected}")?
            }
        }
        Ok(())
    }

    fn cycle_end(&mut self) -> Result<(), SinkError> {
        writeln!(self.out, "{}", Self::SEPARATOR)?;
        Ok(())
    }
}
