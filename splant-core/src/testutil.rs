//! Fakes for the embedded-hal traits and the sensor seams

use std::collections::VecDeque;
use std::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::dfplayer::AudioLink;
use crate::reading::{ClimateReading, GasReading};
use crate::sensor::{ClimateSensor, GasSensor, MotionSensor};
use crate::SensorError;
use crate::SinkError;

/// Pin that replays a script of levels, one per `is_high` poll.
/// Once the script is exhausted the line idles high, like a released
/// open drain bus with a pull-up.
#[derive(Default)]
pub struct ScriptedPin {
    pub levels: VecDeque<bool>,
    pub driven: Vec<bool>,
}

impl ScriptedPin {
    pub fn new(levels: impl IntoIterator<Item = bool>) -> Self {
        Self {
            levels: levels.into_iter().collect(),
            driven: Vec::new(),
        }
    }
}

impl ErrorType for ScriptedPin {
    type Error = Infallible;
}

impl InputPin for ScriptedPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.levels.pop_front().unwrap_or(true))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|h| !h)
    }
}

impl OutputPin for ScriptedPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.driven.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.driven.push(true);
        Ok(())
    }
}

#[derive(Default)]
pub struct NoDelay {
    pub waited_ns: u64,
}

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waited_ns += ns as u64;
    }
}

impl AudioLink for Vec<u8> {
    fn send(&mut self, frame: &[u8]) -> Result<(), SinkError> {
        self.extend_from_slice(frame);
        Ok(())
    }
}

/// Sensor stand-in returning queued readings, then `fallback` forever
pub struct Replay<T: Clone> {
    pub queue: VecDeque<T>,
    pub fallback: T,
}

impl<T: Clone> Replay<T> {
    pub fn new(readings: impl IntoIterator<Item = T>, fallback: T) -> Self {
        Self {
            queue: readings.into_iter().collect(),
            fallback,
        }
    }

    fn next(&mut self) -> T {
        self.queue
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

pub type MotionReplay = Replay<Result<bool, SensorError>>;
pub type ClimateReplay = Replay<Result<ClimateReading, SensorError>>;
pub type GasReplay = Replay<Result<GasReading, SensorError>>;

impl MotionSensor for Replay<Result<bool, SensorError>> {
    fn motion(&mut self) -> Result<bool, SensorError> {
        self.next()
    }
}

impl ClimateSensor for Replay<Result<ClimateReading, SensorError>> {
    fn climate(&mut self) -> Result<ClimateReading, SensorError> {
        self.next()
    }
}

impl GasSensor for Replay<Result<GasReading, SensorError>> {
    fn gas(&mut self) -> Result<GasReading, SensorError> {
        self.next()
    }
}
