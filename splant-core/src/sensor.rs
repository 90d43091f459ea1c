//! Sensor seams the polling core is generic over, plus the simple
//! GPIO backed sensors (PIR, gas comparator).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::dht::Dht22;
use crate::reading::{ClimateReading, GasReading};
use crate::SensorError;

pub trait MotionSensor {
    fn motion(&mut self) -> Result<bool, SensorError>;
}

pub trait ClimateSensor {
    fn climate(&mut self) -> Result<ClimateReading, SensorError>;
}

pub trait GasSensor {
    fn gas(&mut self) -> Result<GasReading, SensorError>;
}

/// One shot analog conversion, implemented by the board's ADC glue
pub trait AnalogSample {
    fn sample(&mut self) -> Result<u16, SensorError>;
}

/// Passive infrared motion sensor, output goes high while motion is seen
pub struct Pir<P: InputPin> {
    pin: P,
}

impl<P: InputPin> Pir<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> MotionSensor for Pir<P> {
    fn motion(&mut self) -> Result<bool, SensorError> {
        self.pin.is_high().map_err(|_| SensorError::Pin)
    }
}

/// Gas module digital output (on board comparator)
pub struct DigitalGas<P: InputPin> {
    pin: P,
}

impl<P: InputPin> DigitalGas<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> GasSensor for DigitalGas<P> {
    fn gas(&mut self) -> Result<GasReading, SensorError> {
        self.pin
            .is_high()
            .map(GasReading::Detected)
            .map_err(|_| SensorError::Pin)
    }
}

/// Gas module analog output, reported raw
pub struct AnalogGas<A: AnalogSample> {
    adc: A,
}

impl<A: AnalogSample> AnalogGas<A> {
    pub fn new(adc: A) -> Self {
        Self { adc }
    }
}

impl<A: AnalogSample> GasSensor for AnalogGas<A> {
    fn gas(&mut self) -> Result<GasReading, SensorError> {
        self.adc.sample().map(GasReading::Level)
    }
}

/// Spaces out reads of a slow climate sensor: asked again within
/// `min_interval_ms` of the last read, it hands back that read's result
/// instead of touching the sensor
pub struct CachedClimate<C, K> {
    sensor: C,
    clock: K,
    min_interval_ms: u64,
    last: Option<(u64, Result<ClimateReading, SensorError>)>,
}

impl<C, K> CachedClimate<C, K>
where
    C: ClimateSensor,
    K: FnMut() -> u64,
{
    /// `clock` returns monotonic milliseconds
    pub fn new(sensor: C, min_interval_ms: u64, clock: K) -> Self {
        Self {
            sensor,
            clock,
            min_interval_ms,
            last: None,
        }
    }

    pub fn release(self) -> C {
        self.sensor
    }
}

impl<C, K> ClimateSensor for CachedClimate<C, K>
where
    C: ClimateSensor,
    K: FnMut() -> u64,
{
    fn climate(&mut self) -> Result<ClimateReading, SensorError> {
        let now = (self.clock)();
        if let Some((at, result)) = self.last {
            if now.saturating_sub(at) < self.min_interval_ms {
                return result;
            }
        }
        let result = self.sensor.climate();
        self.last = Some((now, result));
        result
    }
}

impl<P, D> ClimateSensor for Dht22<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    fn climate(&mut self) -> Result<ClimateReading, SensorError> {
        self.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dht::MIN_INTERVAL_MS;
    use crate::reading::Deci;
    use crate::testutil::{ClimateReplay, ScriptedPin};
    use std::cell::Cell;
    use std::rc::Rc;

    struct FixedAdc(Result<u16, SensorError>);

    impl AnalogSample for FixedAdc {
        fn sample(&mut self) -> Result<u16, SensorError> {
            self.0
        }
    }

    #[test]
    fn pir_follows_pin_level() {
        let mut pir = Pir::new(ScriptedPin::new([true, false]));
        assert_eq!(pir.motion(), Ok(true));
        assert_eq!(pir.motion(), Ok(false));
    }

    #[test]
    fn digital_gas_reports_comparator() {
        let mut gas = DigitalGas::new(ScriptedPin::new([false, true]));
        assert_eq!(gas.gas(), Ok(GasReading::Detected(false)));
        assert_eq!(gas.gas(), Ok(GasReading::Detected(true)));
    }

    #[test]
    fn analog_gas_reports_raw_sample() {
        assert_eq!(
            AnalogGas::new(FixedAdc(Ok(1873))).gas(),
            Ok(GasReading::Level(1873))
        );
        assert_eq!(
            AnalogGas::new(FixedAdc(Err(SensorError::Adc))).gas(),
            Err(SensorError::Adc)
        );
    }

    fn reading(t: i16) -> Result<ClimateReading, SensorError> {
        Ok(ClimateReading {
            temperature: Deci::from_tenths(t),
            humidity: Deci::from_tenths(500),
        })
    }

    #[test]
    fn cached_climate_spaces_out_reads() {
        let now = Rc::new(Cell::new(0u64));
        let clock = {
            let now = now.clone();
            move || now.get()
        };
        let replay = ClimateReplay::new(
            [reading(211), Err(SensorError::Checksum), reading(215)],
            reading(0),
        );
        let mut climate = CachedClimate::new(replay, MIN_INTERVAL_MS, clock);

        // one second cadence, as the combined report polls it
        let mut seen = Vec::new();
        for t in (0..=5000).step_by(1000) {
            now.set(t);
            seen.push(climate.climate());
        }
        assert_eq!(
            seen,
            vec![
                reading(211),
                reading(211),
                Err(SensorError::Checksum),
                Err(SensorError::Checksum),
                reading(215),
                reading(215),
            ]
        );
        // three reads reached the sensor, the rest were served from cache
        assert!(climate.release().queue.is_empty());
    }

    #[test]
    fn cached_climate_reads_through_when_slow_enough() {
        let mut t = 0;
        let clock = move || {
            t += 3000;
            t
        };
        let replay = ClimateReplay::new([reading(100), reading(101)], reading(102));
        let mut climate = CachedClimate::new(replay, MIN_INTERVAL_MS, clock);
        assert_eq!(climate.climate(), reading(100));
        assert_eq!(climate.climate(), reading(101));
        assert_eq!(climate.climate(), reading(102));
    }
}
