//! DHT22 / AM2301 temperature and humidity sensor, read by bit banging
//! a single open drain data line.
//!
//! The bus idles high. The host pulls it low to request a reading and
//! releases it, the sensor answers with 80us low / 80us high, then sends
//! 40 bits. Every bit starts with ~50us low; the length of the following
//! high pulse encodes the value (~27us for a 0, ~70us for a 1).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::reading::{ClimateReading, Deci};
use crate::SensorError;

/// The sensor needs this long between two reads to produce a fresh sample
pub const MIN_INTERVAL_MS: u64 = 2000;

pub struct Dht22<P, D> {
    pin: P,
    delay: D,
}

impl<P, D> Dht22<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    const START_LOW_MS: u32 = 20;
    const RESPONSE_TIMEOUT_US: u32 = 100;
    const BIT_TIMEOUT_US: u32 = 100;
    const SAMPLE_AFTER_US: u32 = 40;

    pub fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }

    /// Blocking read, takes roughly 25ms. Timing sensitive: run it with
    /// interrupts masked if the platform has busy interrupt handlers
    pub fn read(&mut self) -> Result<ClimateReading, SensorError> {
        self.start_signal()?;
        self.expect_response()?;
        let frame = self.read_frame()?;
        decode(frame)
    }

    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }

    fn start_signal(&mut self) -> Result<(), SensorError> {
        self.pin.set_low().map_err(|_| SensorError::Pin)?;
        self.delay.delay_ms(Self::START_LOW_MS);
        self.pin.set_high().map_err(|_| SensorError::Pin)?;
        Ok(())
    }

    fn expect_response(&mut self) -> Result<(), SensorError> {
        self.wait_for_level(false, Self::RESPONSE_TIMEOUT_US)?;
        self.wait_for_level(true, Self::RESPONSE_TIMEOUT_US)?;
        self.wait_for_level(false, Self::RESPONSE_TIMEOUT_US)?;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<[u8; 5], SensorError> {
        let mut bytes = [0u8; 5];
        for bit_index in 0..40 {
            self.wait_for_level(true, Self::BIT_TIMEOUT_US)?;
            self.delay.delay_us(Self::SAMPLE_AFTER_US);
            let bit = self.pin.is_high().map_err(|_| SensorError::Pin)?;
            let byte = &mut bytes[bit_index / 8];
            *byte = (*byte << 1) | bit as u8;
            self.wait_for_level(false, Self::BIT_TIMEOUT_US)?;
        }
        Ok(bytes)
    }

    fn wait_for_level(&mut self, high: bool, timeout_us: u32) -> Result<(), SensorError> {
        for _ in 0..=timeout_us {
            if self.pin.is_high().map_err(|_| SensorError::Pin)? == high {
                return Ok(());
            }
            self.delay.delay_us(1);
        }
        Err(SensorError::Timeout)
    }
}

/// Decode the 5 byte frame: humidity hi/lo, temperature hi/lo (sign in
/// the top bit), checksum over the first four bytes
pub fn decode(frame: [u8; 5]) -> Result<ClimateReading, SensorError> {
    let sum = frame[..4]
        .iter()
        .fold(0u8, |acc, byte| acc.wrapping_add(*byte));
    if sum != frame[4] {
        return Err(SensorError::Checksum);
    }

    let humidity = i16::from_be_bytes([frame[0], frame[1]]);
    let magnitude = i16::from_be_bytes([frame[2] & 0x7f, frame[3]]);
    let temperature = if frame[2] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    };

    Ok(ClimateReading {
        temperature: Deci::from_tenths(temperature),
        humidity: Deci::from_tenths(humidity),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{NoDelay, ScriptedPin};

    fn with_checksum(bytes: [u8; 4]) -> [u8; 5] {
        let sum = bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
        [bytes[0], bytes[1], bytes[2], bytes[3], sum]
    }

    /// Levels the sensor puts on the line for one frame, as seen by
    /// `read`: response preamble then (rise, sample, fall) per bit
    fn line_for(frame: [u8; 5]) -> Vec<bool> {
        let mut levels = vec![false, true, false];
        for byte in frame {
            for shift in (0..8).rev() {
                levels.push(true);
                levels.push(byte >> shift & 1 == 1);
                levels.push(false);
            }
        }
        levels
    }

    #[test]
    fn decode_positive_reading() {
        // 65.2 %, 35.1 C
        let r = decode(with_checksum([0x02, 0x8c, 0x01, 0x5f])).unwrap();
        assert_eq!(r.humidity, Deci::from_tenths(652));
        assert_eq!(r.temperature, Deci::from_tenths(351));
    }

    #[test]
    fn decode_negative_temperature() {
        // -10.1 C
        let r = decode(with_checksum([0x01, 0xf4, 0x80, 0x65])).unwrap();
        assert_eq!(r.temperature, Deci::from_tenths(-101));
        assert_eq!(r.humidity, Deci::from_tenths(500));
    }

    #[test]
    fn decode_rejects_bad_checksum() {
        let mut frame = with_checksum([0x02, 0x8c, 0x01, 0x5f]);
        frame[4] ^= 0x01;
        assert_eq!(decode(frame), Err(SensorError::Checksum));
    }

    #[test]
    fn read_full_frame_from_line() {
        let frame = with_checksum([0x01, 0xc2, 0x00, 0xea]);
        let pin = ScriptedPin::new(line_for(frame));
        let mut dht = Dht22::new(pin, NoDelay::default());

        let r = dht.read().unwrap();
        assert_eq!(r.humidity, Deci::from_tenths(450));
        assert_eq!(r.temperature, Deci::from_tenths(234));

        let (pin, delay) = dht.release();
        // pulled low for the start signal, then released
        assert_eq!(pin.driven, vec![false, true]);
        assert!(delay.waited_ns >= 20_000_000);
    }

    #[test]
    fn silent_sensor_times_out() {
        let mut dht = Dht22::new(ScriptedPin::new([]), NoDelay::default());
        assert_eq!(dht.read(), Err(SensorError::Timeout));
    }

    #[test]
    fn truncated_frame_times_out() {
        let frame = with_checksum([0x01, 0xc2, 0x00, 0xea]);
        let mut line = line_for(frame);
        line.truncate(3 + 3 * 20);
        // line stuck low in the middle of the frame
        line.extend(std::iter::repeat(false).take(500));
        let mut dht = Dht22::new(ScriptedPin::new(line), NoDelay::default());
        assert_eq!(dht.read(), Err(SensorError::Timeout));
    }
}
