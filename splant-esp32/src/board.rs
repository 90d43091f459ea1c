//! Board glue: esp-hal peripherals behind the splant-core sensor and
//! audio seams

use esp_hal::{
    analog::adc::{Adc, AdcConfig, AdcPin, Attenuation},
    clock::Clocks,
    delay::Delay,
    gpio::{GpioPin, OutputOpenDrain},
    peripherals::{ADC2, UART1},
    uart::{config::Config as UartConfig, UartTx},
    Blocking,
};

use splant_core::{
    dfplayer::{AudioLink, BAUD_RATE},
    dht::Dht22,
    sensor::{AnalogSample, ClimateSensor},
    ClimateReading, SinkError,
};

use splant_core::SensorError;

use crate::Esp32PlatformError;

pub type DhtPin = OutputOpenDrain<'static, GpioPin<21>>;

/// DHT22 on GPIO21. The bit timings are a few tens of micros, so the
/// whole read runs with interrupts masked and the tick ISR waits until
/// it is done
pub struct GuardedDht {
    dht: Dht22<DhtPin, Delay>,
}

impl GuardedDht {
    pub fn new(pin: DhtPin, delay: Delay) -> Self {
        Self {
            dht: Dht22::new(pin, delay),
        }
    }
}

impl ClimateSensor for GuardedDht {
    fn climate(&mut self) -> Result<ClimateReading, SensorError> {
        critical_section::with(|_cs| self.dht.read())
    }
}

/// Raw gas level from the module's analog output on GPIO14 (ADC2)
pub struct AdcGas {
    pin: AdcPin<GpioPin<14>, ADC2>,
    adc: Adc<'static, ADC2>,
}

impl AdcGas {
    pub fn new(pin: GpioPin<14>, adc2: ADC2) -> Self {
        let mut config = AdcConfig::new();
        let pin = config.enable_pin(pin, Attenuation::Attenuation11dB);
        let adc = Adc::new(adc2, config);
        Self { pin, adc }
    }
}

impl AnalogSample for AdcGas {
    fn sample(&mut self) -> Result<u16, SensorError> {
        nb::block!(self.adc.read_oneshot(&mut self.pin)).map_err(|e| {
            log::error!("ADC read failed {e:?}");
            SensorError::Adc
        })
    }
}

/// DFPlayer serial link, TX only (the player never gets asked anything)
pub struct UartLink {
    tx: UartTx<'static, UART1, Blocking>,
}

impl UartLink {
    pub fn new(
        uart1: UART1,
        tx_pin: GpioPin<16>,
        clocks: &Clocks,
    ) -> Result<Self, Esp32PlatformError> {
        let config = UartConfig::default().baudrate(BAUD_RATE);
        let tx = UartTx::new_with_config(uart1, config, clocks, tx_pin).map_err(|e| {
            log::error!("Unable to configure DFPlayer UART {e:?}");
            Esp32PlatformError::PeripheralError
        })?;
        Ok(Self { tx })
    }
}

impl AudioLink for UartLink {
    fn send(&mut self, frame: &[u8]) -> Result<(), SinkError> {
        let mut sent = 0;
        while sent < frame.len() {
            match self.tx.write_bytes(&frame[sent..]) {
                Ok(0) | Err(_) => return Err(SinkError::Link),
                Ok(n) => sent += n,
            }
        }
        Ok(())
    }
}
