#![no_std]
#![no_main]

use esp_backtrace as _;

use esp_hal::{
    clock::ClockControl,
    delay::Delay,
    gpio::{Input, Io, Level, OutputOpenDrain, Pull},
    peripherals::Peripherals,
    prelude::*,
    system::SystemControl,
    timer::timg::TimerGroup,
};

use splant_core::{
    dht::MIN_INTERVAL_MS,
    sensor::{CachedClimate, Pir},
    Plant, Variant,
};

use splant_esp32::{init_heap, reset_on, tick_setup, uptime_ms, GuardedDht};

cfg_if::cfg_if! {
    if #[cfg(feature = "greeting")] {
        const VARIANT: Variant = Variant::Greeting;
    } else if #[cfg(feature = "json")] {
        const VARIANT: Variant = Variant::Json;
    } else if #[cfg(feature = "speaking")] {
        const VARIANT: Variant = Variant::Speaking;
    } else if #[cfg(feature = "wifi")] {
        const VARIANT: Variant = Variant::Wifi;
    } else if #[cfg(feature = "serial")] {
        const VARIANT: Variant = Variant::Serial;
    } else {
        compile_error!("Select one of the greeting, json, speaking, wifi or serial features");
    }
}

#[entry]
fn main() -> ! {
    esp_println::logger::init_logger(VARIANT.log_level());

    init_heap();

    let peripherals = Peripherals::take();
    let system = SystemControl::new(peripherals.SYSTEM);
    let clocks = ClockControl::boot_defaults(system.clock_control).freeze();
    let io = Io::new(peripherals.GPIO, peripherals.IO_MUX);

    if let Err(e) = tick_setup(TimerGroup::new(peripherals.TIMG0, &clocks)) {
        reset_on(e);
    }

    log::info!("Starting {} plant", VARIANT.name());

    let pir = Pir::new(Input::new(io.pins.gpio17, Pull::Down));
    let dht = CachedClimate::new(
        GuardedDht::new(
            OutputOpenDrain::new(io.pins.gpio21, Level::High, Pull::Up),
            Delay::new(&clocks),
        ),
        MIN_INTERVAL_MS,
        uptime_ms,
    );

    cfg_if::cfg_if! {
        if #[cfg(feature = "serial")] {
            let gas = splant_core::sensor::AnalogGas::new(
                splant_esp32::AdcGas::new(io.pins.gpio14, peripherals.ADC2)
            );
        } else {
            let gas = splant_core::sensor::DigitalGas::new(Input::new(io.pins.gpio14, Pull::None));
        }
    }

    cfg_if::cfg_if! {
        if #[cfg(any(feature = "greeting", feature = "wifi"))] {
            let sink = splant_core::sink::LogSink::new(
                VARIANT.script().unwrap_or(splant_core::mood::Script::Announcer)
            );
        } else if #[cfg(feature = "json")] {
            let sink = splant_core::sink::JsonSink::new(esp_println::Printer);
        } else if #[cfg(feature = "speaking")] {
            let link = match splant_esp32::UartLink::new(
                peripherals.UART1,
                io.pins.gpio16,
                &clocks,
            ) {
                Ok(link) => link,
                Err(e) => reset_on(e),
            };
            let mut player = splant_core::dfplayer::DfPlayer::new(link);
            let volume = splant_esp32::CONFIG
                .volume
                .min(splant_core::dfplayer::MAX_VOLUME);
            if let Err(e) = player.set_volume(volume) {
                log::error!("Unable to set volume {e:}");
            }
            let sink = splant_core::sink::AudioSink::new(player);
        } else {
            let sink = splant_core::sink::SerialSink::new(esp_println::Printer);
        }
    }

    let plant = Plant::new(pir, dht, gas, sink, VARIANT.schedule());

    cfg_if::cfg_if! {
        if #[cfg(feature = "wifi")] {
            let mut station = match splant_esp32::WifiStation::start(
                peripherals.TIMG1,
                peripherals.RNG,
                peripherals.RADIO_CLK,
                peripherals.WIFI,
                &clocks,
            ) {
                Ok(station) => station,
                Err(e) => reset_on(e),
            };
            splant_esp32::run(plant, |now| station.poll(now))
        } else {
            splant_esp32::run(plant, |_now| {})
        }
    }
}
