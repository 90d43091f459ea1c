//! Smart talking plant firmware for the esp32 family dev boards, on
//! esp-hal (no IDF). Use the espflash toolchain to build / flash / monitor:
//!
//! `cargo run --release --features esp32,greeting`
//!
//! Exactly one output variant feature should be enabled: `greeting`,
//! `json`, `speaking`, `wifi` or `serial`.
//!
//! Wiring (fixed):
//! - PIR output: GPIO17
//! - DHT22 data: GPIO21 (open drain, 10k pull-up)
//! - gas module: GPIO14 (digital out, or analog out for `serial`)
//! - DFPlayer RX: GPIO16 (UART1 TX)
#![no_std]

mod board;
mod tick;
#[cfg(feature = "wifi")]
mod wifi;

use core::mem::MaybeUninit;

use esp_hal::reset::software_reset_cpu;
use splant_core::sink::Sink;
use splant_core::{
    sensor::{ClimateSensor, GasSensor, MotionSensor},
    Plant,
};

pub use board::{AdcGas, GuardedDht, UartLink};
pub use tick::{tick_setup, uptime_ms, TICK_TIMER_TG0_T0_LEVEL};
#[cfg(feature = "wifi")]
pub use wifi::WifiStation;

#[global_allocator]
static ALLOCATOR: esp_alloc::EspHeap = esp_alloc::EspHeap::empty();

const HEAP_SIZE: usize = 32 * 1024;

#[toml_cfg::toml_config]
pub struct Config {
    #[default("USERNAME")]
    wifi_ssid: &'static str,
    #[default("PASSWORD")]
    wifi_pass: &'static str,
    #[default(30)]
    volume: u8,
}

pub enum Esp32PlatformError {
    PeripheralError,
    TimerError,
    WifiError,
}

impl core::fmt::Debug for Esp32PlatformError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Esp32PlatformError::PeripheralError => write!(f, "peripheral setup failed"),
            Esp32PlatformError::TimerError => write!(f, "tick timer setup failed"),
            Esp32PlatformError::WifiError => write!(f, "wifi setup failed"),
        }
    }
}

pub fn init_heap() {
    static mut HEAP: MaybeUninit<[u8; HEAP_SIZE]> = MaybeUninit::uninit();

    unsafe {
        ALLOCATOR.init(HEAP.as_mut_ptr() as *mut u8, HEAP_SIZE);
    }
}

/// Nothing to recover from at setup time, log it and start over
pub fn reset_on(e: Esp32PlatformError) -> ! {
    log::error!("Unrecoverable error {e:?}, resetting cpu!");
    software_reset_cpu();
    #[allow(clippy::empty_loop)]
    loop {}
}

/// Main loop: service the plant's routines whenever the tick counter
/// moves, and give `idle` (the radio, when there is one) a turn on
/// every pass
pub fn run<M, C, G, S>(mut plant: Plant<M, C, G, S>, mut idle: impl FnMut(u64)) -> !
where
    M: MotionSensor,
    C: ClimateSensor,
    G: GasSensor,
    S: Sink,
{
    plant.start();
    let mut last = None;
    loop {
        let now = uptime_ms();
        if last != Some(now) {
            last = Some(now);
            let due = plant.tick(now);
            if !due.is_empty() {
                log::trace!("Ran {:?} at {now}ms", due.as_slice());
            }
        }
        idle(now);
    }
}
