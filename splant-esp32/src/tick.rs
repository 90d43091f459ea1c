use esp_hal::{
    peripherals::TIMG0,
    prelude::*,
    timer::timg::{Timer, Timer0, TimerGroup},
    Blocking,
};

use core::cell::RefCell;

use critical_section::Mutex;

use crate::Esp32PlatformError;

/// Uptime resolution. Every sensor period is a multiple of this.
/// The timer reloads in hardware, so a tick held off by a masked section
/// shorter than this (the ~25ms DHT read) fires late but is not lost
pub const TICK_MS: u64 = 100;

static TICK_TIMER: Mutex<RefCell<Option<Timer<Timer0<TIMG0>, Blocking>>>> =
    Mutex::new(RefCell::new(None));

static UPTIME_MS: Mutex<RefCell<u64>> = Mutex::new(RefCell::new(0));

pub fn tick_setup(timg0: TimerGroup<TIMG0, Blocking>) -> Result<(), Esp32PlatformError> {
    let timer = timg0.timer0;
    timer.set_interrupt_handler(TICK_TIMER_TG0_T0_LEVEL);
    timer.clear_interrupt();
    timer.load_value(TICK_MS.millis()).map_err(|e| {
        log::error!("Unable to load tick timer {e:?}");
        Esp32PlatformError::TimerError
    })?;
    timer.enable_auto_reload(true);
    timer.start();
    timer.listen();

    critical_section::with(|cs| {
        TICK_TIMER.borrow_ref_mut(cs).replace(timer);
    });
    Ok(())
}

#[handler]
pub fn TICK_TIMER_TG0_T0_LEVEL() {
    critical_section::with(|cs| {
        *UPTIME_MS.borrow_ref_mut(cs) += TICK_MS;
        if let Some(timer) = TICK_TIMER.borrow_ref(cs).as_ref() {
            timer.clear_interrupt();
        }
    });
}

/// Milliseconds since `tick_setup`, in steps of [`TICK_MS`]
pub fn uptime_ms() -> u64 {
    critical_section::with(|cs| *UPTIME_MS.borrow_ref(cs))
}
