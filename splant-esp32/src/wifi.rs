//! WiFi station for the `wifi` build, esp-wifi underneath and the
//! reconnect policy from `splant_core::station` on top

use esp_hal::{
    clock::Clocks,
    peripherals::{RADIO_CLK, RNG, TIMG1, WIFI},
    rng::Rng,
    timer::{timg::TimerGroup, ErasedTimer, PeriodicTimer},
};

use esp_wifi::{
    current_millis,
    wifi::{
        get_wifi_state, utils::create_network_interface, ClientConfiguration, Configuration,
        WifiController, WifiStaDevice, WifiState,
    },
    wifi_interface::WifiStack,
    EspWifiInitFor,
};

use smoltcp::iface::SocketStorage;
use static_cell::StaticCell;

use core::net::Ipv4Addr;

use splant_core::station::{Station, StationAction, StationEvent};
use splant_core::TAG;

use crate::{Esp32PlatformError, CONFIG};

static SOCKETS: StaticCell<[SocketStorage<'static>; 3]> = StaticCell::new();

pub struct WifiStation {
    controller: WifiController<'static>,
    stack: WifiStack<'static, WifiStaDevice>,
    station: Station,
    last_state: WifiState,
}

impl WifiStation {
    /// Bring up the radio in station mode with the configured
    /// credentials. Association itself happens from `poll`
    pub fn start(
        timg1: TIMG1,
        rng: RNG,
        radio_clk: RADIO_CLK,
        wifi: WIFI,
        clocks: &Clocks,
    ) -> Result<Self, Esp32PlatformError> {
        let timg1 = TimerGroup::new(timg1, clocks);
        let timer: ErasedTimer = timg1.timer0.into();
        let init = esp_wifi::initialize(
            EspWifiInitFor::Wifi,
            PeriodicTimer::new(timer),
            Rng::new(rng),
            radio_clk,
            clocks,
        )
        .map_err(|e| {
            log::error!("Unable to initialize radio {e:?}");
            Esp32PlatformError::WifiError
        })?;

        let sockets = SOCKETS.init(Default::default());
        let (iface, device, mut controller, sockets) =
            create_network_interface(&init, wifi, WifiStaDevice, sockets).map_err(|e| {
                log::error!("Unable to create network interface {e:?}");
                Esp32PlatformError::WifiError
            })?;
        let stack = WifiStack::new(iface, device, sockets, current_millis);

        let config = Configuration::Client(ClientConfiguration {
            ssid: CONFIG.wifi_ssid.try_into().map_err(|_| {
                log::error!("SSID too long");
                Esp32PlatformError::WifiError
            })?,
            password: CONFIG.wifi_pass.try_into().map_err(|_| {
                log::error!("Password too long");
                Esp32PlatformError::WifiError
            })?,
            ..Default::default()
        });
        controller.set_configuration(&config).map_err(|e| {
            log::error!("Unable to configure station {e:?}");
            Esp32PlatformError::WifiError
        })?;
        controller.start().map_err(|e| {
            log::error!("Unable to start station {e:?}");
            Esp32PlatformError::WifiError
        })?;
        log::info!(target: TAG, "Wi-Fi Init STA finished.");

        Ok(Self {
            controller,
            stack,
            station: Station::new(),
            last_state: WifiState::Invalid,
        })
    }

    /// Drive the network stack and turn radio state into station
    /// events. Called from the main loop on every pass
    pub fn poll(&mut self, now_ms: u64) {
        self.stack.work();

        let state = get_wifi_state();
        if state != self.last_state {
            self.last_state = state;
            match state {
                WifiState::StaStarted => self.handle(StationEvent::Started, now_ms),
                WifiState::StaDisconnected => self.handle(StationEvent::Disconnected, now_ms),
                _ => {}
            }
        }

        // a failed connect leaves the state at StaDisconnected, no change
        // gets reported for it
        let associated = matches!(self.controller.is_connected(), Ok(true));
        if self.station.check(associated, now_ms) == StationAction::Connect {
            self.connect();
        }

        if self.station.ip().is_none() && associated && self.stack.is_iface_up() {
            if let Ok(info) = self.stack.get_ip_info() {
                self.handle(
                    StationEvent::GotIp(Ipv4Addr::from(info.ip.octets())),
                    now_ms,
                );
            }
        }
    }

    fn handle(&mut self, event: StationEvent, now_ms: u64) {
        if self.station.handle(event, now_ms) == StationAction::Connect {
            self.connect();
        }
    }

    fn connect(&mut self) {
        if let Err(e) = self.controller.connect() {
            log::warn!("Connect request failed {e:?}");
        }
    }

    pub fn station(&self) -> &Station {
        &self.station
    }
}
