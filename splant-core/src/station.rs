//! WiFi station bookkeeping for the network enabled build.
//!
//! Connect as soon as the station interface starts, and on every
//! disconnect ask to connect again right away. No backoff, no retry limit.
//!
//! Radios that only report state changes get a level check on top
//! ([`Station::check`]): a link that is still down [`RETRY_MS`] after the
//! last connect request counts as another disconnect.

use core::net::Ipv4Addr;

use crate::TAG;

/// How long a connect request may stay unanswered before it is repeated
pub const RETRY_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationEvent {
    Started,
    Disconnected,
    GotIp(Ipv4Addr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationAction {
    Connect,
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Stopped,
    Connecting,
    Online(Ipv4Addr),
}

#[derive(Debug)]
pub struct Station {
    state: LinkState,
    reconnects: u32,
    requested_at: u64,
}

impl Default for Station {
    fn default() -> Self {
        Self::new()
    }
}

impl Station {
    pub fn new() -> Self {
        Self {
            state: LinkState::Stopped,
            reconnects: 0,
            requested_at: 0,
        }
    }

    pub fn handle(&mut self, event: StationEvent, now_ms: u64) -> StationAction {
        match event {
            StationEvent::Started => {
                self.state = LinkState::Connecting;
                self.requested_at = now_ms;
                StationAction::Connect
            }
            StationEvent::Disconnected => {
                log::info!(target: TAG, "Disconnected. Reconnecting...");
                self.state = LinkState::Connecting;
                self.reconnects = self.reconnects.wrapping_add(1);
                self.requested_at = now_ms;
                StationAction::Connect
            }
            StationEvent::GotIp(ip) => {
                log::info!(target: TAG, "Got IP: {ip}");
                self.state = LinkState::Online(ip);
                StationAction::Idle
            }
        }
    }

    /// Feed the radio's current association level. Raises a disconnect
    /// when an online link dropped, or when the last connect request got
    /// nowhere within [`RETRY_MS`]
    pub fn check(&mut self, associated: bool, now_ms: u64) -> StationAction {
        match self.state {
            LinkState::Stopped => StationAction::Idle,
            LinkState::Online(_) if !associated => {
                self.handle(StationEvent::Disconnected, now_ms)
            }
            LinkState::Connecting
                if !associated && now_ms.saturating_sub(self.requested_at) >= RETRY_MS =>
            {
                self.handle(StationEvent::Disconnected, now_ms)
            }
            _ => StationAction::Idle,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn ip(&self) -> Option<Ipv4Addr> {
        match self.state {
            LinkState::Online(ip) => Some(ip),
            _ => None,
        }
    }

    pub fn reconnects(&self) -> u32 {
        self.reconnects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_once_started() {
        let mut station = Station::new();
        assert_eq!(station.state(), LinkState::Stopped);
        assert_eq!(station.check(false, 10_000), StationAction::Idle);
        assert_eq!(
            station.handle(StationEvent::Started, 0),
            StationAction::Connect
        );
        assert_eq!(station.state(), LinkState::Connecting);
        assert_eq!(station.ip(), None);
    }

    #[test]
    fn reconnect_immediately_every_time() {
        let mut station = Station::new();
        station.handle(StationEvent::Started, 0);
        let ip = Ipv4Addr::new(192, 168, 1, 42);
        assert_eq!(
            station.handle(StationEvent::GotIp(ip), 100),
            StationAction::Idle
        );
        assert_eq!(station.ip(), Some(ip));

        for _ in 0..5 {
            assert_eq!(
                station.handle(StationEvent::Disconnected, 200),
                StationAction::Connect
            );
        }
        assert_eq!(station.reconnects(), 5);
        assert_eq!(station.ip(), None);
    }

    #[test]
    fn failed_connects_keep_being_retried() {
        let mut station = Station::new();
        station.handle(StationEvent::Started, 0);
        station.handle(StationEvent::Disconnected, 1000);

        // radio stays disassociated and reports no further changes
        let mut retries = 0;
        for now in (1000..=61_000).step_by(100) {
            if station.check(false, now) == StationAction::Connect {
                retries += 1;
            }
        }
        assert_eq!(retries, 12);
        assert_eq!(station.reconnects(), 13);
        assert_eq!(station.state(), LinkState::Connecting);
    }

    #[test]
    fn pending_attempt_is_left_alone() {
        let mut station = Station::new();
        station.handle(StationEvent::Started, 0);
        assert_eq!(station.check(false, RETRY_MS - 1), StationAction::Idle);
        // associated, waiting on DHCP
        assert_eq!(station.check(true, RETRY_MS * 3), StationAction::Idle);
        assert_eq!(station.reconnects(), 0);
    }

    #[test]
    fn silent_drop_while_online() {
        let mut station = Station::new();
        station.handle(StationEvent::Started, 0);
        station.handle(StationEvent::GotIp(Ipv4Addr::new(10, 0, 0, 7)), 50);
        assert_eq!(station.check(true, 9000), StationAction::Idle);
        assert_eq!(station.check(false, 9100), StationAction::Connect);
        assert_eq!(station.state(), LinkState::Connecting);
        assert_eq!(station.reconnects(), 1);
    }
}
