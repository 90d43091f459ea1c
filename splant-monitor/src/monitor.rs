use std::future::Future;

use chrono::{DateTime, Local};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use splant_core::{mood::Mood, ClimateReading, Message};

use crate::MonitorResult;

/// What became of one line off the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Blank, or not shaped like a JSON object (boot chatter, log lines)
    Ignored,
    Logged(Message),
    /// Looked like JSON but did not parse as a reading
    Skipped,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub logged: u64,
    pub skipped: u64,
    pub ignored: u64,
}

/// Latest value seen for each sensor
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub motion: Option<bool>,
    pub climate: Option<ClimateReading>,
    pub gas: Option<bool>,
    pub last_seen: Option<DateTime<Local>>,
}

#[derive(Debug, Default)]
pub struct Monitor {
    stats: Stats,
    snapshot: Snapshot,
}

impl Monitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot
    }

    pub fn handle_line(&mut self, raw: &str) -> LineOutcome {
        let line = raw.trim();
        if line.is_empty() || !line.starts_with('{') || !line.ends_with('}') {
            self.stats.ignored += 1;
            return LineOutcome::Ignored;
        }

        match Message::from_line(line) {
            Ok(message) => {
                let now = Local::now();
                log::info!("[{}] Logged: {line}", now.format("%Y-%m-%d %H:%M:%S%.3f"));
                self.record(message, now);
                self.stats.logged += 1;
                LineOutcome::Logged(message)
            }
            Err(e) => {
                log::warn!("Skipping invalid JSON: {line} ({e:})");
                self.stats.skipped += 1;
                LineOutcome::Skipped
            }
        }
    }

    fn record(&mut self, message: Message, at: DateTime<Local>) {
        match message {
            Message::Motion { motion } => {
                if motion {
                    log::info!("Someone is near the plant");
                }
                self.snapshot.motion = Some(motion);
            }
            Message::Climate {
                temperature,
                humidity,
            } => {
                log::info!(
                    "Plant feels {:?} at {temperature} C, humidity {humidity}%",
                    Mood::of(temperature)
                );
                self.snapshot.climate = Some(ClimateReading {
                    temperature,
                    humidity,
                });
            }
            Message::Gas { gas } => {
                if gas {
                    log::warn!("Gas detected near the plant");
                }
                self.snapshot.gas = Some(gas);
            }
        }
        self.snapshot.last_seen = Some(at);
    }

    /// Consume lines until the stream closes or `shutdown` resolves.
    /// Bytes that are not UTF-8 (line noise) are dropped from the line
    pub async fn run<R, F>(&mut self, mut reader: R, shutdown: F) -> MonitorResult<Stats>
    where
        R: AsyncBufRead + Unpin,
        F: Future,
    {
        tokio::pin!(shutdown);
        let mut buf = Vec::with_capacity(128);

        loop {
            buf.clear();
            tokio::select! {
                read = reader.read_until(b'\n', &mut buf) => {
                    if read? == 0 {
                        log::info!("Stream closed");
                        break;
                    }
                    let line: String = buf.utf8_chunks().map(|chunk| chunk.valid()).collect();
                    self.handle_line(&line);
                }
                _ = &mut shutdown => {
                    log::info!("Logging stopped by user");
                    break;
                }
            }
        }

        Ok(self.stats)
    }
}
