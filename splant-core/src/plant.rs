use crate::schedule::{Due, Schedule, Task};
use crate::sensor::{ClimateSensor, GasSensor, MotionSensor};
use crate::sink::Sink;
use crate::SinkError;

/// Polling core: three sensors, one sink, one schedule.
///
/// Nothing that happens in here is fatal. Failed reads and failed
/// writes are logged and the routine simply runs again next period.
pub struct Plant<M, C, G, S> {
    motion: M,
    climate: C,
    gas: G,
    sink: S,
    schedule: Schedule,
}

impl<M, C, G, S> Plant<M, C, G, S>
where
    M: MotionSensor,
    C: ClimateSensor,
    G: GasSensor,
    S: Sink,
{
    pub fn new(motion: M, climate: C, gas: G, sink: S, schedule: Schedule) -> Self {
        Self {
            motion,
            climate,
            gas,
            sink,
            schedule,
        }
    }

    pub fn start(&mut self) {
        if let Err(e) = self.sink.banner() {
            log::error!("Unable to write banner {e:}");
        }
    }

    /// Run every routine due at `now_ms`, returns what ran
    pub fn tick(&mut self, now_ms: u64) -> Due {
        let due = self.schedule.poll(now_ms);
        for task in due.iter() {
            if let Err(e) = self.run(*task) {
                log::error!("Unable to report {task:?} reading {e:}");
            }
        }

        if self.schedule.is_combined() && !due.is_empty() {
            if let Err(e) = self.sink.cycle_end() {
                log::error!("Unable to end report cycle {e:}");
            }
        }
        due
    }

    pub fn next_deadline(&self) -> u64 {
        self.schedule.next_deadline()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn run(&mut self, task: Task) -> Result<(), SinkError> {
        match task {
            Task::Motion => match self.motion.motion() {
                Ok(detected) => self.sink.motion(detected),
                Err(e) => {
                    log::error!("Error reading motion sensor {e:?}");
                    Ok(())
                }
            },
            // the sink decides how a failed climate read is reported
            Task::Climate => self.sink.climate(self.climate.climate()),
            Task::Gas => match self.gas.gas() {
                Ok(reading) => self.sink.gas(reading),
                Err(e) => {
                    log::error!("Error reading gas sensor {e:?}");
                    Ok(())
                }
            },
        }
    }
}
