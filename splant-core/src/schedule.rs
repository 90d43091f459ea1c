//! Independent periodic deadlines for the three sensor routines.
//!
//! Each routine behaves like a task that does its work then sleeps for
//! its period: every routine is due immediately at start, and once it
//! has run it is next due `period` ms after the time it ran.

use heapless::Vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Motion,
    Climate,
    Gas,
}

impl Task {
    pub const ALL: [Task; 3] = [Task::Motion, Task::Climate, Task::Gas];

    fn idx(self) -> usize {
        self as usize
    }
}

/// Per routine periods, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Periods {
    pub motion: u64,
    pub climate: u64,
    pub gas: u64,
}

impl Periods {
    pub const fn uniform(period: u64) -> Self {
        Self {
            motion: period,
            climate: period,
            gas: period,
        }
    }

    pub fn of(&self, task: Task) -> u64 {
        match task {
            Task::Motion => self.motion,
            Task::Climate => self.climate,
            Task::Gas => self.gas,
        }
    }
}

pub type Due = Vec<Task, 3>;

#[derive(Debug, Clone)]
pub struct Schedule {
    periods: Periods,
    next: [u64; 3],
    combined: bool,
}

impl Schedule {
    pub fn new(periods: Periods) -> Self {
        Self {
            periods,
            next: [0; 3],
            combined: false,
        }
    }

    /// All three routines run back to back as one cycle
    pub fn combined(period: u64) -> Self {
        Self {
            combined: true,
            ..Self::new(Periods::uniform(period))
        }
    }

    pub fn is_combined(&self) -> bool {
        self.combined
    }

    pub fn periods(&self) -> Periods {
        self.periods
    }

    /// Routines due at `now_ms`, in fixed Motion, Climate, Gas order.
    /// Returned routines are considered run and are rescheduled
    pub fn poll(&mut self, now_ms: u64) -> Due {
        let mut due = Due::new();
        for task in Task::ALL {
            let next = &mut self.next[task.idx()];
            if now_ms >= *next {
                *next = now_ms.saturating_add(self.periods.of(task));
                // capacity matches Task::ALL
                due.push(task).ok();
            }
        }
        due
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> u64 {
        self.next.iter().copied().min().unwrap_or_default()
    }
}
