//! Scheduler without a browser
//!
//! Nothing fires on its own: the owner delivers wakeups by hand. It keeps
//! track of what is currently scheduled so tests can check that loops and
//! timers are started and stopped in pairs.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{ScheduleHandle, Scheduler};
use crate::sim::SpawnTimer;

#[derive(Debug, Default)]
struct Active {
    frame_loops: usize,
    timers: Vec<(SpawnTimer, u32)>,
    frame_starts: usize,
}

/// Manually driven scheduler; clones share the same bookkeeping
#[derive(Debug, Clone, Default)]
pub struct HeadlessScheduler {
    active: Rc<RefCell<Active>>,
    clock_ms: Rc<Cell<f64>>,
}

impl HeadlessScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live frame loops
    pub fn frame_loops(&self) -> usize {
        self.active.borrow().frame_loops
    }

    /// Live timers with their periods
    pub fn timers(&self) -> Vec<(SpawnTimer, u32)> {
        self.active.borrow().timers.clone()
    }

    /// How many frame loops were ever started
    pub fn frame_starts(&self) -> usize {
        self.active.borrow().frame_starts
    }

    pub fn advance_clock(&self, ms: f64) {
        self.clock_ms.set(self.clock_ms.get() + ms);
    }
}

impl Scheduler for HeadlessScheduler {
    fn start_frames(&mut self) -> ScheduleHandle {
        {
            let mut active = self.active.borrow_mut();
            active.frame_loops += 1;
            active.frame_starts += 1;
        }
        let active = Rc::clone(&self.active);
        ScheduleHandle::new(move || {
            active.borrow_mut().frame_loops -= 1;
        })
    }

    fn start_interval(&mut self, timer: SpawnTimer, period_ms: u32) -> ScheduleHandle {
        self.active.borrow_mut().timers.push((timer, period_ms));
        let active = Rc::clone(&self.active);
        ScheduleHandle::new(move || {
            let mut active = active.borrow_mut();
            if let Some(i) = active.timers.iter().position(|&(t, _)| t == timer) {
                active.timers.remove(i);
            }
        })
    }

    fn now_ms(&self) -> f64 {
        self.clock_ms.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_cancel_on_drop() {
        let mut scheduler = HeadlessScheduler::new();
        let frames = scheduler.start_frames();
        let timer = scheduler.start_interval(SpawnTimer::Falling, 500);
        assert_eq!(scheduler.frame_loops(), 1);
        assert_eq!(scheduler.timers(), vec![(SpawnTimer::Falling, 500)]);

        drop(frames);
        drop(timer);
        assert_eq!(scheduler.frame_loops(), 0);
        assert!(scheduler.timers().is_empty());
        assert_eq!(scheduler.frame_starts(), 1);
    }

    #[test]
    fn test_clock_advances() {
        let scheduler = HeadlessScheduler::new();
        scheduler.advance_clock(16.5);
        assert_eq!(scheduler.now_ms(), 16.5);
    }
}
