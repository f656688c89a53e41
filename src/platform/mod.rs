//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (millisecond wall clock for analytics)
//! - The per-frame callback loop
//! - Periodic spawn timers
//!
//! Everything scheduled hands back a [`ScheduleHandle`]; dropping it stops
//! the loop or timer for good.

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::HeadlessScheduler;
#[cfg(target_arch = "wasm32")]
pub use web::WebScheduler;

use crate::sim::SpawnTimer;

/// Callback delivered by a scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wakeup {
    Frame,
    Timer(SpawnTimer),
}

/// A running frame loop or timer. Cancels on drop.
pub struct ScheduleHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl ScheduleHandle {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }
}

impl Drop for ScheduleHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for ScheduleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleHandle")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Source of frame callbacks, timers and time
pub trait Scheduler {
    /// Start calling back with [`Wakeup::Frame`] once per display refresh
    fn start_frames(&mut self) -> ScheduleHandle;
    /// Start calling back with [`Wakeup::Timer`] every `period_ms`
    fn start_interval(&mut self, timer: SpawnTimer, period_ms: u32) -> ScheduleHandle;
    /// Wall clock in milliseconds
    fn now_ms(&self) -> f64;
}
