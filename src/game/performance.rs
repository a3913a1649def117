//! Frame budget accounting for the headless runner.
//!
//! Each simulation frame is timed against `1 / tick_rate`; the stats log
//! reports the recent load and the worst frame in the window.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frames kept for the rolling figures, about two seconds at 60 Hz
const WINDOW: usize = 120;
/// Frames needed before the load is classified
const MIN_FRAMES: usize = 10;

/// How much of the frame budget the simulation is using
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Load {
    /// Under 30 %
    Light,
    /// Under 70 %
    Steady,
    /// Under 100 %
    Heavy,
    /// Frames take longer than the tick interval and get skipped
    Overrun,
}

impl Load {
    fn classify(usage: f32) -> Self {
        match usage {
            u if u < 0.3 => Load::Light,
            u if u < 0.7 => Load::Steady,
            u if u < 1.0 => Load::Heavy,
            _ => Load::Overrun,
        }
    }
}

pub struct FrameBudget {
    budget: Duration,
    recent: VecDeque<Duration>,
    started: Option<Instant>,
    frames: u64,
    entities: usize,
}

impl FrameBudget {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            budget: Duration::from_secs_f32(1.0 / tick_rate.max(1) as f32),
            recent: VecDeque::with_capacity(WINDOW),
            started: None,
            frames: 0,
            entities: 0,
        }
    }

    pub fn begin_frame(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Close the frame opened by `begin_frame`; a stray call is ignored
    pub fn end_frame(&mut self, entities: usize) {
        if let Some(start) = self.started.take() {
            self.record(start.elapsed());
            self.entities = entities;
        }
    }

    fn record(&mut self, took: Duration) {
        if self.recent.len() == WINDOW {
            self.recent.pop_front();
        }
        self.recent.push_back(took);
        self.frames += 1;
    }

    /// Frames simulated since the runner started
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Mean frame time over the window as a fraction of the budget
    pub fn usage(&self) -> f32 {
        if self.recent.is_empty() {
            return 0.0;
        }
        let total: Duration = self.recent.iter().sum();
        total.as_secs_f32() / self.recent.len() as f32 / self.budget.as_secs_f32()
    }

    pub fn load(&self) -> Load {
        if self.recent.len() < MIN_FRAMES {
            return Load::Light;
        }
        Load::classify(self.usage())
    }

    pub fn worst_frame(&self) -> Duration {
        self.recent.iter().copied().max().unwrap_or_default()
    }

    pub fn summary(&self) -> String {
        format!(
            "{:?} load, {:.1}% of frame (worst {:.2}ms), {} entities",
            self.load(),
            self.usage() * 100.0,
            self.worst_frame().as_secs_f64() * 1000.0,
            self.entities
        )
    }
}
