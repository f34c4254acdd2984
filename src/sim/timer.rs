use crate::feedback::{Cue, Feedback};
use crate::game::config::TimerConfig;

/// What the countdown looks like after a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimerSnapshot {
    pub time_left: f32,
    /// `time_left / base`, 0 once expired.
    pub progress: f32,
    /// True only on the tick that ran the clock out.
    pub just_expired: bool,
}

/// Hell's Kitchen countdown. Every served order shrinks the base duration;
/// a poor order also cuts the fresh countdown by `penalty_factor` per
/// consecutive failure.
#[derive(Clone, Debug)]
pub struct PenaltyTimer {
    base: f32,
    time_left: f32,
    fail_streak: u32,
    penalty_factor: f32,
    shrink_factor: f32,
    warning_progress: f32,
    warning_fired: bool,
    expired: bool,
}

impl PenaltyTimer {
    pub fn new(config: &TimerConfig) -> Self {
        Self {
            base: config.initial_seconds,
            time_left: config.initial_seconds,
            fail_streak: 0,
            penalty_factor: config.penalty_factor,
            shrink_factor: config.shrink_factor,
            warning_progress: config.warning_progress,
            warning_fired: false,
            expired: false,
        }
    }

    pub fn base(&self) -> f32 {
        self.base
    }

    pub fn time_left(&self) -> f32 {
        self.time_left
    }

    pub fn fail_streak(&self) -> u32 {
        self.fail_streak
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn progress(&self) -> f32 {
        if self.expired || self.base <= 0.0 {
            return 0.0;
        }
        (self.time_left / self.base).clamp(0.0, 1.0)
    }

    /// Restart the countdown after an evaluated order. Returns whether the
    /// order was penalised. Ignored once the timer has expired.
    pub fn on_evaluation_complete(&mut self, overall: f32, min_quality: f32) -> bool {
        if self.expired {
            log::debug!("evaluation after expiry ignored (overall {overall:.2})");
            return false;
        }
        self.base *= self.shrink_factor;
        if overall < min_quality {
            self.fail_streak += 1;
            self.time_left = self.base * self.penalty_factor.powi(self.fail_streak as i32);
            log::info!(
                "penalty #{}: {overall:.2} < {min_quality:.2}, {:.3}s left",
                self.fail_streak,
                self.time_left
            );
            true
        } else {
            self.fail_streak = 0;
            self.time_left = self.base;
            false
        }
    }

    pub fn tick(&mut self, dt: f32, feedback: &mut dyn Feedback) -> TimerSnapshot {
        let mut just_expired = false;
        if !self.expired {
            self.time_left -= dt;
            if self.time_left <= 0.0 {
                self.time_left = 0.0;
                self.expired = true;
                just_expired = true;
                log::info!("timer expired");
            }
            if !self.warning_fired && self.progress() < self.warning_progress {
                self.warning_fired = true;
                feedback.cue(Cue::LowTime);
            }
        }
        TimerSnapshot {
            time_left: self.time_left,
            progress: self.progress(),
            just_expired,
        }
    }
}
