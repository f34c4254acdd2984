use crate::game::config::SessionConfig;
use crate::game::orders::{Order, OrderBoard, OrderId};

/// Pins a randomly chosen catalogue order on the board every
/// `spawn_interval` seconds. The first attempt happens on the first tick.
/// An attempt that finds the board full is skipped and does not count
/// toward the cap.
pub struct OrderSpawner {
    catalogue: Vec<Order>,
    interval: f32,
    /// `None` spawns for as long as the session runs.
    cap: Option<u32>,
    spawned: u32,
    until_next: f32,
    rng: fastrand::Rng,
}

impl OrderSpawner {
    pub fn new(catalogue: Vec<Order>, config: &SessionConfig, unlimited: bool) -> Self {
        let rng = if let Some(s) = config.order_seed {
            fastrand::Rng::with_seed(s)
        } else {
            fastrand::Rng::new()
        };
        if catalogue.is_empty() {
            log::warn!("order catalogue is empty, no orders will be issued");
        }
        Self {
            catalogue,
            interval: config.spawn_interval,
            cap: (!unlimited).then_some(config.spawn_cap),
            spawned: 0,
            until_next: 0.0,
            rng,
        }
    }

    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    /// No more orders will ever be issued.
    pub fn is_exhausted(&self) -> bool {
        self.catalogue.is_empty() || self.cap.is_some_and(|cap| self.spawned >= cap)
    }

    /// Advance the interval. Returns the order posted on this tick, if any.
    pub fn tick(&mut self, dt: f32, board: &mut OrderBoard) -> Option<OrderId> {
        if self.is_exhausted() {
            return None;
        }
        if self.until_next > 0.0 {
            self.until_next -= dt;
            return None;
        }
        self.until_next += self.interval.max(0.0) - dt;

        if board.free_slot().is_none() {
            log::debug!("order board full, skipping this round");
            return None;
        }
        let pick = self.rng.usize(..self.catalogue.len());
        let id = board.post(self.catalogue[pick].clone())?;
        self.spawned += 1;
        log::info!("issued order #{} (catalogue entry {pick})", self.spawned);
        Some(id)
    }
}
