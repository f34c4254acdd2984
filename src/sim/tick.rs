/// Fixed simulation rate: 60 updates per second.
pub const SIM_DT: f32 = 1.0 / 60.0;

/// Maximum frame time to prevent spiral of death.
/// If a frame takes longer than this, we cap the accumulated time.
const MAX_FRAME_TIME: f32 = 0.25;

/// Turns variable frame times into whole fixed-size kitchen ticks, so
/// roasting and the countdown advance the same way at any frame rate.
#[derive(Clone, Debug, Default)]
pub struct KitchenClock {
    accumulator: f32,
    pub sim_tick: u64,
}

impl KitchenClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate frame time and return how many sim ticks should run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_TIME);

        let mut ticks = 0u32;
        while self.accumulator >= SIM_DT {
            self.accumulator -= SIM_DT;
            self.sim_tick += 1;
            ticks += 1;
        }
        ticks
    }
}
