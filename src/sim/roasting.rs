/// Which face of a patty is touching the pan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PattySide {
    Top,
    Bottom,
}

impl PattySide {
    fn index(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Bottom => 1,
        }
    }
}

/// Coarse doneness for display, relative to a target window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoastStage {
    Raw,
    Cooked,
    Overcooked,
    Burnt,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct RoastHalf {
    seconds: f32,
    on_pan: bool,
}

/// Two independently tracked roast timers, one per patty face.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Roast {
    halves: [RoastHalf; 2],
}

impl Roast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pan enter/exit for one face.
    pub fn set_on_pan(&mut self, side: PattySide, on_pan: bool) {
        self.halves[side.index()].on_pan = on_pan;
    }

    pub fn is_roasting(&self) -> bool {
        self.halves.iter().any(|h| h.on_pan)
    }

    pub fn seconds(&self, side: PattySide) -> f32 {
        self.halves[side.index()].seconds
    }

    /// Advance every face that is on the pan. A face that reaches
    /// `burnt_seconds` comes off the heat until it is put back.
    pub fn tick(&mut self, dt: f32, burnt_seconds: f32) {
        for half in &mut self.halves {
            if !half.on_pan {
                continue;
            }
            half.seconds += dt;
            if half.seconds >= burnt_seconds {
                half.on_pan = false;
            }
        }
    }

    /// Mean roast time of both faces.
    pub fn cook_time(&self) -> f32 {
        (self.halves[0].seconds + self.halves[1].seconds) / 2.0
    }

    /// How unevenly the two faces are cooked.
    pub fn cook_delta(&self) -> f32 {
        (self.halves[0].seconds - self.halves[1].seconds).abs()
    }

    pub fn stage(&self, window_start: f32, window_end: f32, burnt_seconds: f32) -> RoastStage {
        let t = self.cook_time();
        if t < window_start {
            RoastStage::Raw
        } else if t <= window_end {
            RoastStage::Cooked
        } else if t < burnt_seconds {
            RoastStage::Overcooked
        } else {
            RoastStage::Burnt
        }
    }
}
