use crate::game::ingredients::IngredientType;

/// Something the presentation layer may want to play or show. The engine
/// only emits cues; audio and visuals live with the collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cue {
    /// An ingredient bonded to a stack.
    IngredientPlaced(IngredientType),
    /// An ingredient or stack hit the floor.
    Dropped,
    /// The serving bell was rung, with or without anything to evaluate.
    Bell,
    /// Hell's Kitchen: the delivered burger fell below the quality bar.
    Penalty,
    /// Less than the warning fraction of the countdown is left.
    LowTime,
    GameOver,
}

/// Sink for [`Cue`]s, passed into the systems that produce them.
pub trait Feedback {
    fn cue(&mut self, cue: Cue);
}

/// Discards every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl Feedback for Silent {
    fn cue(&mut self, _cue: Cue) {}
}

/// Keeps every cue in order. Used by tests and the headless demo.
#[derive(Clone, Debug, Default)]
pub struct CueLog {
    pub cues: Vec<Cue>,
}

impl CueLog {
    pub fn count(&self, cue: Cue) -> usize {
        self.cues.iter().filter(|&&c| c == cue).count()
    }
}

impl Feedback for CueLog {
    fn cue(&mut self, cue: Cue) {
        log::trace!("cue {cue:?}");
        self.cues.push(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_log_counts() {
        let mut log = CueLog::default();
        log.cue(Cue::Bell);
        log.cue(Cue::Bell);
        log.cue(Cue::Dropped);
        assert_eq!(log.count(Cue::Bell), 2);
        assert_eq!(log.count(Cue::GameOver), 0);
    }
}
