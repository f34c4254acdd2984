use crate::game::world::{EntityKind, KitchenWorld};

/// Weight of one spilled sauce particle relative to a whole ingredient.
pub const SAUCE_SPILL_WEIGHT: f32 = 0.01;

/// Floor tally: ordinary items (whole stacks included) and sauce particles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FloorTally {
    pub ingredients: u32,
    pub sauce: u32,
}

impl FloorTally {
    pub fn count(world: &KitchenWorld) -> Self {
        let mut tally = Self::default();
        for &entity in world.grounded() {
            match world.kind(entity) {
                Some(EntityKind::Ingredient(ingredient)) if ingredient.is_sauce() => tally.sauce += 1,
                Some(_) => tally.ingredients += 1,
                None => {}
            }
        }
        tally
    }

    pub fn weighted(&self) -> f32 {
        self.ingredients as f32 + self.sauce as f32 * SAUCE_SPILL_WEIGHT
    }
}

/// How messy the kitchen floor is, in [0, 1].
pub fn dirtiness(world: &KitchenWorld, threshold: f32) -> f32 {
    if threshold <= 0.0 {
        return 1.0;
    }
    (FloorTally::count(world).weighted() / threshold).clamp(0.0, 1.0)
}
