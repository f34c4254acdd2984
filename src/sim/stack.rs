use smallvec::SmallVec;

use crate::game::ingredients::{IngredientKind, IngredientType};
use crate::game::world::EntityId;

/// Fraction of the distance threshold a basic ingredient or patty may land
/// off-center and still bond.
pub const BASIC_DROP_FRACTION: f32 = 0.5;

/// Same for toppings, which are small and spread out anyway.
pub const TOPPING_DROP_FRACTION: f32 = 0.9;

/// Per-layer data recorded when an ingredient bonds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EntryPayload {
    /// Top bun, salad, cheese.
    Basic { placement: f32 },
    /// Multi ingredients and sauces. The placement is summed over every
    /// merged piece and only averaged when read.
    Topping { amount: u32, placement_sum: f32 },
    /// Cook state stays on the patty entity and is read at snapshot time.
    Patty { placement: f32 },
}

/// One layer of a stack. `entity` is the ingredient that opened the layer;
/// pieces merged in later keep their own entities but add no new layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackEntry {
    pub entity: EntityId,
    pub ingredient: IngredientType,
    pub payload: EntryPayload,
}

impl StackEntry {
    /// Mean placement over all pieces in this layer.
    pub fn placement(&self) -> f32 {
        match self.payload {
            EntryPayload::Basic { placement } | EntryPayload::Patty { placement } => placement,
            EntryPayload::Topping { amount, placement_sum } => placement_sum / amount.max(1) as f32,
        }
    }

    pub fn amount(&self) -> u32 {
        match self.payload {
            EntryPayload::Topping { amount, .. } => amount,
            _ => 1,
        }
    }
}

/// Outcome of a contact as seen by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AttachmentResult {
    pub accepted: bool,
    /// Layer index the ingredient was merged into, if it did not open a new one.
    pub merged_into: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackState {
    Active,
    /// Fell on the floor. Keeps its layers but accepts nothing new.
    Grounded,
}

/// A bottom bun and everything bonded to it, bottom to top.
#[derive(Clone, Debug)]
pub struct Stack {
    entries: SmallVec<[StackEntry; 8]>,
    distance_threshold: f32,
    pub state: StackState,
}

impl Stack {
    pub fn new(distance_threshold: f32) -> Self {
        Self {
            entries: SmallVec::new(),
            distance_threshold,
            state: StackState::Active,
        }
    }

    /// Maximum lateral offset from the center axis at which an ingredient bonds.
    pub fn valid_drop_radius(&self, is_topping: bool) -> f32 {
        let fraction = if is_topping { TOPPING_DROP_FRACTION } else { BASIC_DROP_FRACTION };
        self.distance_threshold * fraction
    }

    pub fn entries(&self) -> &[StackEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_grounded(&self) -> bool {
        self.state == StackState::Grounded
    }

    /// Record a bonded ingredient. Toppings merge into the top layer when it
    /// has the same type; everything else opens a new layer.
    pub fn commit(&mut self, entity: EntityId, ingredient: IngredientType, placement: f32) -> AttachmentResult {
        let Some(kind) = ingredient.kind() else {
            log::warn!("refusing to layer {ingredient:?} onto a stack");
            return AttachmentResult::default();
        };

        if ingredient.is_topping() {
            let top = self.entries.len().checked_sub(1);
            if let Some(idx) = top {
                let last = &mut self.entries[idx];
                if last.ingredient == ingredient {
                    if let EntryPayload::Topping { amount, placement_sum } = &mut last.payload {
                        *amount += 1;
                        *placement_sum += placement;
                        return AttachmentResult { accepted: true, merged_into: Some(idx) };
                    }
                }
            }
        }

        let payload = match kind {
            IngredientKind::Basic => EntryPayload::Basic { placement },
            IngredientKind::Multi | IngredientKind::Sauce => {
                EntryPayload::Topping { amount: 1, placement_sum: placement }
            }
            IngredientKind::Patty => EntryPayload::Patty { placement },
        };
        self.entries.push(StackEntry { entity, ingredient, payload });
        AttachmentResult { accepted: true, merged_into: None }
    }
}

/// Frozen, scoring-ready description of one layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IngredientData {
    pub ingredient: IngredientType,
    pub detail: IngredientDetail,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IngredientDetail {
    Basic { placement: f32 },
    Multi { placement: f32, amount: u32 },
    Patty { placement: f32, cook_time: f32, cook_delta: f32 },
    Sauce { amount: u32 },
}

impl IngredientData {
    pub fn basic(ingredient: IngredientType, placement: f32) -> Self {
        Self { ingredient, detail: IngredientDetail::Basic { placement } }
    }

    pub fn multi(ingredient: IngredientType, placement: f32, amount: u32) -> Self {
        Self { ingredient, detail: IngredientDetail::Multi { placement, amount } }
    }

    pub fn patty(placement: f32, cook_time: f32, cook_delta: f32) -> Self {
        Self {
            ingredient: IngredientType::Patty,
            detail: IngredientDetail::Patty { placement, cook_time, cook_delta },
        }
    }

    pub fn sauce(ingredient: IngredientType, amount: u32) -> Self {
        Self { ingredient, detail: IngredientDetail::Sauce { amount } }
    }
}
