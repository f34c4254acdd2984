use glam::{Quat, Vec3};
use slotmap::{new_key_type, SecondaryMap, SlotMap};

use super::ingredients::{IngredientKind, IngredientType};
use crate::sim::roasting::{PattySide, Roast};
use crate::sim::stack::{EntryPayload, IngredientData, Stack};

new_key_type! {
    /// Stable handle into the kitchen's entity storage. Generational index
    /// via SlotMap, safe to hold across insertions and removals.
    pub struct EntityId;
}

/// World-space transform reported by the physics collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub fn at(position: Vec3) -> Self {
        Self { position, rotation: Quat::IDENTITY }
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

/// Set once. Attached and Grounded never change again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachState {
    Free,
    Attached(EntityId),
    Grounded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Ingredient(IngredientType),
    /// A bottom bun carrying a stack.
    Stack,
}

#[derive(Clone, Debug)]
pub struct Ingredient {
    pub ingredient: IngredientType,
    pub state: AttachState,
    /// Present for patties only.
    pub roast: Option<Roast>,
}

impl Ingredient {
    pub fn is_free(&self) -> bool {
        self.state == AttachState::Free
    }
}

pub struct KitchenWorld {
    /// Primary storage: entity → kind.
    kinds: SlotMap<EntityId, EntityKind>,
    ingredients: SecondaryMap<EntityId, Ingredient>,
    stacks: SecondaryMap<EntityId, Stack>,
    poses: SecondaryMap<EntityId, Pose>,
    /// Entities currently in a player's hand.
    held: SecondaryMap<EntityId, ()>,
    /// Everything that has hit the floor, in landing order.
    grounded: Vec<EntityId>,
}

impl KitchenWorld {
    pub fn new() -> Self {
        Self {
            kinds: SlotMap::with_key(),
            ingredients: SecondaryMap::new(),
            stacks: SecondaryMap::new(),
            poses: SecondaryMap::new(),
            held: SecondaryMap::new(),
            grounded: Vec::new(),
        }
    }

    /// Spawn a loose ingredient. Bottom buns are stacks, so `BottomBun`
    /// returns `None`; use [`Self::spawn_stack`].
    pub fn spawn_ingredient(&mut self, ingredient: IngredientType, pose: Pose) -> Option<EntityId> {
        if ingredient == IngredientType::BottomBun {
            log::warn!("bottom buns are spawned as stacks");
            return None;
        }
        let entity = self.kinds.insert(EntityKind::Ingredient(ingredient));
        let roast = (ingredient.kind() == Some(IngredientKind::Patty)).then(Roast::new);
        self.ingredients.insert(entity, Ingredient { ingredient, state: AttachState::Free, roast });
        self.poses.insert(entity, pose);
        Some(entity)
    }

    /// Spawn a bottom bun that ingredients can bond to.
    pub fn spawn_stack(&mut self, pose: Pose, distance_threshold: f32) -> EntityId {
        let entity = self.kinds.insert(EntityKind::Stack);
        self.stacks.insert(entity, Stack::new(distance_threshold));
        self.poses.insert(entity, pose);
        entity
    }

    /// Remove an entity. A stack takes every ingredient bonded to it along.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        if self.kinds.remove(entity).is_none() {
            return false;
        }
        self.ingredients.remove(entity);
        self.poses.remove(entity);
        self.held.remove(entity);
        self.grounded.retain(|&e| e != entity);
        if self.stacks.remove(entity).is_some() {
            let bonded: Vec<EntityId> = self
                .ingredients
                .iter()
                .filter(|(_, i)| i.state == AttachState::Attached(entity))
                .map(|(id, _)| id)
                .collect();
            for id in bonded {
                self.despawn(id);
            }
        }
        true
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.kinds.contains_key(entity)
    }

    pub fn kind(&self, entity: EntityId) -> Option<EntityKind> {
        self.kinds.get(entity).copied()
    }

    pub fn ingredient(&self, entity: EntityId) -> Option<&Ingredient> {
        self.ingredients.get(entity)
    }

    pub fn ingredient_mut(&mut self, entity: EntityId) -> Option<&mut Ingredient> {
        self.ingredients.get_mut(entity)
    }

    pub fn stack(&self, entity: EntityId) -> Option<&Stack> {
        self.stacks.get(entity)
    }

    pub fn stack_mut(&mut self, entity: EntityId) -> Option<&mut Stack> {
        self.stacks.get_mut(entity)
    }

    pub fn pose(&self, entity: EntityId) -> Option<Pose> {
        self.poses.get(entity).copied()
    }

    /// Physics collaborator pushes the latest transform here.
    pub fn set_pose(&mut self, entity: EntityId, pose: Pose) {
        if let Some(p) = self.poses.get_mut(entity) {
            *p = pose;
        }
    }

    /// Grab/release from the input collaborator.
    pub fn set_held(&mut self, entity: EntityId, held: bool) {
        if !self.contains(entity) {
            return;
        }
        if held {
            self.held.insert(entity, ());
        } else {
            self.held.remove(entity);
        }
    }

    pub fn is_held(&self, entity: EntityId) -> bool {
        self.held.contains_key(entity)
    }

    /// Settle an entity on the floor at `ground_height`: upright, not
    /// interactive, and only counted by the dirtiness metric.
    pub(crate) fn ground(&mut self, entity: EntityId, ground_height: f32) {
        if let Some(pose) = self.poses.get_mut(entity) {
            pose.position.y = ground_height;
            pose.rotation = Quat::IDENTITY;
        }
        if let Some(ingredient) = self.ingredients.get_mut(entity) {
            ingredient.state = AttachState::Grounded;
            if let Some(roast) = ingredient.roast.as_mut() {
                roast.set_on_pan(PattySide::Top, false);
                roast.set_on_pan(PattySide::Bottom, false);
            }
        }
        if let Some(stack) = self.stacks.get_mut(entity) {
            stack.state = crate::sim::stack::StackState::Grounded;
        }
        self.held.remove(entity);
        self.grounded.push(entity);
    }

    /// Entities lying on the floor, in landing order.
    pub fn grounded(&self) -> &[EntityId] {
        &self.grounded
    }

    /// Pan enter/exit for one face of a patty. Ignored for anything else.
    pub fn set_on_pan(&mut self, patty: EntityId, side: PattySide, on_pan: bool) {
        let Some(ingredient) = self.ingredients.get_mut(patty) else {
            return;
        };
        if ingredient.state == AttachState::Grounded {
            return;
        }
        if let Some(roast) = ingredient.roast.as_mut() {
            roast.set_on_pan(side, on_pan);
        }
    }

    /// Advance every patty on a pan.
    pub fn tick_roasting(&mut self, dt: f32, burnt_seconds: f32) {
        for (_, ingredient) in self.ingredients.iter_mut() {
            if let Some(roast) = ingredient.roast.as_mut() {
                roast.tick(dt, burnt_seconds);
            }
        }
    }

    /// Frozen, scoring-ready copy of a stack's layers, bottom to top.
    pub fn stack_snapshot(&self, stack: EntityId) -> Option<Vec<IngredientData>> {
        let stack = self.stacks.get(stack)?;
        let snapshot = stack
            .entries()
            .iter()
            .map(|entry| match entry.payload {
                EntryPayload::Basic { placement } => IngredientData::basic(entry.ingredient, placement),
                EntryPayload::Topping { amount, .. } if entry.ingredient.is_sauce() => {
                    IngredientData::sauce(entry.ingredient, amount)
                }
                EntryPayload::Topping { amount, .. } => {
                    IngredientData::multi(entry.ingredient, entry.placement(), amount)
                }
                EntryPayload::Patty { placement } => {
                    let roast = self
                        .ingredients
                        .get(entry.entity)
                        .and_then(|i| i.roast)
                        .unwrap_or_default();
                    IngredientData::patty(placement, roast.cook_time(), roast.cook_delta())
                }
            })
            .collect();
        Some(snapshot)
    }
}

impl Default for KitchenWorld {
    fn default() -> Self {
        Self::new()
    }
}
