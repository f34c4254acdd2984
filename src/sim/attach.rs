use glam::{Quat, Vec3};

use crate::feedback::{Cue, Feedback};
use crate::game::config::EngineConfig;
use crate::game::world::{AttachState, EntityId, EntityKind, KitchenWorld, Pose};
use crate::geometry::{distance_to_axis, is_flat};
use crate::sim::stack::AttachmentResult;

/// Classified surface the subject touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    Stack,
    Ground,
    Trash,
}

/// Contact reported by the physics collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactEvent {
    /// The ingredient or stack that moved into contact.
    pub subject: EntityId,
    /// What it touched, when that is an entity (the stack for `Surface::Stack`).
    pub other: Option<EntityId>,
    pub surface: Surface,
    /// Subject position at the moment of contact.
    pub position: Vec3,
    pub other_position: Vec3,
    pub other_orientation: Quat,
}

impl ContactEvent {
    pub fn stack(subject: EntityId, stack: EntityId, position: Vec3, stack_pose: Pose) -> Self {
        Self {
            subject,
            other: Some(stack),
            surface: Surface::Stack,
            position,
            other_position: stack_pose.position,
            other_orientation: stack_pose.rotation,
        }
    }

    pub fn ground(subject: EntityId, position: Vec3, ground_height: f32) -> Self {
        Self {
            subject,
            other: None,
            surface: Surface::Ground,
            position,
            other_position: Vec3::new(position.x, ground_height, position.z),
            other_orientation: Quat::IDENTITY,
        }
    }

    pub fn trash(subject: EntityId, position: Vec3) -> Self {
        Self {
            subject,
            other: None,
            surface: Surface::Trash,
            position,
            other_position: position,
            other_orientation: Quat::IDENTITY,
        }
    }
}

/// Why a contact did not change anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Already attached or grounded. Duplicate contacts land here.
    AlreadySettled,
    /// In the player's hand. The next contact after release may succeed.
    Held,
    UnknownSubject,
    /// Stack contact without a live stack on the other side.
    UnknownTarget,
    /// Stacks do not bond to stacks.
    NotAnIngredient,
    StackGrounded,
    NotFlat,
    TooFarFromCenter,
    BelowStack,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactOutcome {
    Attached { stack: EntityId, result: AttachmentResult },
    Grounded,
    Trashed,
    Rejected(Rejection),
}

impl ContactOutcome {
    pub fn attachment(&self) -> AttachmentResult {
        match self {
            Self::Attached { result, .. } => *result,
            _ => AttachmentResult::default(),
        }
    }
}

/// Where a held ingredient would land if released now.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropPreview {
    pub distance: f32,
    pub height: f32,
    pub within_radius: bool,
}

/// Decides what each contact event does to the kitchen.
#[derive(Clone, Copy, Debug)]
pub struct Attacher {
    flat_epsilon: f32,
    log_contacts: bool,
}

impl Attacher {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            flat_epsilon: config.stack.flat_epsilon,
            log_contacts: config.debug.log_contacts,
        }
    }

    pub fn handle(
        &self,
        world: &mut KitchenWorld,
        event: &ContactEvent,
        feedback: &mut dyn Feedback,
    ) -> ContactOutcome {
        let outcome = match event.surface {
            Surface::Stack => self.bond(world, event, feedback),
            Surface::Ground => Self::land(world, event, feedback),
            Surface::Trash => Self::discard(world, event),
        };
        if let ContactOutcome::Rejected(reason) = outcome {
            // Duplicates are routine.
            if reason != Rejection::AlreadySettled {
                if self.log_contacts {
                    log::info!("contact {:?} on {:?} rejected: {reason:?}", event.subject, event.surface);
                } else {
                    log::debug!("contact {:?} on {:?} rejected: {reason:?}", event.subject, event.surface);
                }
            }
        }
        outcome
    }

    /// Free → Attached. Checks run in a fixed order and the first failure wins.
    fn bond(&self, world: &mut KitchenWorld, event: &ContactEvent, feedback: &mut dyn Feedback) -> ContactOutcome {
        let ingredient = match world.kind(event.subject) {
            Some(EntityKind::Ingredient(ingredient)) => ingredient,
            Some(EntityKind::Stack) => return ContactOutcome::Rejected(Rejection::NotAnIngredient),
            None => {
                log::warn!("contact from unknown entity {:?}", event.subject);
                return ContactOutcome::Rejected(Rejection::UnknownSubject);
            }
        };
        if !world.ingredient(event.subject).is_some_and(|i| i.is_free()) {
            return ContactOutcome::Rejected(Rejection::AlreadySettled);
        }
        if world.is_held(event.subject) {
            return ContactOutcome::Rejected(Rejection::Held);
        }
        let Some((stack_id, stack)) = event.other.and_then(|id| world.stack(id).map(|s| (id, s))) else {
            log::warn!("{:?} touched a stack surface with no stack behind it", event.subject);
            return ContactOutcome::Rejected(Rejection::UnknownTarget);
        };
        if stack.is_grounded() {
            return ContactOutcome::Rejected(Rejection::StackGrounded);
        }
        let up = event.other_orientation * Vec3::Y;
        if !is_flat(up, self.flat_epsilon) {
            return ContactOutcome::Rejected(Rejection::NotFlat);
        }
        let distance = distance_to_axis(event.position, event.other_position, up);
        let radius = stack.valid_drop_radius(ingredient.is_topping());
        if distance >= radius {
            return ContactOutcome::Rejected(Rejection::TooFarFromCenter);
        }
        if event.position.y < event.other_position.y {
            return ContactOutcome::Rejected(Rejection::BelowStack);
        }

        let placement = distance / radius;
        let Some(stack) = world.stack_mut(stack_id) else {
            return ContactOutcome::Rejected(Rejection::UnknownTarget);
        };
        let result = stack.commit(event.subject, ingredient, placement);
        if !result.accepted {
            return ContactOutcome::Rejected(Rejection::NotAnIngredient);
        }
        if let Some(i) = world.ingredient_mut(event.subject) {
            i.state = AttachState::Attached(stack_id);
        }
        world.set_pose(event.subject, Pose::at(event.position));

        if !ingredient.is_sauce() {
            feedback.cue(Cue::IngredientPlaced(ingredient));
        }
        log::debug!(
            "{} bonded to {stack_id:?} at placement {placement:.3} (merged: {:?})",
            ingredient.display_name(),
            result.merged_into
        );
        ContactOutcome::Attached { stack: stack_id, result }
    }

    /// Free → Grounded, for ingredients and whole stacks alike.
    fn land(world: &mut KitchenWorld, event: &ContactEvent, feedback: &mut dyn Feedback) -> ContactOutcome {
        let sauce = match world.kind(event.subject) {
            Some(EntityKind::Ingredient(ingredient)) => {
                if !world.ingredient(event.subject).is_some_and(|i| i.is_free()) {
                    return ContactOutcome::Rejected(Rejection::AlreadySettled);
                }
                ingredient.is_sauce()
            }
            Some(EntityKind::Stack) => {
                if world.stack(event.subject).is_some_and(|s| s.is_grounded()) {
                    return ContactOutcome::Rejected(Rejection::AlreadySettled);
                }
                false
            }
            None => {
                log::warn!("ground contact from unknown entity {:?}", event.subject);
                return ContactOutcome::Rejected(Rejection::UnknownSubject);
            }
        };
        world.set_pose(event.subject, Pose::at(event.position));
        world.ground(event.subject, event.other_position.y);
        if !sauce {
            feedback.cue(Cue::Dropped);
        }
        ContactOutcome::Grounded
    }

    /// Thrown in the bin: free ingredients and live stacks disappear.
    fn discard(world: &mut KitchenWorld, event: &ContactEvent) -> ContactOutcome {
        let settled = match world.kind(event.subject) {
            Some(EntityKind::Ingredient(_)) => !world.ingredient(event.subject).is_some_and(|i| i.is_free()),
            Some(EntityKind::Stack) => world.stack(event.subject).is_some_and(|s| s.is_grounded()),
            None => return ContactOutcome::Rejected(Rejection::UnknownSubject),
        };
        if settled {
            return ContactOutcome::Rejected(Rejection::AlreadySettled);
        }
        world.despawn(event.subject);
        ContactOutcome::Trashed
    }

    /// Distance guide for a held ingredient hovering over a stack. `None`
    /// when either entity is missing or the stack is not usable.
    pub fn preview(&self, world: &KitchenWorld, ingredient: EntityId, stack: EntityId) -> Option<DropPreview> {
        let Some(EntityKind::Ingredient(kind)) = world.kind(ingredient) else {
            return None;
        };
        let target = world.stack(stack)?;
        if target.is_grounded() {
            return None;
        }
        let held = world.pose(ingredient)?;
        let base = world.pose(stack)?;
        if !is_flat(base.up(), self.flat_epsilon) {
            return None;
        }
        let distance = distance_to_axis(held.position, base.position, base.up());
        Some(DropPreview {
            distance,
            height: held.position.distance(base.position),
            within_radius: distance <= target.valid_drop_radius(kind.is_topping()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::CueLog;
    use crate::game::ingredients::IngredientType;
    use crate::sim::stack::EntryPayload;

    const THRESHOLD: f32 = 0.1;

    fn setup() -> (KitchenWorld, Attacher, EntityId, Pose) {
        let mut world = KitchenWorld::new();
        let pose = Pose::at(Vec3::ZERO);
        let stack = world.spawn_stack(pose, THRESHOLD);
        (world, Attacher::new(&EngineConfig::default()), stack, pose)
    }

    fn drop_on(
        world: &mut KitchenWorld,
        attacher: &Attacher,
        ingredient: IngredientType,
        stack: EntityId,
        stack_pose: Pose,
        offset: f32,
    ) -> (EntityId, ContactOutcome) {
        let at = Vec3::new(offset, 0.05, 0.0);
        let id = world.spawn_ingredient(ingredient, Pose::at(at)).unwrap();
        let outcome = attacher.handle(world, &ContactEvent::stack(id, stack, at, stack_pose), &mut CueLog::default());
        (id, outcome)
    }

    #[test]
    fn test_centered_basic_attaches() {
        let (mut world, attacher, stack, pose) = setup();
        let (cheese, outcome) = drop_on(&mut world, &attacher, IngredientType::Cheese, stack, pose, 0.025);
        assert_eq!(outcome.attachment(), AttachmentResult { accepted: true, merged_into: None });
        assert_eq!(world.ingredient(cheese).unwrap().state, AttachState::Attached(stack));
        let entry = world.stack(stack).unwrap().entries()[0];
        // 0.025 / (0.1 * 0.5)
        assert!((entry.placement() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_duplicate_contact_is_noop() {
        let (mut world, attacher, stack, pose) = setup();
        let (cheese, _) = drop_on(&mut world, &attacher, IngredientType::Cheese, stack, pose, 0.0);
        let again = attacher.handle(
            &mut world,
            &ContactEvent::stack(cheese, stack, Vec3::new(0.0, 0.05, 0.0), pose),
            &mut CueLog::default(),
        );
        assert_eq!(again, ContactOutcome::Rejected(Rejection::AlreadySettled));
        assert_eq!(world.stack(stack).unwrap().len(), 1);
    }

    #[test]
    fn test_held_ingredient_is_deferred() {
        let (mut world, attacher, stack, pose) = setup();
        let at = Vec3::new(0.0, 0.05, 0.0);
        let salad = world.spawn_ingredient(IngredientType::Salad, Pose::at(at)).unwrap();
        world.set_held(salad, true);
        let event = ContactEvent::stack(salad, stack, at, pose);
        let mut cues = CueLog::default();
        assert_eq!(attacher.handle(&mut world, &event, &mut cues), ContactOutcome::Rejected(Rejection::Held));
        world.set_held(salad, false);
        assert!(attacher.handle(&mut world, &event, &mut cues).attachment().accepted);
        assert_eq!(cues.count(Cue::IngredientPlaced(IngredientType::Salad)), 1);
    }

    #[test]
    fn test_tilted_stack_rejects_then_accepts_when_flat() {
        let (mut world, attacher, stack, _) = setup();
        let tilted = Pose { position: Vec3::ZERO, rotation: Quat::from_rotation_x(0.3) };
        let at = Vec3::new(0.0, 0.05, 0.0);
        let onion = world.spawn_ingredient(IngredientType::Onion, Pose::at(at)).unwrap();
        let rejected = attacher.handle(&mut world, &ContactEvent::stack(onion, stack, at, tilted), &mut CueLog::default());
        assert_eq!(rejected, ContactOutcome::Rejected(Rejection::NotFlat));
        assert!(world.ingredient(onion).unwrap().is_free());
        let flat = Pose::at(Vec3::ZERO);
        let accepted = attacher.handle(&mut world, &ContactEvent::stack(onion, stack, at, flat), &mut CueLog::default());
        assert!(accepted.attachment().accepted);
    }

    #[test]
    fn test_radius_depends_on_topping() {
        let (mut world, attacher, stack, pose) = setup();
        // 0.07 is outside the basic radius (0.05) but inside the topping radius (0.09).
        let (_, basic) = drop_on(&mut world, &attacher, IngredientType::Cheese, stack, pose, 0.07);
        assert_eq!(basic, ContactOutcome::Rejected(Rejection::TooFarFromCenter));
        let (_, topping) = drop_on(&mut world, &attacher, IngredientType::Pickle, stack, pose, 0.07);
        assert!(topping.attachment().accepted);
        let (_, edge) = drop_on(&mut world, &attacher, IngredientType::Pickle, stack, pose, 0.095);
        assert_eq!(edge, ContactOutcome::Rejected(Rejection::TooFarFromCenter));
    }

    #[test]
    fn test_below_stack_rejected() {
        let (mut world, attacher, stack, _) = setup();
        let raised = Pose::at(Vec3::new(0.0, 1.0, 0.0));
        let at = Vec3::new(0.0, 0.99, 0.0);
        let salad = world.spawn_ingredient(IngredientType::Salad, Pose::at(at)).unwrap();
        let outcome = attacher.handle(&mut world, &ContactEvent::stack(salad, stack, at, raised), &mut CueLog::default());
        assert_eq!(outcome, ContactOutcome::Rejected(Rejection::BelowStack));
    }

    #[test]
    fn test_toppings_merge_with_mean_placement() {
        let (mut world, attacher, stack, pose) = setup();
        let (first, a) = drop_on(&mut world, &attacher, IngredientType::Tomato, stack, pose, 0.009);
        let (second, b) = drop_on(&mut world, &attacher, IngredientType::Tomato, stack, pose, 0.027);
        assert_eq!(a.attachment().merged_into, None);
        assert_eq!(b.attachment().merged_into, Some(0));
        assert_eq!(world.ingredient(second).unwrap().state, AttachState::Attached(stack));

        let s = world.stack(stack).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.entries()[0].entity, first);
        match s.entries()[0].payload {
            EntryPayload::Topping { amount, .. } => assert_eq!(amount, 2),
            other => panic!("expected topping payload, got {other:?}"),
        }
        // (0.1 + 0.3) / 2
        assert!((s.entries()[0].placement() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_unknown_stack_target_ignored() {
        let (mut world, attacher, _, pose) = setup();
        let at = Vec3::new(0.0, 0.05, 0.0);
        let cheese = world.spawn_ingredient(IngredientType::Cheese, Pose::at(at)).unwrap();
        let other = world.spawn_ingredient(IngredientType::Salad, Pose::default()).unwrap();
        let mut event = ContactEvent::stack(cheese, other, at, pose);
        let mut cues = CueLog::default();
        assert_eq!(attacher.handle(&mut world, &event, &mut cues), ContactOutcome::Rejected(Rejection::UnknownTarget));
        event.other = None;
        assert_eq!(attacher.handle(&mut world, &event, &mut cues), ContactOutcome::Rejected(Rejection::UnknownTarget));
        assert!(cues.cues.is_empty());
    }

    #[test]
    fn test_ground_contact_settles_ingredient() {
        let (mut world, attacher, stack, pose) = setup();
        let at = Vec3::new(2.0, 0.4, 1.0);
        let cheese = world.spawn_ingredient(IngredientType::Cheese, Pose::at(at)).unwrap();
        let mut cues = CueLog::default();
        assert_eq!(attacher.handle(&mut world, &ContactEvent::ground(cheese, at, -0.5), &mut cues), ContactOutcome::Grounded);
        assert_eq!(world.pose(cheese).unwrap().position, Vec3::new(2.0, -0.5, 1.0));
        assert_eq!(cues.count(Cue::Dropped), 1);

        // Grounded is terminal: no bonding afterwards.
        let late = attacher.handle(&mut world, &ContactEvent::stack(cheese, stack, Vec3::new(0.0, 0.05, 0.0), pose), &mut cues);
        assert_eq!(late, ContactOutcome::Rejected(Rejection::AlreadySettled));
    }

    #[test]
    fn test_grounded_stack_keeps_layers() {
        let (mut world, attacher, stack, pose) = setup();
        drop_on(&mut world, &attacher, IngredientType::Cheese, stack, pose, 0.0);
        let outcome = attacher.handle(&mut world, &ContactEvent::ground(stack, Vec3::new(0.0, 0.3, 0.0), 0.0), &mut CueLog::default());
        assert_eq!(outcome, ContactOutcome::Grounded);
        let s = world.stack(stack).unwrap();
        assert!(s.is_grounded());
        assert_eq!(s.len(), 1);

        let (_, late) = drop_on(&mut world, &attacher, IngredientType::Salad, stack, pose, 0.0);
        assert_eq!(late, ContactOutcome::Rejected(Rejection::StackGrounded));
    }

    #[test]
    fn test_sauce_drops_are_quiet() {
        let (mut world, attacher, stack, pose) = setup();
        let at = Vec3::new(0.0, 0.05, 0.0);
        let sauce = world.spawn_ingredient(IngredientType::SauceYellow, Pose::at(at)).unwrap();
        let mut cues = CueLog::default();
        attacher.handle(&mut world, &ContactEvent::stack(sauce, stack, at, pose), &mut cues);
        let spilled = world.spawn_ingredient(IngredientType::SauceYellow, Pose::at(at)).unwrap();
        attacher.handle(&mut world, &ContactEvent::ground(spilled, at, 0.0), &mut cues);
        assert!(cues.cues.is_empty());
    }

    #[test]
    fn test_trash_removes_stack_and_layers() {
        let (mut world, attacher, stack, pose) = setup();
        let (cheese, _) = drop_on(&mut world, &attacher, IngredientType::Cheese, stack, pose, 0.0);
        let outcome = attacher.handle(&mut world, &ContactEvent::trash(stack, Vec3::ZERO), &mut CueLog::default());
        assert_eq!(outcome, ContactOutcome::Trashed);
        assert!(!world.contains(stack));
        assert!(!world.contains(cheese));
    }

    #[test]
    fn test_attached_ingredient_cannot_be_trashed() {
        let (mut world, attacher, stack, pose) = setup();
        let (cheese, _) = drop_on(&mut world, &attacher, IngredientType::Cheese, stack, pose, 0.0);
        let outcome = attacher.handle(&mut world, &ContactEvent::trash(cheese, Vec3::ZERO), &mut CueLog::default());
        assert_eq!(outcome, ContactOutcome::Rejected(Rejection::AlreadySettled));
        assert!(world.contains(cheese));
    }

    #[test]
    fn test_preview_reports_distance_guide() {
        let (mut world, attacher, stack, _) = setup();
        let patty = world.spawn_ingredient(IngredientType::Patty, Pose::at(Vec3::new(0.018, 0.4, 0.024))).unwrap();
        let preview = attacher.preview(&world, patty, stack).unwrap();
        assert!((preview.distance - 0.03).abs() < 1e-5);
        assert!(preview.within_radius);

        world.set_pose(patty, Pose::at(Vec3::new(0.06, 0.4, 0.0)));
        assert!(!attacher.preview(&world, patty, stack).unwrap().within_radius);

        world.set_pose(stack, Pose { position: Vec3::ZERO, rotation: Quat::from_rotation_z(0.5) });
        assert!(attacher.preview(&world, patty, stack).is_none());
    }
}
