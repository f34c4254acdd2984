use burgerstack::feedback::{Cue, CueLog, Feedback};
use burgerstack::game::config::EngineConfig;
use burgerstack::game::ingredients::IngredientType;
use burgerstack::game::orders::{Order, OrderEntry, OrderId, Ticket};
use burgerstack::game::world::{EntityId, KitchenWorld, Pose};
use burgerstack::sim::attach::{Attacher, ContactEvent};
use burgerstack::sim::roasting::PattySide;
use burgerstack::sim::session::{GameMode, Session};
use glam::Vec3;

/// Frame time the scripted shifts advance by.
const FRAME_DT: f32 = 1.0 / 30.0;

fn main() {
    env_logger::init();

    let config = EngineConfig::load();
    let mut cues = CueLog::default();

    standard_shift(&config, &mut cues);
    hells_kitchen_shift(&config, &mut cues);

    log::info!(
        "cues: {} placed, {} dropped, {} bells, {} penalties, {} game overs",
        cues.cues.iter().filter(|c| matches!(c, Cue::IngredientPlaced(_))).count(),
        cues.count(Cue::Dropped),
        cues.count(Cue::Bell),
        cues.count(Cue::Penalty),
        cues.count(Cue::GameOver),
    );
}

fn deluxe() -> Order {
    Order::new(vec![
        OrderEntry::basic(IngredientType::TopBun),
        OrderEntry::sauce(IngredientType::SauceRed),
        OrderEntry::basic(IngredientType::Cheese),
        OrderEntry::patty(2.5, 4.0),
        OrderEntry::multi(IngredientType::Tomato, 2),
        OrderEntry::basic(IngredientType::BottomBun),
    ])
    .with_ticket(Ticket {
        burger_name: "Deluxe".into(),
        burger_price: 8.5,
        taxes: 0.85,
        total_price: 9.35,
    })
}

fn quick() -> Order {
    Order::new(vec![
        OrderEntry::basic(IngredientType::TopBun),
        OrderEntry::multi(IngredientType::Pickle, 3),
        OrderEntry::basic(IngredientType::Salad),
        OrderEntry::basic(IngredientType::BottomBun),
    ])
}

/// Drop one ingredient onto the stack, `offset` away from its axis and just
/// above its base.
fn place(
    world: &mut KitchenWorld,
    attacher: &Attacher,
    stack: EntityId,
    ingredient: IngredientType,
    offset: Vec3,
    feedback: &mut dyn Feedback,
) -> Option<EntityId> {
    let stack_pose = world.pose(stack)?;
    let position = stack_pose.position + offset + Vec3::Y * 0.05;
    let id = world.spawn_ingredient(ingredient, Pose::at(position))?;
    let outcome = attacher.handle(world, &ContactEvent::stack(id, stack, position, stack_pose), feedback);
    if !outcome.attachment().accepted {
        log::debug!("{ingredient:?} missed the stack: {outcome:?}");
        world.despawn(id);
        return None;
    }
    Some(id)
}

/// Roast a patty on both faces, `per_side` seconds each.
fn roast(session: &mut Session, world: &mut KitchenWorld, patty: EntityId, per_side: f32, feedback: &mut dyn Feedback) {
    for side in [PattySide::Bottom, PattySide::Top] {
        world.set_on_pan(patty, side, true);
        let mut elapsed = 0.0;
        while elapsed < per_side {
            session.advance(FRAME_DT, world, feedback);
            elapsed += FRAME_DT;
        }
        world.set_on_pan(patty, side, false);
    }
}

/// Let kitchen time pass until the spawner has pinned an order.
fn wait_for_order(session: &mut Session, world: &mut KitchenWorld, feedback: &mut dyn Feedback) -> Option<OrderId> {
    loop {
        if let Some((id, _)) = session.board().iter().next() {
            return Some(id);
        }
        if session.is_game_over() || session.spawner().is_none_or(|s| s.is_exhausted()) {
            return None;
        }
        session.advance(FRAME_DT, world, feedback);
    }
}

fn standard_shift(config: &EngineConfig, feedback: &mut dyn Feedback) {
    let mut world = KitchenWorld::new();
    let mut session = Session::new(GameMode::Standard, config.clone()).with_catalogue(vec![deluxe()]);
    let attacher = Attacher::new(config);
    let threshold = config.stack.distance_threshold;

    let mut round = 0u32;
    while !session.is_game_over() {
        round += 1;
        let Some(order_id) = wait_for_order(&mut session, &mut world, feedback) else {
            log::warn!("no more orders coming");
            break;
        };
        if let Some(order) = session.board().get(order_id) {
            log::info!("new ticket:\n{}", order.receipt());
        }

        let stack = world.spawn_stack(Pose::at(Vec3::new(round as f32, 1.0, 0.0)), threshold);
        let wobble = 0.004 * round as f32;
        place(&mut world, &attacher, stack, IngredientType::Tomato, Vec3::new(wobble, 0.0, 0.0), feedback);
        place(&mut world, &attacher, stack, IngredientType::Tomato, Vec3::new(0.0, 0.0, wobble), feedback);

        if let Some(patty) = world.spawn_ingredient(IngredientType::Patty, Pose::default()) {
            roast(&mut session, &mut world, patty, 2.5 + 0.4 * round as f32, feedback);
            if let Some(stack_pose) = world.pose(stack) {
                let position = stack_pose.position + Vec3::Y * 0.06;
                world.set_pose(patty, Pose::at(position));
                attacher.handle(&mut world, &ContactEvent::stack(patty, stack, position, stack_pose), feedback);
            }
        }

        place(&mut world, &attacher, stack, IngredientType::Cheese, Vec3::ZERO, feedback);
        for drop in 0..400 {
            let angle = drop as f32 * 0.7;
            let offset = Vec3::new(angle.cos(), 0.0, angle.sin()) * 0.03;
            place(&mut world, &attacher, stack, IngredientType::SauceRed, offset, feedback);
        }
        place(&mut world, &attacher, stack, IngredientType::TopBun, Vec3::ZERO, feedback);

        // Something always ends up on the floor.
        if let Some(onion) = world.spawn_ingredient(IngredientType::Onion, Pose::at(Vec3::new(0.0, 0.8, 0.0))) {
            attacher.handle(&mut world, &ContactEvent::ground(onion, Vec3::new(0.0, 0.8, 0.0), 0.0), feedback);
        }

        session.area.register_stack(stack);
        session.area.register_order(order_id);
        match session.ring_bell(&mut world, feedback) {
            Ok(Some(record)) => log::info!("round {round}: {record}"),
            Ok(None) => log::warn!("round {round}: nothing was evaluated"),
            Err(e) => {
                log::error!("round {round}: {e}");
                break;
            }
        }
    }

    if let Some(summary) = session.take_summary() {
        log::info!("standard shift finished: {summary:?}");
    }
}

fn hells_kitchen_shift(config: &EngineConfig, feedback: &mut dyn Feedback) {
    let mut world = KitchenWorld::new();
    let mut session = Session::new(GameMode::HellsKitchen, config.clone()).with_catalogue(vec![quick()]);
    let attacher = Attacher::new(config);
    let threshold = config.stack.distance_threshold;

    let mut round = 0u32;
    while !session.is_game_over() {
        round += 1;
        let waiting = session.board().iter().next().map(|(id, _)| id);
        if let Some(order_id) = waiting {
            let stack = world.spawn_stack(Pose::at(Vec3::new(0.0, 1.0, round as f32)), threshold);
            place(&mut world, &attacher, stack, IngredientType::Salad, Vec3::ZERO, feedback);
            // Every other burger is missing its pickles.
            if round % 2 == 1 {
                for _ in 0..3 {
                    place(&mut world, &attacher, stack, IngredientType::Pickle, Vec3::ZERO, feedback);
                }
            }
            place(&mut world, &attacher, stack, IngredientType::TopBun, Vec3::ZERO, feedback);

            session.area.register_stack(stack);
            session.area.register_order(order_id);
        }

        // Assembly takes a couple of seconds of kitchen time.
        for _ in 0..60 {
            if session.advance(FRAME_DT, &mut world, feedback).is_some_and(|t| t.just_expired) {
                break;
            }
        }

        match session.ring_bell(&mut world, feedback) {
            Ok(Some(record)) => log::info!("round {round}: {record}"),
            Ok(None) => {}
            Err(e) => {
                log::error!("round {round}: {e}");
                break;
            }
        }
        if let Some(timer) = session.timer() {
            log::debug!("base {:.2}s, {:.2}s left", timer.base(), timer.time_left());
        }
    }

    if let Some(summary) = session.take_summary() {
        log::info!("hell's kitchen finished: {summary:?}");
    }
}
