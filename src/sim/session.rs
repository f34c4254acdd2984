use serde::{Deserialize, Serialize};

use super::ground::dirtiness;
use super::scoring::{evaluate_with, ScoreRecord, ScoringError};
use super::spawner::OrderSpawner;
use super::tick::{KitchenClock, SIM_DT};
use super::timer::{PenaltyTimer, TimerSnapshot};
use crate::feedback::{Cue, Feedback};
use crate::game::config::EngineConfig;
use crate::game::orders::{Order, OrderBoard, OrderId};
use crate::game::world::{EntityId, KitchenWorld};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Free play between shifts. The bell rings but nothing is graded.
    Lobby,
    /// A fixed number of orders, finished with a cleanliness bonus.
    Standard,
    /// Serve until the shrinking countdown runs out.
    HellsKitchen,
}

/// The serving counter. Holds at most one stack and one order; the first to
/// arrive keeps its place until it leaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvaluationArea {
    stack: Option<EntityId>,
    order: Option<OrderId>,
}

impl EvaluationArea {
    pub fn register_stack(&mut self, stack: EntityId) -> bool {
        if self.stack.is_some() {
            return false;
        }
        self.stack = Some(stack);
        true
    }

    pub fn register_order(&mut self, order: OrderId) -> bool {
        if self.order.is_some() {
            return false;
        }
        self.order = Some(order);
        true
    }

    /// Leaving only frees the slot if `stack` is the one registered.
    pub fn release_stack(&mut self, stack: EntityId) {
        if self.stack == Some(stack) {
            self.stack = None;
        }
    }

    pub fn release_order(&mut self, order: OrderId) {
        if self.order == Some(order) {
            self.order = None;
        }
    }

    pub fn stack(&self) -> Option<EntityId> {
        self.stack
    }

    pub fn order(&self) -> Option<OrderId> {
        self.order
    }

    pub fn can_evaluate(&self) -> bool {
        self.stack.is_some() && self.order.is_some()
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// End-of-shift result, handed out once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameSummary {
    Standard {
        average: f32,
        cleanliness: f32,
        overall: f32,
    },
    HellsKitchen {
        orders_served: u32,
    },
}

/// One shift in the kitchen: the order board and its spawner, the serving
/// counter, the running score and, in Hell's Kitchen, the countdown.
pub struct Session {
    config: EngineConfig,
    mode: GameMode,
    board: OrderBoard,
    spawner: Option<OrderSpawner>,
    pub area: EvaluationArea,
    clock: KitchenClock,
    timer: Option<PenaltyTimer>,
    orders_served: u32,
    score_sum: f32,
    scores: Vec<ScoreRecord>,
    game_over: bool,
    summary: Option<GameSummary>,
}

impl Session {
    pub fn new(mode: GameMode, config: EngineConfig) -> Self {
        let timer = (mode == GameMode::HellsKitchen).then(|| PenaltyTimer::new(&config.timer));
        log::info!("session started in {mode:?} mode");
        Self {
            board: OrderBoard::new(config.session.order_slots),
            spawner: None,
            config,
            mode,
            area: EvaluationArea::default(),
            clock: KitchenClock::new(),
            timer,
            orders_served: 0,
            score_sum: 0.0,
            scores: Vec::new(),
            game_over: false,
            summary: None,
        }
    }

    /// Issue orders from `catalogue` on a timer while the shift runs. Standard
    /// stops after `spawn_cap` orders; Hell's Kitchen never stops. The lobby
    /// issues nothing.
    pub fn with_catalogue(mut self, catalogue: Vec<Order>) -> Self {
        self.spawner = match self.mode {
            GameMode::Lobby => None,
            GameMode::Standard => Some(OrderSpawner::new(catalogue, &self.config.session, false)),
            GameMode::HellsKitchen => Some(OrderSpawner::new(catalogue, &self.config.session, true)),
        };
        self
    }

    pub fn spawner(&self) -> Option<&OrderSpawner> {
        self.spawner.as_ref()
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &OrderBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut OrderBoard {
        &mut self.board
    }

    pub fn timer(&self) -> Option<&PenaltyTimer> {
        self.timer.as_ref()
    }

    pub fn orders_served(&self) -> u32 {
        self.orders_served
    }

    pub fn scores(&self) -> &[ScoreRecord] {
        &self.scores
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Ring the serving bell. With a stack and an order on the counter the
    /// stack is graded, removed from the kitchen with its order, and the
    /// score counts toward the shift. Otherwise only the bell sounds.
    pub fn ring_bell(
        &mut self,
        world: &mut KitchenWorld,
        feedback: &mut dyn Feedback,
    ) -> Result<Option<ScoreRecord>, ScoringError> {
        feedback.cue(Cue::Bell);
        if self.mode == GameMode::Lobby || self.game_over {
            return Ok(None);
        }
        let (Some(stack), Some(order_id)) = (self.area.stack, self.area.order) else {
            log::debug!("bell rung with nothing to evaluate");
            return Ok(None);
        };
        let Some(delivered) = world.stack_snapshot(stack) else {
            log::warn!("registered stack {stack:?} no longer exists");
            self.area.release_stack(stack);
            return Ok(None);
        };
        let Some(order) = self.board.get(order_id) else {
            log::warn!("registered order {order_id:?} is not on the board");
            self.area.release_order(order_id);
            return Ok(None);
        };

        let record = evaluate_with(&delivered, order, &self.config.scoring)?;
        log::info!("order {order_id:?}: {record}");

        world.despawn(stack);
        self.board.take(order_id);
        self.area.clear();
        self.record_score(record, world, feedback);
        Ok(Some(record))
    }

    /// Count an evaluated order toward the shift.
    pub fn record_score(&mut self, record: ScoreRecord, world: &KitchenWorld, feedback: &mut dyn Feedback) {
        if self.game_over {
            return;
        }
        self.scores.push(record);
        match self.mode {
            GameMode::Lobby => {}
            GameMode::Standard => {
                self.orders_served += 1;
                self.score_sum += record.overall;
                if self.orders_served >= self.config.session.max_orders {
                    let summary = self.standard_summary(world);
                    self.finish(summary, feedback);
                }
            }
            GameMode::HellsKitchen => {
                self.orders_served += 1;
                let min_quality = self.config.session.min_required_quality;
                let penalised = self
                    .timer
                    .as_mut()
                    .is_some_and(|timer| timer.on_evaluation_complete(record.overall, min_quality));
                if penalised {
                    feedback.cue(Cue::Penalty);
                }
            }
        }
    }

    /// Advance kitchen time by one frame. Roasting, order spawning and the
    /// countdown run in fixed steps; returns the countdown state after the
    /// last step.
    pub fn advance(
        &mut self,
        frame_dt: f32,
        world: &mut KitchenWorld,
        feedback: &mut dyn Feedback,
    ) -> Option<TimerSnapshot> {
        let ticks = self.clock.accumulate(frame_dt);
        let mut snapshot = None;
        for _ in 0..ticks {
            world.tick_roasting(SIM_DT, self.config.roasting.burnt_seconds);
            if self.game_over {
                continue;
            }
            if let Some(spawner) = self.spawner.as_mut() {
                spawner.tick(SIM_DT, &mut self.board);
            }
            let Some(timer) = self.timer.as_mut() else {
                continue;
            };
            let snap = timer.tick(SIM_DT, feedback);
            snapshot = Some(snap);
            if snap.just_expired {
                let summary = GameSummary::HellsKitchen {
                    orders_served: self.orders_served,
                };
                self.finish(summary, feedback);
            }
        }
        snapshot
    }

    /// The end-of-shift summary. `Some` exactly once, after the game ends.
    pub fn take_summary(&mut self) -> Option<GameSummary> {
        self.summary.take()
    }

    fn standard_summary(&self, world: &KitchenWorld) -> GameSummary {
        let max_orders = self.config.session.max_orders.max(1) as f32;
        let average = self.score_sum / max_orders;
        let cleanliness = 1.0 - dirtiness(world, self.config.session.dirtiness_threshold);
        GameSummary::Standard {
            average,
            cleanliness,
            overall: 0.8 * average + 0.2 * cleanliness,
        }
    }

    fn finish(&mut self, summary: GameSummary, feedback: &mut dyn Feedback) {
        self.game_over = true;
        self.summary = Some(summary);
        feedback.cue(Cue::GameOver);
        log::info!("game over: {summary:?}");
    }
}
