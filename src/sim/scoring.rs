use std::fmt;

use thiserror::Error;

use crate::game::config::ScoringConfig;
use crate::game::ingredients::{IngredientKind, IngredientType, ScoreCategory};
use crate::game::orders::{Order, OrderEntry, Requirement};
use crate::sim::stack::{IngredientData, IngredientDetail};

/// Weights of count, order and ingredient score in the overall score.
const COUNT_WEIGHT: f32 = 0.2;
const ORDER_WEIGHT: f32 = 0.3;
const INGREDIENT_WEIGHT: f32 = 0.5;

/// Broken upstream contract. Well-formed stacks and orders never produce one.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoringError {
    #[error("{0:?} has no scoring category")]
    UnscoredIngredient(IngredientType),

    #[error("order layer {index} ({ingredient:?}) has requirement {requirement:?}, which does not fit its type")]
    MalformedOrderEntry {
        index: usize,
        ingredient: IngredientType,
        requirement: Requirement,
    },

    #[error("delivered layer {index} ({ingredient:?}) carries data of the wrong kind")]
    MalformedIngredient { index: usize, ingredient: IngredientType },
}

/// Result of grading one stack against one order. Every part is in [0, 1]
/// except that over-delivered toppings can push `ingredient` and `overall`
/// past 1.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScoreRecord {
    pub count: f32,
    pub order: f32,
    pub ingredient: f32,
    pub overall: f32,
}

impl fmt::Display for ScoreRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "count {:.2} | order {:.2} | ingredients {:.2} | overall {:.2}",
            self.count, self.order, self.ingredient, self.overall
        )
    }
}

/// Grade a delivered stack (bottom to top) against an order with the default
/// sauce bounds.
pub fn evaluate(ingredients: &[IngredientData], order: &Order) -> Result<ScoreRecord, ScoringError> {
    evaluate_with(ingredients, order, &ScoringConfig::default())
}

pub fn evaluate_with(
    ingredients: &[IngredientData],
    order: &Order,
    config: &ScoringConfig,
) -> Result<ScoreRecord, ScoringError> {
    let expected = order.scoring_view();
    for (index, entry) in expected.iter().enumerate() {
        check_entry(index, entry)?;
    }

    let count = if ingredients.len() == expected.len() { 1.0 } else { 0.0 };

    // Compare layer by layer up to the shorter of the two; the streak ends at
    // the first wrong type.
    let depth = ingredients.len().min(expected.len());
    let streak = ingredients[..depth]
        .iter()
        .zip(&expected[..depth])
        .take_while(|(have, want)| have.ingredient == want.ingredient)
        .count();
    let order_score = if expected.is_empty() { 0.0 } else { streak as f32 / expected.len() as f32 };

    // Only the matching prefix is graded layer by layer.
    let mut sums = CategorySums::default();
    for (index, (data, want)) in ingredients.iter().zip(&expected).take(streak).enumerate() {
        let category = data
            .ingredient
            .category()
            .ok_or(ScoringError::UnscoredIngredient(data.ingredient))?;
        sums.add(category, ingredient_score(index, data, want, config)?);
    }
    let ingredient = sums.combine();

    let record = ScoreRecord {
        count,
        order: order_score,
        ingredient,
        overall: count * COUNT_WEIGHT + order_score * ORDER_WEIGHT + ingredient * INGREDIENT_WEIGHT,
    };
    log::debug!("evaluated {} layers against {}: {record}", ingredients.len(), expected.len());
    Ok(record)
}

#[derive(Default)]
struct CategorySums {
    basic: (f32, u32),
    multi: (f32, u32),
    patty: (f32, u32),
}

impl CategorySums {
    fn add(&mut self, category: ScoreCategory, score: f32) {
        let slot = match category {
            ScoreCategory::Basic => &mut self.basic,
            ScoreCategory::Multi => &mut self.multi,
            ScoreCategory::Patty => &mut self.patty,
        };
        slot.0 += score;
        slot.1 += 1;
    }

    /// Per-category means, weighted by which categories showed up at all.
    fn combine(&self) -> f32 {
        let mean = |(sum, n): (f32, u32)| if n == 0 { 0.0 } else { sum / n as f32 };
        let (basic, multi, patty) = (mean(self.basic), mean(self.multi), mean(self.patty));
        match (self.multi.1 > 0, self.patty.1 > 0) {
            (true, true) => basic * 0.4 + multi * 0.2 + patty * 0.4,
            (true, false) => basic * 0.6 + multi * 0.4,
            (false, true) => basic * 0.5 + patty * 0.5,
            (false, false) => basic,
        }
    }
}

fn check_entry(index: usize, entry: &OrderEntry) -> Result<(), ScoringError> {
    let fits = match (entry.ingredient.kind(), entry.requirement) {
        (None | Some(IngredientKind::Basic | IngredientKind::Sauce), Requirement::None) => true,
        (Some(IngredientKind::Multi), Requirement::Amount(target)) => target > 0,
        (Some(IngredientKind::Patty), Requirement::CookWindow { start, end }) => start <= end,
        _ => false,
    };
    if fits {
        Ok(())
    } else {
        Err(ScoringError::MalformedOrderEntry {
            index,
            ingredient: entry.ingredient,
            requirement: entry.requirement,
        })
    }
}

/// Score of one delivered layer against the order layer at the same height.
/// A different type scores 0 regardless of anything else.
pub fn ingredient_score(
    index: usize,
    data: &IngredientData,
    entry: &OrderEntry,
    config: &ScoringConfig,
) -> Result<f32, ScoringError> {
    if data.ingredient != entry.ingredient {
        return Ok(0.0);
    }
    let malformed = || ScoringError::MalformedIngredient { index, ingredient: data.ingredient };
    let kind = data.ingredient.kind().ok_or(ScoringError::UnscoredIngredient(data.ingredient))?;

    let score = match (kind, data.detail, entry.requirement) {
        (IngredientKind::Basic, IngredientDetail::Basic { placement }, _) => 1.0 - placement,
        (IngredientKind::Multi, IngredientDetail::Multi { placement, amount }, Requirement::Amount(target)) => {
            eased_placement(placement) * 0.4 + amount_score(amount, target) * 0.6
        }
        (
            IngredientKind::Patty,
            IngredientDetail::Patty { placement, cook_time, cook_delta },
            Requirement::CookWindow { start, end },
        ) => {
            eased_placement(placement) * 0.3
                + roast_time_score(cook_time, start, end) * 0.5
                + roast_delta_score(cook_delta, end - start) * 0.2
        }
        (IngredientKind::Sauce, IngredientDetail::Sauce { amount }, _) => {
            if config.min_sauce_amount < amount && amount < config.max_sauce_amount {
                1.0
            } else {
                0.0
            }
        }
        _ => return Err(malformed()),
    };
    Ok(score)
}

/// Ease-out on placement: near-center drops all score close to 1.
fn eased_placement(placement: f32) -> f32 {
    1.0 - placement.powi(5)
}

/// Delivered pieces over requested pieces. Not capped at 1.
fn amount_score(amount: u32, target: u32) -> f32 {
    amount as f32 / target as f32
}

fn roast_time_score(cook_time: f32, start: f32, end: f32) -> f32 {
    if (start..=end).contains(&cook_time) {
        1.0
    } else {
        0.0
    }
}

/// Tiered evenness bonus. Each tier halves the allowed delta of the previous
/// one, starting from half the window width.
pub fn roast_delta_score(cook_delta: f32, window: f32) -> f32 {
    let mut score = 0.0;
    let mut limit = window / 2.0;
    for bonus in [0.5, 0.3, 0.2] {
        if cook_delta < limit {
            score += bonus;
        }
        limit /= 2.0;
    }
    score
}
