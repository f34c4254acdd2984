use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IngredientType {
    TopBun,
    BottomBun,
    Salad,
    Cheese,
    Tomato,
    Pickle,
    Onion,
    SauceRed,
    SauceWhite,
    SauceYellow,
    Patty,
}

impl IngredientType {
    pub fn all() -> &'static [IngredientType] {
        use IngredientType::*;
        &[
            TopBun,
            BottomBun,
            Salad,
            Cheese,
            Tomato,
            Pickle,
            Onion,
            SauceRed,
            SauceWhite,
            SauceYellow,
            Patty,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::TopBun => "Top Bun",
            Self::BottomBun => "Bottom Bun",
            Self::Salad => "Salad",
            Self::Cheese => "Cheese",
            Self::Tomato => "Tomato",
            Self::Pickle => "Pickle",
            Self::Onion => "Onion",
            Self::SauceRed => "Red Sauce",
            Self::SauceWhite => "White Sauce",
            Self::SauceYellow => "Yellow Sauce",
            Self::Patty => "Patty",
        }
    }

    /// Scoring bucket. `None` for the bottom bun, which is the stack itself
    /// and never scored.
    pub fn category(&self) -> Option<ScoreCategory> {
        self.kind().map(|kind| match kind {
            IngredientKind::Basic => ScoreCategory::Basic,
            IngredientKind::Multi | IngredientKind::Sauce => ScoreCategory::Multi,
            IngredientKind::Patty => ScoreCategory::Patty,
        })
    }

    /// How a delivered ingredient of this type is described and scored.
    pub fn kind(&self) -> Option<IngredientKind> {
        match self {
            Self::TopBun | Self::Salad | Self::Cheese => Some(IngredientKind::Basic),
            Self::Tomato | Self::Pickle | Self::Onion => Some(IngredientKind::Multi),
            Self::SauceRed | Self::SauceWhite | Self::SauceYellow => Some(IngredientKind::Sauce),
            Self::Patty => Some(IngredientKind::Patty),
            Self::BottomBun => None,
        }
    }

    pub fn is_sauce(&self) -> bool {
        matches!(self, Self::SauceRed | Self::SauceWhite | Self::SauceYellow)
    }

    /// Toppings (multi ingredients and sauces) merge into the entry below
    /// when it has the same type, and get the wider drop radius.
    pub fn is_topping(&self) -> bool {
        matches!(self.kind(), Some(IngredientKind::Multi | IngredientKind::Sauce))
    }
}

/// The three buckets whose averages are weighted into the ingredient score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScoreCategory {
    Basic,
    Multi,
    Patty,
}

/// Finer split than [`ScoreCategory`]: sauces share the multi bucket but are
/// scored on amount alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IngredientKind {
    Basic,
    Multi,
    Sauce,
    Patty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_ingredients_count() {
        assert_eq!(IngredientType::all().len(), 11);
    }

    #[test]
    fn test_all_ingredients_have_display_names() {
        for ingredient in IngredientType::all() {
            assert!(!ingredient.display_name().is_empty(), "{:?} has empty display name", ingredient);
        }
    }

    #[test]
    fn test_every_scored_type_has_exactly_one_category() {
        for ingredient in IngredientType::all() {
            match ingredient {
                IngredientType::BottomBun => {
                    assert_eq!(ingredient.category(), None);
                    assert_eq!(ingredient.kind(), None);
                }
                _ => {
                    assert!(ingredient.category().is_some(), "{:?} has no category", ingredient);
                    assert!(ingredient.kind().is_some(), "{:?} has no kind", ingredient);
                }
            }
        }
    }

    #[test]
    fn test_sauces_are_multi_toppings() {
        for sauce in [IngredientType::SauceRed, IngredientType::SauceWhite, IngredientType::SauceYellow] {
            assert!(sauce.is_sauce());
            assert!(sauce.is_topping());
            assert_eq!(sauce.category(), Some(ScoreCategory::Multi));
            assert_eq!(sauce.kind(), Some(IngredientKind::Sauce));
        }
    }

    #[test]
    fn test_categories_follow_kinds() {
        assert_eq!(IngredientType::TopBun.category(), Some(ScoreCategory::Basic));
        assert_eq!(IngredientType::Pickle.category(), Some(ScoreCategory::Multi));
        assert_eq!(IngredientType::Patty.category(), Some(ScoreCategory::Patty));
    }

    #[test]
    fn test_basic_and_patty_are_not_toppings() {
        assert!(!IngredientType::TopBun.is_topping());
        assert!(!IngredientType::Cheese.is_topping());
        assert!(!IngredientType::Patty.is_topping());
        assert!(IngredientType::Onion.is_topping());
    }
}
