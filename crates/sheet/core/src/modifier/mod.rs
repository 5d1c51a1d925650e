//! Cost-bearing rows attached to traits.
//!
//! A [`Modifier`] adjusts the point cost of the advantage that owns it, either
//! by a percentage, by flat points, or by a multiplier. [`cost`] turns a list of
//! modifiers into scope-bucketed sums; [`describe`] formats them for display.

pub mod cost;
mod describe;

pub use cost::{CostBase, CostBuckets, ScopeSum, adjusted_points};

use crate::i18n::{DefaultStrings, StringProvider, keys};
use crate::row::ModifierFields;

/// How a modifier's cost is expressed.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CostType {
    /// Percentage of the trait's cost (e.g. `+20%`)
    #[default]
    Percentage,
    /// Flat point adjustment
    Points,
    /// Factor applied to the final cost
    Multiplier,
}

/// Which part of a trait's cost a modifier applies to.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Affects {
    /// Base cost and per-level cost
    #[default]
    Total,
    /// Base cost only
    BaseOnly,
    /// Per-level cost only
    LevelsOnly,
}

impl Affects {
    /// Localization key of the short suffix shown after a cost, if any.
    pub fn short_title_key(self) -> Option<&'static str> {
        match self {
            Affects::Total => None,
            Affects::BaseOnly => Some(keys::BASE_ONLY),
            Affects::LevelsOnly => Some(keys::LEVELS_ONLY),
        }
    }
}

/// An enhancement or limitation.
///
/// `levels` is private so it can never go negative; use [`Modifier::levels`]
/// and [`Modifier::set_levels`]. `read_only` marks copies inherited from a
/// container and is never persisted, cloned, or compared.
#[derive(Debug)]
pub struct Modifier {
    pub name: String,
    pub reference: String,
    pub cost_type: CostType,
    pub cost: i32,
    pub cost_multiplier: f64,
    levels: i32,
    pub affects: Affects,
    pub enabled: bool,
    pub read_only: bool,
}

impl Modifier {
    pub const DEFAULT_MULTIPLIER: f64 = 1.0;

    /// A defaulted modifier named with the localized "Modifier" text.
    pub fn new(strings: &dyn StringProvider) -> Self {
        Self::named(strings.text(keys::MODIFIER))
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: String::new(),
            cost_type: CostType::Percentage,
            cost: 0,
            cost_multiplier: Self::DEFAULT_MULTIPLIER,
            levels: 0,
            affects: Affects::Total,
            enabled: true,
            read_only: false,
        }
    }

    pub fn with_cost(mut self, cost_type: CostType, cost: i32) -> Self {
        self.cost_type = cost_type;
        self.cost = cost;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.cost_type = CostType::Multiplier;
        self.cost_multiplier = multiplier;
        self
    }

    pub fn with_levels(mut self, levels: i32) -> Self {
        self.set_levels(levels);
        self
    }

    pub fn with_affects(mut self, affects: Affects) -> Self {
        self.affects = affects;
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn levels(&self) -> i32 {
        self.levels
    }

    /// Set the level count, clamping negative input to zero.
    pub fn set_levels(&mut self, levels: i32) {
        self.levels = levels.max(0);
    }

    /// Leveled percentage modifiers display their level count.
    pub fn has_levels(&self) -> bool {
        self.cost_type == CostType::Percentage && self.levels > 0
    }

    /// Cost after applying levels (Percentage and Points only).
    pub fn effective_cost(&self) -> i32 {
        if self.levels > 0 {
            self.cost.saturating_mul(self.levels)
        } else {
            self.cost
        }
    }

    /// Fields whose values differ between `self` and `other`.
    pub fn diff(&self, other: &Modifier) -> ModifierFields {
        let mut changed = ModifierFields::empty();
        changed.set(ModifierFields::NAME, self.name != other.name);
        changed.set(ModifierFields::REFERENCE, self.reference != other.reference);
        changed.set(ModifierFields::COST_TYPE, self.cost_type != other.cost_type);
        changed.set(ModifierFields::COST, self.cost != other.cost);
        changed.set(
            ModifierFields::MULTIPLIER,
            self.cost_multiplier != other.cost_multiplier,
        );
        changed.set(ModifierFields::LEVELS, self.levels != other.levels);
        changed.set(ModifierFields::AFFECTS, self.affects != other.affects);
        changed.set(ModifierFields::ENABLED, self.enabled != other.enabled);
        changed
    }

    /// Field-by-field equality, ignoring `read_only`.
    pub fn is_equivalent_to(&self, other: &Modifier) -> bool {
        self.diff(other).is_empty()
    }
}

impl Default for Modifier {
    fn default() -> Self {
        Self::new(&DefaultStrings)
    }
}

impl Clone for Modifier {
    /// Exact field copy, except that the clone is never read-only.
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            reference: self.reference.clone(),
            cost_type: self.cost_type,
            cost: self.cost,
            cost_multiplier: self.cost_multiplier,
            levels: self.levels,
            affects: self.affects,
            enabled: self.enabled,
            read_only: false,
        }
    }
}
