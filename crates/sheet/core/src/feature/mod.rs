//! Bonus attachments carried by advantages.
//!
//! Features do not change an advantage's own cost. They adjust derived
//! character values and are evaluated by [`derive_totals`].

mod totals;

pub use totals::{DerivedTotals, derive_totals};

/// Attributes an [`Feature::AttributeBonus`] can target.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
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
pub enum Attribute {
    /// Strength
    St,
    /// Dexterity
    Dx,
    /// Intelligence
    Iq,
    /// Health
    Ht,
    Will,
    /// Perception
    Per,
    /// Hit points
    Hp,
    /// Fatigue points
    Fp,
}

/// A bonus value, optionally scaled by the owning advantage's levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeveledAmount {
    pub value: i32,
    pub per_level: bool,
}

impl LeveledAmount {
    pub fn flat(value: i32) -> Self {
        Self {
            value,
            per_level: false,
        }
    }

    pub fn per_level(value: i32) -> Self {
        Self {
            value,
            per_level: true,
        }
    }

    /// Value for an owner with `levels` levels.
    pub fn resolve(&self, levels: i32) -> i32 {
        if self.per_level {
            self.value.saturating_mul(levels)
        } else {
            self.value
        }
    }
}

/// A bonus attachment.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum Feature {
    AttributeBonus {
        attribute: Attribute,
        amount: LeveledAmount,
    },
    SkillBonus {
        skill: String,
        amount: LeveledAmount,
    },
}

impl Feature {
    pub fn attribute_bonus(attribute: Attribute, amount: LeveledAmount) -> Self {
        Feature::AttributeBonus { attribute, amount }
    }

    pub fn skill_bonus(skill: impl Into<String>, amount: LeveledAmount) -> Self {
        Feature::SkillBonus {
            skill: skill.into(),
            amount,
        }
    }

    /// XML tag of this feature kind.
    pub fn tag(&self) -> &'static str {
        match self {
            Feature::AttributeBonus { .. } => "attribute_bonus",
            Feature::SkillBonus { .. } => "skill_bonus",
        }
    }

    pub fn amount(&self) -> LeveledAmount {
        match self {
            Feature::AttributeBonus { amount, .. } | Feature::SkillBonus { amount, .. } => *amount,
        }
    }

    pub fn skill_name(&self) -> Option<&str> {
        match self {
            Feature::SkillBonus { skill, .. } => Some(skill),
            Feature::AttributeBonus { .. } => None,
        }
    }

    pub(crate) fn skill_name_mut(&mut self) -> Option<&mut String> {
        match self {
            Feature::SkillBonus { skill, .. } => Some(skill),
            Feature::AttributeBonus { .. } => None,
        }
    }
}
