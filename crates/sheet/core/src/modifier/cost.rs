//! Cost composition for a trait's modifiers.
//!
//! The composition runs in a fixed order:
//! Filter enabled → Sum by scope → Multiply factors → Floor percentages → Round
//!
//! Nothing here is cached; callers compose on demand from the current rows.

use super::{Affects, CostType, Modifier};
use crate::config::SheetConfig;

/// Percentage and flat-point sums for one scope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScopeSum {
    pub percent: i32,
    pub points: i32,
}

/// Modifier contributions bucketed by [`Affects`] scope, plus the combined
/// multiplier.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostBuckets {
    pub total: ScopeSum,
    pub base_only: ScopeSum,
    pub levels_only: ScopeSum,
    pub multiplier: f64,
}

impl Default for CostBuckets {
    fn default() -> Self {
        Self {
            total: ScopeSum::default(),
            base_only: ScopeSum::default(),
            levels_only: ScopeSum::default(),
            multiplier: 1.0,
        }
    }
}

impl CostBuckets {
    /// Compose an ordered list of modifiers.
    ///
    /// # Steps
    /// 1. Disabled modifiers are skipped
    /// 2. Percentage and Points modifiers add their effective cost to the
    ///    bucket named by `affects`
    /// 3. Multiplier modifiers multiply together in list order
    pub fn compose<'a>(modifiers: impl IntoIterator<Item = &'a Modifier>) -> Self {
        let mut buckets = Self::default();
        for modifier in modifiers.into_iter().filter(|m| m.enabled) {
            match modifier.cost_type {
                CostType::Multiplier => buckets.multiplier *= modifier.cost_multiplier,
                CostType::Percentage => {
                    let scope = buckets.scope_mut(modifier.affects);
                    scope.percent = scope.percent.saturating_add(modifier.effective_cost());
                }
                CostType::Points => {
                    let scope = buckets.scope_mut(modifier.affects);
                    scope.points = scope.points.saturating_add(modifier.effective_cost());
                }
            }
        }
        buckets
    }

    pub fn scope(&self, affects: Affects) -> &ScopeSum {
        match affects {
            Affects::Total => &self.total,
            Affects::BaseOnly => &self.base_only,
            Affects::LevelsOnly => &self.levels_only,
        }
    }

    fn scope_mut(&mut self, affects: Affects) -> &mut ScopeSum {
        match affects {
            Affects::Total => &mut self.total,
            Affects::BaseOnly => &mut self.base_only,
            Affects::LevelsOnly => &mut self.levels_only,
        }
    }

    /// Percentage applied to the base cost, before flooring.
    pub fn base_percent(&self) -> i32 {
        self.total.percent.saturating_add(self.base_only.percent)
    }

    /// Percentage applied to the per-level cost, before flooring.
    pub fn level_percent(&self) -> i32 {
        self.total.percent.saturating_add(self.levels_only.percent)
    }
}

/// The unmodified cost inputs of a trait.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CostBase {
    pub base_points: i32,
    pub points_per_level: i32,
    pub levels: i32,
    pub round_down: bool,
}

/// Adjusted point cost of a trait.
///
/// # Formula
/// ```text
/// base      = base_points + total.points + base_only.points
/// per_level = points_per_level + levels_only.points
/// raw       = (base × (100 + base_pct) + per_level × levels × (100 + level_pct)) / 100
/// result    = round(raw × multiplier)
/// ```
/// Both percentages are raised to `config.limitation_floor_percent` when lower.
/// Rounding is up unless `round_down` is set.
///
/// # Example
/// ```
/// # use sheet_core::config::SheetConfig;
/// # use sheet_core::modifier::{adjusted_points, CostBase, CostBuckets, Modifier};
/// let doubled = [Modifier::named("Double").with_multiplier(2.0)];
/// let buckets = CostBuckets::compose(&doubled);
/// let base = CostBase { base_points: 10, ..CostBase::default() };
/// assert_eq!(adjusted_points(&base, &buckets, &SheetConfig::default()), 20);
/// ```
pub fn adjusted_points(base: &CostBase, buckets: &CostBuckets, config: &SheetConfig) -> i32 {
    let floor = config.limitation_floor_percent;

    // Step 1: flat points per scope
    let base_cost = i64::from(base.base_points)
        + i64::from(buckets.total.points)
        + i64::from(buckets.base_only.points);
    let per_level = i64::from(base.points_per_level) + i64::from(buckets.levels_only.points);

    // Step 2: floored percentages
    let base_pct = i64::from(buckets.base_percent().max(floor));
    let level_pct = i64::from(buckets.level_percent().max(floor));

    // Step 3: apply percentages (in f64; products of file values can exceed i64)
    let scaled = base_cost as f64 * (100 + base_pct) as f64
        + per_level as f64 * f64::from(base.levels) * (100 + level_pct) as f64;
    let raw = scaled / 100.0;

    // Step 4: multiplier, then round
    let value = trim_noise(raw * buckets.multiplier);
    let rounded = if base.round_down {
        value.floor()
    } else {
        value.ceil()
    };
    rounded.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

/// Strip float error so that e.g. `10 × 1.1` rounds up to 11, not 12.
fn trim_noise(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}
