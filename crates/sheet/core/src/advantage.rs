//! Point-costed trait rows (advantages and disadvantages).

use std::collections::{BTreeSet, HashMap};

use crate::feature::Feature;
use crate::i18n::{DefaultStrings, StringProvider, keys};
use crate::modifier::CostBase;
use crate::row::{AdvantageFields, apply_nameables, extract_nameables};

/// A trait row.
///
/// Plain advantages own modifiers; containers additionally group other
/// advantages and pass their own modifiers down to them.
#[derive(Clone, Debug, PartialEq)]
pub struct Advantage {
    pub name: String,
    pub reference: String,
    pub base_points: i32,
    pub points_per_level: i32,
    levels: i32,
    pub round_down: bool,
    pub container: bool,
    pub features: Vec<Feature>,
}

impl Advantage {
    /// A defaulted advantage named with the localized "Trait" text.
    pub fn new(strings: &dyn StringProvider) -> Self {
        Self::named(strings.text(keys::TRAIT))
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: String::new(),
            base_points: 0,
            points_per_level: 0,
            levels: 0,
            round_down: false,
            container: false,
            features: Vec::new(),
        }
    }

    pub fn container(name: impl Into<String>) -> Self {
        Self {
            container: true,
            ..Self::named(name)
        }
    }

    pub fn with_points(mut self, base_points: i32) -> Self {
        self.base_points = base_points;
        self
    }

    pub fn with_leveled_points(mut self, points_per_level: i32, levels: i32) -> Self {
        self.points_per_level = points_per_level;
        self.set_levels(levels);
        self
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn levels(&self) -> i32 {
        self.levels
    }

    /// Set the level count, clamping negative input to zero.
    pub fn set_levels(&mut self, levels: i32) {
        self.levels = levels.max(0);
    }

    /// Cost inputs for [`adjusted_points`](crate::modifier::adjusted_points).
    pub fn cost_base(&self) -> CostBase {
        CostBase {
            base_points: self.base_points,
            points_per_level: self.points_per_level,
            levels: self.levels,
            round_down: self.round_down,
        }
    }

    pub fn diff(&self, other: &Advantage) -> AdvantageFields {
        let mut changed = AdvantageFields::empty();
        changed.set(AdvantageFields::NAME, self.name != other.name);
        changed.set(AdvantageFields::REFERENCE, self.reference != other.reference);
        changed.set(AdvantageFields::BASE_POINTS, self.base_points != other.base_points);
        changed.set(
            AdvantageFields::POINTS_PER_LEVEL,
            self.points_per_level != other.points_per_level,
        );
        changed.set(AdvantageFields::LEVELS, self.levels != other.levels);
        changed.set(AdvantageFields::ROUND_DOWN, self.round_down != other.round_down);
        changed.set(AdvantageFields::CONTAINER, self.container != other.container);
        changed.set(AdvantageFields::FEATURES, self.features != other.features);
        changed
    }

    pub fn is_equivalent_to(&self, other: &Advantage) -> bool {
        self.diff(other).is_empty()
    }

    pub(crate) fn fill_with_nameable_keys(&self, keys: &mut BTreeSet<String>) {
        extract_nameables(&self.name, keys);
        for feature in &self.features {
            if let Some(skill) = feature.skill_name() {
                extract_nameables(skill, keys);
            }
        }
    }

    pub(crate) fn apply_nameable_keys(&mut self, values: &HashMap<String, String>) {
        self.name = apply_nameables(&self.name, values);
        for feature in &mut self.features {
            if let Some(skill) = feature.skill_name_mut() {
                *skill = apply_nameables(skill, values);
            }
        }
    }
}

impl Default for Advantage {
    fn default() -> Self {
        Self::new(&DefaultStrings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{Attribute, LeveledAmount};

    #[test]
    fn defaults_and_clamping() {
        let mut advantage = Advantage::default();
        assert_eq!(advantage.name, "Trait");
        assert!(!advantage.container);
        advantage.set_levels(-3);
        assert_eq!(advantage.levels(), 0);
    }

    #[test]
    fn diff_covers_features() {
        let a = Advantage::named("Strong");
        let b = a.clone().with_feature(Feature::attribute_bonus(
            Attribute::St,
            LeveledAmount::flat(1),
        ));
        assert_eq!(a.diff(&b), AdvantageFields::FEATURES);
        assert!(!a.is_equivalent_to(&b));
    }

    #[test]
    fn nameables_include_skill_bonus_names() {
        let mut advantage = Advantage::named("Talent (@Area@)").with_feature(
            Feature::skill_bonus("@Skill@", LeveledAmount::flat(1)),
        );
        let mut keys = BTreeSet::new();
        advantage.fill_with_nameable_keys(&mut keys);
        assert_eq!(keys.len(), 2);

        let values = HashMap::from([
            ("Area".to_string(), "Music".to_string()),
            ("Skill".to_string(), "Singing".to_string()),
        ]);
        advantage.apply_nameable_keys(&values);
        assert_eq!(advantage.name, "Talent (Music)");
        assert_eq!(advantage.features[0].skill_name(), Some("Singing"));
    }
}
