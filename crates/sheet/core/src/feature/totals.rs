use std::collections::BTreeMap;

use super::{Attribute, Feature};
use crate::config::SheetConfig;
use crate::document::Document;
use crate::row::{Row, RowId, TreeError};

/// Whole-document aggregates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedTotals {
    /// Adjusted cost of every top-level advantage, summed.
    pub total_points: i32,
    /// Attribute bonuses, keyed by attribute.
    pub attributes: BTreeMap<Attribute, i32>,
    /// Skill bonuses, keyed by skill name.
    pub skills: BTreeMap<String, i32>,
}

impl DerivedTotals {
    pub fn attribute(&self, attribute: Attribute) -> i32 {
        self.attributes.get(&attribute).copied().unwrap_or(0)
    }

    pub fn skill(&self, skill: &str) -> i32 {
        self.skills.get(skill).copied().unwrap_or(0)
    }
}

/// Evaluate costs and features across every advantage in `doc`.
///
/// Containers contribute the sum of their members, so only top-level rows are
/// added to `total_points`. Feature bonuses are collected from every
/// advantage, at any depth.
pub fn derive_totals(doc: &Document, config: &SheetConfig) -> Result<DerivedTotals, TreeError> {
    let mut totals = DerivedTotals::default();

    for &root in doc.roots() {
        if is_advantage(doc, root) {
            let points = doc.adjusted_points(root, config)?;
            totals.total_points = totals.total_points.saturating_add(points);
        }
    }

    for id in doc.walk() {
        let Some(advantage) = doc.tree().get(id).and_then(Row::as_advantage) else {
            continue;
        };
        for feature in &advantage.features {
            let value = feature.amount().resolve(advantage.levels());
            match feature {
                Feature::AttributeBonus { attribute, .. } => {
                    let sum = totals.attributes.entry(*attribute).or_default();
                    *sum = sum.saturating_add(value);
                }
                Feature::SkillBonus { skill, .. } => {
                    let sum = totals.skills.entry(skill.clone()).or_default();
                    *sum = sum.saturating_add(value);
                }
            }
        }
    }

    tracing::debug!(
        total_points = totals.total_points,
        attributes = totals.attributes.len(),
        skills = totals.skills.len(),
        "Derived document totals"
    );
    Ok(totals)
}

fn is_advantage(doc: &Document, id: RowId) -> bool {
    doc.tree().get(id).and_then(Row::as_advantage).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advantage::Advantage;
    use crate::document::DocumentKind;
    use crate::feature::LeveledAmount;
    use crate::modifier::{CostType, Modifier};

    #[test]
    fn totals_sum_costs_and_bonuses() {
        let mut doc = Document::new(DocumentKind::AdvantageList);
        let strong = doc
            .add_root(
                Advantage::named("Lifting ST")
                    .with_leveled_points(3, 2)
                    .with_feature(Feature::attribute_bonus(
                        Attribute::St,
                        LeveledAmount::per_level(1),
                    )),
            )
            .unwrap();
        doc.add_child(strong, Modifier::named("Cheap").with_cost(CostType::Percentage, -50))
            .unwrap();

        let group = doc.add_root(Advantage::container("Talents")).unwrap();
        doc.add_child(
            group,
            Advantage::named("Musical")
                .with_points(5)
                .with_feature(Feature::skill_bonus("Singing", LeveledAmount::flat(1))),
        )
        .unwrap();
        doc.add_child(
            group,
            Advantage::named("Voice")
                .with_points(10)
                .with_feature(Feature::skill_bonus("Singing", LeveledAmount::flat(2))),
        )
        .unwrap();

        let totals = derive_totals(&doc, &SheetConfig::default()).unwrap();
        // 3 × 2 × 0.5 = 3, plus 5 + 10 from the container
        assert_eq!(totals.total_points, 18);
        assert_eq!(totals.attribute(Attribute::St), 2);
        assert_eq!(totals.attribute(Attribute::Dx), 0);
        assert_eq!(totals.skill("Singing"), 3);
    }

    #[test]
    fn modifier_lists_have_no_totals() {
        let mut doc = Document::new(DocumentKind::ModifierList);
        doc.add_root(Modifier::default()).unwrap();
        assert_eq!(
            derive_totals(&doc, &SheetConfig::default()).unwrap(),
            DerivedTotals::default()
        );
    }

    #[test]
    fn huge_bonuses_saturate() {
        let mut doc = Document::new(DocumentKind::AdvantageList);
        for name in ["Giant", "Titan"] {
            let id = doc
                .add_root(
                    Advantage::named(name)
                        .with_points(i32::MAX)
                        .with_feature(Feature::attribute_bonus(
                            Attribute::St,
                            LeveledAmount::flat(i32::MAX),
                        ))
                        .with_feature(Feature::skill_bonus("Lifting", LeveledAmount::flat(i32::MAX))),
                )
                .unwrap();
            doc.add_child(id, Modifier::named("Bulk").with_cost(CostType::Points, i32::MAX))
                .unwrap();
        }

        let totals = derive_totals(&doc, &SheetConfig::default()).unwrap();
        assert_eq!(totals.total_points, i32::MAX);
        assert_eq!(totals.attribute(Attribute::St), i32::MAX);
        assert_eq!(totals.skill("Lifting"), i32::MAX);
    }
}
