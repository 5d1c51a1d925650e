use std::io::Write;

use sheet_core::{Attribute, Feature, LeveledAmount};

use super::LoadState;
use crate::error::CodecResult;
use crate::xml::{Element, XmlWriter};

const TAG_ATTRIBUTE: &str = "attribute";
const TAG_NAME: &str = "name";
const TAG_AMOUNT: &str = "amount";
const ATTRIBUTE_PER_LEVEL: &str = "per_level";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FeatureTag {
    AttributeBonus,
    SkillBonus,
}

/// Tag literal → feature kind.
const FEATURE_TAGS: &[(&str, FeatureTag)] = &[
    ("attribute_bonus", FeatureTag::AttributeBonus),
    ("skill_bonus", FeatureTag::SkillBonus),
];

impl FeatureTag {
    pub(crate) fn lookup(tag: &str) -> Option<Self> {
        FEATURE_TAGS
            .iter()
            .find(|(literal, _)| *literal == tag)
            .map(|(_, feature_tag)| *feature_tag)
    }
}

/// Decode a feature element. The amount defaults to a flat +1.
pub(crate) fn load(element: &Element, tag: FeatureTag, state: &mut LoadState) -> Feature {
    let mut amount = LeveledAmount::flat(1);
    let mut attribute = Attribute::St;
    let mut skill = String::new();

    for child in &element.children {
        state.enter(&child.name);
        match (tag, child.name.as_str()) {
            (_, TAG_AMOUNT) => {
                amount = LeveledAmount {
                    value: state.read_int(child, 1),
                    per_level: child.is_attribute_set(ATTRIBUTE_PER_LEVEL),
                };
            }
            (FeatureTag::AttributeBonus, TAG_ATTRIBUTE) => {
                attribute = state.read_token(TAG_ATTRIBUTE, &child.text, Attribute::St);
            }
            (FeatureTag::SkillBonus, TAG_NAME) => skill = child.collapsed_text(),
            (_, other) => state.skipped(other),
        }
        state.leave();
    }

    match tag {
        FeatureTag::AttributeBonus => Feature::attribute_bonus(attribute, amount),
        FeatureTag::SkillBonus => Feature::skill_bonus(skill, amount),
    }
}

pub(crate) fn save<W: Write>(out: &mut XmlWriter<W>, feature: &Feature) -> CodecResult<()> {
    out.start(feature.tag(), &[])?;
    match feature {
        Feature::AttributeBonus { attribute, .. } => {
            out.simple(TAG_ATTRIBUTE, attribute.as_ref())?;
        }
        Feature::SkillBonus { skill, .. } => out.simple(TAG_NAME, skill)?,
    }
    let amount = feature.amount();
    let attributes: &[(&str, &str)] = if amount.per_level {
        &[(ATTRIBUTE_PER_LEVEL, "yes")]
    } else {
        &[]
    };
    out.simple_with_attributes(TAG_AMOUNT, attributes, &amount.value.to_string())?;
    out.end(feature.tag())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse;

    fn load_str(source: &str) -> (Feature, LoadState) {
        let element = parse(source).unwrap();
        let tag = FeatureTag::lookup(&element.name).unwrap();
        let mut state = LoadState::new(2, "advantage_list");
        let feature = load(&element, tag, &mut state);
        (feature, state)
    }

    #[test]
    fn attribute_bonus_with_per_level_amount() {
        let (feature, state) = load_str(
            r#"<attribute_bonus><attribute>dx</attribute><amount per_level="yes">2</amount></attribute_bonus>"#,
        );
        assert_eq!(
            feature,
            Feature::attribute_bonus(Attribute::Dx, LeveledAmount::per_level(2))
        );
        assert!(state.report.is_clean());
    }

    #[test]
    fn skill_bonus_defaults_to_plus_one() {
        let (feature, _) = load_str("<skill_bonus><name>Stealth</name></skill_bonus>");
        assert_eq!(
            feature,
            Feature::skill_bonus("Stealth", LeveledAmount::flat(1))
        );
    }

    #[test]
    fn unknown_attribute_defaults_to_strength() {
        let (feature, state) = load_str(
            "<attribute_bonus><attribute>luck</attribute><limitation>x</limitation></attribute_bonus>",
        );
        assert_eq!(
            feature,
            Feature::attribute_bonus(Attribute::St, LeveledAmount::flat(1))
        );
        assert_eq!(state.report.defaulted_fields().count(), 1);
        assert_eq!(state.report.skipped_tags().collect::<Vec<_>>(), vec!["limitation"]);
    }

    #[test]
    fn lookup_rejects_unknown_tags() {
        assert_eq!(FeatureTag::lookup("skill_bonus"), Some(FeatureTag::SkillBonus));
        assert_eq!(FeatureTag::lookup("dr_bonus"), None);
    }
}
