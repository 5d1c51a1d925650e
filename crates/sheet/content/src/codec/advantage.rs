use std::io::Write;

use sheet_core::{Advantage, Row, StringProvider};

use super::feature::{self, FeatureTag};
use super::{LoadState, RowTag};
use crate::error::CodecResult;
use crate::xml::{Element, XmlWriter};

pub(crate) const TAG: &str = "advantage";
const TAG_NAME: &str = "name";
const TAG_BASE_POINTS: &str = "base_points";
const TAG_POINTS_PER_LEVEL: &str = "points_per_level";
const TAG_LEVELS: &str = "levels";
const TAG_REFERENCE: &str = "reference";
const TAG_NOTES: &str = "notes";
const ATTRIBUTE_TYPE: &str = "type";
const ATTRIBUTE_ROUND_DOWN: &str = "round_down";
const TYPE_CONTAINER: &str = "container";

/// Before version 2 the base cost was spelled `<points>`.
const LEGACY_TAG_POINTS: &str = "points";
const BASE_POINTS_VERSION: i32 = 2;

/// Decode an `<advantage>` element over a defaulted advantage.
pub(crate) fn load(element: &Element, strings: &dyn StringProvider, state: &mut LoadState) -> Row {
    let mut advantage = Advantage::new(strings);
    let mut notes = String::new();

    advantage.container = element.attribute(ATTRIBUTE_TYPE) == Some(TYPE_CONTAINER);
    advantage.round_down = element.is_attribute_set(ATTRIBUTE_ROUND_DOWN);

    for child in &element.children {
        state.enter(&child.name);
        match child.name.as_str() {
            TAG_NAME => advantage.name = child.collapsed_text(),
            TAG_REFERENCE => advantage.reference = child.collapsed_text(),
            TAG_NOTES => notes = child.text.clone(),
            TAG_BASE_POINTS => advantage.base_points = state.read_int(child, 0),
            LEGACY_TAG_POINTS if state.data_file_version < BASE_POINTS_VERSION => {
                advantage.base_points = state.read_int(child, 0);
            }
            TAG_POINTS_PER_LEVEL => advantage.points_per_level = state.read_int(child, 0),
            TAG_LEVELS => advantage.set_levels(state.read_int(child, 0)),
            other => {
                if let Some(tag) = FeatureTag::lookup(other) {
                    let loaded = feature::load(child, tag, state);
                    advantage.features.push(loaded);
                } else if RowTag::lookup(other).is_none() {
                    state.skipped(other);
                }
            }
        }
        state.leave();
    }

    Row::advantage(advantage).with_notes(notes)
}

/// Opening-tag attributes of an advantage.
pub(crate) fn attributes(advantage: &Advantage) -> Vec<(&'static str, &'static str)> {
    let mut attributes = Vec::new();
    if advantage.container {
        attributes.push((ATTRIBUTE_TYPE, TYPE_CONTAINER));
    }
    if advantage.round_down {
        attributes.push((ATTRIBUTE_ROUND_DOWN, "yes"));
    }
    attributes
}

/// Write the fields and features of an advantage. Child rows follow.
pub(crate) fn save_fields<W: Write>(
    out: &mut XmlWriter<W>,
    advantage: &Advantage,
    notes: &str,
) -> CodecResult<()> {
    out.simple(TAG_NAME, &advantage.name)?;
    if advantage.container {
        out.simple_not_zero(TAG_BASE_POINTS, advantage.base_points)?;
    } else {
        out.simple(TAG_BASE_POINTS, &advantage.base_points.to_string())?;
    }
    out.simple_not_zero(TAG_POINTS_PER_LEVEL, advantage.points_per_level)?;
    out.simple_not_zero(TAG_LEVELS, advantage.levels())?;
    out.simple_not_empty(TAG_REFERENCE, &advantage.reference)?;
    out.simple_not_empty(TAG_NOTES, notes)?;
    for feature in &advantage.features {
        feature::save(out, feature)?;
    }
    Ok(())
}
