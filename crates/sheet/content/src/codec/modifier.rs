use std::io::Write;

use sheet_core::{Affects, CostType, Modifier, Row, StringProvider};

use super::{LoadState, RowTag};
use crate::error::CodecResult;
use crate::xml::{Element, XmlWriter};

pub(crate) const TAG: &str = "modifier";
const TAG_NAME: &str = "name";
const TAG_COST: &str = "cost";
const ATTRIBUTE_COST_TYPE: &str = "type";
const TAG_LEVELS: &str = "levels";
const TAG_AFFECTS: &str = "affects";
const TAG_REFERENCE: &str = "reference";
const TAG_NOTES: &str = "notes";
const ATTRIBUTE_ENABLED: &str = "enabled";

/// Decode a `<modifier>` element over a defaulted modifier.
pub(crate) fn load(element: &Element, strings: &dyn StringProvider, state: &mut LoadState) -> Row {
    let mut modifier = Modifier::new(strings);
    let mut notes = String::new();

    modifier.enabled =
        !element.has_attribute(ATTRIBUTE_ENABLED) || element.is_attribute_set(ATTRIBUTE_ENABLED);

    for child in &element.children {
        state.enter(&child.name);
        match child.name.as_str() {
            TAG_NAME => modifier.name = child.collapsed_text(),
            TAG_REFERENCE => modifier.reference = child.collapsed_text(),
            TAG_NOTES => notes = child.text.clone(),
            TAG_COST => {
                modifier.cost_type = match child.attribute(ATTRIBUTE_COST_TYPE) {
                    Some(token) => state.read_token("cost type", token, CostType::Percentage),
                    None => CostType::Percentage,
                };
                if modifier.cost_type == CostType::Multiplier {
                    modifier.cost_multiplier = state.read_f64(child, Modifier::DEFAULT_MULTIPLIER);
                } else {
                    modifier.cost = state.read_int(child, 0);
                }
            }
            TAG_LEVELS => modifier.set_levels(state.read_int(child, 0)),
            TAG_AFFECTS => {
                modifier.affects = state.read_token(TAG_AFFECTS, &child.text, Affects::Total);
            }
            other if RowTag::lookup(other).is_some() => {
                // nested rows are placed by the document loader
            }
            other => state.skipped(other),
        }
        state.leave();
    }

    Row::modifier(modifier).with_notes(notes)
}

/// Opening-tag attributes of a modifier.
pub(crate) fn attributes(modifier: &Modifier) -> Vec<(&'static str, &'static str)> {
    if modifier.enabled {
        Vec::new()
    } else {
        vec![(ATTRIBUTE_ENABLED, "no")]
    }
}

/// Write the fields of a modifier (between its opening and closing tags).
pub(crate) fn save_fields<W: Write>(
    out: &mut XmlWriter<W>,
    modifier: &Modifier,
    notes: &str,
) -> CodecResult<()> {
    out.simple(TAG_NAME, &modifier.name)?;
    let cost = match modifier.cost_type {
        CostType::Multiplier => modifier.cost_multiplier.to_string(),
        CostType::Percentage | CostType::Points => modifier.cost.to_string(),
    };
    out.simple_with_attributes(
        TAG_COST,
        &[(ATTRIBUTE_COST_TYPE, modifier.cost_type.as_ref())],
        &cost,
    )?;
    out.simple_not_zero(TAG_LEVELS, modifier.levels())?;
    if modifier.cost_type != CostType::Multiplier {
        out.simple(TAG_AFFECTS, modifier.affects.as_ref())?;
    }
    out.simple_not_empty(TAG_REFERENCE, &modifier.reference)?;
    out.simple_not_empty(TAG_NOTES, notes)?;
    Ok(())
}
