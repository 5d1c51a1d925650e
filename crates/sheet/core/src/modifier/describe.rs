use std::borrow::Cow;

use super::{CostType, Modifier};
use crate::i18n::{StringProvider, keys};

impl Modifier {
    /// Name followed by the level count when the modifier is leveled.
    pub fn display_name(&self) -> String {
        if self.has_levels() {
            format!("{} {}", self.name, self.levels())
        } else {
            self.name.clone()
        }
    }

    /// Formatted cost, e.g. `+15%`, `+10 (base only)`, `x2`.
    pub fn cost_description(&self, strings: &dyn StringProvider) -> String {
        match self.cost_type {
            CostType::Multiplier => format!("x{}", self.cost_multiplier),
            CostType::Percentage | CostType::Points => {
                let mut out = format!("{:+}", self.effective_cost());
                if self.cost_type == CostType::Percentage {
                    out.push('%');
                }
                if let Some(key) = self.affects.short_title_key() {
                    out.push(' ');
                    out.push_str(&strings.text(key));
                }
                out
            }
        }
    }

    /// `Name 3 (notes), +15%`.
    pub fn full_description(&self, notes: &str, strings: &dyn StringProvider) -> String {
        let mut out = self.display_name();
        if !notes.is_empty() {
            out.push_str(" (");
            out.push_str(notes);
            out.push(')');
        }
        out.push_str(", ");
        out.push_str(&self.cost_description(strings));
        out
    }

    /// Notes as shown to the user; inherited copies show a fixed marker.
    pub fn display_notes<'a>(&self, notes: &'a str, strings: &'a dyn StringProvider) -> Cow<'a, str> {
        if self.read_only {
            strings.text(keys::FROM_CONTAINER)
        } else {
            Cow::Borrowed(notes)
        }
    }
}
