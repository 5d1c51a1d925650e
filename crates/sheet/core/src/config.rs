/// Tunable parameters for cost computation and document output.
///
/// Loaded from TOML by `sheet-content`'s `ConfigLoader`; missing keys keep
/// their defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SheetConfig {
    /// Lowest combined percentage a trait's limitations may reach, per scope.
    /// Percentages below this floor are raised to it before being applied.
    pub limitation_floor_percent: i32,
    /// Number of tab characters per nesting level in saved documents.
    pub indent_width: usize,
}

impl SheetConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_LIMITATION_FLOOR: i32 = -80;
    pub const DEFAULT_INDENT_WIDTH: usize = 1;

    pub fn new() -> Self {
        Self {
            limitation_floor_percent: Self::DEFAULT_LIMITATION_FLOOR,
            indent_width: Self::DEFAULT_INDENT_WIDTH,
        }
    }

    pub fn with_limitation_floor(limitation_floor_percent: i32) -> Self {
        Self {
            limitation_floor_percent,
            ..Self::new()
        }
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self::new()
    }
}
