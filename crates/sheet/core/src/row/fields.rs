use bitflags::bitflags;

use crate::notify::ids;

bitflags! {
    /// Tracks which fields of a [`Modifier`](crate::modifier::Modifier) differ
    /// between two values.
    ///
    /// Used both for equivalence checks and to decide which notifications an
    /// editor raises.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ModifierFields: u8 {
        const NAME       = 1 << 0;
        const REFERENCE  = 1 << 1;
        const COST_TYPE  = 1 << 2;
        const COST       = 1 << 3;
        const MULTIPLIER = 1 << 4;
        const LEVELS     = 1 << 5;
        const AFFECTS    = 1 << 6;
        const ENABLED    = 1 << 7;
    }
}

bitflags! {
    /// Tracks which fields of an [`Advantage`](crate::advantage::Advantage)
    /// differ between two values.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct AdvantageFields: u8 {
        const NAME             = 1 << 0;
        const REFERENCE        = 1 << 1;
        const BASE_POINTS      = 1 << 2;
        const POINTS_PER_LEVEL = 1 << 3;
        const LEVELS           = 1 << 4;
        const ROUND_DOWN       = 1 << 5;
        const CONTAINER        = 1 << 6;
        const FEATURES         = 1 << 7;
    }
}

impl ModifierFields {
    /// Notification identifiers for the changed fields, each listed once.
    pub fn notification_ids(self) -> Vec<&'static str> {
        let table = [
            (Self::NAME, ids::MODIFIER_NAME),
            (Self::ENABLED, ids::MODIFIER_ENABLED),
            (
                Self::COST_TYPE | Self::COST | Self::MULTIPLIER | Self::LEVELS,
                ids::MODIFIER_COST,
            ),
            (Self::AFFECTS, ids::MODIFIER_AFFECTS),
            (Self::REFERENCE, ids::MODIFIER_REFERENCE),
        ];
        table
            .into_iter()
            .filter(|(mask, _)| self.intersects(*mask))
            .map(|(_, id)| id)
            .collect()
    }
}

impl AdvantageFields {
    /// Notification identifiers for the changed fields, each listed once.
    pub fn notification_ids(self) -> Vec<&'static str> {
        let table = [
            (Self::NAME, ids::TRAIT_NAME),
            (
                Self::BASE_POINTS
                    | Self::POINTS_PER_LEVEL
                    | Self::LEVELS
                    | Self::ROUND_DOWN
                    | Self::CONTAINER,
                ids::TRAIT_POINTS,
            ),
            (Self::REFERENCE, ids::TRAIT_REFERENCE),
            (Self::FEATURES, ids::TRAIT_FEATURES),
        ];
        table
            .into_iter()
            .filter(|(mask, _)| self.intersects(*mask))
            .map(|(_, id)| id)
            .collect()
    }
}
