//! baseline/selector.rs
//! Profile selection seam: where the camera subsystem plugs its baseline tables in.

use std::collections::BTreeMap;

use crate::baseline::profiles::builtin_table;
use crate::baseline::types::{BaselineTable, ProfileKind};

/// Produces the baseline table for a profile kind.
///
/// Consulted by the estimator on every stage change, so a profile that only
/// becomes known mid-run is picked up at the next transition.
pub trait ProfileSelector: Send + Sync {
    fn select(&self, kind: ProfileKind) -> BaselineTable;
}

impl<F> ProfileSelector for F
where
    F: Fn(ProfileKind) -> BaselineTable + Send + Sync,
{
    fn select(&self, kind: ProfileKind) -> BaselineTable {
        self(kind)
    }
}

/// The stitcher's measured tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinProfiles;

impl ProfileSelector for BuiltinProfiles {
    fn select(&self, kind: ProfileKind) -> BaselineTable {
        builtin_table(kind)
    }
}

/// Tables injected from configuration, falling back to the built-in ones.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredProfiles {
    tables: BTreeMap<ProfileKind, BaselineTable>,
}

impl ConfiguredProfiles {
    pub fn new(tables: BTreeMap<ProfileKind, BaselineTable>) -> Self {
        Self { tables }
    }

    pub fn with(mut self, kind: ProfileKind, table: BaselineTable) -> Self {
        self.tables.insert(kind, table);
        self
    }
}

impl ProfileSelector for ConfiguredProfiles {
    fn select(&self, kind: ProfileKind) -> BaselineTable {
        self.tables
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| builtin_table(kind))
    }
}

/// One table regardless of profile. Handy for drivers with their own stage timings.
#[derive(Debug, Clone, Default)]
pub struct FixedTable(pub BaselineTable);

impl ProfileSelector for FixedTable {
    fn select(&self, _kind: ProfileKind) -> BaselineTable {
        self.0.clone()
    }
}
