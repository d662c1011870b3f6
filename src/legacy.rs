//! Lookup table from pre-flattening `(block id, data nibble)` pairs to
//! modern block state ids, used by the MCEdit reader.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::LegacyTableError;

const LEGACY_DATASET: &str = include_str!("../assets/legacy_blocks.json");

#[derive(Deserialize)]
struct LegacyRecord {
    block: u16,
    data: u8,
    state: u16,
}

/// Immutable `(legacy id, data) -> state id` table, built once per process.
#[derive(Debug)]
pub struct LegacyBlockTable {
    entries: FxHashMap<u32, u16>,
}

impl LegacyBlockTable {
    /// Parses a table from a JSON array of `{"block", "data", "state"}`
    /// records. The first record wins when a pair appears twice.
    pub fn from_json(json: &str) -> Result<Self, LegacyTableError> {
        let records: Vec<LegacyRecord> =
            serde_json::from_str(json).map_err(|e| LegacyTableError(e.to_string()))?;

        let mut entries =
            FxHashMap::with_capacity_and_hasher(records.len(), Default::default());
        for record in &records {
            entries
                .entry(lookup_key(record.block, record.data))
                .or_insert(record.state);
        }

        Ok(LegacyBlockTable { entries })
    }

    /// The process-wide table built from the bundled dataset.
    ///
    /// The load runs once; a failure is cached and reported to every caller
    /// instead of leaving a silently empty table behind.
    pub fn global() -> Result<&'static LegacyBlockTable, LegacyTableError> {
        static TABLE: OnceLock<Result<LegacyBlockTable, LegacyTableError>> = OnceLock::new();

        match TABLE.get_or_init(|| {
            let table = LegacyBlockTable::from_json(LEGACY_DATASET)?;
            log::info!("loaded {} legacy block mappings", table.len());
            Ok(table)
        }) {
            Ok(table) => Ok(table),
            Err(e) => Err(e.clone()),
        }
    }

    /// Looks up the modern state id for a legacy block id and data nibble.
    pub fn resolve(&self, legacy_id: u16, data: u8) -> Option<u16> {
        self.entries.get(&lookup_key(legacy_id, data)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn lookup_key(legacy_id: u16, data: u8) -> u32 {
    u32::from(legacy_id) << 8 | u32::from(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_dataset_loads() {
        let table = LegacyBlockTable::global().unwrap();
        assert!(!table.is_empty());
        // Stone has kept state id 1 since the flattening.
        assert_eq!(table.resolve(1, 0), Some(1));
    }

    #[test]
    fn test_unknown_pair_resolves_to_none() {
        let table = LegacyBlockTable::global().unwrap();
        assert_eq!(table.resolve(999, 7), None);
    }

    #[test]
    fn test_data_nibble_distinguishes_entries() {
        let table =
            LegacyBlockTable::from_json(r#"[{"block":1,"data":0,"state":1},{"block":1,"data":1,"state":2}]"#)
                .unwrap();
        assert_eq!(table.resolve(1, 0), Some(1));
        assert_eq!(table.resolve(1, 1), Some(2));
        assert_eq!(table.resolve(1, 2), None);
    }

    #[test]
    fn test_malformed_dataset_is_an_error() {
        assert!(LegacyBlockTable::from_json("not json").is_err());
    }
}
