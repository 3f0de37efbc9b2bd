//! Merge & stratify stage
//!
//! Takes the concatenated records from every adapter, deduplicates them by
//! exact residue content (first occurrence wins, whatever its tier) and
//! partitions the survivors into the GOLD and SILVER lists. The broad set is
//! GOLD ++ SILVER, reduced through a [`SeedReducer`] when oversized.

use std::collections::HashSet;
use tracing::info;

use crate::reduce::SeedReducer;
use seedbank_common::types::{SeedRecord, Tier};

/// Residue-deduplicated, tier-partitioned result set.
///
/// Invariant: no two records across both lists share identical uppercased
/// residue content, and every record sits in the list matching its tier.
#[derive(Debug, Default)]
pub struct StratifiedSeeds {
    pub gold: Vec<SeedRecord>,
    pub silver: Vec<SeedRecord>,
}

impl StratifiedSeeds {
    pub fn total(&self) -> usize {
        self.gold.len() + self.silver.len()
    }
}

/// Deduplicate by uppercased residue string (first occurrence in merge order
/// wins) and partition by tier.
pub fn merge_and_stratify(records: Vec<SeedRecord>) -> StratifiedSeeds {
    let input_count = records.len();
    let mut seen: HashSet<String> = HashSet::new();
    let mut seeds = StratifiedSeeds::default();

    for record in records {
        if !seen.insert(record.residues.to_uppercase()) {
            continue;
        }
        match record.tier {
            Tier::Gold => seeds.gold.push(record),
            Tier::Silver => seeds.silver.push(record),
        }
    }

    info!(
        input = input_count,
        gold = seeds.gold.len(),
        silver = seeds.silver.len(),
        "Deduplicated and stratified records"
    );

    seeds
}

/// Build the broad set (GOLD first, then SILVER), reducing it through
/// `reducer` when it exceeds `max_seeds`.
pub fn build_broad_set(
    seeds: &StratifiedSeeds,
    max_seeds: usize,
    reducer: &dyn SeedReducer,
) -> Vec<SeedRecord> {
    let broad: Vec<SeedRecord> = seeds
        .gold
        .iter()
        .chain(seeds.silver.iter())
        .cloned()
        .collect();

    if broad.len() <= max_seeds {
        return broad;
    }

    info!(
        size = broad.len(),
        limit = max_seeds,
        "Broad set over limit, reducing"
    );
    reducer.reduce(broad, max_seeds)
}
