//! Reduction strategies for oversized broad sets

use rand::seq::SliceRandom;

use seedbank_common::types::SeedRecord;

/// Strategy for shrinking an oversized record set to at most `limit`
/// representatives.
///
/// The pipeline takes any implementation; a clustering-backed reducer can be
/// swapped in where one is available. [`UniformSampler`] is the default.
pub trait SeedReducer {
    fn reduce(&self, records: Vec<SeedRecord>, limit: usize) -> Vec<SeedRecord>;
}

/// Uniform random sampling without replacement.
#[derive(Debug, Default)]
pub struct UniformSampler;

impl SeedReducer for UniformSampler {
    fn reduce(&self, mut records: Vec<SeedRecord>, limit: usize) -> Vec<SeedRecord> {
        if records.len() <= limit {
            return records;
        }
        records.shuffle(&mut rand::thread_rng());
        records.truncate(limit);
        records
    }
}
