//! Retrieval pipeline
//!
//! Coordinates the three source adapters, merges their records and writes
//! the two result files. No single source failure aborts the run; the
//! pipeline prefers partial data over nothing and only fails if the output
//! files cannot be written.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::{InterProConfig, NcbiConfig, RunConfig, UniProtConfig};
use crate::http::BackoffPolicy;
use crate::merge;
use crate::reduce::{SeedReducer, UniformSampler};
use crate::sources::interpro::InterProClient;
use crate::sources::ncbi::NcbiClient;
use crate::sources::uniprot::UniProtClient;
use seedbank_common::fasta;
use seedbank_common::types::{SeedRecord, Tier};

/// Counts and output locations of a finished run.
#[derive(Debug)]
pub struct RetrievalSummary {
    pub gold_count: usize,
    pub broad_count: usize,
    pub gold_path: PathBuf,
    pub broad_path: PathBuf,
}

/// End-to-end seed retrieval run.
pub struct SeedPipeline {
    run: RunConfig,
    ncbi: NcbiConfig,
    uniprot: UniProtConfig,
    interpro: InterProConfig,
    backoff: BackoffPolicy,
    reducer: Box<dyn SeedReducer>,
}

impl SeedPipeline {
    /// Create a pipeline with default source configurations and the uniform
    /// sampling reducer.
    pub fn new(run: RunConfig) -> Self {
        Self {
            run,
            ncbi: NcbiConfig::from_env(),
            uniprot: UniProtConfig::from_env(),
            interpro: InterProConfig::from_env(),
            backoff: BackoffPolicy::default(),
            reducer: Box::new(UniformSampler),
        }
    }

    pub fn with_ncbi_config(mut self, config: NcbiConfig) -> Self {
        self.ncbi = config;
        self
    }

    pub fn with_uniprot_config(mut self, config: UniProtConfig) -> Self {
        self.uniprot = config;
        self
    }

    pub fn with_interpro_config(mut self, config: InterProConfig) -> Self {
        self.interpro = config;
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Swap in a different reduction strategy (e.g. a clustering-backed one).
    pub fn with_reducer(mut self, reducer: Box<dyn SeedReducer>) -> Self {
        self.reducer = reducer;
        self
    }

    /// Run retrieval for the given query terms and optional family
    /// accession, writing `<out_prefix>_seeds_gold.fasta` and
    /// `<out_prefix>_seeds_broad.fasta`.
    pub async fn run(
        &self,
        queries: &[String],
        interpro_id: Option<&str>,
        out_prefix: &str,
    ) -> Result<RetrievalSummary> {
        self.run.validate()?;

        let mut all_records: Vec<SeedRecord> = Vec::new();

        // 1. NCBI, all query terms
        if queries.is_empty() {
            debug!("No query terms given, skipping NCBI and UniProt retrieval");
        } else {
            let ncbi = NcbiClient::new(self.ncbi.clone(), self.backoff.clone())?;
            all_records.extend(ncbi.retrieve(queries, &self.run).await);
        }

        // The UniProt client also serves the InterPro accession resolution
        let uniprot = UniProtClient::new(self.uniprot.clone(), self.backoff.clone())?;

        // 2. UniProt text search, per query term
        for query in queries {
            let query = query.trim();
            if query.len() < 3 {
                continue;
            }
            all_records.extend(uniprot.search(query, &self.run).await);
        }

        // 3. InterPro family accession
        if let Some(accession) = interpro_id {
            let interpro = InterProClient::new(self.interpro.clone(), self.backoff.clone())?;
            all_records.extend(interpro.retrieve(accession, &self.run, &uniprot).await);
        } else {
            debug!("No InterPro accession given, skipping InterPro retrieval");
        }

        // Curated-only mode guarantees zero SILVER output no matter what the
        // adapters returned
        if self.run.reviewed_only {
            all_records.retain(|r| r.tier == Tier::Gold);
        }

        // 4. Merge, stratify and cap
        let seeds = merge::merge_and_stratify(all_records);
        let broad = merge::build_broad_set(&seeds, self.run.max_seeds, self.reducer.as_ref());

        // 5. Write outputs
        let gold_path = PathBuf::from(format!("{}_seeds_gold.fasta", out_prefix));
        let broad_path = PathBuf::from(format!("{}_seeds_broad.fasta", out_prefix));

        fasta::write_records(&gold_path, &seeds.gold)
            .with_context(|| format!("Failed to write {}", gold_path.display()))?;
        fasta::write_records(&broad_path, &broad)
            .with_context(|| format!("Failed to write {}", broad_path.display()))?;

        let summary = RetrievalSummary {
            gold_count: seeds.gold.len(),
            broad_count: broad.len(),
            gold_path,
            broad_path,
        };

        info!(
            gold = summary.gold_count,
            broad = summary.broad_count,
            curated_only = self.run.reviewed_only,
            gold_file = %summary.gold_path.display(),
            broad_file = %summary.broad_path.display(),
            "Seed retrieval complete"
        );

        Ok(summary)
    }
}
