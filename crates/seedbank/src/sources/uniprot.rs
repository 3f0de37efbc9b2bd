//! UniProtKB source adapter
//!
//! Two jobs: free-text search against `/uniprotkb/search` (one reviewed and
//! one unreviewed pass per query term), and the `/uniprotkb/accessions`
//! batch lookup that the InterPro adapter uses to resolve accessions into
//! sequences.

use anyhow::Result;
use tracing::{info, warn};

use crate::batch;
use crate::config::{RunConfig, UniProtConfig};
use crate::http::{BackoffPolicy, HttpClient};
use seedbank_common::fasta;
use seedbank_common::types::{SeedRecord, Tier};

/// Client for the UniProtKB REST API
pub struct UniProtClient {
    search_http: HttpClient,
    lookup_http: HttpClient,
    config: UniProtConfig,
}

impl UniProtClient {
    /// Create a new client with the adapter configuration and the shared
    /// backoff policy.
    pub fn new(config: UniProtConfig, backoff: BackoffPolicy) -> Result<Self> {
        config.validate()?;
        let search_http = HttpClient::new(config.timeout(), backoff.clone())?;
        let lookup_http = HttpClient::new(config.lookup_timeout(), backoff)?;
        Ok(Self {
            search_http,
            lookup_http,
            config,
        })
    }

    /// Text search for one query term: Swiss-Prot (GOLD) first, then TrEMBL
    /// (SILVER) for the remaining quota unless curated-only mode is set.
    ///
    /// A failing search is logged and contributes nothing.
    pub async fn search(&self, query: &str, run: &RunConfig) -> Vec<SeedRecord> {
        let mut results = Vec::new();

        let gold_cap = run.max_seeds.min(self.config.gold_page_cap);
        match self.search_tier(query, Tier::Gold, gold_cap).await {
            Ok(mut records) => {
                info!(query, count = records.len(), "Swiss-Prot search complete");
                results.append(&mut records);
            },
            Err(e) => {
                warn!(query, error = %e, "Swiss-Prot search failed, contributing no records");
            },
        }

        if !run.reviewed_only {
            let remaining = run.max_seeds.saturating_sub(results.len());
            if remaining > 0 {
                let silver_cap = remaining.min(self.config.silver_page_cap);
                match self.search_tier(query, Tier::Silver, silver_cap).await {
                    Ok(mut records) => {
                        info!(query, count = records.len(), "TrEMBL search complete");
                        results.append(&mut records);
                    },
                    Err(e) => {
                        warn!(query, error = %e, "TrEMBL search failed, contributing no records");
                    },
                }
            }
        }

        results
    }

    async fn search_tier(&self, query: &str, tier: Tier, cap: usize) -> Result<Vec<SeedRecord>> {
        let reviewed = matches!(tier, Tier::Gold);
        let url = format!("{}/uniprotkb/search", self.config.base_url);
        let params = [
            ("query", format!("{} AND (reviewed:{})", query, reviewed)),
            ("format", "fasta".to_string()),
            ("size", cap.to_string()),
        ];

        let body = self.search_http.get_text(&url, &params).await?;
        let mut records = fasta::parse_records(&body, tier)?;
        records.truncate(cap);
        Ok(records)
    }

    /// Resolve UniProt accessions to sequences through the batch lookup
    /// endpoint, in concurrent batches through the batch fetch engine.
    pub async fn fetch_accessions(&self, accessions: &[String], tier: Tier) -> Vec<SeedRecord> {
        if accessions.is_empty() {
            return Vec::new();
        }

        info!(
            count = accessions.len(),
            tier = %tier,
            "Resolving accessions through UniProt batch lookup"
        );

        let batches = batch::partition(accessions, self.config.lookup_batch_size);
        let url = format!("{}/uniprotkb/accessions", self.config.base_url);

        batch::fetch_batches(
            batches,
            self.config.lookup_pool_size,
            "UniProt lookups",
            |accessions, _index| {
                let http = self.lookup_http.clone();
                let url = url.clone();

                async move {
                    let params = [
                        ("accessions", accessions.join(",")),
                        ("format", "fasta".to_string()),
                    ];
                    let body = http.get_text(&url, &params).await?;
                    Ok(fasta::parse_records(&body, tier)?)
                }
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_rejects_invalid_config() {
        let config = UniProtConfig {
            lookup_batch_size: 0,
            ..UniProtConfig::default()
        };
        assert!(UniProtClient::new(config, BackoffPolicy::default()).is_err());
    }
}
