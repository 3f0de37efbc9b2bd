//! NCBI Protein source adapter (E-utilities)
//!
//! Searches RefSeq through `esearch.fcgi`, then downloads the matching
//! records as FASTA through `efetch.fcgi` in concurrent batches. The source
//! is aggressively rate-limited, so the adapter paces itself between query
//! terms and before every batch, on top of the shared backoff policy.

use anyhow::{Context, Result};
use rand::Rng;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::batch;
use crate::config::{NcbiConfig, RunConfig};
use crate::http::{BackoffPolicy, HttpClient};
use seedbank_common::fasta;
use seedbank_common::types::{SeedRecord, Tier};

/// RefSeq property filter covering the whole of RefSeq.
const PROP_ALL_REFSEQ: &str = "srcdb_refseq[PROP]";
/// RefSeq property filter excluding predicted (XP/XM) models.
const PROP_CURATED_REFSEQ: &str = "srcdb_refseq_known[PROP]";

/// Classify a RefSeq accession into a confidence tier.
///
/// `NP_`/`YP_` accessions are curated proteins; `XP_` are computational
/// predictions, and everything else (`WP_` and friends) is treated the same
/// way.
pub fn classify_accession(accession: &str) -> Tier {
    if accession.starts_with("NP_") || accession.starts_with("YP_") {
        Tier::Gold
    } else {
        Tier::Silver
    }
}

#[derive(Debug, Deserialize)]
struct EsearchResponse {
    esearchresult: EsearchResult,
}

#[derive(Debug, Deserialize)]
struct EsearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

/// Client for the NCBI Protein database
pub struct NcbiClient {
    http: HttpClient,
    config: NcbiConfig,
}

impl NcbiClient {
    /// Create a new client with the adapter configuration and the shared
    /// backoff policy.
    pub fn new(config: NcbiConfig, backoff: BackoffPolicy) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::new(config.timeout(), backoff)?;
        Ok(Self { http, config })
    }

    /// Retrieve records for every query term, pacing between terms.
    ///
    /// A failing term is logged and contributes nothing.
    pub async fn retrieve(&self, queries: &[String], run: &RunConfig) -> Vec<SeedRecord> {
        if run.api_key.is_some() {
            info!("NCBI API key present (10 requests/sec limit)");
        } else {
            info!("No NCBI API key (3 requests/sec limit, consider getting one)");
        }

        let mut all_records = Vec::new();
        let mut first = true;

        for query in queries {
            let query = query.trim();
            if query.len() < 2 {
                continue;
            }

            if !first {
                let pause = jittered(self.config.query_pause, self.config.query_pause_jitter);
                debug!(pause_ms = pause.as_millis() as u64, "Pausing between NCBI queries");
                tokio::time::sleep(pause).await;
            }
            first = false;

            match self.retrieve_query(query, run).await {
                Ok(mut records) => {
                    info!(query, count = records.len(), "NCBI retrieval complete");
                    all_records.append(&mut records);
                },
                Err(e) => {
                    warn!(query, error = %e, "NCBI query failed, contributing no records");
                },
            }
        }

        all_records
    }

    async fn retrieve_query(&self, query: &str, run: &RunConfig) -> Result<Vec<SeedRecord>> {
        let ids = self.search_ids(query, run).await?;
        info!(
            query,
            count = ids.len(),
            curated_only = run.reviewed_only,
            "NCBI search complete"
        );

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self.fetch_records(&ids, run).await)
    }

    /// Resolve a text query into protein record identifiers via esearch.
    async fn search_ids(&self, query: &str, run: &RunConfig) -> Result<Vec<String>> {
        let prop = if run.reviewed_only {
            PROP_CURATED_REFSEQ
        } else {
            PROP_ALL_REFSEQ
        };
        let url = format!("{}/esearch.fcgi", self.config.base_url);

        let mut params: Vec<(&str, String)> = vec![
            ("db", "protein".to_string()),
            ("term", format!("{} AND {}", query, prop)),
            ("retmax", run.max_seeds.to_string()),
            ("retmode", "json".to_string()),
            ("email", run.email.clone()),
        ];
        if let Some(key) = &run.api_key {
            params.push(("api_key", key.clone()));
        }

        let body = self.http.get_text(&url, &params).await?;
        let response: EsearchResponse =
            serde_json::from_str(&body).context("Malformed esearch payload")?;

        Ok(response.esearchresult.idlist)
    }

    /// Download FASTA for the identifier list via efetch, in concurrent
    /// batches through the batch fetch engine.
    async fn fetch_records(&self, ids: &[String], run: &RunConfig) -> Vec<SeedRecord> {
        let batches = batch::partition(ids, self.config.batch_size);
        let url = format!("{}/efetch.fcgi", self.config.base_url);
        let reviewed_only = run.reviewed_only;

        batch::fetch_batches(batches, self.config.pool_size, "NCBI batches", |ids, _index| {
            let http = self.http.clone();
            let url = url.clone();
            let email = run.email.clone();
            let api_key = run.api_key.clone();
            let pause = self.batch_pause(run);

            async move {
                tokio::time::sleep(pause).await;

                let mut form: Vec<(&str, String)> = vec![
                    ("db", "protein".to_string()),
                    ("id", ids.join(",")),
                    ("rettype", "fasta".to_string()),
                    ("retmode", "text".to_string()),
                    ("email", email),
                ];
                if let Some(key) = api_key {
                    form.push(("api_key", key));
                }

                let body = http.post_form_text(&url, &form).await?;
                let mut records = fasta::parse_classified(&body, classify_accession)?;
                if reviewed_only {
                    // The curated property filter should already exclude
                    // predicted models; drop any stragglers.
                    records.retain(|r| r.tier == Tier::Gold);
                }
                Ok(records)
            }
        })
        .await
    }

    /// Politeness pause before a batch; halved when an API key raises the
    /// published rate cap.
    fn batch_pause(&self, run: &RunConfig) -> Duration {
        let base = if run.api_key.is_some() {
            self.config.batch_pause / 2
        } else {
            self.config.batch_pause
        };
        jittered(base, self.config.batch_pause_jitter)
    }
}

fn jittered(base: Duration, jitter: Duration) -> Duration {
    if jitter.is_zero() {
        return base;
    }
    let bound = jitter.as_millis() as u64;
    base + Duration::from_millis(rand::thread_rng().gen_range(0..=bound))
}
