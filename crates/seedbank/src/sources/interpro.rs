//! InterPro source adapter (EBI REST API)
//!
//! Given a family/domain accession, walks the reviewed protein endpoint
//! first (GOLD), following the `next` cursor until exhausted or the record
//! cap is reached, then the unreviewed endpoint for the remaining quota
//! (SILVER). The collected UniProt accessions are resolved to sequences
//! through the UniProt batch lookup.

use anyhow::Result;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::{InterProConfig, RunConfig};
use crate::http::{BackoffPolicy, HttpClient};
use crate::progress;
use crate::sources::uniprot::UniProtClient;
use seedbank_common::types::{SeedRecord, Tier};

/// Map a family/domain accession to its member database namespace.
///
/// `IPR…` accessions live in the InterPro namespace itself, `cd…`/`sd…` in
/// the conserved-domain database, `PF…` in Pfam.
pub fn member_db(accession: &str) -> &'static str {
    if accession.starts_with("PF") {
        "pfam"
    } else if accession.starts_with("cd") || accession.starts_with("sd") {
        "cdd"
    } else {
        "interpro"
    }
}

#[derive(Debug, Deserialize)]
struct ProteinPage {
    #[serde(default)]
    results: Vec<ProteinEntry>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProteinEntry {
    #[serde(default)]
    metadata: ProteinMetadata,
}

#[derive(Debug, Deserialize, Default)]
struct ProteinMetadata {
    accession: Option<String>,
}

/// Client for the InterPro REST API
pub struct InterProClient {
    http: HttpClient,
    config: InterProConfig,
}

impl InterProClient {
    /// Create a new client with the adapter configuration and the shared
    /// backoff policy.
    pub fn new(config: InterProConfig, backoff: BackoffPolicy) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::new(config.timeout(), backoff)?;
        Ok(Self { http, config })
    }

    /// Retrieve seeds for one family accession, resolving the collected
    /// protein accessions through `uniprot`.
    pub async fn retrieve(
        &self,
        accession: &str,
        run: &RunConfig,
        uniprot: &UniProtClient,
    ) -> Vec<SeedRecord> {
        info!(
            accession,
            db = member_db(accession),
            "InterPro retrieval starting"
        );

        let mut results = Vec::new();

        // Reviewed (Swiss-Prot backed) entries first
        let gold_accessions = self
            .collect_accessions(accession, "reviewed", run.taxid.as_deref(), run.max_seeds)
            .await;
        info!(
            count = gold_accessions.len(),
            "InterPro reviewed accessions collected"
        );
        results.extend(uniprot.fetch_accessions(&gold_accessions, Tier::Gold).await);

        // Unreviewed entries fill the remaining quota, unless curated-only
        if !run.reviewed_only {
            let remaining = run.max_seeds.saturating_sub(results.len());
            if remaining > 0 {
                let silver_accessions = self
                    .collect_accessions(accession, "unreviewed", run.taxid.as_deref(), remaining)
                    .await;
                info!(
                    count = silver_accessions.len(),
                    "InterPro unreviewed accessions collected"
                );
                results.extend(
                    uniprot
                        .fetch_accessions(&silver_accessions, Tier::Silver)
                        .await,
                );
            }
        }

        results
    }

    /// Walk the paginated protein endpoint, following `next` cursors until
    /// exhausted or `limit` accessions are collected.
    ///
    /// A failing page keeps whatever was collected before it.
    async fn collect_accessions(
        &self,
        accession: &str,
        endpoint: &str,
        taxid: Option<&str>,
        limit: usize,
    ) -> Vec<String> {
        let mut url = format!(
            "{}/protein/{}/entry/{}/{}/",
            self.config.base_url,
            endpoint,
            member_db(accession),
            accession
        );
        if let Some(taxid) = taxid {
            url.push_str(&format!("taxonomy/uniprot/{}/", taxid));
        }

        let bar = progress::spinner(&format!("InterPro {} pages", endpoint));
        let mut accessions = Vec::new();
        let mut next = Some(url);

        while let Some(page_url) = next {
            if accessions.len() >= limit {
                break;
            }

            let body = match self.http.get_text(&page_url, &[]).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(
                        url = %page_url,
                        error = %e,
                        "InterPro page failed, keeping records collected so far"
                    );
                    break;
                },
            };

            let page: ProteinPage = match serde_json::from_str(&body) {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        url = %page_url,
                        error = %e,
                        "Malformed InterPro payload, keeping records collected so far"
                    );
                    break;
                },
            };

            for entry in page.results {
                if let Some(acc) = entry.metadata.accession {
                    accessions.push(acc);
                }
            }
            bar.tick();
            next = page.next;
        }

        bar.finish_and_clear();
        accessions.truncate(limit);
        accessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_db_inference() {
        assert_eq!(member_db("IPR001087"), "interpro");
        assert_eq!(member_db("PF00657"), "pfam");
        assert_eq!(member_db("cd00519"), "cdd");
        assert_eq!(member_db("sd00123"), "cdd");
        // Unknown prefixes fall back to the InterPro namespace
        assert_eq!(member_db("SSF51445"), "interpro");
    }

    #[test]
    fn test_page_parsing_with_next_cursor() {
        let body = r#"{
            "count": 2,
            "results": [
                {"metadata": {"accession": "P01308", "name": "INS_HUMAN"}},
                {"metadata": {"accession": "P01315"}}
            ],
            "next": "https://www.ebi.ac.uk/interpro/api/protein/reviewed/entry/pfam/PF00657/?cursor=abc"
        }"#;
        let page: ProteinPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.results.len(), 2);
        assert!(page.next.is_some());
    }

    #[test]
    fn test_page_parsing_last_page() {
        let body = r#"{"results": [], "next": null}"#;
        let page: ProteinPage = serde_json::from_str(body).unwrap();
        assert!(page.results.is_empty());
        assert!(page.next.is_none());
    }
}
