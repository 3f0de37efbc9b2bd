//! Seedbank Library
//!
//! Retrieval of candidate protein sequences ("seeds") for gene-family
//! identification, with merge/deduplicate/stratify post-processing.
//!
//! # Supported Sources
//!
//! - **NCBI Protein**: E-utilities esearch/efetch over RefSeq
//! - **UniProtKB**: REST text search (Swiss-Prot and TrEMBL)
//! - **InterPro**: EBI REST API, resolved through UniProt batch lookup
//!
//! # Example
//!
//! ```no_run
//! use seedbank::config::RunConfig;
//! use seedbank::pipeline::SeedPipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let run = RunConfig {
//!         email: "user@example.org".to_string(),
//!         max_seeds: 10_000,
//!         ..RunConfig::default()
//!     };
//!     let queries = vec!["GDSL lipase".to_string()];
//!     SeedPipeline::new(run)
//!         .run(&queries, Some("IPR001087"), "./gelp")
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod config;
pub mod http;
pub mod merge;
pub mod pipeline;
pub mod progress;
pub mod reduce;
pub mod sources;

// Re-export the main entry points
pub use pipeline::{RetrievalSummary, SeedPipeline};
