//! Retrieval configuration
//!
//! One [`RunConfig`] carries the per-run parameters the CLI collects; the
//! per-source configs carry endpoint URLs, batch/pool sizing and pacing.
//! Base URLs are plain fields so tests can point adapters at a local mock
//! server.

use std::time::Duration;

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

/// Parameters of a single retrieval run, scoped to that run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Contact e-mail, required by the NCBI E-utilities
    pub email: String,
    /// NCBI API key; raises the published rate cap from 3/s to 10/s
    pub api_key: Option<String>,
    /// Taxonomy restriction applied to InterPro retrieval
    pub taxid: Option<String>,
    /// Cap on records per query and on the final broad set
    pub max_seeds: usize,
    /// Curated-only mode: suppress all SILVER retrieval and output
    pub reviewed_only: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            email: String::new(),
            api_key: None,
            taxid: None,
            max_seeds: 10_000,
            reviewed_only: false,
        }
    }
}

impl RunConfig {
    /// Validate the run configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.email.is_empty() || !self.email.contains('@') {
            anyhow::bail!(
                "A contact e-mail is required by the NCBI E-utilities, got: '{}'",
                self.email
            );
        }
        if self.max_seeds == 0 {
            anyhow::bail!("max_seeds must be greater than 0");
        }
        Ok(())
    }
}

/// NCBI E-utilities adapter configuration
#[derive(Debug, Clone)]
pub struct NcbiConfig {
    /// E-utilities base URL
    pub base_url: String,
    /// Identifiers per efetch request
    pub batch_size: usize,
    /// Concurrent efetch workers (small pool, the source is rate-limited)
    pub pool_size: usize,
    /// Pause between successive query terms
    pub query_pause: Duration,
    /// Random jitter added to the query pause
    pub query_pause_jitter: Duration,
    /// Politeness pause before each efetch batch
    pub batch_pause: Duration,
    /// Random jitter added to the batch pause
    pub batch_pause_jitter: Duration,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for NcbiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://eutils.ncbi.nlm.nih.gov/entrez/eutils".to_string(),
            batch_size: 400,
            pool_size: 3,
            query_pause: Duration::from_secs(2),
            query_pause_jitter: Duration::from_secs(1),
            batch_pause: Duration::from_millis(500),
            batch_pause_jitter: Duration::from_millis(500),
            timeout_secs: 60,
        }
    }
}

impl NcbiConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("SEEDBANK_NCBI_BASE_URL") {
            config.base_url = url;
        }
        if let Some(n) = env_usize("SEEDBANK_NCBI_BATCH_SIZE") {
            config.batch_size = n;
        }
        if let Some(n) = env_usize("SEEDBANK_NCBI_POOL_SIZE") {
            config.pool_size = n;
        }

        config
    }

    /// Validate the NCBI configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.is_empty() {
            anyhow::bail!("NCBI base URL cannot be empty");
        }
        if self.batch_size == 0 {
            anyhow::bail!("NCBI batch size must be greater than 0");
        }
        if self.pool_size == 0 {
            anyhow::bail!("NCBI pool size must be greater than 0");
        }
        Ok(())
    }

    /// Get the request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// UniProtKB adapter configuration
#[derive(Debug, Clone)]
pub struct UniProtConfig {
    /// UniProt REST base URL
    pub base_url: String,
    /// Page size cap for the reviewed (Swiss-Prot) search
    pub gold_page_cap: usize,
    /// Page size cap for the unreviewed (TrEMBL) search
    pub silver_page_cap: usize,
    /// Accessions per batch lookup request
    pub lookup_batch_size: usize,
    /// Concurrent batch-lookup workers (large pool, bulk downloads)
    pub lookup_pool_size: usize,
    /// Per-request timeout for text searches in seconds
    pub timeout_secs: u64,
    /// Per-request timeout for batch lookups in seconds
    pub lookup_timeout_secs: u64,
}

impl Default for UniProtConfig {
    fn default() -> Self {
        Self {
            base_url: "https://rest.uniprot.org".to_string(),
            gold_page_cap: 2000,
            silver_page_cap: 500,
            lookup_batch_size: 100,
            lookup_pool_size: 20,
            timeout_secs: 60,
            lookup_timeout_secs: 45,
        }
    }
}

impl UniProtConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("SEEDBANK_UNIPROT_BASE_URL") {
            config.base_url = url;
        }
        if let Some(n) = env_usize("SEEDBANK_UNIPROT_LOOKUP_BATCH_SIZE") {
            config.lookup_batch_size = n;
        }
        if let Some(n) = env_usize("SEEDBANK_UNIPROT_LOOKUP_POOL_SIZE") {
            config.lookup_pool_size = n;
        }

        config
    }

    /// Validate the UniProt configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.is_empty() {
            anyhow::bail!("UniProt base URL cannot be empty");
        }
        if self.lookup_batch_size == 0 {
            anyhow::bail!("UniProt lookup batch size must be greater than 0");
        }
        if self.lookup_pool_size == 0 {
            anyhow::bail!("UniProt lookup pool size must be greater than 0");
        }
        Ok(())
    }

    /// Get the search timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the batch-lookup timeout as Duration
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }
}

/// InterPro adapter configuration
#[derive(Debug, Clone)]
pub struct InterProConfig {
    /// InterPro REST base URL
    pub base_url: String,
    /// Per-page request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for InterProConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.ebi.ac.uk/interpro/api".to_string(),
            timeout_secs: 30,
        }
    }
}

impl InterProConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("SEEDBANK_INTERPRO_BASE_URL") {
            config.base_url = url;
        }

        config
    }

    /// Validate the InterPro configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.is_empty() {
            anyhow::bail!("InterPro base URL cannot be empty");
        }
        Ok(())
    }

    /// Get the request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
