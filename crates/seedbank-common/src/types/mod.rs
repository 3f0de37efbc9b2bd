//! Common types used across seedbank

use serde::{Deserialize, Serialize};

/// Confidence tier of a retrieved sequence record.
///
/// `Gold` marks curated/reviewed provenance (RefSeq NP/YP, Swiss-Prot,
/// InterPro reviewed); `Silver` marks predicted/unreviewed provenance
/// (RefSeq XP, TrEMBL, InterPro unreviewed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Gold,
    Silver,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Gold => write!(f, "GOLD"),
            Tier::Silver => write!(f, "SILVER"),
        }
    }
}

/// A candidate seed sequence retrieved from one of the source databases.
///
/// The tier is assigned by the source adapter when the record is parsed and
/// never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRecord {
    /// Record identifier (accession, possibly versioned)
    pub id: String,

    /// Free-text FASTA description, when the source provided one
    pub description: Option<String>,

    /// Amino-acid residue string as returned by the source
    pub residues: String,

    /// Confidence tier assigned at construction
    pub tier: Tier,
}

impl SeedRecord {
    /// Create a new record with its tier fixed at construction time.
    pub fn new(
        id: impl Into<String>,
        description: Option<&str>,
        residues: impl Into<String>,
        tier: Tier,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.map(str::to_string),
            residues: residues.into(),
            tier,
        }
    }
}
