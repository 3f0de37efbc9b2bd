//! FASTA parsing and writing
//!
//! Source adapters hand their raw response text to [`parse_records`] or
//! [`parse_classified`]; the pipeline writes the final result sets with
//! [`write_records`].

use crate::error::{Result, SeedbankError};
use crate::types::{SeedRecord, Tier};
use bio::io::fasta;
use std::path::Path;

/// Parse a FASTA payload, assigning every record the same tier.
pub fn parse_records(text: &str, tier: Tier) -> Result<Vec<SeedRecord>> {
    parse_classified(text, |_| tier)
}

/// Parse a FASTA payload, assigning each record the tier returned by
/// `classify` for its identifier.
pub fn parse_classified<F>(text: &str, classify: F) -> Result<Vec<SeedRecord>>
where
    F: Fn(&str) -> Tier,
{
    let reader = fasta::Reader::new(text.as_bytes());
    let mut records = Vec::new();

    for result in reader.records() {
        let record =
            result.map_err(|e| SeedbankError::Parse(format!("invalid FASTA record: {}", e)))?;
        let residues = String::from_utf8_lossy(record.seq()).into_owned();
        let tier = classify(record.id());
        records.push(SeedRecord::new(record.id(), record.desc(), residues, tier));
    }

    Ok(records)
}

/// Write records to a FASTA file, creating or truncating it.
pub fn write_records(path: impl AsRef<Path>, records: &[SeedRecord]) -> Result<()> {
    let mut writer = fasta::Writer::to_file(path.as_ref())?;

    for record in records {
        writer.write(
            &record.id,
            record.description.as_deref(),
            record.residues.as_bytes(),
        )?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const PAYLOAD: &str = ">NP_000001.1 insulin precursor [Homo sapiens]\n\
                           MALWMRLLPLLALLALWGPDPAAA\n\
                           FVNQHLCGSHLVEALYLVCGERGF\n\
                           >XP_012345.1\n\
                           MKTAYIAKQRQISFVKSHFSRQLE\n";

    #[test]
    fn test_parse_uniform_tier() {
        let records = parse_records(PAYLOAD, Tier::Silver).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "NP_000001.1");
        assert_eq!(
            records[0].description.as_deref(),
            Some("insulin precursor [Homo sapiens]")
        );
        // Multi-line sequences are concatenated
        assert_eq!(records[0].residues.len(), 48);
        assert!(records.iter().all(|r| r.tier == Tier::Silver));
        // Second record has no description
        assert_eq!(records[1].description, None);
    }

    #[test]
    fn test_parse_classified_per_record() {
        let records = parse_classified(PAYLOAD, |id| {
            if id.starts_with("NP_") {
                Tier::Gold
            } else {
                Tier::Silver
            }
        })
        .unwrap();
        assert_eq!(records[0].tier, Tier::Gold);
        assert_eq!(records[1].tier, Tier::Silver);
    }

    #[test]
    fn test_parse_empty_payload() {
        let records = parse_records("", Tier::Gold).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_write_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.fasta");

        let records = vec![
            SeedRecord::new("P01308", Some("Insulin"), "MALWMRLLPL", Tier::Gold),
            SeedRecord::new("A0A024", None, "MKTAYIAKQR", Tier::Silver),
        ];
        write_records(&path, &records).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with(">P01308 Insulin\n"));
        assert!(written.contains(">A0A024\n"));
        assert!(written.contains("MKTAYIAKQR"));
    }
}
