//! Source adapters
//!
//! One adapter per public database. Each adapter knows how to search and
//! page its API, tags every record with a confidence tier at parse time, and
//! degrades any single query's failure to zero records instead of aborting
//! the run.

pub mod interpro;
pub mod ncbi;
pub mod uniprot;
