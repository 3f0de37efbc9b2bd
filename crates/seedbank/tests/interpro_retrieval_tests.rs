//! Integration tests for the InterPro adapter against a mock EBI server
//!
//! These tests validate:
//! - Cursor pagination over the reviewed endpoint
//! - Resolution of collected accessions through the UniProt batch lookup
//! - Curated-only mode skipping the unreviewed endpoint
//! - The record cap stopping pagination early
//! - The taxonomy path segment

use std::time::Duration;

use seedbank::config::{InterProConfig, RunConfig, UniProtConfig};
use seedbank::http::BackoffPolicy;
use seedbank::sources::interpro::InterProClient;
use seedbank::sources::uniprot::UniProtClient;
use seedbank_common::types::Tier;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_backoff() -> BackoffPolicy {
    BackoffPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(1),
        rate_limit_base: Duration::from_millis(1),
        rate_limit_step: Duration::from_millis(1),
        jitter: Duration::ZERO,
    }
}

fn interpro_config(server: &MockServer) -> InterProConfig {
    InterProConfig {
        base_url: server.uri(),
        timeout_secs: 5,
    }
}

fn uniprot_client(server: &MockServer) -> UniProtClient {
    let config = UniProtConfig {
        base_url: server.uri(),
        timeout_secs: 5,
        lookup_timeout_secs: 5,
        ..UniProtConfig::default()
    };
    UniProtClient::new(config, fast_backoff()).unwrap()
}

fn test_run() -> RunConfig {
    RunConfig {
        email: "tests@example.org".to_string(),
        ..RunConfig::default()
    }
}

fn page_body(accessions: &[&str], next: Option<&str>) -> String {
    let results: Vec<String> = accessions
        .iter()
        .map(|acc| format!(r#"{{"metadata":{{"accession":"{}"}}}}"#, acc))
        .collect();
    let next = match next {
        Some(url) => format!(r#""{}""#, url),
        None => "null".to_string(),
    };
    format!(
        r#"{{"count":{},"results":[{}],"next":{}}}"#,
        accessions.len(),
        results.join(","),
        next
    )
}

const LOOKUP_BODY: &str = ">sp|P01308|INS_HUMAN Insulin OS=Homo sapiens\n\
                           MALWMRLLPLLALLALWGPDPAAA\n\
                           >sp|P01315|INS_PIG Insulin OS=Sus scrofa\n\
                           MALWTRLLPLLALLALWAPAPAQA\n";

#[tokio::test]
async fn test_pagination_follows_next_cursor() {
    let server = MockServer::start().await;
    let reviewed_path = "/protein/reviewed/entry/pfam/PF00657/";

    // First request hits page one, the follow-up (with cursor) falls through
    // to the second mock once this one is exhausted
    Mock::given(method("GET"))
        .and(path(reviewed_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_body(
            &["P01308"],
            Some(&format!("{}{}?cursor=p2", server.uri(), reviewed_path)),
        )))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(reviewed_path))
        .and(query_param("cursor", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_body(&["P01315"], None)))
        .expect(1)
        .mount(&server)
        .await;

    // Empty unreviewed page
    Mock::given(method("GET"))
        .and(path("/protein/unreviewed/entry/pfam/PF00657/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_body(&[], None)))
        .mount(&server)
        .await;

    // Both collected accessions resolve in one lookup batch
    Mock::given(method("GET"))
        .and(path("/uniprotkb/accessions"))
        .and(query_param("accessions", "P01308,P01315"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOOKUP_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let client = InterProClient::new(interpro_config(&server), fast_backoff()).unwrap();
    let records = client
        .retrieve("PF00657", &test_run(), &uniprot_client(&server))
        .await;

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.tier == Tier::Gold));
}

#[tokio::test]
async fn test_reviewed_only_skips_unreviewed_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/protein/reviewed/entry/interpro/IPR001087/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_body(&["P01308"], None)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/protein/unreviewed/entry/interpro/IPR001087/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_body(&["A0A001"], None)))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/uniprotkb/accessions"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOOKUP_BODY))
        .mount(&server)
        .await;

    let run = RunConfig {
        reviewed_only: true,
        ..test_run()
    };
    let client = InterProClient::new(interpro_config(&server), fast_backoff()).unwrap();
    let records = client
        .retrieve("IPR001087", &run, &uniprot_client(&server))
        .await;

    assert!(records.iter().all(|r| r.tier == Tier::Gold));
}

#[tokio::test]
async fn test_record_cap_stops_pagination() {
    let server = MockServer::start().await;
    let reviewed_path = "/protein/reviewed/entry/pfam/PF00657/";

    // Page one already satisfies the cap; the cursor page must not be hit
    Mock::given(method("GET"))
        .and(path(reviewed_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_body(
            &["P01308", "P01315"],
            Some(&format!("{}{}?cursor=p2", server.uri(), reviewed_path)),
        )))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(reviewed_path))
        .and(query_param("cursor", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_body(&["P99999"], None)))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/uniprotkb/accessions"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOOKUP_BODY))
        .mount(&server)
        .await;

    let run = RunConfig {
        max_seeds: 2,
        ..test_run()
    };
    let client = InterProClient::new(interpro_config(&server), fast_backoff()).unwrap();
    let records = client
        .retrieve("PF00657", &run, &uniprot_client(&server))
        .await;

    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_taxonomy_restriction_extends_the_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/protein/reviewed/entry/interpro/IPR001087/taxonomy/uniprot/3702/",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_body(&["P01308"], None)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(
            "/protein/unreviewed/entry/interpro/IPR001087/taxonomy/uniprot/3702/",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_body(&[], None)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/uniprotkb/accessions"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOOKUP_BODY))
        .mount(&server)
        .await;

    let run = RunConfig {
        taxid: Some("3702".to_string()),
        ..test_run()
    };
    let client = InterProClient::new(interpro_config(&server), fast_backoff()).unwrap();
    let records = client
        .retrieve("IPR001087", &run, &uniprot_client(&server))
        .await;

    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_failed_page_keeps_earlier_accessions() {
    let server = MockServer::start().await;
    let reviewed_path = "/protein/reviewed/entry/pfam/PF00657/";

    Mock::given(method("GET"))
        .and(path(reviewed_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_body(
            &["P01308", "P01315"],
            Some(&format!("{}{}?cursor=p2", server.uri(), reviewed_path)),
        )))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    // The cursor page is a hard failure; the first page's accessions survive
    Mock::given(method("GET"))
        .and(path(reviewed_path))
        .and(query_param("cursor", "p2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/protein/unreviewed/entry/pfam/PF00657/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_body(&[], None)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/uniprotkb/accessions"))
        .and(query_param("accessions", "P01308,P01315"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOOKUP_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let client = InterProClient::new(interpro_config(&server), fast_backoff()).unwrap();
    let records = client
        .retrieve("PF00657", &test_run(), &uniprot_client(&server))
        .await;

    assert_eq!(records.len(), 2);
}
