//! Agency data feed: bulk CSV listing and per-agency JSON refresh.
//!
//! The carousel only sees the [`AgencyFeed`] trait, so a non-blocking or
//! cached source can replace [`HttpFeed`] without touching display code.
//!
//! # Wire formats
//!
//! ```text
//! id,designation,realMaxWaitingTimeMs      <- header, ignored
//! 12,Agence de Nouméa Centre,240000
//!
//! {"realMaxWaitingTimeMs": 480000, ...}     <- per-agency body
//! ```

use crate::config::ApiConfig;
use crate::error::{BoardError, Result};
use crate::model::AgencyRecord;
use crate::traits::{Connectivity, FetchRequest};
use serde::Deserialize;

/// Prefix the feed puts in front of every designation.
const DESIGNATION_PREFIX: &str = "Agence de ";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-apikey";

/// Source of agency records.
pub trait AgencyFeed<N: Connectivity> {
    /// Fetches the full listing in feed order.
    fn list(&mut self, net: &mut N) -> Result<Vec<AgencyRecord>>;

    /// Updates `record.wait_ms` in place. On error the record is untouched.
    fn refresh(&mut self, net: &mut N, record: &mut AgencyRecord) -> Result<()>;
}

/// Per-agency response body.
#[derive(Debug, Deserialize)]
struct WaitTimeBody {
    #[serde(rename = "realMaxWaitingTimeMs")]
    real_max_waiting_time_ms: u64,
}

/// Feed backed by the HTTP API.
#[derive(Clone, Debug)]
pub struct HttpFeed {
    api: ApiConfig,
}

impl HttpFeed {
    /// Creates a feed for the given endpoint.
    pub fn new(api: ApiConfig) -> Self {
        Self { api }
    }

    fn get<N: Connectivity>(&self, net: &mut N, url: &str) -> Result<Vec<u8>> {
        let headers = [(API_KEY_HEADER, self.api.api_key.as_str())];
        let request = FetchRequest {
            url,
            headers: &headers,
            timeout_ms: self.api.timeout_ms,
        };
        net.http_get(&request)
            .map_err(|e| BoardError::DataFetch(format!("GET {}: {}", url, e)))
    }
}

impl<N: Connectivity> AgencyFeed<N> for HttpFeed {
    fn list(&mut self, net: &mut N) -> Result<Vec<AgencyRecord>> {
        let url = self.api.listing_url();
        let body = self.get(net, &url)?;
        let text = core::str::from_utf8(&body)
            .map_err(|e| BoardError::DataFetch(format!("listing is not UTF-8: {}", e)))?;
        let records = parse_listing(text)?;
        log::info!("listing returned {} agencies", records.len());
        Ok(records)
    }

    fn refresh(&mut self, net: &mut N, record: &mut AgencyRecord) -> Result<()> {
        let url = self.api.agency_url(&record.id);
        let body = self.get(net, &url)?;
        let wait_ms = parse_wait_time(&body)?;
        log::info!(
            "{} (id {}): {} min (was {} min)",
            record.name,
            record.id,
            wait_ms / 60_000,
            record.wait_minutes()
        );
        record.wait_ms = wait_ms;
        Ok(())
    }
}

/// Parses the CSV listing. The first line is a header.
///
/// Blank lines are skipped; any other malformed row fails the whole listing.
///
/// # Examples
///
/// ```
/// use agency_board::feed::parse_listing;
///
/// let rows = parse_listing("id,designation,ms\n4,Agence de Koné,120000\n").unwrap();
/// assert_eq!(rows[0].name, "KONE");
/// assert_eq!(rows[0].wait_ms, 120_000);
/// ```
pub fn parse_listing(csv: &str) -> Result<Vec<AgencyRecord>> {
    csv.lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(parse_row)
        .collect()
}

fn parse_row(line: &str) -> Result<AgencyRecord> {
    let mut cols = line.split(',').map(str::trim);
    let (Some(id), Some(designation), Some(wait)) = (cols.next(), cols.next(), cols.next()) else {
        return Err(BoardError::DataFetch(format!("short CSV row: {:?}", line)));
    };
    let wait_ms = wait
        .parse::<u64>()
        .map_err(|_| BoardError::DataFetch(format!("bad wait time {:?}", wait)))?;
    let name = designation
        .strip_prefix(DESIGNATION_PREFIX)
        .unwrap_or(designation);
    Ok(AgencyRecord::new(id, name, wait_ms))
}

/// Extracts `realMaxWaitingTimeMs` from a per-agency body.
pub fn parse_wait_time(body: &[u8]) -> Result<u64> {
    serde_json::from_slice::<WaitTimeBody>(body)
        .map(|b| b.real_max_waiting_time_ms)
        .map_err(|e| BoardError::DataFetch(format!("bad agency body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::MockNet;
    use crate::traits::FetchFailure;

    const LISTING: &str = "id,designation,realMaxWaitingTimeMs\n\
        1,Agence de Nouméa Centre,100000\n\
        \n\
        2,Agence de Koné,400000\n\
        3,Lifou,900000\n";

    fn feed() -> HttpFeed {
        HttpFeed::new(
            ApiConfig::default()
                .with_base_url("http://feed")
                .with_api_key("k"),
        )
    }

    // =========================================================================
    // Parsing Tests
    // =========================================================================

    #[test]
    fn listing_keeps_order_and_normalizes() {
        let rows = parse_listing(LISTING).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["NOUMEA CENTRE", "KONE", "LIFOU"]);
        assert_eq!(rows[1].id, "2");
        assert_eq!(rows[2].wait_ms, 900_000);
    }

    #[test]
    fn listing_header_only_is_empty() {
        assert!(parse_listing("id,designation,ms\n").unwrap().is_empty());
        assert!(parse_listing("").unwrap().is_empty());
    }

    #[test]
    fn listing_rejects_bad_rows() {
        assert!(parse_listing("h\n1,A\n").is_err());
        assert!(parse_listing("h\n1,A,soon\n").is_err());
    }

    #[test]
    fn wait_time_json() {
        assert_eq!(
            parse_wait_time(br#"{"realMaxWaitingTimeMs": 480000, "other": 1}"#).unwrap(),
            480_000
        );
        assert!(parse_wait_time(br#"{"waiting": 1}"#).is_err());
        assert!(parse_wait_time(b"<html>").is_err());
    }

    // =========================================================================
    // HttpFeed Tests
    // =========================================================================

    #[test]
    fn list_sends_api_key() {
        let mut net = MockNet::new();
        net.respond("http://feed/csv", Ok(LISTING.as_bytes().to_vec()));

        let rows = feed().list(&mut net).unwrap();
        assert_eq!(rows.len(), 3);
        let req = &net.requests[0];
        assert_eq!(req.url, "http://feed/csv");
        assert_eq!(req.headers, [("x-apikey".to_string(), "k".to_string())]);
        assert_eq!(req.timeout_ms, 10_000);
    }

    #[test]
    fn refresh_updates_wait() {
        let mut net = MockNet::new();
        net.respond(
            "http://feed/temps-attente/agence/2",
            Ok(br#"{"realMaxWaitingTimeMs": 700000}"#.to_vec()),
        );
        let mut rec = AgencyRecord::new("2", "KONE", 400_000);

        feed().refresh(&mut net, &mut rec).unwrap();
        assert_eq!(rec.wait_ms, 700_000);
    }

    #[test]
    fn refresh_failure_keeps_stale_value() {
        let mut net = MockNet::new();
        net.respond(
            "http://feed/temps-attente/agence/2",
            Err(FetchFailure::Status(500)),
        );
        let mut rec = AgencyRecord::new("2", "KONE", 400_000);

        let err = feed().refresh(&mut net, &mut rec).unwrap_err();
        assert!(matches!(err, BoardError::DataFetch(_)));
        assert_eq!(rec.wait_ms, 400_000);
    }
}
