//! Connectivity abstraction: Wi-Fi join, link probing, time sync and HTTP GET.
//!
//! All calls are blocking. A slow request freezes the display for its whole
//! duration; the only timeout is the per-request one carried by
//! [`FetchRequest`].
//!
//! # Data Feed
//!
//! ```text
//! GET {base}/csv                         - agency listing (CSV)
//! GET {base}/temps-attente/agence/{id}   - one agency ({"realMaxWaitingTimeMs": n})
//! ```

use core::fmt;

/// Network stack used by the board.
///
/// # Implementation Notes
///
/// - `connect` performs one join attempt; retrying is the caller's job
/// - `sync_clock` returns Unix seconds from one server, it does not touch
///   any clock state itself
/// - `http_get` must honour `request.timeout_ms`
pub trait Connectivity {
    /// Handle for an established link.
    type Link;
    /// Error type for join and sync failures.
    type Error: fmt::Display;

    /// Tries once to join `ssid`.
    fn connect(&mut self, ssid: &str, password: &str) -> Result<Self::Link, Self::Error>;

    /// Returns true while `link` is still associated.
    fn is_linked(&self, link: &Self::Link) -> bool;

    /// Asks one time server for the current Unix time in seconds.
    fn sync_clock(&mut self, server: &str) -> Result<u64, Self::Error>;

    /// Performs a GET and returns the body of a 200 response.
    fn http_get(&mut self, request: &FetchRequest<'_>) -> Result<Vec<u8>, FetchFailure>;
}

/// One outbound GET request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest<'a> {
    /// Absolute URL.
    pub url: &'a str,
    /// Extra headers as `(name, value)` pairs.
    pub headers: &'a [(&'a str, &'a str)],
    /// Hard limit for the whole exchange.
    pub timeout_ms: u32,
}

/// Why a GET did not produce a body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchFailure {
    /// Server answered with a non-200 status.
    Status(u16),
    /// No answer within the request timeout.
    Timeout,
    /// Anything below HTTP: DNS, TLS, socket.
    Transport(String),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Status(code) => write!(f, "HTTP status {}", code),
            FetchFailure::Timeout => write!(f, "request timed out"),
            FetchFailure::Transport(msg) => write!(f, "transport error: {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failure_display() {
        assert_eq!(FetchFailure::Status(503).to_string(), "HTTP status 503");
        assert_eq!(FetchFailure::Timeout.to_string(), "request timed out");
        assert_eq!(
            FetchFailure::Transport("dns".into()).to_string(),
            "transport error: dns"
        );
    }
}
