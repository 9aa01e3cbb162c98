//! Error taxonomy for the status board.
//!
//! Collaborator traits carry their own associated error types; those are
//! converted into [`BoardError`] at the seam so the orchestrator only deals
//! with one failure vocabulary.
//!
//! | Variant | Recovery |
//! |---------|----------|
//! | [`Connectivity`](BoardError::Connectivity) | Terminal screen, manual reboot |
//! | [`TimeSync`](BoardError::TimeSync) | Clock stays on its fallback epoch |
//! | [`DataFetch`](BoardError::DataFetch) | Stale value kept, logged |
//! | [`DataUnavailable`](BoardError::DataUnavailable) | Carousel parks in its failed state |
//! | [`Config`](BoardError::Config) | Startup-fatal |

use thiserror::Error;

/// Failures the board can observe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Wi-Fi join failed after every attempt, or the link dropped for good.
    #[error("connectivity error: {0}")]
    Connectivity(String),

    /// Every time server refused to answer.
    #[error("time sync failed: {0}")]
    TimeSync(String),

    /// A listing or per-agency request failed or returned garbage.
    #[error("data fetch failed: {0}")]
    DataFetch(String),

    /// The bulk listing came back empty.
    #[error("no agency data available")]
    DataUnavailable,

    /// A required credential key is missing.
    #[error("missing configuration key `{0}`")]
    Config(String),

    /// Reserved for input hardware faults.
    #[error("input fault: {0}")]
    InputFault(String),
}

/// Result alias used throughout the crate.
pub type Result<T, E = BoardError> = core::result::Result<T, E>;
