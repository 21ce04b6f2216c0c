#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Report store and identity provider collaborators.
//!
//! The geo engine never talks to storage or authentication itself; the
//! server and CLI reach both through the [`ReportStore`] and
//! [`IdentityProvider`] traits defined here. The bundled implementations
//! keep everything in memory, loaded once from JSON files.

pub mod identity;
pub mod reports;

pub use identity::{IdentityProvider, InMemoryIdentityProvider, UserAccount, require_authority};
pub use reports::{InMemoryReportStore, ReportQuery, ReportStore};

/// Errors returned by the store and identity collaborators.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The caller presented no credential or an invalid one.
    #[error("Unauthenticated: {message}")]
    Unauthenticated {
        /// Why authentication failed.
        message: String,
    },

    /// The caller is authenticated but lacks the required privilege.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// What was refused.
        message: String,
    },

    /// A requested record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Record kind (e.g. "report", "user").
        kind: &'static str,
        /// Requested identifier.
        id: String,
    },

    /// Reading a backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A backing file held malformed JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
