//! Error types for the mission access layer.
//!
//! # Design
//! The kinds a caller routinely branches on get dedicated variants:
//! `NotFound` (the addressed identity does not exist), `EmptyCollection`
//! (a query that must yield one record yielded none) and
//! `ConcurrencyConflict` (the store rejected a conditional match, meaning the
//! record changed under the caller). Every other non-2xx response lands in
//! `Http` with the raw status and body. The layer performs no recovery —
//! each failure surfaces exactly once.

use thiserror::Error;

/// Errors surfaced by the access layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The store returned 404 — the addressed record does not exist.
    #[error("record not found")]
    NotFound,

    /// A query that must yield one record yielded none.
    #[error("query returned no records")]
    EmptyCollection,

    /// The store rejected the conditional match: the concurrency token is
    /// stale and the record was modified (or deleted) by another writer.
    #[error("conditional match rejected by the store")]
    ConcurrencyConflict,

    /// Update or delete was attempted on a record that carries no
    /// concurrency token. Raised before any request is issued.
    #[error("record carries no concurrency token")]
    MissingConcurrencyToken,

    /// The store returned a non-2xx status with no more specific meaning.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The transport failed before a response was available.
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

/// A network-level failure reported by a [`Transport`](crate::Transport)
/// implementation.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);
