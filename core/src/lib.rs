//! Typed access layer for a remote, list-structured mission store.
//!
//! # Overview
//! Presents create/read/update/delete over "mission" records held in an
//! OData-flavored list behind an HTTP/JSON interface, hiding the wire
//! protocol, the per-operation header conventions, and the ETag-based
//! optimistic-concurrency handshake from callers.
//!
//! # Design
//! - Every operation is split into a deterministic `build_*` / `parse_*`
//!   pair on [`MissionClient`], with [`MissionService`] composing the two
//!   around one [`Transport`] call per round trip.
//! - Request headers come from five immutable [`profiles`] templates, cloned
//!   per request; conditional-match headers are added to the clone only.
//! - Writes require the concurrency token the record was last read with;
//!   a stale token surfaces as [`ApiError::ConcurrencyConflict`].
//! - Creates resolve the list's entity type fresh on every call and stamp it
//!   onto the outbound payload.
//! - No cache, no retry, no client-side locking: every failure propagates
//!   to the caller exactly once.

pub mod client;
pub mod error;
pub mod http;
pub mod profiles;
pub mod service;
pub mod transport;
pub mod types;

pub use client::MissionClient;
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use profiles::{RequestProfile, RequestProfileSet};
pub use service::MissionService;
pub use transport::{ReqwestTransport, Transport};
pub use types::{Mission, MissionDraft};
