//! Domain records exchanged with the remote list store.
//!
//! # Design
//! Serde renames pin the store's column names (`Id`, `Title`, ...) and the
//! OData annotations (`@odata.etag`) to the wire, so the Rust field names can
//! stay idiomatic. `MissionDraft` is the create payload and deliberately has
//! no `id` or `etag` field — a create request structurally cannot carry a
//! client-supplied identity or concurrency token. The entity type tag
//! (`@odata.type`) is stamped onto the serialized draft by the create
//! operation and never lives on either type.

use serde::{Deserialize, Serialize};

/// A mission record as returned by the store.
///
/// `etag` is the opaque concurrency token. It is present only on reads made
/// with the full-metadata profile (single-item fetch, last-item fetch) and is
/// required by [`update`](crate::service::MissionService::update_mission) and
/// [`delete`](crate::service::MissionService::delete_mission).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mission {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Commander", default, skip_serializing_if = "Option::is_none")]
    pub commander: Option<String>,
    #[serde(rename = "SrPilotCmPilot", default, skip_serializing_if = "Option::is_none")]
    pub sr_pilot_cm_pilot: Option<String>,
    #[serde(rename = "PilotLmPilot", default, skip_serializing_if = "Option::is_none")]
    pub pilot_lm_pilot: Option<String>,
    #[serde(rename = "LaunchDate", default, skip_serializing_if = "Option::is_none")]
    pub launch_date: Option<String>,
    #[serde(rename = "ReturnDate", default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    #[serde(rename = "@odata.etag", default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

/// Payload for creating a new mission. The store assigns the id and the
/// initial concurrency token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissionDraft {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Commander", default, skip_serializing_if = "Option::is_none")]
    pub commander: Option<String>,
    #[serde(rename = "SrPilotCmPilot", default, skip_serializing_if = "Option::is_none")]
    pub sr_pilot_cm_pilot: Option<String>,
    #[serde(rename = "PilotLmPilot", default, skip_serializing_if = "Option::is_none")]
    pub pilot_lm_pilot: Option<String>,
    #[serde(rename = "LaunchDate", default, skip_serializing_if = "Option::is_none")]
    pub launch_date: Option<String>,
    #[serde(rename = "ReturnDate", default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
}
