//! Stateless request builder and response parser for the mission list.
//!
//! # Design
//! `MissionClient` holds the list endpoint and the profile set, and carries
//! no mutable state between calls. Each operation is split into a `build_*`
//! method that produces an [`HttpRequest`] and a `parse_*` method that
//! consumes an [`HttpResponse`]; the async service composes the two around a
//! transport call. Keeping this half free of I/O makes every piece of
//! protocol logic — URLs, header selection, conditional-match attachment,
//! status mapping — testable without a network.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::profiles::{RequestProfileSet, IF_MATCH};
use crate::types::{Mission, MissionDraft};

/// The columns every read asks the store for. The store returns exactly this
/// field set (plus the etag annotation on full-metadata reads).
const SELECT_QUERY: &str =
    "$select=Id,Title,Commander,SrPilotCmPilot,PilotLmPilot,LaunchDate,ReturnDate";

/// The column the entity-type discovery read asks for.
const ENTITY_TYPE_QUERY: &str = "$select=ListItemEntityTypeFullName";

/// Wire name of the type discriminator stamped onto create payloads.
const ENTITY_TYPE_FIELD: &str = "@odata.type";

/// Collection reads come back wrapped in a `value` envelope.
#[derive(Deserialize)]
struct CollectionEnvelope {
    value: Vec<Mission>,
}

#[derive(Deserialize)]
struct EntityTypeEnvelope {
    #[serde(rename = "ListItemEntityTypeFullName")]
    entity_type: String,
}

/// Stateless builder/parser for all operations against one list.
#[derive(Debug, Clone)]
pub struct MissionClient {
    list_url: String,
    profiles: RequestProfileSet,
}

impl MissionClient {
    /// Bind a client to the list named `list_title` on the site at
    /// `site_url`.
    pub fn new(site_url: &str, list_title: &str) -> Self {
        Self {
            list_url: format!(
                "{}/_api/web/lists/getbytitle('{}')",
                site_url.trim_end_matches('/'),
                list_title
            ),
            profiles: RequestProfileSet::default(),
        }
    }

    fn items_url(&self) -> String {
        format!("{}/items", self.list_url)
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/items({id})", self.list_url)
    }

    // ---------------------------------------------------------------------
    // Build
    // ---------------------------------------------------------------------

    /// List read, restricted to the declared columns. `filter` is a raw
    /// `$filter` expression appended verbatim.
    pub fn build_list_missions(&self, filter: Option<&str>) -> HttpRequest {
        let mut path = format!("{}?{SELECT_QUERY}", self.items_url());
        if let Some(filter) = filter {
            path.push_str("&$filter=");
            path.push_str(filter);
        }
        HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: self.profiles.read_minimal.headers(),
            body: None,
        }
    }

    /// Single-item read by identity. Uses the full-metadata profile so the
    /// returned record carries the concurrency token needed for a later
    /// update or delete.
    pub fn build_get_mission(&self, id: i64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}?{SELECT_QUERY}", self.item_url(id)),
            headers: self.profiles.read_full.headers(),
            body: None,
        }
    }

    /// Read of the record with the highest identity: ordered descending,
    /// limited to one.
    pub fn build_last_mission(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!(
                "{}?{SELECT_QUERY}&$orderby=Id desc&$top=1",
                self.items_url()
            ),
            headers: self.profiles.read_full.headers(),
            body: None,
        }
    }

    /// Read of the list schema field that names the entity type new records
    /// must be tagged with.
    pub fn build_entity_type_request(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}?{ENTITY_TYPE_QUERY}", self.list_url),
            headers: self.profiles.read_minimal.headers(),
            body: None,
        }
    }

    /// Create request: the draft serialized with `entity_type` stamped under
    /// the `@odata.type` key. The draft type has no id field, so a create
    /// can never carry a client-supplied identity.
    pub fn build_create_mission(
        &self,
        draft: &MissionDraft,
        entity_type: &str,
    ) -> Result<HttpRequest, ApiError> {
        let value = serde_json::to_value(draft)
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        let Value::Object(mut item) = value else {
            return Err(ApiError::Serialization(
                "draft did not serialize to an object".to_string(),
            ));
        };
        item.insert(
            ENTITY_TYPE_FIELD.to_string(),
            Value::String(entity_type.to_string()),
        );

        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.items_url(),
            headers: self.profiles.create.headers(),
            body: Some(Value::Object(item).to_string()),
        })
    }

    /// Update request: full record as the body, concurrency token attached
    /// as a conditional-match header on a clone of the update profile.
    pub fn build_update_mission(&self, mission: &Mission) -> Result<HttpRequest, ApiError> {
        let etag = mission
            .etag
            .as_deref()
            .ok_or(ApiError::MissingConcurrencyToken)?;
        let body = serde_json::to_string(mission)
            .map_err(|e| ApiError::Serialization(e.to_string()))?;

        let mut headers = self.profiles.update.headers();
        headers.push((IF_MATCH.to_string(), etag.to_string()));

        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.item_url(mission.id),
            headers,
            body: Some(body),
        })
    }

    /// Delete request: no body, concurrency token attached as a
    /// conditional-match header on a clone of the delete profile.
    pub fn build_delete_mission(&self, mission: &Mission) -> Result<HttpRequest, ApiError> {
        let etag = mission
            .etag
            .as_deref()
            .ok_or(ApiError::MissingConcurrencyToken)?;

        let mut headers = self.profiles.delete.headers();
        headers.push((IF_MATCH.to_string(), etag.to_string()));

        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.item_url(mission.id),
            headers,
            body: None,
        })
    }

    // ---------------------------------------------------------------------
    // Parse
    // ---------------------------------------------------------------------

    pub fn parse_list_missions(&self, response: HttpResponse) -> Result<Vec<Mission>, ApiError> {
        check_status(&response, 200)?;
        let envelope: CollectionEnvelope = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        Ok(envelope.value)
    }

    pub fn parse_get_mission(&self, response: HttpResponse) -> Result<Mission, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// The last-item query yields a one-element collection; an empty
    /// collection means the list has no records at all.
    pub fn parse_last_mission(&self, response: HttpResponse) -> Result<Mission, ApiError> {
        check_status(&response, 200)?;
        let envelope: CollectionEnvelope = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        envelope
            .value
            .into_iter()
            .next()
            .ok_or(ApiError::EmptyCollection)
    }

    pub fn parse_entity_type(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response, 200)?;
        let envelope: EntityTypeEnvelope = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        Ok(envelope.entity_type)
    }

    /// Create returns the new record; the body is decoded only to confirm
    /// the store accepted the payload. The caller re-lists to learn the
    /// assigned id.
    pub fn parse_create_mission(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 201)?;
        serde_json::from_str::<Mission>(&response.body)
            .map(|_| ())
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn parse_update_mission(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    pub fn parse_delete_mission(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }
}

/// Map non-success status codes to the matching `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    match response.status {
        404 => Err(ApiError::NotFound),
        412 => Err(ApiError::ConcurrencyConflict),
        status => Err(ApiError::Http {
            status,
            body: response.body.clone(),
        }),
    }
}
