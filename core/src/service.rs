//! The record access layer: async CRUD over one mission list.
//!
//! # Design
//! `MissionService` composes the deterministic halves from
//! [`MissionClient`](crate::client::MissionClient) around a single transport
//! call per round trip: build → execute → parse. It holds no record cache,
//! no lock, and no retry policy; concurrent callers race at the store and
//! the store's conditional-match check is the only arbiter. Each operation
//! suspends only at the network boundary and surfaces every failure exactly
//! once as an [`ApiError`].

use crate::client::MissionClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{Mission, MissionDraft};

/// Typed CRUD operations over the mission list, generic over the injected
/// transport. This surface is everything presentation code may call.
#[derive(Debug, Clone)]
pub struct MissionService<T> {
    client: MissionClient,
    transport: T,
}

impl<T: Transport> MissionService<T> {
    /// Bind the service to the list named `list_title` on the site at
    /// `site_url`, issuing requests through `transport`.
    pub fn new(site_url: &str, list_title: &str, transport: T) -> Self {
        Self {
            client: MissionClient::new(site_url, list_title),
            transport,
        }
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let response = match request.method {
            HttpMethod::Get => self.transport.get(&request.path, &request.headers).await?,
            HttpMethod::Post => {
                self.transport
                    .post(&request.path, &request.headers, request.body)
                    .await?
            }
        };
        Ok(response)
    }

    /// All records in store order, restricted to the declared columns.
    /// `filter` is a raw `$filter` expression.
    pub async fn list_missions(&self, filter: Option<&str>) -> Result<Vec<Mission>, ApiError> {
        let request = self.client.build_list_missions(filter);
        let response = self.execute(request).await?;
        self.client.parse_list_missions(response)
    }

    /// One record by identity, fetched with full metadata so the returned
    /// record carries the concurrency token for a later update or delete.
    pub async fn get_mission(&self, id: i64) -> Result<Mission, ApiError> {
        let request = self.client.build_get_mission(id);
        let response = self.execute(request).await?;
        self.client.parse_get_mission(response)
    }

    /// The record with the highest identity, or
    /// [`EmptyCollection`](ApiError::EmptyCollection) when the list is empty.
    pub async fn get_last_mission(&self) -> Result<Mission, ApiError> {
        let request = self.client.build_last_mission();
        let response = self.execute(request).await?;
        self.client.parse_last_mission(response)
    }

    /// The entity type new records must be tagged with. Resolved from the
    /// list schema on every call — deliberately uncached, so each create
    /// sees the store's current answer at the cost of one extra round trip.
    pub async fn resolve_entity_type(&self) -> Result<String, ApiError> {
        let request = self.client.build_entity_type_request();
        let response = self.execute(request).await?;
        self.client.parse_entity_type(response)
    }

    /// Create a record from `draft`. Resolves the entity type first; if that
    /// read fails, no write is attempted. Returns no value — the store
    /// assigns the id, and the caller re-lists to observe it.
    pub async fn create_mission(&self, draft: &MissionDraft) -> Result<(), ApiError> {
        let entity_type = self.resolve_entity_type().await?;
        let request = self.client.build_create_mission(draft, &entity_type)?;
        let response = self.execute(request).await?;
        self.client.parse_create_mission(response)
    }

    /// Update `mission` in place. Requires the concurrency token it was last
    /// read with; a stale token surfaces as
    /// [`ConcurrencyConflict`](ApiError::ConcurrencyConflict).
    pub async fn update_mission(&self, mission: &Mission) -> Result<(), ApiError> {
        let request = self.client.build_update_mission(mission)?;
        let response = self.execute(request).await?;
        self.client.parse_update_mission(response)
    }

    /// Delete `mission`. Same conditional-match contract as update; the
    /// identity is terminal afterwards and a repeat delete yields
    /// [`NotFound`](ApiError::NotFound).
    pub async fn delete_mission(&self, mission: &Mission) -> Result<(), ApiError> {
        let request = self.client.build_delete_mission(mission)?;
        let response = self.execute(request).await?;
        self.client.parse_delete_mission(response)
    }
}
