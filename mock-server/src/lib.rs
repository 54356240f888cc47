//! In-process stand-in for the remote list store.
//!
//! Implements the store-side half of every contract the access layer
//! depends on: the `getbytitle('...')` / `items(N)` addressing scheme,
//! `$select` projection, `$orderby` / `$top` / `$filter`, per-item ETags
//! surfaced only on full-metadata reads, IF-MATCH checking with 412 on a
//! stale token, POST tunneling of MERGE/DELETE through `X-HTTP-Method`,
//! and entity-type discovery on the list root. Items live in a shared
//! in-memory map; ids are assigned sequentially from 1.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// Title of the one list the mock store hosts.
pub const LIST_TITLE: &str = "Apollo Missions";

/// Entity type new items must be tagged with.
pub const ENTITY_TYPE: &str = "SP.Data.Apollo_x0020_MissionsListItem";

#[derive(Debug, Clone)]
struct StoredItem {
    fields: Map<String, Value>,
    version: u64,
}

impl StoredItem {
    fn etag(&self) -> String {
        format!("\"{}\"", self.version)
    }
}

#[derive(Debug, Default)]
pub struct ListStore {
    items: BTreeMap<i64, StoredItem>,
    next_id: i64,
}

pub type Db = Arc<RwLock<ListStore>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(ListStore::default()));
    Router::new()
        .route("/_api/web/lists/{list}", get(read_list_schema))
        .route(
            "/_api/web/lists/{list}/items",
            get(list_items).post(create_item),
        )
        .route(
            "/_api/web/lists/{list}/{item}",
            get(get_item).post(write_item),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// ---------------------------------------------------------------------------
// Addressing and projection helpers
// ---------------------------------------------------------------------------

/// Extract the list title from a `getbytitle('...')` path segment.
fn list_title_of(segment: &str) -> Option<&str> {
    segment
        .strip_prefix("getbytitle('")?
        .strip_suffix("')")
}

/// Extract the item id from an `items(N)` path segment.
fn item_id_of(segment: &str) -> Option<i64> {
    segment
        .strip_prefix("items(")?
        .strip_suffix(')')?
        .parse()
        .ok()
}

fn known_list(segment: &str) -> Result<(), StatusCode> {
    if list_title_of(segment) == Some(LIST_TITLE) {
        Ok(())
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

/// The etag annotation is only included when the client asked for full
/// OData metadata.
fn wants_full_metadata(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.contains("odata.metadata=full"))
        .unwrap_or(false)
}

/// Apply a `$select` list to `fields`, optionally prefixing the etag
/// annotation. Selected fields the item does not have are skipped.
fn project_fields(
    fields: &Map<String, Value>,
    select: Option<&str>,
    etag: Option<String>,
) -> Value {
    let mut out = Map::new();
    if let Some(etag) = etag {
        out.insert("@odata.etag".to_string(), Value::String(etag));
    }
    match select {
        Some(select) => {
            for field in select.split(',').map(str::trim) {
                if let Some(value) = fields.get(field) {
                    out.insert(field.to_string(), value.clone());
                }
            }
        }
        None => {
            out.extend(fields.clone());
        }
    }
    Value::Object(out)
}

/// Evaluate the `Field eq literal` filter form, with string literals in
/// single quotes and bare integer literals.
fn filter_matches(fields: &Map<String, Value>, expr: &str) -> Result<bool, StatusCode> {
    let (field, literal) = expr.split_once(" eq ").ok_or(StatusCode::BAD_REQUEST)?;
    let actual = fields.get(field.trim());
    let literal = literal.trim();
    if let Some(unquoted) = literal
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        Ok(actual.and_then(Value::as_str) == Some(unquoted))
    } else {
        let number: i64 = literal.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
        Ok(actual.and_then(Value::as_i64) == Some(number))
    }
}

fn body_object(body: &str) -> Result<Map<String, Value>, StatusCode> {
    match serde_json::from_str(body) {
        Ok(Value::Object(object)) => Ok(object),
        _ => Err(StatusCode::BAD_REQUEST),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn read_list_schema(
    Path(list): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    known_list(&list)?;
    let mut fields = Map::new();
    fields.insert("Title".to_string(), Value::String(LIST_TITLE.to_string()));
    fields.insert(
        "ListItemEntityTypeFullName".to_string(),
        Value::String(ENTITY_TYPE.to_string()),
    );
    Ok(Json(project_fields(
        &fields,
        params.get("$select").map(String::as_str),
        None,
    )))
}

async fn list_items(
    State(db): State<Db>,
    Path(list): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    known_list(&list)?;
    let full = wants_full_metadata(&headers);
    let select = params.get("$select").map(String::as_str);
    let store = db.read().await;

    // BTreeMap iteration is ascending by id, which is insertion order here.
    let mut selected: Vec<&StoredItem> = Vec::new();
    for item in store.items.values() {
        let keep = match params.get("$filter") {
            Some(expr) => filter_matches(&item.fields, expr)?,
            None => true,
        };
        if keep {
            selected.push(item);
        }
    }

    if let Some(orderby) = params.get("$orderby") {
        match orderby.trim().to_ascii_lowercase().as_str() {
            "id desc" => selected.reverse(),
            "id asc" | "id" => {}
            _ => return Err(StatusCode::BAD_REQUEST),
        }
    }

    if let Some(top) = params.get("$top") {
        let top: usize = top.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
        selected.truncate(top);
    }

    let value: Vec<Value> = selected
        .iter()
        .map(|item| project_fields(&item.fields, select, full.then(|| item.etag())))
        .collect();
    Ok(Json(json!({ "value": value })))
}

async fn get_item(
    State(db): State<Db>,
    Path((list, item)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    known_list(&list)?;
    let id = item_id_of(&item).ok_or(StatusCode::BAD_REQUEST)?;
    let store = db.read().await;
    let stored = store.items.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(project_fields(
        &stored.fields,
        params.get("$select").map(String::as_str),
        wants_full_metadata(&headers).then(|| stored.etag()),
    )))
}

async fn create_item(
    State(db): State<Db>,
    Path(list): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    known_list(&list)?;
    let mut fields = body_object(&body)?;

    // Schema typing: the payload must name the list's entity type, and the
    // store owns identity assignment.
    let entity_type = fields.remove("@odata.type");
    if entity_type.as_ref().and_then(Value::as_str) != Some(ENTITY_TYPE) {
        return Err(StatusCode::BAD_REQUEST);
    }
    if fields.contains_key("Id") {
        return Err(StatusCode::BAD_REQUEST);
    }
    if !fields.get("Title").map(Value::is_string).unwrap_or(false) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let mut store = db.write().await;
    store.next_id += 1;
    let id = store.next_id;
    fields.insert("Id".to_string(), json!(id));
    let item = StoredItem { fields, version: 1 };

    let echoed = project_fields(
        &item.fields,
        None,
        wants_full_metadata(&headers).then(|| item.etag()),
    );
    store.items.insert(id, item);
    Ok((StatusCode::CREATED, Json(echoed)))
}

/// POST to an item address carries the real verb in `X-HTTP-Method` and the
/// concurrency token in IF-MATCH. `*` matches any token.
async fn write_item(
    State(db): State<Db>,
    Path((list, item)): Path<(String, String)>,
    headers: HeaderMap,
    body: String,
) -> Result<StatusCode, StatusCode> {
    known_list(&list)?;
    let id = item_id_of(&item).ok_or(StatusCode::BAD_REQUEST)?;
    let method = headers
        .get("x-http-method")
        .and_then(|value| value.to_str().ok())
        .ok_or(StatusCode::BAD_REQUEST)?
        .to_string();

    let mut store = db.write().await;
    let current_etag = store
        .items
        .get(&id)
        .map(StoredItem::etag)
        .ok_or(StatusCode::NOT_FOUND)?;

    let if_match = headers
        .get(header::IF_MATCH)
        .and_then(|value| value.to_str().ok())
        .ok_or(StatusCode::BAD_REQUEST)?;
    if if_match != "*" && if_match != current_etag {
        return Err(StatusCode::PRECONDITION_FAILED);
    }

    match method.as_str() {
        "MERGE" => {
            let updates = body_object(&body)?;
            let stored = store.items.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
            for (key, value) in updates {
                if !matches!(key.as_str(), "Id" | "@odata.etag" | "@odata.type") {
                    stored.fields.insert(key, value);
                }
            }
            stored.version += 1;
            Ok(StatusCode::NO_CONTENT)
        }
        "DELETE" => {
            store.items.remove(&id);
            Ok(StatusCode::NO_CONTENT)
        }
        _ => Err(StatusCode::BAD_REQUEST),
    }
}
