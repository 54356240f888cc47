use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, ENTITY_TYPE};
use tower::ServiceExt;

const LIST_PATH: &str = "/_api/web/lists/getbytitle('Apollo%20Missions')";
const FULL_METADATA: &str = "application/json; odata.metadata=full";

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn create_request(title: &str) -> Request<String> {
    let body = format!(r#"{{"@odata.type":"{ENTITY_TYPE}","Title":"{title}"}}"#);
    Request::builder()
        .method("POST")
        .uri(format!("{LIST_PATH}/items"))
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap()
}

fn write_request(id: i64, verb: &str, if_match: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(format!("{LIST_PATH}/items({id})"))
        .header(http::header::CONTENT_TYPE, "application/json")
        .header("X-HTTP-Method", verb)
        .header(http::header::IF_MATCH, if_match)
        .body(body.to_string())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_items_empty() {
    let resp = app()
        .oneshot(get_request(&format!("{LIST_PATH}/items")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["value"], serde_json::json!([]));
}

#[tokio::test]
async fn list_unknown_title_returns_404() {
    let resp = app()
        .oneshot(get_request(
            "/_api/web/lists/getbytitle('Gemini%20Missions')/items",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_applies_select_projection_exactly() {
    let app = app();
    app.clone().oneshot(create_request("Apollo 7")).await.unwrap();

    let resp = app
        .clone()
        .oneshot(get_request(&format!("{LIST_PATH}/items?$select=Id,Title")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    let item = json["value"][0].as_object().unwrap();
    assert_eq!(item.len(), 2);
    assert_eq!(item["Id"], 1);
    assert_eq!(item["Title"], "Apollo 7");
}

#[tokio::test]
async fn list_etag_only_on_full_metadata_reads() {
    let app = app();
    app.clone().oneshot(create_request("Apollo 8")).await.unwrap();

    let minimal = body_json(
        app.clone()
            .oneshot(get_request(&format!("{LIST_PATH}/items")))
            .await
            .unwrap(),
    )
    .await;
    assert!(minimal["value"][0].get("@odata.etag").is_none());

    let full = body_json(
        app.clone()
            .oneshot(
                Request::builder()
                    .uri(format!("{LIST_PATH}/items"))
                    .header(http::header::ACCEPT, FULL_METADATA)
                    .body(String::new())
                    .unwrap(),
            )
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(full["value"][0]["@odata.etag"], "\"1\"");
}

#[tokio::test]
async fn list_orders_descending_and_takes_top() {
    let app = app();
    app.clone().oneshot(create_request("Apollo 7")).await.unwrap();
    app.clone().oneshot(create_request("Apollo 8")).await.unwrap();
    app.clone().oneshot(create_request("Apollo 9")).await.unwrap();

    let resp = app
        .clone()
        .oneshot(get_request(&format!(
            "{LIST_PATH}/items?$orderby=Id%20desc&$top=1"
        )))
        .await
        .unwrap();
    let json = body_json(resp).await;
    let value = json["value"].as_array().unwrap();
    assert_eq!(value.len(), 1);
    assert_eq!(value[0]["Id"], 3);
}

#[tokio::test]
async fn list_filters_on_title_equality() {
    let app = app();
    app.clone().oneshot(create_request("Apollo 11")).await.unwrap();
    app.clone().oneshot(create_request("Apollo 12")).await.unwrap();

    let resp = app
        .clone()
        .oneshot(get_request(&format!(
            "{LIST_PATH}/items?$filter=Title%20eq%20'Apollo%2011'"
        )))
        .await
        .unwrap();
    let json = body_json(resp).await;
    let value = json["value"].as_array().unwrap();
    assert_eq!(value.len(), 1);
    assert_eq!(value[0]["Title"], "Apollo 11");
}

// --- create ---

#[tokio::test]
async fn create_assigns_id_and_echoes_item() {
    let resp = app().oneshot(create_request("Apollo 11")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let json = body_json(resp).await;
    assert_eq!(json["Id"], 1);
    assert_eq!(json["Title"], "Apollo 11");
    assert!(json.get("@odata.type").is_none());
}

#[tokio::test]
async fn create_without_entity_type_returns_400() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("{LIST_PATH}/items"))
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(r#"{"Title":"Apollo 11"}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_with_client_supplied_id_returns_400() {
    let body = format!(r#"{{"@odata.type":"{ENTITY_TYPE}","Id":99,"Title":"Apollo 11"}}"#);
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("{LIST_PATH}/items"))
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- get ---

#[tokio::test]
async fn get_item_not_found() {
    let resp = app()
        .oneshot(get_request(&format!("{LIST_PATH}/items(7)")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_malformed_item_segment_returns_400() {
    let resp = app()
        .oneshot(get_request(&format!("{LIST_PATH}/items(seven)")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update (POST + MERGE override) ---

#[tokio::test]
async fn merge_updates_fields_and_bumps_etag() {
    let app = app();
    app.clone().oneshot(create_request("Apollo 11")).await.unwrap();

    let resp = app
        .clone()
        .oneshot(write_request(1, "MERGE", "\"1\"", r#"{"Title":"Apollo XI"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let fetched = body_json(
        app.clone()
            .oneshot(
                Request::builder()
                    .uri(format!("{LIST_PATH}/items(1)"))
                    .header(http::header::ACCEPT, FULL_METADATA)
                    .body(String::new())
                    .unwrap(),
            )
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(fetched["Title"], "Apollo XI");
    assert_eq!(fetched["@odata.etag"], "\"2\"");
}

#[tokio::test]
async fn merge_with_stale_token_returns_412_and_leaves_item_unchanged() {
    let app = app();
    app.clone().oneshot(create_request("Apollo 11")).await.unwrap();
    app.clone()
        .oneshot(write_request(1, "MERGE", "\"1\"", r#"{"Title":"Apollo XI"}"#))
        .await
        .unwrap();

    // Token "1" was consumed by the first merge.
    let resp = app
        .clone()
        .oneshot(write_request(1, "MERGE", "\"1\"", r#"{"Title":"clobbered"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::PRECONDITION_FAILED);

    let fetched = body_json(
        app.clone()
            .oneshot(get_request(&format!("{LIST_PATH}/items(1)")))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(fetched["Title"], "Apollo XI");
}

#[tokio::test]
async fn merge_without_if_match_returns_400() {
    let app = app();
    app.clone().oneshot(create_request("Apollo 11")).await.unwrap();

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("{LIST_PATH}/items(1)"))
                .header("X-HTTP-Method", "MERGE")
                .body(r#"{"Title":"Apollo XI"}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn merge_cannot_rewrite_identity() {
    let app = app();
    app.clone().oneshot(create_request("Apollo 11")).await.unwrap();

    app.clone()
        .oneshot(write_request(1, "MERGE", "\"1\"", r#"{"Id":42,"Title":"moved"}"#))
        .await
        .unwrap();

    let fetched = body_json(
        app.clone()
            .oneshot(get_request(&format!("{LIST_PATH}/items(1)")))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(fetched["Id"], 1);
    assert_eq!(fetched["Title"], "moved");
}

#[tokio::test]
async fn unknown_method_override_returns_400() {
    let app = app();
    app.clone().oneshot(create_request("Apollo 11")).await.unwrap();

    let resp = app
        .clone()
        .oneshot(write_request(1, "PATCH", "\"1\"", "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- delete (POST + DELETE override) ---

#[tokio::test]
async fn delete_removes_item_and_repeat_delete_returns_404() {
    let app = app();
    app.clone().oneshot(create_request("Apollo 11")).await.unwrap();

    let resp = app
        .clone()
        .oneshot(write_request(1, "DELETE", "\"1\"", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .clone()
        .oneshot(write_request(1, "DELETE", "\"1\"", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .clone()
        .oneshot(get_request(&format!("{LIST_PATH}/items(1)")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_with_stale_token_returns_412() {
    let app = app();
    app.clone().oneshot(create_request("Apollo 11")).await.unwrap();

    let resp = app
        .clone()
        .oneshot(write_request(1, "DELETE", "\"7\"", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
async fn delete_accepts_wildcard_match() {
    let app = app();
    app.clone().oneshot(create_request("Apollo 11")).await.unwrap();

    let resp = app
        .clone()
        .oneshot(write_request(1, "DELETE", "*", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

// --- schema ---

#[tokio::test]
async fn list_root_exposes_entity_type() {
    let resp = app()
        .oneshot(get_request(&format!(
            "{LIST_PATH}?$select=ListItemEntityTypeFullName"
        )))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert_eq!(object["ListItemEntityTypeFullName"], ENTITY_TYPE);
}
