//! Handler tests for the events domain
//!
//! The routers run against the in-memory repository, so these cover request
//! parsing, status codes and error bodies without a database.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::ErrorResponse;
use domain_events::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()

fn app(repository: InMemoryEventRepository) -> Router {
    Router::new()
        .nest(
            "/events",
            handlers::events::router(EventService::new(repository.clone())),
        )
        .nest("/tags", handlers::tags::router(TagService::new(repository)))
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn event_payload(data: &TestDataBuilder, offset_days: i64, tags: &[&str]) -> Value {
    let (start, end) = data.window(offset_days, 2);
    json!({
        "title": data.name("event", &offset_days.to_string()),
        "host": "Stanford Computer Science",
        "contact": "events@stanford.edu",
        "start": start,
        "end": end,
        "tags": tags,
    })
}

async fn create(app: &Router, payload: Value) -> Event {
    let response = app
        .clone()
        .oneshot(post_json("/events", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_create_event_returns_201_with_sorted_tags() {
    let app = app(InMemoryEventRepository::new());
    let data = TestDataBuilder::from_test_name("create_201");

    let event = create(&app, event_payload(&data, 0, &["students", "ai", "students"])).await;

    assert_eq!(event.id, 1);
    assert_eq!(event.tags, vec!["ai", "students"]);
    assert!(!event.featured);
}

#[tokio::test]
async fn test_create_event_rejects_end_before_start() {
    let app = app(InMemoryEventRepository::new());
    let data = TestDataBuilder::from_test_name("create_bad_dates");

    let mut payload = event_payload(&data, 0, &[]);
    payload["end"] = json!(data.day(-1));

    let response = app.clone().oneshot(post_json("/events", payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "Event end date must be after start date");

    let response = app.oneshot(get("/events")).await.unwrap();
    let events: Vec<Event> = json_body(response.into_body()).await;
    assert!(events.is_empty(), "rejected event must not be stored");
}

#[tokio::test]
async fn test_create_event_validates_shape() {
    let app = app(InMemoryEventRepository::new());
    let data = TestDataBuilder::from_test_name("create_shape");

    let mut payload = event_payload(&data, 0, &[]);
    payload["contact"] = json!("not-an-email");
    payload["title"] = json!("");

    let response = app.oneshot(post_json("/events", payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "VALIDATION_ERROR");
    let details = error.details.unwrap();
    assert!(details.get("contact").is_some());
    assert!(details.get("title").is_some());
}

#[tokio::test]
async fn test_create_event_rejects_malformed_json() {
    let app = app(InMemoryEventRepository::new());

    let request = Request::builder()
        .method("POST")
        .uri("/events")
        .header("content-type", "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_event_by_id_and_not_found() {
    let app = app(InMemoryEventRepository::new());
    let data = TestDataBuilder::from_test_name("get_by_id");
    let created = create(&app, event_payload(&data, 0, &["students"])).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/events/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Event = json_body(response.into_body()).await;
    assert_eq!(fetched, created);

    let response = app.oneshot(get("/events/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "Event 999 not found");
}

#[tokio::test]
async fn test_invalid_id_is_400() {
    let app = app(InMemoryEventRepository::new());

    for uri in ["/events/abc", "/events/0", "/events/-4"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);

        let error: ErrorResponse = json_body(response.into_body()).await;
        assert_eq!(error.error, "INVALID_ID");
    }
}

#[tokio::test]
async fn test_list_events_filters_by_tag_and_host() {
    let app = app(InMemoryEventRepository::new());
    let data = TestDataBuilder::from_test_name("list_filters");

    create(&app, event_payload(&data, 2, &["students"])).await;
    create(&app, event_payload(&data, 1, &["students", "career"])).await;
    let mut other_host = event_payload(&data, 0, &["staff"]);
    other_host["host"] = json!("Facilities");
    create(&app, other_host).await;

    let response = app.clone().oneshot(get("/events?tag=students")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let events: Vec<Event> = json_body(response.into_body()).await;
    assert_eq!(events.len(), 2);
    assert!(events[0].start < events[1].start);

    let response = app.clone().oneshot(get("/events?host=Facil")).await.unwrap();
    let events: Vec<Event> = json_body(response.into_body()).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].tags, vec!["staff"]);

    let response = app
        .oneshot(get("/events?tag=students&host=Facil"))
        .await
        .unwrap();
    let events: Vec<Event> = json_body(response.into_body()).await;
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_list_events_filters_by_date_window_and_featured() {
    let app = app(InMemoryEventRepository::new());
    let data = TestDataBuilder::from_test_name("list_dates");

    create(&app, event_payload(&data, 0, &[])).await;
    let mut featured = event_payload(&data, 5, &[]);
    featured["featured"] = json!(true);
    create(&app, featured).await;
    create(&app, event_payload(&data, 10, &[])).await;

    let uri = format!(
        "/events?startDate={}&endDate={}",
        data.day(1).format("%Y-%m-%dT%H:%M:%SZ"),
        data.day(9).format("%Y-%m-%dT%H:%M:%SZ")
    );
    let response = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let events: Vec<Event> = json_body(response.into_body()).await;
    assert_eq!(events.len(), 1);
    assert!(events[0].featured);

    let response = app.oneshot(get("/events?featured=false")).await.unwrap();
    let events: Vec<Event> = json_body(response.into_body()).await;
    assert_eq!(events.len(), 2);
}

#[tokio::test]
async fn test_list_events_accepts_date_only_window() {
    let app = app(InMemoryEventRepository::new());
    let data = TestDataBuilder::from_test_name("list_date_only");

    // Events start at 09:00 UTC and last two hours.
    create(&app, event_payload(&data, 0, &[])).await;
    create(&app, event_payload(&data, 1, &[])).await;
    create(&app, event_payload(&data, 2, &[])).await;

    let uri = format!(
        "/events?startDate={}&endDate={}",
        data.day(1).format("%Y-%m-%d"),
        data.day(2).format("%Y-%m-%d")
    );
    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let events: Vec<Event> = json_body(response.into_body()).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].start, data.day(1));
}

#[tokio::test]
async fn test_list_events_rejects_bad_query() {
    let app = app(InMemoryEventRepository::new());

    let response = app
        .oneshot(get("/events?startDate=yesterday"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "INVALID_QUERY");
}

#[tokio::test]
async fn test_update_event_replaces_tags_and_keeps_omitted_fields() {
    let app = app(InMemoryEventRepository::new());
    let data = TestDataBuilder::from_test_name("update_tags");
    let created = create(&app, event_payload(&data, 0, &["students", "ai"])).await;
    let uri = format!("/events/{}", created.id);

    let response = app
        .clone()
        .oneshot(put_json(&uri, json!({"summary": "Bring a laptop"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Event = json_body(response.into_body()).await;
    assert_eq!(updated.summary.as_deref(), Some("Bring a laptop"));
    assert_eq!(updated.tags, vec!["ai", "students"]);
    assert_eq!(updated.title, created.title);

    let response = app
        .clone()
        .oneshot(put_json(&uri, json!({"tags": ["rust"]})))
        .await
        .unwrap();
    let updated: Event = json_body(response.into_body()).await;
    assert_eq!(updated.tags, vec!["rust"]);

    let response = app
        .oneshot(put_json(&uri, json!({"tags": []})))
        .await
        .unwrap();
    let updated: Event = json_body(response.into_body()).await;
    assert!(updated.tags.is_empty());
}

#[tokio::test]
async fn test_update_event_errors() {
    let app = app(InMemoryEventRepository::new());
    let data = TestDataBuilder::from_test_name("update_errors");
    let created = create(&app, event_payload(&data, 0, &[])).await;

    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/events/{}", created.id),
            json!({"start": data.day(3), "end": data.day(2)}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(put_json("/events/404", json!({"title": "Ghost"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_event_then_fetch_is_404() {
    let app = app(InMemoryEventRepository::new());
    let data = TestDataBuilder::from_test_name("delete");
    let created = create(&app, event_payload(&data, 0, &["students"])).await;
    let uri = format!("/events/{}", created.id);

    let request = Request::builder()
        .method("DELETE")
        .uri(&uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(
        body,
        json!({"message": "Event deleted successfully", "id": created.id})
    );

    let response = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let request = Request::builder()
        .method("DELETE")
        .uri(&uri)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tags_listing_and_popular() {
    let app = app(InMemoryEventRepository::new());
    let data = TestDataBuilder::from_test_name("tags");

    create(&app, event_payload(&data, 0, &["students", "rust"])).await;
    create(&app, event_payload(&data, 1, &["students"])).await;
    create(&app, event_payload(&data, 2, &["ai"])).await;

    let response = app.clone().oneshot(get("/tags")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let tags: Vec<Tag> = json_body(response.into_body()).await;
    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["ai", "rust", "students"]);

    let response = app.clone().oneshot(get("/tags/popular")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let popular: Vec<Value> = json_body(response.into_body()).await;
    assert_eq!(popular.len(), 3);
    assert_eq!(popular[0]["name"], "students");
    assert_eq!(popular[0]["eventCount"], 2);
    assert_eq!(popular[1]["name"], "ai");

    let response = app.clone().oneshot(get("/tags/popular?limit=1")).await.unwrap();
    let popular: Vec<PopularTag> = json_body(response.into_body()).await;
    assert_eq!(popular.len(), 1);

    let response = app.oneshot(get("/tags/popular?limit=0")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_openapi_lists_all_paths() {
    use utoipa::OpenApi;

    let doc = ApiDoc::openapi();
    let paths: Vec<&String> = doc.paths.paths.keys().collect();

    for expected in ["/events", "/events/{id}", "/tags", "/tags/popular"] {
        assert!(
            paths.iter().any(|p| p.as_str() == expected),
            "missing {} in {:?}",
            expected,
            paths
        );
    }
}
