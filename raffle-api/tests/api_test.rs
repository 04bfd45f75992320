use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, TimeZone, Utc};
use raffle_api::{app, AppState};
use raffle_catalog::{Catalog, TicketPricing, TicketRange};
use raffle_core::{FixedClock, TicketStore};
use raffle_reservation::{AdminGate, SelectionLimits};
use raffle_shared::{TicketNumber, TicketRecord, TicketStatus};
use raffle_store::InMemoryTicketStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const SECRET: &str = "admin123";

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 2, 20, 30, 0).unwrap()
}

fn test_state(store: Arc<InMemoryTicketStore>) -> AppState {
    AppState {
        store,
        catalog: Arc::new(Catalog::new(vec![TicketRange::new(1, 5)]).unwrap()),
        pricing: TicketPricing::new(10),
        limits: SelectionLimits::default(),
        expiry_hours: 48,
        clock: Arc::new(FixedClock::new(now())),
        admin: AdminGate::new(SECRET),
    }
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn admin_post(uri: &str, secret: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-admin-secret", secret)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = app(test_state(Arc::new(InMemoryTicketStore::new())));
    let resp = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_reserve_and_conflict() {
    let store = Arc::new(InMemoryTicketStore::new());
    let state = test_state(store.clone());

    let (status, body) = send(
        app(state.clone()),
        post_json("/v1/reservations", json!({ "owner": "Ana", "requested_count": 2, "numbers": [1, 2] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["amount"], 20);
    assert_eq!(body["records"][0]["status"], "RESERVED");

    let (status, body) = send(app(state.clone()), get("/v1/tickets")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tickets"][0]["state"], "RESERVED");
    assert_eq!(body["tickets"][2]["state"], "FREE");
    assert_eq!(body["summary"]["reserved"], 2);

    let (status, body) = send(
        app(state),
        post_json("/v1/reservations", json!({ "owner": "Luis", "requested_count": 2, "numbers": [1, 3] })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["numbers"], json!([1]));
    assert_eq!(store.read_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_invalid_selections_are_unprocessable() {
    let state = test_state(Arc::new(InMemoryTicketStore::new()));

    for body in [
        json!({ "owner": "Ana", "requested_count": 0, "numbers": [] }),
        json!({ "owner": "Ana", "requested_count": 21, "numbers": [1] }),
        json!({ "owner": "Ana", "requested_count": 1, "numbers": [1, 2] }),
        json!({ "owner": "Ana", "requested_count": 2, "numbers": [1] }),
        json!({ "owner": "", "requested_count": 1, "numbers": [1] }),
        json!({ "owner": "Ana", "requested_count": 1, "numbers": [99] }),
    ] {
        let (status, _) = send(app(state.clone()), post_json("/v1/reservations", body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}

#[tokio::test]
async fn test_admin_requires_secret() {
    let state = test_state(Arc::new(InMemoryTicketStore::new()));
    let body = json!({ "numbers": "1", "status": "PAID" });

    let (status, _) = send(app(state.clone()), post_json("/v1/admin/status", body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(app(state), admin_post("/v1/admin/status", "wrong", body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_status_override() {
    let store = Arc::new(InMemoryTicketStore::new().with_records(vec![TicketRecord::reserved(
        "Ana",
        TicketNumber(1),
        now(),
    )]));
    let state = test_state(store.clone());

    let (status, body) = send(
        app(state.clone()),
        admin_post("/v1/admin/status", SECRET, json!({ "numbers": "1, 9999, abc", "status": "paid" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 1);
    assert_eq!(body["not_found"], json!([9999]));
    assert_eq!(body["rejected_tokens"], json!(["abc"]));
    assert_eq!(store.read_all().await.unwrap()[0].status, TicketStatus::Paid);

    let (status, _) = send(
        app(state.clone()),
        admin_post("/v1/admin/status", SECRET, json!({ "numbers": "abc,5-", "status": "PAID" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(app(state), get("/v1/summary")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paid"], 1);
    assert_eq!(body["collected"], 10);
}

#[tokio::test]
async fn test_board_sweeps_expired_reservations() {
    let store = Arc::new(InMemoryTicketStore::new().with_records(vec![
        TicketRecord::reserved("Ana", TicketNumber(1), now() - Duration::hours(49)),
        TicketRecord::reserved("Ana", TicketNumber(2), now() - Duration::hours(2)),
    ]));
    let state = test_state(store.clone());

    let (status, body) = send(app(state), get("/v1/tickets")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tickets"][0]["state"], "FREE");
    assert_eq!(body["tickets"][1]["state"], "RESERVED");
    assert_eq!(store.read_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_sweep_and_listing() {
    let store = Arc::new(InMemoryTicketStore::new().with_records(vec![TicketRecord::reserved(
        "Ana",
        TicketNumber(3),
        now() - Duration::hours(72),
    )]));
    let state = test_state(store);

    let (status, body) = send(app(state.clone()), admin_post("/v1/admin/sweep", SECRET, json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["released"], 1);

    let req = Request::builder()
        .uri("/v1/admin/tickets")
        .header("x-admin-secret", SECRET)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(state), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_store_outage_is_service_unavailable() {
    let store = Arc::new(InMemoryTicketStore::new());
    store.set_unavailable(true).await;
    let state = test_state(store);

    let (status, _) = send(app(state), get("/v1/tickets")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
