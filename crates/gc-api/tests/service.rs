use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use gc_api::{create_router, AppConfig, AppState};
use gc_client::{compute_signature, WebhookHandler, WebhookVerifier};
use gc_core::{
    ApiError, ApiResult, Event, Gateway, ListOptions, Payment, Payout, Refund, Resource,
    ResourceKind,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const SECRET: &str = "whsec_test";
const WEBHOOK_BODY: &str = r#"{"events":[
    {"id":"EV10","action":"confirmed","resource_type":"payments","links":{"payment":"PM1"}},
    {"id":"EV11","action":"paid","resource_type":"payouts","links":{"payout":"PO1"}}
]}"#;

/// Gateway holding one settled payout: PO1 paid by EV1, containing PM1 and RF1
struct StubGateway;

fn event(id: &str, action: &str, resource_type: &str, links: &[(&str, &str)]) -> Event {
    Event {
        id: Some(id.to_string()),
        action: action.to_string(),
        resource_type: resource_type.to_string(),
        links: links
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        ..Default::default()
    }
}

fn payment() -> Payment {
    Payment {
        id: Some("PM1".to_string()),
        amount: Some(1000),
        ..Default::default()
    }
}

fn refund() -> Refund {
    Refund {
        id: Some("RF1".to_string()),
        amount: Some(300),
        ..Default::default()
    }
}

fn with_resources(mut event: Event) -> Event {
    let mut resources = HashMap::new();
    if event.link("payment").is_some() {
        resources.insert("payment".to_string(), Resource::Payment(payment()));
    }
    if event.link("refund").is_some() {
        resources.insert("refund".to_string(), Resource::Refund(refund()));
    }
    event.resources = Some(resources);
    event
}

fn not_found(path: &str) -> ApiError {
    ApiError::ResourceNotFound {
        message: format!("Resource not found at {}", path),
        code: 404,
    }
}

#[async_trait]
impl Gateway for StubGateway {
    async fn list_events(
        &self,
        options: &ListOptions,
        expand: bool,
    ) -> ApiResult<Vec<Event>> {
        if options.get("payout") == Some("PO1") && options.get("action") == Some("paid") {
            return Ok(vec![event("EV1", "paid", "payouts", &[("payout", "PO1")])]);
        }
        if options.get("parent_event") == Some("EV1") {
            let children = vec![
                event("EV2", "paid_out", "payments", &[("payment", "PM1")]),
                event("EV3", "paid", "refunds", &[("refund", "RF1")]),
            ];
            return Ok(if expand {
                children.into_iter().map(with_resources).collect()
            } else {
                children
            });
        }
        Ok(Vec::new())
    }

    async fn get_event(&self, id: &str, expand: bool) -> ApiResult<Event> {
        match id {
            "EV2" => {
                let event = event("EV2", "paid_out", "payments", &[("payment", "PM1")]);
                Ok(if expand { with_resources(event) } else { event })
            }
            _ => Err(not_found(&format!("/events/{}", id))),
        }
    }

    async fn get_payout(&self, id: &str) -> ApiResult<Payout> {
        match id {
            "PO1" => Ok(Payout {
                id: Some("PO1".to_string()),
                amount: Some(700),
                ..Default::default()
            }),
            _ => Err(not_found(&format!("/payouts/{}", id))),
        }
    }

    async fn fetch_resource(&self, kind: ResourceKind, id: &str) -> ApiResult<Resource> {
        Err(not_found(&format!("/{}/{}", kind.collection(), id)))
    }
}

#[derive(Default)]
struct RecordingHandler(Mutex<Vec<String>>);

impl WebhookHandler for RecordingHandler {
    fn on_payment_event(&self, event: &Event) -> ApiResult<()> {
        self.0.lock().unwrap().push(format!("payment:{}", event.action));
        Ok(())
    }

    fn on_payout_event(&self, event: &Event) -> ApiResult<()> {
        self.0.lock().unwrap().push(format!("payout:{}", event.action));
        Ok(())
    }
}

fn server_with(verifier: Option<WebhookVerifier>, handler: Arc<RecordingHandler>) -> TestServer {
    let state = AppState::with_gateway(Arc::new(StubGateway), verifier, AppConfig::default())
        .with_handler(handler);
    TestServer::new(create_router(state)).unwrap()
}

fn server() -> (TestServer, Arc<RecordingHandler>) {
    let handler = Arc::new(RecordingHandler::default());
    let server = server_with(Some(WebhookVerifier::new(SECRET)), handler.clone());
    (server, handler)
}

fn signature_header(value: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("webhook-signature"),
        HeaderValue::from_str(value).unwrap(),
    )
}

#[tokio::test]
async fn health_reports_service() {
    let (server, _) = server();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "gocardless-service");
}

#[tokio::test]
async fn webhook_with_valid_signature_dispatches_every_event() {
    let (server, handler) = server();
    let (name, value) = signature_header(&compute_signature(SECRET, WEBHOOK_BODY.as_bytes()));

    let response = server
        .post("/webhook/gocardless")
        .add_header(name, value)
        .text(WEBHOOK_BODY)
        .await;

    response.assert_status(StatusCode::NO_CONTENT);
    assert_eq!(
        *handler.0.lock().unwrap(),
        vec!["payment:confirmed".to_string(), "payout:paid".to_string()]
    );
}

#[tokio::test]
async fn webhook_without_signature_is_bad_request() {
    let (server, handler) = server();

    let response = server.post("/webhook/gocardless").text(WEBHOOK_BODY).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(handler.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn webhook_with_wrong_signature_is_unauthorized() {
    let (server, handler) = server();
    let (name, value) = signature_header(&compute_signature("other", WEBHOOK_BODY.as_bytes()));

    let response = server
        .post("/webhook/gocardless")
        .add_header(name, value)
        .text(WEBHOOK_BODY)
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(handler.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn signed_but_malformed_webhook_is_bad_request() {
    let (server, handler) = server();
    let body = r#"{"events":[{"id":"EV1"}]}"#;
    let (name, value) = signature_header(&compute_signature(SECRET, body.as_bytes()));

    let response = server
        .post("/webhook/gocardless")
        .add_header(name, value)
        .text(body)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["code"], 400);
    assert!(handler.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn webhook_without_configured_secret_is_rejected() {
    let handler = Arc::new(RecordingHandler::default());
    let server = server_with(None, handler.clone());
    let (name, value) = signature_header(&compute_signature(SECRET, WEBHOOK_BODY.as_bytes()));

    let response = server
        .post("/webhook/gocardless")
        .add_header(name, value)
        .text(WEBHOOK_BODY)
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(handler.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn reconciliation_lists_settled_payments_and_refunds() {
    let (server, _) = server();

    let response = server.get("/api/v1/payouts/PO1/reconciliation").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["payout"]["id"], "PO1");
    assert_eq!(body["payments"][0]["id"], "PM1");
    assert_eq!(body["refunds"][0]["id"], "RF1");
    assert_eq!(body["net_amount"], 700);
}

#[tokio::test]
async fn reconciliation_of_unpaid_payout_is_not_found() {
    let (server, _) = server();

    let response = server.get("/api/v1/payouts/PO9/reconciliation").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["code"], 404);
    assert!(body["error"].as_str().unwrap().contains("PO9"));
}

#[tokio::test]
async fn event_resources_only_when_requested() {
    let (server, _) = server();

    let plain: Value = server.get("/api/v1/events/EV2").await.json();
    assert_eq!(plain["id"], "EV2");
    assert!(plain.get("resources").is_none());

    let expanded: Value = server
        .get("/api/v1/events/EV2")
        .add_query_param("include_resources", "true")
        .await
        .json();
    assert_eq!(expanded["resources"]["payment"]["id"], "PM1");
}

#[tokio::test]
async fn unknown_event_maps_to_not_found() {
    let (server, _) = server();

    let response = server.get("/api/v1/events/EV404").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["error"], "Resource not found at /events/EV404 (404)");
}
