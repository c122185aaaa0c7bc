//! End-to-end tests of handlers mounted on a service router
//!
//! Operations here keep their rows in memory and report outcomes the same way
//! database-backed operations do, so the full request path runs without
//! PostgreSQL.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use routehaus::prelude::*;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, Once};
use tower::ServiceExt;

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Item {
    #[serde(rename = "_id")]
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ItemId {
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Debug, Default, Serialize)]
struct ItemPage {
    items: Vec<Item>,
    limit: i64,
    offset: i64,
}

type Rows = Arc<Mutex<BTreeMap<String, Item>>>;

struct ItemCreate(Rows);
struct ItemGet(Rows);
struct ItemUpdate(Rows);
struct ItemDelete(Rows);
struct ItemList(Rows);

#[async_trait]
impl Operation for ItemCreate {
    type Input = Item;
    type Output = Item;

    async fn perform(&self, _ctx: &OperationContext, input: Item, output: &mut Item) -> OperationReport {
        let mut rows = self.0.lock().unwrap();
        if rows.contains_key(&input.id) {
            return OperationReport::failed(OperationError::already_exists(format!(
                "item {} already exists",
                input.id
            )));
        }
        rows.insert(input.id.clone(), input.clone());
        *output = input;
        OperationReport::with_outcome(ExecOutcome::new(1))
    }
}

#[async_trait]
impl Operation for ItemGet {
    type Input = ItemId;
    type Output = Item;

    async fn perform(&self, _ctx: &OperationContext, input: ItemId, output: &mut Item) -> OperationReport {
        match self.0.lock().unwrap().get(&input.id) {
            Some(item) => {
                *output = item.clone();
                OperationReport::success()
            }
            None => OperationReport::failed(sqlx::Error::RowNotFound),
        }
    }
}

#[async_trait]
impl Operation for ItemUpdate {
    type Input = Item;
    type Output = Item;

    async fn perform(&self, _ctx: &OperationContext, input: Item, output: &mut Item) -> OperationReport {
        let mut rows = self.0.lock().unwrap();
        let touched = match rows.get_mut(&input.id) {
            Some(existing) => {
                existing.name = input.name.clone();
                *output = existing.clone();
                1
            }
            None => 0,
        };
        OperationReport::with_outcome(ExecOutcome::new(touched))
    }
}

#[async_trait]
impl Operation for ItemDelete {
    type Input = ItemId;
    type Output = Item;

    async fn perform(&self, _ctx: &OperationContext, input: ItemId, output: &mut Item) -> OperationReport {
        match self.0.lock().unwrap().remove(&input.id) {
            Some(item) => {
                *output = item;
                OperationReport::with_outcome(ExecOutcome::new(1))
            }
            None => OperationReport::with_outcome(ExecOutcome::new(0)),
        }
    }
}

#[async_trait]
impl Operation for ItemList {
    type Input = PaginationParams;
    type Output = ItemPage;

    async fn perform(
        &self,
        _ctx: &OperationContext,
        mut input: PaginationParams,
        output: &mut ItemPage,
    ) -> OperationReport {
        input.fill_defaults();
        let limit = input.limit_or_default();
        let offset = input.offset_or_default();

        output.items = self
            .0
            .lock()
            .unwrap()
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        output.limit = limit;
        output.offset = offset;
        OperationReport::success()
    }
}

fn service(rows: Rows) -> Service {
    Service::new("Items", "1.0.0")
        .description("In-memory item store")
        .route(
            HttpMethod::Post,
            "/item",
            Handler::builder(ItemCreate(rows.clone()), "Item")
                .summary("Create an item")
                .build(),
        )
        .route(
            HttpMethod::Get,
            "/item/{_id}",
            Handler::new(ItemGet(rows.clone()), "Item"),
        )
        .route(
            HttpMethod::Put,
            "/item/{_id}",
            Handler::new(ItemUpdate(rows.clone()), "Item"),
        )
        .route(
            HttpMethod::Delete,
            "/item/{_id}",
            Handler::new(ItemDelete(rows.clone()), "Item"),
        )
        .route(
            HttpMethod::Get,
            "/item",
            Handler::builder(ItemList(rows), "Item")
                .expected_error(ErrorStatus::InvalidArgument)
                .build(),
        )
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn crud_round_trip() {
    init_tracing();
    let app = service(Rows::default()).into_router();

    let (status, body) = send(&app, "POST", "/item", Some(json!({"_id": "a", "name": "first"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"_id": "a", "name": "first"}));

    let (status, body) = send(&app, "GET", "/item/a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "first");

    let (status, body) = send(&app, "PUT", "/item/a", Some(json!({"name": "renamed"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "renamed");

    let (status, _) = send(&app, "DELETE", "/item/a", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/item/a", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn zero_rows_affected_is_404() {
    init_tracing();
    let app = service(Rows::default()).into_router();

    let (status, _) = send(&app, "PUT", "/item/missing", Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/item/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_create_is_409() {
    init_tracing();
    let app = service(Rows::default()).into_router();

    let item = json!({"_id": "dup", "name": "one"});
    let (status, _) = send(&app, "POST", "/item", Some(item.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "POST", "/item", Some(item)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "item dup already exists");
}

#[tokio::test]
async fn malformed_body_is_400() {
    init_tracing();
    let app = service(Rows::default()).into_router();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/item")
                .body(Body::from("{\"_id\": "))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/item", Some(json!({"name": "no id"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn numeric_query_text_fills_string_fields() {
    init_tracing();
    let app = service(Rows::default()).into_router();

    let (status, body) = send(&app, "POST", "/item?_id=12345&name=true", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"_id": "12345", "name": "true"}));

    let (status, body) = send(&app, "PUT", "/item/12345?name=007", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "007");
}

#[tokio::test]
async fn list_applies_pagination_defaults() {
    init_tracing();
    let rows = Rows::default();
    {
        let mut guard = rows.lock().unwrap();
        for i in 0..25 {
            let id = format!("{i:02}");
            guard.insert(
                id.clone(),
                Item {
                    id,
                    name: format!("item {i}"),
                },
            );
        }
    }
    let app = service(rows).into_router();

    let (status, body) = send(&app, "GET", "/item", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["limit"], 20);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["items"].as_array().unwrap().len(), 20);

    let (_, body) = send(&app, "GET", "/item?limit=5&offset=22", None).await;
    assert_eq!(body["limit"], 5);
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
    assert_eq!(body["items"][0]["_id"], "22");
}

#[test]
fn catalog_lists_every_route() {
    let service = service(Rows::default());
    let catalog = service.catalog();

    assert_eq!(catalog.title, "Items");
    assert_eq!(catalog.version, "1.0.0");
    assert_eq!(catalog.routes.len(), 5);

    let create = catalog.route(HttpMethod::Post, "/item").unwrap();
    assert_eq!(create.handler.config.summary.as_deref(), Some("Create an item"));
    assert_eq!(create.handler.tags(), ["Item".to_string()]);
    assert_eq!(create.error_statuses, vec![404, 409]);

    let list = catalog.route(HttpMethod::Get, "/item").unwrap();
    assert_eq!(list.error_statuses, vec![400, 404, 409]);
    assert!(list.handler.input_type.ends_with("PaginationParams"));
}

#[test]
fn catalog_is_written_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("openapi.json");

    service(Rows::default()).catalog().write_json(&path).unwrap();

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["title"], "Items");
    assert_eq!(written["description"], "In-memory item store");

    let routes = written["routes"].as_array().unwrap();
    assert_eq!(routes.len(), 5);
    assert_eq!(routes[1]["method"], "GET");
    assert_eq!(routes[1]["path"], "/item/{_id}");
    assert_eq!(routes[1]["handler"]["tags"], json!(["Item"]));
    assert_eq!(
        routes[1]["handler"]["expected_errors"],
        json!(["not_found", "already_exists"])
    );
}
