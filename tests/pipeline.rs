mod common;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use axum::response::Response;
use axum_test::TestServer;
use serde_json::Value;
use six_cities::api::middleware::panic as panic_layer;
use six_cities::error::AppError;
use six_cities::rest::{
    DocumentExists, Guard, Middleware, PipelineSettings, RequestContext, Route, RouteError,
    RouteTable, ValidateObjectId, ok,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records its label and optionally rejects.
struct Recorder {
    label: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
    reject: bool,
}

#[async_trait]
impl Middleware for Recorder {
    fn name(&self) -> &'static str {
        self.label
    }

    async fn execute(&self, _ctx: &mut RequestContext) -> Result<(), AppError> {
        self.log.lock().unwrap().push(self.label);
        if self.reject {
            return Err(AppError::forbidden("guard rejected", self.label));
        }
        Ok(())
    }
}

struct Slow;

#[async_trait]
impl Middleware for Slow {
    fn name(&self) -> &'static str {
        "Slow"
    }

    async fn execute(&self, _ctx: &mut RequestContext) -> Result<(), AppError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(())
    }
}

fn recorder(label: &'static str, log: &Arc<Mutex<Vec<&'static str>>>, reject: bool) -> Guard {
    Guard::custom(Recorder {
        label,
        log: Arc::clone(log),
        reject,
    })
}

fn recording_handler(
    log: &Arc<Mutex<Vec<&'static str>>>,
) -> impl Fn(RequestContext) -> std::future::Ready<Result<Response, AppError>> + Send + Sync + 'static
{
    let log = Arc::clone(log);
    move |_ctx| {
        log.lock().unwrap().push("handler");
        std::future::ready(ok("done"))
    }
}

async fn explode(_ctx: RequestContext) -> Result<Response, AppError> {
    panic!("postgres://admin:hunter2@db failed");
}

async fn reject_in_handler(_ctx: RequestContext) -> Result<Response, AppError> {
    Err(AppError::conflict("Handler said no", "Handler"))
}

fn server(table: RouteTable) -> TestServer {
    TestServer::new(table.into_router().layer(panic_layer::layer())).unwrap()
}

#[tokio::test]
async fn test_unregistered_route_is_404_without_running_guards() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut table = RouteTable::new(PipelineSettings::default());
    table
        .add_route(
            "/things",
            Route::get("/", recording_handler(&log)).guard(recorder("A", &log, false)),
        )
        .unwrap();
    let server = server(table);

    server.get("/nowhere").await.assert_status_not_found();
    server.post("/things").await.assert_status_not_found();

    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_guards_run_in_registration_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut table = RouteTable::new(PipelineSettings::default());
    table
        .add_route(
            "/things",
            Route::get("/", recording_handler(&log))
                .guard(recorder("A", &log, false))
                .guard(recorder("B", &log, false))
                .guard(recorder("C", &log, false)),
        )
        .unwrap();

    let response = server(table).get("/things").await;

    response.assert_status_ok();
    assert_eq!(*log.lock().unwrap(), vec!["A", "B", "C", "handler"]);
}

#[tokio::test]
async fn test_rejecting_guard_short_circuits_chain() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut table = RouteTable::new(PipelineSettings::default());
    table
        .add_route(
            "/things",
            Route::get("/", recording_handler(&log))
                .guard(recorder("A", &log, false))
                .guard(recorder("B", &log, true))
                .guard(recorder("C", &log, false)),
        )
        .unwrap();

    let response = server(table).get("/things").await;

    response.assert_status(StatusCode::FORBIDDEN);
    let json = response.json::<Value>();
    assert_eq!(json["message"], "guard rejected");
    assert_eq!(json["origin"], "B");
    assert_eq!(*log.lock().unwrap(), vec!["A", "B"]);
}

#[tokio::test]
async fn test_handler_error_is_mapped() {
    let mut table = RouteTable::new(PipelineSettings::default());
    table
        .add_route("/things", Route::post("/", reject_in_handler))
        .unwrap();

    let response = server(table).post("/things").await;

    response.assert_status(StatusCode::CONFLICT);
    let json = response.json::<Value>();
    assert_eq!(json["message"], "Handler said no");
    assert_eq!(json["origin"], "Handler");
}

#[tokio::test]
async fn test_panic_becomes_generic_500() {
    let mut table = RouteTable::new(PipelineSettings::default());
    table.add_route("/boom", Route::get("/", explode)).unwrap();

    let response = server(table).get("/boom").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let text = response.text();
    assert!(!text.contains("hunter2"));
    assert!(!text.contains("postgres"));

    let json: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["message"], "Internal Server Error");
}

#[tokio::test]
async fn test_slow_chain_times_out_with_503() {
    let settings = PipelineSettings {
        request_timeout: Duration::from_millis(50),
        ..PipelineSettings::default()
    };
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut table = RouteTable::new(settings);
    table
        .add_route(
            "/slow",
            Route::get("/", recording_handler(&log)).guard(Guard::custom(Slow)),
        )
        .unwrap();

    let response = server(table).get("/slow").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>()["origin"], "Slow");
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_route_is_rejected_at_registration() {
    let mut table = RouteTable::new(PipelineSettings::default());
    table
        .add_route("/offers", Route::get("/:offerId", reject_in_handler))
        .unwrap();

    let err = table
        .add_route("/offers", Route::get("/:offerId", reject_in_handler))
        .unwrap_err();

    assert!(matches!(err, RouteError::Duplicate { .. }));

    table
        .add_route(
            "/offers",
            Route::new(Method::DELETE, "/:offerId", reject_in_handler),
        )
        .unwrap();
    assert_eq!(table.len(), 2);
}

#[tokio::test]
async fn test_invalid_id_never_reaches_lookup() {
    let spy = Arc::new(common::SpyLookup::default());
    let mut table = RouteTable::new(PipelineSettings::default());
    table
        .add_route(
            "/offers",
            Route::get("/:offerId", reject_in_handler)
                .guard(ValidateObjectId::new("offerId"))
                .guard(DocumentExists::new(spy.clone(), "Offer", "offerId")),
        )
        .unwrap();
    let server = server(table);

    let response = server.get("/offers/not-an-id").await;

    response.assert_status_bad_request();
    let json = response.json::<Value>();
    assert_eq!(json["message"], "`not-an-id` is invalid ObjectID");
    assert_eq!(json["origin"], "ValidateObjectId");
    assert_eq!(spy.calls(), 0);

    let response = server.get("/offers/65a1b2c3d4e5f60718293a4b").await;

    response.assert_status_not_found();
    assert_eq!(
        response.json::<Value>()["message"],
        "Offer with 65a1b2c3d4e5f60718293a4b not found."
    );
    assert_eq!(spy.calls(), 1);
}
