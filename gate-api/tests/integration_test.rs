use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use gate_api::{app, AppState};
use gate_catalog::{Flight, FlightStatus, InMemoryFlightCatalog};
use gate_core::{BoardingScheduler, FixedClock};
use gate_store::{app_config::CorsConfig, BoardingNotifier};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn flight(number: &str, gate: &str) -> Flight {
    Flight {
        flight_number: number.to_string(),
        departure: "London".to_string(),
        destination: "Paris".to_string(),
        departure_time: "14:30".to_string(),
        gate: gate.to_string(),
        aircraft: "Airbus A320".to_string(),
        status: FlightStatus::OnTime,
    }
}

struct TestApp {
    router: Router,
    state: AppState,
    clock: Arc<FixedClock>,
}

fn test_app() -> TestApp {
    let catalog = InMemoryFlightCatalog::new(vec![
        flight("FL01", "A1"),
        flight("FL02", "B2"),
        flight("FL03", "C3"),
    ]);
    let clock = Arc::new(FixedClock::at(10, 0));
    let scheduler = Arc::new(BoardingScheduler::with_clock(Arc::new(catalog), clock.clone()));
    let state = AppState::new(scheduler, BoardingNotifier::new(16), CorsConfig::default());

    TestApp {
        router: app(state.clone()),
        state,
        clock,
    }
}

async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn check_in_body(name: &str, flight: &str) -> Value {
    json!({
        "name": name,
        "age": "34",
        "contact": "+1 555 0100",
        "seatPreference": "window",
        "flightNumber": flight
    })
}

async fn check_in(app: &TestApp, body: Value) -> u64 {
    let (status, response) = call(&app.router, Method::POST, "/api/check-in", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{response}");
    response["passengerId"].as_u64().unwrap()
}

fn queue_ids(state: &Value) -> Vec<u64> {
    state["queue"]
        .as_array()
        .unwrap()
        .iter()
        .map(|slot| slot[2].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_check_in_returns_boarding_pass_and_flight() {
    let app = test_app();

    let (status, response) = call(
        &app.router,
        Method::POST,
        "/api/check-in",
        Some(check_in_body("Ada Lovelace", "FL02")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["success"], true);
    assert_eq!(response["passengerId"], 1);
    assert_eq!(response["boardingPass"], "FL02-0001");
    assert_eq!(response["passenger"]["status"], "pending");
    assert_eq!(response["passenger"]["boardingGroup"], "C");
    assert_eq!(response["passenger"]["boardingTime"], "10:00");
    assert_eq!(response["passenger"]["contact"], "+1 555 0100");
    assert_eq!(response["flight"]["gate"], "B2");
}

#[tokio::test]
async fn test_boarding_order_group_then_time() {
    let app = test_app();

    let a = check_in(&app, check_in_body("Alice", "FL01")).await;
    app.clock.advance_minutes(1);
    let b = check_in(&app, check_in_body("Bob", "FL01")).await;
    let mut carol = check_in_body("Carol", "FL01");
    carol["boardingGroup"] = json!("A");
    let c = check_in(&app, carol).await;

    let (status, response) = call(
        &app.router,
        Method::POST,
        "/api/start-boarding",
        Some(json!({ "flightNumber": "FL01" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["admitted"], 3);

    let (_, board) = call(&app.router, Method::GET, "/api/gate-control", None).await;
    assert_eq!(queue_ids(&board), vec![c, a, b]);
    assert_eq!(board["queue"][0], json!(["A", "10:01", c]));
    assert_eq!(board["passengers"][a.to_string()]["status"], "queued");

    let (status, boarding) = call(&app.router, Method::GET, &format!("/api/boarding/{b}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(boarding["queuePosition"], 2);
    assert_eq!(boarding["boardingStatus"], "queued");
}

#[tokio::test]
async fn test_unknown_flight_lists_valid_flights() {
    let app = test_app();

    let (status, response) = call(
        &app.router,
        Method::POST,
        "/api/check-in",
        Some(check_in_body("Xavier", "FL99")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["validFlights"], json!(["FL01", "FL02", "FL03"]));
}

#[tokio::test]
async fn test_validation_errors_carry_remediation_data() {
    let app = test_app();

    let mut missing = check_in_body("Ada", "FL01");
    missing.as_object_mut().unwrap().remove("seatPreference");
    let (status, response) = call(&app.router, Method::POST, "/api/check-in", Some(missing)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].as_str().unwrap().contains("seatPreference"));
    assert_eq!(response["validFlights"].as_array().unwrap().len(), 3);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/check-in")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_start_boarding_is_idempotent_and_empty_flights_are_no_ops() {
    let app = test_app();
    check_in(&app, check_in_body("Alice", "FL01")).await;

    let start = |flight: &'static str| {
        let router = app.router.clone();
        async move {
            call(&router, Method::POST, "/api/start-boarding", Some(json!({ "flightNumber": flight }))).await
        }
    };

    assert_eq!(start("FL01").await.1["admitted"], 1);
    assert_eq!(start("FL01").await.1["admitted"], 0);

    let (status, empty) = start("FL03").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty["admitted"], 0);
    assert!(app.state.scheduler.flight_snapshot("FL03").await.is_empty());

    let (status, _) = call(&app.router, Method::POST, "/api/start-boarding", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_passenger_is_not_found() {
    let app = test_app();

    let (status, response) = call(&app.router, Method::GET, "/api/boarding/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["passengerId"], 42);

    let (status, _) = call(&app.router, Method::GET, "/api/passenger/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_passenger_details_include_flight() {
    let app = test_app();
    let id = check_in(&app, check_in_body("Alice", "FL03")).await;

    let (status, details) = call(&app.router, Method::GET, &format!("/api/passenger/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["passenger"]["name"], "Alice");
    assert_eq!(details["flight"]["gate"], "C3");

    let (_, boarding) = call(&app.router, Method::GET, &format!("/api/boarding/{id}"), None).await;
    assert_eq!(boarding["queuePosition"], Value::Null);
    assert_eq!(boarding["boardingStatus"], "pending");
}

#[tokio::test]
async fn test_gate_boards_passengers() {
    let app = test_app();
    let a = check_in(&app, check_in_body("Alice", "FL02")).await;
    app.clock.advance_minutes(3);
    let b = check_in(&app, check_in_body("Bob", "FL02")).await;

    let (status, _) = call(&app.router, Method::POST, "/api/board-passenger", Some(json!({ "passengerId": a }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    call(&app.router, Method::POST, "/api/start-boarding", Some(json!({ "flight_number": "FL02" }))).await;

    let (status, boarded) = call(&app.router, Method::POST, "/api/board-passenger", Some(json!({ "passengerId": b }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(boarded["passenger"]["status"], "boarded");

    let (_, next) = call(&app.router, Method::POST, "/api/board-next", Some(json!({ "flightNumber": "FL02" }))).await;
    assert_eq!(next["passenger"]["id"], a);

    let (_, none_left) = call(&app.router, Method::POST, "/api/board-next", Some(json!({ "flightNumber": "FL02" }))).await;
    assert_eq!(none_left["passenger"], Value::Null);

    let (_, status_view) = call(&app.router, Method::GET, "/api/flight-status/FL02", None).await;
    assert_eq!(status_view["boarded"], 2);
    assert_eq!(status_view["flight"]["status"], "Boarding");

    let (status, _) = call(&app.router, Method::GET, "/api/flight-status/FL99", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_flight_listing_marks_boarding_flights() {
    let app = test_app();
    check_in(&app, check_in_body("Alice", "FL03")).await;
    call(&app.router, Method::POST, "/api/start-boarding", Some(json!({ "flightNumber": "FL03" }))).await;

    let (status, response) = call(&app.router, Method::GET, "/api/flights", None).await;
    assert_eq!(status, StatusCode::OK);

    let statuses: Vec<(String, String)> = response["flights"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| {
            (
                f["flightNumber"].as_str().unwrap().to_string(),
                f["status"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("FL01".to_string(), "On Time".to_string()),
            ("FL02".to_string(), "On Time".to_string()),
            ("FL03".to_string(), "Boarding".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_mutations_are_broadcast() {
    let app = test_app();
    let mut updates = app.state.notifier.subscribe_updates();
    let mut notices = app.state.notifier.subscribe_notices();

    let id = check_in(&app, check_in_body("Alice", "FL01")).await;
    let after_check_in = updates.recv().await.unwrap();
    assert!(after_check_in.queue.is_empty());
    assert!(after_check_in.passengers.contains_key(&id));
    assert_eq!(notices.recv().await.unwrap().queue_position, None);

    call(&app.router, Method::POST, "/api/start-boarding", Some(json!({ "flightNumber": "FL01" }))).await;
    let after_boarding = updates.recv().await.unwrap();
    assert_eq!(after_boarding.queue.len(), 1);
    assert_eq!(after_boarding.queue[0].passenger_id, id);

    let notice = notices.recv().await.unwrap();
    assert_eq!(notice.passenger_id, id);
    assert_eq!(notice.queue_position, Some(0));
}
