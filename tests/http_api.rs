use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::web::Data;
use actix_web::App;
use serde_json::{Value, json};

use hrms_lite::config::{Config, StoreBackend};
use hrms_lite::routes;
use hrms_lite::service::{AttendanceLedger, EmployeeRegistry};
use hrms_lite::store::{DocumentStore, MemoryStore};

fn test_config() -> Config {
    Config {
        server_addr: "127.0.0.1:0".to_string(),
        store_backend: StoreBackend::Memory,
        database_url: None,
        memory_sample_data: false,
        jwt_secret: "integration-secret".to_string(),
        session_ttl: 3600,
        rate_session_per_min: 10_000,
        rate_api_per_min: 10_000,
        api_prefix: "/api".to_string(),
        log_dir: "logs".to_string(),
        log_level: tracing::Level::DEBUG,
    }
}

fn peer() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

macro_rules! app {
    ($store:expr) => {{
        let store: Arc<dyn DocumentStore> = $store;
        let config = test_config();
        test::init_service(
            App::new()
                .app_data(Data::from(store.clone()))
                .app_data(Data::new(EmployeeRegistry::new(store.clone())))
                .app_data(Data::new(AttendanceLedger::new(store.clone())))
                .app_data(Data::new(config.clone()))
                .configure(|cfg| routes::configure(cfg, &config)),
        )
        .await
    }};
}

macro_rules! sign_in {
    ($app:expr) => {{
        let req = TestRequest::post()
            .uri("/auth/anonymous")
            .peer_addr(peer())
            .to_request();
        let body: Value = test::call_and_read_body_json($app, req).await;
        format!("Bearer {}", body["access_token"].as_str().unwrap())
    }};
}

fn get(uri: &str, token: &str) -> TestRequest {
    TestRequest::get()
        .uri(uri)
        .peer_addr(peer())
        .insert_header(("Authorization", token.to_string()))
}

fn post(uri: &str, token: &str, body: Value) -> TestRequest {
    TestRequest::post()
        .uri(uri)
        .peer_addr(peer())
        .insert_header(("Authorization", token.to_string()))
        .set_json(body)
}

fn employee(id: &str, name: &str, email: &str, department: &str) -> Value {
    json!({
        "employee_id": id,
        "full_name": name,
        "email": email,
        "department": department
    })
}

#[actix_web::test]
async fn guarded_routes_need_a_session() {
    let app = app!(Arc::new(MemoryStore::new()));

    let req = TestRequest::get()
        .uri("/api/employees")
        .peer_addr(peer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = get("/api/employees", "Bearer not-a-token").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let token = sign_in!(&app);
    let resp = test::call_service(&app, get("/api/employees", &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn landing_is_public() {
    let app = app!(Arc::new(MemoryStore::new()));

    let req = TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["pages"][0], "/admin");
}

#[actix_web::test]
async fn duplicate_id_is_rejected_and_original_kept() {
    let app = app!(Arc::new(MemoryStore::new()));
    let token = sign_in!(&app);

    let first = employee("EMP1", "A", "a@x.io", "Ops");
    let resp = test::call_service(&app, post("/api/employees", &token, first).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Employee added successfully.");

    let second = employee("EMP1", "B", "b@x.io", "Ops");
    let resp = test::call_service(&app, post("/api/employees", &token, second).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body: Value =
        test::call_and_read_body_json(&app, get("/api/employees/EMP1", &token).to_request()).await;
    assert_eq!(body["full_name"], "A");
    assert_eq!(body["email"], "a@x.io");
}

#[actix_web::test]
async fn invalid_form_reports_each_field() {
    let app = app!(Arc::new(MemoryStore::new()));
    let token = sign_in!(&app);

    let bad = employee("  ", "", "not-an-email", "Ops");
    let resp = test::call_service(&app, post("/api/employees", &token, bad).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["employee_id", "full_name", "email"]);

    let body: Value =
        test::call_and_read_body_json(&app, get("/api/employees", &token).to_request()).await;
    assert_eq!(body["total"], 0);
}

#[actix_web::test]
async fn update_merges_unspecified_fields() {
    let app = app!(Arc::new(MemoryStore::with_sample_data()));
    let token = sign_in!(&app);

    let req = TestRequest::put()
        .uri("/api/employees/EMP001")
        .peer_addr(peer())
        .insert_header(("Authorization", token.clone()))
        .set_json(json!({ "department": "Platform" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["employee"]["full_name"], "John Doe");
    assert_eq!(body["employee"]["department"], "Platform");
}

#[actix_web::test]
async fn remarking_a_day_keeps_one_record() {
    let app = app!(Arc::new(MemoryStore::new()));
    let token = sign_in!(&app);

    let alice = employee("E001", "Alice Johnson", "alice@example.com", "Engineering");
    test::call_service(&app, post("/api/employees", &token, alice).to_request()).await;

    for status in ["Present", "Absent"] {
        let mark = json!({ "employee_id": "E001", "date": "2024-01-15", "status": status });
        let resp = test::call_service(&app, post("/api/attendance", &token, mark).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let body: Value = test::call_and_read_body_json(
        &app,
        get("/api/attendance?date=2024-01-15", &token).to_request(),
    )
    .await;
    let records = body["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], "E001_2024-01-15");
    assert_eq!(records[0]["status"], "Absent");
    assert_eq!(records[0]["full_name"], "Alice Johnson");
}

#[actix_web::test]
async fn marking_an_unknown_employee_is_not_found() {
    let app = app!(Arc::new(MemoryStore::new()));
    let token = sign_in!(&app);

    let mark = json!({ "employee_id": "E404", "date": "2024-01-15", "status": "Present" });
    let resp = test::call_service(&app, post("/api/attendance", &token, mark).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn delete_is_acknowledged_then_cascades() {
    let store = Arc::new(MemoryStore::with_sample_data());
    let app = app!(store.clone());
    let token = sign_in!(&app);

    let mark = json!({ "employee_id": "EMP001", "date": "2024-01-15", "status": "Present" });
    test::call_service(&app, post("/api/attendance", &token, mark).to_request()).await;

    let req = TestRequest::delete()
        .uri("/api/employees/EMP001")
        .peer_addr(peer())
        .insert_header(("Authorization", token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    // The delete runs in the background.
    let mut gone = false;
    for _ in 0..50 {
        if store.get_employee("EMP001").await.unwrap().is_none() {
            gone = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(gone);

    let body: Value = test::call_and_read_body_json(
        &app,
        get("/api/attendance?date=2024-01-15", &token).to_request(),
    )
    .await;
    assert!(body["records"].as_array().unwrap().is_empty());

    let resp = test::call_service(&app, get("/api/employees/EMP001", &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn directory_filters_by_search_and_department() {
    let app = app!(Arc::new(MemoryStore::new()));
    let token = sign_in!(&app);

    for body in [
        employee("E001", "Alice Johnson", "alice@example.com", "Engineering"),
        employee("E002", "Bob Smith", "bob@example.com", "Design"),
        employee("E003", "Alina Park", "alina@example.com", "Design"),
    ] {
        test::call_service(&app, post("/api/employees", &token, body).to_request()).await;
    }

    let body: Value = test::call_and_read_body_json(
        &app,
        get("/api/employees?search=ali&department=Design", &token).to_request(),
    )
    .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["employee_id"], "E003");
    assert_eq!(body["departments"], json!(["Design", "Engineering"]));

    let body: Value = test::call_and_read_body_json(
        &app,
        get("/employees?department=all", &token).to_request(),
    )
    .await;
    assert_eq!(body["employees"].as_array().unwrap().len(), 3);
    assert_eq!(body["department_options"][0], "all");
}

#[actix_web::test]
async fn seed_fills_dashboard_for_today() {
    let app = app!(Arc::new(MemoryStore::new()));
    let token = sign_in!(&app);

    let resp =
        test::call_service(&app, post("/api/admin/seed", &token, json!({})).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["report"]["employees"], 5);

    // Seeding again merges rather than duplicating.
    test::call_service(&app, post("/api/admin/seed", &token, json!({})).to_request()).await;

    let stats: Value =
        test::call_and_read_body_json(&app, get("/api/dashboard", &token).to_request()).await;
    assert_eq!(stats["total_employees"], 5);
    let marked = stats["present"].as_u64().unwrap() + stats["absent"].as_u64().unwrap();
    assert_eq!(marked, 5);
    assert_eq!(stats["unmarked"], 0);

    let page: Value = test::call_and_read_body_json(&app, get("/admin", &token).to_request()).await;
    assert_eq!(page["employees"].as_array().unwrap().len(), 5);
}

#[actix_web::test]
async fn attendance_page_explains_an_empty_day() {
    let app = app!(Arc::new(MemoryStore::with_sample_data()));
    let token = sign_in!(&app);

    let page: Value = test::call_and_read_body_json(
        &app,
        get("/attendance?date=2020-02-02", &token).to_request(),
    )
    .await;
    assert_eq!(page["empty_message"], "No logs available for 2020-02-02.");
    assert_eq!(page["employees"][0]["label"], "John Doe (EMP001)");
    assert_eq!(page["statuses"], json!(["Present", "Absent"]));
}
