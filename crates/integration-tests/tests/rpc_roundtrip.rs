//! JSON-RPC round trips over HTTP against a server on an ephemeral port

mod common;

use std::sync::Arc;

use common::{Board, DAY, NOW};
use jobboard_api_rpc::error::code;
use jobboard_api_rpc::server::METHODS;
use jobboard_api_rpc::{RpcHandler, RpcServer, RpcServerConfig, StaticTokenAuthGate};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::ClientError;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::server::ServerHandle;
use serde_json::{json, Value};

const TOKENS: &str = "emp-token:employer-1:employer,admin-token:admin-1:admin,seeker-token:seeker-1:jobseeker";

struct Running {
    board: Board,
    client: HttpClient,
    handle: ServerHandle,
}

fn handler(board: &Board) -> Arc<RpcHandler> {
    Arc::new(RpcHandler::new(
        board.engine.clone(),
        board.companies.clone(),
        board.applications.clone(),
        Arc::new(StaticTokenAuthGate::parse(TOKENS).unwrap()),
    ))
}

async fn start() -> Running {
    let board = Board::new().await;
    let handler = handler(&board);
    let config = RpcServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    let (addr, handle) = RpcServer::new(config, handler).start().await.unwrap();
    let client = HttpClientBuilder::default()
        .build(format!("http://{}", addr))
        .unwrap();

    Running {
        board,
        client,
        handle,
    }
}

fn params(value: Value) -> ObjectParams {
    let mut params = ObjectParams::new();
    if let Value::Object(map) = value {
        for (key, value) in map {
            params.insert(&key, value).unwrap();
        }
    }
    params
}

async fn call(client: &HttpClient, method: &str, value: Value) -> Result<Value, ClientError> {
    client.request(method, params(value)).await
}

fn error_code(err: ClientError) -> (i32, Option<Value>) {
    match err {
        ClientError::Call(obj) => (
            obj.code(),
            obj.data()
                .map(|raw| serde_json::from_str(raw.get()).unwrap()),
        ),
        other => panic!("expected call error, got {:?}", other),
    }
}

fn posting(company_id: &str, deadline: Option<i64>) -> Value {
    json!({
        "token": "emp-token",
        "company_id": company_id,
        "title": "Platform Engineer",
        "description": "Keep the fleet healthy",
        "category": "Engineering",
        "employment_type": "full-time",
        "work_mode": "remote",
        "location": {"city": "Lisbon"},
        "salary": {"min": "50000", "max": 70000},
        "experience": {"min": 1, "max": 4},
        "skills": ["Rust", "rust", "Linux"],
        "application_deadline": deadline
    })
}

#[tokio::test]
async fn test_every_listed_method_is_registered() {
    let board = Board::new().await;
    let module = RpcServer::new(RpcServerConfig::default(), handler(&board))
        .build_module()
        .unwrap();

    let mut registered: Vec<&str> = module.method_names().collect();
    let mut listed = METHODS.to_vec();
    registered.sort_unstable();
    listed.sort_unstable();
    assert_eq!(registered, listed);
}

#[tokio::test]
async fn test_employer_flow_over_rpc() {
    let running = start().await;
    let client = &running.client;

    let company = call(
        client,
        "companies.create.v1",
        json!({"token": "emp-token", "name": "Acme"}),
    )
    .await
    .unwrap();
    let company_id = company["id"].as_str().unwrap().to_string();
    assert_eq!(company["owner_id"], "employer-1");

    let job = call(client, "jobs.create.v1", posting(&company_id, Some(NOW + DAY)))
        .await
        .unwrap();
    let job_id = job["id"].as_str().unwrap().to_string();
    assert_eq!(job["status"], "OPEN");
    assert_eq!(job["employment_type"], "FULL_TIME");
    assert_eq!(job["salary"]["currency"], "USD");
    assert_eq!(job["skills"], json!(["Rust", "Linux"]));

    // Public reads need no token
    let page = call(client, "jobs.search.v1", json!({"keyword": "fleet"}))
        .await
        .unwrap();
    assert_eq!(page["total"], 1);
    let page = call(client, "jobs.search.v1", json!({"min_salary": "70001"}))
        .await
        .unwrap();
    assert_eq!(page["total"], 0);

    let seen = call(client, "jobs.get.v1", json!({"job_id": job_id}))
        .await
        .unwrap();
    assert_eq!(seen["views"], 1);

    let application = call(
        client,
        "applications.apply.v1",
        json!({"token": "seeker-token", "job_id": job_id, "resume_path": "cv.pdf"}),
    )
    .await
    .unwrap();
    assert_eq!(application["applicant_id"], "seeker-1");

    let toggled = call(
        client,
        "jobs.feature.toggle.v1",
        json!({"token": "admin-token", "job_id": job_id}),
    )
    .await
    .unwrap();
    assert_eq!(toggled["featured"], true);

    let featured = call(client, "jobs.featured.v1", json!({})).await.unwrap();
    assert_eq!(featured.as_array().unwrap().len(), 1);

    // Deadline passes: public views drop the job before any sweep
    running.board.clock.set(NOW + DAY + 1);
    let featured = call(client, "jobs.featured.v1", json!({})).await.unwrap();
    assert!(featured.as_array().unwrap().is_empty());

    let expired = call(client, "admin.expire.v1", json!({"token": "admin-token"}))
        .await
        .unwrap();
    assert_eq!(expired["closed"], 1);

    let stats = call(client, "admin.stats.v1", json!({"token": "admin-token"}))
        .await
        .unwrap();
    assert_eq!(stats["closed"], 1);
    assert_eq!(stats["featured"], 1);

    let deleted = call(
        client,
        "companies.delete.v1",
        json!({"token": "emp-token", "company_id": company_id}),
    )
    .await
    .unwrap();
    assert_eq!(deleted["jobs_removed"], 1);

    running.handle.stop().unwrap();
}

#[tokio::test]
async fn test_error_codes_over_rpc() {
    let running = start().await;
    let client = &running.client;

    // Unknown token
    let err = call(client, "admin.stats.v1", json!({"token": "forged"}))
        .await
        .unwrap_err();
    assert_eq!(error_code(err).0, code::UNAUTHENTICATED);

    // Known token, wrong role
    let err = call(client, "admin.stats.v1", json!({"token": "emp-token"}))
        .await
        .unwrap_err();
    assert_eq!(error_code(err).0, code::FORBIDDEN);

    // Missing credentials on a protected method
    let err = call(client, "jobs.create.v1", json!({"title": "x"}))
        .await
        .unwrap_err();
    assert_eq!(error_code(err).0, code::UNAUTHENTICATED);

    // Every invalid field in one response
    let err = call(client, "jobs.create.v1", json!({"token": "emp-token"}))
        .await
        .unwrap_err();
    let (code_value, data) = error_code(err);
    assert_eq!(code_value, code::VALIDATION_ERROR);
    let fields = data.unwrap()["fields"].as_array().unwrap().len();
    assert!(fields >= 12, "expected every required field, got {}", fields);

    let err = call(client, "jobs.get.v1", json!({"job_id": "missing"}))
        .await
        .unwrap_err();
    assert_eq!(error_code(err).0, code::NOT_FOUND);

    running.handle.stop().unwrap();
}

#[tokio::test]
async fn test_store_unavailable_is_retryable() {
    let running = start().await;
    running.board.pool.close().await;

    let err = call(&running.client, "jobs.search.v1", json!({"page": 1}))
        .await
        .unwrap_err();
    let (code_value, data) = error_code(err);
    assert_eq!(code_value, code::STORE_UNAVAILABLE);
    assert_eq!(data.unwrap()["retryable"], true);

    running.handle.stop().unwrap();
}
