//! Integration tests for the environment, scheme and deduction endpoints.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::{Value, json};

async fn create(server: &TestServer, path: &str, body: Value) -> Value {
    let (status, body) = json_request(&server.router, "POST", &server.url(path), Some(body)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"].clone()
}

// =============================================================================
// Environment Templates and Instances
// =============================================================================

#[tokio::test]
async fn test_env_template_lifecycle() {
    let server = TestServer::new().await;

    let template = create(
        &server,
        "/env/template/create",
        json!({"name": "desert", "param_schema": {"map": {"type": "string"}}}),
    )
    .await;
    let id = template["id"].as_i64().unwrap();
    assert_eq!(template["param_schema"]["map"]["type"], "string");

    let (status, body) = json_request(
        &server.router,
        "GET",
        &server.url("/env/template/by-name/desert"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id);

    let (status, body) = json_request(
        &server.router,
        "POST",
        &server.url("/env/template/create"),
        Some(json!({"name": "desert", "param_schema": {}})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);

    let uri = server.url(&format!("/env/template/{id}"));
    let (status, _) = json_request(&server.router, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = json_request(&server.router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_env_template_requires_name() {
    let server = TestServer::new().await;
    let (status, body) = json_request(
        &server.router,
        "POST",
        &server.url("/env/template/create"),
        Some(json!({"name": "  ", "param_schema": {}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_env_template_param_schema_must_be_object() {
    let server = TestServer::new().await;

    for body in [
        json!({"name": "t1"}),
        json!({"name": "t1", "param_schema": "not-an-object"}),
        json!({"name": "t1", "param_schema": [1, 2]}),
        json!({"name": "t1", "param_schema": null}),
    ] {
        let (status, response) = json_request(
            &server.router,
            "POST",
            &server.url("/env/template/create"),
            Some(body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response["code"], 400);
        assert!(
            response["msg"]
                .as_str()
                .unwrap()
                .starts_with("invalid request body")
        );
    }

    let (_, body) =
        json_request(&server.router, "GET", &server.url("/env/template/all"), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_env_template_delete_all() {
    let server = TestServer::new().await;
    for name in ["desert", "forest", "tundra"] {
        create(
            &server,
            "/env/template/create",
            json!({"name": name, "param_schema": {}}),
        )
        .await;
    }

    let (status, body) = json_request(
        &server.router,
        "DELETE",
        &server.url("/env/template/all"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "deleted");
    assert_eq!(body["data"]["deleted"], 3);

    let (_, body) =
        json_request(&server.router, "GET", &server.url("/env/template/all"), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, body) = json_request(
        &server.router,
        "DELETE",
        &server.url("/env/template/all"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], 0);
}

#[tokio::test]
async fn test_env_instance_requires_existing_template() {
    let server = TestServer::new().await;
    let (status, body) = json_request(
        &server.router,
        "POST",
        &server.url("/env/instance/create"),
        Some(json!({"name": "run-1", "template_id": 424242, "params": {}})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn test_env_instance_params_must_be_object() {
    let server = TestServer::new().await;
    let template = create(
        &server,
        "/env/template/create",
        json!({"name": "desert", "param_schema": {}}),
    )
    .await;
    let template_id = template["id"].as_i64().unwrap();

    for body in [
        json!({"name": "run-1", "template_id": template_id}),
        json!({"name": "run-1", "template_id": template_id, "params": "map=desert"}),
        json!({"name": "run-1", "template_id": template_id, "params": [{"map": "desert"}]}),
    ] {
        let (status, response) = json_request(
            &server.router,
            "POST",
            &server.url("/env/instance/create"),
            Some(body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response["code"], 400);
    }

    let (_, body) =
        json_request(&server.router, "GET", &server.url("/env/instance/all"), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_env_instance_update_and_bulk_delete() {
    let server = TestServer::new().await;
    let template = create(
        &server,
        "/env/template/create",
        json!({"name": "desert", "param_schema": {}}),
    )
    .await;
    let template_id = template["id"].as_i64().unwrap();

    let first = create(
        &server,
        "/env/instance/create",
        json!({"name": "run-1", "template_id": template_id, "params": {"map": "desert"}}),
    )
    .await;
    create(
        &server,
        "/env/instance/create",
        json!({"name": "run-2", "template_id": template_id, "params": {}}),
    )
    .await;
    let first_id = first["id"].as_i64().unwrap();

    let (status, body) = json_request(
        &server.router,
        "GET",
        &server.url(&format!("/env/instance/by-template-id/{template_id}")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = json_request(
        &server.router,
        "POST",
        &server.url("/env/instance/update"),
        Some(json!({
            "id": first_id,
            "name": "run-1b",
            "template_id": template_id,
            "params": {"map": "forest"},
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["name"], "run-1b");
    assert_eq!(body["data"]["params"]["map"], "forest");
    assert_eq!(body["data"]["id"], first_id);

    let (status, _) = json_request(
        &server.router,
        "POST",
        &server.url("/env/instance/update"),
        Some(json!({
            "id": 1,
            "name": "ghost",
            "template_id": template_id,
            "params": {},
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = json_request(
        &server.router,
        "DELETE",
        &server.url("/env/instance/all"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], 2);

    let (_, body) =
        json_request(&server.router, "GET", &server.url("/env/instance/all"), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

// =============================================================================
// Schemes
// =============================================================================

#[tokio::test]
async fn test_scheme_create_and_conflict() {
    let server = TestServer::new().await;
    let agent_schemes = json!([
        {"agent_id": 2, "count": 1},
        {"agent_id": 1, "count": 3},
    ]);

    let scheme = create(
        &server,
        "/scheme/create",
        json!({"name": "pincer", "description": "two flanks", "agent_schemes": agent_schemes}),
    )
    .await;
    let id = scheme["id"].as_i64().unwrap();
    assert_eq!(scheme["side"], "unknown");

    let (status, body) = json_request(
        &server.router,
        "POST",
        &server.url("/scheme/create"),
        Some(json!({
            "name": "pincer",
            "description": "changed",
            "side": "blue",
            "agent_schemes": [],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);

    // The conflicting create leaves the stored row untouched.
    let (status, body) = json_request(
        &server.router,
        "GET",
        &server.url(&format!("/scheme/{id}")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["description"], "two flanks");
    assert_eq!(body["data"]["agent_schemes"], agent_schemes);

    let (status, _) = json_request(
        &server.router,
        "DELETE",
        &server.url(&format!("/scheme/{id}")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = json_request(
        &server.router,
        "GET",
        &server.url("/scheme/by-name/pincer"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_scheme_agent_schemes_must_be_objects() {
    let server = TestServer::new().await;

    for body in [
        json!({"name": "pincer", "description": "two flanks"}),
        json!({"name": "pincer", "description": "two flanks", "agent_schemes": [1, "x", null]}),
        json!({"name": "pincer", "description": "two flanks", "agent_schemes": {"agent_id": 1}}),
    ] {
        let (status, response) = json_request(
            &server.router,
            "POST",
            &server.url("/scheme/create"),
            Some(body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response["code"], 400);
    }

    let (_, body) = json_request(&server.router, "GET", &server.url("/scheme/all"), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    // An empty list is a valid document.
    let scheme = create(
        &server,
        "/scheme/create",
        json!({"name": "solo", "description": "", "agent_schemes": []}),
    )
    .await;
    assert_eq!(scheme["agent_schemes"], json!([]));
}

// =============================================================================
// Deduction Plans
// =============================================================================

#[tokio::test]
async fn test_deduction_plan_create_and_update() {
    let server = TestServer::new().await;

    let plan = create(
        &server,
        "/deduction/plan/create",
        json!({"name": "drill", "plan_config": {"rounds": 3}}),
    )
    .await;
    let id = plan["id"].as_i64().unwrap();
    assert_eq!(plan["status"], "inactive");
    assert!(plan["start_time"].is_null());

    let (status, body) = json_request(
        &server.router,
        "POST",
        &server.url("/deduction/plan/update"),
        Some(json!({
            "id": id,
            "name": "drill",
            "status": "running",
            "plan_config": {"rounds": 5},
            "start_time": "2026-01-02T03:04:05Z",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "running");
    assert_eq!(body["data"]["plan_config"]["rounds"], 5);
    assert_eq!(body["data"]["start_time"], "2026-01-02T03:04:05Z");

    // Omitting the status keeps the current one.
    let (status, body) = json_request(
        &server.router,
        "POST",
        &server.url("/deduction/plan/update"),
        Some(json!({"id": id, "name": "drill-2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "running");

    let (status, body) = json_request(
        &server.router,
        "POST",
        &server.url("/deduction/plan/create"),
        Some(json!({"name": "bad", "status": "paused"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (status, _) = json_request(
        &server.router,
        "DELETE",
        &server.url(&format!("/deduction/plan/{id}")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = json_request(
        &server.router,
        "DELETE",
        &server.url(&format!("/deduction/plan/{id}")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Task Logs and Status
// =============================================================================

#[tokio::test]
async fn test_task_logs_by_task() {
    let server = TestServer::new().await;

    let first = create(
        &server,
        "/deduction/task-log/create",
        json!({"task_id": 7, "content": "started"}),
    )
    .await;
    assert_eq!(first["kind"], "log");
    assert_eq!(first["level"], "info");

    create(
        &server,
        "/deduction/task-log/create",
        json!({"task_id": 7, "suffix": 1, "content": "contact", "kind": "event", "level": "warning"}),
    )
    .await;
    create(
        &server,
        "/deduction/task-log/create",
        json!({"task_id": 8, "content": "other task"}),
    )
    .await;

    let (status, body) = json_request(
        &server.router,
        "GET",
        &server.url("/deduction/task-log/by-task-id/7"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let logs = body["data"].as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["content"], "started");
    assert_eq!(logs[1]["kind"], "event");
}

#[tokio::test]
async fn test_task_log_content_limit() {
    let server = TestServer::new().await;

    let (status, body) = json_request(
        &server.router,
        "POST",
        &server.url("/deduction/task-log/create"),
        Some(json!({"task_id": 1, "content": "x".repeat(513)})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["msg"].as_str().unwrap().contains("512"));

    create(
        &server,
        "/deduction/task-log/create",
        json!({"task_id": 1, "content": "x".repeat(512)}),
    )
    .await;
}

#[tokio::test]
async fn test_task_status_lifecycle() {
    let server = TestServer::new().await;

    let created = create(
        &server,
        "/deduction/task-status/create",
        json!({"task_id": 11}),
    )
    .await;
    assert_eq!(created["status"], "unknown");
    assert_eq!(created["suffix"], 0);

    let (status, body) = json_request(
        &server.router,
        "POST",
        &server.url("/deduction/task-status/create"),
        Some(json!({"task_id": 11, "status": "normal"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);

    let (status, body) = json_request(
        &server.router,
        "POST",
        &server.url("/deduction/task-status/update"),
        Some(json!({"task_id": 11, "suffix": 2, "status": "terminal"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "terminal");
    assert_eq!(body["data"]["suffix"], 2);

    let (status, _) = json_request(
        &server.router,
        "POST",
        &server.url("/deduction/task-status/update"),
        Some(json!({"task_id": 12, "status": "normal"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = json_request(
        &server.router,
        "POST",
        &server.url("/deduction/task-status/update"),
        Some(json!({"task_id": 11, "status": "sleeping"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = json_request(
        &server.router,
        "GET",
        &server.url("/deduction/task-status/11"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "terminal");

    let (status, _) = json_request(
        &server.router,
        "DELETE",
        &server.url("/deduction/task-status/11"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = json_request(
        &server.router,
        "GET",
        &server.url("/deduction/task-status/all"),
        None,
    )
    .await;
    assert!(body["data"].as_array().unwrap().is_empty());
}
