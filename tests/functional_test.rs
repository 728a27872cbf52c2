//! Functional tests for the issue API
//!
//! These tests drive the full router (extraction, handler, SQLite storage)
//! through form-encoded requests, the way a browser form would.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use issue_tracker::api::IssueServer;
use issue_tracker::config::{validate_config_result, ServerConfig, ENV_TEST_ISSUE_ID};
use issue_tracker::storage::SqliteIssueStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const PROJECT: &str = "apitest";

/// Helper to build a router over a fresh in-memory store
fn create_test_app() -> Router {
    IssueServer::new(Arc::new(SqliteIssueStore::in_memory().unwrap())).router()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send_form(app: &Router, method: &str, uri: &str, form: &str) -> Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

async fn get(app: &Router, uri: &str) -> Value {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

fn issues_uri(project: &str) -> String {
    format!("/api/issues/{}", project)
}

/// Create an issue and return its id
async fn create_issue(app: &Router, form: &str) -> String {
    let created = send_form(app, "POST", &issues_uri(PROJECT), form).await;
    created["_id"].as_str().unwrap().to_string()
}

mod create_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_with_every_field() {
        let app = create_test_app();

        let created = send_form(
            &app,
            "POST",
            &issues_uri(PROJECT),
            "issue_title=Title&issue_text=text&created_by=Functional+Test&assigned_to=Chai&status_text=In+QA",
        )
        .await;

        assert_eq!(created["issue_title"], "Title");
        assert_eq!(created["issue_text"], "text");
        assert_eq!(created["created_by"], "Functional Test");
        assert_eq!(created["assigned_to"], "Chai");
        assert_eq!(created["status_text"], "In QA");
        assert_eq!(created["open"], true);
        assert!(created["_id"].is_string());
        assert!(created["created_on"].is_string());
        assert_eq!(created["created_on"], created["updated_on"]);
        assert!(created.get("project").is_none());
    }

    #[tokio::test]
    async fn test_create_with_required_fields() {
        let app = create_test_app();

        let created = send_form(
            &app,
            "POST",
            &issues_uri(PROJECT),
            "issue_title=Title&issue_text=text&created_by=Functional+Test",
        )
        .await;

        assert_eq!(created["assigned_to"], "");
        assert_eq!(created["status_text"], "");
        assert_eq!(created["open"], true);
    }

    #[tokio::test]
    async fn test_create_with_missing_required_fields() {
        let app = create_test_app();

        let response = send_form(
            &app,
            "POST",
            &issues_uri(PROJECT),
            "issue_title=Title&created_by=Functional+Test",
        )
        .await;
        assert_eq!(response, json!({ "error": "required field(s) missing" }));

        let response = send_form(
            &app,
            "POST",
            &issues_uri(PROJECT),
            "issue_title=&issue_text=text&created_by=Functional+Test",
        )
        .await;
        assert_eq!(response, json!({ "error": "required field(s) missing" }));

        assert_eq!(get(&app, &issues_uri(PROJECT)).await, json!([]));
    }

    #[tokio::test]
    async fn test_create_with_json_body() {
        let app = create_test_app();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(issues_uri(PROJECT))
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        json!({
                            "issue_title": "From JSON",
                            "issue_text": "body",
                            "created_by": "client"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        let created = body_json(response).await;
        assert_eq!(created["issue_title"], "From JSON");
    }
}

mod list_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_project_issues() {
        let app = create_test_app();
        create_issue(&app, "issue_title=One&issue_text=a&created_by=alice").await;
        create_issue(&app, "issue_title=Two&issue_text=b&created_by=bob").await;
        send_form(
            &app,
            "POST",
            &issues_uri("other"),
            "issue_title=Elsewhere&issue_text=c&created_by=carol",
        )
        .await;

        let listed = get(&app, &issues_uri(PROJECT)).await;
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0]["issue_title"], "One");
        assert_eq!(listed[1]["issue_title"], "Two");

        for issue in listed {
            for key in [
                "_id",
                "issue_title",
                "issue_text",
                "created_on",
                "updated_on",
                "created_by",
                "assigned_to",
                "open",
                "status_text",
            ] {
                assert!(issue.get(key).is_some(), "missing {}", key);
            }
        }
    }

    #[tokio::test]
    async fn test_list_unknown_project_is_empty() {
        let app = create_test_app();
        assert_eq!(get(&app, &issues_uri("nothing-here")).await, json!([]));
    }

    #[tokio::test]
    async fn test_list_with_one_filter() {
        let app = create_test_app();
        create_issue(&app, "issue_title=One&issue_text=a&created_by=alice").await;
        create_issue(&app, "issue_title=Two&issue_text=b&created_by=bob").await;

        let listed = get(&app, &format!("{}?created_by=ALI", issues_uri(PROJECT))).await;
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["created_by"], "alice");
    }

    #[tokio::test]
    async fn test_list_with_multiple_filters() {
        let app = create_test_app();
        create_issue(
            &app,
            "issue_title=Login+bug&issue_text=a&created_by=alice&assigned_to=joe",
        )
        .await;
        create_issue(
            &app,
            "issue_title=Login+page&issue_text=b&created_by=alice&assigned_to=ann",
        )
        .await;
        let closed = create_issue(
            &app,
            "issue_title=Login+flow&issue_text=c&created_by=alice&assigned_to=joe",
        )
        .await;
        send_form(
            &app,
            "PUT",
            &issues_uri(PROJECT),
            &format!("_id={}&open=false", closed),
        )
        .await;

        let listed = get(
            &app,
            &format!("{}?issue_title=login&assigned_to=joe&open=true", issues_uri(PROJECT)),
        )
        .await;
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["issue_title"], "Login bug");
        assert_eq!(listed[0]["open"], true);
    }

    #[tokio::test]
    async fn test_list_ignores_unknown_filters() {
        let app = create_test_app();
        create_issue(&app, "issue_title=One&issue_text=a&created_by=alice").await;

        let listed = get(&app, &format!("{}?priority=high", issues_uri(PROJECT))).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }
}

mod update_tests {
    use super::*;

    #[tokio::test]
    async fn test_update_one_field() {
        let app = create_test_app();
        let id = create_issue(&app, "issue_title=One&issue_text=a&created_by=alice").await;

        let response = send_form(
            &app,
            "PUT",
            &issues_uri(PROJECT),
            &format!("_id={}&issue_text=new+text", id),
        )
        .await;
        assert_eq!(response, json!({ "result": "successfully updated", "_id": id }));

        let listed = get(&app, &issues_uri(PROJECT)).await;
        assert_eq!(listed[0]["issue_text"], "new text");
        assert_eq!(listed[0]["issue_title"], "One");
    }

    #[tokio::test]
    async fn test_update_multiple_fields() {
        let app = create_test_app();
        let id = create_issue(&app, "issue_title=One&issue_text=a&created_by=alice").await;

        let response = send_form(
            &app,
            "PUT",
            &issues_uri(PROJECT),
            &format!("_id={}&issue_title=Renamed&assigned_to=joe&open=false", id),
        )
        .await;
        assert_eq!(response["result"], "successfully updated");

        let listed = get(&app, &issues_uri(PROJECT)).await;
        assert_eq!(listed[0]["issue_title"], "Renamed");
        assert_eq!(listed[0]["assigned_to"], "joe");
        assert_eq!(listed[0]["open"], false);
        assert!(listed[0]["updated_on"].as_str() >= listed[0]["created_on"].as_str());
    }

    #[tokio::test]
    async fn test_update_missing_id() {
        let app = create_test_app();

        let response = send_form(&app, "PUT", &issues_uri(PROJECT), "issue_text=orphan").await;
        assert_eq!(response, json!({ "error": "missing _id" }));
    }

    #[tokio::test]
    async fn test_update_with_no_fields() {
        let app = create_test_app();
        let id = create_issue(&app, "issue_title=One&issue_text=a&created_by=alice").await;

        let response =
            send_form(&app, "PUT", &issues_uri(PROJECT), &format!("_id={}", id)).await;
        assert_eq!(response, json!({ "error": "no update field(s) sent", "_id": id }));
    }

    #[tokio::test]
    async fn test_update_invalid_id() {
        let app = create_test_app();

        let response = send_form(
            &app,
            "PUT",
            &issues_uri(PROJECT),
            "_id=5871dda29faedc3491ff93bb&issue_text=new+text",
        )
        .await;
        assert_eq!(
            response,
            json!({ "error": "could not update", "_id": "5871dda29faedc3491ff93bb" })
        );
    }

    #[tokio::test]
    async fn test_update_in_other_project_fails() {
        let app = create_test_app();
        let id = create_issue(&app, "issue_title=One&issue_text=a&created_by=alice").await;

        let response = send_form(
            &app,
            "PUT",
            &issues_uri("other"),
            &format!("_id={}&issue_text=hijack", id),
        )
        .await;
        assert_eq!(response, json!({ "error": "could not update", "_id": id }));
    }
}

mod delete_tests {
    use super::*;

    #[tokio::test]
    async fn test_delete_issue() {
        let app = create_test_app();
        let id = create_issue(&app, "issue_title=One&issue_text=a&created_by=alice").await;

        let response =
            send_form(&app, "DELETE", &issues_uri(PROJECT), &format!("_id={}", id)).await;
        assert_eq!(response, json!({ "result": "successfully deleted", "_id": id }));
        assert_eq!(get(&app, &issues_uri(PROJECT)).await, json!([]));

        let response =
            send_form(&app, "DELETE", &issues_uri(PROJECT), &format!("_id={}", id)).await;
        assert_eq!(response, json!({ "error": "could not delete", "_id": id }));
    }

    #[tokio::test]
    async fn test_delete_invalid_id() {
        let app = create_test_app();

        let response = send_form(&app, "DELETE", &issues_uri(PROJECT), "_id=invalid").await;
        assert_eq!(response, json!({ "error": "could not delete", "_id": "invalid" }));
    }

    #[tokio::test]
    async fn test_delete_missing_id() {
        let app = create_test_app();

        let response = send_form(&app, "DELETE", &issues_uri(PROJECT), "").await;
        assert_eq!(response, json!({ "error": "missing _id" }));
    }
}

mod known_issue_tests {
    use super::*;

    /// Config as a test run sees it, with the seeded issue's id in the environment
    fn test_run_config(known_id: &str) -> ServerConfig {
        let mut config = ServerConfig {
            database_url: "sqlite::memory:".to_string(),
            ..ServerConfig::default()
        };
        let known_id = known_id.to_string();
        config
            .apply_env_from(move |key: &str| {
                (key == ENV_TEST_ISSUE_ID).then(|| known_id.clone())
            })
            .unwrap();
        validate_config_result(&config).unwrap();
        config
    }

    #[tokio::test]
    async fn test_update_known_issue_from_config() {
        let app = create_test_app();
        let id = create_issue(&app, "issue_title=Known&issue_text=a&created_by=alice").await;

        let config = test_run_config(&id);
        let known_id = config.test_issue_id.as_deref().unwrap();

        let response = send_form(
            &app,
            "PUT",
            &issues_uri(PROJECT),
            &format!("_id={}&status_text=Verified", known_id),
        )
        .await;
        assert_eq!(response, json!({ "result": "successfully updated", "_id": id }));

        let listed = get(&app, &format!("{}?_id={}", issues_uri(PROJECT), known_id)).await;
        assert_eq!(listed[0]["status_text"], "Verified");
    }
}

mod storage_tests {
    use super::*;

    #[tokio::test]
    async fn test_file_store_persists_across_servers() {
        let temp_dir = TempDir::new().unwrap();
        let config = ServerConfig {
            database_url: format!("sqlite://{}", temp_dir.path().join("issues.db").display()),
            ..ServerConfig::default()
        };

        let id = {
            let app = IssueServer::connect(&config).unwrap().router();
            create_issue(&app, "issue_title=Kept&issue_text=a&created_by=alice").await
        };

        let app = IssueServer::connect(&config).unwrap().router();
        let listed = get(&app, &issues_uri(PROJECT)).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["_id"], id);
    }
}
