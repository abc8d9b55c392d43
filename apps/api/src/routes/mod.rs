pub mod auth;
pub mod extract;
pub mod health;
pub mod preview;
pub mod resumes;

use axum::{
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::state::AppState;

/// Runs synchronous storage work on the blocking pool.
pub(crate) async fn blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Storage task failed: {e}")))?
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/api/v1/auth/signup", post(auth::handle_signup))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        .route("/api/v1/auth/recover", post(auth::handle_recover))
        .route("/api/v1/session", get(auth::handle_session))
        // Dashboard
        .route("/api/v1/templates", get(resumes::handle_templates))
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list).post(resumes::handle_save),
        )
        .route("/api/v1/resumes/recover", post(resumes::handle_recover))
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get).delete(resumes::handle_delete),
        )
        // Builder
        .route("/api/v1/builder", get(resumes::handle_builder))
        .route("/api/v1/bind", post(resumes::handle_bind))
        .route("/api/v1/export", post(resumes::handle_export))
        // Preview
        .route(
            "/api/v1/preview",
            post(preview::handle_put).delete(preview::handle_clear),
        )
        .route("/api/v1/preview/save", post(preview::handle_save))
        .route("/api/v1/preview/download", get(preview::handle_download))
        .route("/preview", get(preview::handle_page))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::auth::Sha256Hasher;
    use crate::storage::{keys, FileStore, KeyValueStore, MemoryStore};

    fn test_app() -> (Router, AppState, Arc<MemoryStore>) {
        let kv = Arc::new(MemoryStore::new());
        let state = AppState::new(kv.clone(), Arc::new(Sha256Hasher));
        (build_router(state.clone()), state, kv)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = send(app, method, uri, body).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn signup(app: &Router) {
        let (status, _) = send_json(
            app,
            Method::POST,
            "/api/v1/auth/signup",
            Some(json!({ "name": "Jo", "email": "jo@x.com", "password": "secret1" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _, _) = test_app();
        let (status, body) = send_json(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_end_to_end_signup_save_delete() {
        let (app, state, _) = test_app();
        signup(&app).await;
        assert_eq!(state.session.current().unwrap().as_deref(), Some("jo@x.com"));

        let (status, saved) = send_json(
            &app,
            Method::POST,
            "/api/v1/resumes",
            Some(json!({
                "name": "Jo Doe",
                "email": "jo@x.com",
                "experience": "Built X\n\nBuilt Y"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = saved["id"].as_i64().unwrap();

        let (status, builder) =
            send_json(&app, Method::GET, &format!("/api/v1/builder?id={id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            builder["bindings"]["experience"]["fragment"]["value"],
            json!(["Built X", "Built Y"])
        );

        let (status, list) = send_json(&app, Method::GET, "/api/v1/resumes", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["name"], "Jo Doe");

        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/resumes/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, list) = send_json(&app, Method::GET, "/api/v1/resumes", None).await;
        assert_eq!(list, json!([]));

        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/resumes/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_requires_session() {
        let (app, _, _) = test_app();
        let (status, body) = send_json(&app, Method::GET, "/api/v1/resumes", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");

        let (status, _) = send(&app, Method::GET, "/preview", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_logout() {
        let (app, state, _) = test_app();
        signup(&app).await;

        let (status, _) = send(&app, Method::POST, "/api/v1/auth/logout", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(state.session.current().unwrap(), None);

        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "email": "jo@x.com", "password": "nope-nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
        assert_eq!(state.session.current().unwrap(), None);

        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "email": " JO@x.com", "password": "secret1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["welcome"], "Welcome back, Jo!");
    }

    #[tokio::test]
    async fn test_duplicate_signup_conflict() {
        let (app, _, _) = test_app();
        signup(&app).await;
        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/v1/auth/signup",
            Some(json!({ "name": "Jo", "email": "jo@x.com", "password": "secret1" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "ACCOUNT_EXISTS");
    }

    #[tokio::test]
    async fn test_save_requires_name_and_email() {
        let (app, state, _) = test_app();
        signup(&app).await;
        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/v1/resumes",
            Some(json!({ "name": "Jo Doe" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(state.resumes.list("jo@x.com").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_builder_unknown_id_is_blank() {
        let (app, _, _) = test_app();
        signup(&app).await;
        let (status, body) =
            send_json(&app, Method::GET, "/api/v1/builder?id=12345&template=3", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["draft"]["name"], "");
        assert_eq!(body["draft"]["template"], "3");
        assert!(body["markup"].as_str().unwrap().contains("template-3"));
    }

    #[tokio::test]
    async fn test_corrupt_collection_then_recover() {
        let (app, _, kv) = test_app();
        signup(&app).await;
        kv.write(&keys::resumes("jo@x.com"), "oops").unwrap();

        let (status, body) = send_json(&app, Method::GET, "/api/v1/resumes", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "STORAGE_CORRUPT");

        let (status, body) = send_json(&app, Method::POST, "/api/v1/resumes/recover", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["quarantinedTo"]
            .as_str()
            .unwrap()
            .starts_with("resumes:jo@x.com:corrupt:"));

        let (status, list) = send_json(&app, Method::GET, "/api/v1/resumes", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_export_download() {
        let (app, _, _) = test_app();
        signup(&app).await;
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/export")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "name": "Jo  Doe", "skills": "Go, Rust" }).to_string()))
            .unwrap();
        let res = app.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Jo_Doe.html\""
        );
        let html = String::from_utf8(to_bytes(res.into_body(), usize::MAX).await.unwrap().to_vec())
            .unwrap();
        assert!(html.contains(r#"<span class="skill-badge">Rust</span>"#));
        assert!(html.contains("'Georgia', serif"));
    }

    #[tokio::test]
    async fn test_preview_handoff_flow() {
        let (app, state, _) = test_app();
        signup(&app).await;

        let (status, bytes) = send(&app, Method::GET, "/preview", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(bytes).unwrap().contains("No resume data available"));

        let (status, _) = send(&app, Method::POST, "/api/v1/preview/save", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/preview",
            Some(json!({ "id": 5, "name": "", "email": "jo@x.com", "summary": "Hi" })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, bytes) = send(&app, Method::GET, "/preview", None).await;
        assert!(String::from_utf8(bytes).unwrap().contains("templatePreview"));

        let (status, saved) = send_json(&app, Method::POST, "/api/v1/preview/save", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(saved["name"], "My Resume");
        assert_ne!(saved["id"], json!(5));

        let (status, bytes) = send(&app, Method::GET, "/api/v1/preview/download", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(bytes).unwrap().contains("Arial, sans-serif"));

        let (status, _) = send(&app, Method::DELETE, "/api/v1/preview", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.preview.peek().is_none());
    }

    #[tokio::test]
    async fn test_templates_filter() {
        let (app, _, _) = test_app();
        let (status, body) =
            send_json(&app, Method::GET, "/api/v1/templates?level=experienced", None).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_unreadable_storage_file_does_not_lock_out_user() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("storage.json"), "not json").unwrap();
        let storage = FileStore::open(dir.path()).unwrap();
        let app = build_router(AppState::new(Arc::new(storage), Arc::new(Sha256Hasher)));

        signup(&app).await;
        let (status, list) = send_json(&app, Method::GET, "/api/v1/resumes", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list, json!([]));

        let (status, _) = send(&app, Method::POST, "/api/v1/auth/logout", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        std::fs::write(dir.path().join("storage.json"), "{broken").unwrap();
        signup(&app).await;

        let quarantined = std::fs::read_dir(dir.path())
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .starts_with("storage.json.corrupt.")
            })
            .count();
        assert!(quarantined >= 1);
    }

    #[tokio::test]
    async fn test_corrupt_account_map_then_recover() {
        let (app, _, kv) = test_app();
        kv.write(keys::USERS, "garbage").unwrap();

        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/v1/auth/signup",
            Some(json!({ "name": "Jo", "email": "jo@x.com", "password": "secret1" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "STORAGE_CORRUPT");

        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "email": "jo@x.com", "password": "secret1" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "STORAGE_CORRUPT");

        let (status, body) = send_json(&app, Method::POST, "/api/v1/auth/recover", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["quarantinedTo"]
            .as_str()
            .unwrap()
            .starts_with("users:corrupt:"));

        signup(&app).await;
    }

    #[tokio::test]
    async fn test_unreadable_session_reads_as_signed_out() {
        let (app, _, kv) = test_app();
        kv.write(keys::SESSION, "not-json").unwrap();
        let (status, body) = send_json(&app, Method::GET, "/api/v1/resumes", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_client_max_id_does_not_duplicate_ids() {
        let (app, state, _) = test_app();
        signup(&app).await;

        let (status, _) = send_json(
            &app,
            Method::POST,
            "/api/v1/resumes",
            Some(json!({ "id": i64::MAX, "name": "Top", "email": "jo@x.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/v1/resumes",
            Some(json!({ "name": "Next", "email": "jo@x.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "IDS_EXHAUSTED");

        let ids: Vec<_> = state
            .resumes
            .list("jo@x.com")
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![Some(i64::MAX)]);
    }

    #[tokio::test]
    async fn test_list_skips_records_without_id() {
        let (app, _, kv) = test_app();
        signup(&app).await;
        kv.write(
            &keys::resumes("jo@x.com"),
            &json!([{ "name": "No id" }, { "id": 1_000, "name": "Kept" }]).to_string(),
        )
        .unwrap();

        let (status, list) = send_json(&app, Method::GET, "/api/v1/resumes", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["name"], "Kept");
    }
}
