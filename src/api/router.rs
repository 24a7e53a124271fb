//! API router.
//!
//! Returns a composable `Router` with every route nested under `/api/`.
//! CORS is permissive so a front-end served from another origin can call it.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Upper bound for one multipart upload (all files of a grouping).
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Build the API router.
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/project", get(endpoints::project::show))
        .route("/files/:grouping", post(endpoints::files::upload))
        .route("/files/:grouping/toggle", post(endpoints::files::toggle))
        .route(
            "/analysis",
            get(endpoints::analysis::status).post(endpoints::analysis::start),
        )
        .route("/analysis/cancel", post(endpoints::analysis::cancel))
        .route("/reset", post(endpoints::project::reset))
        .route("/export/:grouping", get(endpoints::export::download))
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    Router::new()
        .nest("/api", routes)
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::time::Duration;

    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::models::Grouping;
    use crate::pipeline::documentation::mock::MockBackend;
    use crate::pipeline::documentation::DocumentationService;

    const BOUNDARY: &str = "codescribe-test-boundary";

    fn test_core_state() -> Arc<CoreState> {
        let backend = Arc::new(MockBackend::documenting());
        let service = Arc::new(DocumentationService::new(backend, "gemini-test"));
        Arc::new(CoreState::new(service))
    }

    fn multipart_body(files: &[(&str, &str)]) -> String {
        let mut body = String::new();
        for (name, content) in files {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\nContent-Type: application/octet-stream\r\n\r\n{content}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body
    }

    fn upload_request(grouping: &str, files: &[(&str, &str)]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/api/files/{grouping}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(files)))
            .unwrap()
    }

    fn json_request(method: &str, uri: &str, json: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    async fn wait_for_completion(app: &Router) -> serde_json::Value {
        for _ in 0..200 {
            let response = app
                .clone()
                .oneshot(empty_request("GET", "/api/analysis"))
                .await
                .unwrap();
            let json = body_json(response).await;
            if json["phase"] == "completed" {
                return json;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("run did not complete");
    }

    #[tokio::test]
    async fn health_reports_model() {
        let app = api_router(test_core_state());
        let response = app.oneshot(empty_request("GET", "/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["model"], "gemini-test");
    }

    #[tokio::test]
    async fn upload_replaces_grouping_and_classifies() {
        let core = test_core_state();
        let app = api_router(core.clone());

        let response = app
            .clone()
            .oneshot(upload_request("main", &[("a.py", "x = 1"), ("notes.txt", "hi")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["files"][0]["language"], "Python");
        assert_eq!(json["files"][1]["language"], "code");
        assert_eq!(json["files"][0]["status"], "pending");

        let response = app.oneshot(upload_request("main", &[("b.js", "b()")])).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let names: Vec<String> = core
            .snapshot()
            .unwrap()
            .main
            .iter()
            .map(|f| f.name.clone())
            .collect();
        assert_eq!(names, vec!["b.js"]);
    }

    #[tokio::test]
    async fn unknown_grouping_is_400() {
        let app = api_router(test_core_state());
        let response = app.oneshot(upload_request("backend", &[("a.py", "x")])).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn duplicate_upload_names_are_400() {
        let app = api_router(test_core_state());
        let response = app
            .oneshot(upload_request("frontend", &[("a.js", "1"), ("a.js", "2")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn path_escaping_upload_names_are_400() {
        let core = test_core_state();
        let app = api_router(core.clone());
        let response = app
            .oneshot(upload_request("main", &[("../x.js", "x()")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(core.snapshot().unwrap().is_empty());
    }

    #[tokio::test]
    async fn toggle_flips_inclusion() {
        let core = test_core_state();
        let app = api_router(core.clone());
        app.clone()
            .oneshot(upload_request("frontend", &[("app.ts", "let a;")]))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/files/frontend/toggle",
                serde_json::json!({ "name": "app.ts" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["is_included"], false);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/files/frontend/toggle",
                serde_json::json!({ "name": "missing.ts" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn analysis_without_files_is_400() {
        let app = api_router(test_core_state());
        let response = app
            .oneshot(json_request("POST", "/api/analysis", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn full_run_then_export() {
        let core = test_core_state();
        let app = api_router(core.clone());
        app.clone()
            .oneshot(upload_request("main", &[("a.py", "x = 1"), ("README.md", "# hi")]))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/analysis",
                serde_json::json!({ "doc_language": "ru" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let json = body_json(response).await;
        assert_eq!(json["doc_language"], "ru");
        assert!(json["run_id"].is_string());

        let status = wait_for_completion(&app).await;
        assert_eq!(status["run_id"], json["run_id"]);
        assert_eq!(status["summary"]["processed"], 2);
        assert_eq!(status["summary"]["passthrough"], 1);

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/project"))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["main"][0]["status"], "documented");
        assert_eq!(json["main"][0]["documented_content"], "/** documented */\nx = 1");

        let response = app
            .oneshot(empty_request("GET", "/api/export/main"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/gzip");
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("main-documented.tar.gz"));

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(&bytes[..]));
        let mut entries = Vec::new();
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            let name = entry.path().unwrap().to_string_lossy().into_owned();
            let mut content = String::new();
            entry.read_to_string(&mut content).unwrap();
            entries.push((name, content));
        }
        assert_eq!(
            entries,
            vec![
                ("a.py".to_string(), "/** documented */\nx = 1".to_string()),
                ("README.md".to_string(), "# hi".to_string()),
            ]
        );
        assert_eq!(core.snapshot().unwrap().files(Grouping::Main).len(), 2);
    }

    #[tokio::test]
    async fn empty_export_is_422() {
        let app = api_router(test_core_state());
        let response = app
            .oneshot(empty_request("GET", "/api/export/frontend"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn reset_clears_project() {
        let core = test_core_state();
        let app = api_router(core.clone());
        app.clone()
            .oneshot(upload_request("main", &[("a.py", "x")]))
            .await
            .unwrap();

        let response = app.oneshot(empty_request("POST", "/api/reset")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(core.snapshot().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancel_when_idle_is_accepted() {
        let app = api_router(test_core_state());
        let response = app
            .oneshot(empty_request("POST", "/api/analysis/cancel"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }
}
