pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::state::AppState;
use crate::{applications, chat, dse, jobs, users};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // DSE program matching
        .route("/api/v1/dse/subjects", get(dse::handlers::handle_subjects))
        .route("/api/v1/dse/programs", get(dse::handlers::handle_programs))
        .route("/api/v1/dse/match", post(dse::handlers::handle_match))
        // Users
        .route("/api/v1/users", post(users::handlers::handle_create_user))
        .route(
            "/api/v1/users/:id",
            get(users::handlers::handle_get_user).patch(users::handlers::handle_update_user),
        )
        .route(
            "/api/v1/users/:id/dse/match",
            post(dse::handlers::handle_profile_match),
        )
        .route(
            "/api/v1/users/:id/applications",
            get(applications::handlers::handle_list_applications),
        )
        .route(
            "/api/v1/users/:id/applications/:job_id",
            get(applications::handlers::handle_has_applied),
        )
        .route(
            "/api/v1/users/:id/chat/history",
            get(chat::handlers::handle_chat_history),
        )
        // Jobs
        .route("/api/v1/jobs", get(jobs::handlers::handle_list_jobs))
        .route("/api/v1/jobs/:id", get(jobs::handlers::handle_get_job))
        .route(
            "/api/v1/companies/stats",
            get(jobs::handlers::handle_company_stats),
        )
        .route(
            "/api/v1/companies/stats/:company",
            get(jobs::handlers::handle_company_stats_for),
        )
        // Applications
        .route(
            "/api/v1/applications",
            post(applications::handlers::handle_apply),
        )
        .route(
            "/api/v1/applications/:id",
            patch(applications::handlers::handle_update_status),
        )
        // Chat
        .route("/api/v1/chat", post(chat::handlers::handle_chat))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::chat::assistant::CannedAssistant;
    use crate::config::Config;
    use crate::dse::catalog::Catalog;
    use crate::jobs::JobBoard;
    use crate::store::MemoryStore;

    fn test_app(chat_query_limit: usize) -> Router {
        let state = AppState {
            store: Arc::new(MemoryStore::default()),
            catalog: Arc::new(Catalog::bundled().unwrap()),
            jobs: Arc::new(JobBoard::bundled().unwrap()),
            assistant: Arc::new(CannedAssistant),
            config: Config {
                chat_query_limit,
                ..Config::default()
            },
        };
        build_router(state)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn full_scores() -> Value {
        json!({
            "scores": {
                "English": "5", "Chinese": "5", "Mathematics": "5**", "Liberal Studies": "5",
                "Physics": "5*", "M2": "5**"
            },
            "electives": ["Physics", "M2"]
        })
    }

    async fn create_user(app: &Router, body: Value) -> String {
        let (status, user) = send(app, "POST", "/api/v1/users", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        user["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app(10);
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["jobs"], 6);
    }

    #[tokio::test]
    async fn test_subjects_lists_grades_best_first() {
        let app = test_app(10);
        let (status, body) = send(&app, "GET", "/api/v1/dse/subjects", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["grades"][0], json!({"grade": "5**", "points": 7}));
        assert_eq!(body["grades"][7], json!({"grade": "U", "points": 0}));
        assert_eq!(body["core_subjects"].as_array().unwrap().len(), 4);
        assert_eq!(body["elective_subjects"].as_array().unwrap().len(), 11);
    }

    #[tokio::test]
    async fn test_match_returns_every_program_sorted() {
        let app = test_app(10);
        let (status, body) = send(&app, "POST", "/api/v1/dse/match", Some(full_scores())).await;
        assert_eq!(status, StatusCode::OK);

        let matches = body["matches"].as_array().unwrap();
        let catalog = Catalog::bundled().unwrap();
        assert_eq!(matches.len(), catalog.program_count());

        let first_unqualified = matches
            .iter()
            .position(|m| m["qualified"] == false)
            .unwrap_or(matches.len());
        assert!(matches[first_unqualified..]
            .iter()
            .all(|m| m["qualified"] == false));
        assert_eq!(body["summary"]["total"], matches.len());
    }

    #[tokio::test]
    async fn test_match_incomplete_scores_is_validation_error() {
        let app = test_app(10);
        let body = json!({
            "scores": {"English": "5", "Chinese": "5", "Mathematics": "5", "Physics": "5", "M2": "5"},
            "electives": ["Physics", "M2"]
        });
        let (status, body) = send(&app, "POST", "/api/v1/dse/match", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("missing required subject scores"));
    }

    #[tokio::test]
    async fn test_user_lifecycle_and_profile_match() {
        let app = test_app(10);
        let id = create_user(
            &app,
            json!({"email": "hs@example.com", "user_type": "high_school", "dse_scores": full_scores()}),
        )
        .await;

        let (status, user) = send(&app, "GET", &format!("/api/v1/users/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["dse_scores"]["M2"], "5**");

        let (status, body) =
            send(&app, "POST", &format!("/api/v1/users/{id}/dse/match"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body["matches"].as_array().unwrap().is_empty());

        let (status, user) = send(
            &app,
            "PATCH",
            &format!("/api/v1/users/{id}"),
            Some(json!({"user_type": "uni_postgrad", "discipline": "Tech"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["discipline"], "Tech");
    }

    #[tokio::test]
    async fn test_profile_match_without_scores_is_400() {
        let app = test_app(10);
        let id = create_user(
            &app,
            json!({"email": "hs@example.com", "user_type": "high_school"}),
        )
        .await;
        let (status, _) = send(&app, "POST", &format!("/api/v1/users/{id}/dse/match"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_user_is_404() {
        let app = test_app(10);
        let (status, body) = send(
            &app,
            "GET",
            "/api/v1/users/00000000-0000-0000-0000-000000000000",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_jobs_follow_user_profile() {
        let app = test_app(10);
        let id = create_user(
            &app,
            json!({"email": "g@example.com", "user_type": "uni_postgrad", "discipline": "Business"}),
        )
        .await;

        let (status, jobs) = send(&app, "GET", &format!("/api/v1/jobs?user_id={id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let jobs = jobs.as_array().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0]["title"], "Business Analyst");

        let (_, jobs) = send(&app, "GET", "/api/v1/jobs?user_type=high_school&q=teacher", None).await;
        assert_eq!(jobs.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_job_detail_includes_company_stats() {
        let app = test_app(10);
        let (status, job) = send(&app, "GET", "/api/v1/jobs/3", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(job["company_stats"]["avg_response_time"], "3 days");

        let (status, _) = send(&app, "GET", "/api/v1/jobs/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_apply_twice_then_track_status() {
        let app = test_app(10);
        let id = create_user(
            &app,
            json!({"email": "hs@example.com", "user_type": "high_school"}),
        )
        .await;
        let body = json!({"user_id": id, "job_id": 1});

        let (status, first) = send(&app, "POST", "/api/v1/applications", Some(body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first["status"], "applied");

        let (status, second) = send(&app, "POST", "/api/v1/applications", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["id"], first["id"]);

        let (_, applied) = send(&app, "GET", &format!("/api/v1/users/{id}/applications/1"), None).await;
        assert_eq!(applied["applied"], true);
        let (_, applied) = send(&app, "GET", &format!("/api/v1/users/{id}/applications/2"), None).await;
        assert_eq!(applied["applied"], false);

        let app_id = first["id"].as_i64().unwrap();
        let (status, updated) = send(
            &app,
            "PATCH",
            &format!("/api/v1/applications/{app_id}"),
            Some(json!({"status": "interviewing"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "interviewing");

        let (_, listed) = send(&app, "GET", &format!("/api/v1/users/{id}/applications"), None).await;
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["job"]["id"], 1);
        assert_eq!(listed[0]["status"], "interviewing");
    }

    #[tokio::test]
    async fn test_chat_limit_and_history() {
        let app = test_app(2);
        let id = create_user(
            &app,
            json!({"email": "g@example.com", "user_type": "uni_postgrad", "discipline": "Tech"}),
        )
        .await;

        for query in ["cv help", "interview help"] {
            let (status, body) = send(
                &app,
                "POST",
                "/api/v1/chat",
                Some(json!({"user_id": id, "query": query})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["saved"], true);
            assert_eq!(body["backend"], "canned");
        }

        let (_, body) = send(
            &app,
            "POST",
            "/api/v1/chat",
            Some(json!({"user_id": id, "query": "more"})),
        )
        .await;
        assert_eq!(body["saved"], false);
        assert_eq!(body["limit_reached"], true);

        let (status, history) =
            send(&app, "GET", &format!("/api/v1/users/{id}/chat/history?limit=1"), None).await;
        assert_eq!(status, StatusCode::OK);
        let history = history.as_array().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["query"], "interview help");
    }

    #[tokio::test]
    async fn test_chat_history_limit_is_capped() {
        let app = test_app(10);
        let id = create_user(
            &app,
            json!({"email": "hs@example.com", "user_type": "high_school"}),
        )
        .await;
        send(
            &app,
            "POST",
            "/api/v1/chat",
            Some(json!({"user_id": id, "query": "dse"})),
        )
        .await;

        let (status, history) = send(
            &app,
            "GET",
            &format!("/api/v1/users/{id}/chat/history?limit=18446744073709551615"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history.as_array().unwrap().len(), 1);
    }
}
