//! HTTP routes: a thin adapter over [`FloorOrchestrator`].

use std::any::Any;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Path, State};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{ServiceError, ServiceResult};
use crate::orchestrator::FloorOrchestrator;
use crate::views::{
    Attendance, AttendanceUpdate, DailyStats, DinerAllergies, DinerPreferences,
    SetAttendanceRequest,
};

pub type AppState = Arc<FloorOrchestrator>;

/// All routes, no middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/dining-data", get(dining_data))
        .route("/attendance", get(get_attendance).post(set_attendance))
        .route("/daily-stats", get(daily_stats))
        .route("/allergies/{diner_name}", get(allergies))
        .route("/preferences/{diner_name}", get(preferences))
        .with_state(state)
}

/// Routes plus CORS for the frontend, request tracing, and a panic
/// boundary that answers like any other internal error
pub fn build_app(state: AppState, cors_origin: &str) -> anyhow::Result<Router> {
    let origin: HeaderValue = cors_origin
        .parse()
        .with_context(|| format!("Invalid CORS origin '{cors_origin}'"))?;

    Ok(build_router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods(cors::Any)
                .allow_headers(cors::Any),
        )
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http()))
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    ServiceError::Internal(format!("Handler panicked: {message}")).into_response()
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to French Laudure API" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn dining_data(State(orchestrator): State<AppState>) -> Json<Value> {
    Json(orchestrator.dining_data().clone())
}

async fn set_attendance(
    State(orchestrator): State<AppState>,
    Json(request): Json<SetAttendanceRequest>,
) -> ServiceResult<Json<AttendanceUpdate>> {
    let assignments = orchestrator.set_attendance(request.waiter_ids).await?;
    Ok(Json(AttendanceUpdate { assignments }))
}

async fn get_attendance(State(orchestrator): State<AppState>) -> Json<Attendance> {
    Json(orchestrator.get_attendance().await)
}

async fn daily_stats(State(orchestrator): State<AppState>) -> Json<DailyStats> {
    Json(orchestrator.daily_stats().await)
}

async fn allergies(
    State(orchestrator): State<AppState>,
    Path(diner_name): Path<String>,
) -> ServiceResult<Json<DinerAllergies>> {
    Ok(Json(orchestrator.allergies(&diner_name).await?))
}

async fn preferences(
    State(orchestrator): State<AppState>,
    Path(diner_name): Path<String>,
) -> ServiceResult<Json<DinerPreferences>> {
    Ok(Json(orchestrator.preferences(&diner_name).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assignment::AssignmentEngine;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use data_loader::{Diner, DiningData, DiningIndex, Reservation};
    use enrichment::Enrichers;
    use llm_client::{DisabledGenerator, GenerationRequest, TextGenerator};
    use tower::ServiceExt;

    struct PanickingGenerator;

    #[async_trait]
    impl TextGenerator for PanickingGenerator {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn generate(&self, _request: &GenerationRequest) -> llm_client::Result<String> {
            panic!("generator blew up")
        }
    }

    fn app() -> Router {
        let index = DiningIndex::new(DiningData {
            diners: vec![Diner {
                name: "Émile Roux".to_string(),
                reservations: vec![Reservation {
                    start_time: "7:30 PM".to_string(),
                    number_of_people: 4,
                    orders: vec![],
                }],
                emails: vec![],
                reviews: vec![],
            }],
        });
        let orchestrator = FloorOrchestrator::new(index, Arc::new(DisabledGenerator), 0.2);
        build_router(Arc::new(orchestrator))
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let app = app();
        let (status, body) = call(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "healthy"}));

        let (_, body) = call(&app, get("/")).await;
        assert!(body["message"].as_str().unwrap().contains("French Laudure"));
    }

    #[tokio::test]
    async fn test_dining_data_returns_dataset() {
        let (status, body) = call(&app(), get("/dining-data")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["diners"][0]["name"], "Émile Roux");
    }

    #[tokio::test]
    async fn test_dining_data_is_served_verbatim() {
        let document = json!({
            "diners": [{
                "name": "A",
                "id": 7,
                "reservations": [{"start_time": "19:00", "number_of_people": 2, "date": "2024-05-01"}]
            }]
        });
        let index = DiningIndex::from_document(document.clone()).unwrap();
        let orchestrator = FloorOrchestrator::new(index, Arc::new(DisabledGenerator), 0.2);

        let (status, body) = call(&build_router(Arc::new(orchestrator)), get("/dining-data")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, document);
    }

    #[tokio::test]
    async fn test_panic_in_query_becomes_internal_error() {
        let index = DiningIndex::new(DiningData {
            diners: vec![Diner {
                name: "Ana".to_string(),
                reservations: vec![Reservation {
                    start_time: "19:00".to_string(),
                    number_of_people: 2,
                    orders: vec![],
                }],
                emails: vec![],
                reviews: vec![],
            }],
        });
        let orchestrator = FloorOrchestrator::from_parts(
            index,
            AssignmentEngine::new(),
            Enrichers::new(Arc::new(PanickingGenerator)),
        );
        let app = build_app(Arc::new(orchestrator), "http://localhost:3000").unwrap();

        let (status, _) = call(&app, post_json("/attendance", json!({"waiter_ids": [1]}))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(&app, get("/preferences/Ana")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"detail": "Internal server error"}));

        // The state lock was released and the service keeps answering
        let (status, body) = call(&app, get("/allergies/Nobody")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["detail"].as_str().unwrap().contains("Nobody"));
    }

    #[tokio::test]
    async fn test_attendance_round_trip() {
        let app = app();
        let (status, body) = call(&app, post_json("/attendance", json!({"waiter_ids": [3]}))).await;
        assert_eq!(status, StatusCode::OK);
        let table = &body["assignments"][0]["tables"][0];
        assert_eq!(table["start_time"], "7:30 PM");
        assert!(body["assignments"][0].get("summary").is_none());

        let (_, body) = call(&app, get("/attendance")).await;
        assert_eq!(body["present_waiters"], json!([3]));
        assert_eq!(
            body["assignments"][0]["summary"],
            "Camille Dubois has 1 table tonight serving 4 guests, from 7:30 PM to 7:30 PM."
        );

        let (_, body) = call(&app, get("/daily-stats")).await;
        assert_eq!(
            body,
            json!({"total_reservations": 1, "total_guests": 4, "special_events": 0})
        );
    }

    #[tokio::test]
    async fn test_diner_lookups() {
        let app = app();
        let (status, body) = call(&app, get("/allergies/%C3%89mile%20Roux")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["detail"].as_str().unwrap().contains("Émile Roux"));

        call(&app, post_json("/attendance", json!({"waiter_ids": [1, 2]}))).await;

        let (status, body) = call(&app, get("/allergies/%C3%89mile%20Roux")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["allergies"], "No Allergies");
        assert!(body["special_event"].is_null());

        let (status, body) = call(&app, get("/preferences/%C3%89mile%20Roux")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["preferences"], json!([]));

        let (status, _) = call(&app, get("/preferences/Nobody")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_attendance_body_is_rejected() {
        let app = app();
        let response = app
            .oneshot(post_json("/attendance", json!({"waiters": "1,2"})))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }
}
