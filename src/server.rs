use std::sync::Arc;

use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::catalog::{Catalog, RoleOrder};
use crate::chat::error::ChatError;
use crate::chat::{now_timestamp, ChatRequest, ChatResponder};
use crate::engine::{self, UniformJitter};
use crate::models::{
    CareerRole, Course, PredictionResult, RoleCategory, RoleFit, StudentProfile,
};

pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub responder: ChatResponder,
}

type SharedState = Arc<AppState>;

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.user_message(),
            "timestamp": now_timestamp(),
            "success": false,
        });
        (self.status(), Json(body)).into_response()
    }
}

fn not_found(message: String) -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": message })))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/career-chat", post(career_chat))
        .route("/api/predict", post(predict))
        .route("/api/roles", get(list_roles))
        .route("/api/roles/:id", get(get_role).post(fit_role))
        .route("/api/courses", get(list_courses))
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
}

pub async fn run(state: AppState, bind: &str) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    info!("listening on http://{}", bind);

    axum::serve(listener, app).await.context("server stopped")?;
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Health {
    status: &'static str,
    roles: usize,
    course_groups: usize,
}

async fn health(State(state): State<SharedState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        roles: state.catalog.all_roles().len(),
        course_groups: state.catalog.course_group_count(),
    })
}

async fn career_chat(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let span = info_span!("career_chat", request_id = %Uuid::new_v4());

    async move {
        if let Err(err) = state.responder.require_credential() {
            error!(error = %err, "chat request rejected");
            return err.into_response();
        }

        let request = match payload {
            Ok(Json(request)) => request,
            Err(rejection) => {
                error!(error = %rejection.body_text(), "rejected chat payload");
                return ChatError::BadRequest {
                    status: rejection.status(),
                    message: rejection.body_text(),
                }
                .into_response();
            }
        };

        match state.responder.respond(&request).await {
            Ok(reply) => Json(reply).into_response(),
            Err(err) => {
                error!(error = %err, "chat request failed");
                err.into_response()
            }
        }
    }
    .instrument(span)
    .await
}

async fn predict(Json(profile): Json<StudentProfile>) -> Json<PredictionResult> {
    let result = engine::predict(&profile, &mut UniformJitter::thread());
    info!(
        probability = result.placement_probability,
        salary = result.expected_salary,
        "prediction served"
    );
    Json(result)
}

#[derive(Debug, Deserialize, Default, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum SortKey {
    #[default]
    Catalog,
    Demand,
    Growth,
}

#[derive(Debug, Deserialize)]
struct RoleQuery {
    #[serde(default)]
    sort: SortKey,
    category: Option<RoleCategory>,
}

async fn list_roles(
    State(state): State<SharedState>,
    Query(query): Query<RoleQuery>,
) -> Json<Vec<CareerRole>> {
    let order = match query.sort {
        SortKey::Catalog => RoleOrder::Catalog,
        SortKey::Demand => RoleOrder::Demand,
        SortKey::Growth => RoleOrder::Growth,
    };
    let roles = state
        .catalog
        .list_roles(order, query.category)
        .into_iter()
        .cloned()
        .collect();
    Json(roles)
}

async fn get_role(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<CareerRole>, (StatusCode, Json<serde_json::Value>)> {
    state
        .catalog
        .role(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(format!("Role '{id}' not found")))
}

async fn fit_role(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(profile): Json<StudentProfile>,
) -> Result<Json<RoleFit>, (StatusCode, Json<serde_json::Value>)> {
    let role = state
        .catalog
        .role(&id)
        .ok_or_else(|| not_found(format!("Role '{id}' not found")))?;
    Ok(Json(engine::role_fit(&profile, role)))
}

#[derive(Debug, Deserialize)]
struct CourseQuery {
    recommendation: Option<String>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum CourseListing {
    Matched(Vec<Course>),
    ByCategory(serde_json::Map<String, serde_json::Value>),
}

async fn list_courses(
    State(state): State<SharedState>,
    Query(query): Query<CourseQuery>,
) -> Json<CourseListing> {
    if let Some(label) = query.recommendation {
        return Json(CourseListing::Matched(
            state.catalog.courses_for_recommendation(&label).to_vec(),
        ));
    }

    let grouped = state
        .catalog
        .courses_by_category()
        .into_iter()
        .map(|(category, courses)| (category, json!(courses)))
        .collect();
    Json(CourseListing::ByCategory(grouped))
}
