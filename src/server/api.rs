//! JSON API and the debug endpoint

use axum::{
    body::Bytes,
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use super::SharedState;
use crate::content::{Tool, Tutorial};
use crate::helpers::iso_timestamp;
use crate::markdown::TocEntry;
use crate::pages::{SearchQuery, ToolsQuery, TutorialsQuery};

/// Body URL the debug endpoint refuses to track
const EXCLUDED_DEBUG_URL: &str = "/stats";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolResponse<'a> {
    #[serde(flatten)]
    tool: &'a Tool,
    detail_html: Option<&'a str>,
    related: Vec<&'a Tool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TutorialResponse<'a> {
    #[serde(flatten)]
    tutorial: &'a Tutorial,
    html: &'a str,
    toc: &'a [TocEntry],
    related: Vec<&'a Tutorial>,
}

pub(super) fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("{} not found", what) })),
    )
        .into_response()
}

pub(super) async fn list_tools(
    State(state): State<SharedState>,
    Query(query): Query<ToolsQuery>,
) -> Response {
    let tools = state.catalog.list_tools(&query.filter());
    Json(json!({ "total": tools.len(), "tools": tools })).into_response()
}

pub(super) async fn get_tool(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let Some(tool) = state.catalog.tool(&id) else {
        return not_found("Tool");
    };

    Json(ToolResponse {
        tool,
        detail_html: state.catalog.tool_detail(&tool.id).map(|r| r.html.as_str()),
        related: state
            .catalog
            .related_tools(tool, state.config.related.tools),
    })
    .into_response()
}

pub(super) async fn list_tutorials(
    State(state): State<SharedState>,
    Query(query): Query<TutorialsQuery>,
) -> Response {
    let tutorials = state.catalog.list_tutorials(&query.filter());
    Json(json!({ "total": tutorials.len(), "tutorials": tutorials })).into_response()
}

pub(super) async fn get_tutorial(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Response {
    let (Some(tutorial), Some(rendered)) = (
        state.catalog.tutorial_by_slug(&slug),
        state.catalog.rendered(&slug),
    ) else {
        return not_found("Tutorial");
    };

    Json(TutorialResponse {
        tutorial,
        html: &rendered.html,
        toc: &rendered.toc,
        related: state
            .catalog
            .related_tutorials(tutorial, state.config.related.tutorials),
    })
    .into_response()
}

pub(super) async fn list_categories(State(state): State<SharedState>) -> Response {
    Json(json!({ "categories": state.catalog.categories() })).into_response()
}

pub(super) async fn search(
    State(state): State<SharedState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let results = state.catalog.search(query.q.as_deref().unwrap_or_default());
    Json(results).into_response()
}

pub(super) async fn debug_get(OriginalUri(uri): OriginalUri) -> Json<Value> {
    Json(json!({
        "message": "调试路由工作正常",
        "timestamp": iso_timestamp(&Utc::now()),
        "path": uri.path(),
    }))
}

/// Echo the JSON body back, unless it targets the excluded URL
pub(super) async fn debug_post(body: Bytes) -> Response {
    let body: Value = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!("Rejected debug body: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("invalid JSON body: {}", e), "success": false })),
            )
                .into_response();
        }
    };

    if body.get("url").and_then(Value::as_str) == Some(EXCLUDED_DEBUG_URL) {
        return Json(json!({
            "excluded": true,
            "reason": "debug: 统计页面被排除",
            "success": false,
        }))
        .into_response();
    }

    Json(json!({
        "message": "调试POST正常",
        "received": body,
        "excluded": false,
        "success": true,
    }))
    .into_response()
}
