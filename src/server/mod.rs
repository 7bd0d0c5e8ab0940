//! HTTP server: pages, JSON API, sitemap and static assets

mod api;

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::Catalog;
use crate::generator::sitemap;
use crate::pages::{Pages, SearchQuery, ToolsQuery, TutorialsQuery};
use crate::Site;

/// Read-only state shared by every request
pub struct AppState {
    pub config: SiteConfig,
    pub catalog: Catalog,
    pub pages: Pages,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(site: &Site, catalog: Catalog) -> Result<Self> {
        Ok(Self {
            config: site.config.clone(),
            catalog,
            pages: Pages::new(&site.config)?,
            static_dir: site.static_dir.clone(),
        })
    }
}

pub type SharedState = Arc<AppState>;

/// Build the application router
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/tools", get(tools))
        .route("/tools/:id", get(tool))
        .route("/tutorials", get(tutorials))
        .route("/tutorials/:slug", get(tutorial))
        .route("/search", get(search))
        .route("/sitemap.xml", get(sitemap_xml))
        .route("/:slug", get(standalone_page))
        .route("/api/tools", get(api::list_tools))
        .route("/api/tools/:id", get(api::get_tool))
        .route("/api/tutorials", get(api::list_tutorials))
        .route("/api/tutorials/:slug", get(api::get_tutorial))
        .route("/api/categories", get(api::list_categories))
        .route("/api/search", get(api::search))
        .route("/api/debug", get(api::debug_get).post(api::debug_post))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(site: &Site, catalog: Catalog, ip: &str, port: u16, open: bool) -> Result<()> {
    let state = Arc::new(AppState::new(site, catalog)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Turn a page render result into a response
fn html_page(result: Result<String>) -> Response {
    match result {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render page: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

fn not_found_page(state: &AppState, path: &str) -> Response {
    match state.pages.not_found(&state.catalog, path) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render 404 page: {:#}", e);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}

async fn home(State(state): State<SharedState>) -> Response {
    html_page(state.pages.home(&state.catalog))
}

async fn tools(State(state): State<SharedState>, Query(query): Query<ToolsQuery>) -> Response {
    html_page(state.pages.tools(&state.catalog, &query))
}

async fn tool(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    match state.catalog.tool(&id) {
        Some(tool) => html_page(state.pages.tool(&state.catalog, tool)),
        None => not_found_page(&state, &format!("/tools/{}", id)),
    }
}

async fn tutorials(
    State(state): State<SharedState>,
    Query(query): Query<TutorialsQuery>,
) -> Response {
    html_page(state.pages.tutorials(&state.catalog, &query))
}

async fn tutorial(State(state): State<SharedState>, Path(slug): Path<String>) -> Response {
    match state.catalog.tutorial_by_slug(&slug) {
        Some(tutorial) => html_page(state.pages.tutorial(&state.catalog, tutorial)),
        None => not_found_page(&state, &format!("/tutorials/{}", slug)),
    }
}

async fn search(State(state): State<SharedState>, Query(query): Query<SearchQuery>) -> Response {
    html_page(
        state
            .pages
            .search(&state.catalog, query.q.as_deref().unwrap_or_default()),
    )
}

async fn sitemap_xml(State(state): State<SharedState>) -> Response {
    let xml = sitemap::render(&state.config, &state.catalog, Utc::now());
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        xml,
    )
        .into_response()
}

/// A content page, or whatever the fallback finds at that path
///
/// One-segment paths such as `/robots.txt` also land here, so a miss is
/// handed on to the static files.
async fn standalone_page(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    request: Request<Body>,
) -> Response {
    match state.catalog.page(&slug) {
        Some(page) => html_page(state.pages.page(&state.catalog, page)),
        None => static_or_not_found(&state, request).await,
    }
}

/// Serve a static asset, or the 404 page
async fn fallback_handler(State(state): State<SharedState>, request: Request<Body>) -> Response {
    if request.uri().path().starts_with("/api/") {
        return api::not_found("Endpoint");
    }
    static_or_not_found(&state, request).await
}

async fn static_or_not_found(state: &AppState, request: Request<Body>) -> Response {
    let path = request.uri().path().to_string();
    let mut service = ServeDir::new(&state.static_dir);
    match service.try_call(request).await {
        Ok(response) if response.status() != StatusCode::NOT_FOUND => response.into_response(),
        Ok(_) => not_found_page(state, &path),
        Err(e) => {
            tracing::error!("Failed to serve {}: {}", path, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
