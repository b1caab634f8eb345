use anyhow::Result;
use axum::{
    extract::State,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    telemetry,
    tools::{
        self,
        ads::{AdsOptimizer, AdsPredictor},
        chat::{BrainChat, Chat, WidgetChat},
        content::{ContentAnalyzer, ContentGenerator, FunnelMap, SlideGenerator, VideoScript},
        hooks::{scroll_stop, HookOptimizer, ScrollStopRequest, ScrollStopResponse},
        seo::SeoAudit,
        Tool, ToolContext,
    },
};

pub const SERVICE_NAME: &str = "AI.D Core API";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

const WIDGET_HTML: &str = include_str!("../assets/widget.html");

/**
 * \brief Build the application router without binding a socket.
 */
pub fn router(ctx: ToolContext) -> Router {
    // Any origin: the API is embedded into third-party sites and apps.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/widget", get(widget))
        .route("/chat", post(tool_route::<Chat>))
        .route("/api/aid-chat", post(tool_route::<WidgetChat>))
        .route("/api/chat/aid", post(tool_route::<BrainChat>))
        .route("/api/ads/optimizer", post(tool_route::<AdsOptimizer>))
        .route("/api/ads/predictor", post(tool_route::<AdsPredictor>))
        .route("/api/content/analyzer", post(tool_route::<ContentAnalyzer>))
        .route("/api/content/generator", post(tool_route::<ContentGenerator>))
        .route("/api/content/scroll-stop", post(scroll_stop_route))
        .route("/api/content/hook-optimizer", post(tool_route::<HookOptimizer>))
        .route("/api/content/slide-generator", post(tool_route::<SlideGenerator>))
        .route("/api/content/funnel-map", post(tool_route::<FunnelMap>))
        .route("/api/content/video-script", post(tool_route::<VideoScript>))
        .route("/api/seo/audit", post(tool_route::<SeoAudit>))
        .layer(cors)
        .with_state(ctx)
}

/**
 * \brief Start the HTTP service.
 * \param addr listen address, e.g. "0.0.0.0:8000"
 */
pub async fn run(addr: &str, ctx: ToolContext) -> Result<()> {
    let backend = ctx.config.backend;
    let configured = ctx.config.is_configured();
    let app = router(ctx);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    telemetry::log_event(
        "server",
        &format!(
            "listening on http://{} backend={} llm_configured={}",
            addr, backend, configured
        ),
    );
    if !configured {
        telemetry::log_warn(
            "server",
            "no model backend configured; every tool answers with its degraded response",
        );
    }
    axum::serve(listener, app).await?;
    Ok(())
}

/**
 * \brief Shared handler for every model-backed tool. Always answers 200.
 */
async fn tool_route<T>(
    State(ctx): State<ToolContext>,
    Json(req): Json<T::Request>,
) -> Json<T::Response>
where
    T: Tool + 'static,
    T::Request: DeserializeOwned + 'static,
    T::Response: Serialize + 'static,
{
    Json(tools::run::<T>(&ctx, &req).await)
}

async fn scroll_stop_route(Json(req): Json<ScrollStopRequest>) -> Json<ScrollStopResponse> {
    Json(scroll_stop(&req))
}

/**
 * \brief Health/status: name, version, modes and which backend answers.
 */
async fn health(State(ctx): State<ToolContext>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "name": SERVICE_NAME,
        "version": SERVICE_VERSION,
        "modes": ["adai", "external"],
        "default_lang": ctx.config.default_language,
        "llm_configured": ctx.config.is_configured(),
        "llm_backend": ctx.config.backend.to_string(),
    }))
}

async fn widget() -> Html<&'static str> {
    Html(WIDGET_HTML)
}
