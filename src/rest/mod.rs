// rest/mod.rs — HTTP API + static/SPA server.
//
// Axum router over the task store:
//   GET    /api/tasks
//   POST   /api/tasks
//   PUT    /api/tasks/{id}
//   DELETE /api/tasks/{id}
//   GET    /api/health
//   GET    /*           (static assets, falling back to the SPA entry page)
//
// The SPA fallback is registered as the router fallback, so API paths are
// never shadowed by it.

pub mod routes;

use anyhow::Result;
use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};
use tracing::{debug, info};

use crate::AppContext;

/// Largest request body the logging middleware will buffer. Anything bigger
/// is refused outright; task payloads are tiny.
const BODY_LOG_LIMIT: usize = 64 * 1024;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", ctx.config.port).parse()?;
    let router = build_router(ctx);

    info!("taskd listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    let spa = ServeDir::new(&ctx.config.assets_dir)
        .fallback(ServeFile::new(ctx.config.assets_dir.join("index.html")));

    Router::new()
        .route(
            "/api/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/api/tasks/{id}",
            axum::routing::put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route("/api/health", get(routes::health::health))
        .fallback_service(spa)
        .layer(middleware::from_fn(log_request))
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

/// Log every request/response pair: method, path, body, resulting status.
///
/// The body is buffered (bounded) so it can be logged and handed back to the
/// handler unchanged.
async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let (parts, body) = req.into_parts();
    let bytes = match axum::body::to_bytes(body, BODY_LOG_LIMIT).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return Response::builder()
                .status(StatusCode::PAYLOAD_TOO_LARGE)
                .body(Body::empty())
                .unwrap_or_default();
        }
    };
    if !bytes.is_empty() {
        debug!(%method, %path, body = %String::from_utf8_lossy(&bytes), "request body");
    }
    let req = Request::from_parts(parts, Body::from(bytes));

    let response = next.run(req).await;
    info!(%method, %path, status = response.status().as_u16(), "request");
    response
}
