use anyhow::{Context, Result};
use folio_core::submission::{ContactEndpoint, FAILED_MESSAGE};
use folio_core::{Acknowledgment, NewContactMessage};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

// ============================================================================
// WEB CONTEXT — shared state for HTTP endpoints
// ============================================================================

/// Everything the routes need, built once per process.
pub struct WebContext {
    pub endpoint: ContactEndpoint,
    pub public_dir: PathBuf,
    pub max_body_bytes: u64,
}

// ============================================================================
// ROUTES
// ============================================================================

/// The full route tree: contact API, static assets, then the SPA fallback.
pub fn routes(
    ctx: Arc<WebContext>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let index_file = ctx.public_dir.join("index.html");
    let public_dir = ctx.public_dir.clone();

    // 1. Contact form submissions
    let contact_route = contact_route(ctx);

    // 2. Built assets
    let static_route = warp::get().and(warp::fs::dir(public_dir));

    // 3. Anything else the client router owns
    let spa_route = warp::get().and(warp::fs::file(index_file));

    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST"])
        .allow_header("content-type");

    contact_route
        .or(static_route)
        .or(spa_route)
        .with(cors)
        .recover(handle_rejection)
}

/// `POST /api/contact` on its own, without static file serving.
pub fn contact_route(
    ctx: Arc<WebContext>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let max_body_bytes = ctx.max_body_bytes;
    let ctx_filter = warp::any().map(move || ctx.clone());

    warp::path!("api" / "contact")
        .and(warp::post())
        .and(warp::body::content_length_limit(max_body_bytes))
        .and(contact_payload())
        .and(ctx_filter)
        .and_then(handle_contact)
}

/// JSON from the SPA, or urlencoded from a plain HTML form post.
fn contact_payload() -> impl Filter<Extract = (NewContactMessage,), Error = Rejection> + Clone {
    warp::body::json::<NewContactMessage>()
        .or(warp::body::form::<NewContactMessage>())
        .unify()
}

/// Bind `addr` and serve until ctrl-c. Bind failures are returned, not panicked.
pub async fn serve(addr: SocketAddr, ctx: Arc<WebContext>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("HTTP server listening on {}", addr);

    warp::serve(routes(ctx))
        .incoming(listener)
        .graceful(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
            }
        })
        .run()
        .await;

    Ok(())
}

// ============================================================================
// HANDLERS
// ============================================================================

async fn handle_contact(
    payload: NewContactMessage,
    ctx: Arc<WebContext>,
) -> Result<impl Reply, Rejection> {
    let ack = ctx.endpoint.submit(payload);
    let status = if ack.is_success() {
        StatusCode::CREATED
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    Ok(warp::reply::with_status(warp::reply::json(&ack), status))
}

async fn handle_rejection(err: Rejection) -> Result<warp::reply::Response, Infallible> {
    // Only GET is routed outside the API, so a wrong method is just an unknown route
    if err.is_not_found() || err.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(warp::reply::with_status("Not found", StatusCode::NOT_FOUND).into_response());
    }

    if let Some(e) = err.find::<warp::filters::cors::CorsForbidden>() {
        tracing::debug!(error = %e, "Refused cross-origin request");
        return Ok(warp::reply::with_status("Forbidden", StatusCode::FORBIDDEN).into_response());
    }

    let (status, ack) = if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        tracing::debug!(error = %e, "Rejected malformed contact submission");
        (StatusCode::BAD_REQUEST, Acknowledgment::invalid())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            Acknowledgment::rejected("Message is too large."),
        )
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, Acknowledgment::invalid())
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, Acknowledgment::invalid())
    } else {
        tracing::error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Acknowledgment::rejected(FAILED_MESSAGE),
        )
    };

    Ok(warp::reply::with_status(warp::reply::json(&ack), status).into_response())
}
