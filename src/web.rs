use crate::output;
use crate::planner::{self, Services};
use crate::trip::{TripForm, TripRequest};
use anyhow::{Context, Result};
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::Html,
    routing::get,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub fn router(services: Arc<Services>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/plan", get(index).post(plan))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(services)
}

pub async fn run(services: Services, host: &str, port: u16) -> Result<()> {
    let app = router(Arc::new(services));

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!("Travel planner running at http://{addr}");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

async fn index() -> Result<Html<String>, StatusCode> {
    page(output::render_form_page(&TripForm::default(), None))
}

async fn health() -> &'static str {
    "ok"
}

/// Generation errors come back as the form page with the message shown,
/// so the visitor can fix the input and resubmit.
async fn plan(
    State(services): State<Arc<Services>>,
    Form(form): Form<TripForm>,
) -> Result<Html<String>, StatusCode> {
    let request = match TripRequest::try_from(&form) {
        Ok(request) => request,
        Err(e) => return failure_page(&form, &e),
    };

    match planner::generate_trip_plan(&services, &request).await {
        Ok(plan) => page(output::render_trip_page(&plan)),
        Err(e) => {
            error!(destination = %request.destination, "trip generation failed: {e}");
            failure_page(&form, &e)
        }
    }
}

fn failure_page(form: &TripForm, e: &crate::error::Error) -> Result<Html<String>, StatusCode> {
    let message = format!("Something went wrong: {e}");
    page(output::render_form_page(form, Some(&message)))
}

fn page(rendered: crate::error::Result<String>) -> Result<Html<String>, StatusCode> {
    rendered.map(Html).map_err(|e| {
        error!("render failed: {e}");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}
