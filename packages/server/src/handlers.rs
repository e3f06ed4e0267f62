//! HTTP handler functions for the drought map.

use actix_web::{
    HttpResponse, HttpResponseBuilder,
    http::header::{self, ContentType},
    web,
};
use drought_map_render::write_artifact;

use crate::{
    AppState,
    cache::CachedRender,
    pages,
    pipeline::{self, PipelineError},
};

/// `GET /`
///
/// Runs the full pipeline, publishes the new map, and returns the landing
/// page. If the statistics service fails the current map is left in place
/// and a degraded page is returned instead.
pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    let title = state.region.title();
    let now = (state.clock)();

    let result = pipeline::run(
        state.statistics.as_ref(),
        state.geocoder.as_ref(),
        &state.region,
        now,
    )
    .await;

    match result {
        Ok(report) => {
            let page = pages::landing(&title, &report);

            if let Some(path) = &state.output_path {
                if let Err(e) = write_artifact(path, &report.artifact) {
                    log::error!("Failed to write map to {}: {e}", path.display());
                }
            }

            state.cache.publish(CachedRender {
                artifact: report.artifact,
                window: report.window,
            });

            html(HttpResponse::Ok(), page)
        }
        Err(PipelineError::Statistics(e)) => {
            log::error!("Drought statistics unavailable: {e}");
            let previous = state.cache.latest();
            html(
                HttpResponse::BadGateway(),
                pages::degraded(&title, &e.to_string(), previous.as_deref()),
            )
        }
        Err(e @ PipelineError::Render(_)) => {
            log::error!("{e}");
            html(
                HttpResponse::InternalServerError(),
                pages::render_failed(&title, &e.to_string()),
            )
        }
    }
}

/// `GET /map`
///
/// Returns the most recently rendered map, or `503` if none exists yet.
pub async fn map(state: web::Data<AppState>) -> HttpResponse {
    match state.cache.latest() {
        Some(render) => html(HttpResponse::Ok(), render.artifact.html.clone()),
        None => html(
            HttpResponse::ServiceUnavailable(),
            pages::not_ready(&state.region.title()),
        ),
    }
}

fn html(mut builder: HttpResponseBuilder, body: String) -> HttpResponse {
    builder
        .content_type(ContentType::html())
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .body(body)
}
