//! HTML pages returned by the handlers.

use drought_map_render::escape_html;

use crate::{cache::CachedRender, pipeline::PipelineReport};

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
const STATUS_TEMPLATE: &str = include_str!("../templates/status.html");

/// Landing page shown after a successful pipeline run.
#[must_use]
pub fn landing(title: &str, report: &PipelineReport) -> String {
    let mut parts = vec![
        format!("Week of {}", report.window),
        format!("{} counties mapped", report.rendered()),
    ];
    if !report.skipped.is_empty() {
        parts.push(format!("{} skipped (bad data)", report.skipped.len()));
    }
    if !report.unresolved.is_empty() {
        parts.push(format!("{} not geocoded", report.unresolved.len()));
    }
    let severities = report
        .severity_counts
        .iter()
        .rev()
        .filter(|(_, count)| *count > 0)
        .map(|(severity, count)| format!("{severity}: {count}"))
        .collect::<Vec<_>>();
    if !severities.is_empty() {
        parts.push(severities.join(", "));
    }

    let summary = parts
        .iter()
        .map(|part| format!("<span>{}</span>", escape_html(part)))
        .collect::<String>();

    INDEX_TEMPLATE
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{SUMMARY}}", &summary)
}

/// Page returned when the statistics service is unavailable.
///
/// Names the last good render, if any, so an older map is never mistaken
/// for current data.
#[must_use]
pub fn degraded(title: &str, error: &str, previous: Option<&CachedRender>) -> String {
    let detail = previous.map_or_else(
        || "No map has been rendered yet.".to_string(),
        |render| {
            format!(
                "The last available map shows the week of {} and was rendered {}. It is out of date.",
                render.window,
                render.artifact.rendered_at.format("%Y-%m-%d %H:%M UTC")
            )
        },
    );
    status(
        title,
        "Drought data is temporarily unavailable",
        &format!("The map was not updated: {error}"),
        &detail,
    )
}

/// Page returned when `/map` is requested before any render.
#[must_use]
pub fn not_ready(title: &str) -> String {
    status(
        title,
        "Map not ready",
        "No drought map has been rendered yet.",
        "Load the home page to fetch the latest data and render the map.",
    )
}

/// Page returned when rendering fails after data was fetched.
#[must_use]
pub fn render_failed(title: &str, error: &str) -> String {
    status(title, "Map rendering failed", error, "")
}

fn status(title: &str, heading: &str, message: &str, detail: &str) -> String {
    STATUS_TEMPLATE
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{HEADING}}", &escape_html(heading))
        .replace("{{MESSAGE}}", &escape_html(message))
        .replace("{{DETAIL}}", &escape_html(detail))
}
