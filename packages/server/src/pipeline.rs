//! The fetch → classify → geocode → render pipeline.
//!
//! Runs once per root request, sequentially, with no state carried between
//! runs. "Now" and the region are passed in so a run is reproducible.

use chrono::{DateTime, Local, Utc};
use drought_map_drought_models::DroughtSeverity;
use drought_map_geocoder::GeoLookup;
use drought_map_render::{MapArtifact, MapCaption, MapMarker, RenderError, render};
use drought_map_source::{DateWindow, DroughtStatistics, SkippedRecord, SourceError};

use crate::config::RegionConfig;

/// Errors that abort a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The statistics service could not be reached or answered badly.
    #[error("Drought statistics unavailable: {0}")]
    Statistics(#[from] SourceError),

    /// The map could not be rendered.
    #[error("Map rendering failed: {0}")]
    Render(#[from] RenderError),
}

/// Outcome of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Week the statistics cover.
    pub window: DateWindow,
    /// Counties returned by the statistics service, including skipped ones.
    pub fetched: usize,
    /// Entries dropped because they could not be parsed.
    pub skipped: Vec<SkippedRecord>,
    /// Counties dropped because they could not be geocoded.
    pub unresolved: Vec<String>,
    /// Counties classified at each severity, least severe first.
    pub severity_counts: Vec<(DroughtSeverity, usize)>,
    /// The rendered map.
    pub artifact: MapArtifact,
}

impl PipelineReport {
    /// Number of markers on the map.
    #[must_use]
    pub fn rendered(&self) -> usize {
        self.artifact.markers.len()
    }
}

/// Runs the pipeline for `region` as of `now`.
///
/// A county that fails to parse or geocode is dropped and reported; only a
/// statistics or render failure aborts the run.
///
/// # Errors
///
/// Returns [`PipelineError`] if the statistics fetch or rendering fails.
pub async fn run(
    statistics: &dyn DroughtStatistics,
    geocoder: &dyn GeoLookup,
    region: &RegionConfig,
    now: DateTime<Local>,
) -> Result<PipelineReport, PipelineError> {
    let window = DateWindow::prior_week(now.date_naive());
    log::info!("Fetching drought statistics for {} ({window})", region.code);

    let batch = statistics.fetch(&region.code, &window).await?;
    let fetched = batch.records.len() + batch.skipped.len();

    let mut markers = Vec::with_capacity(batch.records.len());
    let mut unresolved = Vec::new();
    let mut severity_counts: Vec<(DroughtSeverity, usize)> = DroughtSeverity::all()
        .iter()
        .map(|severity| (*severity, 0))
        .collect();

    for record in &batch.records {
        let severity = record.severity();
        log::debug!("{}: {severity}", record.name);
        if let Some((_, count)) = severity_counts.iter_mut().find(|(s, _)| *s == severity) {
            *count += 1;
        }

        let point = geocoder.lookup(&record.name, &region.code).await;
        if point.is_none() {
            unresolved.push(record.name.clone());
        }
        markers.push(MapMarker::new(&record.name, severity, point));
    }

    let caption = MapCaption {
        title: region.title(),
        detail: format!("U.S. Drought Monitor, week of {window}"),
    };
    let artifact = render(region.view(), &markers, &caption, now.with_timezone(&Utc))?;

    log::info!(
        "Rendered {} of {fetched} counties ({} skipped, {} not geocoded)",
        artifact.markers.len(),
        batch.skipped.len(),
        unresolved.len()
    );

    Ok(PipelineReport {
        window,
        fetched,
        skipped: batch.skipped,
        unresolved,
        severity_counts,
        artifact,
    })
}
