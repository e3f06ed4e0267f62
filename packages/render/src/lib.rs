#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Drought map rendering.
//!
//! Turns classified, geocoded counties into a single self-contained HTML
//! document: a `Leaflet` base map at a fixed center and zoom, one colored
//! circle marker per resolved county with a text popup, a severity legend,
//! and a caption naming the data week and render time.
//!
//! Counties without coordinates are left out of the document entirely.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use drought_map_drought_models::{DroughtSeverity, MarkerColor};
use drought_map_geocoder::GeoPoint;
use serde::Serialize;

const MAP_TEMPLATE: &str = include_str!("../templates/map.html");

/// Errors from rendering or persisting a map.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Marker data could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error writing the artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The initial view of the base map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    /// Map center.
    pub center: GeoPoint,
    /// Initial zoom level.
    pub zoom: u8,
}

/// One county to draw, before coordinates are known to be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    /// Where to draw the marker, if the county was geocoded.
    pub point: Option<GeoPoint>,
    /// Popup text.
    pub label: String,
    /// Severity shown by this marker.
    pub severity: DroughtSeverity,
}

impl MapMarker {
    /// Builds the marker for `county` at `severity`.
    #[must_use]
    pub fn new(county: &str, severity: DroughtSeverity, point: Option<GeoPoint>) -> Self {
        Self {
            point,
            label: format!("{county}: Drought Severity {severity}"),
            severity,
        }
    }

    /// Marker fill color.
    #[must_use]
    pub const fn color(&self) -> MarkerColor {
        self.severity.color()
    }
}

/// A marker as it appears in a rendered artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
    pub color: MarkerColor,
}

/// Text placed in the map caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapCaption {
    /// Document title and caption heading.
    pub title: String,
    /// Free-form detail line, e.g. the data week.
    pub detail: String,
}

/// A fully rendered map document.
#[derive(Debug, Clone)]
pub struct MapArtifact {
    /// The HTML document.
    pub html: String,
    /// Markers embedded in the document, in input order.
    pub markers: Vec<RenderedMarker>,
    /// The view the document opens at.
    pub view: MapView,
    /// When the document was rendered.
    pub rendered_at: DateTime<Utc>,
}

/// Renders `markers` on a base map at `view`.
///
/// Markers without a resolved point are skipped.
///
/// # Errors
///
/// Returns [`RenderError::Json`] if marker data cannot be serialized.
pub fn render(
    view: MapView,
    markers: &[MapMarker],
    caption: &MapCaption,
    rendered_at: DateTime<Utc>,
) -> Result<MapArtifact, RenderError> {
    let rendered: Vec<RenderedMarker> = markers
        .iter()
        .filter_map(|marker| {
            let point = marker.point?;
            Some(RenderedMarker {
                latitude: point.latitude,
                longitude: point.longitude,
                label: marker.label.clone(),
                color: marker.color(),
            })
        })
        .collect();

    log::debug!("Rendering {} of {} markers", rendered.len(), markers.len());

    let center = serde_json::to_string(&[view.center.latitude, view.center.longitude])?;
    let caption_html = format!(
        "<strong>{}</strong><br>{}<br>Rendered {}",
        escape_html(&caption.title),
        escape_html(&caption.detail),
        rendered_at.format("%Y-%m-%d %H:%M UTC")
    );

    let html = MAP_TEMPLATE
        .replace("{{TITLE}}", &escape_html(&caption.title))
        .replace("{{CENTER}}", &center)
        .replace("{{ZOOM}}", &view.zoom.to_string())
        .replace("{{LEGEND}}", &legend_html())
        .replace("{{CAPTION}}", &caption_html)
        .replace("{{MARKERS}}", &script_json(&rendered)?);

    Ok(MapArtifact {
        html,
        markers: rendered,
        view,
        rendered_at,
    })
}

/// Writes the artifact to `path`, replacing any previous file.
///
/// Each call writes its own temp file next to `path` and renames it into
/// place. Readers only see complete documents and the last rename wins.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the file cannot be written.
pub fn write_artifact(path: &Path, artifact: &MapArtifact) -> Result<(), RenderError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let tmp_path = temp_path_for(path);
    let result = std::fs::write(&tmp_path, &artifact.html)
        .and_then(|()| std::fs::rename(&tmp_path, path));
    if let Err(e) = result {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    log::info!("Saved map to {}", path.display());
    Ok(())
}

/// A temp file name in the same directory as `path`, unique per write.
fn temp_path_for(path: &Path) -> PathBuf {
    static NEXT: AtomicU64 = AtomicU64::new(0);

    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    let name = path
        .file_name()
        .map_or_else(|| "map".into(), |name| name.to_string_lossy());
    path.with_file_name(format!(".{name}.{}.{n}.tmp", std::process::id()))
}

/// Serializes `value` for embedding inside a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> Result<String, RenderError> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

/// Legend rows, most severe first.
fn legend_html() -> String {
    DroughtSeverity::all()
        .iter()
        .rev()
        .map(|severity| {
            format!(
                "<i style=\"background:{}\"></i>{} &ndash; {}",
                severity.color(),
                severity,
                severity.description()
            )
        })
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Escapes text for HTML and for a single-quoted JavaScript string.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\\' => out.push_str("&#92;"),
            '\n' | '\r' => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    const IOWA: MapView = MapView {
        center: GeoPoint::new(42.032_974, -93.581_543),
        zoom: 7,
    };

    fn caption() -> MapCaption {
        MapCaption {
            title: "Iowa Drought Map".to_string(),
            detail: "Week of 2024-06-03 to 2024-06-09".to_string(),
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 12, hour, 0, 0).unwrap()
    }

    #[test]
    fn renders_single_polk_marker() {
        let markers = [MapMarker::new(
            "Polk",
            DroughtSeverity::D1,
            Some(GeoPoint::new(41.6, -93.6)),
        )];
        let artifact = render(IOWA, &markers, &caption(), at(12)).unwrap();

        assert_eq!(
            artifact.markers,
            vec![RenderedMarker {
                latitude: 41.6,
                longitude: -93.6,
                label: "Polk: Drought Severity D1".to_string(),
                color: MarkerColor::Yellow,
            }]
        );
        assert!(
            artifact
                .html
                .contains("\"label\":\"Polk: Drought Severity D1\"")
        );
        assert!(artifact.html.contains("\"color\":\"yellow\""));
    }

    #[test]
    fn skips_unresolved_markers() {
        let markers = [
            MapMarker::new(
                "Polk",
                DroughtSeverity::D1,
                Some(GeoPoint::new(41.6, -93.6)),
            ),
            MapMarker::new("Nowhere", DroughtSeverity::D4, None),
            MapMarker::new(
                "Linn",
                DroughtSeverity::D2,
                Some(GeoPoint::new(42.0, -91.6)),
            ),
        ];
        let artifact = render(IOWA, &markers, &caption(), at(12)).unwrap();

        let labels: Vec<&str> = artifact.markers.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(
            labels,
            ["Polk: Drought Severity D1", "Linn: Drought Severity D2"]
        );
        assert!(!artifact.html.contains("Nowhere"));
    }

    #[test]
    fn empty_input_still_renders_base_map() {
        let artifact = render(IOWA, &[], &caption(), at(12)).unwrap();
        assert!(artifact.markers.is_empty());
        assert!(
            artifact
                .html
                .contains("const center = [42.032974,-93.581543];")
        );
        assert!(artifact.html.contains("const zoom = 7;"));
        assert!(artifact.html.contains("const markers = [];"));
    }

    #[test]
    fn rerendering_yields_same_marker_set() {
        let markers = [
            MapMarker::new(
                "Polk",
                DroughtSeverity::D1,
                Some(GeoPoint::new(41.6, -93.6)),
            ),
            MapMarker::new(
                "Story",
                DroughtSeverity::None,
                Some(GeoPoint::new(42.0, -93.4)),
            ),
        ];
        let first = render(IOWA, &markers, &caption(), at(12)).unwrap();
        let second = render(IOWA, &markers, &caption(), at(13)).unwrap();
        assert_eq!(first.markers, second.markers);
        assert_ne!(first.html, second.html);
    }

    #[test]
    fn labels_cannot_break_out_of_script() {
        let markers = [MapMarker::new(
            "</script><b>x",
            DroughtSeverity::D0,
            Some(GeoPoint::new(1.0, 2.0)),
        )];
        let artifact = render(IOWA, &markers, &caption(), at(12)).unwrap();
        assert_eq!(artifact.html.matches("</script>").count(), 2);
    }

    #[test]
    fn caption_and_legend_present() {
        let artifact = render(IOWA, &[], &caption(), at(12)).unwrap();
        assert!(artifact.html.contains("<title>Iowa Drought Map</title>"));
        assert!(artifact.html.contains("Week of 2024-06-03 to 2024-06-09"));
        assert!(artifact.html.contains("Rendered 2024-06-12 12:00 UTC"));
        for severity in DroughtSeverity::all() {
            assert!(artifact.html.contains(severity.description()));
        }
        assert!(artifact.html.contains("background:darkred"));
    }

    #[test]
    fn escapes_html_and_quotes() {
        assert_eq!(escape_html("a<b & 'c'"), "a&lt;b &amp; &#39;c&#39;");
    }

    fn scratch_dir(test: &str) -> PathBuf {
        let name = format!("drought_map_render_{test}_{}", std::process::id());
        std::env::temp_dir().join(name)
    }

    fn leftover_temp_files(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter(|entry| {
                entry
                    .as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .ends_with(".tmp")
            })
            .count()
    }

    #[test]
    fn write_artifact_replaces_previous_file() {
        let dir = scratch_dir("replace");
        let path = dir.join("nested").join("map.html");

        let first = render(IOWA, &[], &caption(), at(12)).unwrap();
        write_artifact(&path, &first).unwrap();
        let second = render(IOWA, &[], &caption(), at(13)).unwrap();
        write_artifact(&path, &second).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), second.html);
        assert_eq!(leftover_temp_files(path.parent().unwrap()), 0);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn concurrent_writers_each_land_a_complete_map() {
        let dir = scratch_dir("concurrent");
        let path = dir.join("map.html");

        let many = |severity| {
            (0..2_000)
                .map(|i| {
                    MapMarker::new(
                        &format!("County {i}"),
                        severity,
                        Some(GeoPoint::new(41.0, -93.0)),
                    )
                })
                .collect::<Vec<_>>()
        };
        let a = render(IOWA, &many(DroughtSeverity::D1), &caption(), at(12)).unwrap();
        let b = render(IOWA, &many(DroughtSeverity::D4), &caption(), at(13)).unwrap();

        std::thread::scope(|scope| {
            let writers = [&a, &b].map(|artifact| {
                let path = &path;
                scope.spawn(move || {
                    for _ in 0..50 {
                        write_artifact(path, artifact).unwrap();
                    }
                })
            });
            for writer in writers {
                writer.join().unwrap();
            }
        });

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(on_disk == a.html || on_disk == b.html);
        assert_eq!(leftover_temp_files(&dir), 0);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
