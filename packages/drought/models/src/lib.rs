#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Drought severity levels and per-county statistics.
//!
//! This crate defines the U.S. Drought Monitor categories (`D0` through
//! `D4`) used across the drought-map system, the rule that reduces a
//! county's five category percentages to a single severity, and the fixed
//! marker color assigned to each severity.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Drought severity for a county, from no drought up to `D4`.
///
/// Variants are declared in ascending order so the derived [`Ord`] ranks
/// `D4` as the most severe.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum DroughtSeverity {
    /// No category has any area in drought.
    #[default]
    None,
    /// Abnormally dry
    D0,
    /// Moderate drought
    D1,
    /// Severe drought
    D2,
    /// Extreme drought
    D3,
    /// Exceptional drought
    D4,
}

impl DroughtSeverity {
    /// Returns all variants, least to most severe.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::None, Self::D0, Self::D1, Self::D2, Self::D3, Self::D4]
    }

    /// Returns the marker color used to draw this severity on the map.
    #[must_use]
    pub const fn color(self) -> MarkerColor {
        match self {
            Self::D4 => MarkerColor::DarkRed,
            Self::D3 => MarkerColor::Red,
            Self::D2 => MarkerColor::Orange,
            Self::D1 => MarkerColor::Yellow,
            Self::D0 => MarkerColor::Green,
            Self::None => MarkerColor::Blue,
        }
    }

    /// Human-readable description of the category.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::None => "No drought",
            Self::D0 => "Abnormally dry",
            Self::D1 => "Moderate drought",
            Self::D2 => "Severe drought",
            Self::D3 => "Extreme drought",
            Self::D4 => "Exceptional drought",
        }
    }
}

/// Marker colors, named as CSS color keywords.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MarkerColor {
    DarkRed,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
}

/// Reduces the five category percentages to a single severity.
///
/// Categories are checked from most to least severe and the first one with
/// a value strictly greater than zero wins. If none are positive the
/// severity is [`DroughtSeverity::None`].
#[must_use]
pub fn classify(d0: f64, d1: f64, d2: f64, d3: f64, d4: f64) -> DroughtSeverity {
    [
        (d4, DroughtSeverity::D4),
        (d3, DroughtSeverity::D3),
        (d2, DroughtSeverity::D2),
        (d1, DroughtSeverity::D1),
        (d0, DroughtSeverity::D0),
    ]
    .into_iter()
    .find(|(value, _)| *value > 0.0)
    .map_or(DroughtSeverity::None, |(_, severity)| severity)
}

/// Percent of a county's area at or above each drought category.
///
/// The statistics service reports cumulative values, so they need not sum
/// to 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityPercentages {
    pub d0: f64,
    pub d1: f64,
    pub d2: f64,
    pub d3: f64,
    pub d4: f64,
}

impl SeverityPercentages {
    /// Classifies these percentages. See [`classify`].
    #[must_use]
    pub fn severity(&self) -> DroughtSeverity {
        classify(self.d0, self.d1, self.d2, self.d3, self.d4)
    }
}

/// One county's weekly drought statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountyRecord {
    /// County name as reported by the statistics service (e.g. `"Polk"`).
    pub name: String,
    /// Category percentages.
    pub percentages: SeverityPercentages,
}

impl CountyRecord {
    /// Returns the drought severity for this county.
    #[must_use]
    pub fn severity(&self) -> DroughtSeverity {
        self.percentages.severity()
    }
}
