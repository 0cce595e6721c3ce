//! Report document wire model.
//!
//! The report is authored remotely and mostly opaque here: the core reads
//! `id`, the radar series, and the `deviation` sub-structure whose
//! `othersPerception` field is the calibration unlock sentinel. Everything
//! else round-trips untouched through a flattened JSON map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::chart::RadarSample;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    #[serde(default)]
    pub id: String,
    /// Per-axis trait series; secondary values appear once peer data exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radar_data: Option<Vec<RadarSample>>,
    /// Present only once a peer submission has landed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deviation: Option<Deviation>,
    /// Report prose and anything else the remote adds later.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Two-party contrast block, populated exactly once per peer submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deviation {
    #[serde(default)]
    pub self_perception: String,
    /// The unlock sentinel: non-empty once a peer has answered.
    #[serde(default)]
    pub others_perception: String,
    #[serde(default)]
    pub similarities: String,
    #[serde(default)]
    pub differences: String,
    #[serde(default)]
    pub dimension_analysis: Vec<DimensionContrast>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<CalibrationConclusion>,
}

/// One dichotomy row: self and peer positions on a 0-100 left/right scale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionContrast {
    pub label: String,
    pub left: String,
    pub right: String,
    pub self_value: f64,
    pub peer_value: f64,
    #[serde(default)]
    pub desc: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalibrationConclusion {
    pub archetype: String,
    pub desc: String,
    pub suggestion: String,
}
