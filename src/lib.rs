//! Assessment traversal and two-party calibration core.
//!
//! A respondent walks an ordered questionnaire with backtracking, their
//! answers land in a one-per-question ledger, and completion triggers
//! exactly one submission to the remote report service. A second party can
//! later answer a parallel questionnaire about the same person; once that
//! peer data exists, the calibration gate unlocks the two-series view and
//! the polar projector renders both trait polygons on one disc.

pub mod api;
pub mod chart;
pub mod config;
pub mod error;
pub mod flow;
pub mod gate;
pub mod ledger;
pub mod logging;
pub mod question;
pub mod report;
pub mod svg;
pub mod traversal;
