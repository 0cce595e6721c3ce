//! Calibration gate: decides whether the two-party view is unlocked and
//! which of the two mutually exclusive report views is showing.
//!
//! The gate never mutates the report. Unlock happens out-of-band — a peer
//! submission updates the document server-side — and is simply re-observed
//! on the next read. Mode and lock state are independent: switching to the
//! calibration view while locked produces an invitation prompt, never a
//! silent fallback to the self view.

use url::Url;

use crate::report::{Deviation, ReportDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    SelfReport,
    Calibration,
}

/// Peer data present: `deviation` exists and its `othersPerception`
/// sentinel is non-empty.
pub fn is_unlocked(report: &ReportDocument) -> bool {
    report
        .deviation
        .as_ref()
        .map_or(false, |d| !d.others_perception.trim().is_empty())
}

/// Locked means: the calibration view is requested but peer data has not
/// arrived yet.
pub fn is_locked(mode: ViewMode, report: &ReportDocument) -> bool {
    mode == ViewMode::Calibration && !is_unlocked(report)
}

/// Peer invitation link for a report identity: `{origin}/peer/{id}`.
pub fn invite_link(origin: &Url, report_id: &str) -> Url {
    let mut link = origin.clone();
    link.set_path(&format!("/peer/{}", report_id));
    link
}

/// Shareable report address: `{origin}/result/{id}`.
pub fn report_link(origin: &Url, report_id: &str) -> Url {
    let mut link = origin.clone();
    link.set_path(&format!("/result/{}", report_id));
    link
}

/// What the surrounding UI should render.
#[derive(Debug, Clone)]
pub enum GateView<'a> {
    SelfReport(&'a ReportDocument),
    /// Calibration requested and unlocked.
    Calibration(&'a Deviation),
    /// Calibration requested while locked: prompt with the invite link.
    /// Dismissing is the one reversible action out of this state.
    InvitePrompt { invite_link: Url },
}

/// View-mode holder. Toggling the mode never changes lock state or report
/// data.
#[derive(Debug, Clone, Default)]
pub struct Gate {
    mode: ViewMode,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    /// Dismiss the invitation prompt: back to the self view, nothing else
    /// changes.
    pub fn dismiss(&mut self) {
        self.mode = ViewMode::SelfReport;
    }

    pub fn view<'a>(&self, report: &'a ReportDocument, origin: &Url) -> GateView<'a> {
        match self.mode {
            ViewMode::SelfReport => GateView::SelfReport(report),
            ViewMode::Calibration => match report.deviation.as_ref() {
                Some(dev) if !dev.others_perception.trim().is_empty() => {
                    GateView::Calibration(dev)
                }
                _ => GateView::InvitePrompt {
                    invite_link: invite_link(origin, &report.id),
                },
            },
        }
    }
}
