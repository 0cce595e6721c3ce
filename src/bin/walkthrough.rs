//! Scripted end-to-end walkthrough against the in-memory backend: self
//! assessment, locked calibration view, peer assessment, unlocked view,
//! static SVG export. Useful as a smoke run and as a reading guide to the
//! library wiring.

use std::path::Path;

use anyhow::{anyhow, Result};

use calibra::api::memory::MemoryBackend;
use calibra::api::retry::RetryConfig;
use calibra::config::Config;
use calibra::flow::{enter_with_code, load_report, Entry, PeerSession, SessionStep};
use calibra::gate::{is_unlocked, Gate, GateView, ViewMode};
use calibra::logging::{json_log, obj, v_bool, v_str, Domain};
use calibra::svg::{render_radar_to_file, RadarSvgOptions};

const ACCESS_CODE: &str = "DEMO-360";

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    let origin = cfg.origin_url()?;
    let retry = RetryConfig::from_config(&cfg);

    let backend = MemoryBackend::new();
    backend.issue_code(ACCESS_CODE);
    json_log(
        Domain::System,
        "walkthrough_start",
        obj(&[("backend", v_str("memory")), ("code", v_str(ACCESS_CODE))]),
    );

    // --- self assessment -------------------------------------------------
    let mut session = match enter_with_code(&backend, &retry, ACCESS_CODE).await? {
        Entry::Fresh(session) => session,
        Entry::ExistingReport { report_id } => {
            return Err(anyhow!("demo code already consumed by {}", report_id))
        }
        Entry::Denied { message } => return Err(anyhow!("access denied: {}", message)),
    };

    // answer option 0 throughout, with one backtrack to show overwrite
    session.answer(&backend, 0).await?;
    session.retreat();
    session.answer(&backend, 1).await?; // changed our mind on question 1
    let report_id = loop {
        match session.answer(&backend, 0).await? {
            SessionStep::Next { .. } => continue,
            SessionStep::Completed { report_id } => break report_id,
            step => return Err(anyhow!("unexpected step {:?}", step)),
        }
    };

    // --- locked calibration view -----------------------------------------
    let report = load_report(&backend, &retry, &report_id).await?;
    let mut gate = Gate::new();
    gate.set_mode(ViewMode::Calibration);
    match gate.view(&report, &origin) {
        GateView::InvitePrompt { invite_link } => json_log(
            Domain::Gate,
            "calibration_locked",
            obj(&[("invite_link", v_str(invite_link.as_str()))]),
        ),
        view => return Err(anyhow!("expected locked gate, got {:?}", view)),
    }
    gate.dismiss();

    // --- peer assessment through the invite token ------------------------
    let mut peer = PeerSession::load(&backend, &retry, &report_id).await?;
    loop {
        match peer.answer(&backend, 1).await? {
            SessionStep::Next { .. } => continue,
            SessionStep::PeerSubmitted => break,
            step => return Err(anyhow!("unexpected step {:?}", step)),
        }
    }

    // --- unlocked calibration + export -----------------------------------
    let report = load_report(&backend, &retry, &report_id).await?;
    json_log(
        Domain::Gate,
        "calibration_unlocked",
        obj(&[("unlocked", v_bool(is_unlocked(&report)))]),
    );
    gate.set_mode(ViewMode::Calibration);
    if let GateView::Calibration(deviation) = gate.view(&report, &origin) {
        json_log(
            Domain::Gate,
            "deviation",
            obj(&[
                ("others_perception", v_str(&deviation.others_perception)),
                ("archetype", v_str(
                    deviation
                        .conclusion
                        .as_ref()
                        .map(|c| c.archetype.as_str())
                        .unwrap_or(""),
                )),
            ]),
        );
    }

    if let Some(radar) = report.radar_data.as_deref() {
        let out = Path::new("out");
        std::fs::create_dir_all(out)?;
        let path = out.join("radar.svg");
        render_radar_to_file(
            &path,
            radar,
            &RadarSvgOptions {
                blended: true,
                ..Default::default()
            },
        )?;
        json_log(
            Domain::System,
            "radar_exported",
            obj(&[("path", v_str(&path.display().to_string()))]),
        );
    }

    json_log(
        Domain::System,
        "walkthrough_done",
        obj(&[("report_id", v_str(&report_id))]),
    );
    Ok(())
}
