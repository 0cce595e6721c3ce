//! In-memory backend for tests and the demo binary.
//!
//! Implements the full collaborator contract: access-code lifecycle,
//! report creation, the peer-submission mutation that populates
//! `deviation` exactly once, and not-found lookups. Question fixtures and
//! radar values are canned — scoring is not this crate's concern.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde_json::json;

use crate::api::{AccessCheck, Backend, ReportHandle};
use crate::chart::RadarSample;
use crate::question::{Answer, PeerQuestion, Question, TraitLetter};
use crate::report::{CalibrationConclusion, Deviation, DimensionContrast, ReportDocument};

#[derive(Default)]
struct Store {
    /// code -> report id once used
    codes: HashMap<String, Option<String>>,
    reports: HashMap<String, ReportDocument>,
}

pub struct MemoryBackend {
    store: Mutex<Store>,
    seq: AtomicU64,
    create_calls: AtomicU64,
    peer_calls: AtomicU64,
    fail_create: AtomicBool,
    fail_peer: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(Store::default()),
            seq: AtomicU64::new(0),
            create_calls: AtomicU64::new(0),
            peer_calls: AtomicU64::new(0),
            fail_create: AtomicBool::new(false),
            fail_peer: AtomicBool::new(false),
        }
    }

    /// Register a valid, unused access code.
    pub fn issue_code(&self, code: &str) {
        self.store
            .lock()
            .unwrap()
            .codes
            .insert(code.to_string(), None);
    }

    /// Make the next `create_report` calls fail, for rollback tests.
    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    /// Make the next `submit_peer_assessment` calls fail.
    pub fn set_fail_peer(&self, fail: bool) {
        self.fail_peer.store(fail, Ordering::SeqCst);
    }

    pub fn create_report_calls(&self) -> u64 {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn peer_submission_calls(&self) -> u64 {
        self.peer_calls.load(Ordering::SeqCst)
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn fetch_questions(&self) -> Result<Vec<Question>> {
        Ok(default_questions())
    }

    async fn fetch_peer_questions(&self) -> Result<Vec<PeerQuestion>> {
        Ok(default_peer_questions())
    }

    async fn verify_access_code(&self, code: &str) -> Result<AccessCheck> {
        let store = self.store.lock().unwrap();
        match store.codes.get(code) {
            Some(Some(report_id)) => Ok(AccessCheck {
                valid: true,
                report_id: Some(report_id.clone()),
                message: None,
            }),
            Some(None) => Ok(AccessCheck {
                valid: true,
                report_id: None,
                message: None,
            }),
            None => Ok(AccessCheck {
                valid: false,
                report_id: None,
                message: Some("unknown access code".into()),
            }),
        }
    }

    async fn create_report(&self, answers: &[Answer], access_code: &str) -> Result<ReportHandle> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.load(Ordering::SeqCst) {
            bail!("report service unavailable");
        }
        if answers.is_empty() {
            bail!("empty answer set");
        }

        let mut store = self.store.lock().unwrap();
        match store.codes.get(access_code) {
            Some(None) => {}
            Some(Some(_)) => bail!("access code already used"),
            None => bail!("invalid access code"),
        }

        let id = format!("r-{:04}", self.seq.fetch_add(1, Ordering::SeqCst) + 1);
        let mut report = ReportDocument {
            id: id.clone(),
            radar_data: Some(self_radar()),
            deviation: None,
            rest: Default::default(),
        };
        report.rest.insert("type".into(), json!("INFJ"));
        report.rest.insert("title".into(), json!("The Advocate"));

        store.reports.insert(id.clone(), report);
        store
            .codes
            .insert(access_code.to_string(), Some(id.clone()));
        Ok(ReportHandle { id })
    }

    async fn submit_peer_assessment(&self, token: &str, answers: &[Answer]) -> Result<()> {
        self.peer_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_peer.load(Ordering::SeqCst) {
            bail!("peer submission unavailable");
        }
        if answers.is_empty() {
            bail!("empty answer set");
        }

        let mut store = self.store.lock().unwrap();
        let report = store
            .reports
            .get_mut(token)
            .ok_or_else(|| anyhow!("report {} not found", token))?;

        if let Some(radar) = report.radar_data.as_mut() {
            for (sample, secondary) in radar.iter_mut().zip(PEER_VALUES) {
                sample.secondary_value = Some(secondary);
            }
        }
        report.deviation = Some(canned_deviation());
        Ok(())
    }

    async fn get_report_by_id(&self, id: &str) -> Result<Option<ReportDocument>> {
        Ok(self.store.lock().unwrap().reports.get(id).cloned())
    }
}

const SELF_VALUES: [f64; 8] = [62.0, 38.0, 55.0, 45.0, 70.0, 30.0, 58.0, 42.0];
const PEER_VALUES: [f64; 8] = [48.0, 52.0, 61.0, 39.0, 44.0, 56.0, 35.0, 65.0];

fn self_radar() -> Vec<RadarSample> {
    TraitLetter::ALL
        .iter()
        .zip(SELF_VALUES)
        .map(|(letter, value)| RadarSample {
            axis: letter.as_str().to_string(),
            value,
            secondary_value: None,
        })
        .collect()
}

fn canned_deviation() -> Deviation {
    Deviation {
        self_perception: "You see yourself as reserved and deliberate.".into(),
        others_perception: "Friends read you as warmer and more spontaneous.".into(),
        similarities: "Both views agree on your curiosity.".into(),
        differences: "The outside view sees far more initiative.".into(),
        dimension_analysis: vec![DimensionContrast {
            label: "E/I".into(),
            left: "E".into(),
            right: "I".into(),
            self_value: 38.0,
            peer_value: 52.0,
            desc: "You rate yourself more inward than others do.".into(),
        }],
        conclusion: Some(CalibrationConclusion {
            archetype: "The Quiet Spark".into(),
            desc: "A larger gap on the first dichotomy than on the rest.".into(),
            suggestion: "Let the spontaneous side out earlier.".into(),
        }),
    }
}

/// Eight two-option questions, one dichotomy pair each, option 0 carrying
/// the first pole.
pub fn default_questions() -> Vec<Question> {
    let pairs = [
        (TraitLetter::E, TraitLetter::I),
        (TraitLetter::S, TraitLetter::N),
        (TraitLetter::T, TraitLetter::F),
        (TraitLetter::J, TraitLetter::P),
        (TraitLetter::E, TraitLetter::I),
        (TraitLetter::S, TraitLetter::N),
        (TraitLetter::T, TraitLetter::F),
        (TraitLetter::J, TraitLetter::P),
    ];
    let prompts = [
        "A free evening appears. You...",
        "When learning something new, you trust...",
        "A friend brings you a problem. You first...",
        "Your week works best when it is...",
        "In a group conversation you tend to...",
        "You remember places by...",
        "Feedback lands best with you when it is...",
        "Packing for a trip happens...",
    ];
    let options = [
        ("call someone and make plans", "keep it to yourself"),
        ("what you can verify firsthand", "the pattern behind the facts"),
        ("weigh what would actually work", "ask how everyone feels about it"),
        ("mapped out in advance", "left open to change"),
        ("think out loud", "listen and weigh in late"),
        ("concrete details", "the impression they left"),
        ("direct and specific", "considerate of the person"),
        ("days ahead, with a list", "the night before, loosely"),
    ];

    pairs
        .iter()
        .enumerate()
        .map(|(i, (a, b))| Question {
            id: (i + 1) as u32,
            text: prompts[i].to_string(),
            options: vec![options[i].0.to_string(), options[i].1.to_string()],
            values: Some(vec![*a, *b]),
        })
        .collect()
}

/// Peer variant of the fixture: same dichotomy ordering, direct values.
pub fn default_peer_questions() -> Vec<PeerQuestion> {
    default_questions()
        .into_iter()
        .map(|q| {
            let values = q.values.unwrap_or_default();
            PeerQuestion {
                id: q.id,
                text: format!("Thinking of them: {}", q.text.to_lowercase()),
                option_a: q.options[0].clone(),
                option_b: q.options[1].clone(),
                value_a: values[0],
                value_b: values[1],
            }
        })
        .collect()
}
