//! Static radar export.
//!
//! Renders the same rings/axes/polygons as the interactive chart, through
//! the same [`RadarProjector`], so an exported card is pixel-compatible
//! with what the respondent saw on screen. Rasterization of the card is a
//! host concern; this module stops at the SVG document.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use crate::chart::{points_attr, RadarProjector, RadarSample, DEFAULT_SIZE};

const RING_STROKE: &str = "#F5F5F5";
const AXIS_STROKE: &str = "#E5E5E5";
const PRIMARY_STROKE: &str = "#FF5D8D";
const SECONDARY_STROKE: &str = "#1A1A1A";
const DOT_RADIUS: f64 = 3.0;

#[derive(Debug, Clone, Copy)]
pub struct RadarSvgOptions {
    pub width: f64,
    pub height: f64,
    /// Draw the dashed secondary (peer) overlay.
    pub blended: bool,
}

impl Default for RadarSvgOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            blended: false,
        }
    }
}

/// Render the radar as a standalone SVG document.
pub fn render_radar(samples: &[RadarSample], opts: &RadarSvgOptions) -> String {
    let proj = RadarProjector::for_viewport(opts.width, opts.height, samples.len());
    let center = proj.center();
    let mut out = String::new();

    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {} {}\">",
        opts.width, opts.height
    );

    for r in proj.ring_radii() {
        let _ = write!(
            out,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\"/>",
            center.x, center.y, r, RING_STROKE
        );
    }

    for (i, sample) in samples.iter().enumerate() {
        let end = proj.axis_end(i);
        let label = proj.label_anchor(i);
        let _ = write!(
            out,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
            center.x, center.y, end.x, end.y, AXIS_STROKE
        );
        let _ = write!(
            out,
            "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-size=\"10\">{}</text>",
            label.x,
            label.y,
            escape_text(&sample.axis)
        );
    }

    // dashed overlay under the solid primary, as on screen
    if opts.blended {
        let secondary = proj.secondary_polygon(samples);
        let _ = write!(
            out,
            "<polygon points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\" stroke-dasharray=\"4 3\" opacity=\"0.6\"/>",
            points_attr(&secondary),
            SECONDARY_STROKE
        );
    }

    let primary = proj.primary_polygon(samples);
    let _ = write!(
        out,
        "<polygon points=\"{}\" fill=\"{}\" fill-opacity=\"0.2\" stroke=\"{}\" stroke-width=\"2\"/>",
        points_attr(&primary),
        PRIMARY_STROKE,
        PRIMARY_STROKE
    );

    for p in &primary {
        let _ = write!(
            out,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>",
            p.x, p.y, DOT_RADIUS, PRIMARY_STROKE
        );
    }
    if opts.blended {
        for p in proj.secondary_polygon(samples) {
            let _ = write!(
                out,
                "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" opacity=\"0.6\"/>",
                p.x, p.y, DOT_RADIUS, SECONDARY_STROKE
            );
        }
    }

    out.push_str("</svg>");
    out
}

/// Render and write to disk in one step, for export flows.
pub fn render_radar_to_file(
    path: &Path,
    samples: &[RadarSample],
    opts: &RadarSvgOptions,
) -> io::Result<()> {
    fs::write(path, render_radar(samples, opts))
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::RadarProjector;

    fn blended_samples() -> Vec<RadarSample> {
        (0..8)
            .map(|i| RadarSample {
                axis: format!("A{}", i),
                value: 60.0 + i as f64,
                secondary_value: Some(40.0 + i as f64),
            })
            .collect()
    }

    #[test]
    fn export_shares_interactive_coordinates() {
        let samples = blended_samples();
        let opts = RadarSvgOptions::default();
        let svg = render_radar(&samples, &opts);

        // the exact points the interactive chart would compute must appear
        let proj = RadarProjector::for_viewport(opts.width, opts.height, samples.len());
        let primary = points_attr(&proj.primary_polygon(&samples));
        assert!(svg.contains(&primary));
    }

    #[test]
    fn overlay_only_when_blended() {
        let samples = blended_samples();
        let plain = render_radar(&samples, &RadarSvgOptions::default());
        assert!(!plain.contains("stroke-dasharray"));

        let blended = render_radar(
            &samples,
            &RadarSvgOptions {
                blended: true,
                ..Default::default()
            },
        );
        assert!(blended.contains("stroke-dasharray"));
    }

    #[test]
    fn rings_are_data_independent() {
        let low: Vec<RadarSample> = (0..4)
            .map(|i| RadarSample {
                axis: format!("A{}", i),
                value: 0.0,
                secondary_value: None,
            })
            .collect();
        let svg = render_radar(&low, &RadarSvgOptions::default());
        assert_eq!(svg.matches("<circle").count(), 4 + low.len());
    }

    #[test]
    fn axis_labels_are_escaped() {
        let samples = vec![
            RadarSample {
                axis: "<E&I>".into(),
                value: 50.0,
                secondary_value: None,
            },
            RadarSample {
                axis: "S".into(),
                value: 50.0,
                secondary_value: None,
            },
        ];
        let svg = render_radar(&samples, &RadarSvgOptions::default());
        assert!(svg.contains("&lt;E&amp;I&gt;"));
    }

    #[test]
    fn writes_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("radar.svg");
        render_radar_to_file(&path, &blended_samples(), &RadarSvgOptions::default()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<svg"));
        assert!(content.ends_with("</svg>"));
    }
}
