//! Report formatting and plot data for the presentation layer.
//!
//! Nothing here renders anything. [`PlotData`] carries the numeric artifacts
//! a plotting front end needs, and [`PlotStyle`] carries the figure styling as
//! an explicit value instead of global state.

use serde::{Deserialize, Serialize};

use crate::parameters::StellarInputs;

/// One-line textual report, `i = {mode} +/- {dispersion} deg`
pub fn format_report(mode: f64, dispersion: f64) -> String {
    format!("i = {:.0} +/- {:.0} deg", mode, dispersion)
}

/// Machine-readable summary of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InclinationReport {
    pub mode_deg: f64,
    pub dispersion_deg: f64,
    pub rounded_mode_deg: f64,
    pub rounded_dispersion_deg: f64,
    pub trials: usize,
    pub accepted: usize,
    pub dropped: usize,
    pub seed: Option<u64>,
    pub inputs: StellarInputs,
}

impl InclinationReport {
    /// The textual report line
    pub fn text(&self) -> String {
        format_report(self.mode_deg, self.dispersion_deg)
    }
}

/// Histogram with explicit bin edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// `counts.len() + 1` ascending edges
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` with the "auto" rule: the narrower of the Sturges and
    /// Freedman-Diaconis widths, Sturges alone when the IQR is zero.
    pub fn auto(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self { edges: vec![0.0, 1.0], counts: vec![0] };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let mut first = sorted[0];
        let mut last = sorted[sorted.len() - 1];

        let bins = if last > first {
            let width = auto_bin_width(&sorted);
            if width > 0.0 {
                (((last - first) / width).ceil() as usize).max(1)
            } else {
                1
            }
        } else {
            first -= 0.5;
            last += 0.5;
            1
        };

        let step = (last - first) / bins as f64;
        let mut edges: Vec<f64> = (0..=bins).map(|i| first + i as f64 * step).collect();
        edges[bins] = last;

        let mut counts = vec![0; bins];
        for &v in &sorted {
            let raw = ((v - first) / (last - first) * bins as f64).floor();
            let index = if raw < 0.0 { 0 } else { (raw as usize).min(bins - 1) };
            counts[index] += 1;
        }

        Self { edges, counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

fn auto_bin_width(sorted: &[f64]) -> f64 {
    let n = sorted.len() as f64;
    let range = sorted[sorted.len() - 1] - sorted[0];

    let sturges = range / (n.log2() + 1.0);
    let iqr = percentile(sorted, 0.75) - percentile(sorted, 0.25);
    let freedman_diaconis = 2.0 * iqr * n.powf(-1.0 / 3.0);

    if freedman_diaconis > 0.0 {
        sturges.min(freedman_diaconis)
    } else {
        sturges
    }
}

/// Calculate percentile using linear interpolation between closest ranks,
/// the same rule as numpy's default `percentile`
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let n = sorted_values.len();
    if n == 1 {
        return sorted_values[0];
    }

    let index = p * (n - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted_values[lower]
    } else {
        let weight = index - lower as f64;
        sorted_values[lower] * (1.0 - weight) + sorted_values[upper] * weight
    }
}

/// Font weight of a text element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

/// Size and weight of a text element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub size: f64,
    pub weight: FontWeight,
}

/// Figure styling for the histogram-plus-density plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotStyle {
    pub figure_size: (f64, f64),
    pub x_limits: (f64, f64),
    pub x_label: String,
    pub count_label: String,
    pub density_label: String,
    pub legend: TextStyle,
    pub x_label_text: TextStyle,
    pub y_label_text: TextStyle,
    pub x_tick_text: TextStyle,
    pub y_tick_text: TextStyle,
    pub x_label_pad: f64,
    pub y_label_pad: f64,
    pub major_tick_length: f64,
    pub minor_tick_length: f64,
    pub tick_width: f64,
    pub histogram_color: String,
    pub curve_color: String,
    pub curve_width: f64,
    pub marker_color: String,
    pub marker_width: f64,
    /// (top, bottom, left, right) subplot margins as figure fractions
    pub margins: (f64, f64, f64, f64),
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            figure_size: (10.0, 5.0),
            x_limits: (0.0, 90.0),
            x_label: "Inclination [deg]".to_string(),
            count_label: "Count".to_string(),
            density_label: "Probability distribution".to_string(),
            legend: TextStyle { size: 12.0, weight: FontWeight::Bold },
            x_label_text: TextStyle { size: 18.0, weight: FontWeight::Bold },
            y_label_text: TextStyle { size: 18.0, weight: FontWeight::Bold },
            x_tick_text: TextStyle { size: 14.0, weight: FontWeight::Normal },
            y_tick_text: TextStyle { size: 14.0, weight: FontWeight::Normal },
            x_label_pad: 12.0,
            y_label_pad: 12.0,
            major_tick_length: 7.0,
            minor_tick_length: 3.0,
            tick_width: 1.0,
            histogram_color: "C0".to_string(),
            curve_color: "C3".to_string(),
            curve_width: 2.0,
            marker_color: "k".to_string(),
            marker_width: 2.0,
            margins: (0.945, 0.15, 0.11, 0.89),
        }
    }
}

/// A point of the fitted density curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub density: f64,
}

/// Everything a plotting front end needs to draw one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotData {
    /// Accepted Monte-Carlo angles (degrees)
    pub angles: Vec<f64>,
    pub histogram: Histogram,
    pub curve: Vec<CurvePoint>,
    /// Vertical marker position: the mode rounded to whole degrees
    pub marker_deg: f64,
    /// Legend text for the marker
    pub label: String,
    pub style: PlotStyle,
}
