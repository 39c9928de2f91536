//! Display formatting for the table and the per-game chart.
//!
//! Everything here is a pure function of one [`GameRecord`]. Absent optional
//! fields render as [`PLACEHOLDER`] and are reported as
//! [`ProjectionWarning`]s rather than errors.

use serde::Serialize;

use crate::model::{GameRecord, SortKey};

/// Rendered in place of an absent optional value.
pub const PLACEHOLDER: &str = "-";

pub const CHART_LABELS: [&str; 3] = ["Win % Home", "Win % Away", "Expected Diff"];
/// Green, red, blue, positionally matching [`CHART_LABELS`].
pub const CHART_COLORS: [&str; 3] = ["#4caf50", "#f44336", "#2196f3"];
pub const CHART_DATASET_LABEL: &str = "Model Output";

/// One table row, ready to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub match_label: String,
    pub win_home_pct: String,
    pub win_away_pct: String,
    pub edge_home_str: String,
    pub edge_away_str: String,
    pub spread_str: String,
    pub total_str: String,
}

/// Bar-chart input for the selected game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartValues {
    pub title: String,
    pub dataset_label: &'static str,
    pub labels: [&'static str; 3],
    /// `[win % home, win % away, expected diff]`, each to one decimal
    pub values: [f64; 3],
    pub colors: [&'static str; 3],
}

/// An optional field was absent and a placeholder was shown instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProjectionWarning {
    MissingField(SortKey),
}

/// Enough fractional digits to print any finite `f64` exactly.
const EXACT_DIGITS: usize = 1100;

/// True when the stored value sits exactly halfway between two
/// `decimals`-place results.
fn is_decimal_tie(value: f64, decimals: usize) -> bool {
    if !value.is_finite() {
        return false;
    }
    let exact = format!("{:.*}", EXACT_DIGITS, value.abs());
    let frac = exact.split_once('.').map(|(_, f)| f).unwrap_or("");
    match frac.get(decimals..) {
        Some(tail) => tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0'),
        None => false,
    }
}

/// Format the stored value to `decimals` places, rounding once.
///
/// Exact ties go away from zero; everything else goes to the nearest
/// result. Negative zero prints as zero.
pub fn fixed(value: f64, decimals: usize) -> String {
    let text = if is_decimal_tie(value, decimals) {
        let factor = 10f64.powi(decimals as i32);
        format!("{:.*}", decimals, (value * factor).round() / factor)
    } else {
        format!("{:.*}", decimals, value)
    };
    match text.strip_prefix('-') {
        Some(magnitude) if magnitude.bytes().all(|b| b == b'0' || b == b'.') => {
            magnitude.to_string()
        }
        _ => text,
    }
}

/// Numeric form of [`fixed`].
pub fn round_to(value: f64, decimals: usize) -> f64 {
    fixed(value, decimals).parse().unwrap_or(value)
}

pub fn round1(value: f64) -> f64 {
    round_to(value, 1)
}

fn optional_fixed(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| fixed(v, decimals))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn pct(probability: f64) -> String {
    format!("{}%", fixed(probability * 100.0, 1))
}

pub fn project_row(g: &GameRecord) -> RowView {
    RowView {
        match_label: format!("{} - {}", g.home, g.away),
        win_home_pct: pct(g.win_prob_home),
        win_away_pct: pct(g.win_prob_away),
        edge_home_str: optional_fixed(g.edge_home, 1),
        edge_away_str: optional_fixed(g.edge_away, 1),
        spread_str: optional_fixed(g.p_spread_home_cover, 2),
        total_str: optional_fixed(g.p_total_over, 2),
    }
}

pub fn project_chart(g: &GameRecord) -> ChartValues {
    ChartValues {
        title: format!("{} vs {}", g.home, g.away),
        dataset_label: CHART_DATASET_LABEL,
        labels: CHART_LABELS,
        values: [
            round1(g.win_prob_home * 100.0),
            round1(g.win_prob_away * 100.0),
            round1(g.expected_diff),
        ],
        colors: CHART_COLORS,
    }
}

/// Optional fields that [`project_row`] will render as placeholders.
pub fn projection_warnings(g: &GameRecord) -> Vec<ProjectionWarning> {
    [
        SortKey::EdgeHome,
        SortKey::EdgeAway,
        SortKey::SpreadHomeCover,
        SortKey::TotalOver,
    ]
    .into_iter()
    .filter(|key| key.value(g).is_none())
    .map(ProjectionWarning::MissingField)
    .collect()
}
