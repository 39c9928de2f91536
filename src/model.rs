use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LoadError;

/// Team selector value that disables team filtering.
pub const ALL_TEAMS: &str = "All";

/// One game's prediction output as exported by the model pipeline.
///
/// Extra columns in the export (game id, date, feature values) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub home: String,
    pub away: String,
    /// Model probability that the home team wins (0.0–1.0)
    pub win_prob_home: f64,
    /// Model probability that the away team wins (0.0–1.0)
    pub win_prob_away: f64,
    /// Signed model edge vs market on the home side
    #[serde(default)]
    pub edge_home: Option<f64>,
    /// Signed model edge vs market on the away side
    #[serde(default)]
    pub edge_away: Option<f64>,
    /// Expected points differential (home minus away)
    pub expected_diff: f64,
    /// Probability the home team covers the spread (0.0–1.0)
    #[serde(default, rename = "P_spread_home_cover")]
    pub p_spread_home_cover: Option<f64>,
    /// Probability the game goes over the total (0.0–1.0)
    #[serde(default, rename = "P_total_over")]
    pub p_total_over: Option<f64>,
}

impl GameRecord {
    /// Largest absolute edge on either side; absent edges count as zero.
    pub fn edge_magnitude(&self) -> f64 {
        self.edge_home
            .unwrap_or(0.0)
            .abs()
            .max(self.edge_away.unwrap_or(0.0).abs())
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home == team || self.away == team
    }

    /// Check numeric ranges. Returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        check_probability("win_prob_home", Some(self.win_prob_home))?;
        check_probability("win_prob_away", Some(self.win_prob_away))?;
        check_probability("P_spread_home_cover", self.p_spread_home_cover)?;
        check_probability("P_total_over", self.p_total_over)?;
        check_finite("edge_home", self.edge_home)?;
        check_finite("edge_away", self.edge_away)?;
        check_finite("expected_diff", Some(self.expected_diff))?;
        Ok(())
    }
}

fn check_finite(field: &str, value: Option<f64>) -> Result<(), String> {
    match value {
        Some(v) if !v.is_finite() => Err(format!("{} is not finite", field)),
        _ => Ok(()),
    }
}

fn check_probability(field: &str, value: Option<f64>) -> Result<(), String> {
    check_finite(field, value)?;
    match value {
        Some(v) if !(0.0..=1.0).contains(&v) => {
            Err(format!("{} = {} is outside [0, 1]", field, v))
        }
        _ => Ok(()),
    }
}

/// Parse a raw payload into validated game records.
///
/// The payload must be a JSON array; every element must deserialize into a
/// [`GameRecord`] and pass [`GameRecord::validate`].
pub fn parse_records(raw: &serde_json::Value) -> Result<Vec<GameRecord>, LoadError> {
    let items = raw.as_array().ok_or(LoadError::NotASequence)?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let record: GameRecord = GameRecord::deserialize(item).map_err(|e| {
                LoadError::InvalidRecord {
                    index,
                    reason: e.to_string(),
                }
            })?;
            record
                .validate()
                .map_err(|reason| LoadError::InvalidRecord { index, reason })?;
            Ok(record)
        })
        .collect()
}

/// Parse a JSON document (as text) into validated game records.
pub fn parse_payload(text: &str) -> Result<Vec<GameRecord>, LoadError> {
    let raw: serde_json::Value =
        serde_json::from_str(text).map_err(|e| LoadError::Malformed(e.to_string()))?;
    parse_records(&raw)
}

/// Sortable numeric field of a [`GameRecord`].
///
/// Wire names match the record's JSON field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "win_prob_home")]
    WinProbHome,
    #[serde(rename = "win_prob_away")]
    WinProbAway,
    #[serde(rename = "edge_home")]
    EdgeHome,
    #[serde(rename = "edge_away")]
    EdgeAway,
    #[serde(rename = "expected_diff")]
    ExpectedDiff,
    #[serde(rename = "P_spread_home_cover")]
    SpreadHomeCover,
    #[serde(rename = "P_total_over")]
    TotalOver,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::WinProbHome => "win_prob_home",
            SortKey::WinProbAway => "win_prob_away",
            SortKey::EdgeHome => "edge_home",
            SortKey::EdgeAway => "edge_away",
            SortKey::ExpectedDiff => "expected_diff",
            SortKey::SpreadHomeCover => "P_spread_home_cover",
            SortKey::TotalOver => "P_total_over",
        }
    }

    /// The field's value on `game`, `None` when the field is absent.
    pub fn value(&self, game: &GameRecord) -> Option<f64> {
        match self {
            SortKey::WinProbHome => Some(game.win_prob_home),
            SortKey::WinProbAway => Some(game.win_prob_away),
            SortKey::EdgeHome => game.edge_home,
            SortKey::EdgeAway => game.edge_away,
            SortKey::ExpectedDiff => Some(game.expected_diff),
            SortKey::SpreadHomeCover => game.p_spread_home_cover,
            SortKey::TotalOver => game.p_total_over,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Team part of the filter: either every team or one named team.
///
/// Serialized as the plain string `"All"` or the team name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TeamFilter {
    #[default]
    All,
    Team(String),
}

impl TeamFilter {
    pub fn matches(&self, game: &GameRecord) -> bool {
        match self {
            TeamFilter::All => true,
            TeamFilter::Team(team) => game.involves(team),
        }
    }
}

impl From<String> for TeamFilter {
    fn from(s: String) -> Self {
        if s == ALL_TEAMS {
            TeamFilter::All
        } else {
            TeamFilter::Team(s)
        }
    }
}

impl From<TeamFilter> for String {
    fn from(t: TeamFilter) -> Self {
        match t {
            TeamFilter::All => ALL_TEAMS.to_string(),
            TeamFilter::Team(name) => name,
        }
    }
}

/// User-selected filter inputs, rebuilt on every filter change.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub team: TeamFilter,
    /// Minimum absolute edge (≥ 0)
    #[serde(alias = "minEdge")]
    pub min_edge: f64,
}

impl FilterCriteria {
    pub fn new(team: TeamFilter, min_edge: f64) -> Self {
        FilterCriteria { team, min_edge }
    }

    /// Clamp an unusable threshold (negative, NaN, infinite) back to zero.
    pub fn normalized(self) -> Self {
        if self.min_edge.is_finite() && self.min_edge >= 0.0 {
            self
        } else {
            FilterCriteria::new(self.team, 0.0)
        }
    }
}
