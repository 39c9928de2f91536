//! Authoritative dashboard state.
//!
//! The controller owns the loaded dataset, the visible subset derived from
//! it, the active filter and sort, and the selected game. Every mutation is a
//! [`DashboardCommand`] applied atomically; the presentation layer only reads
//! the projected rows and chart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::engine::{
    extract_teams, filter, project_chart, project_row, projection_warnings, sort_by_key,
    ChartValues, RowView,
};
use crate::error::{CommandError, LoadError, SelectionError};
use crate::model::{FilterCriteria, GameRecord, SortKey};
use crate::source::GameSource;

/// Controller shared between the loader task and HTTP handlers.
pub type SharedController = Arc<RwLock<DashboardController>>;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Empty,
    Loaded { at: DateTime<Utc> },
    /// Terminal: a failed load never leaves a partial dataset behind.
    LoadFailed(LoadError),
}

/// Input events emitted by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DashboardCommand {
    FilterChanged(FilterCriteria),
    SortRequested(SortKey),
    GameSelected(usize),
}

/// Summary for the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStatus {
    /// "empty" | "loaded" | "load_failed"
    pub state: &'static str,
    pub loaded_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub total_games: usize,
    pub visible_games: usize,
    pub criteria: FilterCriteria,
    pub sort_key: Option<SortKey>,
    pub has_selection: bool,
}

pub struct DashboardController {
    state: LoadState,
    dataset: Vec<Arc<GameRecord>>,
    visible: Vec<Arc<GameRecord>>,
    criteria: FilterCriteria,
    sort_key: Option<SortKey>,
    selection: Option<Arc<GameRecord>>,
}

impl Default for DashboardController {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardController {
    pub fn new() -> Self {
        DashboardController {
            state: LoadState::Empty,
            dataset: Vec::new(),
            visible: Vec::new(),
            criteria: FilterCriteria::default(),
            sort_key: None,
            selection: None,
        }
    }

    pub fn shared() -> SharedController {
        Arc::new(RwLock::new(Self::new()))
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    // ── Load ─────────────────────────────────────────────────────────────────

    /// Store the dataset. Only valid from `Empty`; any invalid record fails the
    /// whole load and moves the controller to `LoadFailed`.
    pub fn load(&mut self, records: Vec<GameRecord>) -> Result<(), LoadError> {
        if self.state != LoadState::Empty {
            return Err(LoadError::AlreadyLoaded);
        }

        for (index, record) in records.iter().enumerate() {
            if let Err(reason) = record.validate() {
                let err = LoadError::InvalidRecord { index, reason };
                self.fail(err.clone());
                return Err(err);
            }
        }

        self.dataset = records.into_iter().map(Arc::new).collect();
        self.visible = self.dataset.clone();
        self.state = LoadState::Loaded { at: Utc::now() };
        info!("Loaded {} game predictions", self.dataset.len());
        Ok(())
    }

    /// Record a failed load. Ignored unless the controller is still `Empty`.
    pub fn fail(&mut self, err: LoadError) {
        if self.state != LoadState::Empty {
            warn!("Ignoring load failure in state {:?}: {}", self.state, err);
            return;
        }
        error!("Failed to load game predictions: {}", err);
        self.dataset.clear();
        self.visible.clear();
        self.selection = None;
        self.state = LoadState::LoadFailed(err);
    }

    // ── Commands ─────────────────────────────────────────────────────────────

    pub fn dispatch(&mut self, command: DashboardCommand) -> Result<(), CommandError> {
        debug!("Dashboard command: {:?}", command);
        match command {
            DashboardCommand::FilterChanged(criteria) => self.on_filter_change(criteria),
            DashboardCommand::SortRequested(key) => self.on_sort_change(key),
            DashboardCommand::GameSelected(index) => {
                self.select_game(index)?;
            }
        }
        Ok(())
    }

    /// Re-derive the visible subset from the full dataset. Clears the sort.
    pub fn on_filter_change(&mut self, criteria: FilterCriteria) {
        let normalized = criteria.clone().normalized();
        if normalized != criteria {
            warn!(
                "Unusable min_edge {} replaced with {}",
                criteria.min_edge, normalized.min_edge
            );
        }
        self.visible = filter(&self.dataset, &normalized);
        self.criteria = normalized;
        self.sort_key = None;
        debug!(
            "Filter {:?} → {}/{} games visible",
            self.criteria,
            self.visible.len(),
            self.dataset.len()
        );
    }

    /// Sort the currently visible subset (not the full dataset).
    pub fn on_sort_change(&mut self, key: SortKey) {
        self.visible = sort_by_key(&self.visible, key);
        self.sort_key = Some(key);
        debug!("Sorted {} visible games by {}", self.visible.len(), key);
    }

    /// Select the game at `index` in the visible subset.
    pub fn select_game(&mut self, index: usize) -> Result<&GameRecord, SelectionError> {
        let game = self
            .visible
            .get(index)
            .cloned()
            .ok_or(SelectionError::OutOfRange {
                index,
                len: self.visible.len(),
            })?;
        debug!("Selected {} vs {}", game.home, game.away);
        let selected: &GameRecord = self.selection.insert(game);
        Ok(selected)
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    pub fn rows(&self) -> Vec<RowView> {
        self.visible
            .iter()
            .map(|g| {
                let warnings = projection_warnings(g);
                if !warnings.is_empty() {
                    debug!("{} vs {}: placeholders for {:?}", g.home, g.away, warnings);
                }
                project_row(g)
            })
            .collect()
    }

    pub fn visible(&self) -> &[Arc<GameRecord>] {
        &self.visible
    }

    pub fn selection(&self) -> Option<&GameRecord> {
        self.selection.as_deref()
    }

    pub fn chart(&self) -> Option<ChartValues> {
        self.selection().map(project_chart)
    }

    /// Team names for the team selector, taken from the full dataset.
    pub fn teams(&self) -> Vec<String> {
        extract_teams(&self.dataset)
    }

    pub fn status(&self) -> DashboardStatus {
        let (state, loaded_at, error) = match self.state() {
            LoadState::Empty => ("empty", None, None),
            LoadState::Loaded { at } => ("loaded", Some(*at), None),
            LoadState::LoadFailed(e) => ("load_failed", None, Some(e.to_string())),
        };
        DashboardStatus {
            state,
            loaded_at,
            error,
            total_games: self.dataset.len(),
            visible_games: self.visible().len(),
            criteria: self.criteria.clone(),
            sort_key: self.sort_key,
            has_selection: self.selection.is_some(),
        }
    }
}

/// Fetch from `source` and hand the result to the controller.
///
/// The lock is not held while the fetch is in flight.
pub async fn load_dataset(controller: &SharedController, source: &dyn GameSource) {
    info!("Loading game predictions from {}", source.name());
    let fetched = source.fetch().await;

    let mut ctl = controller.write().await;
    match fetched {
        Ok(records) => match ctl.load(records) {
            Ok(()) => {}
            Err(LoadError::AlreadyLoaded) => warn!(
                "Ignoring data from {}: dataset already loaded ({:?})",
                source.name(),
                ctl.state()
            ),
            // invalid records were already logged by `fail`
            Err(_) => {}
        },
        Err(e) => ctl.fail(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TeamFilter;
    use approx::assert_relative_eq;
    use async_trait::async_trait;

    fn game(home: &str, away: &str, edge_home: Option<f64>) -> GameRecord {
        GameRecord {
            home: home.into(),
            away: away.into(),
            win_prob_home: 0.55,
            win_prob_away: 0.45,
            edge_home,
            edge_away: None,
            expected_diff: 1.5,
            p_spread_home_cover: None,
            p_total_over: None,
        }
    }

    fn three_games() -> Vec<GameRecord> {
        vec![
            game("BOS", "NYK", Some(2.0)),
            game("LAL", "MIA", Some(-3.0)),
            game("CHI", "BOS", None),
        ]
    }

    fn loaded(records: Vec<GameRecord>) -> DashboardController {
        let mut ctl = DashboardController::new();
        ctl.load(records).unwrap();
        ctl
    }

    fn visible_homes(ctl: &DashboardController) -> Vec<String> {
        ctl.visible().iter().map(|g| g.home.clone()).collect()
    }

    struct StubSource(Result<Vec<GameRecord>, LoadError>);

    #[async_trait]
    impl GameSource for StubSource {
        async fn fetch(&self) -> Result<Vec<GameRecord>, LoadError> {
            self.0.clone()
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    #[test]
    fn load_moves_empty_to_loaded() {
        let ctl = loaded(three_games());
        assert!(matches!(ctl.state(), LoadState::Loaded { .. }));
        assert_eq!(ctl.rows().len(), 3);
        assert_eq!(ctl.status().state, "loaded");
        assert!(ctl.selection().is_none());
    }

    #[test]
    fn second_load_is_rejected() {
        let mut ctl = loaded(three_games());
        assert_eq!(ctl.load(vec![]), Err(LoadError::AlreadyLoaded));
        assert_eq!(ctl.visible().len(), 3);
    }

    #[test]
    fn invalid_record_fails_whole_load() {
        let mut bad = three_games();
        bad[2].win_prob_away = -0.1;
        let mut ctl = DashboardController::new();
        let err = ctl.load(bad).unwrap_err();
        assert!(matches!(err, LoadError::InvalidRecord { index: 2, .. }));
        assert!(matches!(ctl.state(), LoadState::LoadFailed(_)));
        assert!(ctl.rows().is_empty());
        assert!(ctl.teams().is_empty());
        assert_eq!(ctl.status().state, "load_failed");
        assert!(ctl.status().error.is_some());
    }

    #[test]
    fn failed_state_is_terminal() {
        let mut ctl = DashboardController::new();
        ctl.fail(LoadError::NotASequence);
        assert_eq!(ctl.load(three_games()), Err(LoadError::AlreadyLoaded));
        assert!(ctl.visible().is_empty());
    }

    #[test]
    fn filter_rederives_from_full_dataset() {
        let mut ctl = loaded(three_games());
        ctl.on_filter_change(FilterCriteria::new(TeamFilter::Team("LAL".into()), 0.0));
        assert_eq!(visible_homes(&ctl), vec!["LAL"]);

        // Not cumulative: a broader filter brings the other rows back.
        ctl.on_filter_change(FilterCriteria::new(TeamFilter::Team("BOS".into()), 0.0));
        assert_eq!(visible_homes(&ctl), vec!["BOS", "CHI"]);
    }

    #[test]
    fn sort_applies_to_visible_subset_and_filter_resets_it() {
        let mut ctl = loaded(three_games());
        ctl.on_filter_change(FilterCriteria::new(TeamFilter::All, 1.0));
        ctl.on_sort_change(SortKey::EdgeHome);
        assert_eq!(visible_homes(&ctl), vec!["LAL", "BOS"]);
        assert_eq!(ctl.status().sort_key, Some(SortKey::EdgeHome));

        ctl.on_filter_change(FilterCriteria::default());
        assert_eq!(visible_homes(&ctl), vec!["BOS", "LAL", "CHI"]);
        assert_eq!(ctl.status().sort_key, None);
    }

    #[test]
    fn negative_min_edge_is_normalized() {
        let mut ctl = loaded(three_games());
        ctl.on_filter_change(FilterCriteria::new(TeamFilter::All, -5.0));
        assert_eq!(ctl.status().criteria.min_edge, 0.0);
        assert_eq!(ctl.visible().len(), 3);
    }

    #[test]
    fn select_out_of_range_keeps_previous_selection() {
        let mut ctl = loaded(three_games());
        ctl.select_game(1).unwrap();
        let err = ctl.select_game(99).unwrap_err();
        assert_eq!(err, SelectionError::OutOfRange { index: 99, len: 3 });
        assert_eq!(ctl.selection().map(|g| g.home.as_str()), Some("LAL"));
    }

    #[test]
    fn selection_indexes_into_visible_subset() {
        let mut ctl = loaded(three_games());
        ctl.on_sort_change(SortKey::EdgeHome);
        let selected = ctl.select_game(0).unwrap();
        assert_eq!(selected.home, "LAL");

        let chart = ctl.chart().unwrap();
        assert_eq!(chart.title, "LAL vs MIA");
        assert_relative_eq!(chart.values[0], 55.0, epsilon = 1e-9);
        assert_relative_eq!(chart.values[1], 45.0, epsilon = 1e-9);
        assert_relative_eq!(chart.values[2], 1.5, epsilon = 1e-9);
    }

    #[test]
    fn selection_survives_filter_change() {
        let mut ctl = loaded(three_games());
        ctl.select_game(0).unwrap();
        ctl.on_filter_change(FilterCriteria::new(TeamFilter::Team("LAL".into()), 0.0));
        assert_eq!(ctl.selection().map(|g| g.home.as_str()), Some("BOS"));
    }

    #[test]
    fn dispatch_routes_commands() {
        let mut ctl = loaded(three_games());
        ctl.dispatch(DashboardCommand::SortRequested(SortKey::EdgeHome)).unwrap();
        ctl.dispatch(DashboardCommand::GameSelected(2)).unwrap();
        assert_eq!(ctl.selection().map(|g| g.home.as_str()), Some("BOS"));
        assert_eq!(
            ctl.dispatch(DashboardCommand::GameSelected(3)),
            Err(CommandError::Selection(SelectionError::OutOfRange { index: 3, len: 3 }))
        );
    }

    #[test]
    fn command_wire_format() {
        let cmd: DashboardCommand =
            serde_json::from_str(r#"{"type":"sort_requested","value":"edge_away"}"#).unwrap();
        assert_eq!(cmd, DashboardCommand::SortRequested(SortKey::EdgeAway));
    }

    #[test]
    fn teams_cover_full_dataset_even_when_filtered() {
        let mut ctl = loaded(three_games());
        ctl.on_filter_change(FilterCriteria::new(TeamFilter::Team("LAL".into()), 0.0));
        assert_eq!(ctl.teams(), vec!["BOS", "NYK", "LAL", "MIA", "CHI"]);
    }

    #[test]
    fn end_to_end_filter_then_sort() {
        let records = vec![game("TeamA", "TeamB", Some(5.0)), game("TeamC", "TeamD", Some(0.0))];

        let mut ctl = loaded(records);
        ctl.on_filter_change(FilterCriteria::new(TeamFilter::Team("TeamA".into()), 1.0));
        assert_eq!(visible_homes(&ctl), vec!["TeamA"]);

        ctl.on_filter_change(FilterCriteria::default());
        ctl.on_sort_change(SortKey::EdgeHome);
        assert_eq!(visible_homes(&ctl), vec!["TeamC", "TeamA"]);
        assert_eq!(ctl.rows()[0].match_label, "TeamC - TeamD");
    }

    #[tokio::test]
    async fn load_dataset_from_source() {
        let shared = DashboardController::shared();
        load_dataset(&shared, &StubSource(Ok(three_games()))).await;
        let ctl = shared.read().await;
        assert_eq!(ctl.status().total_games, 3);
        assert!(ctl.status().loaded_at.is_some());
    }

    #[tokio::test]
    async fn second_load_dataset_keeps_first_dataset() {
        let shared = DashboardController::shared();
        load_dataset(&shared, &StubSource(Ok(three_games()))).await;
        load_dataset(&shared, &StubSource(Ok(vec![game("SEA", "DEN", None)]))).await;
        let ctl = shared.read().await;
        assert!(matches!(ctl.state(), LoadState::Loaded { .. }));
        assert_eq!(ctl.status().total_games, 3);
        assert!(!ctl.teams().contains(&"SEA".to_string()));
    }

    #[tokio::test]
    async fn load_dataset_failure_leaves_empty_failed_state() {
        let shared = DashboardController::shared();
        let err = LoadError::Status {
            source_name: "stub".into(),
            status: 503,
        };
        load_dataset(&shared, &StubSource(Err(err.clone()))).await;
        let ctl = shared.read().await;
        assert_eq!(ctl.state(), &LoadState::LoadFailed(err));
        assert!(ctl.rows().is_empty());
    }
}
