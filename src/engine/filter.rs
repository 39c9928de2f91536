use std::borrow::Borrow;
use std::collections::HashSet;

use super::record;
use crate::model::{FilterCriteria, GameRecord};

/// Keep the records that match `criteria`, preserving input order.
///
/// A record passes when it involves the selected team (or the team is
/// "All") and its largest absolute edge reaches `min_edge`. Missing edges
/// count as zero, so `min_edge = 0` admits everything.
///
/// Works over owned records, references or `Arc`s alike.
pub fn filter<T>(records: &[T], criteria: &FilterCriteria) -> Vec<T>
where
    T: Borrow<GameRecord> + Clone,
{
    records
        .iter()
        .filter(|r| {
            let game = record(*r);
            criteria.team.matches(game) && game.edge_magnitude() >= criteria.min_edge
        })
        .cloned()
        .collect()
}

/// Distinct team names for the team selector, in first-appearance order.
pub fn extract_teams<T: Borrow<GameRecord>>(records: &[T]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut teams = Vec::new();
    for r in records {
        let game = record(r);
        for name in [&game.home, &game.away] {
            if !name.is_empty() && seen.insert(name.as_str()) {
                teams.push(name.clone());
            }
        }
    }
    teams
}
