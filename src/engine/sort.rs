use std::borrow::Borrow;
use std::cmp::Ordering;

use super::record;
use crate::model::{GameRecord, SortKey};

/// Return a new sequence ordered ascending by `key`.
///
/// Absent values sort as 0. The sort is stable, so equal keys keep their
/// input order and sorting an already-sorted sequence changes nothing.
pub fn sort_by_key<T>(records: &[T], key: SortKey) -> Vec<T>
where
    T: Borrow<GameRecord> + Clone,
{
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| compare(record(a), record(b), key));
    sorted
}

fn compare(a: &GameRecord, b: &GameRecord, key: SortKey) -> Ordering {
    let va = key.value(a).unwrap_or(0.0);
    let vb = key.value(b).unwrap_or(0.0);
    if va < vb {
        Ordering::Less
    } else if va > vb {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(label: &str, edge_home: Option<f64>, total: Option<f64>, diff: f64) -> GameRecord {
        GameRecord {
            home: label.into(),
            away: "X".into(),
            win_prob_home: 0.5,
            win_prob_away: 0.5,
            edge_home,
            edge_away: None,
            expected_diff: diff,
            p_spread_home_cover: None,
            p_total_over: total,
        }
    }

    fn homes(records: &[GameRecord]) -> Vec<&str> {
        records.iter().map(|g| g.home.as_str()).collect()
    }

    #[test]
    fn sorts_ascending() {
        let records = vec![
            game("a", Some(2.0), None, 3.0),
            game("b", Some(-1.0), None, -2.0),
            game("c", Some(0.5), None, 1.0),
        ];
        assert_eq!(homes(&sort_by_key(&records, SortKey::EdgeHome)), vec!["b", "c", "a"]);
        assert_eq!(homes(&sort_by_key(&records, SortKey::ExpectedDiff)), vec!["b", "c", "a"]);
    }

    #[test]
    fn missing_values_sort_as_zero() {
        let records = vec![
            game("pos", Some(1.0), None, 0.0),
            game("none", None, None, 0.0),
            game("neg", Some(-1.0), None, 0.0),
        ];
        assert_eq!(
            homes(&sort_by_key(&records, SortKey::EdgeHome)),
            vec!["neg", "none", "pos"]
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let records = vec![
            game("first", None, Some(0.5), 0.0),
            game("second", None, None, 0.0),
            game("third", None, Some(0.5), 0.0),
            game("fourth", None, Some(0.0), 0.0),
        ];
        assert_eq!(
            homes(&sort_by_key(&records, SortKey::TotalOver)),
            vec!["second", "fourth", "first", "third"]
        );
    }

    #[test]
    fn sorting_twice_is_idempotent() {
        let records = vec![
            game("a", Some(1.0), None, 0.0),
            game("b", None, None, 0.0),
            game("c", Some(1.0), None, 0.0),
            game("d", Some(0.0), None, 0.0),
        ];
        let once = sort_by_key(&records, SortKey::EdgeHome);
        let twice = sort_by_key(&once, SortKey::EdgeHome);
        assert_eq!(once, twice);
    }

    #[test]
    fn input_is_left_untouched() {
        let records = vec![game("a", Some(2.0), None, 0.0), game("b", Some(1.0), None, 0.0)];
        let _ = sort_by_key(&records, SortKey::EdgeHome);
        assert_eq!(homes(&records), vec!["a", "b"]);
    }
}
