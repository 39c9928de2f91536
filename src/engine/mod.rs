pub mod filter;
pub mod projector;
pub mod sort;
pub mod theme;

pub use filter::{extract_teams, filter};
pub use projector::{project_chart, project_row, projection_warnings, ChartValues, RowView};
pub use sort::sort_by_key;
pub use theme::{ChartStyle, Theme};

use std::borrow::Borrow;

use crate::model::GameRecord;

/// View any record holder (owned, `&`, `Arc`) as a plain record.
fn record<T: Borrow<GameRecord>>(r: &T) -> &GameRecord {
    <T as Borrow<GameRecord>>::borrow(r)
}
