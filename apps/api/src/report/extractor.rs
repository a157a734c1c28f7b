//! Turns a raw generated text block into a bounded task list.

use crate::report::models::TaskList;

/// Splits on line boundaries, trims each line, drops blank lines and keeps
/// the first `MAX_TASKS` in order. Short or empty output is not an error.
pub fn extract_tasks(raw: &str) -> TaskList {
    TaskList::from_items(
        raw.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string),
    )
}
