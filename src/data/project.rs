use super::model::{Column, Table};
use crate::error::{Result, SweepError};

// ---------------------------------------------------------------------------
// Column selection
// ---------------------------------------------------------------------------

/// Keep only the named columns, in the order given. Rows are untouched.
///
/// The selection behaves as an ordered set: a name listed twice is kept once,
/// at its first position.
pub fn project(table: Table, selected: &[String]) -> Result<Table> {
    if let Some(missing) = selected.iter().find(|name| table.column(name).is_none()) {
        return Err(SweepError::UnknownColumn(missing.clone()));
    }

    let mut pool: Vec<Option<Column>> = table.into_columns().into_iter().map(Some).collect();
    let mut columns = Vec::with_capacity(selected.len());
    for name in selected {
        let slot = pool
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|c| c.name() == name.as_str()));
        if let Some(column) = slot.and_then(Option::take) {
            columns.push(column);
        }
    }

    Table::new(columns)
}
