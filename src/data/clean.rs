use std::collections::HashSet;

use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Cleaning actions the user can trigger per file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CleaningAction {
    RemoveDuplicates,
    FillMissingNumeric,
}

impl CleaningAction {
    pub fn apply(self, table: Table) -> Table {
        match self {
            CleaningAction::RemoveDuplicates => remove_duplicates(table),
            CleaningAction::FillMissingNumeric => fill_missing_numeric(table),
        }
    }

    pub fn button_label(self) -> &'static str {
        match self {
            CleaningAction::RemoveDuplicates => "Remove Duplicates",
            CleaningAction::FillMissingNumeric => "Fill Missing Values",
        }
    }

    /// Confirmation shown once the action has run.
    pub fn success_message(self) -> &'static str {
        match self {
            CleaningAction::RemoveDuplicates => "Duplicates removed!",
            CleaningAction::FillMissingNumeric => "Missing values have been filled!",
        }
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Drop every row equal (across all columns) to an earlier row.
/// First occurrences survive in their original order.
pub fn remove_duplicates(table: Table) -> Table {
    let mut seen: HashSet<Vec<&Value>> = HashSet::with_capacity(table.row_count());
    let keep: Vec<bool> = table.rows().map(|row| seen.insert(row)).collect();
    drop(seen);

    let before = table.row_count();
    let table = table.retain_rows(&keep);
    log::debug!("Removed {} duplicate rows", before - table.row_count());
    table
}

/// Replace missing entries of each numeric column with the mean of that
/// column's non-missing values. Text columns and all-missing columns are
/// left as they are.
pub fn fill_missing_numeric(mut table: Table) -> Table {
    for column in table.columns_mut() {
        if !column.is_numeric() {
            continue;
        }

        let (sum, count) = column
            .numbers()
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        if count == 0 {
            log::warn!(
                "Column '{}' has no values to average; leaving it unfilled",
                column.name()
            );
            continue;
        }
        let mean = sum / count as f64;

        let mut filled = 0usize;
        for value in column.values_mut().iter_mut().filter(|v| v.is_missing()) {
            *value = Value::Number(mean);
            filled += 1;
        }
        if filled > 0 {
            log::debug!("Filled {filled} missing values in '{}' with {mean}", column.name());
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn num(v: f64) -> Value {
        Value::Number(v)
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_owned())
    }

    fn sample() -> Table {
        Table::new(vec![
            Column::new("id", vec![num(1.0), num(1.0), num(2.0), num(1.0), num(3.0)]),
            Column::new(
                "value",
                vec![num(5.0), num(5.0), Value::Missing, num(5.0), Value::Missing],
            ),
            Column::new("tag", vec![text("a"), text("a"), text("b"), text("z"), Value::Missing]),
        ])
        .unwrap()
    }

    #[test]
    fn duplicates_keep_first_occurrence_in_order() {
        let deduped = remove_duplicates(sample());
        assert_eq!(deduped.row_count(), 4);
        assert_eq!(
            deduped.column("tag").unwrap().values(),
            &[text("a"), text("b"), text("z"), Value::Missing]
        );
    }

    #[test]
    fn remove_duplicates_is_idempotent() {
        let once = remove_duplicates(sample());
        let twice = remove_duplicates(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_values_compare_equal_when_deduplicating() {
        let table = Table::new(vec![Column::new("x", vec![Value::Missing, Value::Missing])]).unwrap();
        assert_eq!(remove_duplicates(table).row_count(), 1);
    }

    #[test]
    fn fill_uses_mean_of_original_values() {
        let table = Table::new(vec![Column::new(
            "v",
            vec![num(1.0), Value::Missing, num(4.0), Value::Missing],
        )])
        .unwrap();

        let filled = fill_missing_numeric(table);
        assert_eq!(
            filled.columns()[0].values(),
            &[num(1.0), num(2.5), num(4.0), num(2.5)]
        );
    }

    #[test]
    fn fill_leaves_text_columns_alone() {
        let filled = fill_missing_numeric(sample());
        assert_eq!(filled.column("tag").unwrap().values()[4], Value::Missing);
        assert!(filled.column("value").unwrap().values().iter().all(|v| !v.is_missing()));
    }

    #[test]
    fn fill_skips_all_missing_numeric_column() {
        let table = Table::new(vec![
            Column::new("empty", vec![Value::Missing, Value::Missing]),
            Column::new("n", vec![num(3.0), Value::Missing]),
        ])
        .unwrap();

        let filled = fill_missing_numeric(table);
        assert_eq!(
            filled.column("empty").unwrap().values(),
            &[Value::Missing, Value::Missing]
        );
        assert_eq!(filled.column("n").unwrap().values(), &[num(3.0), num(3.0)]);
    }

    #[test]
    fn dedupe_then_fill_scenario() -> anyhow::Result<()> {
        let table = crate::data::format::decode(
            b"id,value\n1,5\n1,5\n2,\n",
            crate::data::format::TableFormat::Csv,
        )?;

        let deduped = CleaningAction::RemoveDuplicates.apply(table);
        assert_eq!(deduped.row_count(), 2);
        assert_eq!(deduped.row(1).unwrap(), vec![&num(2.0), &Value::Missing]);

        let filled = CleaningAction::FillMissingNumeric.apply(deduped);
        assert_eq!(filled.row(1).unwrap(), vec![&num(2.0), &num(5.0)]);
        Ok(())
    }
}
