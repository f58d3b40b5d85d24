use super::model::{Table, Value};

/// Fewer numeric columns than this and no chart is offered.
pub const MIN_NUMERIC_COLUMNS: usize = 3;

/// Position, among the numeric columns, of the column that gets charted.
pub const CHART_COLUMN_INDEX: usize = 2;

/// A numeric series ready to be drawn as a bar chart.
/// `None` entries are gaps (missing values).
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub column: String,
    pub values: Vec<Option<f64>>,
}

/// Result of preparing a table for charting.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSummary {
    Series(Series),
    /// Advisory: the table does not have enough numeric columns to chart.
    NotEnoughData { numeric_columns: usize },
}

/// Pick the third numeric column of `table` as the series to chart.
pub fn summarize(table: &Table) -> ChartSummary {
    let numeric: Vec<_> = table.columns().iter().filter(|c| c.is_numeric()).collect();

    match numeric.get(CHART_COLUMN_INDEX) {
        Some(column) if numeric.len() >= MIN_NUMERIC_COLUMNS => ChartSummary::Series(Series {
            column: column.name().to_string(),
            values: column.values().iter().map(Value::as_f64).collect(),
        }),
        _ => ChartSummary::NotEnoughData {
            numeric_columns: numeric.len(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn num_col(name: &str, values: &[f64]) -> Column {
        Column::new(name, values.iter().map(|v| Value::Number(*v)).collect())
    }

    #[test]
    fn two_numeric_columns_is_not_enough() {
        let table = Table::new(vec![
            num_col("a", &[1.0]),
            Column::new("label", vec![Value::Text("x".into())]),
            num_col("b", &[2.0]),
        ])
        .unwrap();

        assert_eq!(
            summarize(&table),
            ChartSummary::NotEnoughData { numeric_columns: 2 }
        );
    }

    #[test]
    fn third_numeric_column_is_charted() {
        let table = Table::new(vec![
            num_col("a", &[1.0, 2.0]),
            Column::new("label", vec![Value::Text("x".into()), Value::Text("y".into())]),
            num_col("b", &[3.0, 4.0]),
            Column::new("c", vec![Value::Number(5.0), Value::Missing]),
            num_col("d", &[7.0, 8.0]),
        ])
        .unwrap();

        let ChartSummary::Series(series) = summarize(&table) else {
            panic!("expected a series");
        };
        assert_eq!(series.column, "c");
        assert_eq!(series.values, vec![Some(5.0), None]);
    }

    #[test]
    fn empty_table_is_not_enough() {
        assert_eq!(
            summarize(&Table::default()),
            ChartSummary::NotEnoughData { numeric_columns: 0 }
        );
    }
}
