/// Data layer: table model, format adapter, cleaning, projection, charting.
///
/// Architecture:
/// ```text
///  .csv / .xlsx bytes
///        │
///        ▼
///   ┌──────────┐
///   │  format   │  decode bytes → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  drop duplicates / fill numeric gaps (on demand)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ project   │  keep the selected columns, in order
///   └──────────┘
///        │
///        ├──────────────► chart   → third numeric column (or advisory)
///        ▼
///   ┌──────────┐
///   │  format   │  encode Table → .csv / .xlsx bytes
///   └──────────┘
/// ```

pub mod chart;
pub mod clean;
pub mod format;
pub mod model;
pub mod project;
