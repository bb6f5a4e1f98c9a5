pub mod adjustment;
pub mod annual;
pub mod cumulative;

pub use adjustment::{apply_adjustment, clamp_adjustment, parse_adjustment, CashFlowBase};
pub use annual::{projection_years, records_for_year, summarize_years, YearlyProjection};
pub use cumulative::{
    build_projection, project_adjusted, project_cumulative, MonthlyCumulativeRecord,
    ProjectionInput,
};
