mod budget;
mod export;
mod formatter;

pub use budget::{process_plan, ProcessedReport, ReportStatus};
pub use export::{write_items_csv, write_record_json};
pub use formatter::{
    align_calories, render_continuation, render_essential, render_report, FormatterConfig,
    DEFAULT_BUDGET_CEILING, DEFAULT_BUDGET_LIMIT, DEFAULT_CALORIE_COLUMN,
};
