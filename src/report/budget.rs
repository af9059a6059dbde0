use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PlanError, Result};
use crate::models::PlanRecord;
use crate::report::formatter::{
    render_continuation, render_essential, render_report, FormatterConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Complete,
    Partial,
}

/// A rendered report that fits the character budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedReport {
    pub status: ReportStatus,
    pub formatted_text: String,
    pub continuation_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation_text: Option<String>,
}

/// Render a plan within the configured character budget.
///
/// Returns the full report when it fits. Otherwise splits it into the essential
/// segment and a continuation segment. Fails with `BudgetExceeded` if the
/// essential segment alone is over the limit.
pub fn process_plan(record: &PlanRecord, config: &FormatterConfig) -> Result<ProcessedReport> {
    config.validate()?;
    let limit = config.budget_limit;

    let full = render_report(record, config);
    let full_length = full.chars().count();
    if full_length <= limit {
        debug!(length = full_length, limit, "report fits budget");
        return Ok(ProcessedReport {
            status: ReportStatus::Complete,
            formatted_text: full,
            continuation_available: false,
            continuation_text: None,
        });
    }

    let essential = render_essential(record, config);
    let length = essential.chars().count();
    if length > limit {
        return Err(PlanError::BudgetExceeded { length, limit });
    }

    info!(
        full = full_length,
        essential = length,
        limit,
        "report split into essential and continuation segments"
    );
    Ok(ProcessedReport {
        status: ReportStatus::Partial,
        formatted_text: essential,
        continuation_available: true,
        continuation_text: Some(render_continuation(record, config)),
    })
}
