pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod interface;
pub mod models;
pub mod planner;
pub mod report;

pub use catalog::{Catalog, FoodRepository};
pub use config::AppConfig;
pub use error::{PlanError, Result};
pub use models::{PatientProfile, PlanGoals, PlanRecord, PlanRequest};
pub use planner::{generate_plan, PlannerConfig};
pub use report::{process_plan, render_report, FormatterConfig, ProcessedReport};
