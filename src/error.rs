use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Food not found: {0}")]
    FoodNotFound(String),

    #[error("Meal component not found: {0}")]
    ComponentNotFound(String),

    #[error("Catalog integrity violation: {0}")]
    IntegrityViolation(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Plan exceeds the character budget even in essential form ({length} > {limit})")]
    BudgetExceeded { length: usize, limit: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;
