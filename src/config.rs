use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::planner::PlannerConfig;
use crate::report::FormatterConfig;

/// Application settings. Every field is optional in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub planner: PlannerConfig,
    pub formatter: FormatterConfig,
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(text)?;
        config.planner.validate()?;
        config.formatter.validate()?;
        Ok(config)
    }

    /// Load settings from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load from `path` when given, defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_json(r#"{"formatter": {"calorie_column": 80}}"#).unwrap();
        assert_eq!(config.formatter.calorie_column, 80);
        assert_eq!(config.formatter.budget_limit, 7500);
        assert_eq!(config.planner, PlannerConfig::default());
    }

    #[test]
    fn test_limit_above_ceiling_rejected() {
        let result = AppConfig::from_json(r#"{"formatter": {"budget_limit": 8500}}"#);
        assert!(matches!(result, Err(PlanError::InvalidInput(_))));
    }

    #[test]
    fn test_powder_min_above_max_rejected() {
        let result = AppConfig::from_json(r#"{"planner": {"night_snack_powder_min_g": 40}}"#);
        assert!(matches!(result, Err(PlanError::InvalidInput(_))));
    }

    #[test]
    fn test_bad_planner_values_rejected() {
        for json in [
            r#"{"planner": {"night_snack_powder_min_g": -1}}"#,
            r#"{"planner": {"precision_tolerance_kcal": -5}}"#,
            r#"{"planner": {"protein_powder_id": ""}}"#,
            r#"{"planner": {"pre_workout_food_id": "  "}}"#,
        ] {
            assert!(
                matches!(AppConfig::from_json(json), Err(PlanError::InvalidInput(_))),
                "accepted {}",
                json
            );
        }
    }

    #[test]
    fn test_equal_powder_bounds_accepted() {
        let config = AppConfig::from_json(
            r#"{"planner": {"night_snack_powder_min_g": 20, "night_snack_powder_max_g": 20}}"#,
        )
        .unwrap();
        assert_eq!(config.planner.night_snack_powder_min_g, 20.0);
    }
}
