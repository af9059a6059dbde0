use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Accepts "M"/"F", English and Portuguese words.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "m" | "male" | "masculino" => Ok(Sex::Male),
            "f" | "female" | "feminino" => Ok(Sex::Female),
            other => Err(PlanError::InvalidInput(format!("unknown sex '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    VeryActive,
    ExtraActive,
}

impl ActivityLevel {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "sedentary" | "sedentario" => Ok(ActivityLevel::Sedentary),
            "light" | "lightly_active" | "leve" => Ok(ActivityLevel::Light),
            "moderate" | "moderately_active" | "moderado" => Ok(ActivityLevel::Moderate),
            "very_active" | "intenso" => Ok(ActivityLevel::VeryActive),
            "extra_active" | "muito_intenso" => Ok(ActivityLevel::ExtraActive),
            other => Err(PlanError::InvalidInput(format!(
                "unknown activity level '{}'",
                other
            ))),
        }
    }

    /// TDEE multiplier applied to basal metabolic rate.
    pub fn factor(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Maintenance,
    Gain,
    Loss,
}

impl Goal {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "maintenance" | "manutencao" | "manutenção" => Ok(Goal::Maintenance),
            "gain" | "ganho" | "hipertrofia" => Ok(Goal::Gain),
            "loss" | "perda" | "emagrecimento" => Ok(Goal::Loss),
            other => Err(PlanError::InvalidInput(format!("unknown goal '{}'", other))),
        }
    }

    /// Multiplier applied to maintenance energy.
    pub fn energy_factor(&self) -> f64 {
        match self {
            Goal::Maintenance => 1.0,
            Goal::Gain => 1.1,
            Goal::Loss => 0.8,
        }
    }

    /// Diet classification shown in the report.
    pub fn diet_type(&self) -> &'static str {
        match self {
            Goal::Maintenance => "Normocalórica",
            Goal::Gain => "Hipercalórica",
            Goal::Loss => "Hipocalórica",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Goal::Maintenance => "Manutenção de peso",
            Goal::Gain => "Ganho de massa muscular",
            Goal::Loss => "Perda de gordura",
        }
    }
}

/// Validated patient data for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub name: String,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub sex: Sex,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

impl PatientProfile {
    /// Mifflin-St Jeor basal metabolic rate in kcal/day.
    pub fn basal_metabolic_rate(&self) -> f64 {
        let base = 10.0 * self.weight_kg + 6.25 * self.height_cm - 5.0 * self.age as f64;
        match self.sex {
            Sex::Male => base + 5.0,
            Sex::Female => base - 161.0,
        }
    }

    /// Daily energy estimate for the profile's activity and goal, rounded to 10 kcal.
    pub fn estimated_energy(&self) -> f64 {
        let tdee = self.basal_metabolic_rate() * self.activity_level.factor();
        (tdee * self.goal.energy_factor() / 10.0).round() * 10.0
    }
}

/// Validated targets and plan options for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanGoals {
    pub total_kcal: f64,
    pub protein_min_g_per_kg: f64,
    pub carbs_max_pct: f64,
    pub fat_max_pct: f64,
    pub fiber_min_g: f64,
    pub meal_count: u8,
    pub pre_workout: bool,
    pub pre_workout_kcal: f64,
    pub special_dinner: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> PatientProfile {
        PatientProfile {
            name: "João".to_string(),
            weight_kg: 75.0,
            height_cm: 178.0,
            age: 30,
            sex: Sex::Male,
            activity_level: ActivityLevel::Moderate,
            goal: Goal::Maintenance,
        }
    }

    #[test]
    fn test_bmr_male() {
        // 750 + 1112.5 - 150 + 5
        assert!((profile().basal_metabolic_rate() - 1717.5).abs() < 1e-9);
    }

    #[test]
    fn test_estimated_energy_rounds_to_ten() {
        // 1717.5 * 1.55 = 2662.125
        assert!((profile().estimated_energy() - 2660.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!(Sex::parse("M").unwrap(), Sex::Male);
        assert_eq!(Sex::parse("feminino").unwrap(), Sex::Female);
        assert_eq!(
            ActivityLevel::parse("very-active").unwrap(),
            ActivityLevel::VeryActive
        );
        assert_eq!(Goal::parse("Perda").unwrap(), Goal::Loss);
        assert!(Goal::parse("bulk").is_err());
    }
}
