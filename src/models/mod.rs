pub mod component;
pub mod food;
pub mod plan;
pub mod profile;
pub mod request;

pub use component::{Fill, Ingredient, Macro, MealComponent, Role, SlotTemplate, SubstitutionGroup, TemplateEntry};
pub use food::{Basis, FoodCategory, FoodEntry, Macros};
pub use plan::{
    MealLineItem, MealSlot, NutritionTargets, PlanRecord, PlanSummary, PrecisionAdjustment,
    RecipeCard, SlotKind, SlotSubstitutions,
};
pub use profile::{ActivityLevel, Goal, PatientProfile, PlanGoals, Sex};
pub use request::{GoalsInput, PatientInput, PlanRequest};
