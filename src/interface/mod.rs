pub mod prompts;
pub mod render;

pub use prompts::{
    prompt_food_match, prompt_goals, prompt_patient, prompt_plan_request, prompt_yes_no,
};
pub use render::{display_food, display_food_list, display_plan_summary, display_report};
