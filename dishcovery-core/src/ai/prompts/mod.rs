//! AI prompt templates.

pub mod food_identify;
pub mod image_triage;
pub mod recipe_suggest;

pub use food_identify::render_food_identify_prompt;
pub use image_triage::render_image_triage_prompt;
pub use recipe_suggest::render_recipe_suggest_prompt;
