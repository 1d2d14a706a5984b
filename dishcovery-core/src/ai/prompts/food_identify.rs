//! Food identification prompt, sent only after triage indicates food.

/// Prompt name for cache keys.
pub const FOOD_IDENTIFY_PROMPT_NAME: &str = "food_identify";

/// Render the identification prompt. `preferences` is the user's free-text
/// dietary/profile notes, injected when present.
pub fn render_food_identify_prompt(preferences: Option<&str>) -> String {
    let preferences_line = match preferences {
        Some(about) if !about.is_empty() => {
            format!(
                "Note that the user has the following preferences/dietary info: {}\n",
                about
            )
        }
        _ => String::new(),
    };

    format!(
        r#"Identify the food item in this image and provide just the name.
{preferences_line}Output only the food item name, nothing else.
Be specific but concise (1-3 words).
If you cannot identify any food in the image, just respond with "NOT_FOOD" exactly."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prompt_without_preferences() {
        let prompt = render_food_identify_prompt(None);
        assert!(prompt.contains("1-3 words"));
        assert!(prompt.contains("NOT_FOOD"));
        assert!(!prompt.contains("preferences/dietary info"));
    }

    #[test]
    fn test_render_prompt_with_preferences() {
        let prompt = render_food_identify_prompt(Some("vegetarian, no peanuts"));
        assert!(prompt.contains("vegetarian, no peanuts"));
        assert!(prompt.contains("preferences/dietary info"));
    }

    #[test]
    fn test_empty_preferences_are_skipped() {
        let prompt = render_food_identify_prompt(Some(""));
        assert!(!prompt.contains("preferences/dietary info"));
    }
}
