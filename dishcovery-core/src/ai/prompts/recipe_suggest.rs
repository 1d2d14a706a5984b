//! Recipe suggestion prompt: inventory-driven, JSON-constrained.

/// Prompt name for cache keys.
pub const RECIPE_SUGGEST_PROMPT_NAME: &str = "recipe_suggest";

/// Render the suggestion prompt.
///
/// Expiring ingredients are listed first as priority-use, fresh ones as
/// secondary; the model is explicitly warned away from expired ones. On
/// retries the model is told to diversify from its earlier suggestions.
pub fn render_recipe_suggest_prompt(
    about_info: &str,
    retry_count: u32,
    expiring_soon: &[String],
    fresh: &[String],
    expired: &[String],
) -> String {
    let preferences_line = if about_info.is_empty() {
        String::new()
    } else {
        format!("User profile and preferences: {}\n", about_info)
    };

    let retry_line = if retry_count > 0 {
        format!(
            "This is attempt #{}. Please suggest DIFFERENT recipes than previously.\n",
            retry_count + 1
        )
    } else {
        String::new()
    };

    let expired_warning = if expired.is_empty() {
        String::new()
    } else {
        format!(
            "Warning: These ingredients are expired and should not be used: {}\n",
            expired.join(", ")
        )
    };

    format!(
        r#"I want you to generate personalized recipe suggestions that I can cook.
{preferences_line}{retry_line}
Based on these ingredients, suggest 3 different recipes I can make.
Prioritize using ingredients that expire soon.

Ingredients that are expiring soon (use these first): {expiring}
Other available ingredients: {fresh}
{expired_warning}
For each recipe, provide:
1. Recipe name
2. Ingredients needed from my inventory
3. Additional ingredients I might need to buy (with links to buy online if possible)
4. Detailed step-by-step preparation instructions (numbered list)
5. YouTube video links for the recipe tutorial

IMPORTANT: Your response must be in valid, parseable JSON format with the structure shown below.
Do not include any text, explanation, or markdown outside of the JSON.
Only include the JSON object itself with no additional formatting.

JSON format:
{{
  "recipes": [
    {{
      "name": "Recipe Name",
      "useInventoryIngredients": ["ingredient1", "ingredient2"],
      "additionalIngredients": [
        {{"name": "ingredient3", "buyLink": "https://www.swiggy.com/instamart/search?custom_back=true&query=ingredient3"}},
        {{"name": "ingredient4", "buyLink": "https://www.swiggy.com/instamart/search?custom_back=true&query=ingredient4"}}
      ],
      "instructions": [
        "Detailed instruction 1",
        "Detailed instruction 2"
      ],
      "youtubeLinks": [
        "https://www.youtube.com/results?search_query=recipe+name+tutorial",
        "https://www.youtube.com/results?search_query=how+to+make+recipe+name"
      ]
    }}
  ]
}}

Double check that:
1. The JSON is valid and can be parsed by a standard JSON parser
2. Each recipe has the five required properties: name, useInventoryIngredients, additionalIngredients, instructions, and youtubeLinks
3. All arrays and objects have proper closing brackets
4. All property names are in the exact format shown above
5. Ensure all youtubeLinks are real, formatted correctly, and will lead to actual videos"#,
        expiring = expiring_soon.join(", "),
        fresh = fresh.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_prompt_lists_ingredients_by_priority() {
        let prompt = render_recipe_suggest_prompt(
            "",
            0,
            &names(&["Milk", "Spinach"]),
            &names(&["Rice"]),
            &names(&["Old Bread"]),
        );

        assert!(prompt.contains("expiring soon (use these first): Milk, Spinach"));
        assert!(prompt.contains("Other available ingredients: Rice"));
        assert!(prompt.contains("expired and should not be used: Old Bread"));
        assert!(prompt.contains("suggest 3 different recipes"));
        assert!(prompt.contains("useInventoryIngredients"));
    }

    #[test]
    fn test_no_expired_warning_without_expired_items() {
        let prompt = render_recipe_suggest_prompt("", 0, &names(&["Milk"]), &[], &[]);
        assert!(!prompt.contains("Warning: These ingredients are expired"));
    }

    #[test]
    fn test_retry_line_counts_attempts() {
        let first = render_recipe_suggest_prompt("", 0, &names(&["Milk"]), &[], &[]);
        assert!(!first.contains("attempt #"));

        let retry = render_recipe_suggest_prompt("", 2, &names(&["Milk"]), &[], &[]);
        assert!(retry.contains("This is attempt #3. Please suggest DIFFERENT recipes"));
    }

    #[test]
    fn test_preferences_injected() {
        let prompt =
            render_recipe_suggest_prompt("vegan, hates cilantro", 0, &names(&["Milk"]), &[], &[]);
        assert!(prompt.contains("User profile and preferences: vegan, hates cilantro"));
    }
}
