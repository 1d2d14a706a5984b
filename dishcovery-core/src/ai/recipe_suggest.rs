//! Recipe suggestions from the user's inventory.
//!
//! Builds one prompt from the current pantry (grouped by expiry urgency),
//! asks the model for three recipes in a fixed JSON shape, and defensively
//! parses the reply. A reply the parser cannot salvage becomes an in-body
//! retry message rather than an error.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::ai::prompts::recipe_suggest::{
    render_recipe_suggest_prompt, RECIPE_SUGGEST_PROMPT_NAME,
};
use crate::ai::{AiClient, AiError, ChatMessage, ChatRequest, Usage};
use crate::expiry::{classify, ExpiryStatus};

pub const NO_ITEMS_MESSAGE: &str =
    "No ingredients found in your inventory. Add some food items first.";
pub const ALL_EXPIRED_MESSAGE: &str =
    "No usable ingredients found in your inventory. All items appear to be expired.";
pub const PARSE_FAILURE_MESSAGE: &str =
    "We encountered an issue generating recipe suggestions. Please try again.";
pub const UNNAMED_RECIPE: &str = "Unnamed Recipe";

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?(.*?)```").expect("Invalid code fence regex"));
static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("Invalid JSON object regex"));

/// An inventory item as the suggester sees it.
#[derive(Debug, Clone)]
pub struct PantryItem {
    pub id: Uuid,
    pub name: String,
    pub expiry_date: NaiveDate,
    pub about: Option<String>,
}

/// An ingredient the user would need to buy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AdditionalIngredient {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_link: Option<String>,
}

/// One suggested recipe, normalized so every field is safe to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    pub use_inventory_ingredients: Vec<String>,
    /// Ids of the inventory items matched by name, so a later cook
    /// confirmation can delete exactly these rows.
    pub use_inventory_item_ids: Vec<Uuid>,
    pub additional_ingredients: Vec<AdditionalIngredient>,
    pub instructions: Vec<String>,
    pub youtube_links: Vec<String>,
}

/// Result of a suggestion run. `message` is set on the no-call short
/// circuits and on parse fallback; `prompt` only on model-backed success.
#[derive(Debug, Clone)]
pub struct RecipeSuggestions {
    pub recipes: Vec<Recipe>,
    pub message: Option<String>,
    pub prompt: Option<String>,
    pub cached: bool,
    pub usage: Usage,
}

impl RecipeSuggestions {
    fn short_circuit(message: &str) -> Self {
        Self {
            recipes: vec![],
            message: Some(message.to_string()),
            prompt: None,
            cached: false,
            usage: Usage::default(),
        }
    }
}

/// Combine the profile's about text with every item's about text.
pub fn collect_about_info(profile_about: Option<&str>, items: &[PantryItem]) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(about) = profile_about {
        if !about.is_empty() {
            parts.push(about);
        }
    }
    for item in items {
        if let Some(about) = item.about.as_deref() {
            if !about.is_empty() {
                parts.push(about);
            }
        }
    }
    parts.join(" ")
}

/// Pull a JSON object candidate out of a model reply that may wrap it in
/// prose or a markdown code fence.
fn extract_json_candidate(reply: &str) -> String {
    let mut candidate = reply.trim().to_string();

    if let Some(cap) = CODE_FENCE.captures(reply) {
        if let Some(m) = cap.get(1) {
            candidate = m.as_str().trim().to_string();
        }
    }

    if !candidate.starts_with('{') {
        if let Some(m) = JSON_OBJECT.find(reply) {
            candidate = m.as_str().to_string();
        }
    }

    candidate
}

fn string_array(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.as_str())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn additional_ingredient(value: &Value) -> Option<AdditionalIngredient> {
    if let Some(name) = value.as_str() {
        return Some(AdditionalIngredient {
            name: name.to_string(),
            buy_link: None,
        });
    }
    let obj = value.as_object()?;
    Some(AdditionalIngredient {
        name: obj
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        buy_link: obj
            .get("buyLink")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
    })
}

fn additional_ingredients(value: Option<&Value>) -> Vec<AdditionalIngredient> {
    value
        .and_then(|v| v.as_array())
        .map(|entries| entries.iter().filter_map(additional_ingredient).collect())
        .unwrap_or_default()
}

/// Normalize one raw recipe value. Missing or mis-typed fields become
/// defaults so the result is always renderable.
fn normalize_recipe(value: &Value) -> Recipe {
    let name = value
        .get("name")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(UNNAMED_RECIPE)
        .to_string();

    Recipe {
        name,
        use_inventory_ingredients: string_array(value.get("useInventoryIngredients")),
        use_inventory_item_ids: vec![],
        additional_ingredients: additional_ingredients(value.get("additionalIngredients")),
        instructions: string_array(value.get("instructions")),
        youtube_links: string_array(value.get("youtubeLinks")),
    }
}

/// Parse a model reply into normalized recipes. Returns None when no JSON
/// object with a `recipes` array can be salvaged from the text.
pub fn parse_recipes_reply(reply: &str) -> Option<Vec<Recipe>> {
    let candidate = extract_json_candidate(reply);
    let value: Value = serde_json::from_str(&candidate).ok()?;
    let recipes = value.get("recipes")?.as_array()?;
    Some(recipes.iter().map(normalize_recipe).collect())
}

/// Match recipe ingredient names back to inventory item ids. First item
/// with a case-insensitive name match wins; ids are not repeated.
fn resolve_item_ids(recipes: &mut [Recipe], items: &[PantryItem]) {
    for recipe in recipes.iter_mut() {
        for ingredient in &recipe.use_inventory_ingredients {
            let matched = items
                .iter()
                .find(|item| item.name.eq_ignore_ascii_case(ingredient));
            if let Some(item) = matched {
                if !recipe.use_inventory_item_ids.contains(&item.id) {
                    recipe.use_inventory_item_ids.push(item.id);
                }
            }
        }
    }
}

/// Generate recipe suggestions for the given inventory.
///
/// Short-circuits without a model call when the inventory is empty or when
/// everything in it has expired.
pub async fn suggest_recipes(
    ai_client: &dyn AiClient,
    items: &[PantryItem],
    profile_about: Option<&str>,
    retry_count: u32,
    today: NaiveDate,
) -> Result<RecipeSuggestions, AiError> {
    if items.is_empty() {
        return Ok(RecipeSuggestions::short_circuit(NO_ITEMS_MESSAGE));
    }

    let mut sorted: Vec<&PantryItem> = items.iter().collect();
    sorted.sort_by_key(|item| item.expiry_date);

    let mut expiring_soon = Vec::new();
    let mut fresh = Vec::new();
    let mut expired = Vec::new();
    for item in &sorted {
        match classify(item.expiry_date, today) {
            ExpiryStatus::Expired => expired.push(item.name.clone()),
            ExpiryStatus::ExpiringSoon { .. } => expiring_soon.push(item.name.clone()),
            ExpiryStatus::Fresh => fresh.push(item.name.clone()),
            // classify on a parsed date never produces Invalid
            ExpiryStatus::Invalid => {}
        }
    }

    if expiring_soon.is_empty() && fresh.is_empty() {
        return Ok(RecipeSuggestions::short_circuit(ALL_EXPIRED_MESSAGE));
    }

    let about_info = collect_about_info(profile_about, items);
    let prompt =
        render_recipe_suggest_prompt(&about_info, retry_count, &expiring_soon, &fresh, &expired);

    let request = ChatRequest {
        messages: vec![ChatMessage::user(prompt.clone())],
        json_response: true,
        max_tokens: Some(4096),
        temperature: Some(0.7),
    };

    let response = ai_client
        .complete(RECIPE_SUGGEST_PROMPT_NAME, request)
        .await?;

    match parse_recipes_reply(&response.content) {
        Some(mut recipes) => {
            resolve_item_ids(&mut recipes, items);
            Ok(RecipeSuggestions {
                recipes,
                message: None,
                prompt: Some(prompt),
                cached: response.cached,
                usage: response.usage,
            })
        }
        None => Ok(RecipeSuggestions {
            recipes: vec![],
            message: Some(PARSE_FAILURE_MESSAGE.to_string()),
            prompt: None,
            cached: response.cached,
            usage: response.usage,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FakeAiClient;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn item(name: &str, expiry: &str) -> PantryItem {
        PantryItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            expiry_date: date(expiry),
            about: None,
        }
    }

    const TODAY: &str = "2025-04-10";

    #[test]
    fn test_parse_fenced_reply_defaults_missing_arrays() {
        let reply = "Here you go:\n```json\n{\"recipes\":[{\"name\":\"Omelette\"}]}\n```";
        let recipes = parse_recipes_reply(reply).unwrap();

        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].name, "Omelette");
        assert!(recipes[0].use_inventory_ingredients.is_empty());
        assert!(recipes[0].additional_ingredients.is_empty());
        assert!(recipes[0].instructions.is_empty());
        assert!(recipes[0].youtube_links.is_empty());
    }

    #[test]
    fn test_parse_bare_json_reply() {
        let reply = r#"{"recipes":[{"name":"Dal","instructions":["Boil lentils","Season"]}]}"#;
        let recipes = parse_recipes_reply(reply).unwrap();
        assert_eq!(recipes[0].instructions.len(), 2);
    }

    #[test]
    fn test_parse_reply_with_surrounding_prose() {
        let reply = "Sure! Here are some ideas: {\"recipes\":[{\"name\":\"Toast\"}]} Enjoy!";
        let recipes = parse_recipes_reply(reply).unwrap();
        assert_eq!(recipes[0].name, "Toast");
    }

    #[test]
    fn test_parse_reply_without_json_returns_none() {
        assert!(parse_recipes_reply("I am unable to suggest recipes today.").is_none());
    }

    #[test]
    fn test_parse_reply_without_recipes_array_returns_none() {
        assert!(parse_recipes_reply(r#"{"dishes": []}"#).is_none());
        assert!(parse_recipes_reply(r#"{"recipes": "oops"}"#).is_none());
    }

    #[test]
    fn test_normalize_handles_malformed_fields() {
        let reply = r#"{"recipes":[{
            "name": "",
            "useInventoryIngredients": "not an array",
            "additionalIngredients": [
                {"name": "Butter", "buyLink": "https://example.com/butter"},
                {"buyLink": "https://example.com/mystery"},
                "Salt",
                42
            ],
            "instructions": ["Mix", 7, "Serve"],
            "youtubeLinks": null
        }]}"#;

        let recipes = parse_recipes_reply(reply).unwrap();
        let recipe = &recipes[0];

        assert_eq!(recipe.name, UNNAMED_RECIPE);
        assert!(recipe.use_inventory_ingredients.is_empty());
        assert_eq!(recipe.additional_ingredients.len(), 3);
        assert_eq!(recipe.additional_ingredients[0].name, "Butter");
        assert_eq!(
            recipe.additional_ingredients[0].buy_link.as_deref(),
            Some("https://example.com/butter")
        );
        assert_eq!(recipe.additional_ingredients[1].name, "");
        assert_eq!(recipe.additional_ingredients[2].name, "Salt");
        assert_eq!(recipe.additional_ingredients[2].buy_link, None);
        assert_eq!(recipe.instructions, vec!["Mix", "Serve"]);
        assert!(recipe.youtube_links.is_empty());
    }

    #[test]
    fn test_collect_about_info_filters_empty_entries() {
        let mut items = vec![item("Milk", "2025-04-12"), item("Eggs", "2025-04-13")];
        items[0].about = Some("organic".to_string());
        items[1].about = Some(String::new());

        assert_eq!(
            collect_about_info(Some("vegetarian"), &items),
            "vegetarian organic"
        );
        assert_eq!(collect_about_info(None, &items), "organic");
        assert_eq!(collect_about_info(Some(""), &[]), "");
    }

    #[test]
    fn test_resolve_item_ids_first_match_wins() {
        let items = vec![
            item("Milk", "2025-04-12"),
            item("milk", "2025-04-20"),
            item("Eggs", "2025-04-13"),
        ];
        let mut recipes = vec![Recipe {
            name: "Scramble".to_string(),
            use_inventory_ingredients: vec![
                "MILK".to_string(),
                "eggs".to_string(),
                "Milk".to_string(),
                "Butter".to_string(),
            ],
            use_inventory_item_ids: vec![],
            additional_ingredients: vec![],
            instructions: vec![],
            youtube_links: vec![],
        }];

        resolve_item_ids(&mut recipes, &items);

        assert_eq!(
            recipes[0].use_inventory_item_ids,
            vec![items[0].id, items[2].id]
        );
    }

    #[tokio::test]
    async fn test_suggest_recipes_empty_inventory_skips_model() {
        // A client with no responses errors on any call, so reaching the
        // short circuit proves no call was made.
        let client = FakeAiClient::new();
        let today = date(TODAY);

        let result = suggest_recipes(&client, &[], None, 0, today).await.unwrap();

        assert!(result.recipes.is_empty());
        assert_eq!(result.message.as_deref(), Some(NO_ITEMS_MESSAGE));
        assert!(result.prompt.is_none());
    }

    #[tokio::test]
    async fn test_suggest_recipes_all_expired_skips_model() {
        let client = FakeAiClient::new();
        let today = date(TODAY);
        let items = vec![item("Old Yogurt", "2025-04-01"), item("Old Bread", "2025-03-15")];

        let result = suggest_recipes(&client, &items, None, 0, today)
            .await
            .unwrap();

        assert!(result.recipes.is_empty());
        assert_eq!(result.message.as_deref(), Some(ALL_EXPIRED_MESSAGE));
    }

    #[tokio::test]
    async fn test_suggest_recipes_success_resolves_ids() {
        let reply = r#"{"recipes":[{
            "name": "French Toast",
            "useInventoryIngredients": ["Milk", "Eggs"],
            "additionalIngredients": [{"name": "Cinnamon"}],
            "instructions": ["Whisk", "Fry"],
            "youtubeLinks": ["https://www.youtube.com/results?search_query=french+toast"]
        }]}"#;
        let client = FakeAiClient::with_response("suggest 3 different recipes", reply);
        let today = date(TODAY);
        let items = vec![item("Milk", "2025-04-12"), item("Eggs", "2025-05-01")];

        let result = suggest_recipes(&client, &items, Some("likes brunch"), 0, today)
            .await
            .unwrap();

        assert_eq!(result.recipes.len(), 1);
        assert_eq!(
            result.recipes[0].use_inventory_item_ids,
            vec![items[0].id, items[1].id]
        );
        assert!(result.message.is_none());
        let prompt = result.prompt.unwrap();
        assert!(prompt.contains("likes brunch"));
        assert!(prompt.contains("Milk"));
    }

    #[tokio::test]
    async fn test_suggest_recipes_unparseable_reply_becomes_message() {
        let client =
            FakeAiClient::with_response("suggest 3 different recipes", "no json here, sorry");
        let today = date(TODAY);
        let items = vec![item("Milk", "2025-04-12")];

        let result = suggest_recipes(&client, &items, None, 0, today)
            .await
            .unwrap();

        assert!(result.recipes.is_empty());
        assert_eq!(result.message.as_deref(), Some(PARSE_FAILURE_MESSAGE));
        assert!(result.prompt.is_none());
    }
}
