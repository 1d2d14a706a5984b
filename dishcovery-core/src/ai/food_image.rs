//! Food identification from photos.
//!
//! Two sequential vision calls: a triage pass that rejects obvious non-food
//! images (people, scenery, documents) with a category-specific message, then
//! a naming pass that asks for the food item name itself.

use crate::ai::prompts::food_identify::{render_food_identify_prompt, FOOD_IDENTIFY_PROMPT_NAME};
use crate::ai::prompts::image_triage::{render_image_triage_prompt, IMAGE_TRIAGE_PROMPT_NAME};
use crate::ai::{AiClient, AiError, ChatMessage, ChatRequest, ImageData, Usage};

/// Message returned when the naming pass hedges or gives up.
pub const UNIDENTIFIED_MESSAGE: &str =
    "Could not identify any food in this image. Please try with a clearer image of a food item.";

/// Non-food category detected by the triage pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectedImageKind {
    Person,
    Landscape,
    Document,
    Object,
    Unclear,
    Other,
}

impl RejectedImageKind {
    /// Short tag suitable for API responses.
    pub fn tag(&self) -> &'static str {
        match self {
            RejectedImageKind::Person => "person",
            RejectedImageKind::Landscape => "landscape",
            RejectedImageKind::Document => "document",
            RejectedImageKind::Object => "object",
            RejectedImageKind::Unclear => "unclear",
            RejectedImageKind::Other => "other",
        }
    }

    /// User-facing explanation of the rejection.
    pub fn message(&self) -> &'static str {
        match self {
            RejectedImageKind::Person => {
                "The image appears to show a person rather than food. Please upload an image that clearly shows a food item."
            }
            RejectedImageKind::Landscape => {
                "The image appears to show scenery or an outdoor location rather than food. Please upload an image that clearly shows a food item."
            }
            RejectedImageKind::Document => {
                "The image appears to show text or a document rather than food. Please upload an image that clearly shows a food item."
            }
            RejectedImageKind::Object => {
                "The image appears to show a non-food object. Please upload an image that clearly shows a food item."
            }
            RejectedImageKind::Unclear => {
                "The image is unclear, too dark, or difficult to identify. Please upload a clearer image of a food item."
            }
            RejectedImageKind::Other => {
                "No food items were detected in this image. Please try uploading a different image that clearly shows food."
            }
        }
    }
}

/// Triage markers checked in priority order. The first marker found anywhere
/// in the reply wins, so a rambling reply still maps to one category.
const TRIAGE_CHECKS: [(&str, RejectedImageKind); 6] = [
    ("CONTAINS_PERSON", RejectedImageKind::Person),
    ("CONTAINS_LANDSCAPE", RejectedImageKind::Landscape),
    ("CONTAINS_DOCUMENT", RejectedImageKind::Document),
    ("CONTAINS_OBJECT", RejectedImageKind::Object),
    ("UNCLEAR_IMAGE", RejectedImageKind::Unclear),
    ("NO_FOOD", RejectedImageKind::Other),
];

/// Map a raw triage reply to a rejection category, if any.
pub fn classify_triage_reply(reply: &str) -> Option<RejectedImageKind> {
    TRIAGE_CHECKS
        .iter()
        .find(|(marker, _)| reply.contains(marker))
        .map(|(_, kind)| *kind)
}

fn is_hedged_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    name == "NOT_FOOD" || lower.contains("cannot identify") || lower.contains("sorry")
}

/// Outcome of running an image through both passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FoodImageOutcome {
    /// The image showed food and the model named it.
    Identified { item_name: String },
    /// Triage rejected the image as a known non-food category.
    Rejected(RejectedImageKind),
    /// Triage passed but the naming pass could not produce a name.
    Unidentified,
}

pub struct FoodImageResult {
    pub outcome: FoodImageOutcome,
    pub cached: bool,
    pub usage: Usage,
}

fn sum_usage(a: &Usage, b: &Usage) -> Usage {
    Usage {
        prompt_tokens: a.prompt_tokens + b.prompt_tokens,
        completion_tokens: a.completion_tokens + b.completion_tokens,
        total_tokens: a.total_tokens + b.total_tokens,
    }
}

/// Identify the food item shown in `image`.
///
/// User preference text, when present, is injected into the naming prompt so
/// the model can lean toward items the user actually eats.
pub async fn identify_food_image(
    ai_client: &dyn AiClient,
    image: ImageData,
    preferences: Option<&str>,
) -> Result<FoodImageResult, AiError> {
    let triage_request = ChatRequest {
        messages: vec![ChatMessage::user_with_images(
            render_image_triage_prompt(),
            vec![image.clone()],
        )],
        json_response: false,
        max_tokens: Some(64),
        temperature: Some(0.1),
    };

    let triage = ai_client
        .complete(IMAGE_TRIAGE_PROMPT_NAME, triage_request)
        .await?;

    if let Some(kind) = classify_triage_reply(triage.content.trim()) {
        return Ok(FoodImageResult {
            outcome: FoodImageOutcome::Rejected(kind),
            cached: triage.cached,
            usage: triage.usage,
        });
    }

    let identify_request = ChatRequest {
        messages: vec![ChatMessage::user_with_images(
            render_food_identify_prompt(preferences),
            vec![image],
        )],
        json_response: false,
        max_tokens: Some(64),
        temperature: Some(0.1),
    };

    let identify = ai_client
        .complete(FOOD_IDENTIFY_PROMPT_NAME, identify_request)
        .await?;

    let item_name = identify.content.trim().to_string();
    let outcome = if is_hedged_name(&item_name) {
        FoodImageOutcome::Unidentified
    } else {
        FoodImageOutcome::Identified { item_name }
    };

    Ok(FoodImageResult {
        outcome,
        cached: triage.cached && identify.cached,
        usage: sum_usage(&triage.usage, &identify.usage),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FakeAiClient;

    fn test_image() -> ImageData {
        ImageData::new("image/jpeg", "dGVzdA==")
    }

    #[test]
    fn test_classify_triage_reply_matches_by_substring() {
        assert_eq!(
            classify_triage_reply("I think this CONTAINS_PERSON in the frame"),
            Some(RejectedImageKind::Person)
        );
        assert_eq!(
            classify_triage_reply("\"CONTAINS_LANDSCAPE\""),
            Some(RejectedImageKind::Landscape)
        );
        assert_eq!(classify_triage_reply("CONTAINS_FOOD"), None);
        assert_eq!(classify_triage_reply("something else entirely"), None);
    }

    #[test]
    fn test_person_marker_wins_over_later_markers() {
        let reply = "NO_FOOD but also CONTAINS_PERSON";
        assert_eq!(classify_triage_reply(reply), Some(RejectedImageKind::Person));
    }

    #[test]
    fn test_rejection_tags_and_messages() {
        assert_eq!(RejectedImageKind::Person.tag(), "person");
        assert_eq!(RejectedImageKind::Other.tag(), "other");
        assert!(RejectedImageKind::Unclear.message().contains("unclear"));
        assert!(RejectedImageKind::Document.message().contains("document"));
    }

    #[tokio::test]
    async fn test_identify_food_image_happy_path() {
        let mut client = FakeAiClient::new();
        client.add_response("determine what it contains", "CONTAINS_FOOD");
        client.add_response("Identify the food item", "Cheddar Cheese");

        let result = identify_food_image(&client, test_image(), None)
            .await
            .unwrap();

        assert_eq!(
            result.outcome,
            FoodImageOutcome::Identified {
                item_name: "Cheddar Cheese".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_identify_food_image_rejects_person() {
        let client = FakeAiClient::with_response("determine what it contains", "CONTAINS_PERSON");

        let result = identify_food_image(&client, test_image(), None)
            .await
            .unwrap();

        assert_eq!(
            result.outcome,
            FoodImageOutcome::Rejected(RejectedImageKind::Person)
        );
    }

    #[tokio::test]
    async fn test_identify_food_image_hedged_reply_is_unidentified() {
        let mut client = FakeAiClient::new();
        client.add_response("determine what it contains", "CONTAINS_FOOD");
        client.add_response(
            "Identify the food item",
            "I'm sorry, I can't tell what this is",
        );

        let result = identify_food_image(&client, test_image(), None)
            .await
            .unwrap();

        assert_eq!(result.outcome, FoodImageOutcome::Unidentified);
    }

    #[tokio::test]
    async fn test_identify_food_image_not_food_reply_is_unidentified() {
        let mut client = FakeAiClient::new();
        client.add_response("determine what it contains", "CONTAINS_FOOD");
        client.add_response("Identify the food item", "NOT_FOOD");

        let result = identify_food_image(&client, test_image(), None)
            .await
            .unwrap();

        assert_eq!(result.outcome, FoodImageOutcome::Unidentified);
    }
}
