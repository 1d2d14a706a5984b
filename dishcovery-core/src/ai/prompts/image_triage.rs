//! Image triage prompt: coarse classification before food identification.

/// Prompt name for cache keys.
pub const IMAGE_TRIAGE_PROMPT_NAME: &str = "image_triage";

/// Render the triage prompt. The model is constrained to seven fixed
/// answer tokens; the caller matches them by substring since models add
/// stray text despite instructions.
pub fn render_image_triage_prompt() -> String {
    r#"Analyze this image and determine what it contains.
Do not respond with any unnecessary details.
ONLY respond with one of these exact answers:
1. "CONTAINS_FOOD" - if the image clearly shows food items
2. "CONTAINS_PERSON" - if the image primarily shows a person
3. "CONTAINS_LANDSCAPE" - if the image shows scenery or outdoor locations
4. "CONTAINS_DOCUMENT" - if the image shows text, documents, or screenshots
5. "CONTAINS_OBJECT" - if the image shows non-food objects (furniture, electronics, etc.)
6. "UNCLEAR_IMAGE" - if the image is blurry, too dark, or otherwise hard to identify
7. "NO_FOOD" - if the image does not contain any clear food items and doesn't match above categories"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prompt() {
        let prompt = render_image_triage_prompt();

        for token in [
            "CONTAINS_FOOD",
            "CONTAINS_PERSON",
            "CONTAINS_LANDSCAPE",
            "CONTAINS_DOCUMENT",
            "CONTAINS_OBJECT",
            "UNCLEAR_IMAGE",
            "NO_FOOD",
        ] {
            assert!(prompt.contains(token), "missing token {}", token);
        }
        assert!(prompt.contains("exact answers"));
    }
}
