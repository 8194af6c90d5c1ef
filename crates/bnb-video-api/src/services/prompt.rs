//! Video instruction prompt template.

/// Opening phrase the generated instructions must start with.
pub const CLIP_DIRECTIVE: &str = "create a short 3D clip in realistic style";

const PROMPT_INSTRUCTIONS: &str = "\
you are writing instructions for an image-to-video generation model. \
the instructions must start with 'create a short 3D clip in realistic style'. \
use the property description below to describe how the camera moves: \
open with a general view of the property, then zoom in and walk through its rooms. \
the clip is an 8 second video with a 16:9 aspect ratio. \
do not include explanations about how the instructions were written. \
do not include a title. \
do not use markdown, return plain text only.
description: ";

/// Build the instruction-writing prompt for an image description.
///
/// Pure and deterministic: the description is appended to a fixed template.
pub fn synthesize(description: &str) -> String {
    format!("{}{}", PROMPT_INSTRUCTIONS, description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesize_is_deterministic() {
        let description = "A sunny two-bedroom loft with a balcony.";
        assert_eq!(synthesize(description), synthesize(description));
    }

    #[test]
    fn test_synthesize_embeds_description_last() {
        let prompt = synthesize("a cabin by the lake");
        assert!(prompt.ends_with("description: a cabin by the lake"));
    }

    #[test]
    fn test_template_constraints() {
        let prompt = synthesize("");
        assert!(prompt.contains(CLIP_DIRECTIVE));
        assert!(prompt.contains("8 second"));
        assert!(prompt.contains("16:9 aspect ratio"));
        assert!(prompt.contains("do not include a title"));
        assert!(prompt.contains("do not use markdown"));
    }

    #[test]
    fn test_listing_description_prompt() {
        let prompt = synthesize("a cozy cabin by a lake");
        assert!(prompt.contains(CLIP_DIRECTIVE));
        assert!(prompt.contains("8 second"));
        assert!(prompt.contains("16:9 aspect ratio"));
        assert!(prompt.ends_with("a cozy cabin by a lake"));
    }

    #[test]
    fn test_different_descriptions_share_prefix() {
        let a = synthesize("living room");
        let b = synthesize("kitchen");
        assert_ne!(a, b);
        assert_eq!(
            a.strip_suffix("living room"),
            b.strip_suffix("kitchen")
        );
    }
}
