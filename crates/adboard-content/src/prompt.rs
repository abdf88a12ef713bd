//! Instruction prompt for the hosted instruct model.

use adboard_core::Platform;

const TWITTER_GUIDELINES: &str = "- Keep it under 280 characters.\n\
- Be concise, impactful, and engaging.\n\
- Use hashtags only in the last sentence.";

const INSTAGRAM_GUIDELINES: &str = "- Use up to 15 relevant hashtags (only in the last sentence).\n\
- Include emojis for engagement.\n\
- Make it visually compelling.\n\
- Use short, readable paragraphs.";

const LINKEDIN_GUIDELINES: &str = "- Maintain a professional, industry-relevant tone.\n\
- Incorporate insights, data, or trends.\n\
- Use industry-specific hashtags (only in the last sentence).\n\
- Format for readability (short paragraphs, bullet points where needed).";

const DEFAULT_GUIDELINES: &str = "- Craft engaging, shareable content.\n\
- Use emojis appropriately.\n\
- Include a strong call-to-action.\n\
- Focus on community-building.";

/// Writing rules for a channel. Channels without dedicated rules, Facebook
/// included, get the general-purpose set.
#[must_use]
pub fn guidelines(platform: Option<Platform>) -> &'static str {
    match platform {
        Some(Platform::Twitter) => TWITTER_GUIDELINES,
        Some(Platform::Instagram) => INSTAGRAM_GUIDELINES,
        Some(Platform::LinkedIn) => LINKEDIN_GUIDELINES,
        Some(Platform::Facebook) | None => DEFAULT_GUIDELINES,
    }
}

/// Wraps the product description in a `<s>[INST] ... [/INST]</s>` block.
///
/// `platform` is echoed verbatim; it selects guidelines via
/// [`Platform::from_slug`].
#[must_use]
pub fn build_prompt(platform: &str, product: &str) -> String {
    let rules = guidelines(Platform::from_slug(platform));
    format!(
        "<s>[INST] You are an expert social media marketer. Generate high-converting, \
platform-specific content that maximizes engagement and conversions.\n\n\
**Platform:** {platform}\n\
**Product/Service:** {product}\n\n\
### **Content Guidelines:**\n\
{rules}\n\n\
### **Objective:**\n\
Create a compelling post optimized for {platform}, ensuring it aligns with \
platform-specific best practices, audience preferences, and engagement strategies. [/INST]</s>"
    )
}
