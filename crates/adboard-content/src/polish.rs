//! Per-channel cleanup of raw model output.

use adboard_core::Platform;

/// Longest post accepted by Twitter.
pub const TWITTER_MAX_CHARS: usize = 280;

const TWITTER_HASHTAGS: &str = "#marketing #digital #growth";
const INSTAGRAM_HASHTAGS: &str = "#marketing #digital #growth #success #business";
const LINKEDIN_HASHTAGS: &str = "#business #professional #growth #innovation";

/// Strips an echoed prompt and applies the channel's formatting rules.
///
/// Unknown channels are only trimmed.
#[must_use]
pub fn polish(platform: Option<Platform>, raw: &str, prompt: &str) -> String {
    let mut text = if prompt.is_empty() {
        raw.trim().to_string()
    } else {
        raw.trim().replacen(prompt, "", 1).trim().to_string()
    };

    match platform {
        Some(Platform::Twitter) => {
            text = truncate_chars(&text, TWITTER_MAX_CHARS);
            append_hashtags(&mut text, TWITTER_HASHTAGS);
        }
        Some(Platform::Instagram) => {
            text = sentence_breaks(&text);
            prefix_emoji(&mut text, "✨");
            append_hashtags(&mut text, INSTAGRAM_HASHTAGS);
        }
        Some(Platform::LinkedIn) => {
            text = sentence_breaks(&text);
            append_hashtags(&mut text, LINKEDIN_HASHTAGS);
        }
        Some(Platform::Facebook) => {
            text = sentence_breaks(&text);
            prefix_emoji(&mut text, "👋");
        }
        None => {}
    }
    text
}

/// Cuts `text` to at most `limit` characters, ending in `...` when cut.
fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

fn sentence_breaks(text: &str) -> String {
    text.replace(". ", ".\n\n")
}

fn has_emoji(text: &str) -> bool {
    text.chars().any(|c| ('\u{1F300}'..='\u{1F9FF}').contains(&c))
}

fn prefix_emoji(text: &mut String, emoji: &str) {
    if !has_emoji(text) {
        text.insert(0, ' ');
        text.insert_str(0, emoji);
    }
}

fn append_hashtags(text: &mut String, hashtags: &str) {
    if !text.contains('#') {
        text.push_str("\n\n");
        text.push_str(hashtags);
    }
}
