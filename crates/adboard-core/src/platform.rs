use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Advertising channel a campaign record belongs to.
///
/// Display and `FromStr` use the exact, case-sensitive channel names
/// (`"Facebook"`, `"LinkedIn"`, ...). The content generator addresses the same
/// channels by lowercase slug, see [`Platform::from_slug`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    Facebook,
    Instagram,
    LinkedIn,
    Twitter,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

impl Platform {
    /// Every accepted channel, in display order.
    pub const ALL: [Platform; 4] = [
        Platform::Facebook,
        Platform::Instagram,
        Platform::LinkedIn,
        Platform::Twitter,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::LinkedIn => "LinkedIn",
            Platform::Twitter => "Twitter",
        }
    }

    /// Lowercase identifier used by the content generator (`"linkedin"`).
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::LinkedIn => "linkedin",
            Platform::Twitter => "twitter",
        }
    }

    /// Case-insensitive lookup by slug or display name.
    #[must_use]
    pub fn from_slug(value: &str) -> Option<Self> {
        let needle = value.trim().to_lowercase();
        Self::ALL.into_iter().find(|p| p.slug() == needle)
    }

    /// Comma-separated list of the accepted names, for error messages.
    #[must_use]
    pub fn accepted_names() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}
