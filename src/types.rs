//! Shared types used across all pipeline stages.
//!
//! These types are serialized to JSON between stages (scan → process →
//! generate) and must be identical across all three modules. Content entries
//! (games, articles, roles, members) are data the scanner reads from TOML
//! files; the generator only ever renders them.

use serde::{Deserialize, Serialize};

/// A link in the header or footer navigation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NavLink {
    /// Display label, rendered uppercase by the stylesheet.
    pub label: String,
    /// Target href relative to the site root (or absolute for externals).
    pub href: String,
}

/// A footer social-media link with its icon asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLink {
    /// Platform name, used for alt text ("X", "Instagram", ...).
    pub platform: String,
    /// Icon asset filename inside `assets/`.
    pub icon: String,
    /// Profile URL.
    pub url: String,
}

/// One game from `games.toml`.
///
/// A game marked `hero = true` supplies the landing-page hero section
/// (background art and download button). A game with `promo = true` gets its
/// own promo page at `<slug>.html` built from `about` and `screenshots`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    /// URL slug; promo pages are generated at `<slug>.html`.
    pub slug: String,
    pub title: String,
    /// Cover image asset shown on the games grid.
    pub cover: String,
    /// Optional ribbon text over the cover (e.g. "Closed Beta Testing").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Store/download URL for the call-to-action button.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Featured on the landing-page hero.
    #[serde(default)]
    pub hero: bool,
    /// Hero background art (desktop).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_background: Option<String>,
    /// Hero background art for narrow viewports; falls back to the desktop art.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_background_mobile: Option<String>,
    /// Generate a dedicated promo page.
    #[serde(default)]
    pub promo: bool,
    /// Markdown body for the promo page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    /// Screenshot asset filenames for the promo gallery.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub screenshots: Vec<String>,
}

/// Category badge on a news card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NewsTag {
    News,
    Video,
    Exclusive,
}

impl NewsTag {
    /// Badge label rendered on the card.
    pub fn label(self) -> &'static str {
        match self {
            NewsTag::News => "NEWS",
            NewsTag::Video => "VIDEO",
            NewsTag::Exclusive => "EXCLUSIVE",
        }
    }

    /// Badge icon rendered before the label.
    pub fn icon(self) -> &'static str {
        match self {
            NewsTag::News => "📰",
            NewsTag::Video => "🎥",
            NewsTag::Exclusive => "🧠",
        }
    }

    /// CSS class carrying the per-tag accent color.
    pub fn css_class(self) -> &'static str {
        match self {
            NewsTag::News => "tag-news",
            NewsTag::Video => "tag-video",
            NewsTag::Exclusive => "tag-exclusive",
        }
    }
}

/// One article from `news.toml`.
///
/// The article marked `featured = true` becomes the large card on the
/// landing page; the rest render as compact cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub tag: NewsTag,
    /// Thumbnail asset filename.
    pub image: String,
    /// External link opened on click.
    pub url: String,
    #[serde(default)]
    pub featured: bool,
}

/// One open role from `careers.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRole {
    pub title: String,
    pub description: String,
    pub location: String,
    /// Employment type ("Full-time", "Contract", ...).
    pub employment: String,
    pub team: String,
    /// Application link; `mailto:` URLs are common here.
    pub apply_url: String,
}

/// One leadership entry from `team.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    /// Portrait asset filename.
    pub photo: String,
}

/// One studio commitment from `team.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commitment {
    pub title: String,
    pub body: String,
}

/// A page generated from a markdown file under `content/pages/`.
///
/// These are the long-form text pages (terms of service, privacy policy,
/// press kit, ...). They are linked from the footer, not the header nav.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownPage {
    /// Title from the first `# heading`, or the link title as fallback.
    pub title: String,
    /// Display label in the footer (filename with dashes → spaces).
    pub link_title: String,
    /// URL slug (filename stem).
    pub slug: String,
    /// Raw markdown content.
    pub body: String,
}
