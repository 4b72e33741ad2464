//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Configuration is
//! layered: stock defaults are overridden by the user's `config.toml` in the
//! content root. Config files are sparse — override just the values you want.
//! Unknown keys are rejected to catch typos early.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! studio_name = "Studio"
//! tagline = "We make games"
//! contact_email = "hello@example.com"
//! copyright = "© Studio"
//! logo = "logo.png"                 # asset filename
//! loading_image = "loading.gif"     # shown on the loading overlay
//!
//! [colors]
//! background = "#000000"
//! surface = "#2a2a2a"
//! text = "#ffffff"
//! text_muted = "#e0e0e0"
//! border = "#333333"
//! overlay = "#ffffff"               # loading overlay background
//! tag_news = "#00d4ff"
//! tag_video = "#ff4500"
//! tag_exclusive = "#ffc400"
//!
//! [reveal]
//! fade_ms = 500                     # overlay fade-out before removal
//! fallback_timeout_ms = 10000      # reveal regardless after this long
//! track_animations = "error-page"  # "error-page" | "all-pages" | "never"
//!
//! [error_page]
//! headline = "404 - Page Not Found"
//! message = "..."
//! animation = "https://..."         # animation player source (optional)
//! fallback_text = "Animation failed to load."
//!
//! [[social]]
//! platform = "X"
//! icon = "twitter.png"
//! url = "https://x.com/studio"
//! ```

use crate::types::SocialLink;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Studio name, used in page titles, the logo alt text, and the footer.
    pub studio_name: String,
    /// Short line under the studio name on the landing page.
    pub tagline: String,
    /// Address behind the header "Get in touch" button (`mailto:`).
    pub contact_email: String,
    /// Footer copyright line.
    pub copyright: String,
    /// Logo asset filename (header and footer).
    pub logo: String,
    /// Asset shown centered on the loading overlay.
    pub loading_image: String,
    /// Site palette, emitted as CSS custom properties.
    pub colors: ColorConfig,
    /// Resource-gated reveal settings.
    pub reveal: RevealConfig,
    /// Error (404) page content.
    pub error_page: ErrorPageConfig,
    /// Footer social links.
    pub social: Vec<SocialLink>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            studio_name: "Studio".to_string(),
            tagline: "We make games".to_string(),
            contact_email: "hello@example.com".to_string(),
            copyright: "© Studio".to_string(),
            logo: "logo.png".to_string(),
            loading_image: "loading.gif".to_string(),
            colors: ColorConfig::default(),
            reveal: RevealConfig::default(),
            error_page: ErrorPageConfig::default(),
            social: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.studio_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "studio_name must not be empty".into(),
            ));
        }
        if !self.contact_email.contains('@') {
            return Err(ConfigError::Validation(format!(
                "contact_email '{}' is not an email address",
                self.contact_email
            )));
        }
        if self.reveal.fallback_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "reveal.fallback_timeout_ms must be non-zero".into(),
            ));
        }
        if self.reveal.fade_ms >= self.reveal.fallback_timeout_ms {
            return Err(ConfigError::Validation(
                "reveal.fade_ms must be shorter than reveal.fallback_timeout_ms".into(),
            ));
        }
        Ok(())
    }
}

/// Which pages track animation-player readiness in addition to images.
///
/// The reveal gate always tracks `<img>` elements. Animation players (custom
/// elements with their own `ready`/`error` lifecycle) are opt-in per page
/// because a player that silently never fires would hold the page hostage
/// without the fallback timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationTracking {
    /// Only the error page tracks players (it is the only stock page with one).
    #[default]
    ErrorPage,
    /// Every page tracks players.
    AllPages,
    /// No page tracks players; they load untracked.
    Never,
}

/// Resource-gated reveal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Overlay fade-out duration before the overlay node is removed (ms).
    pub fade_ms: u64,
    /// Reveal regardless of pending resources after this long (ms). Applied
    /// on pages that track animation players; `all_pages_timeout` extends it
    /// to every page.
    pub fallback_timeout_ms: u64,
    /// Arm the fallback timeout on every page, not just animation pages.
    pub all_pages_timeout: bool,
    /// Which pages track animation players.
    pub track_animations: AnimationTracking,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            fade_ms: 500,
            fallback_timeout_ms: 10_000,
            all_pages_timeout: false,
            track_animations: AnimationTracking::ErrorPage,
        }
    }
}

/// Error (404) page content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ErrorPageConfig {
    pub headline: String,
    pub message: String,
    /// Animation player source URL; omit to render no player.
    pub animation: Option<String>,
    /// Text swapped in when the animation player errors.
    pub fallback_text: String,
    /// Label on the back-to-home button.
    pub home_label: String,
}

impl Default for ErrorPageConfig {
    fn default() -> Self {
        Self {
            headline: "404 - Page Not Found".to_string(),
            message: "The page you're looking for doesn't exist. Let's get you back to the action!"
                .to_string(),
            animation: None,
            fallback_text: "Animation failed to load.".to_string(),
            home_label: "Back to Home".to_string(),
        }
    }
}

/// Site palette, emitted as CSS custom properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Page background.
    pub background: String,
    /// Card/panel background.
    pub surface: String,
    /// Primary text color.
    pub text: String,
    /// Muted text (hover states, secondary copy).
    pub text_muted: String,
    /// Header/footer border color.
    pub border: String,
    /// Loading overlay background.
    pub overlay: String,
    /// News badge accent.
    pub tag_news: String,
    /// Video badge accent.
    pub tag_video: String,
    /// Exclusive badge accent.
    pub tag_exclusive: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#000000".to_string(),
            surface: "#2a2a2a".to_string(),
            text: "#ffffff".to_string(),
            text_muted: "#e0e0e0".to_string(),
            border: "#333333".to_string(),
            overlay: "#ffffff".to_string(),
            tag_news: "#00d4ff".to_string(),
            tag_video: "#ff4500".to_string(),
            tag_exclusive: "#ffc400".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Marquee Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Studio identity. Used in page titles, logo alt text, and the footer.
studio_name = "Studio"
tagline = "We make games"

# Address behind the header "Get in touch" button (mailto: link).
contact_email = "hello@example.com"

# Footer copyright line.
copyright = "© Studio"

# Asset filenames (inside assets/).
logo = "logo.png"
loading_image = "loading.gif"

# ---------------------------------------------------------------------------
# Palette, emitted as CSS custom properties
# ---------------------------------------------------------------------------
[colors]
background = "#000000"      # Page background
surface = "#2a2a2a"         # Card/panel background
text = "#ffffff"
text_muted = "#e0e0e0"      # Hover states, secondary copy
border = "#333333"          # Header/footer borders
overlay = "#ffffff"         # Loading overlay background
tag_news = "#00d4ff"        # News badge accent
tag_video = "#ff4500"       # Video badge accent
tag_exclusive = "#ffc400"   # Exclusive badge accent

# ---------------------------------------------------------------------------
# Resource-gated reveal
# ---------------------------------------------------------------------------
[reveal]
# Overlay fade-out duration before the overlay node is removed (ms).
fade_ms = 500

# Reveal the page regardless of pending resources after this long (ms).
# Armed on pages that track animation players (their readiness events may
# never fire); set all_pages_timeout to arm it everywhere.
fallback_timeout_ms = 10000
all_pages_timeout = false

# Which pages track animation-player readiness in addition to images:
# "error-page" (default), "all-pages", or "never".
track_animations = "error-page"

# ---------------------------------------------------------------------------
# Error (404) page
# ---------------------------------------------------------------------------
[error_page]
headline = "404 - Page Not Found"
message = "The page you're looking for doesn't exist. Let's get you back to the action!"
fallback_text = "Animation failed to load."
home_label = "Back to Home"
# Animation player source URL; omit to render no player.
# animation = "https://example.com/error.lottie"

# ---------------------------------------------------------------------------
# Footer social links (repeat the block per platform)
# ---------------------------------------------------------------------------
# [[social]]
# platform = "X"
# icon = "twitter.png"
# url = "https://x.com/studio"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {bg};
    --color-surface: {surface};
    --color-text: {text};
    --color-text-muted: {text_muted};
    --color-border: {border};
    --color-overlay: {overlay};
    --color-tag-news: {tag_news};
    --color-tag-video: {tag_video};
    --color-tag-exclusive: {tag_exclusive};
}}"#,
        bg = colors.background,
        surface = colors.surface,
        text = colors.text,
        text_muted = colors.text_muted,
        border = colors.border,
        overlay = colors.overlay,
        tag_news = colors.tag_news,
        tag_video = colors.tag_video,
        tag_exclusive = colors.tag_exclusive,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_palette() {
        let config = SiteConfig::default();
        assert_eq!(config.colors.background, "#000000");
        assert_eq!(config.colors.overlay, "#ffffff");
    }

    #[test]
    fn default_reveal_settings() {
        let config = SiteConfig::default();
        assert_eq!(config.reveal.fade_ms, 500);
        assert_eq!(config.reveal.fallback_timeout_ms, 10_000);
        assert_eq!(config.reveal.track_animations, AnimationTracking::ErrorPage);
        assert!(!config.reveal.all_pages_timeout);
    }

    #[test]
    fn parse_partial_config() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("config.toml"),
            r##"
studio_name = "Dash"

[colors]
background = "#111111"
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.studio_name, "Dash");
        assert_eq!(config.colors.background, "#111111");
        // Untouched values keep their defaults
        assert_eq!(config.colors.overlay, "#ffffff");
        assert_eq!(config.reveal.fade_ms, 500);
    }

    #[test]
    fn missing_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.studio_name, "Studio");
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("config.toml"), "studio_nmae = \"typo\"\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn invalid_toml_rejected() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("config.toml"), "studio_name = \n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn empty_studio_name_rejected() {
        let mut config = SiteConfig::default();
        config.studio_name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_contact_email_rejected() {
        let mut config = SiteConfig::default();
        config.contact_email = "not-an-address".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut config = SiteConfig::default();
        config.reveal.fallback_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn fade_longer_than_timeout_rejected() {
        let mut config = SiteConfig::default();
        config.reveal.fade_ms = 20_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn merge_preserves_base_keys() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str("studio_name = \"Dash\"").unwrap();
        let merged = merge_toml(base, overlay);
        let config: SiteConfig = merged.try_into().unwrap();
        assert_eq!(config.studio_name, "Dash");
        assert_eq!(config.logo, "logo.png");
    }

    #[test]
    fn track_animations_parses_kebab_case() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("config.toml"),
            "[reveal]\ntrack_animations = \"all-pages\"\n",
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.reveal.track_animations, AnimationTracking::AllPages);
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let parsed: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        let merged = merge_toml(stock_defaults_value(), parsed);
        let config: SiteConfig = merged.try_into().unwrap();
        config.validate().unwrap();
        assert_eq!(config.studio_name, SiteConfig::default().studio_name);
        assert_eq!(config.reveal.fade_ms, SiteConfig::default().reveal.fade_ms);
    }

    #[test]
    fn color_css_contains_custom_properties() {
        let css = generate_color_css(&ColorConfig::default());
        assert!(css.contains("--color-bg: #000000"));
        assert!(css.contains("--color-tag-news: #00d4ff"));
    }

    #[test]
    fn social_links_parse() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("config.toml"),
            r#"
[[social]]
platform = "X"
icon = "twitter.png"
url = "https://x.com/studio"

[[social]]
platform = "YouTube"
icon = "youtube.png"
url = "https://youtube.com/@studio"
"#,
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.social.len(), 2);
        assert_eq!(config.social[0].platform, "X");
    }
}
