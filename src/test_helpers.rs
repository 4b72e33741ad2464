//! Shared test utilities for the marquee test suite.
//!
//! Builds content fixtures programmatically in a temp directory — no binary
//! fixture files in the repo — and provides lookup helpers that panic with a
//! clear message on miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//!
//! let game = find_game(&manifest, "nouns-hunt");
//! assert!(game.hero);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::scan::Manifest;
use crate::types::{Game, MarkdownPage, NewsArticle};

/// A valid 1x1 transparent PNG (67 bytes). Written under every asset
/// filename regardless of extension — the pipeline sniffs content, not
/// extensions, so a `.jpg` path with PNG bytes probes fine.
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // signature
    0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1
    0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4, 0x89, // RGBA + CRC
    0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, // IDAT
    0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, // deflate
    0x0D, 0x0A, 0x2D, 0xB4, // CRC
    0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82, // IEND
];

const CONFIG_TOML: &str = r#"
studio_name = "Dash Studios"
tagline = "Games with character"
contact_email = "support@dashstudios.example"
copyright = "© Dash Studios Inc."
logo = "logo.png"
loading_image = "loading.gif"

[error_page]
animation = "https://animations.example/not-found.lottie"

[[social]]
platform = "X"
icon = "twitter.png"
url = "https://x.com/dashstudios"

[[social]]
platform = "YouTube"
icon = "youtube.png"
url = "https://youtube.com/@dashstudios"
"#;

const GAMES_TOML: &str = r#"
[[games]]
slug = "nouns-hunt"
title = "Nouns Hunt"
cover = "nouns-hunt.jpg"
download_url = "https://store.example.com/nouns-hunt"
hero = true
hero_background = "hero-background.jpg"
hero_background_mobile = "hero-background-mobile.jpg"
promo = true
about = "A fast-paced word hunt.\n\nFind the nouns before the clock finds you."
screenshots = ["shot-1.jpg", "shot-2.jpg"]

[[games]]
slug = "nouns-attack"
title = "Nouns Attack"
cover = "nouns-attack.jpg"
tag = "Closed Beta Testing"
hero = false
"#;

const NEWS_TOML: &str = r#"
[[articles]]
title = "Nouns Hunt v2.0 Out Now!"
tag = "news"
image = "news-1.jpg"
url = "https://example.com/news-1"
featured = true

[[articles]]
title = "Nouns Hunt Release Trailer"
tag = "video"
image = "news-2.jpg"
url = "https://example.com/news-2"

[[articles]]
title = "Dev Insights: Building Nouns Hunt"
tag = "exclusive"
image = "news-3.jpg"
url = "https://example.com/news-3"
"#;

const CAREERS_TOML: &str = r#"
intro = "We're a small team shipping big games."

[[roles]]
title = "Backend Developer"
description = "Own the multiplayer services behind our games."
location = "Remote"
employment = "Full-time"
team = "Engineering"
apply_url = "mailto:jobs@dashstudios.example"
"#;

const TEAM_TOML: &str = r#"
story = "Founded in a dorm room, shipped from everywhere.\n\nWe build games we want to play."

[[members]]
name = "Ada Example"
role = "Studio Director"
photo = "team-1.jpg"

[[members]]
name = "Sam Example"
role = "Art Lead"
photo = "team-2.jpg"

[[commitments]]
title = "Players first"
body = "No dark patterns, ever."

[[commitments]]
title = "Sustainable pace"
body = "Crunch doesn't ship better games."
"#;

const PRIVACY_MD: &str = "# Privacy Policy\n\nWe collect nothing.\n";
const TERMS_MD: &str = "# Terms of Service\n\nBe kind.\n";

/// Every asset filename the fixture content references.
const FIXTURE_ASSETS: &[&str] = &[
    "logo.png",
    "loading.gif",
    "nouns-hunt.jpg",
    "nouns-attack.jpg",
    "hero-background.jpg",
    "hero-background-mobile.jpg",
    "shot-1.jpg",
    "shot-2.jpg",
    "news-1.jpg",
    "news-2.jpg",
    "news-3.jpg",
    "twitter.png",
    "youtube.png",
    "team-1.jpg",
    "team-2.jpg",
];

// =========================================================================
// Fixture setup
// =========================================================================

/// Build a full content tree in a temp directory.
///
/// Tests get an isolated copy they can mutate without affecting other tests.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    std::fs::write(root.join("config.toml"), CONFIG_TOML).unwrap();
    std::fs::write(root.join("games.toml"), GAMES_TOML).unwrap();
    std::fs::write(root.join("news.toml"), NEWS_TOML).unwrap();
    std::fs::write(root.join("careers.toml"), CAREERS_TOML).unwrap();
    std::fs::write(root.join("team.toml"), TEAM_TOML).unwrap();

    std::fs::create_dir(root.join("pages")).unwrap();
    std::fs::write(root.join("pages/privacy.md"), PRIVACY_MD).unwrap();
    std::fs::write(root.join("pages/terms-of-service.md"), TERMS_MD).unwrap();

    std::fs::create_dir(root.join("assets")).unwrap();
    for asset in FIXTURE_ASSETS {
        write_asset(root, asset);
    }

    tmp
}

/// Build the smallest valid content tree: no data files, just the assets the
/// stock config references.
pub fn minimal_content() -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir(tmp.path().join("assets")).unwrap();
    write_asset(tmp.path(), "logo.png");
    write_asset(tmp.path(), "loading.gif");
    tmp
}

/// Write a tiny image under `assets/<name>`.
pub fn write_asset(root: &Path, name: &str) {
    std::fs::write(root.join("assets").join(name), TINY_PNG).unwrap();
}

// =========================================================================
// Manifest lookups — panics with a clear message on miss
// =========================================================================

/// Find a game by slug. Panics if not found.
pub fn find_game<'a>(manifest: &'a Manifest, slug: &str) -> &'a Game {
    manifest
        .games
        .iter()
        .find(|g| g.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = manifest.games.iter().map(|g| g.slug.as_str()).collect();
            panic!("game '{slug}' not found. Available: {slugs:?}")
        })
}

/// Find a news article by title. Panics if not found.
pub fn find_article<'a>(manifest: &'a Manifest, title: &str) -> &'a NewsArticle {
    manifest
        .news
        .iter()
        .find(|a| a.title == title)
        .unwrap_or_else(|| {
            let titles: Vec<&str> = manifest.news.iter().map(|a| a.title.as_str()).collect();
            panic!("article '{title}' not found. Available: {titles:?}")
        })
}

/// Find a markdown page by slug. Panics if not found.
pub fn find_page<'a>(manifest: &'a Manifest, slug: &str) -> &'a MarkdownPage {
    manifest
        .pages
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = manifest.pages.iter().map(|p| p.slug.as_str()).collect();
            panic!("page '{slug}' not found. Available: {slugs:?}")
        })
}
