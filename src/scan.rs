//! Content discovery and manifest generation.
//!
//! Stage 1 of the marquee build pipeline. Reads the content directory into a
//! structured manifest that subsequent stages consume.
//!
//! ## Content Structure
//!
//! ```text
//! content/
//! ├── config.toml          # Site config (optional, stock defaults apply)
//! ├── games.toml           # Games catalogue (hero + grid + promo pages)
//! ├── news.toml            # News & events articles
//! ├── careers.toml         # Open roles
//! ├── team.toml            # Story, leadership, commitments
//! ├── pages/               # Long-form markdown pages (terms, privacy, ...)
//! │   ├── terms-of-service.md
//! │   └── privacy.md
//! └── assets/              # Images: logo, covers, news art, icons
//!     ├── logo.png
//!     └── ...
//! ```
//!
//! Every data file is optional: a site without `careers.toml` simply has no
//! careers page and no "Careers" entry in the header nav. The filesystem is
//! the data source — which files exist decides which pages exist.
//!
//! ## Validation
//!
//! The scanner enforces these rules:
//! - Every referenced asset (covers, thumbnails, icons, logo, ...) exists
//! - Game slugs are unique and don't collide with built-in page slugs
//! - At most one game is the hero; at most one article is featured
//! - A game with a promo page has a download link to put on it

use crate::config::{self, SiteConfig};
use crate::types::{
    Commitment, Game, JobRole, MarkdownPage, NavLink, NewsArticle, TeamMember,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("failed to parse {path}: {source}")]
    Data {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("missing asset '{asset}' referenced by {referenced_by}")]
    MissingAsset { asset: String, referenced_by: String },
    #[error("duplicate page slug: {0}")]
    DuplicateSlug(String),
    #[error("more than one game is marked hero = true")]
    MultipleHeroGames,
    #[error("more than one article is marked featured = true")]
    MultipleFeaturedArticles,
    #[error("game '{0}' has promo = true but no download_url")]
    PromoWithoutDownload(String),
}

/// Slugs reserved for generated pages; game promo slugs must not shadow them.
const RESERVED_SLUGS: &[&str] = &["index", "who-we-are", "careers", "news", "404"];

/// Manifest output from the scan stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    /// Header navigation, in display order.
    pub navigation: Vec<NavLink>,
    /// Footer navigation (markdown pages).
    pub footer_links: Vec<NavLink>,
    pub games: Vec<Game>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub news: Vec<NewsArticle>,
    pub careers: Careers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<MarkdownPage>,
    /// Relative paths of every file under `assets/`, sorted.
    pub assets: Vec<String>,
    pub config: SiteConfig,
}

impl Manifest {
    /// The game featured on the landing-page hero, if any.
    pub fn hero_game(&self) -> Option<&Game> {
        self.games.iter().find(|g| g.hero)
    }

    /// The featured news article, falling back to the first one.
    pub fn featured_article(&self) -> Option<&NewsArticle> {
        self.news
            .iter()
            .find(|a| a.featured)
            .or_else(|| self.news.first())
    }
}

/// Careers page content from `careers.toml`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Careers {
    /// Markdown intro shown above the roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<JobRole>,
}

/// Studio page content from `team.toml`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Team {
    /// Markdown "our story" section.
    pub story: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<TeamMember>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commitments: Vec<Commitment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GamesFile {
    #[serde(default)]
    games: Vec<Game>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NewsFile {
    #[serde(default)]
    articles: Vec<NewsArticle>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CareersFile {
    #[serde(default)]
    intro: Option<String>,
    #[serde(default)]
    roles: Vec<JobRole>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TeamFile {
    story: String,
    #[serde(default)]
    members: Vec<TeamMember>,
    #[serde(default)]
    commitments: Vec<Commitment>,
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;

    let games = load_data::<GamesFile>(root, "games.toml")?
        .unwrap_or_default()
        .games;
    let news = load_data::<NewsFile>(root, "news.toml")?
        .unwrap_or_default()
        .articles;
    let careers_file = load_data::<CareersFile>(root, "careers.toml")?.unwrap_or_default();
    let careers = Careers {
        intro: careers_file.intro,
        roles: careers_file.roles,
    };
    let team = load_data::<TeamFile>(root, "team.toml")?.map(|t| Team {
        story: t.story,
        members: t.members,
        commitments: t.commitments,
    });

    let pages = parse_pages(root)?;
    let assets = scan_assets(root)?;

    let manifest = Manifest {
        navigation: build_navigation(team.is_some(), !careers.roles.is_empty(), !news.is_empty()),
        footer_links: pages
            .iter()
            .map(|p| NavLink {
                label: p.link_title.clone(),
                href: format!("{}.html", p.slug),
            })
            .collect(),
        games,
        news,
        careers,
        team,
        pages,
        assets,
        config,
    };

    validate(&manifest)?;
    Ok(manifest)
}

/// Load and parse an optional TOML data file from the content root.
fn load_data<T: serde::de::DeserializeOwned>(
    root: &Path,
    name: &str,
) -> Result<Option<T>, ScanError> {
    let path = root.join(name);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    let parsed = toml::from_str(&content).map_err(|source| ScanError::Data {
        path: path.clone(),
        source,
    })?;
    Ok(Some(parsed))
}

/// Parse all markdown files under `pages/` into footer pages.
///
/// The page title comes from the first `# heading`; the footer label comes
/// from the filename (dashes → spaces). Files sort by name.
fn parse_pages(root: &Path) -> Result<Vec<MarkdownPage>, ScanError> {
    let pages_dir = root.join("pages");
    if !pages_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut md_files: Vec<PathBuf> = fs::read_dir(&pages_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case("md"))
                    .unwrap_or(false)
        })
        .collect();
    md_files.sort();

    let mut pages = Vec::new();
    for md_path in &md_files {
        let slug = md_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let link_title = slug.replace('-', " ");

        let body = fs::read_to_string(md_path)?;
        let title = body
            .lines()
            .find(|line| line.starts_with("# "))
            .map(|line| line.trim_start_matches("# ").trim().to_string())
            .unwrap_or_else(|| link_title.clone());

        pages.push(MarkdownPage {
            title,
            link_title,
            slug,
            body,
        });
    }
    Ok(pages)
}

/// Collect relative paths of every file under `assets/`, sorted.
fn scan_assets(root: &Path) -> Result<Vec<String>, ScanError> {
    let assets_dir = root.join("assets");
    if !assets_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut assets = Vec::new();
    for entry in WalkDir::new(&assets_dir) {
        let entry = entry.map_err(|e| ScanError::Io(e.into()))?;
        if entry.file_type().is_file() {
            let rel = entry
                .path()
                .strip_prefix(&assets_dir)
                .expect("walkdir yields paths under its root")
                .to_string_lossy()
                .replace('\\', "/");
            assets.push(rel);
        }
    }
    assets.sort();
    Ok(assets)
}

/// Header nav in the site's fixed display order; entries appear only for
/// content that exists.
fn build_navigation(has_team: bool, has_roles: bool, has_news: bool) -> Vec<NavLink> {
    let mut nav = Vec::new();
    if has_team {
        nav.push(NavLink {
            label: "Who We Are".to_string(),
            href: "who-we-are.html".to_string(),
        });
    }
    if has_roles {
        nav.push(NavLink {
            label: "Careers".to_string(),
            href: "careers.html".to_string(),
        });
    }
    if has_news {
        nav.push(NavLink {
            label: "News".to_string(),
            href: "news.html".to_string(),
        });
    }
    nav
}

fn validate(manifest: &Manifest) -> Result<(), ScanError> {
    let assets: BTreeSet<&str> = manifest.assets.iter().map(String::as_str).collect();
    let require = |asset: &str, referenced_by: &str| -> Result<(), ScanError> {
        if assets.contains(asset) {
            Ok(())
        } else {
            Err(ScanError::MissingAsset {
                asset: asset.to_string(),
                referenced_by: referenced_by.to_string(),
            })
        }
    };

    let cfg = &manifest.config;
    require(&cfg.logo, "config.toml logo")?;
    require(&cfg.loading_image, "config.toml loading_image")?;
    for social in &cfg.social {
        require(&social.icon, &format!("social link '{}'", social.platform))?;
    }

    let mut slugs: BTreeSet<&str> = RESERVED_SLUGS.iter().copied().collect();
    for page in &manifest.pages {
        if !slugs.insert(&page.slug) {
            return Err(ScanError::DuplicateSlug(page.slug.clone()));
        }
    }

    if manifest.games.iter().filter(|g| g.hero).count() > 1 {
        return Err(ScanError::MultipleHeroGames);
    }
    if manifest.news.iter().filter(|a| a.featured).count() > 1 {
        return Err(ScanError::MultipleFeaturedArticles);
    }

    for game in &manifest.games {
        let by = format!("game '{}'", game.slug);
        require(&game.cover, &by)?;
        if let Some(bg) = &game.hero_background {
            require(bg, &by)?;
        }
        if let Some(bg) = &game.hero_background_mobile {
            require(bg, &by)?;
        }
        for shot in &game.screenshots {
            require(shot, &by)?;
        }
        if game.promo {
            if !slugs.insert(&game.slug) {
                return Err(ScanError::DuplicateSlug(game.slug.clone()));
            }
            if game.download_url.is_none() {
                return Err(ScanError::PromoWithoutDownload(game.slug.clone()));
            }
        }
    }

    for article in &manifest.news {
        require(&article.image, &format!("article '{}'", article.title))?;
    }

    if let Some(team) = &manifest.team {
        for member in &team.members {
            require(&member.photo, &format!("team member '{}'", member.name))?;
        }
    }

    Ok(())
}
