//! HTML site generation.
//!
//! Stage 3 of the marquee build pipeline. Takes the staged-asset manifest
//! and generates the final static site.
//!
//! ## Generated Pages
//!
//! - **Landing page** (`/index.html`): hero, games grid, news highlights
//! - **Game promo pages** (`/<slug>.html`): hero, about, screenshot gallery
//! - **Studio page** (`/who-we-are.html`): story, leadership, commitments
//! - **Careers page** (`/careers.html`): intro and open roles
//! - **News page** (`/news.html`): full article grid
//! - **Markdown pages** (`/<slug>.html`): terms, privacy, anything under `pages/`
//! - **Error page** (`/404.html`): headline, message, animation player
//!
//! ## One Page Assembler
//!
//! Every page is one composition — loading overlay, header (logo, nav,
//! contact button, hamburger), page sections, footer (logo, page links,
//! social icons) — parameterized by content. The header and footer exist
//! exactly once in this module, not once per page.
//!
//! ## The Reveal Gate
//!
//! The main content container ships with its display suppressed behind a
//! blocking overlay. Each page embeds `static/reveal.js` configured from its
//! [`RevealPlan`]: which resource kinds to wait on and whether a fallback
//! timeout is armed. The same plan drives the reveal simulation behind the
//! `check` command, so a page that could hang is caught at build time, not
//! in a visitor's tab.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping. Static
//! assets (`static/style.css`, `static/reveal.js`) are embedded at compile
//! time.

use crate::assets;
use crate::config::{self, SiteConfig};
use crate::reveal::{
    ResourceHandle, ResourceScript, RevealPlan, RevealReport, simulate,
};
use crate::scan::{Careers, Team};
use crate::types::{Game, MarkdownPage, NavLink, NewsArticle};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const REVEAL_JS: &str = include_str!("../static/reveal.js");

/// Module script for the animation-player custom element, loaded only on
/// pages that render one.
const PLAYER_SCRIPT_URL: &str =
    "https://unpkg.com/@dotlottie/player-component@2.7.12/dist/dotlottie-player.mjs";

/// A fully rendered page plus everything `check` needs to reason about it.
pub struct BuiltPage {
    /// Output filename (`index.html`, `careers.html`, ...).
    pub file: String,
    /// `<title>` text.
    pub title: String,
    /// Rendered HTML.
    pub markup: Markup,
    /// Loadable resources the page will register, in DOM order.
    pub resources: Vec<ResourceHandle>,
    /// The page's reveal configuration.
    pub plan: RevealPlan,
}

/// Reveal simulation verdict for one page, produced by `check`.
pub struct PageCheck {
    pub file: String,
    pub images: usize,
    pub animations: usize,
    pub timeout_armed: bool,
    /// Every resource settles: must reveal via settlement.
    pub settled: RevealReport,
    /// Images settle, players stay silent: must reveal via timeout if any
    /// player is tracked.
    pub starved: RevealReport,
}

impl PageCheck {
    /// A page passes when it reveals under both scripts.
    pub fn ok(&self) -> bool {
        self.settled.revealed && self.starved.revealed
    }
}

pub fn generate(
    manifest_path: &Path,
    staged_dir: &Path,
    output_dir: &Path,
) -> Result<(), GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: assets::Manifest = serde_json::from_str(&manifest_content)?;

    fs::create_dir_all(output_dir)?;

    // Copy staged assets to output
    let staged_assets = staged_dir.join("assets");
    if staged_assets.is_dir() {
        copy_dir_recursive(&staged_assets, &output_dir.join("assets"))?;
    }

    for page in assemble_pages(&manifest) {
        fs::write(output_dir.join(&page.file), page.markup.into_string())?;
    }

    Ok(())
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else if src_path.extension().map(|e| e != "json").unwrap_or(true) {
            // Skip manifest.json, copy everything else
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// ============================================================================
// Page assembly
// ============================================================================

/// Assemble every page of the site.
pub fn assemble_pages(manifest: &assets::Manifest) -> Vec<BuiltPage> {
    let site = &manifest.site;
    let mut pages = Vec::new();

    pages.push(assemble(manifest, "index.html", &site.config.studio_name, "", |m, refs| {
        home_sections(m, refs)
    }));

    for game in site.games.iter().filter(|g| g.promo) {
        pages.push(assemble(manifest, &format!("{}.html", game.slug), &game.title, "", |m, refs| {
            game_sections(m, game, refs)
        }));
    }

    if let Some(team) = &site.team {
        let title = format!("Who We Are - {}", site.config.studio_name);
        pages.push(assemble(manifest, "who-we-are.html", &title, "who-we-are.html", |m, refs| {
            studio_sections(m, team, refs)
        }));
    }

    if !site.careers.roles.is_empty() {
        let title = format!("Careers - {}", site.config.studio_name);
        pages.push(assemble(manifest, "careers.html", &title, "careers.html", |_, _| {
            careers_sections(&site.careers)
        }));
    }

    if !site.news.is_empty() {
        let title = format!("News - {}", site.config.studio_name);
        pages.push(assemble(manifest, "news.html", &title, "news.html", |m, refs| {
            news_grid_sections(m, refs)
        }));
    }

    for page in &site.pages {
        pages.push(assemble(manifest, &format!("{}.html", page.slug), &page.title, "", |_, _| {
            markdown_sections(page)
        }));
    }

    let title = format!("{} - {}", site.config.error_page.headline, site.config.studio_name);
    pages.push(assemble(manifest, "404.html", &title, "", |m, refs| {
        error_sections(m, refs)
    }));

    pages
}

/// Assemble one page: overlay + header + sections + footer, with its
/// resource snapshot and reveal plan.
fn assemble(
    manifest: &assets::Manifest,
    file: &str,
    title: &str,
    current: &str,
    sections: impl FnOnce(&assets::Manifest, &mut Vec<ResourceHandle>) -> Markup,
) -> BuiltPage {
    let site = &manifest.site;
    let config = &site.config;
    let is_error_page = file == "404.html";
    let has_player = is_error_page && config.error_page.animation.is_some();
    let plan = RevealPlan::for_page(&config.reveal, has_player);

    // Resources in DOM order: overlay image, header logo, section images,
    // footer logo and icons, then any animation player.
    let mut refs = Vec::new();
    refs.push(ResourceHandle::image(asset_url(&config.loading_image)));
    refs.push(ResourceHandle::image(asset_url(&config.logo)));

    let body = sections(manifest, &mut refs);

    refs.push(ResourceHandle::image(asset_url(&config.logo)));
    for social in &config.social {
        refs.push(ResourceHandle::image(asset_url(&social.icon)));
    }
    if has_player {
        let src = config.error_page.animation.as_deref().unwrap_or_default();
        refs.push(ResourceHandle::animation(src));
    }

    let css = page_css(manifest, file);
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="generator" content={ "marquee " (manifest.version) };
                title { (title) }
                style { (PreEscaped(css)) }
                @if has_player {
                    script type="module" src=(PLAYER_SCRIPT_URL) {}
                }
            }
            body {
                (loading_overlay(manifest))
                div id="app" style="display:none" {
                    (site_header(config, &site.navigation, current))
                    main {
                        (body)
                    }
                    (site_footer(config, &site.footer_links))
                }
                script data-reveal=(reveal_attr(&plan)) {
                    (PreEscaped(REVEAL_JS))
                }
            }
        }
    };

    BuiltPage {
        file: file.to_string(),
        title: title.to_string(),
        markup,
        resources: refs,
        plan,
    }
}

fn asset_url(name: &str) -> String {
    format!("assets/{name}")
}

/// Serialized reveal plan for the runtime's `data-reveal` attribute.
fn reveal_attr(plan: &RevealPlan) -> String {
    serde_json::to_string(&plan.runtime_config()).expect("runtime config must serialize")
}

/// Per-page stylesheet: palette custom properties, the static base sheet,
/// and hero background rules when the page has a hero.
fn page_css(manifest: &assets::Manifest, file: &str) -> String {
    let mut css = format!(
        "{}\n\n{}",
        config::generate_color_css(&manifest.site.config.colors),
        CSS_STATIC
    );
    let hero_game = match file {
        "index.html" => manifest.site.hero_game(),
        _ => manifest
            .site
            .games
            .iter()
            .find(|g| format!("{}.html", g.slug) == file),
    };
    if let Some(game) = hero_game {
        if let Some(bg) = &game.hero_background {
            css.push_str(&format!(
                "\n.hero {{ background-image: url({}); }}\n",
                asset_url(bg)
            ));
            let mobile = game.hero_background_mobile.as_ref().unwrap_or(bg);
            css.push_str(&format!(
                "@media (max-width: 768px) {{ .hero {{ background-image: url({}); }} }}\n",
                asset_url(mobile)
            ));
        }
    }
    css
}

// ============================================================================
// Shared components
// ============================================================================

/// The blocking overlay shown until the page's resources settle.
fn loading_overlay(manifest: &assets::Manifest) -> Markup {
    let config = &manifest.site.config;
    html! {
        div id="loading-screen" {
            (sized_img(manifest, &config.loading_image, "Loading...", None))
        }
    }
}

/// An `img` with `width`/`height` attributes when the inventory knows them.
fn sized_img(
    manifest: &assets::Manifest,
    asset: &str,
    alt: &str,
    class: Option<&str>,
) -> Markup {
    let dims = manifest.dimensions_of(asset);
    html! {
        img class=[class]
            src=(asset_url(asset))
            alt=(alt)
            width=[dims.map(|d| d.0)]
            height=[dims.map(|d| d.1)];
    }
}

/// Sticky header: logo, nav links, contact button, hamburger toggle.
fn site_header(config: &SiteConfig, nav: &[NavLink], current: &str) -> Markup {
    html! {
        header.site-header {
            a.logo href="index.html" {
                img src=(asset_url(&config.logo)) alt=(config.studio_name);
            }
            input.nav-toggle type="checkbox" id="nav-toggle";
            nav.site-nav {
                ul.nav-links {
                    @for link in nav {
                        li class=[(link.href == current).then_some("current")] {
                            a href=(link.href) { (link.label) }
                        }
                    }
                }
            }
            div.header-actions {
                a.get-in-touch href={ "mailto:" (config.contact_email) } {
                    span.icon { "💬" }
                    "Get in touch"
                }
                label.nav-hamburger for="nav-toggle" {
                    span.hamburger-line {}
                    span.hamburger-line {}
                    span.hamburger-line {}
                }
            }
        }
    }
}

/// Footer: logo, page links, social icons, copyright.
fn site_footer(config: &SiteConfig, footer_links: &[NavLink]) -> Markup {
    html! {
        footer.site-footer {
            div.footer-left {
                a href="index.html" {
                    img src=(asset_url(&config.logo)) alt=(config.studio_name);
                }
            }
            div.footer-center {
                ul.footer-nav {
                    @for link in footer_links {
                        li {
                            a href=(link.href) { (link.label) }
                        }
                    }
                }
            }
            div.footer-right {
                div.social-links {
                    @for social in &config.social {
                        a href=(social.url) target="_blank" rel="noopener" {
                            img src=(asset_url(&social.icon)) alt={ (social.platform) " Logo" };
                        }
                    }
                }
                p { "All Rights Reserved" }
                p { (config.copyright) }
            }
        }
    }
}

/// Markdown to raw HTML.
fn render_markdown(text: &str) -> Markup {
    let parser = Parser::new(text);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    PreEscaped(out)
}

/// A news card; the featured card is the large layout variant.
fn news_card(
    manifest: &assets::Manifest,
    article: &NewsArticle,
    featured: bool,
    refs: &mut Vec<ResourceHandle>,
) -> Markup {
    refs.push(ResourceHandle::image(asset_url(&article.image)));
    let class = if featured {
        "news-card featured scroll-reveal"
    } else {
        "news-card scroll-reveal"
    };
    html! {
        a class=(class) href=(article.url) target="_blank" rel="noopener" {
            (sized_img(manifest, &article.image, &article.title, None))
            div.news-card-text {
                span class={ "news-tag " (article.tag.css_class()) } {
                    span.icon { (article.tag.icon()) }
                    (article.tag.label())
                }
                h3 { (article.title) }
            }
        }
    }
}

// ============================================================================
// Page sections
// ============================================================================

/// Landing page: hero, games grid, news highlights.
fn home_sections(manifest: &assets::Manifest, refs: &mut Vec<ResourceHandle>) -> Markup {
    let site = &manifest.site;
    let hero = site.hero_game();
    let featured = site.featured_article();
    let smaller: Vec<&NewsArticle> = site
        .news
        .iter()
        .filter(|a| {
            featured.map(|f| !std::ptr::eq(*a, f)).unwrap_or(true)
        })
        .take(4)
        .collect();

    html! {
        @if let Some(game) = hero {
            section.hero {
                @if let Some(url) = &game.download_url {
                    a.download-button href=(url) target="_blank" rel="noopener" {
                        "Download Now"
                    }
                }
            }
        }
        @if !site.games.is_empty() {
            section.games {
                h2 { "Our Games" }
                div.games-grid {
                    @for game in &site.games {
                        (game_card(manifest, game, refs))
                    }
                }
            }
        }
        @if featured.is_some() || !smaller.is_empty() {
            section.news-events {
                div.news-header {
                    h2 { "News & Events" }
                    a.see-more href="news.html" { "See More" }
                }
                div.news-content {
                    @if let Some(article) = featured {
                        (news_card(manifest, article, true, refs))
                    }
                    div.smaller-articles {
                        @for article in &smaller {
                            (news_card(manifest, article, false, refs))
                        }
                    }
                }
            }
        }
    }
}

/// A cover card on the games grid, linked to the promo page when one exists.
fn game_card(
    manifest: &assets::Manifest,
    game: &Game,
    refs: &mut Vec<ResourceHandle>,
) -> Markup {
    refs.push(ResourceHandle::image(asset_url(&game.cover)));
    let cover = sized_img(manifest, &game.cover, &game.title, Some("game-cover"));
    html! {
        div.game-card {
            @if let Some(tag) = &game.tag {
                span.game-ribbon { (tag) }
            }
            @if game.promo {
                a href={ (game.slug) ".html" } { (cover) }
            } @else {
                (cover)
            }
        }
    }
}

/// Game promo page: hero, about, screenshots, download call-to-action.
fn game_sections(
    manifest: &assets::Manifest,
    game: &Game,
    refs: &mut Vec<ResourceHandle>,
) -> Markup {
    html! {
        section.hero.promo-hero {
            h1 { (game.title) }
            @if let Some(url) = &game.download_url {
                a.download-button href=(url) target="_blank" rel="noopener" {
                    "Download Now"
                }
            }
        }
        @if let Some(about) = &game.about {
            section.game-about {
                (render_markdown(about))
            }
        }
        @if !game.screenshots.is_empty() {
            section.screenshots {
                h2 { "Screenshots" }
                div.screenshot-grid {
                    @for shot in &game.screenshots {
                        ({
                            refs.push(ResourceHandle::image(asset_url(shot)));
                            sized_img(manifest, shot, &game.title, None)
                        })
                    }
                }
            }
        }
    }
}

/// Studio page: story, leadership grid, commitments.
fn studio_sections(
    manifest: &assets::Manifest,
    team: &Team,
    refs: &mut Vec<ResourceHandle>,
) -> Markup {
    html! {
        section.our-story {
            h2 { "Our Story" }
            (render_markdown(&team.story))
        }
        @if !team.members.is_empty() {
            section.leadership {
                h2 { "Leadership" }
                div.team-grid {
                    @for member in &team.members {
                        div.team-card {
                            ({
                                refs.push(ResourceHandle::image(asset_url(&member.photo)));
                                sized_img(manifest, &member.photo, &member.name, None)
                            })
                            h3 { (member.name) }
                            p { (member.role) }
                        }
                    }
                }
            }
        }
        @if !team.commitments.is_empty() {
            section.commitments {
                h2 { "Our Commitments" }
                div.commitment-grid {
                    @for commitment in &team.commitments {
                        div.commitment-card {
                            h3 { (commitment.title) }
                            p { (commitment.body) }
                        }
                    }
                }
            }
        }
    }
}

/// Careers page: intro and open roles.
fn careers_sections(careers: &Careers) -> Markup {
    html! {
        section.open-roles {
            h2 { "Open Roles" }
            @if let Some(intro) = &careers.intro {
                div.careers-intro {
                    (render_markdown(intro))
                }
            }
            div.job-container {
                @for role in &careers.roles {
                    div.job-listing {
                        h3.job-title { (role.title) }
                        p.job-description { (role.description) }
                        div.job-details {
                            span.job-detail-item { (role.location) }
                            span.job-detail-item { (role.employment) }
                            span.job-detail-item { (role.team) }
                        }
                        a.apply-button href=(role.apply_url) { "Apply Now" }
                    }
                }
            }
        }
    }
}

/// News page: every article as a card.
fn news_grid_sections(manifest: &assets::Manifest, refs: &mut Vec<ResourceHandle>) -> Markup {
    html! {
        section.news-page {
            h2 { "News & Events" }
            div.news-grid {
                @for article in &manifest.site.news {
                    (news_card(manifest, article, false, refs))
                }
            }
        }
    }
}

/// A long-form markdown page (terms, privacy, ...).
fn markdown_sections(page: &MarkdownPage) -> Markup {
    html! {
        section.text-page {
            article {
                (render_markdown(&page.body))
            }
        }
    }
}

/// The 404 page: headline, message, animation player with fallback text.
fn error_sections(manifest: &assets::Manifest, _refs: &mut Vec<ResourceHandle>) -> Markup {
    let error = &manifest.site.config.error_page;
    html! {
        section.error-section {
            h2 { (error.headline) }
            p { (error.message) }
            @if let Some(src) = &error.animation {
                dotlottie-player src=(src) background="transparent" speed="1" loop autoplay {}
                p.player-fallback hidden { (error.fallback_text) }
            }
            a.home-button href="index.html" { (error.home_label) }
        }
    }
}

// ============================================================================
// Reveal checking
// ============================================================================

/// Simulate every page's reveal under a settling script and a starved one.
///
/// The settling script loads every resource in registration order at 10 ms
/// intervals. The starved script loads images but leaves animation players
/// silent — the worst case the fallback timeout exists for.
pub fn check_pages(pages: &[BuiltPage]) -> Vec<PageCheck> {
    pages
        .iter()
        .map(|page| {
            let images = page
                .resources
                .iter()
                .filter(|r| r.kind == crate::reveal::ResourceKind::Image)
                .count();
            let animations = page.resources.len() - images;

            // Script indices refer to the tracked subset, mirroring how the
            // gate snapshots only the kinds the plan waits on.
            let tracked: Vec<ResourceHandle> = page
                .resources
                .iter()
                .filter(|r| match r.kind {
                    crate::reveal::ResourceKind::Image => page.plan.track_images,
                    crate::reveal::ResourceKind::Animation => page.plan.track_animations,
                })
                .cloned()
                .collect();

            let settling: Vec<ResourceScript> = (0..tracked.len())
                .map(|i| ResourceScript::loads(i, 10 * (i as u64 + 1)))
                .collect();
            let starved: Vec<ResourceScript> = tracked
                .iter()
                .enumerate()
                .map(|(i, r)| match r.kind {
                    crate::reveal::ResourceKind::Image => {
                        ResourceScript::loads(i, 10 * (i as u64 + 1))
                    }
                    crate::reveal::ResourceKind::Animation => ResourceScript::silent(i),
                })
                .collect();

            PageCheck {
                file: page.file.clone(),
                images,
                animations,
                timeout_armed: page.plan.fallback_timeout.is_some(),
                settled: simulate(&page.plan, tracked.clone(), &settling),
                starved: simulate(&page.plan, tracked, &starved),
            }
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
