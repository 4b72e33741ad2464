//! # Marquee
//!
//! A minimal static site generator for game-studio marketing sites. Your
//! filesystem is the data source: TOML files describe the games, news,
//! roles, and team; markdown files become legal pages; `assets/` holds the
//! art. The generated site is plain HTML and CSS plus one small script — the
//! resource-gated page reveal.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! Marquee processes content through three independent stages, each
//! producing a JSON manifest that the next stage consumes:
//!
//! ```text
//! 1. Scan      content/  →  manifest.json    (data files + assets → structured data)
//! 2. Process   manifest  →  staged/          (asset dimensions, fingerprints, copies)
//! 3. Generate  manifest  →  dist/            (final HTML site + reveal runtime)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Debuggability**: each manifest is human-readable JSON you can inspect.
//! - **Incremental builds**: unchanged assets are not restaged.
//! - **Testability**: scan and generate are pure functions from data to
//!   data, so tests exercise pipeline logic without a browser anywhere.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1 — reads content data files and assets, produces the scan manifest |
//! | [`assets`] | Stage 2 — probes dimensions, fingerprints and stages assets |
//! | [`generate`] | Stage 3 — assembles the HTML pages from the manifest using Maud |
//! | [`reveal`] | The resource-gated reveal protocol: tracker, controller, plan, simulator |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | Shared content types serialized between stages |
//! | [`output`] | CLI output formatting — information-first display of pipeline results |
//!
//! # Design Decisions
//!
//! ## One Reveal Component
//!
//! Hand-rolled sites repeat the same loading-gate logic in every page
//! script: count the images, flip the visibility flag when they're done,
//! fall back to a timer when they're not. Marquee has the protocol exactly
//! once, in [`reveal`], as a sans-IO state machine. The
//! generator derives a per-page [`reveal::RevealPlan`] (which resource kinds
//! to track, whether a fallback timeout is armed) and embeds the one shared
//! runtime configured by it. The `check` command drives the same state
//! machine on a virtual clock to prove that no page can hang behind its
//! overlay — including the case the timeout exists for, an animation player
//! that never fires an event.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system, rather than Handlebars or Tera. Malformed HTML is a
//! build error, template variables are Rust expressions, interpolation is
//! auto-escaped, and there is no template directory to ship or get out of
//! sync.
//!
//! ## Assets Ship As Authored
//!
//! Marketing art is hand-tuned per placement, so the pipeline stages assets
//! byte-for-byte: no re-encoding, no resizing. Stage 2 exists to know each
//! image's dimensions (written into `width`/`height` attributes so pages
//! don't reflow while loading) and to fingerprint content for incremental
//! staging and build versioning.
//!
//! ## Data Files Over Page Scripts
//!
//! The header, nav, and footer exist once in the page assembler instead of
//! being copy-pasted per page, and everything page-specific is data: which
//! games exist, which article is featured, which roles are open. Adding a
//! news item is a TOML edit, not a script edit.

pub mod assets;
pub mod config;
pub mod generate;
pub mod output;
pub mod reveal;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
