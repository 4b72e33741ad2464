//! Per-page reveal configuration.
//!
//! Which resource kinds a page waits on — and whether a fallback timeout is
//! armed — is configuration, not hard-coded behavior. The generator derives
//! one [`RevealPlan`] per page from the site's `[reveal]` config and the
//! page's own content, then feeds it to both consumers: the simulator (for
//! `check`) and the embedded client runtime (as JSON).

use crate::config::{AnimationTracking, RevealConfig};
use serde::Serialize;
use std::time::Duration;

/// Reveal configuration for a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealPlan {
    /// Wait on `<img>` elements. Always true for stock pages.
    pub track_images: bool,
    /// Wait on animation-player elements too.
    pub track_animations: bool,
    /// Reveal regardless of pending resources after this long.
    pub fallback_timeout: Option<Duration>,
    /// Cosmetic overlay fade before removal.
    pub fade: Duration,
}

impl RevealPlan {
    /// Derive the plan for a page.
    ///
    /// `page_has_player` is whether the assembled page contains an animation
    /// player element. A page that tracks an actual player always arms the
    /// fallback timeout: a custom element may fail silently, never firing
    /// `ready` or `error`, and only the timeout guarantees forward progress
    /// then.
    pub fn for_page(config: &RevealConfig, page_has_player: bool) -> Self {
        let track_animations = match config.track_animations {
            AnimationTracking::ErrorPage => page_has_player,
            AnimationTracking::AllPages => true,
            AnimationTracking::Never => false,
        };
        let armed = (track_animations && page_has_player) || config.all_pages_timeout;
        Self {
            track_images: true,
            track_animations,
            fallback_timeout: armed.then(|| Duration::from_millis(config.fallback_timeout_ms)),
            fade: Duration::from_millis(config.fade_ms),
        }
    }

    /// The JSON object the client runtime reads from `data-reveal` on its
    /// script tag.
    pub fn runtime_config(&self) -> RuntimeRevealConfig {
        RuntimeRevealConfig {
            track_images: self.track_images,
            track_animations: self.track_animations,
            timeout_ms: self.fallback_timeout.map(|d| d.as_millis() as u64),
            fade_ms: self.fade.as_millis() as u64,
        }
    }
}

/// Wire form of [`RevealPlan`] for the client runtime.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeRevealConfig {
    pub track_images: bool,
    pub track_animations: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    pub fade_ms: u64,
}
