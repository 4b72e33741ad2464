//! Composition of tracker and controller: one gate per page load.
//!
//! The page assembler hands the gate a snapshot of the page's loadable
//! resources and a [`RevealPlan`]; from then on the gate consumes
//! [`RevealEvent`]s from the host environment and answers with
//! [`Effect`]s. No callbacks, no shared state: the host owns the event
//! loop, the gate owns the policy.

use super::controller::{Effect, RevealController, RevealPhase, RevealTrigger};
use super::plan::RevealPlan;
use super::tracker::{Outcome, ResourceHandle, ResourceKind, ResourceTracker, TrackedResource};

/// A completion notification delivered by the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEvent {
    /// The resource at `index` (registration order) loaded successfully.
    ResourceLoaded { index: usize },
    /// The resource at `index` failed to load. Terminal, not an error.
    ResourceFailed { index: usize },
    /// The fallback timeout expired.
    TimeoutFired,
    /// The cosmetic overlay fade finished.
    FadeElapsed,
}

/// The per-page reveal gate.
#[derive(Debug)]
pub struct RevealGate {
    tracker: ResourceTracker,
    controller: RevealController,
}

impl RevealGate {
    /// Build the gate from the page's resource snapshot.
    ///
    /// Handles of untracked kinds are dropped here, so the tracker's total
    /// reflects only what this page actually waits on. Returns the gate plus
    /// its initial effects: the timeout arm (if planned) and, when the
    /// filtered set is empty or wholly pre-completed, the immediate reveal.
    pub fn new(
        plan: &RevealPlan,
        handles: impl IntoIterator<Item = ResourceHandle>,
    ) -> (Self, Vec<Effect>) {
        let tracked = handles.into_iter().filter(|h| match h.kind {
            ResourceKind::Image => plan.track_images,
            ResourceKind::Animation => plan.track_animations,
        });
        let mut gate = Self {
            tracker: ResourceTracker::new(tracked),
            controller: RevealController::new(plan.fade),
        };

        let mut effects = Vec::new();
        if let Some(timeout) = plan.fallback_timeout {
            effects.push(Effect::ScheduleTimeout(timeout));
        }
        if gate.tracker.take_signal() {
            effects.extend(gate.controller.trigger_reveal(RevealTrigger::AllSettled));
        }
        (gate, effects)
    }

    /// Feed one event through the gate.
    pub fn handle(&mut self, event: RevealEvent) -> Vec<Effect> {
        match event {
            RevealEvent::ResourceLoaded { index } => self.settle(index, Outcome::Loaded),
            RevealEvent::ResourceFailed { index } => self.settle(index, Outcome::Failed),
            RevealEvent::TimeoutFired => {
                self.controller.trigger_reveal(RevealTrigger::FallbackTimeout)
            }
            RevealEvent::FadeElapsed => self.controller.fade_elapsed(),
        }
    }

    fn settle(&mut self, index: usize, outcome: Outcome) -> Vec<Effect> {
        if self.tracker.settle(index, outcome) {
            self.controller.trigger_reveal(RevealTrigger::AllSettled)
        } else {
            Vec::new()
        }
    }

    pub fn phase(&self) -> RevealPhase {
        self.controller.phase()
    }

    pub fn trigger(&self) -> Option<RevealTrigger> {
        self.controller.trigger()
    }

    pub fn total(&self) -> usize {
        self.tracker.total()
    }

    pub fn settled(&self) -> usize {
        self.tracker.settled()
    }

    /// Resources that settled as failed, for diagnostics.
    pub fn failures(&self) -> impl Iterator<Item = &TrackedResource> {
        self.tracker.failures()
    }

    /// Resources still pending, for timeout diagnostics.
    pub fn pending(&self) -> impl Iterator<Item = &TrackedResource> {
        self.tracker.pending()
    }
}
