//! Deterministic reveal simulation.
//!
//! Drives a [`RevealGate`](super::RevealGate) on a virtual clock with
//! scripted resource outcomes, with no host environment anywhere in sight.
//! Two callers: the unit tests in this module (every load/error/timeout
//! ordering, reproducibly) and the `check` command, which simulates each
//! generated page's reveal plan to prove the page cannot hang.

use super::controller::{Effect, RevealPhase, RevealTrigger};
use super::gate::{RevealEvent, RevealGate};
use super::plan::RevealPlan;
use super::tracker::{Outcome, ResourceHandle};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

/// Scripted behavior for one tracked resource.
#[derive(Debug, Clone)]
pub struct ResourceScript {
    pub index: usize,
    /// When the completion notification fires; `None` = never (a silently
    /// failing custom element).
    pub at: Option<Duration>,
    pub outcome: Outcome,
}

impl ResourceScript {
    /// Resource `index` loads successfully after `ms` milliseconds.
    pub fn loads(index: usize, ms: u64) -> Self {
        Self {
            index,
            at: Some(Duration::from_millis(ms)),
            outcome: Outcome::Loaded,
        }
    }

    /// Resource `index` fires its failure notification after `ms` milliseconds.
    pub fn fails(index: usize, ms: u64) -> Self {
        Self {
            index,
            at: Some(Duration::from_millis(ms)),
            outcome: Outcome::Failed,
        }
    }

    /// Resource `index` never fires any notification.
    pub fn silent(index: usize) -> Self {
        Self {
            index,
            at: None,
            outcome: Outcome::Failed,
        }
    }
}

/// Outcome of driving a reveal to quiescence.
#[derive(Debug, Clone)]
pub struct RevealReport {
    /// The page reached `Revealed`. `false` means the page would hang — the
    /// one verdict `check` refuses to accept.
    pub revealed: bool,
    pub trigger: Option<RevealTrigger>,
    /// Virtual time at which the content became visible.
    pub revealed_at: Option<Duration>,
    /// Virtual time at which the overlay node was detached.
    pub overlay_removed_at: Option<Duration>,
    /// Tracked resource count (after plan filtering).
    pub total: usize,
    pub settled: usize,
    /// References of resources that settled as failed.
    pub failed: Vec<String>,
    /// References still pending when the simulation drained.
    pub stragglers: Vec<String>,
}

/// Timer-queue entry. `seq` breaks ties so same-instant events run in
/// scheduling order, mirroring a single-threaded event loop.
#[derive(Debug)]
struct QueueEntry {
    at: Duration,
    seq: u64,
    event: RevealEvent,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.at, self.seq).cmp(&(other.at, other.seq))
    }
}

/// Run `plan` against `handles` with the given scripted outcomes.
///
/// Script entries for indices the plan filtered out are simply ignored by
/// the gate, like events for elements nobody subscribed to.
pub fn simulate(
    plan: &RevealPlan,
    handles: Vec<ResourceHandle>,
    script: &[ResourceScript],
) -> RevealReport {
    let (mut gate, initial_effects) = RevealGate::new(plan, handles);

    let mut queue: BinaryHeap<Reverse<QueueEntry>> = BinaryHeap::new();
    let mut seq = 0u64;
    let push = |queue: &mut BinaryHeap<Reverse<QueueEntry>>, at, event, seq: &mut u64| {
        queue.push(Reverse(QueueEntry {
            at,
            seq: *seq,
            event,
        }));
        *seq += 1;
    };

    for entry in script {
        if let Some(at) = entry.at {
            let event = match entry.outcome {
                Outcome::Loaded => RevealEvent::ResourceLoaded { index: entry.index },
                Outcome::Failed => RevealEvent::ResourceFailed { index: entry.index },
            };
            push(&mut queue, at, event, &mut seq);
        }
    }

    let mut revealed_at = None;
    let mut overlay_removed_at = None;

    let mut apply = |effects: Vec<Effect>,
                     now: Duration,
                     queue: &mut BinaryHeap<Reverse<QueueEntry>>,
                     seq: &mut u64| {
        for effect in effects {
            match effect {
                Effect::ShowContent => revealed_at = Some(now),
                Effect::BeginOverlayFade => {}
                Effect::RemoveOverlay => overlay_removed_at = Some(now),
                Effect::ScheduleFade(delay) => {
                    push(queue, now + delay, RevealEvent::FadeElapsed, seq)
                }
                Effect::ScheduleTimeout(delay) => {
                    push(queue, now + delay, RevealEvent::TimeoutFired, seq)
                }
            }
        }
    };

    apply(initial_effects, Duration::ZERO, &mut queue, &mut seq);

    while let Some(Reverse(entry)) = queue.pop() {
        let effects = gate.handle(entry.event);
        apply(effects, entry.at, &mut queue, &mut seq);
    }

    RevealReport {
        revealed: gate.phase() == RevealPhase::Revealed,
        trigger: gate.trigger(),
        revealed_at,
        overlay_removed_at,
        total: gate.total(),
        settled: gate.settled(),
        failed: gate.failures().map(|r| r.reference().to_string()).collect(),
        stragglers: gate.pending().map(|r| r.reference().to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RevealConfig;

    fn plain_plan() -> RevealPlan {
        RevealPlan::for_page(&RevealConfig::default(), false)
    }

    fn player_plan() -> RevealPlan {
        RevealPlan::for_page(&RevealConfig::default(), true)
    }

    fn images(n: usize) -> Vec<ResourceHandle> {
        (0..n)
            .map(|i| ResourceHandle::image(format!("assets/{i}.jpg")))
            .collect()
    }

    const MS: fn(u64) -> Duration = Duration::from_millis;

    // Scenario A: zero resources reveal on the next turn; the overlay never
    // lingers beyond the cosmetic fade.
    #[test]
    fn empty_page_reveals_at_once() {
        let report = simulate(&plain_plan(), vec![], &[]);
        assert!(report.revealed);
        assert_eq!(report.trigger, Some(RevealTrigger::AllSettled));
        assert_eq!(report.revealed_at, Some(Duration::ZERO));
        assert_eq!(report.overlay_removed_at, Some(MS(500)));
    }

    // Scenario B: three resources settling out of order; the signal waits
    // for the last one.
    #[test]
    fn reveal_waits_for_the_slowest_resource() {
        let script = [
            ResourceScript::loads(1, 10),
            ResourceScript::loads(0, 30),
            ResourceScript::loads(2, 50),
        ];
        let report = simulate(&plain_plan(), images(3), &script);
        assert!(report.revealed);
        assert_eq!(report.revealed_at, Some(MS(50)));
        assert_eq!(report.settled, 3);
    }

    // Scenario C: a failing resource counts as settled and cannot block the
    // page.
    #[test]
    fn failed_resource_counts_as_settled() {
        let script = [
            ResourceScript::loads(0, 10),
            ResourceScript::fails(1, 20),
            ResourceScript::loads(2, 40),
        ];
        let report = simulate(&plain_plan(), images(3), &script);
        assert!(report.revealed);
        assert_eq!(report.trigger, Some(RevealTrigger::AllSettled));
        assert_eq!(report.revealed_at, Some(MS(40)));
        assert_eq!(report.failed, vec!["assets/1.jpg"]);
    }

    // Scenario D: a silent resource with the 10s fallback armed reveals via
    // the timeout path.
    #[test]
    fn silent_resource_falls_back_to_timeout() {
        let handles = vec![
            ResourceHandle::image("assets/0.jpg"),
            ResourceHandle::animation("error-player"),
        ];
        let script = [ResourceScript::loads(0, 100), ResourceScript::silent(1)];
        let report = simulate(&player_plan(), handles, &script);
        assert!(report.revealed);
        assert_eq!(report.trigger, Some(RevealTrigger::FallbackTimeout));
        assert_eq!(report.revealed_at, Some(MS(10_000)));
        assert_eq!(report.stragglers, vec!["error-player"]);
    }

    // Scenario E: settle at 1s with no timeout configured; overlay detaches
    // at settle time plus the fade.
    #[test]
    fn overlay_detaches_one_fade_after_settlement() {
        let script = [ResourceScript::loads(0, 1_000)];
        let report = simulate(&plain_plan(), images(1), &script);
        assert_eq!(report.revealed_at, Some(MS(1_000)));
        assert_eq!(report.overlay_removed_at, Some(MS(1_500)));
    }

    // Idempotence: the tracker settling just before the timeout fires must
    // not re-run the reveal.
    #[test]
    fn tracker_and_timeout_near_miss_single_fire() {
        let script = [ResourceScript::loads(0, 9_900)];
        let report = simulate(&player_plan(), images(1), &script);
        assert!(report.revealed);
        assert_eq!(report.trigger, Some(RevealTrigger::AllSettled));
        assert_eq!(report.revealed_at, Some(MS(9_900)));
        // Overlay removed exactly once, by the fade scheduled at settle time
        assert_eq!(report.overlay_removed_at, Some(MS(10_400)));
    }

    // Order independence: every permutation of completion order yields the
    // same final state.
    #[test]
    fn settlement_order_permutations_converge() {
        let orders: &[[usize; 3]] = &[
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];
        for order in orders {
            let script: Vec<ResourceScript> = order
                .iter()
                .enumerate()
                .map(|(slot, &idx)| ResourceScript::loads(idx, 10 * (slot as u64 + 1)))
                .collect();
            let report = simulate(&plain_plan(), images(3), &script);
            assert!(report.revealed, "order {order:?} failed to reveal");
            assert_eq!(report.revealed_at, Some(MS(30)));
            assert_eq!(report.settled, 3);
        }
    }

    // All resources already cached: everything settles at registration and
    // the reveal happens in the same turn.
    #[test]
    fn fully_cached_page_reveals_immediately() {
        let handles: Vec<ResourceHandle> = (0..4)
            .map(|i| ResourceHandle::image(format!("assets/{i}.jpg")).complete())
            .collect();
        let report = simulate(&plain_plan(), handles, &[]);
        assert!(report.revealed);
        assert_eq!(report.revealed_at, Some(Duration::ZERO));
        assert_eq!(report.settled, 4);
    }

    // The hang `check` exists to catch: a silent resource and no timeout.
    #[test]
    fn silent_resource_without_timeout_never_reveals() {
        let mut cfg = RevealConfig::default();
        cfg.all_pages_timeout = false;
        let mut plan = RevealPlan::for_page(&cfg, false);
        plan.track_animations = true; // tracked, but no timeout armed
        let handles = vec![ResourceHandle::animation("player")];
        let report = simulate(&plan, handles, &[ResourceScript::silent(0)]);
        assert!(!report.revealed);
        assert_eq!(report.stragglers, vec!["player"]);
    }

    // All resources failing still ends in Revealed (worst case bounded).
    #[test]
    fn every_resource_failing_still_reveals() {
        let script = [ResourceScript::fails(0, 10), ResourceScript::fails(1, 20)];
        let report = simulate(&plain_plan(), images(2), &script);
        assert!(report.revealed);
        assert_eq!(report.failed.len(), 2);
    }

    // Same-instant settlements drain in scheduling order without losing any.
    #[test]
    fn simultaneous_settlements_all_count() {
        let script = [
            ResourceScript::loads(0, 25),
            ResourceScript::loads(1, 25),
            ResourceScript::loads(2, 25),
        ];
        let report = simulate(&plain_plan(), images(3), &script);
        assert!(report.revealed);
        assert_eq!(report.revealed_at, Some(MS(25)));
    }
}
