//! Resource settlement tracking.
//!
//! A [`ResourceTracker`] observes a fixed set of loadable resources and
//! signals once — and only once — when every one of them has reached a
//! terminal state. Load failure is a terminal state like any other: a broken
//! asset is recorded for diagnostics and counted as settled, so a single
//! missing image can never hold the page hostage.
//!
//! The resource set is a snapshot taken when the page content has been fully
//! assembled and inserted. It never grows afterwards; querying live while
//! resources stream in would make the target count a moving goalpost.

use serde::Serialize;

/// Kind tag for a tracked loadable resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// An `<img>` element (`load`/`error` events, `complete` flag).
    Image,
    /// An animation-player custom element (`ready`/`error` events).
    Animation,
}

/// Terminal outcome of a single resource load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Loaded,
    Failed,
}

/// Completion state of a tracked resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    Pending,
    Loaded,
    Failed,
}

/// A resource handle as discovered by the page assembler.
///
/// `already_complete` mirrors the host's synchronous completeness query: an
/// image served from cache may be done before anyone can subscribe to its
/// completion events, and must count as settled at registration time.
#[derive(Debug, Clone)]
pub struct ResourceHandle {
    pub kind: ResourceKind,
    /// URL or element identity, carried for diagnostics only.
    pub reference: String,
    pub already_complete: bool,
}

impl ResourceHandle {
    pub fn image(reference: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::Image,
            reference: reference.into(),
            already_complete: false,
        }
    }

    pub fn animation(reference: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::Animation,
            reference: reference.into(),
            already_complete: false,
        }
    }

    pub fn complete(mut self) -> Self {
        self.already_complete = true;
        self
    }
}

/// One registered loadable item.
///
/// Created at registration, mutated exactly once (pending → loaded or
/// pending → failed), never revived.
#[derive(Debug)]
pub struct TrackedResource {
    kind: ResourceKind,
    state: ResourceState,
    reference: String,
}

impl TrackedResource {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn state(&self) -> ResourceState {
        self.state
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }
}

/// Counts outstanding resources and exposes a one-shot "all settled" signal.
///
/// Invariant: `settled() <= total()` at all times. The signal fires the
/// instant the last resource settles; an empty set is settled from the
/// start. [`ResourceTracker::take_signal`] is the single one-shot mechanism —
/// it returns `true` exactly once per tracker.
#[derive(Debug)]
pub struct ResourceTracker {
    resources: Vec<TrackedResource>,
    settled: usize,
    signaled: bool,
}

impl ResourceTracker {
    /// Snapshot a fixed resource set.
    ///
    /// Handles already complete at registration settle immediately as loaded;
    /// arrival order of the rest is unconstrained.
    pub fn new(handles: impl IntoIterator<Item = ResourceHandle>) -> Self {
        let mut settled = 0;
        let resources = handles
            .into_iter()
            .map(|h| {
                let state = if h.already_complete {
                    settled += 1;
                    ResourceState::Loaded
                } else {
                    ResourceState::Pending
                };
                TrackedResource {
                    kind: h.kind,
                    state,
                    reference: h.reference,
                }
            })
            .collect();
        Self {
            resources,
            settled,
            signaled: false,
        }
    }

    pub fn total(&self) -> usize {
        self.resources.len()
    }

    pub fn settled(&self) -> usize {
        self.settled
    }

    pub fn is_all_settled(&self) -> bool {
        self.settled == self.resources.len()
    }

    /// Record a terminal outcome for the resource at `index`.
    ///
    /// Exactly one of the success/failure notifications fires per resource;
    /// a repeated settlement of the same resource is ignored rather than
    /// counted twice. Returns `true` the one time this settlement completes
    /// the whole set.
    pub fn settle(&mut self, index: usize, outcome: Outcome) -> bool {
        let Some(resource) = self.resources.get_mut(index) else {
            return false;
        };
        if resource.state != ResourceState::Pending {
            return false;
        }
        resource.state = match outcome {
            Outcome::Loaded => ResourceState::Loaded,
            Outcome::Failed => ResourceState::Failed,
        };
        self.settled += 1;
        self.take_signal()
    }

    /// One-shot all-settled signal: `true` the first time the full set is
    /// settled, `false` forever after (and before).
    pub fn take_signal(&mut self) -> bool {
        if !self.signaled && self.is_all_settled() {
            self.signaled = true;
            true
        } else {
            false
        }
    }

    /// Resources that settled as failed, for diagnostics.
    pub fn failures(&self) -> impl Iterator<Item = &TrackedResource> {
        self.resources
            .iter()
            .filter(|r| r.state == ResourceState::Failed)
    }

    /// Resources still pending (useful when a timeout preempts settlement).
    pub fn pending(&self) -> impl Iterator<Item = &TrackedResource> {
        self.resources
            .iter()
            .filter(|r| r.state == ResourceState::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(n: usize) -> Vec<ResourceHandle> {
        (0..n)
            .map(|i| ResourceHandle::image(format!("assets/{i}.jpg")))
            .collect()
    }

    #[test]
    fn empty_set_is_settled_immediately() {
        let mut tracker = ResourceTracker::new([]);
        assert!(tracker.is_all_settled());
        assert!(tracker.take_signal());
        assert!(!tracker.take_signal());
    }

    #[test]
    fn signal_fires_only_after_last_settlement() {
        let mut tracker = ResourceTracker::new(images(3));
        assert!(!tracker.settle(1, Outcome::Loaded));
        assert!(!tracker.settle(0, Outcome::Loaded));
        assert!(!tracker.take_signal());
        assert!(tracker.settle(2, Outcome::Loaded));
        assert!(tracker.is_all_settled());
    }

    #[test]
    fn signal_fires_at_most_once() {
        let mut tracker = ResourceTracker::new(images(1));
        assert!(tracker.settle(0, Outcome::Loaded));
        assert!(!tracker.take_signal());
        assert!(!tracker.settle(0, Outcome::Loaded));
    }

    #[test]
    fn failure_counts_as_settled() {
        let mut tracker = ResourceTracker::new(images(3));
        tracker.settle(0, Outcome::Loaded);
        tracker.settle(1, Outcome::Failed);
        assert!(tracker.settle(2, Outcome::Loaded));
        assert_eq!(tracker.failures().count(), 1);
        assert_eq!(
            tracker.failures().next().unwrap().reference(),
            "assets/1.jpg"
        );
    }

    #[test]
    fn already_complete_handles_settle_at_registration() {
        let handles = vec![
            ResourceHandle::image("a.jpg").complete(),
            ResourceHandle::image("b.jpg"),
        ];
        let mut tracker = ResourceTracker::new(handles);
        assert_eq!(tracker.settled(), 1);
        assert!(!tracker.take_signal());
        assert!(tracker.settle(1, Outcome::Loaded));
    }

    #[test]
    fn all_handles_already_complete() {
        let handles = vec![
            ResourceHandle::image("a.jpg").complete(),
            ResourceHandle::image("b.jpg").complete(),
        ];
        let mut tracker = ResourceTracker::new(handles);
        assert!(tracker.take_signal());
    }

    #[test]
    fn repeated_settlement_is_not_double_counted() {
        let mut tracker = ResourceTracker::new(images(2));
        tracker.settle(0, Outcome::Loaded);
        tracker.settle(0, Outcome::Failed);
        assert_eq!(tracker.settled(), 1);
        // The first outcome sticks
        assert_eq!(tracker.failures().count(), 0);
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut tracker = ResourceTracker::new(images(1));
        assert!(!tracker.settle(7, Outcome::Loaded));
        assert_eq!(tracker.settled(), 0);
    }

    #[test]
    fn settlement_order_does_not_matter() {
        for order in [[0usize, 1, 2], [2, 1, 0], [1, 2, 0]] {
            let mut tracker = ResourceTracker::new(images(3));
            let mut fired = 0;
            for idx in order {
                if tracker.settle(idx, Outcome::Loaded) {
                    fired += 1;
                }
            }
            assert_eq!(fired, 1);
            assert!(tracker.is_all_settled());
        }
    }

    #[test]
    fn pending_lists_unsettled_references() {
        let handles = vec![
            ResourceHandle::image("a.jpg"),
            ResourceHandle::animation("player"),
        ];
        let mut tracker = ResourceTracker::new(handles);
        tracker.settle(0, Outcome::Loaded);
        let pending: Vec<&str> = tracker.pending().map(|r| r.reference()).collect();
        assert_eq!(pending, vec!["player"]);
    }
}
