//! The resource-gated page reveal.
//!
//! Every generated page hides behind a loading overlay until the resources
//! it waits on have all reached a terminal state — loaded or failed, both
//! count — or a fallback timeout expires, whichever happens first. The
//! protocol lives here once, as an environment-free state machine, instead
//! of being copy-pasted into every page script.
//!
//! | Piece | Role |
//! |---|---|
//! | [`ResourceTracker`] | fixed-snapshot settlement counting, one-shot all-settled signal |
//! | [`RevealController`] | `Hidden → Revealing → Revealed`, latched against the tracker/timeout race |
//! | [`RevealGate`] | per-page composition: events in, [`Effect`]s out |
//! | [`RevealPlan`] | per-page configuration (tracked kinds, timeout, fade) |
//! | [`sim`] | virtual-clock driver for tests and the `check` command |
//!
//! The same protocol runs twice: here in Rust (simulated, to prove every
//! page terminates) and in the browser (`static/reveal.js`, configured from
//! the serialized [`RevealPlan`]). Guarantees, in both places:
//!
//! - the all-settled signal fires exactly once, only after every tracked
//!   resource is terminal; an empty set settles immediately
//! - a failed load is a normal terminal state — logged, counted, no retry
//! - the reveal transition happens exactly once, no matter how the tracker
//!   and the timeout race
//! - there is no error state: every path ends with the page visible

pub mod controller;
pub mod gate;
pub mod plan;
pub mod sim;
pub mod tracker;

pub use controller::{Effect, RevealController, RevealPhase, RevealTrigger};
pub use gate::{RevealEvent, RevealGate};
pub use plan::{RevealPlan, RuntimeRevealConfig};
pub use sim::{ResourceScript, RevealReport, simulate};
pub use tracker::{Outcome, ResourceHandle, ResourceKind, ResourceTracker};
