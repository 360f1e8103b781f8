//! Phase requests and phase transition events.
//!
//! - [`PetRequest`] is the *input* side: touch zones, keyboard shortcuts and
//!   the routine/vitals/aging systems write these messages, and
//!   [`apply_pet_requests`](crate::systems::phase::apply_pet_requests) feeds
//!   them to the creature's [`PetPhase`](crate::components::phase::PetPhase).
//! - [`PhaseChangeEvent`] and [`StageChangeEvent`] are the *output* side,
//!   triggered after a transition has been applied and its cues dispatched.
//!
//! # Usage
//!
//! ```ignore
//! fn on_phase_change(trigger: On<PhaseChangeEvent>) {
//!     log::info!("now in {:?}", trigger.event().transition.to);
//! }
//!
//! world.add_observer(on_phase_change);
//! ```

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::phase::{StageChange, Task, Transition};
use crate::components::lifestage::LifeStage;

/// A request to move the creature's phase machine.
///
/// Requests that do not fit the current phase are ignored by the machine, so
/// writers never need to check the phase first.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PetRequest {
    /// The egg finished hatching (HATCHING -> IDLE).
    HatchComplete,
    /// Start a care action (IDLE -> TASK_APPROACH).
    Care(Task),
    /// The creature reached the action spot (TASK_APPROACH -> TASK_PERFORM).
    ArrivedAtTask,
    /// The care action is over (TASK_PERFORM -> TASK_RETURN).
    TaskDone,
    /// The creature is back home (TASK_RETURN -> IDLE).
    ArrivedHome,
    /// Fall asleep (IDLE or TASK_PERFORM -> SLEEPING).
    Sleep,
    /// Wake up (SLEEPING -> IDLE).
    Wake,
    /// Health reached zero (any live phase -> DEAD).
    Die,
    /// The life cycle completed (IDLE as senior -> RIP).
    NaturalEnd,
    /// A life-stage boundary was crossed; phase is unchanged.
    ReachStage(LifeStage),
}

/// Triggered after the creature's phase changed.
#[derive(Event, Debug, Clone, Copy)]
pub struct PhaseChangeEvent {
    /// The creature entity.
    pub entity: Entity,
    /// What changed.
    pub transition: Transition,
}

/// Triggered after the creature crossed a life-stage boundary.
#[derive(Event, Debug, Clone, Copy)]
pub struct StageChangeEvent {
    pub entity: Entity,
    pub change: StageChange,
}
