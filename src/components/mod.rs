//! ECS components for the creature entity.
//!
//! Submodules overview:
//! - [`animation`] – playhead into the current stage's walk cycle
//! - [`creature`] – marker and name
//! - [`lifestage`] – life stages and the lived-ticks counter
//! - [`phase`] – the phase/task state machine
//! - [`vitals`] – needs and health

pub mod animation;
pub mod creature;
pub mod lifestage;
pub mod phase;
pub mod vitals;
