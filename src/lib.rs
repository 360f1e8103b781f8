//! Jurassic Life library.
//!
//! Runtime core of a touch-screen virtual pet: the creature's phase state
//! machine, life stages, care needs, melody cues and touch coordinate
//! mapping, built as ECS components, resources, systems and events. The
//! simulator binary and the integration tests both drive it through
//! [`game`].

pub mod components;
pub mod events;
pub mod game;
pub mod resources;
pub mod rtttl;
pub mod sequencer;
pub mod systems;
