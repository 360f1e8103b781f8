//! Per-tick systems.
//!
//! Submodules overview
//! - [`alerts`] – alert beeps for critical needs
//! - [`animation`] – advance the playhead and blit the current frame
//! - [`audio`] – the audio thread and its bridge systems
//! - [`lifestage`] – aging and stage/natural-end requests
//! - [`phase`] – apply requests to the phase machine, dispatch cues
//! - [`routine`] – timed ends of hatching and care actions
//! - [`time`] – advance the simulation clock
//! - [`touch`] – poll the touch sensor, turn taps into requests
//! - [`vitals`] – needs decay, care effects, death by neglect

pub mod alerts;
pub mod animation;
pub mod audio;
pub mod lifestage;
pub mod phase;
pub mod routine;
pub mod time;
pub mod touch;
pub mod vitals;
