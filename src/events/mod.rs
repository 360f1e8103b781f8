//! Messages and events exchanged across systems.
//!
//! Submodules:
//! - [`alertmode`] – switch the critical-need reminder cadence
//! - [`audio`] – commands and replies for the background audio thread
//! - [`phase`] – phase requests and phase/stage change events
//! - [`switchdebug`] – toggle the simulator's debug overlay
pub mod alertmode;
pub mod audio;
pub mod phase;
pub mod switchdebug;
