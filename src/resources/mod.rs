//! ECS resources made available to systems.
//!
//! Overview
//! - `animationstore` – per-stage sprite frames
//! - `audio` – bridge and channels for the background audio thread
//! - `cues` – phase-to-melody cue dispatch and alert cadence
//! - `debugmode` – presence toggles the debug overlay
//! - `drivers` – display, touch and tone driver interfaces
//! - `hitzones` – tap regions bound to phase requests
//! - `melodies` – built-in melody catalogue
//! - `names` – random creature names
//! - `petconfig` – INI-backed configuration
//! - `touch` – touch coordinate mapping and per-tick touch state
//! - `worldtime` – simulation clock and tick counter
pub mod animationstore;
pub mod audio;
pub mod cues;
pub mod debugmode;
pub mod drivers;
pub mod hitzones;
pub mod melodies;
pub mod names;
pub mod petconfig;
pub mod touch;
pub mod worldtime;
