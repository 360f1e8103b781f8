//! Pet configuration resource.
//!
//! Panel geometry, touch calibration, tick durations, life periods and
//! alert cadence, loaded from an INI file. Every value has a compiled-in
//! default so a missing file or key never prevents startup.
//!
//! # Configuration File Format
//!
//! ```ini
//! [display]
//! width = 320
//! height = 240
//! rotation = 1
//! brightness = 255
//!
//! [touch]
//! raw_width = 240
//! raw_height = 320
//! flip_x = true
//! flip_y = true
//!
//! [timing]
//! tick_ms = 50
//! boot_intro_ticks = 60
//! hatch_ticks = 100
//! approach_ticks = 20
//! perform_ticks = 60
//! return_ticks = 20
//! sleep_ticks = 600
//! frame_ticks = 4
//!
//! [life]
//! junior_ticks = 6000
//! adult_ticks = 12000
//! senior_ticks = 12000
//! decay_every_ticks = 100
//! critical_threshold = 20
//!
//! [audio]
//! mode = total
//! total_every_ticks = 200
//! limited_every_ticks = 400
//! hatch_loop = true
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::{Path, PathBuf};

use crate::resources::cues::{AlertMode, CueConfig};
use crate::resources::touch::{RAW_H, RAW_W, TouchMapper};

const DEFAULT_PANEL_WIDTH: u16 = 320;
const DEFAULT_PANEL_HEIGHT: u16 = 240;
const DEFAULT_ROTATION: u8 = 1;
const DEFAULT_BRIGHTNESS: u8 = 255;
const DEFAULT_TICK_MS: u32 = 50;
const DEFAULT_BOOT_INTRO_TICKS: u32 = 60;
const DEFAULT_HATCH_TICKS: u32 = 100;
const DEFAULT_APPROACH_TICKS: u32 = 20;
const DEFAULT_PERFORM_TICKS: u32 = 60;
const DEFAULT_RETURN_TICKS: u32 = 20;
const DEFAULT_SLEEP_TICKS: u32 = 600;
const DEFAULT_FRAME_TICKS: u32 = 4;
const DEFAULT_JUNIOR_TICKS: u64 = 6_000;
const DEFAULT_ADULT_TICKS: u64 = 12_000;
const DEFAULT_SENIOR_TICKS: u64 = 12_000;
const DEFAULT_DECAY_EVERY_TICKS: u32 = 100;
const DEFAULT_CRITICAL_THRESHOLD: u8 = 20;
const DEFAULT_TOTAL_EVERY_TICKS: u32 = 200;
const DEFAULT_LIMITED_EVERY_TICKS: u32 = 400;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PetConfig {
    /// Panel width in the rotated orientation.
    pub panel_width: u16,
    pub panel_height: u16,
    pub rotation: u8,
    pub brightness: u8,
    pub raw_width: u16,
    pub raw_height: u16,
    pub flip_x: bool,
    pub flip_y: bool,
    /// Milliseconds per simulation tick.
    pub tick_ms: u32,
    pub boot_intro_ticks: u32,
    pub hatch_ticks: u32,
    pub approach_ticks: u32,
    pub perform_ticks: u32,
    pub return_ticks: u32,
    pub sleep_ticks: u32,
    /// Ticks each animation frame stays on screen.
    pub frame_ticks: u32,
    pub junior_ticks: u64,
    pub adult_ticks: u64,
    pub senior_ticks: u64,
    pub decay_every_ticks: u32,
    /// A need at or below this value is critical.
    pub critical_threshold: u8,
    pub alert_mode: AlertMode,
    pub total_every_ticks: u32,
    pub limited_every_ticks: u32,
    pub hatch_loop: bool,
    pub config_path: PathBuf,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_mode(value: &str) -> Option<AlertMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "total" => Some(AlertMode::Total),
        "limited" => Some(AlertMode::Limited),
        _ => None,
    }
}

fn mode_name(mode: AlertMode) -> &'static str {
    match mode {
        AlertMode::Total => "total",
        AlertMode::Limited => "limited",
    }
}

impl PetConfig {
    pub fn new() -> Self {
        Self {
            panel_width: DEFAULT_PANEL_WIDTH,
            panel_height: DEFAULT_PANEL_HEIGHT,
            rotation: DEFAULT_ROTATION,
            brightness: DEFAULT_BRIGHTNESS,
            raw_width: RAW_W,
            raw_height: RAW_H,
            flip_x: true,
            flip_y: true,
            tick_ms: DEFAULT_TICK_MS,
            boot_intro_ticks: DEFAULT_BOOT_INTRO_TICKS,
            hatch_ticks: DEFAULT_HATCH_TICKS,
            approach_ticks: DEFAULT_APPROACH_TICKS,
            perform_ticks: DEFAULT_PERFORM_TICKS,
            return_ticks: DEFAULT_RETURN_TICKS,
            sleep_ticks: DEFAULT_SLEEP_TICKS,
            frame_ticks: DEFAULT_FRAME_TICKS,
            junior_ticks: DEFAULT_JUNIOR_TICKS,
            adult_ticks: DEFAULT_ADULT_TICKS,
            senior_ticks: DEFAULT_SENIOR_TICKS,
            decay_every_ticks: DEFAULT_DECAY_EVERY_TICKS,
            critical_threshold: DEFAULT_CRITICAL_THRESHOLD,
            alert_mode: AlertMode::Total,
            total_every_ticks: DEFAULT_TOTAL_EVERY_TICKS,
            limited_every_ticks: DEFAULT_LIMITED_EVERY_TICKS,
            hatch_loop: true,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load values from `config_path`. Missing keys keep their current values.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut ini = Ini::new();
        ini.load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        let uint = |section: &str, key: &str| ini.getuint(section, key).ok().flatten();
        let boolean = |section: &str, key: &str| ini.getbool(section, key).ok().flatten();

        // [display]
        if let Some(v) = uint("display", "width") {
            self.panel_width = v.min(u16::MAX as u64) as u16;
        }
        if let Some(v) = uint("display", "height") {
            self.panel_height = v.min(u16::MAX as u64) as u16;
        }
        if let Some(v) = uint("display", "rotation") {
            self.rotation = (v & 3) as u8;
        }
        if let Some(v) = uint("display", "brightness") {
            self.brightness = v.min(255) as u8;
        }

        // [touch]
        if let Some(v) = uint("touch", "raw_width") {
            self.raw_width = v.min(u16::MAX as u64) as u16;
        }
        if let Some(v) = uint("touch", "raw_height") {
            self.raw_height = v.min(u16::MAX as u64) as u16;
        }
        if let Some(v) = boolean("touch", "flip_x") {
            self.flip_x = v;
        }
        if let Some(v) = boolean("touch", "flip_y") {
            self.flip_y = v;
        }

        // [timing]
        let ticks = |key: &str| uint("timing", key).map(|v| v.min(u32::MAX as u64) as u32);
        if let Some(v) = ticks("tick_ms") {
            self.tick_ms = v.max(1);
        }
        if let Some(v) = ticks("boot_intro_ticks") {
            self.boot_intro_ticks = v;
        }
        if let Some(v) = ticks("hatch_ticks") {
            self.hatch_ticks = v;
        }
        if let Some(v) = ticks("approach_ticks") {
            self.approach_ticks = v;
        }
        if let Some(v) = ticks("perform_ticks") {
            self.perform_ticks = v;
        }
        if let Some(v) = ticks("return_ticks") {
            self.return_ticks = v;
        }
        if let Some(v) = ticks("sleep_ticks") {
            self.sleep_ticks = v;
        }
        if let Some(v) = ticks("frame_ticks") {
            self.frame_ticks = v.max(1);
        }

        // [life]
        if let Some(v) = uint("life", "junior_ticks") {
            self.junior_ticks = v;
        }
        if let Some(v) = uint("life", "adult_ticks") {
            self.adult_ticks = v;
        }
        if let Some(v) = uint("life", "senior_ticks") {
            self.senior_ticks = v;
        }
        if let Some(v) = uint("life", "decay_every_ticks") {
            self.decay_every_ticks = v.clamp(1, u32::MAX as u64) as u32;
        }
        if let Some(v) = uint("life", "critical_threshold") {
            self.critical_threshold = v.min(100) as u8;
        }

        // [audio]
        if let Some(raw) = ini.get("audio", "mode") {
            match parse_mode(&raw) {
                Some(mode) => self.alert_mode = mode,
                None => log::warn!("Unknown alert mode '{}', keeping {:?}", raw, self.alert_mode),
            }
        }
        if let Some(v) = uint("audio", "total_every_ticks") {
            self.total_every_ticks = v.min(u32::MAX as u64) as u32;
        }
        if let Some(v) = uint("audio", "limited_every_ticks") {
            self.limited_every_ticks = v.min(u32::MAX as u64) as u32;
        }
        if let Some(v) = boolean("audio", "hatch_loop") {
            self.hatch_loop = v;
        }

        info!(
            "Loaded config: {}x{} panel, rotation={}, tick={}ms, alerts={:?}",
            self.panel_width, self.panel_height, self.rotation, self.tick_ms, self.alert_mode
        );

        Ok(())
    }

    /// Save configuration to `config_path`.
    pub fn save_to_file(&self) -> Result<(), String> {
        self.save_to(&self.config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        let mut ini = Ini::new();
        let mut set = |section: &str, key: &str, value: String| {
            ini.set(section, key, Some(value));
        };

        set("display", "width", self.panel_width.to_string());
        set("display", "height", self.panel_height.to_string());
        set("display", "rotation", self.rotation.to_string());
        set("display", "brightness", self.brightness.to_string());

        set("touch", "raw_width", self.raw_width.to_string());
        set("touch", "raw_height", self.raw_height.to_string());
        set("touch", "flip_x", self.flip_x.to_string());
        set("touch", "flip_y", self.flip_y.to_string());

        set("timing", "tick_ms", self.tick_ms.to_string());
        set("timing", "boot_intro_ticks", self.boot_intro_ticks.to_string());
        set("timing", "hatch_ticks", self.hatch_ticks.to_string());
        set("timing", "approach_ticks", self.approach_ticks.to_string());
        set("timing", "perform_ticks", self.perform_ticks.to_string());
        set("timing", "return_ticks", self.return_ticks.to_string());
        set("timing", "sleep_ticks", self.sleep_ticks.to_string());
        set("timing", "frame_ticks", self.frame_ticks.to_string());

        set("life", "junior_ticks", self.junior_ticks.to_string());
        set("life", "adult_ticks", self.adult_ticks.to_string());
        set("life", "senior_ticks", self.senior_ticks.to_string());
        set("life", "decay_every_ticks", self.decay_every_ticks.to_string());
        set("life", "critical_threshold", self.critical_threshold.to_string());

        set("audio", "mode", mode_name(self.alert_mode).to_string());
        set("audio", "total_every_ticks", self.total_every_ticks.to_string());
        set("audio", "limited_every_ticks", self.limited_every_ticks.to_string());
        set("audio", "hatch_loop", self.hatch_loop.to_string());

        ini.write(path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", path);

        Ok(())
    }

    pub fn touch_mapper(&self) -> TouchMapper {
        TouchMapper {
            rotation: self.rotation,
            flip_x: self.flip_x,
            flip_y: self.flip_y,
            raw_w: self.raw_width,
            raw_h: self.raw_height,
        }
    }

    pub fn cue_config(&self) -> CueConfig {
        CueConfig {
            hatch_loop: self.hatch_loop,
            total_every_ticks: self.total_every_ticks,
            limited_every_ticks: self.limited_every_ticks,
        }
    }
}
