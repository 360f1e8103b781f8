//! Jurassic Life desktop simulator.
//!
//! Runs the pet core in a raylib window:
//! - the panel is a scaled framebuffer the creature is blitted into
//! - the mouse plays the touch sensor (positions are turned back into raw
//!   sensor samples, so the real coordinate mapping is exercised)
//! - melodies go through the audio thread to a logging tone sink
//!
//! # Keys
//!
//! | key | action |
//! |-----|--------|
//! | E / D / C / H / S | eat / drink / clean / hug / sleep |
//! | W | wake up |
//! | K | kill (debug) |
//! | M | switch alert mode (total / limited) |
//! | P | audition the next catalogue melody (debug overlay only) |
//! | F1 | toggle debug overlay |
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --seed 7
//! RUST_LOG=debug cargo run -- --config pet.ini
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

mod simulator;

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemState;
use clap::Parser;
use raylib::prelude::*;

use jurassiclife::components::creature::Creature;
use jurassiclife::components::phase::{PetPhase, Task};
use jurassiclife::components::vitals::Vitals;
use jurassiclife::events::alertmode::SwitchAlertModeEvent;
use jurassiclife::events::audio::{MelodyCmd, MelodyMessage};
use jurassiclife::events::phase::PetRequest;
use jurassiclife::events::switchdebug::SwitchDebugEvent;
use jurassiclife::game;
use jurassiclife::resources::animationstore::AnimationStore;
use jurassiclife::resources::audio::{load_melodies, setup_audio, shutdown_audio};
use jurassiclife::resources::debugmode::DebugMode;
use jurassiclife::resources::drivers::LogTone;
use jurassiclife::resources::hitzones::HitZones;
use jurassiclife::resources::melodies::{MelodyId, catalogue};
use jurassiclife::resources::names::NameCorpus;
use jurassiclife::resources::petconfig::PetConfig;
use jurassiclife::resources::touch::{ScreenPoint, TouchMapper};
use jurassiclife::resources::worldtime::WorldTime;

use crate::simulator::{Framebuffer, MouseTouch, PanelDisplay, rgb565_to_color};

const SCALE: i32 = 3;
const PLACEHOLDER_FRAMES: usize = 4;

/// Jurassic Life desktop simulator
#[derive(Parser)]
#[command(version, about = "Raise a digital dinosaur on your desktop.")]
struct Cli {
    /// Configuration file (default: ./config.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory with `<stage>_walk_<nn>.rgb565` sprite frames.
    /// Placeholder sprites are generated when omitted.
    #[arg(long, value_name = "DIR")]
    sprites: Option<PathBuf>,

    /// Seed for the name generator.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the melody library as JSON and exit. Which melodies repeat as
    /// phase loops follows the loaded configuration.
    #[arg(long)]
    list_melodies: bool,

    /// Write a configuration file with default values and exit.
    /// Optionally provide a path (default: the --config path or ./config.ini).
    #[arg(long, value_name = "PATH")]
    write_config: Option<Option<PathBuf>>,
}

fn key_request(rl: &RaylibHandle) -> Option<PetRequest> {
    let bindings = [
        (KeyboardKey::KEY_E, PetRequest::Care(Task::Eat)),
        (KeyboardKey::KEY_D, PetRequest::Care(Task::Drink)),
        (KeyboardKey::KEY_C, PetRequest::Care(Task::Clean)),
        (KeyboardKey::KEY_H, PetRequest::Care(Task::Hug)),
        (KeyboardKey::KEY_S, PetRequest::Care(Task::Sleep)),
        (KeyboardKey::KEY_W, PetRequest::Wake),
        (KeyboardKey::KEY_K, PetRequest::Die),
    ];
    bindings
        .into_iter()
        .find(|(key, _)| rl.is_key_pressed(*key))
        .map(|(_, request)| request)
}

/// Mouse position as the raw sample a real sensor would report, if the left
/// button is held over the panel.
fn mouse_sample(
    rl: &RaylibHandle,
    mapper: &TouchMapper,
    panel_w: u16,
    panel_h: u16,
) -> Option<jurassiclife::resources::touch::RawTouch> {
    if !rl.is_mouse_button_down(MouseButton::MOUSE_BUTTON_LEFT) {
        return None;
    }
    let pos = rl.get_mouse_position();
    let (x, y) = (pos.x as i32 / SCALE, pos.y as i32 / SCALE);
    if x < 0 || y < 0 || x >= panel_w as i32 || y >= panel_h as i32 {
        return None;
    }
    let point = ScreenPoint {
        x: x as u16,
        y: y as u16,
    };
    Some(mapper.unmap(point, panel_w, panel_h))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Early-exit: write a default config file
    if let Some(maybe_path) = cli.write_config {
        let path = maybe_path
            .or_else(|| cli.config.clone())
            .unwrap_or_else(|| PathBuf::from("./config.ini"));
        if let Err(e) = PetConfig::with_path(&path).save_to_file() {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        println!("Config written to {}", path.display());
        return;
    }

    let mut config = match &cli.config {
        Some(path) => PetConfig::with_path(path),
        None => PetConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        log::info!("{e}; using defaults");
    }

    // Early-exit: dump the melody library (no window/audio needed)
    if cli.list_melodies {
        match serde_json::to_string_pretty(&catalogue(&config.cue_config())) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let store = match &cli.sprites {
        Some(dir) => AnimationStore::load_dir(dir).unwrap_or_else(|e| {
            log::error!("{e}; using placeholder sprites");
            AnimationStore::placeholder(PLACEHOLDER_FRAMES)
        }),
        None => AnimationStore::placeholder(PLACEHOLDER_FRAMES),
    };
    let names = match cli.seed {
        Some(seed) => NameCorpus::default().with_seed(seed),
        None => NameCorpus::default(),
    };

    let (panel_w, panel_h) = (config.panel_width, config.panel_height);
    let tick_s = config.tick_ms as f32 / 1000.0;

    // --------------- Raylib window ---------------
    let (mut rl, thread) = raylib::init()
        .size(panel_w as i32 * SCALE, panel_h as i32 * SCALE)
        .title("Jurassic Life")
        .build();
    rl.set_target_fps(60);
    rl.set_exit_key(None);

    // --------------- ECS world + resources ---------------
    let mut world = World::new();

    // Audio first: setup keeps its message resources.
    setup_audio(&mut world, Box::new(LogTone::default()));
    load_melodies(&mut world);

    let framebuffer = Rc::new(RefCell::new(Framebuffer::new(panel_w, panel_h)));
    let touch_sample = Rc::new(Cell::new(None));
    game::install_drivers(
        &mut world,
        Box::new(PanelDisplay::new(framebuffer.clone())),
        Box::new(MouseTouch {
            sample: touch_sample.clone(),
        }),
        &config,
    );
    let creature = game::setup(&mut world, config.clone(), store, names);
    let mapper = config.touch_mapper();

    let mut schedule = game::build_schedule();
    schedule
        .initialize(&mut world)
        .expect("Failed to initialize schedule");

    let mut melody_reader = SystemState::<MessageReader<MelodyMessage>>::new(&mut world);
    let mut now_playing: Option<MelodyId> = None;
    let mut background: Option<MelodyId> = None;
    let mut audition: Option<MelodyId> = None;
    let mut accumulator = 0.0_f32;

    // --------------- Main loop ---------------
    while !rl.window_should_close() {
        if rl.is_key_pressed(KeyboardKey::KEY_F1) {
            world.trigger(SwitchDebugEvent {});
            world.flush();
        }
        if rl.is_key_pressed(KeyboardKey::KEY_M) {
            world.trigger(SwitchAlertModeEvent {});
            world.flush();
        }
        if rl.is_key_pressed(KeyboardKey::KEY_P) && world.contains_resource::<DebugMode>() {
            let id = audition.map_or(MelodyId::ALL[0], MelodyId::next);
            audition = Some(id);
            log::info!("auditioning {:?}", id);
            world
                .resource_mut::<Messages<MelodyCmd>>()
                .write(MelodyCmd::Enqueue { id });
        }
        if let Some(request) = key_request(&rl) {
            world.resource_mut::<Messages<PetRequest>>().write(request);
        }
        touch_sample.set(mouse_sample(&rl, &mapper, panel_w, panel_h));

        accumulator += rl.get_frame_time();
        while accumulator >= tick_s {
            accumulator -= tick_s;
            framebuffer.borrow_mut().clear();
            game::step(&mut world, &mut schedule);

            for msg in melody_reader.get(&world).read() {
                match msg {
                    MelodyMessage::Started { id, looped: false } => now_playing = Some(*id),
                    MelodyMessage::Started { id, looped: true } => background = Some(*id),
                    MelodyMessage::Finished { .. } => now_playing = None,
                    MelodyMessage::LoopStopped { .. } => background = None,
                    _ => {}
                }
            }
        }

        let (name, phase, task, stage, vitals) = {
            let creature_ref = world.entity(creature);
            let name = creature_ref
                .get::<Creature>()
                .map(|c| c.name.to_string())
                .unwrap_or_default();
            let phase = creature_ref.get::<PetPhase>();
            (
                name,
                phase.map(|p| p.current()),
                phase.and_then(|p| p.task()),
                phase.map(|p| p.stage()),
                creature_ref.get::<Vitals>().copied().unwrap_or_default(),
            )
        };
        let debug = world.contains_resource::<DebugMode>();
        let time = *world.resource::<WorldTime>();
        let alert_mode = world.resource::<PetConfig>().alert_mode;
        let zones = world.resource::<HitZones>().clone();

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);

        for (x, y, len, c) in framebuffer.borrow().runs() {
            d.draw_rectangle(
                x as i32 * SCALE,
                y as i32 * SCALE,
                len as i32 * SCALE,
                SCALE,
                rgb565_to_color(c),
            );
        }

        for zone in zones.zones() {
            let r = zone.rect;
            let (x, y, w, h) = (
                r.x as i32 * SCALE,
                r.y as i32 * SCALE,
                r.w as i32 * SCALE,
                r.h as i32 * SCALE,
            );
            if zone.request == PetRequest::Wake {
                if debug {
                    d.draw_rectangle_lines(x, y, w, h, Color::DARKGRAY);
                }
                continue;
            }
            d.draw_rectangle_lines(x, y, w, h, Color::GRAY);
            d.draw_text(zone.label, x + 8, y + h / 2 - 10, 20, Color::LIGHTGRAY);
        }

        let header = format!(
            "{}  {}  {:?}{}",
            name,
            stage.map(|s| s.to_string()).unwrap_or_default(),
            phase,
            task.map(|t| format!(" ({t:?})")).unwrap_or_default()
        );
        d.draw_text(&header, 10, 10, 20, Color::RAYWHITE);

        for (i, (label, value)) in vitals
            .needs()
            .into_iter()
            .chain(std::iter::once(("health", vitals.health)))
            .enumerate()
        {
            let y = 40 + i as i32 * 18;
            d.draw_text(label, 10, y, 16, Color::LIGHTGRAY);
            d.draw_rectangle(110, y + 2, value as i32, 12, Color::DARKGREEN);
            d.draw_rectangle_lines(110, y + 2, 100, 12, Color::GRAY);
        }

        if debug {
            let info = format!(
                "tick {} ({}s)  alerts {:?}  one-shot {:?}  loop {:?}",
                time.tick,
                time.elapsed_secs(),
                alert_mode,
                now_playing,
                background
            );
            d.draw_text(&info, 10, panel_h as i32 * SCALE - 24, 16, Color::YELLOW);
            d.draw_fps(panel_w as i32 * SCALE - 100, 10);
        }
    }

    shutdown_audio(&mut world);
}
