//! World setup and the per-tick schedule.
//!
//! [`setup`] inserts every resource the systems need and spawns the
//! creature; [`build_schedule`] wires the systems in tick order; [`step`]
//! runs one tick. The simulator binary and the integration tests drive the
//! world the same way.
//!
//! # Tick order
//!
//! 1. touch polling and tap handling
//! 2. routine, vitals and aging (write [`PetRequest`]s)
//! 3. [`apply_pet_requests`] (the only phase writer, dispatches cues)
//! 4. alerts and animation
//! 5. message queue upkeep and audio forwarding

use bevy_ecs::prelude::*;

use crate::components::animation::Animation;
use crate::components::creature::Creature;
use crate::components::lifestage::Age;
use crate::components::phase::PetPhase;
use crate::components::vitals::Vitals;
use crate::events::alertmode::switch_alert_mode_observer;
use crate::events::audio::{MelodyCmd, MelodyMessage};
use crate::events::phase::PetRequest;
use crate::events::switchdebug::switch_debug_observer;
use crate::resources::animationstore::AnimationStore;
use crate::resources::cues::AudioCueDispatcher;
use crate::resources::drivers::{DisplayDevice, DisplayDriver, TouchDevice, TouchDriver};
use crate::resources::hitzones::HitZones;
use crate::resources::names::NameCorpus;
use crate::resources::petconfig::PetConfig;
use crate::resources::touch::TouchState;
use crate::resources::worldtime::WorldTime;
use crate::systems::alerts::alert_system;
use crate::systems::animation::{animation, render_creature};
use crate::systems::audio::{
    forward_melody_cmds, poll_melody_messages, update_melody_cmds, update_melody_messages,
};
use crate::systems::lifestage::aging_system;
use crate::systems::phase::{
    apply_pet_requests, restart_animation_on_phase_change, restart_animation_on_stage_change,
    update_pet_requests,
};
use crate::systems::routine::routine_system;
use crate::systems::time::update_world_time;
use crate::systems::touch::{poll_touch, touch_requests};
use crate::systems::vitals::vitals_system;

/// Insert resources, register observers and spawn the creature.
///
/// Message resources that already exist (e.g. inserted by
/// [`setup_audio`](crate::resources::audio::setup_audio)) are kept.
pub fn setup(
    world: &mut World,
    config: PetConfig,
    store: AnimationStore,
    mut names: NameCorpus,
) -> Entity {
    world.insert_resource(WorldTime::default());
    world.insert_resource(config.touch_mapper());
    world.insert_resource(TouchState::default());
    world.insert_resource(HitZones::default_layout(
        config.panel_width,
        config.panel_height,
    ));
    world.insert_resource(AudioCueDispatcher::new(config.cue_config()));
    world.insert_resource(store);
    world.init_resource::<Messages<PetRequest>>();
    world.init_resource::<Messages<MelodyCmd>>();
    world.init_resource::<Messages<MelodyMessage>>();

    world.add_observer(restart_animation_on_phase_change);
    world.add_observer(restart_animation_on_stage_change);
    world.add_observer(switch_debug_observer);
    world.add_observer(switch_alert_mode_observer);

    let name = names.pick();
    let boot_intro_ticks = config.boot_intro_ticks as u64;
    world.insert_resource(names);
    world.insert_resource(config);

    let creature = world
        .spawn((
            Creature::new(name),
            PetPhase::new(boot_intro_ticks),
            Vitals::default(),
            Age::default(),
            Animation::default(),
        ))
        .id();
    // Observers must be live before the first tick triggers anything.
    world.flush();
    log::info!("{:?}: a new egg named '{}'", creature, name);
    creature
}

/// Initialise the injected drivers and hand them to the world.
pub fn install_drivers(
    world: &mut World,
    mut display: Box<dyn DisplayDriver>,
    mut touch: Box<dyn TouchDriver>,
    config: &PetConfig,
) {
    display.init();
    display.set_rotation(config.rotation);
    display.set_brightness(config.brightness);
    touch.init();
    log::info!(
        "display {}x{} rotation {}",
        display.width(),
        display.height(),
        config.rotation
    );
    world.insert_non_send_resource(DisplayDevice(display));
    world.insert_non_send_resource(TouchDevice(touch));
}

pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            poll_touch,
            touch_requests,
            routine_system,
            vitals_system,
            aging_system,
            apply_pet_requests,
            alert_system,
            animation,
            render_creature,
            update_pet_requests,
            // audio systems must be together
            (
                forward_melody_cmds,
                update_melody_cmds,
                poll_melody_messages,
                update_melody_messages,
            )
                .chain(),
        )
            .chain(),
    );
    schedule
}

/// Run one tick.
pub fn step(world: &mut World, schedule: &mut Schedule) {
    let tick_ms = world.resource::<PetConfig>().tick_ms;
    update_world_time(world, tick_ms);
    schedule.run(world);
}
