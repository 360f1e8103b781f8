//! ECS resources that bridge the main thread with the background audio thread.
//!
//! Use [`setup_audio`] once during initialization to spawn the audio thread
//! and insert the [`MelodyBridge`] and message resources. Call
//! [`shutdown_audio`] during teardown to stop the thread and join it.

use crate::events::audio::{MelodyCmd, MelodyMessage};
use crate::resources::drivers::ToneOutput;
use crate::resources::melodies::MelodyId;
use crate::systems::audio::audio_thread;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};

/// Shared bridge between the ECS world and the audio thread.
#[derive(Resource)]
pub struct MelodyBridge {
    /// Sender for [`MelodyCmd`] messages (ECS -> audio thread).
    pub tx_cmd: Sender<MelodyCmd>,
    /// Receiver for [`MelodyMessage`] messages (audio thread -> ECS).
    pub rx_msg: Receiver<MelodyMessage>,
    pub handle: std::thread::JoinHandle<()>,
}

/// Spawn the audio thread around `output` and register bridge resources.
pub fn setup_audio(world: &mut World, output: Box<dyn ToneOutput + Send>) {
    let (tx_cmd, rx_cmd) = unbounded::<MelodyCmd>();
    let (tx_msg, rx_msg) = unbounded::<MelodyMessage>();

    let handle = std::thread::spawn(move || audio_thread(rx_cmd, tx_msg, output));

    world.insert_resource(MelodyBridge {
        tx_cmd,
        rx_msg,
        handle,
    });
    world.insert_resource(Messages::<MelodyMessage>::default());
    world.insert_resource(Messages::<MelodyCmd>::default());
}

/// Queue a `Load` command for every built-in melody.
pub fn load_melodies(world: &mut World) {
    let mut cmds = world.get_resource_or_insert_with(Messages::<MelodyCmd>::default);
    for id in MelodyId::ALL {
        cmds.write(MelodyCmd::Load {
            id,
            text: id.rtttl().to_string(),
        });
    }
}

/// Request shutdown of the audio thread and join it.
pub fn shutdown_audio(world: &mut World) {
    if let Some(bridge) = world.remove_resource::<MelodyBridge>() {
        let _ = bridge.tx_cmd.send(MelodyCmd::Shutdown);
        if bridge.handle.join().is_err() {
            log::warn!("[audio] thread panicked");
        }
    }
}
