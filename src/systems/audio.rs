//! Audio thread and the systems that bridge it with the ECS world.
//!
//! - [`audio_thread`] runs on its own OS thread, owns the [`ToneOutput`] and a
//!   [`Sequencer`], and processes [`MelodyCmd`] messages, emitting
//!   [`MelodyMessage`] responses.
//! - [`forward_melody_cmds`] sends this tick's commands to the thread.
//! - [`poll_melody_messages`] drains the thread's replies into the ECS.
//! - [`update_melody_cmds`] / [`update_melody_messages`] advance the message
//!   queues once per tick.
//!
//! Without a [`MelodyBridge`] (tests, headless runs) commands simply stay in
//! `Messages<MelodyCmd>` where readers can inspect them.

use std::time::{Duration, Instant};

use crate::events::audio::{MelodyCmd, MelodyMessage};
use crate::resources::audio::MelodyBridge;
use crate::resources::drivers::ToneOutput;
use crate::sequencer::Sequencer;
use bevy_ecs::prelude::{MessageReader, MessageWriter, Messages, Res, ResMut};
use crossbeam_channel::{Receiver, Sender, TryRecvError};

/// Drain pending replies from the audio thread into `Messages<MelodyMessage>`.
pub fn poll_melody_messages(bridge: Option<Res<MelodyBridge>>, mut writer: MessageWriter<MelodyMessage>) {
    if let Some(bridge) = bridge {
        writer.write_batch(bridge.rx_msg.try_iter());
    }
}

pub fn update_melody_messages(mut msgs: ResMut<Messages<MelodyMessage>>) {
    msgs.update();
}

/// Forward ECS `MelodyCmd` messages to the audio thread.
pub fn forward_melody_cmds(bridge: Option<Res<MelodyBridge>>, mut reader: MessageReader<MelodyCmd>) {
    let Some(bridge) = bridge else {
        return;
    };
    for cmd in reader.read() {
        // Send errors only happen during shutdown.
        let _ = bridge.tx_cmd.send(cmd.clone());
    }
}

pub fn update_melody_cmds(mut msgs: ResMut<Messages<MelodyCmd>>) {
    msgs.update();
}

/// Entry point of the dedicated audio thread.
///
/// Drains commands without blocking, advances the sequencer against a
/// monotonic millisecond clock, forwards its messages and sleeps briefly.
/// Returns on [`MelodyCmd::Shutdown`] or when the command channel closes,
/// leaving the output silent.
pub fn audio_thread(
    rx_cmd: Receiver<MelodyCmd>,
    tx_msg: Sender<MelodyMessage>,
    mut output: Box<dyn ToneOutput + Send>,
) {
    log::info!("[audio] thread starting (id={:?})", std::thread::current().id());

    let started = Instant::now();
    let mut seq = Sequencer::new();
    let mut out = Vec::new();

    'run: loop {
        let now_ms = started.elapsed().as_millis() as u64;

        loop {
            match rx_cmd.try_recv() {
                Ok(MelodyCmd::Shutdown) => {
                    log::info!("[audio] shutdown requested");
                    break 'run;
                }
                Ok(cmd) => {
                    log::debug!("[audio] {}", cmd_name(&cmd));
                    seq.handle(cmd, &mut out);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::info!("[audio] command channel closed");
                    break 'run;
                }
            }
        }

        seq.advance(now_ms, output.as_mut(), &mut out);
        for msg in out.drain(..) {
            let _ = tx_msg.send(msg);
        }

        std::thread::sleep(Duration::from_millis(5));
    }

    seq.silence(output.as_mut());
    log::info!("[audio] thread exiting");
}

// Load commands carry the whole melody text; keep the log line short.
fn cmd_name(cmd: &MelodyCmd) -> String {
    match cmd {
        MelodyCmd::Load { id, .. } => format!("Load {:?}", id),
        other => format!("{:?}", other),
    }
}
