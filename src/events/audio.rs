use bevy_ecs::message::Message;

use crate::resources::melodies::MelodyId;

/// Commands sent *to* the audio thread.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum MelodyCmd {
    /// Parse and store an RTTTL text under `id`.
    Load { id: MelodyId, text: String },
    /// Play `id` once the sounding one-shot ends, ahead of the queued ones
    /// but after earlier `Play`s. Nothing is cut; a full queue gives up its
    /// last entry.
    Play { id: MelodyId },
    /// Play `id` once after the queued one-shots.
    Enqueue { id: MelodyId },
    /// Replace the background loop.
    StartLoop { id: MelodyId },
    StopLoop,
    /// Silence everything: queue, one-shot and loop.
    StopAll,
    Shutdown,
}

/// Messages sent *back* from the audio thread.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum MelodyMessage {
    Loaded { id: MelodyId },
    LoadFailed { id: MelodyId, error: String },
    /// A melody began playing from its first note. A loop reports again when
    /// it resumes after a one-shot.
    Started { id: MelodyId, looped: bool },
    /// A one-shot reached its end.
    Finished { id: MelodyId },
    LoopStopped { id: MelodyId },
    /// A command referenced a melody that was never loaded.
    Unknown { id: MelodyId },
}
