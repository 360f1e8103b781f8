//! Single-voice melody sequencer.
//!
//! The sequencer owns the parsed melodies and decides, for any millisecond
//! timestamp, which note should be sounding. Queued one-shots always win over
//! the background loop; the loop restarts from its first note whenever
//! nothing else is pending. A one-shot that has started is only cut short by
//! `StopAll`; `Play` just jumps the queue.
//!
//! It has no clock of its own: the audio thread feeds it the elapsed time,
//! and tests feed it whatever they like.

use std::collections::VecDeque;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::events::audio::{MelodyCmd, MelodyMessage};
use crate::resources::drivers::ToneOutput;
use crate::resources::melodies::MelodyId;
use crate::rtttl::{self, Note};

/// Maximum number of queued one-shots. Further `Enqueue`s are dropped.
pub const QUEUE_CAP: usize = 16;

// Bounds the work done in one `advance` when notes have zero length.
const MAX_STEPS: usize = 256;

#[derive(Debug, Clone)]
struct Voice {
    id: MelodyId,
    notes: Arc<[Note]>,
    index: usize,
    note_started_ms: u64,
}

impl Voice {
    fn new(id: MelodyId, notes: Arc<[Note]>, now_ms: u64) -> Self {
        Self {
            id,
            notes,
            index: 0,
            note_started_ms: now_ms,
        }
    }
}

#[derive(Debug, Default)]
pub struct Sequencer {
    melodies: FxHashMap<MelodyId, Arc<[Note]>>,
    queue: VecDeque<MelodyId>,
    // Leading queue entries that came from `Play`.
    urgent: usize,
    one_shot: Option<Voice>,
    background: Option<MelodyId>,
    loop_voice: Option<Voice>,
    sounding: Option<u32>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self, id: MelodyId) -> bool {
        self.melodies.contains_key(&id)
    }

    /// The loop selected with `StartLoop`, whether or not it is sounding.
    pub fn background(&self) -> Option<MelodyId> {
        self.background
    }

    /// The one-shot currently sounding.
    pub fn playing(&self) -> Option<MelodyId> {
        self.one_shot.as_ref().map(|v| v.id)
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Frequency currently sent to the output.
    pub fn sounding(&self) -> Option<u32> {
        self.sounding
    }

    pub fn is_idle(&self) -> bool {
        self.one_shot.is_none() && self.queue.is_empty() && self.background.is_none()
    }

    /// Apply one command. Timing starts when [`advance`](Self::advance)
    /// picks the melody up. `Shutdown` is handled by the caller.
    pub fn handle(&mut self, cmd: MelodyCmd, out: &mut Vec<MelodyMessage>) {
        match cmd {
            MelodyCmd::Load { id, text } => match rtttl::parse(&text) {
                Ok(melody) => {
                    log::debug!("[audio] loaded {:?} ({} notes)", id, melody.notes.len());
                    self.melodies.insert(id, melody.notes.into());
                    out.push(MelodyMessage::Loaded { id });
                }
                Err(e) => {
                    log::warn!("[audio] load failed {:?}: {}", id, e);
                    out.push(MelodyMessage::LoadFailed {
                        id,
                        error: e.to_string(),
                    });
                }
            },
            MelodyCmd::Play { id } => {
                if self.notes(id, out).is_none() {
                    return;
                }
                if self.queue.len() >= QUEUE_CAP {
                    if let Some(dropped) = self.queue.pop_back() {
                        log::debug!("[audio] queue full, dropping {:?} for {:?}", dropped, id);
                    }
                    self.urgent = self.urgent.min(self.queue.len());
                }
                self.queue.insert(self.urgent, id);
                self.urgent += 1;
            }
            MelodyCmd::Enqueue { id } => {
                if self.notes(id, out).is_none() {
                    return;
                }
                if self.queue.len() >= QUEUE_CAP {
                    log::debug!("[audio] queue full, dropping {:?}", id);
                    return;
                }
                self.queue.push_back(id);
            }
            MelodyCmd::StartLoop { id } => {
                if self.notes(id, out).is_none() {
                    return;
                }
                if let Some(old) = self.background.replace(id) {
                    out.push(MelodyMessage::LoopStopped { id: old });
                }
                self.loop_voice = None;
            }
            MelodyCmd::StopLoop => self.stop_loop(out),
            MelodyCmd::StopAll => {
                self.queue.clear();
                self.urgent = 0;
                self.one_shot = None;
                self.stop_loop(out);
            }
            MelodyCmd::Shutdown => {}
        }
    }

    fn notes(&self, id: MelodyId, out: &mut Vec<MelodyMessage>) -> Option<Arc<[Note]>> {
        let notes = self.melodies.get(&id).cloned();
        if notes.is_none() {
            log::warn!("[audio] {:?} is not loaded", id);
            out.push(MelodyMessage::Unknown { id });
        }
        notes
    }

    fn stop_loop(&mut self, out: &mut Vec<MelodyMessage>) {
        self.loop_voice = None;
        if let Some(id) = self.background.take() {
            out.push(MelodyMessage::LoopStopped { id });
        }
    }

    /// Move playback forward to `now_ms` and drive `output` accordingly.
    pub fn advance(&mut self, now_ms: u64, output: &mut dyn ToneOutput, out: &mut Vec<MelodyMessage>) {
        let mut freq = None;
        for _ in 0..MAX_STEPS {
            if self.one_shot.is_none() {
                if let Some(id) = self.queue.pop_front() {
                    self.urgent = self.urgent.saturating_sub(1);
                    if let Some(notes) = self.melodies.get(&id).cloned() {
                        self.loop_voice = None;
                        self.one_shot = Some(Voice::new(id, notes, now_ms));
                        out.push(MelodyMessage::Started { id, looped: false });
                    }
                    continue;
                }
            }
            if self.one_shot.is_none() && self.loop_voice.is_none() {
                if let Some(id) = self.background {
                    if let Some(notes) = self.melodies.get(&id).cloned() {
                        self.loop_voice = Some(Voice::new(id, notes, now_ms));
                        out.push(MelodyMessage::Started { id, looped: true });
                    }
                }
            }

            let is_one_shot = self.one_shot.is_some();
            let Some(voice) = self.one_shot.as_mut().or(self.loop_voice.as_mut()) else {
                break;
            };

            let Some(note) = voice.notes.get(voice.index).copied() else {
                // Empty note list.
                if is_one_shot {
                    let id = voice.id;
                    self.one_shot = None;
                    out.push(MelodyMessage::Finished { id });
                    continue;
                }
                break;
            };

            let ends_at = voice.note_started_ms + note.duration_ms as u64;
            if now_ms < ends_at {
                freq = note.freq_hz;
                break;
            }

            voice.index += 1;
            voice.note_started_ms = ends_at;
            if voice.index < voice.notes.len() {
                continue;
            }
            if is_one_shot {
                let id = voice.id;
                self.one_shot = None;
                out.push(MelodyMessage::Finished { id });
            } else {
                voice.index = 0;
            }
        }

        if freq != self.sounding {
            log::trace!("[audio] tone {:?}", freq);
            output.tone(freq);
            self.sounding = freq;
        }
    }

    /// Silence the output immediately.
    pub fn silence(&mut self, output: &mut dyn ToneOutput) {
        if self.sounding.take().is_some() {
            output.tone(None);
        }
    }
}
