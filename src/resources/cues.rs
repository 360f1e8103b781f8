//! Phase-to-melody cue dispatch.
//!
//! [`AudioCueDispatcher`] decides which melody to play when the creature
//! enters or leaves a phase, crosses a life-stage boundary, or has critical
//! stats. It is the only writer of "which loop is active": a loop melody is
//! owned by the phase that started it and is stopped on *every* exit from
//! that phase, whatever phase comes next. Entering DEAD or RIP silences
//! everything, queued one-shots included, before the final cue.
//!
//! The dispatcher only produces [`Cue`]s; the phase systems turn them into
//! [`MelodyCmd`](crate::events::audio::MelodyCmd) messages for the audio
//! thread.

use arrayvec::ArrayVec;
use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::components::lifestage::LifeStage;
use crate::components::phase::{Phase, StageChange, Task, Transition};
use crate::events::audio::MelodyCmd;
use crate::resources::melodies::MelodyId;

/// Upper bound on alert beeps emitted per cadence boundary.
pub const MAX_ALERT_BEEPS: usize = 10;

/// Alert cadence selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlertMode {
    /// Frequent reminders.
    #[default]
    Total,
    /// Half as often.
    Limited,
}

impl AlertMode {
    pub fn toggled(self) -> Self {
        match self {
            AlertMode::Total => AlertMode::Limited,
            AlertMode::Limited => AlertMode::Total,
        }
    }
}

/// A single audio instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Play once as soon as the sounding one-shot ends, ahead of the queue.
    Play(MelodyId),
    /// Play once after the pending one-shots.
    Enqueue(MelodyId),
    StartLoop(MelodyId),
    StopLoop(MelodyId),
    /// Drop the queue, cut the one-shot and stop the loop.
    StopAll,
}

impl From<Cue> for MelodyCmd {
    fn from(cue: Cue) -> Self {
        match cue {
            Cue::Play(id) => MelodyCmd::Play { id },
            Cue::Enqueue(id) => MelodyCmd::Enqueue { id },
            Cue::StartLoop(id) => MelodyCmd::StartLoop { id },
            Cue::StopLoop(_) => MelodyCmd::StopLoop,
            Cue::StopAll => MelodyCmd::StopAll,
        }
    }
}

/// Loop stop order returned by [`AudioCueDispatcher::on_phase_exit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopLoop(pub MelodyId);

/// Melodies to start when entering a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseCues {
    pub one_shot: Option<MelodyId>,
    pub start_loop: Option<MelodyId>,
}

/// Cues for one transition: at most a stop, a one-shot and a loop start.
pub type CueList = ArrayVec<Cue, 3>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueConfig {
    /// HATCHING repeats its melody until hatching completes.
    pub hatch_loop: bool,
    /// Ticks between alert bursts in [`AlertMode::Total`].
    pub total_every_ticks: u32,
    /// Ticks between alert bursts in [`AlertMode::Limited`].
    pub limited_every_ticks: u32,
}

impl CueConfig {
    /// Whether `id` is ever started as a phase loop.
    pub fn is_looped(&self, id: MelodyId) -> bool {
        (self.hatch_loop && id == MelodyId::Hatch)
            || Task::ALL.into_iter().any(|task| task_loop(task) == id)
    }
}

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            hatch_loop: true,
            total_every_ticks: 200,
            limited_every_ticks: 400,
        }
    }
}

fn task_intro(task: Task) -> MelodyId {
    match task {
        Task::Eat => MelodyId::EatIntro,
        Task::Drink => MelodyId::DrinkIntro,
        Task::Clean => MelodyId::CleanIntro,
        Task::Hug => MelodyId::HugIntro,
        Task::Sleep => MelodyId::SleepIntro,
    }
}

// Clean, Hug and Sleep have no dedicated loop; they repeat their intro.
fn task_loop(task: Task) -> MelodyId {
    match task {
        Task::Eat => MelodyId::EatLoop,
        Task::Drink => MelodyId::DrinkLoop,
        Task::Clean => MelodyId::CleanIntro,
        Task::Hug => MelodyId::HugIntro,
        Task::Sleep => MelodyId::SleepIntro,
    }
}

#[derive(Resource, Debug, Clone)]
pub struct AudioCueDispatcher {
    config: CueConfig,
    active_loop: Option<(Phase, MelodyId)>,
    alert_ticks: u32,
}

impl Default for AudioCueDispatcher {
    fn default() -> Self {
        Self::new(CueConfig::default())
    }
}

impl AudioCueDispatcher {
    pub fn new(config: CueConfig) -> Self {
        Self {
            config,
            active_loop: None,
            alert_ticks: 0,
        }
    }

    /// The loop currently owned by a phase, if any.
    pub fn active_loop(&self) -> Option<MelodyId> {
        self.active_loop.map(|(_, id)| id)
    }

    /// Leaving `phase`: stop the loop it owns.
    ///
    /// Only one phase is active at a time, so any loop still recorded when a
    /// phase is left is stopped, and a mismatched owner is logged.
    pub fn on_phase_exit(&mut self, phase: Phase, task: Option<Task>) -> Option<StopLoop> {
        let (owner, id) = self.active_loop.take()?;
        if owner != phase {
            log::warn!("loop {id:?} owned by {owner:?} still active when leaving {phase:?} ({task:?})");
        }
        Some(StopLoop(id))
    }

    /// Entering `phase`: the one-shot to play and the loop it takes ownership of.
    pub fn on_phase_enter(&mut self, phase: Phase, task: Option<Task>) -> PhaseCues {
        let cues = match (phase, task) {
            (Phase::BootIntro, _) => PhaseCues {
                one_shot: Some(MelodyId::Home),
                start_loop: None,
            },
            (Phase::Hatching, _) if self.config.hatch_loop => PhaseCues {
                one_shot: None,
                start_loop: Some(MelodyId::Hatch),
            },
            (Phase::Hatching, _) => PhaseCues {
                one_shot: Some(MelodyId::Hatch),
                start_loop: None,
            },
            (Phase::TaskPerform, Some(task)) => PhaseCues {
                one_shot: Some(task_intro(task)),
                start_loop: Some(task_loop(task)),
            },
            (Phase::Sleeping, _) => PhaseCues {
                one_shot: Some(MelodyId::SleepIntro),
                start_loop: None,
            },
            (Phase::Dead, _) => PhaseCues {
                one_shot: Some(MelodyId::Death),
                start_loop: None,
            },
            (Phase::Rip, _) => PhaseCues {
                one_shot: Some(MelodyId::Rip),
                start_loop: None,
            },
            _ => PhaseCues::default(),
        };
        if let Some(id) = cues.start_loop {
            self.active_loop = Some((phase, id));
        }
        cues
    }

    /// All cues for a transition, in playback order: the old phase's loop
    /// stop first, then the new phase's one-shot and loop. A terminal phase
    /// replaces the loop stop with [`Cue::StopAll`].
    pub fn on_transition(&mut self, transition: &Transition) -> CueList {
        let mut list = CueList::new();
        let stop = transition
            .from
            .and_then(|from| self.on_phase_exit(from, transition.from_task));
        if transition.to.is_terminal() {
            list.push(Cue::StopAll);
        } else if let Some(StopLoop(id)) = stop {
            list.push(Cue::StopLoop(id));
        }
        let enter = self.on_phase_enter(transition.to, transition.task);
        if let Some(id) = enter.one_shot {
            list.push(Cue::Play(id));
        }
        if let Some(id) = enter.start_loop {
            list.push(Cue::StartLoop(id));
        }
        list
    }

    /// One-shot for a life-stage boundary crossing.
    pub fn on_stage_change(&self, change: &StageChange) -> Option<MelodyId> {
        match change.to {
            LifeStage::Junior => None,
            LifeStage::Adult => Some(MelodyId::AgeUpAdult),
            LifeStage::Senior => Some(MelodyId::AgeUpSenior),
        }
    }

    /// Ticks between alert bursts for `mode`, never zero.
    pub fn cadence(&self, mode: AlertMode) -> u32 {
        let ticks = match mode {
            AlertMode::Total => self.config.total_every_ticks,
            AlertMode::Limited => self.config.limited_every_ticks,
        };
        ticks.max(1)
    }

    /// Advance the alert clock by one tick.
    ///
    /// On a cadence boundary, returns one alert beep per critical stat,
    /// capped at [`MAX_ALERT_BEEPS`]. Between boundaries, returns nothing.
    pub fn tick_alerts(
        &mut self,
        critical_count: usize,
        mode: AlertMode,
    ) -> ArrayVec<MelodyId, MAX_ALERT_BEEPS> {
        let mut beeps = ArrayVec::new();
        self.alert_ticks = self.alert_ticks.saturating_add(1);
        if self.alert_ticks < self.cadence(mode) {
            return beeps;
        }
        self.alert_ticks = 0;
        for _ in 0..critical_count.min(MAX_ALERT_BEEPS) {
            beeps.push(MelodyId::AlertUnit);
        }
        beeps
    }

    /// Restart the alert clock, e.g. after the mode changed.
    pub fn reset_alerts(&mut self) {
        self.alert_ticks = 0;
    }
}
