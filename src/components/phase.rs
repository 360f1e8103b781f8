//! Creature phase state machine component.
//!
//! The [`PetPhase`] component is the single owner of the creature's [`Phase`]
//! and current [`Task`]. It only changes through [`PetPhase::start`],
//! [`PetPhase::tick`], [`PetPhase::request`] and [`PetPhase::advance_stage`],
//! each of which returns what changed (or `None` when nothing did).
//!
//! # Phases
//!
//! ```text
//! BOOT_INTRO --(boot_intro_ticks)--> HATCHING --HatchComplete--> IDLE
//! IDLE --Care(task)--> TASK_APPROACH --ArrivedAtTask--> TASK_PERFORM
//! TASK_PERFORM --TaskDone--> TASK_RETURN --ArrivedHome--> IDLE
//! IDLE / TASK_PERFORM --Sleep--> SLEEPING --Wake--> IDLE
//! any live phase --Die--> DEAD            (terminal)
//! IDLE (senior) --NaturalEnd--> RIP       (terminal)
//! ```
//!
//! Requests that do not match the current phase are ignored. This keeps the
//! machine robust against duplicated or late external triggers.
//!
//! # Related
//!
//! - [`crate::systems::phase`] – systems that feed requests and dispatch cues
//! - [`crate::events::phase::PhaseChangeEvent`] – event emitted on transitions

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::lifestage::LifeStage;
use crate::events::phase::PetRequest;

/// Top-level behavioural state of the creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    BootIntro,
    Hatching,
    Idle,
    TaskApproach,
    TaskPerform,
    TaskReturn,
    Sleeping,
    Dead,
    Rip,
}

impl Phase {
    /// DEAD and RIP accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Dead | Phase::Rip)
    }
}

/// Care action carried out during the task phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Task {
    Eat,
    Drink,
    Clean,
    Hug,
    Sleep,
}

impl Task {
    pub const ALL: [Task; 5] = [Task::Eat, Task::Drink, Task::Clean, Task::Hug, Task::Sleep];
}

/// A phase change, as returned by the machine and carried by
/// [`PhaseChangeEvent`](crate::events::phase::PhaseChangeEvent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Phase left, `None` for the very first entry into BOOT_INTRO.
    pub from: Option<Phase>,
    /// Task that was active in the phase left.
    pub from_task: Option<Task>,
    /// Phase entered.
    pub to: Phase,
    /// Task active in the phase entered.
    pub task: Option<Task>,
}

/// A life-stage boundary crossing. Does not change the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageChange {
    pub from: LifeStage,
    pub to: LifeStage,
}

/// State machine component for the creature.
#[derive(Component, Debug, Clone)]
pub struct PetPhase {
    current: Phase,
    previous: Option<Phase>,
    task: Option<Task>,
    stage: LifeStage,
    ticks_in_phase: u64,
    boot_intro_ticks: u64,
    started: bool,
}

impl PetPhase {
    /// New machine in BOOT_INTRO that moves on to HATCHING after
    /// `boot_intro_ticks` ticks.
    pub fn new(boot_intro_ticks: u64) -> Self {
        Self {
            current: Phase::BootIntro,
            previous: None,
            task: None,
            stage: LifeStage::Junior,
            ticks_in_phase: 0,
            boot_intro_ticks,
            started: false,
        }
    }

    pub fn current(&self) -> Phase {
        self.current
    }

    pub fn previous(&self) -> Option<Phase> {
        self.previous
    }

    pub fn task(&self) -> Option<Task> {
        self.task
    }

    pub fn stage(&self) -> LifeStage {
        self.stage
    }

    pub fn ticks_in_phase(&self) -> u64 {
        self.ticks_in_phase
    }

    pub fn is_terminal(&self) -> bool {
        self.current.is_terminal()
    }

    /// Report the initial entry into BOOT_INTRO. Returns `Some` only once.
    pub fn start(&mut self) -> Option<Transition> {
        if self.started {
            return None;
        }
        self.started = true;
        Some(Transition {
            from: None,
            from_task: None,
            to: self.current,
            task: self.task,
        })
    }

    /// Advance the phase clock by one tick and apply timed transitions.
    pub fn tick(&mut self) -> Option<Transition> {
        self.ticks_in_phase = self.ticks_in_phase.saturating_add(1);
        if self.current == Phase::BootIntro && self.ticks_in_phase >= self.boot_intro_ticks {
            return Some(self.enter(Phase::Hatching, None));
        }
        None
    }

    /// Apply an external request. Returns the transition, or `None` when the
    /// request does not fit the current phase (the machine is untouched).
    ///
    /// [`PetRequest::ReachStage`] never changes the phase; use
    /// [`PetPhase::advance_stage`] for it.
    pub fn request(&mut self, request: PetRequest) -> Option<Transition> {
        let next = match (self.current, request) {
            (Phase::Hatching, PetRequest::HatchComplete) => Some((Phase::Idle, None)),
            (Phase::Idle, PetRequest::Care(task)) => Some((Phase::TaskApproach, Some(task))),
            (Phase::Idle, PetRequest::Sleep) => Some((Phase::Sleeping, None)),
            (Phase::TaskApproach, PetRequest::ArrivedAtTask) => {
                Some((Phase::TaskPerform, self.task))
            }
            (Phase::TaskPerform, PetRequest::TaskDone) => Some((Phase::TaskReturn, self.task)),
            (Phase::TaskPerform, PetRequest::Sleep) => Some((Phase::Sleeping, None)),
            (Phase::TaskReturn, PetRequest::ArrivedHome) => Some((Phase::Idle, None)),
            (Phase::Sleeping, PetRequest::Wake) => Some((Phase::Idle, None)),
            (current, PetRequest::Die) if !current.is_terminal() => Some((Phase::Dead, None)),
            (Phase::Idle, PetRequest::NaturalEnd) if self.stage == LifeStage::Senior => {
                Some((Phase::Rip, None))
            }
            _ => None,
        };

        match next {
            Some((phase, task)) => Some(self.enter(phase, task)),
            None => {
                log::debug!(
                    "ignoring {:?} while in {:?} (task {:?})",
                    request,
                    self.current,
                    self.task
                );
                None
            }
        }
    }

    /// Move to `target` if it is exactly the next life stage.
    ///
    /// Idempotent: asking again for the current (or an earlier) stage returns
    /// `None`, as does any request once the phase is terminal.
    pub fn advance_stage(&mut self, target: LifeStage) -> Option<StageChange> {
        if self.is_terminal() || self.stage.next() != Some(target) {
            return None;
        }
        let from = std::mem::replace(&mut self.stage, target);
        Some(StageChange { from, to: target })
    }

    fn enter(&mut self, phase: Phase, task: Option<Task>) -> Transition {
        let from = std::mem::replace(&mut self.current, phase);
        let from_task = std::mem::replace(&mut self.task, task);
        self.previous = Some(from);
        self.ticks_in_phase = 0;
        Transition {
            from: Some(from),
            from_task,
            to: phase,
            task,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle_machine() -> PetPhase {
        let mut machine = PetPhase::new(1);
        machine.tick();
        machine.request(PetRequest::HatchComplete);
        assert_eq!(machine.current(), Phase::Idle);
        machine
    }

    #[test]
    fn start_reports_boot_intro_once() {
        let mut machine = PetPhase::new(3);
        let first = machine.start().unwrap();
        assert_eq!(first.from, None);
        assert_eq!(first.to, Phase::BootIntro);
        assert!(machine.start().is_none());
    }

    #[test]
    fn boot_intro_times_out_into_hatching_once() {
        let mut machine = PetPhase::new(3);
        assert!(machine.tick().is_none());
        assert!(machine.tick().is_none());
        let tr = machine.tick().unwrap();
        assert_eq!(tr.from, Some(Phase::BootIntro));
        assert_eq!(tr.to, Phase::Hatching);
        for _ in 0..10 {
            assert!(machine.tick().is_none());
        }
        assert_eq!(machine.current(), Phase::Hatching);
    }

    #[test]
    fn hatching_waits_for_completion() {
        let mut machine = PetPhase::new(1);
        machine.tick();
        assert!(machine.request(PetRequest::Care(Task::Eat)).is_none());
        assert_eq!(machine.current(), Phase::Hatching);
        let tr = machine.request(PetRequest::HatchComplete).unwrap();
        assert_eq!(tr.to, Phase::Idle);
    }

    #[test]
    fn full_task_cycle_keeps_the_task() {
        let mut machine = idle_machine();
        let tr = machine.request(PetRequest::Care(Task::Drink)).unwrap();
        assert_eq!(tr.to, Phase::TaskApproach);
        assert_eq!(tr.task, Some(Task::Drink));

        let tr = machine.request(PetRequest::ArrivedAtTask).unwrap();
        assert_eq!(tr.to, Phase::TaskPerform);
        assert_eq!(tr.task, Some(Task::Drink));

        let tr = machine.request(PetRequest::TaskDone).unwrap();
        assert_eq!(tr.from, Some(Phase::TaskPerform));
        assert_eq!(tr.from_task, Some(Task::Drink));
        assert_eq!(tr.to, Phase::TaskReturn);

        let tr = machine.request(PetRequest::ArrivedHome).unwrap();
        assert_eq!(tr.to, Phase::Idle);
        assert_eq!(tr.task, None);
        assert_eq!(machine.task(), None);
    }

    #[test]
    fn duplicate_requests_are_ignored() {
        let mut machine = idle_machine();
        machine.request(PetRequest::Care(Task::Eat));
        machine.request(PetRequest::ArrivedAtTask);
        assert!(machine.request(PetRequest::Care(Task::Hug)).is_none());
        assert!(machine.request(PetRequest::ArrivedAtTask).is_none());
        assert_eq!(machine.current(), Phase::TaskPerform);
        assert_eq!(machine.task(), Some(Task::Eat));
    }

    #[test]
    fn perform_can_fall_asleep() {
        let mut machine = idle_machine();
        machine.request(PetRequest::Care(Task::Sleep));
        machine.request(PetRequest::ArrivedAtTask);
        let tr = machine.request(PetRequest::Sleep).unwrap();
        assert_eq!(tr.from, Some(Phase::TaskPerform));
        assert_eq!(tr.from_task, Some(Task::Sleep));
        assert_eq!(tr.to, Phase::Sleeping);
        let tr = machine.request(PetRequest::Wake).unwrap();
        assert_eq!(tr.to, Phase::Idle);
    }

    #[test]
    fn sleeping_rejects_care() {
        let mut machine = idle_machine();
        machine.request(PetRequest::Sleep);
        assert!(machine.request(PetRequest::Care(Task::Eat)).is_none());
        assert_eq!(machine.current(), Phase::Sleeping);
    }

    #[test]
    fn dead_is_terminal() {
        let mut machine = idle_machine();
        machine.request(PetRequest::Care(Task::Eat));
        machine.request(PetRequest::ArrivedAtTask);
        let tr = machine.request(PetRequest::Die).unwrap();
        assert_eq!(tr.from, Some(Phase::TaskPerform));
        assert_eq!(tr.to, Phase::Dead);

        for request in [
            PetRequest::Care(Task::Eat),
            PetRequest::ArrivedAtTask,
            PetRequest::TaskDone,
            PetRequest::Sleep,
            PetRequest::Wake,
            PetRequest::Die,
            PetRequest::NaturalEnd,
        ] {
            assert!(machine.request(request).is_none());
        }
        assert!(machine.advance_stage(LifeStage::Adult).is_none());
        assert_eq!(machine.current(), Phase::Dead);
        assert_eq!(machine.stage(), LifeStage::Junior);
    }

    #[test]
    fn natural_end_needs_a_senior_in_idle() {
        let mut machine = idle_machine();
        assert!(machine.request(PetRequest::NaturalEnd).is_none());
        machine.advance_stage(LifeStage::Adult);
        machine.advance_stage(LifeStage::Senior);
        machine.request(PetRequest::Sleep);
        assert!(machine.request(PetRequest::NaturalEnd).is_none());
        machine.request(PetRequest::Wake);
        let tr = machine.request(PetRequest::NaturalEnd).unwrap();
        assert_eq!(tr.to, Phase::Rip);
        assert!(machine.request(PetRequest::Sleep).is_none());
        assert!(machine.request(PetRequest::Die).is_none());
    }

    #[test]
    fn stage_advance_is_idempotent_and_monotonic() {
        let mut machine = idle_machine();
        assert!(machine.advance_stage(LifeStage::Senior).is_none());
        let change = machine.advance_stage(LifeStage::Adult).unwrap();
        assert_eq!(change.from, LifeStage::Junior);
        assert_eq!(change.to, LifeStage::Adult);
        assert!(machine.advance_stage(LifeStage::Adult).is_none());
        assert!(machine.advance_stage(LifeStage::Junior).is_none());
        assert_eq!(machine.current(), Phase::Idle);
    }

    #[test]
    fn transitions_reset_the_phase_clock() {
        let mut machine = idle_machine();
        machine.tick();
        machine.tick();
        assert_eq!(machine.ticks_in_phase(), 2);
        machine.request(PetRequest::Sleep);
        assert_eq!(machine.ticks_in_phase(), 0);
        assert_eq!(machine.previous(), Some(Phase::Idle));
    }
}
