//! Full-tick integration tests: the creature's life driven through the real
//! schedule with fake display and touch drivers.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemState;

use jurassiclife::components::animation::Animation;
use jurassiclife::components::lifestage::{Age, LifeStage};
use jurassiclife::components::phase::{PetPhase, Phase, Task};
use jurassiclife::components::vitals::Vitals;
use jurassiclife::events::alertmode::SwitchAlertModeEvent;
use jurassiclife::events::audio::MelodyCmd;
use jurassiclife::events::phase::{PetRequest, PhaseChangeEvent};
use jurassiclife::game;
use jurassiclife::resources::animationstore::{AnimationStore, FrameRef};
use jurassiclife::resources::cues::AudioCueDispatcher;
use jurassiclife::resources::drivers::{DisplayDriver, TouchDriver, TouchSamples};
use jurassiclife::resources::hitzones::HitZones;
use jurassiclife::resources::melodies::MelodyId;
use jurassiclife::resources::names::NameCorpus;
use jurassiclife::resources::petconfig::PetConfig;
use jurassiclife::resources::touch::{RawTouch, ScreenPoint};

const PANEL_W: u16 = 320;
const PANEL_H: u16 = 240;

type Blits = Rc<RefCell<Vec<(String, i32, i32)>>>;

struct RecordingDisplay {
    blits: Blits,
}

impl DisplayDriver for RecordingDisplay {
    fn init(&mut self) {}
    fn set_rotation(&mut self, _rotation: u8) {}
    fn set_brightness(&mut self, _level: u8) {}
    fn width(&self) -> u16 {
        PANEL_W
    }
    fn height(&self) -> u16 {
        PANEL_H
    }
    fn blit(&mut self, frame: &FrameRef, x: i32, y: i32, _w: u16, _h: u16, _key: u16) {
        self.blits.borrow_mut().push((frame.id.to_string(), x, y));
    }
}

struct FakeTouch {
    sample: Rc<Cell<Option<RawTouch>>>,
}

impl TouchDriver for FakeTouch {
    fn init(&mut self) {}
    fn samples(&mut self) -> TouchSamples {
        self.sample.get().into_iter().collect()
    }
}

#[derive(Resource, Default)]
struct SeenPhases(Vec<Phase>);

fn record_phase(trigger: On<PhaseChangeEvent>, mut seen: ResMut<SeenPhases>) {
    seen.0.push(trigger.event().transition.to);
}

fn short_config() -> PetConfig {
    PetConfig {
        boot_intro_ticks: 2,
        hatch_ticks: 3,
        approach_ticks: 2,
        perform_ticks: 3,
        return_ticks: 2,
        sleep_ticks: 50,
        frame_ticks: 100,
        decay_every_ticks: 1000,
        total_every_ticks: 5,
        limited_every_ticks: 10,
        ..PetConfig::new()
    }
}

struct Pet {
    world: World,
    schedule: Schedule,
    creature: Entity,
    config: PetConfig,
    cmds: SystemState<MessageReader<'static, 'static, MelodyCmd>>,
    touch: Rc<Cell<Option<RawTouch>>>,
    blits: Blits,
}

impl Pet {
    fn new(config: PetConfig) -> Self {
        let mut world = World::new();
        world.init_resource::<SeenPhases>();
        world.add_observer(record_phase);

        let touch = Rc::new(Cell::new(None));
        let blits: Blits = Rc::new(RefCell::new(Vec::new()));
        game::install_drivers(
            &mut world,
            Box::new(RecordingDisplay {
                blits: blits.clone(),
            }),
            Box::new(FakeTouch {
                sample: touch.clone(),
            }),
            &config,
        );
        let creature = game::setup(
            &mut world,
            config.clone(),
            AnimationStore::placeholder(4),
            NameCorpus::default().with_seed(1),
        );
        let cmds = SystemState::new(&mut world);
        Self {
            world,
            schedule: game::build_schedule(),
            creature,
            config,
            cmds,
            touch,
            blits,
        }
    }

    /// Run one tick and return the melody commands it produced.
    fn step(&mut self) -> Vec<MelodyCmd> {
        game::step(&mut self.world, &mut self.schedule);
        self.cmds.get(&self.world).read().cloned().collect()
    }

    /// Step until the creature is in `phase`, returning every command seen.
    fn run_until(&mut self, phase: Phase, max_ticks: usize) -> Vec<MelodyCmd> {
        let mut all = Vec::new();
        for _ in 0..max_ticks {
            all.extend(self.step());
            if self.phase() == phase {
                return all;
            }
        }
        panic!("never reached {phase:?}, stuck in {:?}", self.phase());
    }

    fn phase(&self) -> Phase {
        self.world.get::<PetPhase>(self.creature).unwrap().current()
    }

    fn request(&mut self, request: PetRequest) {
        self.world
            .resource_mut::<Messages<PetRequest>>()
            .write(request);
    }

    fn press(&self, x: u16, y: u16) {
        let raw = self
            .config
            .touch_mapper()
            .unmap(ScreenPoint { x, y }, PANEL_W, PANEL_H);
        self.touch.set(Some(raw));
    }

    fn release(&self) {
        self.touch.set(None);
    }

    fn hatch(&mut self) {
        self.run_until(Phase::Idle, 20);
    }
}

#[test]
fn boot_plays_home_then_hatching_loops_until_idle() {
    let mut pet = Pet::new(short_config());

    assert_eq!(pet.step(), vec![MelodyCmd::Play { id: MelodyId::Home }]);
    assert_eq!(pet.phase(), Phase::BootIntro);

    assert_eq!(pet.step(), vec![MelodyCmd::StartLoop { id: MelodyId::Hatch }]);
    assert_eq!(pet.phase(), Phase::Hatching);

    for _ in 0..3 {
        assert!(pet.step().is_empty());
        assert_eq!(pet.phase(), Phase::Hatching);
    }

    assert_eq!(pet.step(), vec![MelodyCmd::StopLoop]);
    assert_eq!(pet.phase(), Phase::Idle);

    assert_eq!(
        pet.world.resource::<SeenPhases>().0,
        vec![Phase::BootIntro, Phase::Hatching, Phase::Idle]
    );
}

#[test]
fn tapping_eat_runs_the_whole_care_cycle() {
    let mut pet = Pet::new(short_config());
    pet.hatch();

    // Bottom-left button.
    pet.press(10, PANEL_H - 5);
    assert!(pet.step().is_empty());
    pet.release();
    assert_eq!(pet.phase(), Phase::TaskApproach);
    assert_eq!(
        pet.world.get::<PetPhase>(pet.creature).unwrap().task(),
        Some(Task::Eat)
    );

    let cmds = pet.run_until(Phase::TaskPerform, 10);
    assert_eq!(
        cmds,
        vec![
            MelodyCmd::Play { id: MelodyId::EatIntro },
            MelodyCmd::StartLoop { id: MelodyId::EatLoop },
        ]
    );

    let cmds = pet.run_until(Phase::TaskReturn, 10);
    assert_eq!(cmds, vec![MelodyCmd::StopLoop]);
    assert!(pet.world.get::<Vitals>(pet.creature).unwrap().hunger > 80);

    let cmds = pet.run_until(Phase::Idle, 10);
    assert!(cmds.is_empty());
}

#[test]
fn tap_wakes_a_sleeping_creature() {
    let mut pet = Pet::new(short_config());
    pet.hatch();
    pet.world.get_mut::<Vitals>(pet.creature).unwrap().energy = 10;

    pet.request(PetRequest::Sleep);
    assert_eq!(pet.step(), vec![MelodyCmd::Play { id: MelodyId::SleepIntro }]);
    assert_eq!(pet.phase(), Phase::Sleeping);

    // Holding the finger down only counts once.
    pet.press(PANEL_W / 2, 20);
    pet.step();
    assert_eq!(pet.phase(), Phase::Idle);
    pet.step();
    pet.release();
    assert_eq!(pet.phase(), Phase::Idle);
}

#[test]
fn sleep_care_stops_its_loop_when_the_creature_falls_asleep() {
    let mut pet = Pet::new(short_config());
    pet.hatch();
    pet.world.get_mut::<Vitals>(pet.creature).unwrap().energy = 10;

    pet.request(PetRequest::Care(Task::Sleep));
    let cmds = pet.run_until(Phase::TaskPerform, 10);
    assert_eq!(
        cmds,
        vec![
            MelodyCmd::Play { id: MelodyId::SleepIntro },
            MelodyCmd::StartLoop { id: MelodyId::SleepIntro },
        ]
    );

    let cmds = pet.run_until(Phase::Sleeping, 10);
    assert_eq!(
        cmds,
        vec![MelodyCmd::StopLoop, MelodyCmd::Play { id: MelodyId::SleepIntro }]
    );
    assert_eq!(pet.world.resource::<AudioCueDispatcher>().active_loop(), None);
    assert!(pet.step().is_empty());
    assert_eq!(pet.phase(), Phase::Sleeping);
}

#[test]
fn alert_mode_switch_slows_the_beeps() {
    let mut pet = Pet::new(short_config());
    pet.hatch();
    pet.world.trigger(SwitchAlertModeEvent {});
    pet.world.flush();
    pet.world.get_mut::<Vitals>(pet.creature).unwrap().hunger = 0;

    let mut window = Vec::new();
    for _ in 0..10 {
        window.extend(pet.step());
    }
    let beeps = window
        .iter()
        .filter(|c| **c == MelodyCmd::Enqueue { id: MelodyId::AlertUnit })
        .count();
    assert_eq!(beeps, 1);
}

#[test]
fn taps_outside_every_zone_are_ignored() {
    let mut pet = Pet::new(short_config());
    pet.hatch();
    pet.world.insert_resource(HitZones::default());

    pet.press(10, PANEL_H - 5);
    pet.step();
    pet.release();
    pet.step();
    assert_eq!(pet.phase(), Phase::Idle);
}

#[test]
fn dying_mid_task_stops_the_loop_then_plays_death() {
    let mut pet = Pet::new(short_config());
    pet.hatch();
    pet.request(PetRequest::Care(Task::Drink));
    pet.run_until(Phase::TaskPerform, 10);

    pet.request(PetRequest::Die);
    assert_eq!(
        pet.step(),
        vec![MelodyCmd::StopAll, MelodyCmd::Play { id: MelodyId::Death }]
    );
    assert_eq!(pet.phase(), Phase::Dead);

    pet.request(PetRequest::Care(Task::Eat));
    pet.request(PetRequest::Wake);
    for _ in 0..20 {
        assert!(pet.step().is_empty());
    }
    assert_eq!(pet.phase(), Phase::Dead);
}

#[test]
fn critical_needs_beep_once_per_cadence() {
    let mut pet = Pet::new(short_config());
    pet.hatch();
    {
        let mut vitals = pet.world.get_mut::<Vitals>(pet.creature).unwrap();
        vitals.hunger = 0;
        vitals.thirst = 0;
        vitals.hygiene = 5;
    }

    let beeps = |cmds: &[MelodyCmd]| {
        cmds.iter()
            .filter(|c| **c == MelodyCmd::Enqueue { id: MelodyId::AlertUnit })
            .count()
    };

    let mut window = Vec::new();
    for _ in 0..5 {
        window.extend(pet.step());
    }
    assert_eq!(beeps(&window), 3);

    let mut window = Vec::new();
    for _ in 0..5 {
        window.extend(pet.step());
    }
    assert_eq!(beeps(&window), 3);
}

#[test]
fn growing_up_restarts_the_walk_cycle_with_new_sprites() {
    let mut pet = Pet::new(short_config());
    pet.hatch();

    pet.world.get_mut::<Age>(pet.creature).unwrap().ticks = pet.config.junior_ticks - 1;
    pet.world.get_mut::<Animation>(pet.creature).unwrap().frame_index = 3;
    pet.blits.borrow_mut().clear();

    let cmds = pet.step();
    assert_eq!(cmds, vec![MelodyCmd::Enqueue { id: MelodyId::AgeUpAdult }]);
    let phase = pet.world.get::<PetPhase>(pet.creature).unwrap();
    assert_eq!(phase.stage(), LifeStage::Adult);
    assert_eq!(phase.current(), Phase::Idle);
    assert_eq!(pet.world.get::<Animation>(pet.creature).unwrap().frame_index, 0);

    let blits = pet.blits.borrow();
    assert_eq!(blits.len(), 1);
    assert_eq!(blits[0], ("adult_walk_00".to_string(), 115, 50));
}

#[test]
fn senior_lifespan_ends_in_rip() {
    let mut pet = Pet::new(PetConfig {
        junior_ticks: 2,
        adult_ticks: 2,
        senior_ticks: 2,
        ..short_config()
    });
    pet.hatch();

    let cmds = pet.run_until(Phase::Rip, 20);
    assert_eq!(
        cmds,
        vec![
            MelodyCmd::Enqueue { id: MelodyId::AgeUpAdult },
            MelodyCmd::Enqueue { id: MelodyId::AgeUpSenior },
            MelodyCmd::StopAll,
            MelodyCmd::Play { id: MelodyId::Rip },
        ]
    );
    for _ in 0..5 {
        assert!(pet.step().is_empty());
    }
}

#[test]
fn every_tick_draws_the_creature_centred() {
    let mut pet = Pet::new(short_config());
    for _ in 0..3 {
        pet.step();
    }
    let blits = pet.blits.borrow();
    assert_eq!(blits.len(), 3);
    assert!(
        blits
            .iter()
            .all(|(id, x, y)| id == "junior_walk_00" && *x == 115 && *y == 50)
    );
}
