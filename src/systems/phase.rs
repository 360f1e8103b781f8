//! Phase state machine systems.
//!
//! - [`apply_pet_requests`] is the only system that changes a creature's
//!   [`PetPhase`]. Each tick it reports the initial BOOT_INTRO entry, applies
//!   the pending [`PetRequest`]s in order, then advances the phase clock.
//!   Every resulting transition goes through the [`AudioCueDispatcher`]
//!   before a [`PhaseChangeEvent`] is triggered, so the loop owned by the
//!   phase being left is always stopped first.
//! - [`restart_animation_on_phase_change`] and
//!   [`restart_animation_on_stage_change`] are observers that rewind the
//!   creature's animation when what it shows changes.
//!
//! # System Ordering
//!
//! Run after every system that writes [`PetRequest`]s (touch, routine,
//! vitals, aging) and before the audio forwarding systems.

use bevy_ecs::prelude::*;
use smallvec::SmallVec;

use crate::components::animation::Animation;
use crate::components::phase::{PetPhase, Transition};
use crate::events::audio::MelodyCmd;
use crate::events::phase::{PetRequest, PhaseChangeEvent, StageChangeEvent};
use crate::resources::cues::{AudioCueDispatcher, Cue};

fn dispatch_transition(
    entity: Entity,
    transition: Transition,
    dispatcher: &mut AudioCueDispatcher,
    melody_cmds: &mut MessageWriter<MelodyCmd>,
    commands: &mut Commands,
) {
    log::info!(
        "{:?}: {:?} -> {:?} (task {:?})",
        entity,
        transition.from,
        transition.to,
        transition.task
    );
    for cue in dispatcher.on_transition(&transition) {
        melody_cmds.write(cue.into());
    }
    commands.trigger(PhaseChangeEvent { entity, transition });
}

/// Feed this tick's requests to every [`PetPhase`] and dispatch the cues of
/// whatever changed.
pub fn apply_pet_requests(
    mut requests: MessageReader<PetRequest>,
    mut query: Query<(Entity, &mut PetPhase)>,
    mut dispatcher: ResMut<AudioCueDispatcher>,
    mut melody_cmds: MessageWriter<MelodyCmd>,
    mut commands: Commands,
) {
    let pending: SmallVec<[PetRequest; 8]> = requests.read().copied().collect();

    for (entity, mut phase) in query.iter_mut() {
        if let Some(transition) = phase.start() {
            dispatch_transition(entity, transition, &mut dispatcher, &mut melody_cmds, &mut commands);
        }

        for &request in &pending {
            match request {
                PetRequest::ReachStage(target) => {
                    let Some(change) = phase.advance_stage(target) else {
                        log::debug!("{:?}: stage {:?} not reachable from {:?}", entity, target, phase.stage());
                        continue;
                    };
                    log::info!("{:?}: grew from {} to {}", entity, change.from, change.to);
                    if let Some(id) = dispatcher.on_stage_change(&change) {
                        melody_cmds.write(Cue::Enqueue(id).into());
                    }
                    commands.trigger(StageChangeEvent { entity, change });
                }
                other => {
                    if let Some(transition) = phase.request(other) {
                        dispatch_transition(entity, transition, &mut dispatcher, &mut melody_cmds, &mut commands);
                    }
                }
            }
        }

        if let Some(transition) = phase.tick() {
            dispatch_transition(entity, transition, &mut dispatcher, &mut melody_cmds, &mut commands);
        }
    }
}

/// Advance the `PetRequest` message queue once per tick.
pub fn update_pet_requests(mut msgs: ResMut<Messages<PetRequest>>) {
    msgs.update();
}

/// Observer: a new phase starts its animation from the first frame.
pub fn restart_animation_on_phase_change(
    trigger: On<PhaseChangeEvent>,
    mut query: Query<&mut Animation>,
) {
    if let Ok(mut animation) = query.get_mut(trigger.event().entity) {
        animation.restart();
    }
}

/// Observer: a new life stage starts its walk cycle from the first frame.
pub fn restart_animation_on_stage_change(
    trigger: On<StageChangeEvent>,
    mut query: Query<&mut Animation>,
) {
    if let Ok(mut animation) = query.get_mut(trigger.event().entity) {
        animation.restart();
    }
}
