//! Aging: counts the creature's lived ticks and requests stage changes and
//! the natural end of its life.

use bevy_ecs::prelude::*;

use crate::components::lifestage::Age;
use crate::components::phase::{PetPhase, Phase};
use crate::events::phase::PetRequest;
use crate::resources::petconfig::PetConfig;

/// Advance `age` by one tick for a creature in `phase` and return the
/// requests that follow from it, at most one stage step per tick.
pub fn age_requests(age: &mut Age, phase: &PetPhase, config: &PetConfig) -> [Option<PetRequest>; 2] {
    if matches!(phase.current(), Phase::BootIntro | Phase::Hatching) || phase.is_terminal() {
        return [None, None];
    }
    age.ticks = age.ticks.saturating_add(1);

    let target = age.stage_for(config.junior_ticks, config.adult_ticks);
    let stage = if target > phase.stage() {
        phase.stage().next().map(PetRequest::ReachStage)
    } else {
        None
    };
    let end = age
        .lifespan_over(config.junior_ticks, config.adult_ticks, config.senior_ticks)
        .then_some(PetRequest::NaturalEnd);
    [stage, end]
}

pub fn aging_system(
    config: Res<PetConfig>,
    mut query: Query<(&PetPhase, &mut Age)>,
    mut requests: MessageWriter<PetRequest>,
) {
    for (phase, mut age) in query.iter_mut() {
        for request in age_requests(&mut age, phase, &config).into_iter().flatten() {
            requests.write(request);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::lifestage::LifeStage;

    fn config() -> PetConfig {
        PetConfig {
            junior_ticks: 2,
            adult_ticks: 2,
            senior_ticks: 2,
            ..PetConfig::new()
        }
    }

    fn idle() -> PetPhase {
        let mut phase = PetPhase::new(0);
        phase.start();
        phase.tick();
        phase.request(PetRequest::HatchComplete);
        phase
    }

    #[test]
    fn egg_does_not_age() {
        let mut phase = PetPhase::new(10);
        phase.start();
        let mut age = Age::default();
        assert_eq!(age_requests(&mut age, &phase, &config()), [None, None]);
        assert_eq!(age.ticks, 0);
    }

    #[test]
    fn stages_then_natural_end() {
        let config = config();
        let mut phase = idle();
        let mut age = Age::default();
        let mut seen = Vec::new();
        for _ in 0..6 {
            for request in age_requests(&mut age, &phase, &config).into_iter().flatten() {
                if let PetRequest::ReachStage(stage) = request {
                    phase.advance_stage(stage);
                }
                seen.push(request);
            }
        }
        assert_eq!(
            seen,
            vec![
                PetRequest::ReachStage(LifeStage::Adult),
                PetRequest::ReachStage(LifeStage::Senior),
                PetRequest::NaturalEnd,
            ]
        );
    }

    #[test]
    fn stages_are_requested_one_at_a_time() {
        let config = PetConfig {
            junior_ticks: 0,
            adult_ticks: 0,
            ..config()
        };
        let phase = idle();
        let mut age = Age::default();
        let [stage, _] = age_requests(&mut age, &phase, &config);
        assert_eq!(stage, Some(PetRequest::ReachStage(LifeStage::Adult)));
    }
}
