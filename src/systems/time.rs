//! Clock update.
//!
//! Called by [`game::step`](crate::game::step) before the schedule runs, so
//! every system of a tick sees the same [`WorldTime`].
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Count one tick of `tick_ms` simulated milliseconds.
pub fn update_world_time(world: &mut World, tick_ms: u32) {
    let mut wt = world.resource_mut::<WorldTime>();
    wt.tick += 1;
    wt.elapsed_ms = wt.elapsed_ms.saturating_add(tick_ms as u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_tick_and_elapsed() {
        let mut world = World::new();
        world.init_resource::<WorldTime>();
        for _ in 0..40 {
            update_world_time(&mut world, 50);
        }
        let wt = world.resource::<WorldTime>();
        assert_eq!(wt.tick, 40);
        assert_eq!(wt.elapsed_ms, 2000);
        assert_eq!(wt.elapsed_secs(), 2);
    }
}
