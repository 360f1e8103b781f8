use bevy_ecs::prelude::Resource;

/// Simulation clock, in whole ticks. Advanced once per tick by
/// [`update_world_time`](crate::systems::time::update_world_time).
///
/// Every duration in the pet core is a tick count compared against this
/// counter; there are no wall-clock timers.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct WorldTime {
    /// Ticks run since startup.
    pub tick: u64,
    /// Simulated milliseconds since startup (`tick_ms` per tick).
    pub elapsed_ms: u64,
}

impl WorldTime {
    /// True on every `period`-th tick. A zero period never fires.
    pub fn every(&self, period: u32) -> bool {
        period != 0 && self.tick % period as u64 == 0
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_ms / 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_counts_ticks() {
        let mut time = WorldTime::default();
        let fired: Vec<u64> = (1..=10)
            .filter(|&t| {
                time.tick = t;
                time.every(4)
            })
            .collect();
        assert_eq!(fired, vec![4, 8]);
        assert!(!time.every(0));
    }
}
