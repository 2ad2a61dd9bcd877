// Fills the store up to the density target, either all at once or one
// particle per tick so the first frames are not spent creating particles.

use crate::config::{MAX_TARGET_QUANTITY, POPULATION_TICK_MS};
use crate::particle::ParticleFactory;
use crate::scheduler::{Scheduler, Task, TaskHandle};
use crate::store::ParticleStore;
use crate::surface::Geometry;

/// Particles wanted on a surface of this size, at most
/// `MAX_TARGET_QUANTITY`. A non-positive density or an empty surface wants
/// none.
pub fn target_quantity(geometry: Geometry, density: f64) -> usize {
    if geometry.is_empty() || !(density > 0.0) {
        return 0;
    }
    let wanted = (geometry.area() / density).ceil();
    if wanted > MAX_TARGET_QUANTITY as f64 {
        log::warn!(
            "density {} asks for {} particles, capping at {}",
            density,
            wanted,
            MAX_TARGET_QUANTITY
        );
        return MAX_TARGET_QUANTITY;
    }
    wanted as usize
}

#[derive(Default)]
pub struct Spawner {
    timer: Option<TaskHandle>,
    target: usize,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn spawn(
        &mut self,
        initial: bool,
        geometry: Geometry,
        density: f64,
        store: &mut ParticleStore,
        factory: &mut ParticleFactory,
        scheduler: &mut dyn Scheduler,
    ) {
        self.target = target_quantity(geometry, density);
        if initial {
            self.cancel(scheduler);
            if store.len() < self.target {
                log::debug!("spawning {} particles at one per {}ms", self.target, POPULATION_TICK_MS);
                self.timer = Some(scheduler.set_interval(Task::PopulationTick, POPULATION_TICK_MS));
            }
        } else {
            for _ in 0..self.target {
                store.push(factory.create(geometry, None, None));
            }
        }
    }

    pub fn tick(
        &mut self,
        geometry: Geometry,
        store: &mut ParticleStore,
        factory: &mut ParticleFactory,
        scheduler: &mut dyn Scheduler,
    ) {
        if store.len() < self.target {
            store.push(factory.create(geometry, None, None));
        }
        if store.len() >= self.target {
            self.cancel(scheduler);
        }
    }

    pub fn cancel(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.timer.take() {
            scheduler.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualScheduler;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn factory() -> ParticleFactory {
        ParticleFactory::with_rng(1.0, Vec::new(), SmallRng::seed_from_u64(3))
    }

    #[test]
    fn target_follows_area_over_density() {
        assert_eq!(target_quantity(Geometry::new(800.0, 600.0), 15000.0), 32);
        assert_eq!(target_quantity(Geometry::new(100.0, 100.0), 3000.0), 4);
        assert_eq!(target_quantity(Geometry::new(0.0, 600.0), 15000.0), 0);
        assert_eq!(target_quantity(Geometry::new(800.0, 600.0), 0.0), 0);
    }

    #[test]
    fn tiny_density_is_capped() {
        let geometry = Geometry::new(800.0, 600.0);
        assert_eq!(target_quantity(geometry, 1e-9), MAX_TARGET_QUANTITY);
        assert_eq!(target_quantity(geometry, f64::MIN_POSITIVE), MAX_TARGET_QUANTITY);
        assert_eq!(target_quantity(geometry, 48.0), MAX_TARGET_QUANTITY);
        assert_eq!(target_quantity(geometry, 49.0), 9796);

        let mut spawner = Spawner::new();
        let mut store = ParticleStore::new();
        let mut factory = factory();
        let mut scheduler = ManualScheduler::new();
        spawner.spawn(false, geometry, 1e-9, &mut store, &mut factory, &mut scheduler);
        assert_eq!(store.len(), MAX_TARGET_QUANTITY);
    }

    #[test]
    fn non_initial_spawn_is_synchronous() {
        let mut spawner = Spawner::new();
        let mut store = ParticleStore::new();
        let mut factory = factory();
        let mut scheduler = ManualScheduler::new();
        let geometry = Geometry::new(800.0, 600.0);
        spawner.spawn(false, geometry, 15000.0, &mut store, &mut factory, &mut scheduler);
        assert_eq!(store.len(), 32);
        assert!(!spawner.is_running());
        assert_eq!(scheduler.timers_pending(), 0);
    }

    #[test]
    fn initial_spawn_adds_one_per_tick_then_stops() {
        let mut spawner = Spawner::new();
        let mut store = ParticleStore::new();
        let mut factory = factory();
        let mut scheduler = ManualScheduler::new();
        let geometry = Geometry::new(100.0, 100.0);
        spawner.spawn(true, geometry, 2500.0, &mut store, &mut factory, &mut scheduler);
        assert!(store.is_empty());
        assert_eq!(scheduler.timers_pending(), 1);

        for expected in 1..=4 {
            spawner.tick(geometry, &mut store, &mut factory, &mut scheduler);
            assert_eq!(store.len(), expected);
        }
        assert!(!spawner.is_running());
        assert_eq!(scheduler.timers_pending(), 0);
    }

    #[test]
    fn restarting_cancels_the_previous_timer() {
        let mut spawner = Spawner::new();
        let mut store = ParticleStore::new();
        let mut factory = factory();
        let mut scheduler = ManualScheduler::new();
        let geometry = Geometry::new(100.0, 100.0);
        spawner.spawn(true, geometry, 2500.0, &mut store, &mut factory, &mut scheduler);
        spawner.spawn(true, geometry, 2500.0, &mut store, &mut factory, &mut scheduler);
        assert_eq!(scheduler.timers_pending(), 1);
    }
}
