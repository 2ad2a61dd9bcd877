// Pointer and touch handling: one particle follows the pointer, holding the
// button down sprays particles at it and a tap drops a small burst.

use crate::config::{POINTER_SPAWN_TICK_MS, TAP_WINDOW_MS};
use crate::particle::ParticleFactory;
use crate::scheduler::{Scheduler, Task, TaskHandle};
use crate::store::{ParticleId, ParticleStore};
use crate::surface::Geometry;
use vecmath::Vector2;

struct PointerSpawn {
    timer: TaskHandle,
    ticks: u32,
}

pub struct InteractionController {
    particle: Option<ParticleId>,
    pointer_spawn: Option<PointerSpawn>,
    tap: Option<TaskHandle>,
    // Bumped on every touch start so a stale tap window can tell it is stale
    gesture: u32,
    touch_moved: bool,
    spawn_quantity: usize,
}

fn spawn_at(store: &mut ParticleStore, factory: &mut ParticleFactory, at: Vector2<f64>, quantity: usize) {
    for _ in 0..quantity {
        store.push(factory.create(Geometry::default(), Some(at[0]), Some(at[1])));
    }
}

impl InteractionController {
    pub fn new(spawn_quantity: usize) -> Self {
        InteractionController {
            particle: None,
            pointer_spawn: None,
            tap: None,
            gesture: 0,
            touch_moved: false,
            spawn_quantity,
        }
    }

    pub fn interaction_particle(&self) -> Option<ParticleId> {
        self.particle
    }

    pub fn is_spawning(&self) -> bool {
        self.pointer_spawn.is_some()
    }

    pub fn pointer_move(&mut self, at: Vector2<f64>, store: &mut ParticleStore, factory: &mut ParticleFactory) {
        let id = match self.particle.filter(|&id| store.get(id).is_some()) {
            Some(id) => id,
            None => {
                let id = store.push(factory.create_anchored(at));
                self.particle = Some(id);
                id
            }
        };
        if let Some(particle) = store.get_mut(id) {
            particle.pos = at;
        }
    }

    pub fn pointer_down(&mut self, scheduler: &mut dyn Scheduler) {
        self.stop_spawning(scheduler);
        let timer = scheduler.set_interval(Task::PointerSpawnTick, POINTER_SPAWN_TICK_MS);
        log::debug!("pointer down, spawning every {}ms", POINTER_SPAWN_TICK_MS);
        self.pointer_spawn = Some(PointerSpawn { timer, ticks: 0 });
    }

    /// First spawning tick drops the full burst, every later one a single
    /// particle. Ticks without an interaction particle spawn nothing and do
    /// not use up the burst.
    pub fn pointer_spawn_tick(&mut self, store: &mut ParticleStore, factory: &mut ParticleFactory) {
        let at = match self.particle.and_then(|id| store.get(id)) {
            Some(particle) => particle.pos,
            None => return,
        };
        let spawn = match self.pointer_spawn.as_mut() {
            Some(spawn) => spawn,
            None => return,
        };
        let quantity = if spawn.ticks == 0 { self.spawn_quantity } else { 1 };
        spawn_at(store, factory, at, quantity);
        spawn.ticks += 1;
    }

    pub fn pointer_up(&mut self, scheduler: &mut dyn Scheduler) {
        self.stop_spawning(scheduler);
    }

    fn stop_spawning(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(spawn) = self.pointer_spawn.take() {
            scheduler.cancel(spawn.timer);
            log::debug!("pointer spawn stopped after {} ticks", spawn.ticks);
        }
    }

    pub fn touch_start(&mut self, at: Vector2<f64>, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.tap.take() {
            scheduler.cancel(handle);
        }
        self.gesture = self.gesture.wrapping_add(1);
        self.touch_moved = false;
        let task = Task::TouchTap {
            x: at[0],
            y: at[1],
            gesture: self.gesture,
        };
        self.tap = Some(scheduler.set_timeout(task, TAP_WINDOW_MS));
    }

    pub fn touch_move(&mut self, at: Vector2<f64>, store: &mut ParticleStore, factory: &mut ParticleFactory) {
        self.touch_moved = true;
        self.pointer_move(at, store, factory);
    }

    // The tap window has closed. Only a touch that never moved counts.
    pub fn touch_tap(
        &mut self,
        at: Vector2<f64>,
        gesture: u32,
        store: &mut ParticleStore,
        factory: &mut ParticleFactory,
    ) {
        if gesture != self.gesture {
            return;
        }
        self.tap = None;
        if !self.touch_moved {
            spawn_at(store, factory, at, self.spawn_quantity);
        }
    }

    /// Pointer left the surface or the touch ended.
    pub fn leave(&mut self, store: &mut ParticleStore) {
        if let Some(id) = self.particle.take() {
            store.remove(id);
        }
    }

    /// Forget everything, the store is about to be emptied.
    pub fn reset(&mut self, scheduler: &mut dyn Scheduler) {
        self.stop_spawning(scheduler);
        if let Some(handle) = self.tap.take() {
            scheduler.cancel(handle);
        }
        self.particle = None;
    }
}
