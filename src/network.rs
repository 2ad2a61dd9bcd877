// ParticleNetwork owns everything one animated surface needs: the canvas,
// the particle store and the state of every timer driving it. The host hands
// scheduled tasks and input events back in, each runs to completion.

use crate::config::{NetworkConfig, RESIZE_DEBOUNCE_MS};
use crate::interaction::InteractionController;
use crate::particle::ParticleFactory;
use crate::renderer::Renderer;
use crate::scheduler::{Scheduler, Task, TaskHandle};
use crate::spawner::Spawner;
use crate::store::{ParticleId, ParticleStore};
use crate::surface::{self, Canvas, Geometry};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use vecmath::Vector2;

pub struct ParticleNetwork<C> {
    config: NetworkConfig,
    canvas: C,
    geometry: Geometry,
    store: ParticleStore,
    factory: ParticleFactory,
    renderer: Renderer,
    spawner: Spawner,
    interaction: InteractionController,
    frame: Option<TaskHandle>,
    resize_debounce: Option<TaskHandle>,
}

impl<C: Canvas> ParticleNetwork<C> {
    pub fn new(canvas: C, config: NetworkConfig) -> Self {
        Self::with_rng(canvas, config, SmallRng::from_entropy())
    }

    pub fn with_rng(canvas: C, config: NetworkConfig, rng: SmallRng) -> Self {
        config.log_warnings();
        ParticleNetwork {
            factory: ParticleFactory::with_rng(config.speed, config.particle_colors.clone(), rng),
            renderer: Renderer::new(&config),
            interaction: InteractionController::new(config.spawn_quantity),
            spawner: Spawner::new(),
            store: ParticleStore::new(),
            geometry: Geometry::default(),
            frame: None,
            resize_debounce: None,
            canvas,
            config,
        }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn interaction_particle(&self) -> Option<ParticleId> {
        self.interaction.interaction_particle()
    }

    /// Sizes the surface, starts the time-sliced population and the loop.
    pub fn start(&mut self, scheduler: &mut dyn Scheduler) {
        self.geometry = surface::init_surface(&mut self.canvas, self.geometry);
        self.spawner.spawn(
            true,
            self.geometry,
            self.config.density,
            &mut self.store,
            &mut self.factory,
            scheduler,
        );
        self.request_frame(scheduler);
    }

    pub fn run(&mut self, task: Task, scheduler: &mut dyn Scheduler) {
        match task {
            Task::Frame => {
                self.frame = None;
                self.animate(scheduler);
            }
            Task::PopulationTick => {
                self.spawner
                    .tick(self.geometry, &mut self.store, &mut self.factory, scheduler);
            }
            Task::PointerSpawnTick => {
                self.interaction
                    .pointer_spawn_tick(&mut self.store, &mut self.factory);
            }
            Task::TouchTap { x, y, gesture } => {
                self.interaction
                    .touch_tap([x, y], gesture, &mut self.store, &mut self.factory);
            }
            Task::ResizeSettled => {
                self.resize_debounce = None;
                self.reinitialize(scheduler);
            }
        }
    }

    fn request_frame(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.frame.take() {
            scheduler.cancel(handle);
        }
        self.frame = Some(scheduler.request_frame());
    }

    // One frame: clear, lines, then move and draw every particle in order
    fn animate(&mut self, scheduler: &mut dyn Scheduler) {
        if !self.geometry.is_empty() {
            // Without a palette nothing is visible, lines included
            let visible = !self.config.particle_colors.is_empty();
            if visible {
                self.renderer.clear_screen(&mut self.canvas, self.geometry);
                self.renderer.render_lines(&mut self.canvas, self.store.as_slice());
            }
            for particle in self.store.iter_mut() {
                particle.update(self.geometry);
                if visible {
                    self.renderer.render_particle(&mut self.canvas, particle);
                }
            }
        }
        if self.config.speed != 0.0 {
            self.request_frame(scheduler);
        }
    }

    /// Debounced: only the last resize in a quiet window triggers a rebuild.
    pub fn on_resize(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.resize_debounce.take() {
            scheduler.cancel(handle);
        }
        self.resize_debounce = Some(scheduler.set_timeout(Task::ResizeSettled, RESIZE_DEBOUNCE_MS));
    }

    /// Throws the field away and rebuilds it for the container's current
    /// size, populating it in one pass.
    pub fn reinitialize(&mut self, scheduler: &mut dyn Scheduler) {
        self.halt(scheduler);
        surface::clear(&mut self.canvas, self.geometry);
        self.store.clear();
        self.geometry = surface::init_surface(&mut self.canvas, self.geometry);
        self.spawner.spawn(
            false,
            self.geometry,
            self.config.density,
            &mut self.store,
            &mut self.factory,
            scheduler,
        );
        log::info!(
            "reinitialized at {}x{} with {} particles",
            self.geometry.width,
            self.geometry.height,
            self.store.len()
        );
        self.request_frame(scheduler);
    }

    // Cancels the frame and every spawn timer, leaving the store alone
    fn halt(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.frame.take() {
            scheduler.cancel(handle);
        }
        self.spawner.cancel(scheduler);
        self.interaction.reset(scheduler);
    }

    /// Cancels everything still scheduled, including a pending resize.
    pub fn stop(&mut self, scheduler: &mut dyn Scheduler) {
        self.halt(scheduler);
        if let Some(handle) = self.resize_debounce.take() {
            scheduler.cancel(handle);
        }
    }

    pub fn pointer_move(&mut self, at: Vector2<f64>) {
        self.interaction
            .pointer_move(at, &mut self.store, &mut self.factory);
    }

    pub fn pointer_down(&mut self, scheduler: &mut dyn Scheduler) {
        self.interaction.pointer_down(scheduler);
    }

    pub fn pointer_up(&mut self, scheduler: &mut dyn Scheduler) {
        self.interaction.pointer_up(scheduler);
    }

    pub fn pointer_leave(&mut self) {
        self.interaction.leave(&mut self.store);
    }

    pub fn touch_start(&mut self, at: Vector2<f64>, scheduler: &mut dyn Scheduler) {
        self.interaction.touch_start(at, scheduler);
    }

    pub fn touch_move(&mut self, at: Vector2<f64>) {
        self.interaction
            .touch_move(at, &mut self.store, &mut self.factory);
    }

    pub fn touch_end(&mut self) {
        self.interaction.leave(&mut self.store);
    }
}
