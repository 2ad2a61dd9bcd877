// Cooperative scheduling seam. Frames, intervals and timeouts all come back
// into ParticleNetwork::run as a Task and run to completion, so the store is
// never touched by two callbacks at once. A multi-threaded host would have to
// put the network behind a lock before implementing this.

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(pub u32);

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Task {
    Frame,
    /// One particle of the time-sliced initial population.
    PopulationTick,
    /// Pointer held down over the surface.
    PointerSpawnTick,
    /// End of the tap window opened by a touch start.
    TouchTap { x: f64, y: f64, gesture: u32 },
    /// The resize debounce ran out.
    ResizeSettled,
}

pub trait Scheduler {
    /// Runs `Task::Frame` on the next frame.
    fn request_frame(&mut self) -> TaskHandle;
    fn set_interval(&mut self, task: Task, period_ms: u32) -> TaskHandle;
    fn set_timeout(&mut self, task: Task, delay_ms: u32) -> TaskHandle;
    /// Cancels a frame, interval or timeout. Unknown or spent handles are
    /// ignored.
    fn cancel(&mut self, handle: TaskHandle);
}
