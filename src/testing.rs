// Host doubles for the unit tests: a canvas that records what it was asked
// to draw and a scheduler running on a virtual millisecond clock.

use crate::color::Color;
use crate::network::ParticleNetwork;
use crate::scheduler::{Scheduler, Task, TaskHandle};
use crate::surface::{Canvas, Geometry};

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    ClearRect(f64, f64, f64, f64),
    GlobalAlpha(f64),
    StrokeColor(Color),
    FillColor(Color),
    LineWidth(f64),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Arc(f64, f64, f64),
    Stroke,
    Fill,
}

#[derive(Default)]
pub struct RecordingCanvas {
    pub container: Geometry,
    pub size: Geometry,
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(container: Geometry) -> Self {
        RecordingCanvas {
            container,
            ..Default::default()
        }
    }

    pub fn count(&self, op: &DrawOp) -> usize {
        self.ops.iter().filter(|other| *other == op).count()
    }
}

impl Canvas for RecordingCanvas {
    fn container_size(&self) -> Geometry {
        self.container
    }

    fn set_size(&mut self, size: Geometry) {
        self.size = size;
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::ClearRect(x, y, width, height));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ops.push(DrawOp::GlobalAlpha(alpha));
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.ops.push(DrawOp::StrokeColor(color));
    }

    fn set_fill_color(&mut self, color: Color) {
        self.ops.push(DrawOp::FillColor(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(DrawOp::LineWidth(width));
    }

    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::LineTo(x, y));
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, _start_angle: f64, _end_angle: f64) {
        self.ops.push(DrawOp::Arc(x, y, radius));
    }

    fn stroke(&mut self) {
        self.ops.push(DrawOp::Stroke);
    }

    fn fill(&mut self) {
        self.ops.push(DrawOp::Fill);
    }
}

struct PendingTimer {
    handle: TaskHandle,
    task: Task,
    due: u64,
    period: Option<u64>,
}

#[derive(Default)]
pub struct ManualScheduler {
    pub now: u64,
    next_handle: u32,
    frame: Option<TaskHandle>,
    timers: Vec<PendingTimer>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint(&mut self) -> TaskHandle {
        self.next_handle += 1;
        TaskHandle(self.next_handle)
    }

    pub fn frame_pending(&self) -> bool {
        self.frame.is_some()
    }

    pub fn timers_pending(&self) -> usize {
        self.timers.len()
    }

    /// Runs the requested frame, if any. Returns whether one ran.
    pub fn run_frame<C: Canvas>(&mut self, network: &mut ParticleNetwork<C>) -> bool {
        match self.frame.take() {
            Some(_) => {
                network.run(Task::Frame, self);
                true
            }
            None => false,
        }
    }

    /// Moves the clock forward, firing every interval and timeout that comes
    /// due on the way in deadline order. Frames are not run.
    pub fn advance<C: Canvas>(&mut self, network: &mut ParticleNetwork<C>, ms: u64) {
        let target = self.now + ms;
        loop {
            let next = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, timer)| timer.due <= target)
                .min_by_key(|(_, timer)| (timer.due, timer.handle.0))
                .map(|(idx, _)| idx);
            let idx = match next {
                Some(idx) => idx,
                None => break,
            };
            self.now = self.timers[idx].due;
            let task = self.timers[idx].task;
            match self.timers[idx].period {
                Some(period) => self.timers[idx].due += period,
                None => {
                    self.timers.remove(idx);
                }
            }
            network.run(task, self);
        }
        self.now = target;
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&mut self) -> TaskHandle {
        let handle = self.mint();
        self.frame = Some(handle);
        handle
    }

    fn set_interval(&mut self, task: Task, period_ms: u32) -> TaskHandle {
        let handle = self.mint();
        let period = u64::from(period_ms.max(1));
        self.timers.push(PendingTimer {
            handle,
            task,
            due: self.now + period,
            period: Some(period),
        });
        handle
    }

    fn set_timeout(&mut self, task: Task, delay_ms: u32) -> TaskHandle {
        let handle = self.mint();
        self.timers.push(PendingTimer {
            handle,
            task,
            due: self.now + u64::from(delay_ms),
            period: None,
        });
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        if self.frame == Some(handle) {
            self.frame = None;
        }
        self.timers.retain(|timer| timer.handle != handle);
    }
}
