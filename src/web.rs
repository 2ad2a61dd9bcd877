// Browser side: the JS-facing entry points, a Scheduler built on
// requestAnimationFrame / setInterval / setTimeout, and the DOM listeners
// feeding pointer, touch and resize events into the network.

use crate::color::Color;
use crate::config::{DensityPreset, NetworkConfig, SpeedPreset};
use crate::dom::{self, HtmlCanvas};
use crate::error::{describe, InitError};
use crate::network::ParticleNetwork;
use crate::scheduler::{Scheduler, Task, TaskHandle};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use vecmath::Vector2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Event, EventTarget, MouseEvent, TouchEvent, Window};

type WebNetwork = ParticleNetwork<HtmlCanvas>;
type Callback = Closure<dyn FnMut()>;

pub struct Timer<'a> {
    name: &'a str,
}

impl<'a> Timer<'a> {
    pub fn new(name: &'a str) -> Timer<'a> {
        console::time_with_label(name);
        Timer { name }
    }
}

impl<'a> Drop for Timer<'a> {
    fn drop(&mut self) {
        console::time_end_with_label(self.name);
    }
}

struct App {
    network: WebNetwork,
    scheduler: WebScheduler,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum TimerKind {
    Interval,
    Timeout,
}

struct ScheduledTimer<C> {
    id: i32,
    kind: TimerKind,
    callback: C,
}

type FiredQueue = Rc<RefCell<Vec<TaskHandle>>>;

/// Interval and timeout closures by handle. A callback records its handle in
/// `fired` before it asks for the app, so a timeout whose run was dropped
/// because the network was busy still gets retired on the next settle.
struct TimerTable<C> {
    timers: HashMap<TaskHandle, ScheduledTimer<C>>,
    fired: FiredQueue,
    // A timer can be cancelled from inside its own callback, so spent
    // closures wait here until the next settle before being dropped
    retired: Vec<C>,
}

impl<C> TimerTable<C> {
    fn new() -> Self {
        TimerTable {
            timers: HashMap::new(),
            fired: Rc::new(RefCell::new(Vec::new())),
            retired: Vec::new(),
        }
    }

    fn fired_queue(&self) -> FiredQueue {
        Rc::clone(&self.fired)
    }

    fn insert(&mut self, handle: TaskHandle, id: i32, kind: TimerKind, callback: C) {
        self.timers.insert(handle, ScheduledTimer { id, kind, callback });
    }

    fn remove(&mut self, handle: TaskHandle) -> Option<(i32, TimerKind)> {
        let timer = self.timers.remove(&handle)?;
        self.retired.push(timer.callback);
        Some((timer.id, timer.kind))
    }

    // Drops what earlier settles retired, then retires every timeout that
    // has fired since. Intervals stay until cancelled.
    fn settle(&mut self) {
        self.retired.clear();
        let fired: Vec<TaskHandle> = self.fired.borrow_mut().drain(..).collect();
        for handle in fired {
            let spent = matches!(
                self.timers.get(&handle),
                Some(ScheduledTimer { kind: TimerKind::Timeout, .. })
            );
            if spent {
                self.remove(handle);
            }
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.timers.len()
    }
}

struct WebScheduler {
    window: Window,
    app: Weak<RefCell<App>>,
    next_handle: u32,
    frame: Option<(TaskHandle, i32)>,
    frame_callback: Option<Callback>,
    timers: TimerTable<Callback>,
}

impl WebScheduler {
    fn new(window: Window, app: Weak<RefCell<App>>) -> Self {
        WebScheduler {
            window,
            app,
            next_handle: 0,
            frame: None,
            frame_callback: None,
            timers: TimerTable::new(),
        }
    }

    fn mint(&mut self) -> TaskHandle {
        self.next_handle = self.next_handle.wrapping_add(1);
        TaskHandle(self.next_handle)
    }

    fn schedule(&mut self, task: Task, ms: u32, kind: TimerKind) -> TaskHandle {
        let handle = self.mint();
        let app = self.app.clone();
        let fired = self.timers.fired_queue();
        let callback: Callback = Closure::wrap(Box::new(move || {
            fired.borrow_mut().push(handle);
            dispatch(&app, task);
        }) as Box<dyn FnMut()>);
        let function: &js_sys::Function = callback.as_ref().unchecked_ref();
        let timeout = ms.min(i32::MAX as u32) as i32;
        let result = match kind {
            TimerKind::Interval => self
                .window
                .set_interval_with_callback_and_timeout_and_arguments_0(function, timeout),
            TimerKind::Timeout => self
                .window
                .set_timeout_with_callback_and_timeout_and_arguments_0(function, timeout),
        };
        match result {
            Ok(id) => self.timers.insert(handle, id, kind, callback),
            Err(e) => log::error!("failed to schedule {:?}: {}", task, describe(&e)),
        }
        handle
    }
}

impl Scheduler for WebScheduler {
    fn request_frame(&mut self) -> TaskHandle {
        let handle = self.mint();
        if self.frame_callback.is_none() {
            let app = self.app.clone();
            self.frame_callback = Some(Closure::wrap(
                Box::new(move || dispatch(&app, Task::Frame)) as Box<dyn FnMut()>
            ));
        }
        if let Some(callback) = &self.frame_callback {
            match self
                .window
                .request_animation_frame(callback.as_ref().unchecked_ref())
            {
                Ok(id) => self.frame = Some((handle, id)),
                Err(e) => log::error!("requestAnimationFrame failed: {}", describe(&e)),
            }
        }
        handle
    }

    fn set_interval(&mut self, task: Task, period_ms: u32) -> TaskHandle {
        self.schedule(task, period_ms, TimerKind::Interval)
    }

    fn set_timeout(&mut self, task: Task, delay_ms: u32) -> TaskHandle {
        self.schedule(task, delay_ms, TimerKind::Timeout)
    }

    fn cancel(&mut self, handle: TaskHandle) {
        if let Some((frame, id)) = self.frame {
            if frame == handle {
                let _ = self.window.cancel_animation_frame(id);
                self.frame = None;
                return;
            }
        }
        match self.timers.remove(handle) {
            Some((id, TimerKind::Interval)) => self.window.clear_interval_with_handle(id),
            Some((id, TimerKind::Timeout)) => self.window.clear_timeout_with_handle(id),
            None => {}
        }
    }
}

fn with_app(app: &Weak<RefCell<App>>, f: impl FnOnce(&mut WebNetwork, &mut WebScheduler)) {
    let app = match app.upgrade() {
        Some(app) => app,
        None => return,
    };
    let mut guard = match app.try_borrow_mut() {
        Ok(guard) => guard,
        Err(_) => {
            log::warn!("network is busy, dropping callback");
            return;
        }
    };
    let App { network, scheduler } = &mut *guard;
    scheduler.timers.settle();
    f(network, scheduler);
}

fn dispatch(app: &Weak<RefCell<App>>, task: Task) {
    with_app(app, |network, scheduler| {
        if task == Task::Frame {
            scheduler.frame = None;
        }
        let _timer = (task == Task::ResizeSettled).then(|| Timer::new("ParticleNetwork::reinitialize"));
        network.run(task, scheduler);
    });
}

// Removes itself from the target when dropped
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

fn on<F>(app: &Rc<RefCell<App>>, target: &EventTarget, kind: &'static str, mut handler: F) -> Result<Listener, InitError>
where
    F: FnMut(&Event, &mut WebNetwork, &mut WebScheduler) + 'static,
{
    let app = Rc::downgrade(app);
    let callback = Closure::wrap(Box::new(move |event: Event| {
        with_app(&app, |network, scheduler| handler(&event, network, scheduler));
    }) as Box<dyn FnMut(Event)>);
    target
        .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
        .map_err(|e| InitError::Listener(describe(&e)))?;
    Ok(Listener {
        target: target.clone(),
        kind,
        callback,
    })
}

fn mouse_point(event: &Event, canvas: &HtmlCanvas) -> Option<Vector2<f64>> {
    let event = event.dyn_ref::<MouseEvent>()?;
    Some(canvas.local_point(event.client_x() as f64, event.client_y() as f64))
}

fn touch_point(event: &Event, canvas: &HtmlCanvas) -> Option<Vector2<f64>> {
    let touch = event.dyn_ref::<TouchEvent>()?.changed_touches().get(0)?;
    Some(canvas.local_point(touch.client_x() as f64, touch.client_y() as f64))
}

fn listen(app: &Rc<RefCell<App>>, window: &Window, canvas: &EventTarget, interactive: bool) -> Result<Vec<Listener>, InitError> {
    let window: &EventTarget = window.as_ref();
    let mut listeners = vec![on(app, window, "resize", |_, network, scheduler| {
        network.on_resize(scheduler)
    })?];
    if !interactive {
        return Ok(listeners);
    }

    listeners.push(on(app, canvas, "mousemove", |event, network, _| {
        if let Some(at) = mouse_point(event, network.canvas()) {
            network.pointer_move(at);
        }
    })?);
    listeners.push(on(app, canvas, "mousedown", |_, network, scheduler| {
        network.pointer_down(scheduler)
    })?);
    listeners.push(on(app, canvas, "mouseup", |_, network, scheduler| {
        network.pointer_up(scheduler)
    })?);
    listeners.push(on(app, canvas, "mouseout", |_, network, _| network.pointer_leave())?);
    listeners.push(on(app, canvas, "touchstart", |event, network, scheduler| {
        if let Some(at) = touch_point(event, network.canvas()) {
            network.touch_start(at, scheduler);
        }
    })?);
    listeners.push(on(app, canvas, "touchmove", |event, network, _| {
        if let Some(at) = touch_point(event, network.canvas()) {
            network.touch_move(at);
        }
    })?);
    listeners.push(on(app, canvas, "touchend", |_, network, _| network.touch_end())?);
    Ok(listeners)
}

fn teardown(app: &Rc<RefCell<App>>) {
    let mut guard = match app.try_borrow_mut() {
        Ok(guard) => guard,
        Err(_) => {
            log::error!("cannot tear down a network from inside its own callback");
            return;
        }
    };
    let App { network, scheduler } = &mut *guard;
    network.stop(scheduler);
    network.canvas().detach();
}

/// Settings for `init_with_options`. Anything left unset keeps its default.
#[wasm_bindgen]
#[derive(Clone, Default)]
pub struct NetworkOptions {
    config: NetworkConfig,
}

#[wasm_bindgen]
impl NetworkOptions {
    #[wasm_bindgen(constructor)]
    pub fn new() -> NetworkOptions {
        NetworkOptions::default()
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.config.speed = speed;
    }

    /// "none", "slow", "medium" or "fast".
    pub fn set_speed_preset(&mut self, preset: &str) {
        match preset.parse::<SpeedPreset>() {
            Ok(preset) => self.config.speed = preset.value(),
            Err(e) => log::warn!("{}, keeping speed {}", e, self.config.speed),
        }
    }

    pub fn set_density(&mut self, density: f64) {
        self.config.density = density;
    }

    /// "low", "medium" or "high".
    pub fn set_density_preset(&mut self, preset: &str) {
        match preset.parse::<DensityPreset>() {
            Ok(preset) => self.config.density = preset.value(),
            Err(e) => log::warn!("{}, keeping density {}", e, self.config.density),
        }
    }

    pub fn set_net_line_distance(&mut self, distance: f64) {
        self.config.net_line_distance = distance;
    }

    pub fn set_net_line_color(&mut self, color: &str) {
        match color.parse::<Color>() {
            Ok(color) => self.config.net_line_color = color,
            Err(e) => log::warn!("{}, keeping line color", e),
        }
    }

    pub fn set_net_line_width(&mut self, width: f64) {
        self.config.net_line_width = width;
    }

    /// Array of hex strings. Entries that do not parse are skipped.
    pub fn set_particle_colors(&mut self, colors: &js_sys::Array) {
        self.config.particle_colors = colors
            .iter()
            .filter_map(|value| {
                let text = value.as_string()?;
                match text.parse::<Color>() {
                    Ok(color) => Some(color),
                    Err(e) => {
                        log::warn!("{}, skipping palette entry", e);
                        None
                    }
                }
            })
            .collect();
    }

    pub fn set_spawn_quantity(&mut self, quantity: u32) {
        self.config.spawn_quantity = quantity as usize;
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.config.interactive = interactive;
    }
}

/// A running network. Freeing the handle tears the network down, so keep it
/// alive for as long as the animation should run.
#[wasm_bindgen]
pub struct NetworkHandle {
    app: Rc<RefCell<App>>,
    listeners: Vec<Listener>,
}

impl Drop for NetworkHandle {
    fn drop(&mut self) {
        self.listeners.clear();
        teardown(&self.app);
    }
}

#[wasm_bindgen]
impl NetworkHandle {
    pub fn particle_count(&self) -> usize {
        self.app.borrow().network.store().len()
    }

    /// Stops the loop and every timer, detaches the listeners and removes
    /// the canvas.
    pub fn destroy(self) {
        drop(self);
        log::info!("particle network destroyed");
    }
}

fn attach(container_id: &str, config: NetworkConfig) -> Result<NetworkHandle, InitError> {
    let _timer = Timer::new("ParticleNetwork::init");
    let window = dom::window()?;
    let document = window.document().ok_or(InitError::NoDocument)?;
    let container = dom::mount_point(&document, container_id)?;
    let canvas = HtmlCanvas::attach(&window, &document, container)?;
    let events: EventTarget = canvas.element().clone().into();
    let interactive = config.interactive;

    let app = Rc::new_cyclic(|weak| {
        RefCell::new(App {
            network: ParticleNetwork::new(canvas, config),
            scheduler: WebScheduler::new(window.clone(), weak.clone()),
        })
    });
    {
        let mut guard = app.borrow_mut();
        let App { network, scheduler } = &mut *guard;
        network.start(scheduler);
    }

    let listeners = listen(&app, &window, &events, interactive).map_err(|e| {
        teardown(&app);
        e
    })?;
    Ok(NetworkHandle { app, listeners })
}

/// Mounts a network with default settings inside the element with id
/// `container_id`. Returns undefined (and logs why) if it cannot.
#[wasm_bindgen]
pub fn init(container_id: &str) -> Option<NetworkHandle> {
    init_with_options(container_id, &NetworkOptions::new())
}

#[wasm_bindgen]
pub fn init_with_options(container_id: &str, options: &NetworkOptions) -> Option<NetworkHandle> {
    match attach(container_id, options.config.clone()) {
        Ok(handle) => {
            log::info!("particle network running in #{}", container_id);
            Some(handle)
        }
        Err(e) => {
            log::error!("particle network not started: {}", e);
            None
        }
    }
}
