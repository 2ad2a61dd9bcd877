//! Animated particle network for a 2D canvas.
//!
//! Particles drift across the surface and nearby pairs are joined by lines
//! that fade with distance. A pointer drags its own particle around and can
//! spray or tap new ones into the field. The simulation itself only talks to
//! the [`Canvas`] and [`Scheduler`] traits. The browser bindings in `web`
//! implement them on top of a `<canvas>` element, requestAnimationFrame and
//! the window timers.

mod utils;

pub mod color;
pub mod config;
pub mod dom;
pub mod error;
pub mod interaction;
pub mod network;
pub mod particle;
pub mod renderer;
pub mod scheduler;
pub mod spawner;
pub mod store;
pub mod surface;
pub mod web;

#[cfg(test)]
mod testing;

use wasm_bindgen::prelude::*;

pub use color::Color;
pub use config::NetworkConfig;
pub use error::InitError;
pub use network::ParticleNetwork;
pub use scheduler::{Scheduler, Task, TaskHandle};
pub use surface::{Canvas, Geometry};
pub use web::{init, init_with_options, NetworkHandle, NetworkOptions};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Installs the panic hook and routes `log` output to the browser console.
/// Call once before `init`.
#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
    // A second call finds the logger already set, which is fine
    let _ = console_log::init_with_level(log::Level::Info);
}
