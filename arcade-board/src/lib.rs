pub mod client;
pub mod controller;
pub mod csv_data;
pub mod fetch;
pub mod ranking;
pub mod records;
pub mod render;
pub mod sanitize;

#[cfg(target_arch = "wasm32")]
mod wasm_app;

#[cfg(target_arch = "wasm32")]
pub use wasm_app::*;

#[cfg(not(target_arch = "wasm32"))]
mod template;

#[cfg(not(target_arch = "wasm32"))]
pub use template::render_index;
