//! Pagemark Web Shell
//!
//! Binds an editor session to an HTML canvas overlay, a page renderer
//! supplied by the host page, and the backend's save endpoint.

mod launch;
mod style;

pub use launch::{LaunchError, LaunchParams, parse_launch_params, parse_profile, resolve_endpoint};
pub use style::{css_color, response_json};

#[cfg(target_arch = "wasm32")]
mod canvas;
#[cfg(target_arch = "wasm32")]
mod pages;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{WebEditor, start};
