//! Canvas 2D rendering module
//!
//! Sprites come from `<img>` elements in the page; every sprite has a
//! vector fallback so the game stays playable when an image fails to load.

pub mod layout;
pub mod palette;

#[cfg(target_arch = "wasm32")]
pub mod assets;
#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use layout::{ASPECT_RATIO, client_to_canvas, fit_canvas};

#[cfg(target_arch = "wasm32")]
pub use assets::{Assets, SpriteKind};
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
