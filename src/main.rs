#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "the controllers only run in the browser")
)]

mod config;
mod device;
mod error;
mod hover_video;
mod nodding;
mod overlay;
mod responsive_preview;

#[cfg(target_arch = "wasm32")]
mod frontend;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("This project is frontend-only. Run `trunk serve` or `trunk build --release`.");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    frontend::run();
}
