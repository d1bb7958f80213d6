//! Dash Runner entry point
//!
//! Native: serves the per-user high score API. The browser build exposes
//! `WebGame` from the library instead and needs nothing here.

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_ADDR: &str = "127.0.0.1:5000";

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use dash_runner::server::{MemStore, http};

    env_logger::init();

    let addr = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("RUNNER_ADDR").ok())
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());
    log::info!("Dash Runner score server starting...");

    let mut store = MemStore::new();
    if let Err(e) = http::serve(&addr, &mut store) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Entry point is the #[wasm_bindgen(start)] hook in the library
}
