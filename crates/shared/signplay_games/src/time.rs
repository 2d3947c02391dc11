pub use core::time::Duration;

// `std::time::Instant::now()` can panic on `wasm32-unknown-unknown` depending
// on the runtime. `web-time` backs the same API with `performance.now()`.
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;

#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;
