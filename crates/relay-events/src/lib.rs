//! # Relay Events
//!
//! Hierarchical, namespaced event dispatch: register handlers under dotted
//! namespace paths, remove them selectively, and emit to run every handler
//! bound to a namespace as a sequential chain where each handler's return
//! value becomes the next handler's input.
//!
//! ## Namespaces
//!
//! A path like `editor.buffer.saved` splits on the configured separator into
//! a *main namespace* (`editor`) and *sub-namespaces* (`buffer`, `saved`).
//! Registration binds a handler into each named sub-namespace queue AND into
//! the main namespace's reserved primary queue, so emitting the bare main
//! namespace reaches every handler ever bound beneath it. Emission itself
//! targets exactly what was named.
//!
//! ## Quick start
//!
//! ```
//! use relay_events::{handler, EventBus};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> relay_events::EventResult<()> {
//! let mut bus = EventBus::new();
//! bus.on("math", handler(|args| Ok(json!(args[0].as_i64().unwrap_or(0) + 1))), false)?
//!     .on("math", handler(|args| Ok(json!(args[0].as_i64().unwrap_or(0) * 2))), false)?;
//!
//! // 5 + 1 = 6, then 6 * 2 = 12
//! assert_eq!(bus.emit("math", vec![json!(5)]).await?, Some(json!(12)));
//! # Ok(())
//! # }
//! ```
//!
//! ## Sharing
//!
//! A bus owns its registry outright; nothing is process-global except the
//! defaults consumed by [`configure`]. Wrap a bus in `Arc<RwLock<..>>` when
//! several components register against it.

#![warn(clippy::all)]

mod bus;
mod config;
mod error;
mod namespace;
mod registry;

pub use bus::{handler, EventBus, Handler, HandlerFn};
pub use config::{configure, default_config, BusConfig, BusOptions};
pub use error::{EventError, EventResult};
pub use namespace::NamespacePath;
