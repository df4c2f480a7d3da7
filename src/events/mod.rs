//! # Events Module
//!
//! Event-driven progress reporting for the gallery build.
//!
//! The build engine emits events through a channel; any front end (the
//! bundled CLI, a GUI, a web dashboard) can subscribe and render progress
//! however it likes. Sending is non-blocking and events are discarded
//! when nobody listens, so the engine runs unchanged without a UI.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Extract(ExtractEvent::Progress(p)) = event {
//!             println!("extracted {}/{}", p.completed, p.total);
//!         }
//!     }
//! });
//!
//! builder.build_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
