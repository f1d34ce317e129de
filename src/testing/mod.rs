//! Headless testing support: an in-memory window server and snapshot helpers.
//!
//! Use [`FakeServer`] to drive an [`Application`](crate::app::Application)
//! without a real window server. Use [`canvas_to_string`] and
//! [`render_to_string`] to capture rendered output as plain text.

pub mod fake_server;
pub mod snapshot;

pub use fake_server::FakeServer;
pub use snapshot::{canvas_to_string, render_to_string};
