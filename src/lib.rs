//! # fws-ui
//!
//! A declarative, window-based terminal UI toolkit for applications that draw
//! through a remote window server.
//!
//! An application connects to the server over a Unix socket, opens one or
//! more windows, and composes each window's content from views and layout
//! containers. Every window renders its tree into a cell canvas, ships the
//! canvas to its server-side layer, and reacts to mouse input through
//! gestures bound to on-screen regions.
//!
//! ## Core Systems
//!
//! - **[`geometry`]**: Offset, Size, Region and logical (fixed/floating) sizes
//! - **[`render`]**: Colors with alpha, cells, canvases and compositing
//! - **[`view`]**: The View trait and leaf views: Text, Spacer, Button, TextField
//! - **[`layout`]**: Box, HStack, VStack and ZStack containers
//! - **[`gesture`]**: Click and drag recognizers, hit testing, event context
//! - **[`event`]**: Keyboard and mouse input events
//! - **[`protocol`]**: Requests, replies and their wire encoding
//! - **[`transport`]**: Request/reply multiplexing and event routing
//! - **[`window`]**: Window chrome, drawing, move and resize
//! - **[`app`]**: Connection lifecycle, configuration and shutdown
//! - **[`testing`]**: In-memory window server and snapshot helpers

// Foundation
pub mod error;
pub mod geometry;

// Drawing and composition
pub mod layout;
pub mod render;
pub mod view;

// Input
pub mod event;
pub mod gesture;

// Server connection
pub mod protocol;
pub mod shutdown;
pub mod transport;

// Application
pub mod app;
pub mod window;

pub mod testing;

pub use app::{AppConfig, Application, WindowHandle};
pub use error::{Error, Result};
pub use geometry::{LogicalSize, Offset, Region, Size};
pub use layout::{Align, BoxView, HStack, VStack, ZStack};
pub use render::{Attr, Canvas, Cell, Color};
pub use shutdown::QuitReason;
pub use view::{Button, IntoView, Spacer, Text, TextField, View};
pub use window::Window;
