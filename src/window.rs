//! Window: one server layer showing a view tree inside window chrome.
//!
//! A window goes through three states. It starts [`WindowState::Unbound`];
//! [`Application::open_window`] asks the server for a layer and the window
//! becomes [`WindowState::Bound`]; closing it deletes the layer and it is
//! [`WindowState::Closed`] for good.
//!
//! Once bound, the window runs its own task. Every inbound event is handled
//! synchronously inside that task: pointer events are hit-tested against the
//! gestures collected at the last redraw, key events go to the application's
//! key sink. Callbacks queue [`WindowCommand`]s that the window applies
//! afterwards, then it redraws.

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info, trace, warn};

use crate::app::Application;
use crate::error::{Error, Result};
use crate::event::{InputEvent, MouseEvent};
use crate::geometry::{Offset, Region, Size};
use crate::gesture::{DragGesture, EventContext, HitIndex, PointerMemo, WindowCommand};
use crate::layout::{collect_gestures, view_at_path, Align, BoxView, HStack, VStack, ZStack};
use crate::protocol::{EventPayload, LayerId, Request};
use crate::render::{Canvas, Color};
use crate::shutdown::{QuitReason, ShutdownListener};
use crate::transport::WindowMessage;
use crate::view::{Button, IntoView, Spacer, Text, View};

/// Where a new window appears.
pub const DEFAULT_POSITION: Offset = Offset::new(5, 5);
/// Size of a new window, shadow included.
pub const DEFAULT_SIZE: Size = Size::new(50, 18);

/// A resize is accepted only if the result is wider and taller than this.
const MIN_SIZE: Size = Size::new(15, 5);

const SHADOW: Color = Color::BLACK.with_alpha(127);

type CloseCallback = Box<dyn FnOnce() + Send>;

// ---------------------------------------------------------------------------
// WindowState
// ---------------------------------------------------------------------------

/// Lifecycle of a window's layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowState {
    /// No layer yet.
    #[default]
    Unbound,
    /// The server assigned this layer.
    Bound(LayerId),
    /// The layer was deleted.
    Closed,
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// A top-level window.
///
/// # Examples
///
/// ```ignore
/// let window = Window::new("hello", Text::new("hi")).at(10, 3).set_size(40, 12);
/// let handle = app.open_window(window).await?;
/// ```
pub struct Window {
    title: String,
    position: Offset,
    size: Size,
    state: WindowState,
    body: Option<Box<dyn View>>,
    root: Option<ZStack>,
    on_close: Option<CloseCallback>,
    app: Option<Application>,
    hits: HitIndex,
    pointer: PointerMemo,
    last_move: Offset,
    last_resize: Offset,
    frame: Canvas,
}

impl Window {
    pub fn new(title: impl Into<String>, body: impl IntoView) -> Self {
        Self {
            title: title.into(),
            position: DEFAULT_POSITION,
            size: DEFAULT_SIZE,
            state: WindowState::Unbound,
            body: Some(body.into_view()),
            root: None,
            on_close: None,
            app: None,
            hits: HitIndex::new(),
            pointer: PointerMemo::new(),
            last_move: Offset::ZERO,
            last_resize: Offset::ZERO,
            frame: Canvas::new(0, 0),
        }
    }

    /// Initial position on the server's screen.
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.position = Offset::new(x, y);
        self
    }

    /// Initial size, shadow included. Sizes a resize would reject are
    /// ignored and the previous size is kept.
    pub fn set_size(mut self, width: i32, height: i32) -> Self {
        let size = Size::new(width, height);
        if fits(size) {
            self.size = size;
        } else {
            debug!(width, height, "window size below minimum ignored");
        }
        self
    }

    /// Called once, after the layer has been deleted.
    pub fn on_close(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn position(&self) -> Offset {
        self.position
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn layer_id(&self) -> Option<LayerId> {
        match self.state {
            WindowState::Bound(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state == WindowState::Closed
    }

    /// The canvas sent by the last redraw.
    pub fn frame(&self) -> &Canvas {
        &self.frame
    }

    /// Gestures collected by the last redraw.
    pub fn hit_index(&self) -> &HitIndex {
        &self.hits
    }

    // -----------------------------------------------------------------------
    // lifecycle
    // -----------------------------------------------------------------------

    pub(crate) fn bind_app(&mut self, app: Application) {
        self.app = Some(app);
    }

    /// Ask the server for a layer.
    pub(crate) async fn request_layer_id(&mut self) -> Result<LayerId> {
        let app = self.app()?;
        let request = Request::NewWindow {
            pid: app.pid(),
            x: self.position.x,
            y: self.position.y,
            width: self.size.width,
            height: self.size.height,
        };
        let id = app.send_request(&request).await?;
        self.state = WindowState::Bound(id);
        info!(%id, title = %self.title, "window opened");
        Ok(id)
    }

    /// Compose the chrome around the body and draw the first frame.
    pub(crate) async fn build_content(&mut self) -> Result<()> {
        if self.root.is_none() {
            let body = self.body.take().unwrap_or_else(|| Box::new(Spacer::new()));
            self.root = Some(chrome(&self.title, body));
        }
        self.redraw().await
    }

    /// Render, ship the frame, present it, and refresh the hit index.
    pub(crate) async fn redraw(&mut self) -> Result<()> {
        let id = self.layer()?;
        let Some(root) = self.root.as_mut() else {
            return Ok(());
        };
        root.set_position(Offset::ZERO);
        let canvas = root.render(self.size.width, self.size.height);

        let app = self.app()?;
        app.send_request(&Request::DrawFill {
            id,
            width: self.size.width,
            height: self.size.height,
            canvas: canvas.clone(),
        })
        .await?;
        app.send_request(&Request::Render { id }).await?;

        self.frame = canvas;
        if let Some(root) = self.root.as_mut() {
            self.hits.rebuild(collect_gestures(root));
        }
        trace!(%id, gestures = self.hits.len(), "window redrawn");
        Ok(())
    }

    /// Move by the part of the drag translation `t` not applied yet.
    pub(crate) async fn move_window(&mut self, t: Offset) -> Result<()> {
        let id = self.layer()?;
        let delta = t - self.last_move;
        let app = self.app()?;
        app.send_request(&Request::Move { id, dx: delta.x, dy: delta.y }).await?;
        app.send_request(&Request::Render { id }).await?;
        self.position = self.position + delta;
        self.last_move = t;
        Ok(())
    }

    /// Resize by the part of the drag translation `t` not applied yet,
    /// unless the result would be too small.
    pub(crate) async fn resize_window(&mut self, t: Offset) -> Result<()> {
        let id = self.layer()?;
        let target = self.size.translate(t - self.last_resize);
        self.last_resize = t;
        if fits(target) {
            self.size = target;
            self.app()?
                .send_request(&Request::Resize { id, width: target.width, height: target.height })
                .await?;
        } else {
            debug!(%id, width = target.width, height = target.height, "resize rejected");
        }
        Ok(())
    }

    /// Unregister, delete the layer and run the close callback.
    pub(crate) async fn close(&mut self) -> Result<()> {
        let id = match self.state {
            WindowState::Bound(id) => id,
            WindowState::Closed => return Ok(()),
            WindowState::Unbound => return Err(Error::NotBound),
        };
        let app = self.app()?.clone();
        app.registry().unregister(id);
        let deleted = app.send_request(&Request::Delete { id }).await.map(|_| ());
        self.state = WindowState::Closed;
        if let Some(on_close) = self.on_close.take() {
            on_close();
        }
        info!(%id, title = %self.title, "window closed");
        deleted
    }

    // -----------------------------------------------------------------------
    // events
    // -----------------------------------------------------------------------

    /// Handle one inbound event.
    pub(crate) async fn handle_event(&mut self, payload: EventPayload) -> Result<()> {
        let commands = match payload {
            InputEvent::Mouse(event) => match self.dispatch_pointer(&event) {
                Some(commands) => commands,
                None => return Ok(()),
            },
            InputEvent::Key(key) => {
                let mut ctx = EventContext::new(Region::from_parts(Offset::ZERO, self.size));
                match self.app()?.key_sink() {
                    Some(sink) => sink.handle_key(key, &mut ctx),
                    None => trace!(?key, "no key sink"),
                }
                ctx.take_commands()
            }
        };

        self.apply(commands).await?;
        if self.is_closed() {
            return Ok(());
        }
        self.redraw().await
    }

    /// Feed a pointer event to the gesture it belongs to. `None` if no
    /// gesture matched.
    fn dispatch_pointer(&mut self, event: &MouseEvent) -> Option<Vec<WindowCommand>> {
        let Some(path) = self.pointer.resolve(event, &self.hits) else {
            trace!(?event, "pointer event outside every gesture");
            return None;
        };
        let root = self.root.as_mut()?;
        let gesture = view_at_path(root, path.steps()).and_then(|view| view.gesture_mut())?;
        let mut ctx = EventContext::new(gesture.region());
        gesture.update(event, &mut ctx);
        Some(ctx.take_commands())
    }

    async fn apply(&mut self, commands: Vec<WindowCommand>) -> Result<()> {
        for command in commands {
            trace!(?command, "applying window command");
            match command {
                WindowCommand::Close => return self.close().await,
                WindowCommand::Move(t) => self.move_window(t).await?,
                WindowCommand::MoveEnded => self.last_move = Offset::ZERO,
                WindowCommand::Resize(t) => self.resize_window(t).await?,
                WindowCommand::ResizeEnded => self.last_resize = Offset::ZERO,
                WindowCommand::CaptureKeys(sink) => self.app()?.set_key_sink(sink),
                WindowCommand::ReleaseKeys => self.app()?.clear_key_sink(),
                WindowCommand::Quit => self.app()?.quit(),
            }
        }
        Ok(())
    }

    /// The window's event loop. Ends when the window closes, its inbox is
    /// dropped, or the application shuts down.
    pub(crate) async fn run(mut self, mut inbox: UnboundedReceiver<WindowMessage>, mut shutdown: ShutdownListener) {
        loop {
            let outcome = tokio::select! {
                message = inbox.recv() => match message {
                    Some(WindowMessage::Event(payload)) => self.handle_event(payload).await,
                    Some(WindowMessage::Close) => self.close().await,
                    None => break,
                },
                reason = shutdown.wait() => {
                    debug!(?reason, title = %self.title, "window loop stopping");
                    break;
                }
            };

            if let Err(err) = outcome {
                if err.is_fatal() {
                    error!(%err, title = %self.title, "window lost the connection");
                    if let Ok(app) = self.app() {
                        app.shutdown().trigger(QuitReason::TransportFailed(err.to_string()));
                    }
                    break;
                }
                warn!(%err, title = %self.title, "window request failed");
            }
            if self.is_closed() {
                break;
            }
        }
    }

    fn app(&self) -> Result<&Application> {
        self.app.as_ref().ok_or(Error::NotBound)
    }

    fn layer(&self) -> Result<LayerId> {
        self.layer_id().ok_or(Error::NotBound)
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("title", &self.title)
            .field("position", &self.position)
            .field("size", &self.size)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Whether `size` is wider and taller than the minimum.
fn fits(size: Size) -> bool {
    size.width > MIN_SIZE.width && size.height > MIN_SIZE.height
}

// ---------------------------------------------------------------------------
// Chrome
// ---------------------------------------------------------------------------

/// Shadow layer under the frame layer.
///
/// The frame is a title bar (close, minimize, maximize buttons and a
/// draggable title) over a white content area holding the body and a resize
/// handle in the bottom-right corner. The frame leaves two columns on the
/// right and one row at the bottom for the shadow, which is offset by the
/// same amount.
fn chrome(title: &str, body: Box<dyn View>) -> ZStack {
    let shadow = VStack::new()
        .child(Spacer::new().set_size(-1, 1))
        .child(
            HStack::new()
                .child(Spacer::new().set_size(2, -1))
                .child(Text::new("").set_size(-1, -1).background(SHADOW).foreground(SHADOW)),
        );

    let mover = DragGesture::new()
        .on_changed(|value, ctx| ctx.move_window(value.translation))
        .on_ended(|_, ctx| ctx.move_ended());
    let resizer = DragGesture::new()
        .on_changed(|value, ctx| ctx.resize_window(value.translation))
        .on_ended(|_, ctx| ctx.resize_ended());

    let title_bar = HStack::new()
        .child(Button::new("X", |ctx| ctx.close_window()).foreground(Color::WHITE).background(Color::RED))
        .child(Button::new("-", |_| {}).foreground(Color::GREY).background(Color::YELLOW))
        .child(Button::new("+", |_| {}).foreground(Color::WHITE).background(Color::GREEN))
        .child(
            Text::new(title)
                .foreground(Color::WHITE)
                .background(Color::GREY)
                .align(Align::Center)
                .set_size(-1, -1)
                .with_gesture(mover),
        )
        .set_size(-1, 1);

    let content = ZStack::new()
        .child(Text::new("").background(Color::WHITE).foreground(Color::WHITE).set_size(-1, -1))
        .child(body)
        .child(
            BoxView::new(Text::new("⇲").background(Color::WHITE).foreground(Color::BLACK).with_gesture(resizer))
                .gravity(Align::Right, Align::BOTTOM)
                .set_size(-1, -1),
        );

    let frame = VStack::new().child(title_bar).child(content);
    let real = VStack::new()
        .child(HStack::new().child(frame).child(Spacer::new().set_size(2, -1)))
        .child(Spacer::new().set_size(-1, 1));

    ZStack::new().child(shadow).child(real)
}

// ===========================================================================
// Tests
// ===========================================================================
