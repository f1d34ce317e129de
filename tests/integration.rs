//! Integration tests for fws-ui.
//!
//! These tests exercise the public API from outside the crate: layout and
//! rendering of view trees, and whole applications talking to the in-memory
//! window server.

use std::time::Duration;

use fws_ui::event::{Key, KeyEvent, Modifiers, MouseAction, MouseBtn, MouseEvent};
use fws_ui::geometry::Region;
use fws_ui::layout::collect_gestures;
use fws_ui::protocol::{LayerId, Request};
use fws_ui::testing::{render_to_string, FakeServer};
use fws_ui::{AppConfig, Application, Button, HStack, QuitReason, Spacer, Text, TextField, VStack, View, Window};
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

const WAIT: Duration = Duration::from_secs(2);

async fn connect(server_stream: tokio::io::DuplexStream) -> Application {
    Application::with_stream(server_stream, AppConfig::new().with_poll_interval(Duration::from_millis(20)))
        .await
        .unwrap()
}

fn click(x: i32, y: i32) -> [MouseEvent; 2] {
    [
        MouseEvent::new(MouseAction::Down(MouseBtn::Left), x, y),
        MouseEvent::new(MouseAction::Release, x, y),
    ]
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[test]
fn test_button_and_title_share_a_row() {
    let mut bar = HStack::new().child(Button::new("X", |_| {})).child(Text::new("title").set_size(-1, -1));
    let output = render_to_string(&mut bar, 50, 1);
    assert!(output.starts_with(" X "));
    assert!(output.contains("title"));

    let regions: Vec<Region> = collect_gestures(&mut bar).iter().map(|d| d.region).collect();
    assert_eq!(regions, vec![Region::new(0, 0, 3, 1)]);
}

#[test]
fn test_floating_children_split_remaining_space() {
    let mut stack = VStack::new()
        .child(Text::new("top"))
        .child(Spacer::new())
        .child(Text::new("bottom").set_size(-1, -1));
    let output = render_to_string(&mut stack, 10, 5);
    let rows: Vec<&str> = output.split('\n').collect();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0].trim(), "top");
    // The spacer and the text split four rows; text draws on its lower row.
    assert_eq!(rows[4], "bottom");
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_request_is_resent_until_acknowledged() {
    let (server, stream) = FakeServer::start();
    let app = connect(stream).await;
    server.repeat_next(2);

    let request = Request::Render { id: LayerId(9) };
    assert_eq!(app.send_request(&request).await.unwrap(), LayerId(9));
    assert_eq!(server.requests(), vec![request.clone(), request.clone(), request]);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let (server, stream) = FakeServer::start();
    let app = Application::with_stream(stream, AppConfig::new().with_max_attempts(3)).await.unwrap();
    server.repeat_next(10);

    let err = app.send_request(&Request::Render { id: LayerId(1) }).await.unwrap_err();
    assert!(matches!(err, fws_ui::Error::Timeout { attempts: 3 }));
    assert_eq!(server.requests().len(), 3);
}

// ---------------------------------------------------------------------------
// Windows
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_open_window_draws_first_frame() {
    let (server, stream) = FakeServer::start();
    let app = connect(stream).await;
    let handle = app.open_window(Window::new("hello", Text::new("hi")).at(2, 3)).await.unwrap();

    let requests = server.requests();
    assert_eq!(
        requests[0],
        Request::NewWindow { pid: std::process::id(), x: 2, y: 3, width: 50, height: 18 }
    );
    match &requests[1] {
        Request::DrawFill { id, width, height, canvas } => {
            assert_eq!((*id, *width, *height), (handle.layer_id(), 50, 18));
            assert!(canvas.row_text(0).contains("hello"));
        }
        other => panic!("expected draw-fill, got {other:?}"),
    }
    assert_eq!(requests[2], Request::Render { id: handle.layer_id() });
}

#[tokio::test]
async fn test_clicking_close_deletes_the_layer() {
    let (server, stream) = FakeServer::start();
    let app = connect(stream).await;
    let handle = app.open_window(Window::new("bye", Spacer::new())).await.unwrap();
    let id = handle.layer_id();

    for event in click(1, 0) {
        server.inject(id, event);
    }

    assert!(server.wait_for(WAIT, |requests| requests.contains(&Request::Delete { id })).await);
    assert!(!handle.is_open());
    assert!(app.registry().is_empty());
}

#[tokio::test]
async fn test_window_handle_close() {
    let (server, stream) = FakeServer::start();
    let app = connect(stream).await;
    let handle = app.open_window(Window::new("bye", Spacer::new())).await.unwrap();
    let id = handle.layer_id();

    assert!(handle.close());
    assert!(server.wait_for(WAIT, |requests| requests.contains(&Request::Delete { id })).await);
    assert!(!handle.close());
}

#[tokio::test]
async fn test_title_drag_moves_window() {
    let (server, stream) = FakeServer::start();
    let app = connect(stream).await;
    let handle = app.open_window(Window::new("drag me", Spacer::new())).await.unwrap();
    let id = handle.layer_id();

    server.inject(id, MouseEvent::new(MouseAction::Down(MouseBtn::Left), 20, 0));
    server.inject(id, MouseEvent::new(MouseAction::Drag(MouseBtn::Left), 23, 1));
    server.inject(id, MouseEvent::new(MouseAction::Release, 23, 1));

    let moved = Request::Move { id, dx: 3, dy: 1 };
    assert!(server.wait_for(WAIT, |requests| requests.contains(&moved)).await);
}

#[tokio::test]
async fn test_text_field_typing_flow() {
    let (server, stream) = FakeServer::start();
    let app = connect(stream).await;

    let (done_tx, mut done) = mpsc::unbounded_channel();
    let field = TextField::new("name").on_finish(move |value, _| {
        let _ = done_tx.send(value.to_owned());
    });
    let value = field.handle();
    let handle = app.open_window(Window::new("form", field)).await.unwrap();
    let id = handle.layer_id();

    // The field spans the content area and sits on its middle row.
    for event in click(3, 8) {
        server.inject(id, event);
    }
    for ch in ['h', 'i', 'x'] {
        server.inject(id, KeyEvent::plain(Key::Char(ch)));
    }
    server.inject(id, KeyEvent::plain(Key::Backspace));
    server.inject(id, KeyEvent::new(Key::Enter, Modifiers::NONE));

    let finished = tokio::time::timeout(WAIT, done.recv()).await.unwrap();
    assert_eq!(finished.as_deref(), Some("hi"));
    assert_eq!(value.value(), "hi");
    assert!(!value.is_active());
}

// ---------------------------------------------------------------------------
// Shutdown
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_server_hangup_ends_the_application() {
    let (server, stream) = FakeServer::start();
    let app = connect(stream).await;
    app.open_window(Window::new("t", Text::new("hi"))).await.unwrap();

    server.hang_up();
    let reason = tokio::time::timeout(WAIT, app.run()).await.unwrap().unwrap();
    assert_eq!(reason, QuitReason::EndOfStream);
    assert!(!app.is_running());
}

#[tokio::test]
async fn test_quit_from_a_button() {
    let (server, stream) = FakeServer::start();
    let app = connect(stream).await;
    let body = Button::new("Quit", |ctx| ctx.quit()).set_size(48, 16);
    let handle = app.open_window(Window::new("t", body)).await.unwrap();

    for event in click(10, 5) {
        server.inject(handle.layer_id(), event);
    }
    let reason = tokio::time::timeout(WAIT, app.run()).await.unwrap().unwrap();
    assert_eq!(reason, QuitReason::Requested);
}

#[test]
fn test_views_are_object_safe() {
    let views: Vec<Box<dyn View>> = vec![Box::new(Text::new("a")), Box::new(Spacer::new())];
    assert_eq!(views.len(), 2);
}
