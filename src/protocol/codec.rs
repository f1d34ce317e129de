//! Binary codec for requests, replies and length-prefixed frames.
//!
//! Layout on the wire: `[len: u32 LE][payload: len bytes]`. Every payload
//! starts with a tag byte; all integers are little-endian.
//!
//! | tag | message                                              |
//! |-----|------------------------------------------------------|
//! | 1   | NewWindow(u32 pid, i32 x, i32 y, i32 w, i32 h)       |
//! | 2   | Move(u32 id, i32 dx, i32 dy)                         |
//! | 3   | Resize(u32 id, i32 w, i32 h)                         |
//! | 4   | DrawFill(u32 id, i32 w, i32 h, w*h cells by column)  |
//! | 5   | Render(u32 id)                                       |
//! | 6   | Delete(u32 id)                                       |
//! | 16  | Repeat                                               |
//! | 17  | Ack(u32 id)                                          |
//! | 18  | Created(u32 id)                                      |
//! | 19  | Event(u32 id, event)                                 |
//!
//! A cell is `u32 char, 4 x u8 fg, 4 x u8 bg, u8 attrs` (13 bytes). An event
//! is either `0, u8 action, u8 button, i32 x, i32 y, u8 mods` (mouse) or
//! `1, u8 key, u32 arg, u8 mods` (key).
//!
//! Decoding never panics: short or malformed payloads produce a
//! [`DecodeError`].

use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};
use crate::event::{InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseBtn, MouseEvent};
use crate::render::{Attr, Canvas, Cell, Color};

use super::{EventRequest, LayerId, Reply, Request};

/// Largest payload accepted in one frame (16 MiB).
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

const CELL_LEN: usize = 13;

mod tag {
    pub const NEW_WINDOW: u8 = 1;
    pub const MOVE: u8 = 2;
    pub const RESIZE: u8 = 3;
    pub const DRAW_FILL: u8 = 4;
    pub const RENDER: u8 = 5;
    pub const DELETE: u8 = 6;

    pub const REPEAT: u8 = 16;
    pub const ACK: u8 = 17;
    pub const CREATED: u8 = 18;
    pub const EVENT: u8 = 19;

    pub const MOUSE: u8 = 0;
    pub const KEY: u8 = 1;
}

/// Payload-level decode failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The payload ended before a field could be read.
    #[error("payload truncated: needed {needed} more bytes, {remaining} left")]
    Truncated { needed: usize, remaining: usize },

    /// A tag byte has no meaning in this position.
    #[error("unknown {what} tag {tag}")]
    UnknownTag { what: &'static str, tag: u8 },

    /// A cell or key carried a value that is not a Unicode scalar.
    #[error("invalid character code {0:#x}")]
    InvalidChar(u32),

    /// DrawFill dimensions are negative or disagree with the cell count.
    #[error("invalid canvas dimensions {width}x{height}")]
    InvalidSize { width: i32, height: i32 },

    /// Bytes remained after a complete message.
    #[error("{0} trailing bytes after message")]
    TrailingBytes(usize),

    /// The payload was empty.
    #[error("empty payload")]
    Empty,
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode a request payload (without the length prefix).
pub fn encode_request(request: &Request) -> Bytes {
    let mut buf = BytesMut::new();
    match request {
        Request::NewWindow { pid, x, y, width, height } => {
            buf.put_u8(tag::NEW_WINDOW);
            buf.put_u32_le(*pid);
            buf.put_i32_le(*x);
            buf.put_i32_le(*y);
            buf.put_i32_le(*width);
            buf.put_i32_le(*height);
        }
        Request::Move { id, dx, dy } => {
            buf.put_u8(tag::MOVE);
            buf.put_u32_le(id.0);
            buf.put_i32_le(*dx);
            buf.put_i32_le(*dy);
        }
        Request::Resize { id, width, height } => {
            buf.put_u8(tag::RESIZE);
            buf.put_u32_le(id.0);
            buf.put_i32_le(*width);
            buf.put_i32_le(*height);
        }
        Request::DrawFill { id, width, height, canvas } => {
            buf.reserve(13 + canvas.columns().len() * canvas.height().max(0) as usize * CELL_LEN);
            buf.put_u8(tag::DRAW_FILL);
            buf.put_u32_le(id.0);
            buf.put_i32_le(*width);
            buf.put_i32_le(*height);
            for (_, _, cell) in canvas.cells() {
                put_cell(&mut buf, cell);
            }
        }
        Request::Render { id } => {
            buf.put_u8(tag::RENDER);
            buf.put_u32_le(id.0);
        }
        Request::Delete { id } => {
            buf.put_u8(tag::DELETE);
            buf.put_u32_le(id.0);
        }
    }
    buf.freeze()
}

/// Encode a reply payload (without the length prefix).
pub fn encode_reply(reply: &Reply) -> Bytes {
    let mut buf = BytesMut::new();
    match reply {
        Reply::Repeat => buf.put_u8(tag::REPEAT),
        Reply::Ack(id) => {
            buf.put_u8(tag::ACK);
            buf.put_u32_le(id.0);
        }
        Reply::Created(id) => {
            buf.put_u8(tag::CREATED);
            buf.put_u32_le(id.0);
        }
        Reply::Event(event) => {
            buf.put_u8(tag::EVENT);
            buf.put_u32_le(event.target.0);
            put_event(&mut buf, &event.payload);
        }
    }
    buf.freeze()
}

fn put_color(buf: &mut BytesMut, color: Color) {
    buf.put_slice(&[color.r, color.g, color.b, color.a]);
}

fn put_cell(buf: &mut BytesMut, cell: &Cell) {
    buf.put_u32_le(u32::from(cell.ch));
    put_color(buf, cell.fg);
    put_color(buf, cell.bg);
    buf.put_u8(cell.attr.bits());
}

fn put_event(buf: &mut BytesMut, event: &InputEvent) {
    match event {
        InputEvent::Mouse(mouse) => {
            let (action, button) = match mouse.kind {
                MouseAction::Down(btn) => (0, button_code(btn)),
                MouseAction::Drag(btn) => (1, button_code(btn)),
                MouseAction::Release => (2, 0),
                MouseAction::ScrollUp => (3, 0),
                MouseAction::ScrollDown => (4, 0),
                MouseAction::Moved => (5, 0),
            };
            buf.put_u8(tag::MOUSE);
            buf.put_u8(action);
            buf.put_u8(button);
            buf.put_i32_le(mouse.x);
            buf.put_i32_le(mouse.y);
            buf.put_u8(mouse.modifiers.0);
        }
        InputEvent::Key(key) => {
            let (code, arg) = match key.code {
                Key::Char(c) => (0, u32::from(c)),
                Key::Enter => (1, 0),
                Key::Escape => (2, 0),
                Key::Tab => (3, 0),
                Key::BackTab => (4, 0),
                Key::Backspace => (5, 0),
                Key::Delete => (6, 0),
                Key::Left => (7, 0),
                Key::Right => (8, 0),
                Key::Up => (9, 0),
                Key::Down => (10, 0),
                Key::Home => (11, 0),
                Key::End => (12, 0),
                Key::PageUp => (13, 0),
                Key::PageDown => (14, 0),
                Key::F(n) => (15, u32::from(n)),
            };
            buf.put_u8(tag::KEY);
            buf.put_u8(code);
            buf.put_u32_le(arg);
            buf.put_u8(key.modifiers.0);
        }
    }
}

fn button_code(btn: MouseBtn) -> u8 {
    match btn {
        MouseBtn::Left => 0,
        MouseBtn::Right => 1,
        MouseBtn::Middle => 2,
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Bounds-checked little-endian reader over a payload.
struct Cursor<'a> {
    buf: &'a [u8],
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn need(&self, n: usize) -> std::result::Result<(), DecodeError> {
        if self.buf.remaining() < n {
            return Err(DecodeError::Truncated { needed: n, remaining: self.buf.remaining() });
        }
        Ok(())
    }

    fn u8(&mut self) -> std::result::Result<u8, DecodeError> {
        self.need(1)?;
        Ok(self.buf.get_u8())
    }

    fn u32(&mut self) -> std::result::Result<u32, DecodeError> {
        self.need(4)?;
        Ok(self.buf.get_u32_le())
    }

    fn i32(&mut self) -> std::result::Result<i32, DecodeError> {
        self.need(4)?;
        Ok(self.buf.get_i32_le())
    }

    fn color(&mut self) -> std::result::Result<Color, DecodeError> {
        self.need(4)?;
        Ok(Color::rgba(self.buf.get_u8(), self.buf.get_u8(), self.buf.get_u8(), self.buf.get_u8()))
    }

    fn char(&mut self) -> std::result::Result<char, DecodeError> {
        let code = self.u32()?;
        char::from_u32(code).ok_or(DecodeError::InvalidChar(code))
    }

    fn layer(&mut self) -> std::result::Result<LayerId, DecodeError> {
        self.u32().map(LayerId)
    }

    fn cell(&mut self) -> std::result::Result<Cell, DecodeError> {
        let ch = self.char()?;
        let fg = self.color()?;
        let bg = self.color()?;
        let attr = Attr::from_bits_truncate(self.u8()?);
        Ok(Cell::new(ch, fg, bg, attr))
    }

    fn finish<T>(self, value: T) -> std::result::Result<T, DecodeError> {
        match self.buf.remaining() {
            0 => Ok(value),
            n => Err(DecodeError::TrailingBytes(n)),
        }
    }
}

/// Decode a request payload.
pub fn decode_request(payload: &[u8]) -> std::result::Result<Request, DecodeError> {
    let mut cur = Cursor::new(payload);
    let tag = cur.u8().map_err(|_| DecodeError::Empty)?;
    let request = match tag {
        tag::NEW_WINDOW => Request::NewWindow {
            pid: cur.u32()?,
            x: cur.i32()?,
            y: cur.i32()?,
            width: cur.i32()?,
            height: cur.i32()?,
        },
        tag::MOVE => Request::Move { id: cur.layer()?, dx: cur.i32()?, dy: cur.i32()? },
        tag::RESIZE => Request::Resize { id: cur.layer()?, width: cur.i32()?, height: cur.i32()? },
        tag::DRAW_FILL => {
            let id = cur.layer()?;
            let width = cur.i32()?;
            let height = cur.i32()?;
            let canvas = decode_canvas(&mut cur, width, height)?;
            Request::DrawFill { id, width, height, canvas }
        }
        tag::RENDER => Request::Render { id: cur.layer()? },
        tag::DELETE => Request::Delete { id: cur.layer()? },
        other => return Err(DecodeError::UnknownTag { what: "request", tag: other }),
    };
    cur.finish(request)
}

fn decode_canvas(cur: &mut Cursor<'_>, width: i32, height: i32) -> std::result::Result<Canvas, DecodeError> {
    let invalid = DecodeError::InvalidSize { width, height };
    let (w, h) = match (usize::try_from(width), usize::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(invalid),
    };
    let cells = w.checked_mul(h).ok_or_else(|| invalid.clone())?;
    let bytes = cells.checked_mul(CELL_LEN).ok_or_else(|| invalid.clone())?;
    cur.need(bytes)?;

    let mut columns = Vec::with_capacity(w);
    for _ in 0..w {
        let mut column = Vec::with_capacity(h);
        for _ in 0..h {
            column.push(cur.cell()?);
        }
        columns.push(column);
    }
    if w == 0 {
        return Ok(Canvas::new(0, height));
    }
    Canvas::from_columns(columns).ok_or(invalid)
}

/// Decode a reply payload.
pub fn decode_reply(payload: &[u8]) -> std::result::Result<Reply, DecodeError> {
    let mut cur = Cursor::new(payload);
    let tag = cur.u8().map_err(|_| DecodeError::Empty)?;
    let reply = match tag {
        tag::REPEAT => Reply::Repeat,
        tag::ACK => Reply::Ack(cur.layer()?),
        tag::CREATED => Reply::Created(cur.layer()?),
        tag::EVENT => {
            let target = cur.layer()?;
            let payload = decode_event(&mut cur)?;
            Reply::Event(EventRequest { target, payload })
        }
        other => return Err(DecodeError::UnknownTag { what: "reply", tag: other }),
    };
    cur.finish(reply)
}

fn decode_event(cur: &mut Cursor<'_>) -> std::result::Result<InputEvent, DecodeError> {
    match cur.u8()? {
        tag::MOUSE => {
            let action = cur.u8()?;
            let button = match cur.u8()? {
                0 => MouseBtn::Left,
                1 => MouseBtn::Right,
                2 => MouseBtn::Middle,
                other => return Err(DecodeError::UnknownTag { what: "mouse button", tag: other }),
            };
            let kind = match action {
                0 => MouseAction::Down(button),
                1 => MouseAction::Drag(button),
                2 => MouseAction::Release,
                3 => MouseAction::ScrollUp,
                4 => MouseAction::ScrollDown,
                5 => MouseAction::Moved,
                other => return Err(DecodeError::UnknownTag { what: "mouse action", tag: other }),
            };
            let x = cur.i32()?;
            let y = cur.i32()?;
            let modifiers = Modifiers(cur.u8()?);
            Ok(InputEvent::Mouse(MouseEvent { kind, x, y, modifiers }))
        }
        tag::KEY => {
            let code = cur.u8()?;
            let arg = cur.u32()?;
            let key = match code {
                0 => Key::Char(char::from_u32(arg).ok_or(DecodeError::InvalidChar(arg))?),
                1 => Key::Enter,
                2 => Key::Escape,
                3 => Key::Tab,
                4 => Key::BackTab,
                5 => Key::Backspace,
                6 => Key::Delete,
                7 => Key::Left,
                8 => Key::Right,
                9 => Key::Up,
                10 => Key::Down,
                11 => Key::Home,
                12 => Key::End,
                13 => Key::PageUp,
                14 => Key::PageDown,
                15 => Key::F(u8::try_from(arg).map_err(|_| DecodeError::InvalidChar(arg))?),
                other => return Err(DecodeError::UnknownTag { what: "key", tag: other }),
            };
            let modifiers = Modifiers(cur.u8()?);
            Ok(InputEvent::Key(KeyEvent::new(key, modifiers)))
        }
        other => Err(DecodeError::UnknownTag { what: "event", tag: other }),
    }
}

// ---------------------------------------------------------------------------
// Framing
// ---------------------------------------------------------------------------

/// Write one length-prefixed frame with a single `write_all`.
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    if payload.len() > MAX_FRAME_LEN {
        return Err(Error::PayloadTooLarge { len: payload.len() });
    }
    let mut frame = BytesMut::with_capacity(4 + payload.len());
    frame.put_u32_le(payload.len() as u32);
    frame.put_slice(payload);
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one length-prefixed frame.
///
/// Returns `Ok(None)` on a clean end-of-stream at a frame boundary. An
/// end-of-stream inside a frame is an I/O error.
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<Bytes>>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut header = [0u8; 4];
    let mut filled = 0;
    while filled < header.len() {
        let n = reader.read(&mut header[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
        }
        filled += n;
    }

    let len = u32::from_le_bytes(header) as usize;
    if len > MAX_FRAME_LEN {
        return Err(Error::FrameTooLarge { len });
    }
    let mut payload = BytesMut::zeroed(len);
    reader.read_exact(&mut payload).await?;
    Ok(Some(payload.freeze()))
}

/// Length-prefix a payload. Used by test servers that script raw bytes.
pub fn frame_bytes(payload: &[u8]) -> Bytes {
    let mut frame = BytesMut::with_capacity(4 + payload.len());
    frame.put_u32_le(payload.len() as u32);
    frame.put_slice(payload);
    frame.freeze()
}

// ===========================================================================
// Tests
// ===========================================================================
