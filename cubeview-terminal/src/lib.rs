/// Terminal backend for the cubeview wireframe viewer
use crossterm::{
    cursor,
    event::{
        self, DisableFocusChange, EnableFocusChange, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::ResetColor,
    terminal::{self, ClearType},
};
use cubeview_core::{Canvas, InputEvent, InputSource, Key, Rgba, ScreenPoint, Viewer, ViewerConfig};
use log::{debug, info, warn};
use std::io::{self, stdout, Stdout, Write};
use std::time::Duration;

pub mod error;
pub mod keyboard;
pub mod renderer;

pub use error::ViewerError;
pub use keyboard::KeyTracker;
pub use renderer::CellCanvas;

/// The terminal acting as the viewer's window: drawing surface, keyboard
/// and frame pacing.
pub struct TerminalBackend<W: Write = Stdout> {
    canvas: CellCanvas,
    keys: KeyTracker,
    enhanced_keyboard: bool,
    out: W,
}

impl TerminalBackend {
    /// Take over the terminal: raw mode, alternate screen, hidden cursor,
    /// window title, focus reporting and, where supported, key release
    /// reporting.
    pub fn init(config: &ViewerConfig) -> Result<Self, ViewerError> {
        terminal::enable_raw_mode().map_err(ViewerError::Init)?;

        let enhanced_keyboard = terminal::supports_keyboard_enhancement().unwrap_or(false);
        debug!("keyboard enhancement supported: {}", enhanced_keyboard);

        Self::open(stdout(), config, enhanced_keyboard, terminal::size).map_err(|err| {
            let _ = terminal::disable_raw_mode();
            ViewerError::Window(err)
        })
    }
}

impl<W: Write> TerminalBackend<W> {
    /// Set up the screen on `out` and size the canvas. A failure part way
    /// through puts the screen back before returning the error.
    fn open(
        mut out: W,
        config: &ViewerConfig,
        enhanced_keyboard: bool,
        size: impl FnOnce() -> io::Result<(u16, u16)>,
    ) -> io::Result<Self> {
        let (cols, rows) = match enter_screen(&mut out, config.title, enhanced_keyboard)
            .and_then(|()| size())
        {
            Ok(size) => size,
            Err(err) => {
                let _ = restore_screen(&mut out, enhanced_keyboard);
                return Err(err);
            }
        };

        info!(
            "opened {}x{} surface in a {}x{} terminal",
            config.width, config.height, cols, rows
        );

        Ok(Self {
            canvas: CellCanvas::new(config.width, config.height, cols, rows),
            keys: KeyTracker::new(enhanced_keyboard),
            enhanced_keyboard,
            out,
        })
    }

    /// Hand the terminal back in the state it was found.
    ///
    /// Every step is attempted even after one fails, raw mode last. The
    /// first failure is returned.
    pub fn shutdown(mut self) -> Result<(), ViewerError> {
        let screen = restore_screen(&mut self.out, self.enhanced_keyboard);
        let raw = terminal::disable_raw_mode();
        screen.and(raw).map_err(ViewerError::from)
    }

    fn handle_event(&mut self, event: Event, events: &mut Vec<InputEvent>) -> io::Result<()> {
        match event {
            Event::Key(key_event) => events.extend(self.keys.handle(key_event)),
            Event::Resize(cols, rows) => {
                debug!("terminal resized to {}x{}", cols, rows);
                self.canvas.resize(cols, rows);
                queue!(self.out, terminal::Clear(ClearType::All))?;
            }
            Event::FocusLost => {
                debug!("focus lost, releasing held keys");
                self.keys.release_all();
            }
            _ => {}
        }
        Ok(())
    }
}

fn enter_screen<W: Write>(out: &mut W, title: &str, enhanced_keyboard: bool) -> io::Result<()> {
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::SetTitle(title),
        EnableFocusChange,
        terminal::Clear(ClearType::All)
    )?;
    if enhanced_keyboard {
        execute!(
            out,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
            )
        )?;
    }
    Ok(())
}

/// Undo `enter_screen`, attempting every step. Returns the first failure.
fn restore_screen<W: Write>(out: &mut W, enhanced_keyboard: bool) -> io::Result<()> {
    let mut steps = Vec::with_capacity(5);
    if enhanced_keyboard {
        steps.push(execute!(out, PopKeyboardEnhancementFlags));
    }
    steps.push(execute!(out, DisableFocusChange));
    steps.push(execute!(out, ResetColor));
    steps.push(execute!(out, terminal::LeaveAlternateScreen));
    steps.push(execute!(out, cursor::Show));
    steps.into_iter().collect()
}

impl<W: Write> InputSource for TerminalBackend<W> {
    fn poll_events(&mut self) -> io::Result<Vec<InputEvent>> {
        self.keys.begin_frame();

        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            let event = event::read()?;
            self.handle_event(event, &mut events)?;
        }
        Ok(events)
    }

    fn is_held(&self, key: Key) -> bool {
        self.keys.is_held(key)
    }

    fn delay(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<W: Write> Canvas for TerminalBackend<W> {
    fn clear(&mut self, color: Rgba) {
        self.canvas.clear(color);
    }

    fn set_draw_color(&mut self, color: Rgba) {
        self.canvas.set_draw_color(color);
    }

    fn draw_points(&mut self, points: &[ScreenPoint]) {
        self.canvas.draw_points(points);
    }

    fn draw_lines(&mut self, points: &[ScreenPoint]) {
        self.canvas.draw_lines(points);
    }

    fn fill_triangle(&mut self, a: ScreenPoint, b: ScreenPoint, c: ScreenPoint, color: Rgba) {
        self.canvas.fill_triangle(a, b, c, color);
    }

    fn present(&mut self) -> io::Result<()> {
        self.canvas.draw(&mut self.out)?;
        self.out.flush()
    }
}

/// Run a viewer in the terminal until it quits.
///
/// The terminal is restored even when the frame loop fails. Returns the
/// number of frames rendered.
pub fn run(viewer: &mut Viewer) -> Result<u64, ViewerError> {
    let mut backend = TerminalBackend::init(viewer.config())?;

    let outcome = viewer.run(&mut backend);
    let restored = backend.shutdown();

    finish(outcome, restored)
}

/// Combine the frame loop result with the restore result. A loop failure
/// takes precedence; a restore failure behind it is only logged.
fn finish<T>(outcome: io::Result<T>, restored: Result<(), ViewerError>) -> Result<T, ViewerError> {
    match (outcome, restored) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(err)) => Err(err),
        (Err(err), restored) => {
            if let Err(restore_err) = restored {
                warn!("terminal not fully restored: {}", restore_err);
            }
            Err(ViewerError::Io(err))
        }
    }
}
