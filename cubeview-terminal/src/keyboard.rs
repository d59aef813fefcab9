/// Translation of terminal key events into viewer input
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};
use cubeview_core::{InputEvent, Key};
use std::collections::HashSet;

/// Map a crossterm key code to a viewer key.
pub fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Key::W,
            'a' => Key::A,
            's' => Key::S,
            'd' => Key::D,
            ' ' => Key::Space,
            _ => return None,
        },
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Esc => Key::Escape,
        KeyCode::Modifier(ModifierKeyCode::LeftShift) => Key::LeftShift,
        _ => return None,
    };
    Some(key)
}

/// Held-key state rebuilt from terminal key events.
///
/// Terminals that report release events keep a key held from press to
/// release. Others only report presses (and auto-repeats), so a key counts
/// as held for the frame in which its press arrived.
#[derive(Debug, Default)]
pub struct KeyTracker {
    reports_releases: bool,
    held: HashSet<Key>,
    this_frame: HashSet<Key>,
}

impl KeyTracker {
    pub fn new(reports_releases: bool) -> Self {
        Self {
            reports_releases,
            ..Default::default()
        }
    }

    /// Forget presses seen during the previous frame.
    pub fn begin_frame(&mut self) {
        self.this_frame.clear();
    }

    /// Drop every held key. Releases that happen while the terminal is not
    /// focused are never reported.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.this_frame.clear();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key) || self.this_frame.contains(&key)
    }

    /// Update held state and return the discrete event this key event maps to.
    pub fn handle(&mut self, event: KeyEvent) -> Option<InputEvent> {
        // Raw mode swallows SIGINT, Ctrl+C takes its place as the close request
        if event.kind != KeyEventKind::Release
            && event.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(event.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            return Some(InputEvent::Quit);
        }

        if !self.reports_releases && event.modifiers.contains(KeyModifiers::SHIFT) {
            self.this_frame.insert(Key::LeftShift);
        }

        let key = map_key(event.code)?;
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if self.reports_releases {
                    self.held.insert(key);
                    None
                } else {
                    self.this_frame.insert(key);
                    // The release never arrives, the press stands in for it
                    (key == Key::Escape).then_some(InputEvent::KeyUp(key))
                }
            }
            KeyEventKind::Release => {
                self.held.remove(&key);
                Some(InputEvent::KeyUp(key))
            }
        }
    }
}
