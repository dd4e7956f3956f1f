//! Terminal backend
//!
//! Raw mode + alternate screen, half-block pixels for drawing, modal boxes
//! for dialogs. Key releases are only reported by terminals that support
//! the keyboard enhancement protocol; elsewhere a held direction key is
//! considered released once its auto-repeat stops arriving.

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{cursor, execute, terminal};
use glam::Vec2;

use super::{Color, Dialogs, InputEvent, InputSource, Key, Rect, Renderer};
use crate::renderer::PixelCanvas;

/// Without release events: wait this long for the first auto-repeat
const FIRST_REPEAT_TIMEOUT: Duration = Duration::from_millis(550);
/// Without release events: gap between repeats that counts as a release
const REPEAT_TIMEOUT: Duration = Duration::from_millis(120);

const MAX_NAME_LEN: usize = 24;
const DIALOG_MIN_WIDTH: usize = 30;

/// A direction key we have only seen presses for
#[derive(Debug, Clone, Copy)]
struct Held {
    key: Key,
    last: Instant,
    repeating: bool,
}

pub struct Terminal {
    out: Stdout,
    canvas: PixelCanvas,
    /// Terminal reports key releases
    enhanced: bool,
    held: Vec<Held>,
    restored: bool,
}

impl Terminal {
    /// Take over the terminal to show an arena of the given size
    pub fn new(arena_width: f32, arena_height: f32) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let (cols, rows) = terminal::size().unwrap_or((80, 24));
        let mut term = Self {
            out: io::stdout(),
            canvas: PixelCanvas::new(
                cols as usize,
                rows as usize,
                Vec2::new(arena_width, arena_height),
            ),
            enhanced: false,
            held: Vec::new(),
            restored: false,
        };
        // From here on Drop puts the terminal back, even if setup fails
        execute!(
            term.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        )?;
        if matches!(terminal::supports_keyboard_enhancement(), Ok(true)) {
            execute!(
                term.out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            term.enhanced = true;
        }
        log::info!(
            "Terminal {cols}x{rows}, key release events: {}",
            if term.enhanced { "yes" } else { "no" }
        );
        Ok(term)
    }

    /// Give the terminal back to the shell
    pub fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        if self.enhanced {
            execute!(self.out, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    }

    fn key_event(&mut self, key: KeyEvent, events: &mut Vec<InputEvent>) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            events.push(InputEvent::Close);
            return;
        }
        let Some(mapped) = map_key(key.code) else {
            return;
        };
        let steering = matches!(mapped, Key::Left | Key::Right);

        match key.kind {
            KeyEventKind::Release => {
                if steering {
                    events.push(InputEvent::KeyUp(mapped));
                }
            }
            // Holding launch or help must not fire them again
            KeyEventKind::Repeat if !steering => {}
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if steering && !self.enhanced {
                    self.hold(mapped);
                }
                events.push(InputEvent::KeyDown(mapped));
            }
        }
    }

    fn hold(&mut self, key: Key) {
        let now = Instant::now();
        match self.held.iter_mut().find(|h| h.key == key) {
            Some(h) => {
                h.last = now;
                h.repeating = true;
            }
            None => self.held.push(Held {
                key,
                last: now,
                repeating: false,
            }),
        }
    }

    /// Synthesize releases for keys whose repeats stopped
    fn expire_held(&mut self, events: &mut Vec<InputEvent>) {
        let now = Instant::now();
        self.held.retain(|h| {
            let timeout = if h.repeating {
                REPEAT_TIMEOUT
            } else {
                FIRST_REPEAT_TIMEOUT
            };
            let expired = now.duration_since(h.last) > timeout;
            if expired {
                events.push(InputEvent::KeyUp(h.key));
            }
            !expired
        });
    }

    /// Draw a centered box with a title and lines of text, then show it
    fn draw_dialog(&mut self, title: &str, lines: &[String]) -> io::Result<()> {
        let (cols, rows) = self.canvas.cell_size();
        let text_width = lines
            .iter()
            .map(|l| l.chars().count())
            .chain(std::iter::once(title.chars().count()))
            .max()
            .unwrap_or(0);
        let width = (text_width + 4).max(DIALOG_MIN_WIDTH).min(cols);
        let height = (lines.len() + 4).min(rows);
        let col = (cols - width) / 2;
        let row = (rows - height) / 2;

        let area = self.canvas.cell_rect(col, row, width, height);
        self.canvas.fill_rect(area, Color::BLACK);
        self.canvas.stroke_rect(area, Color::WHITE, 1.0);

        let inner = width.saturating_sub(4);
        self.canvas
            .put_text(col + 2, row, &format!(" {title} "), Color::WHITE);
        for (i, line) in lines.iter().enumerate() {
            // Pad so leftovers from the previous draw get overwritten
            let padded: String = format!("{line:<inner$}").chars().take(inner).collect();
            self.canvas.put_text(col + 2, row + 2 + i, &padded, Color::WHITE);
        }
        self.canvas.render(&mut self.out)
    }

    /// Wait for the next key press, handling resizes along the way
    fn next_press(&mut self) -> io::Result<KeyEvent> {
        loop {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(key),
                Event::Resize(c, r) => self.canvas.resize(c as usize, r as usize),
                _ => {}
            }
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Key bindings
pub fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Key::Left,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Key::Right,
        KeyCode::Up | KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('w') | KeyCode::Char('W') => {
            Key::Launch
        }
        KeyCode::Char('h') | KeyCode::Char('H') => Key::ShowScores,
        KeyCode::F(1) => Key::Help,
        KeyCode::F(2) => Key::NewRound,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Key::Quit,
        _ => return None,
    };
    Some(key)
}

impl InputSource for Terminal {
    fn poll(&mut self) -> io::Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => self.key_event(key, &mut events),
                Event::Resize(c, r) => self.canvas.resize(c as usize, r as usize),
                _ => {}
            }
        }
        if !self.enhanced {
            self.expire_held(&mut events);
        }
        Ok(events)
    }
}

impl Renderer for Terminal {
    fn clear(&mut self, color: Color) {
        self.canvas.clear(color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.canvas.fill_circle(center, radius, color);
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, thickness: f32) {
        self.canvas.stroke_circle(center, radius, color, thickness);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.canvas.fill_rect(rect, color);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, thickness: f32) {
        self.canvas.stroke_rect(rect, color, thickness);
    }

    fn draw_text(&mut self, text: &str, color: Color, pos: Vec2) {
        self.canvas.draw_text(text, color, pos);
    }

    fn present(&mut self) -> io::Result<()> {
        self.canvas.render(&mut self.out)
    }
}

impl Dialogs for Terminal {
    fn prompt(&mut self, title: &str, prompt: &str) -> io::Result<Option<String>> {
        self.held.clear();
        let mut input = String::new();
        loop {
            let lines = [prompt.to_string(), format!("> {input}_")];
            self.draw_dialog(title, &lines)?;

            let key = self.next_press()?;
            match key.code {
                KeyCode::Enter => return Ok(Some(input)),
                KeyCode::Esc => return Ok(None),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(None);
                }
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(ch) if input.chars().count() < MAX_NAME_LEN => input.push(ch),
                _ => {}
            }
        }
    }

    fn message(&mut self, title: &str, body: &str) -> io::Result<()> {
        self.held.clear();
        let mut lines: Vec<String> = body.lines().map(|l| l.replace('\t', "    ")).collect();
        lines.push(String::new());
        lines.push("[press enter]".to_string());
        loop {
            self.draw_dialog(title, &lines)?;
            let key = self.next_press()?;
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(map_key(KeyCode::Char('a')), Some(Key::Left));
        assert_eq!(map_key(KeyCode::Right), Some(Key::Right));
        assert_eq!(map_key(KeyCode::Char(' ')), Some(Key::Launch));
        assert_eq!(map_key(KeyCode::Enter), Some(Key::Launch));
        assert_eq!(map_key(KeyCode::Char('w')), Some(Key::Launch));
        assert_eq!(map_key(KeyCode::F(1)), Some(Key::Help));
        assert_eq!(map_key(KeyCode::F(2)), Some(Key::NewRound));
        assert_eq!(map_key(KeyCode::Char('h')), Some(Key::ShowScores));
        assert_eq!(map_key(KeyCode::Char('q')), Some(Key::Quit));
        assert_eq!(map_key(KeyCode::Char('x')), None);
    }
}
