use std::io;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::trace;

use crate::session::{is_printable, Keystroke};

/// Target responsiveness for the timer and redraws.
pub const TICK_RATE_MS: u64 = 100;

/// Everything the app loop reacts to, already decoded from raw terminal input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypingEvent {
    Printable(char),
    EraseLast,
    Restart,
    Quit,
    Resize,
    Tick,
}

impl TypingEvent {
    /// The part of the event the session state machine consumes.
    pub fn keystroke(self) -> Option<Keystroke> {
        match self {
            TypingEvent::Printable(c) => Some(Keystroke::Printable(c)),
            TypingEvent::EraseLast => Some(Keystroke::EraseLast),
            TypingEvent::Restart | TypingEvent::Quit | TypingEvent::Resize | TypingEvent::Tick => {
                None
            }
        }
    }
}

/// Decodes a key press. Keys with no meaning in the app map to `None`.
pub fn translate_key(key: KeyEvent) -> Option<TypingEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(TypingEvent::Quit)
        }
        KeyCode::Char(_) if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            None
        }
        KeyCode::Char(c) if is_printable(c) => Some(TypingEvent::Printable(c)),
        KeyCode::Backspace => Some(TypingEvent::EraseLast),
        KeyCode::Esc => Some(TypingEvent::Restart),
        _ => None,
    }
}

/// Source of decoded terminal events.
pub trait TypingEventSource {
    /// Wait up to `timeout` for an event. `Ok(None)` means the wait expired.
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<TypingEvent>>;
}

/// Production event source: polls crossterm on the calling thread.
#[derive(Debug, Default)]
pub struct CrosstermEventSource;

impl CrosstermEventSource {
    pub fn new() -> Self {
        Self
    }
}

impl TypingEventSource for CrosstermEventSource {
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<TypingEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        let decoded = match event::read()? {
            CtEvent::Key(key) => translate_key(key),
            CtEvent::Resize(_, _) => Some(TypingEvent::Resize),
            _ => None,
        };
        if decoded.is_none() {
            trace!("ignored terminal event");
        }
        // An ignored event still ends the wait; the caller treats it as a tick.
        Ok(Some(decoded.unwrap_or(TypingEvent::Tick)))
    }
}

/// Configurable ticker interface
pub trait Ticker {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Event source fed from a channel, for headless tests.
pub struct TestEventSource {
    rx: Receiver<TypingEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<TypingEvent>) -> Self {
        Self { rx }
    }
}

impl TypingEventSource for TestEventSource {
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<TypingEvent>> {
        match self.rx.recv_timeout(timeout) {
            Ok(ev) => Ok(Some(ev)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => Ok(None),
        }
    }
}

/// Advances the application one event or tick at a time.
pub struct Runner<E: TypingEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: TypingEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to one tick interval; returns the next event, or `Tick`.
    pub fn step(&mut self) -> io::Result<TypingEvent> {
        Ok(self
            .event_source
            .poll_event(self.ticker.interval())?
            .unwrap_or(TypingEvent::Tick))
    }
}
