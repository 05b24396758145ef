use std::time::Instant;
use tracing::{debug, error, info};

use crate::config::Settings;
use crate::history::{HistoryBackend, HistoryStore, JsonFileBackend, ResultRecord};
use crate::runtime::TypingEvent;
use crate::session::Session;
use crate::word_sampler::{SampleError, WordSampler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Typing,
    Results,
    History,
}

/// What the loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owns the current session and the history log, and routes events between
/// them. Rendering only reads from it.
#[derive(Debug)]
pub struct App<B: HistoryBackend = JsonFileBackend> {
    pub settings: Settings,
    sampler: WordSampler,
    session: Session,
    screen: Screen,
    history: HistoryStore<B>,
    persist_error: Option<String>,
}

impl<B: HistoryBackend> App<B> {
    pub fn new(
        settings: Settings,
        sampler: WordSampler,
        history: HistoryStore<B>,
    ) -> Result<Self, SampleError> {
        let session = Session::new(sampler.sample(settings.word_count)?, settings.duration);
        let screen = if settings.show_history {
            Screen::History
        } else {
            Screen::Typing
        };

        Ok(Self {
            settings,
            sampler,
            session,
            screen,
            history,
            persist_error: None,
        })
    }

    /// Replaces an existing session, e.g. for a fixed passage.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn history(&self) -> &HistoryStore<B> {
        &self.history
    }

    /// The result shown on the results screen, frozen at completion.
    pub fn last_result(&self) -> Option<&ResultRecord> {
        self.session.result()
    }

    /// Message from the last failed history write, if any.
    pub fn persist_error(&self) -> Option<&str> {
        self.persist_error.as_deref()
    }

    pub fn handle(&mut self, event: TypingEvent, now: Instant) -> Flow {
        if event != TypingEvent::Tick {
            debug!(?event, screen = ?self.screen, "event");
        }
        match event {
            TypingEvent::Quit => return Flow::Quit,
            TypingEvent::Restart => self.restart(),
            TypingEvent::Resize => {}
            TypingEvent::Tick => {
                if let Some(record) = self.session.on_tick(now) {
                    self.finish(record);
                }
            }
            TypingEvent::Printable(_) | TypingEvent::EraseLast => match self.screen {
                Screen::Typing => self.type_key(event, now),
                Screen::Results => {
                    if event == TypingEvent::Printable('h') {
                        self.screen = Screen::History;
                    }
                }
                Screen::History => {}
            },
        }
        Flow::Continue
    }

    fn type_key(&mut self, event: TypingEvent, now: Instant) {
        // A key that arrives after the deadline times the session out instead.
        if self.session.is_expired(now) {
            if let Some(record) = self.session.on_tick(now) {
                self.finish(record);
            }
            return;
        }
        if let Some(key) = event.keystroke() {
            if let Some(record) = self.session.on_keystroke(key, now) {
                self.finish(record);
            }
        }
    }

    fn finish(&mut self, record: ResultRecord) {
        info!(wpm = record.wpm, accuracy = record.accuracy, "session completed");
        self.persist_error = match self.history.append(record) {
            Ok(()) => None,
            Err(e) => {
                error!(error = %e, "failed to save result");
                Some(e.to_string())
            }
        };
        self.screen = Screen::Results;
    }

    /// Discards the current session and starts over with a fresh passage.
    pub fn restart(&mut self) {
        match self.sampler.sample(self.settings.word_count) {
            Ok(passage) => {
                self.session = Session::new(passage, self.settings.duration);
                self.screen = Screen::Typing;
                self.persist_error = None;
                info!("session restarted");
            }
            // The sampler was built from a non-empty list and settings were
            // validated, so this only fires if that contract breaks.
            Err(e) => error!(error = %e, "could not sample a new passage"),
        }
    }
}
