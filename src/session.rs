use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::history::ResultRecord;
use crate::metrics;
use crate::word_sampler::Passage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Lifecycle {
    NotStarted,
    Running,
    Completed,
}

/// What the session itself reacts to. Restart and quit belong to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    Printable(char),
    EraseLast,
}

/// Whether `c` is in the accepted input alphabet (printable ASCII).
pub fn is_printable(c: char) -> bool {
    (' '..='~').contains(&c)
}

/// One typing test: the target passage, what has been typed so far, and the
/// counters derived from it.
///
/// Lifecycle only moves forward, `NotStarted` to `Running` on the first
/// keystroke and `Running` to `Completed` on an exact match or when the
/// configured duration runs out. The [`ResultRecord`] is built once, at that
/// last transition, and returned to the caller so it can be persisted.
#[derive(Debug, Clone)]
pub struct Session {
    passage: Passage,
    target: Vec<char>,
    input: String,
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
    correct: usize,
    incorrect: usize,
    total_typed: usize,
    duration: Duration,
    result: Option<ResultRecord>,
}

impl Session {
    pub fn new(passage: Passage, duration: Duration) -> Self {
        let target = passage.as_str().chars().collect();
        Self {
            passage,
            target,
            input: String::new(),
            started_at: None,
            ended_at: None,
            correct: 0,
            incorrect: 0,
            total_typed: 0,
            duration,
            result: None,
        }
    }

    /// Applies one keystroke. Returns the frozen result if this keystroke
    /// finished the passage.
    pub fn on_keystroke(&mut self, key: Keystroke, now: Instant) -> Option<ResultRecord> {
        match self.lifecycle() {
            Lifecycle::Completed => return None,
            Lifecycle::NotStarted => {
                debug!("session started");
                self.started_at = Some(now);
            }
            Lifecycle::Running => {}
        }

        match key {
            Keystroke::Printable(c) => self.type_char(c, now),
            Keystroke::EraseLast => {
                self.erase_last();
                None
            }
        }
    }

    /// Times the session out once the configured duration has elapsed.
    pub fn on_tick(&mut self, now: Instant) -> Option<ResultRecord> {
        if self.is_expired(now) {
            info!(total = self.total_typed, "session timed out");
            return Some(self.complete(now));
        }
        None
    }

    /// True while running and at or past the deadline.
    pub fn is_expired(&self, now: Instant) -> bool {
        match (self.lifecycle(), self.started_at) {
            (Lifecycle::Running, Some(started)) => {
                now.saturating_duration_since(started) >= self.duration
            }
            _ => false,
        }
    }

    fn type_char(&mut self, c: char, now: Instant) -> Option<ResultRecord> {
        if !is_printable(c) {
            return None;
        }

        self.input.push(c);
        self.total_typed += 1;
        let pos = self.total_typed - 1;

        // Past the end of the target nothing is classified.
        match self.target.get(pos) {
            Some(&expected) if expected == c => self.correct += 1,
            Some(_) => self.incorrect += 1,
            None => {}
        }

        if self.input == self.passage.as_str() {
            info!(correct = self.correct, incorrect = self.incorrect, "passage finished");
            return Some(self.complete(now));
        }
        None
    }

    fn erase_last(&mut self) {
        let Some(removed) = self.input.pop() else {
            return;
        };
        let pos = self.input.chars().count();

        match self.target.get(pos) {
            Some(&expected) if expected == removed => {
                self.correct = self.correct.saturating_sub(1)
            }
            Some(_) => self.incorrect = self.incorrect.saturating_sub(1),
            None => {}
        }
        self.total_typed = self.total_typed.saturating_sub(1);
    }

    fn complete(&mut self, now: Instant) -> ResultRecord {
        self.ended_at = Some(now);
        let record = ResultRecord::new(
            metrics::wpm(self, now),
            metrics::accuracy(self),
            self.correct,
            self.incorrect,
            self.total_typed,
            self.duration.as_secs(),
        );
        self.result = Some(record.clone());
        record
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match (self.started_at, self.ended_at) {
            (None, _) => Lifecycle::NotStarted,
            (Some(_), None) => Lifecycle::Running,
            (Some(_), Some(_)) => Lifecycle::Completed,
        }
    }

    pub fn passage(&self) -> &Passage {
        &self.passage
    }

    pub fn target(&self) -> &str {
        self.passage.as_str()
    }

    /// Target length in characters.
    pub fn target_len(&self) -> usize {
        self.target.len()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn correct_count(&self) -> usize {
        self.correct
    }

    pub fn incorrect_count(&self) -> usize {
        self.incorrect
    }

    pub fn total_typed(&self) -> usize {
        self.total_typed
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<Instant> {
        self.ended_at
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// The record frozen at completion, if completed.
    pub fn result(&self) -> Option<&ResultRecord> {
        self.result.as_ref()
    }

    pub fn seconds_remaining(&self, now: Instant) -> f64 {
        let elapsed = match self.started_at {
            Some(started) => self.ended_at.unwrap_or(now).saturating_duration_since(started),
            None => Duration::ZERO,
        };
        self.duration.saturating_sub(elapsed).as_secs_f64()
    }
}
