//! Live and final typing metrics.
//!
//! Both functions read the session's own clock fields. Once a session has
//! completed its end instant is fixed, so `wpm` stops moving no matter how
//! late it is asked. Screens that show a finished session read the
//! [`ResultRecord`](crate::history::ResultRecord) frozen at completion
//! instead of calling these again.

use std::time::Instant;

use crate::session::Session;

/// Characters per "word" in the WPM convention.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Correct characters per five, per elapsed minute.
pub fn wpm(session: &Session, now: Instant) -> f64 {
    let Some(started) = session.started_at() else {
        return 0.0;
    };
    let end = session.ended_at().unwrap_or(now);
    let elapsed_secs = end.saturating_duration_since(started).as_secs_f64();
    if elapsed_secs == 0.0 {
        return 0.0;
    }

    (session.correct_count() as f64 / CHARS_PER_WORD) / (elapsed_secs / 60.0)
}

/// Share of typed characters that matched, as a percentage.
pub fn accuracy(session: &Session) -> f64 {
    let total = session.total_typed();
    if total == 0 {
        return 100.0;
    }
    100.0 * session.correct_count() as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Keystroke;
    use crate::word_sampler::Passage;
    use std::time::Duration;

    fn session(target: &str) -> Session {
        Session::new(Passage::from(target), Duration::from_secs(60))
    }

    fn type_str(s: &mut Session, text: &str, at: Instant) {
        for c in text.chars() {
            s.on_keystroke(Keystroke::Printable(c), at);
        }
    }

    #[test]
    fn zero_before_start() {
        let s = session("hello");
        assert_eq!(wpm(&s, Instant::now()), 0.0);
        assert_eq!(accuracy(&s), 100.0);
    }

    #[test]
    fn zero_when_no_time_has_passed() {
        let mut s = session("hello world");
        let t0 = Instant::now();
        type_str(&mut s, "hello", t0);
        assert_eq!(wpm(&s, t0), 0.0);
    }

    #[test]
    fn ten_words_in_a_minute() {
        let mut s = session(&"a".repeat(100));
        let t0 = Instant::now();
        type_str(&mut s, &"a".repeat(50), t0);
        let value = wpm(&s, t0 + Duration::from_secs(60));
        assert!((value - 10.0).abs() < 1e-9);
    }

    #[test]
    fn more_correct_chars_over_same_time_never_lowers_wpm() {
        let t0 = Instant::now();
        let later = t0 + Duration::from_secs(20);
        // one char longer than what gets typed, so the session keeps running
        let mut s = session(&"x".repeat(41));
        let mut previous = 0.0;
        for _ in 0..40 {
            s.on_keystroke(Keystroke::Printable('x'), t0);
            let current = wpm(&s, later);
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn accuracy_stays_in_range() {
        let mut s = session("abcdef");
        let t0 = Instant::now();
        for c in "zbzdzf".chars() {
            s.on_keystroke(Keystroke::Printable(c), t0);
            let acc = accuracy(&s);
            assert!((0.0..=100.0).contains(&acc));
        }
        assert_eq!(accuracy(&s), 50.0);
    }

    #[test]
    fn frozen_after_completion() {
        let mut s = session("go");
        let t0 = Instant::now();
        s.on_keystroke(Keystroke::Printable('g'), t0);
        s.on_keystroke(Keystroke::Printable('o'), t0 + Duration::from_secs(2));

        let first = wpm(&s, t0 + Duration::from_secs(3));
        for later in [10, 100, 10_000] {
            assert_eq!(wpm(&s, t0 + Duration::from_secs(later)), first);
        }
        assert_eq!(accuracy(&s), 100.0);
    }
}
