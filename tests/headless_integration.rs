use std::sync::mpsc;
use std::time::{Duration, Instant};

use tempfile::tempdir;

use typeclock::app::{App, Flow, Screen};
use typeclock::config::Settings;
use typeclock::history::{HistoryStore, JsonFileBackend};
use typeclock::runtime::{FixedTicker, Runner, TestEventSource, TypingEvent};
use typeclock::session::{Lifecycle, Session};
use typeclock::word_sampler::{Passage, WordSampler};

fn app_for(passage: &str, duration: i64, history: &std::path::Path) -> App {
    let settings = Settings::new(duration, 2, false, "default")
        .unwrap()
        .with_history_path(history);
    let sampler = WordSampler::new(vec!["alpha".to_string(), "beta".to_string()]).unwrap();
    let session = Session::new(Passage::from(passage), settings.duration);
    App::new(
        settings,
        sampler,
        HistoryStore::open(JsonFileBackend::with_path(history)),
    )
    .unwrap()
    .with_session(session)
}

// Drives the app through Runner/TestEventSource without a TTY, the same way
// the binary's loop does.
#[test]
fn headless_typing_flow_completes_and_persists() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");
    let mut app = app_for("hi", 30, &path);

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );
    tx.send(TypingEvent::Printable('h')).unwrap();
    tx.send(TypingEvent::Printable('i')).unwrap();

    for _ in 0..100u32 {
        let event = runner.step().unwrap();
        app.handle(event, Instant::now());
        if app.screen() == Screen::Results {
            break;
        }
    }

    assert_eq!(app.session().lifecycle(), Lifecycle::Completed);
    let result = app.last_result().expect("frozen result");
    assert_eq!(result.correct_chars, 2);
    assert_eq!(result.incorrect_chars, 0);
    assert_eq!(result.accuracy, 100.0);

    // a fresh store over the same file sees the saved record
    let reopened = HistoryStore::open(JsonFileBackend::with_path(&path));
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.all()[0].total_chars, 2);
}

#[test]
fn headless_timeout_saves_partial_result() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");
    let mut app = app_for("hello world", 1, &path);

    let t0 = Instant::now();
    for c in "helxo".chars() {
        app.handle(TypingEvent::Printable(c), t0);
    }
    app.handle(TypingEvent::Tick, t0 + Duration::from_millis(500));
    assert_eq!(app.screen(), Screen::Typing);

    app.handle(TypingEvent::Tick, t0 + Duration::from_secs(1));
    assert_eq!(app.screen(), Screen::Results);

    let result = app.last_result().unwrap();
    assert_eq!(result.correct_chars, 4);
    assert_eq!(result.incorrect_chars, 1);
    assert_eq!(result.accuracy, 80.0);
    assert_eq!(result.duration, 1);

    let reopened = HistoryStore::open(JsonFileBackend::with_path(&path));
    assert_eq!(reopened.len(), 1);
}

#[test]
fn headless_restart_and_quit() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");
    let mut app = app_for("abc", 30, &path);

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );
    for event in [
        TypingEvent::Printable('a'),
        TypingEvent::EraseLast,
        TypingEvent::Printable('x'),
        TypingEvent::Restart,
        TypingEvent::Quit,
    ] {
        tx.send(event).unwrap();
    }

    let mut quit = false;
    for _ in 0..100u32 {
        let event = runner.step().unwrap();
        if app.handle(event, Instant::now()) == Flow::Quit {
            quit = true;
            break;
        }
    }

    assert!(quit);
    assert_eq!(app.screen(), Screen::Typing);
    assert_eq!(app.session().lifecycle(), Lifecycle::NotStarted);
    assert_eq!(app.session().passage().word_count(), 2);
    assert!(app.history().is_empty());
    assert!(!path.exists());
}

#[test]
fn headless_history_screen_reads_existing_log() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");

    for passage in ["a", "b"] {
        let mut app = app_for(passage, 30, &path);
        app.handle(TypingEvent::Printable(passage.chars().next().unwrap()), Instant::now());
        assert_eq!(app.screen(), Screen::Results);
    }

    let settings = Settings::new(30, 2, true, "default")
        .unwrap()
        .with_history_path(&path);
    let sampler = WordSampler::new(vec!["alpha".to_string()]).unwrap();
    let app = App::new(
        settings,
        sampler,
        HistoryStore::open(JsonFileBackend::with_path(&path)),
    )
    .unwrap();

    assert_eq!(app.screen(), Screen::History);
    let stats = app.history().statistics();
    assert_eq!(stats.count, 2);
    assert_eq!(stats.best_accuracy, 100.0);
}
