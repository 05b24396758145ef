use ratatui::Frame;

use crate::{app::Screen as ScreenKind, history::HistoryBackend, ui::AppView};

/// A UI screen boundary: draws one view of the app.
pub trait Screen<B: HistoryBackend> {
    fn render(&self, view: &AppView<'_, B>, f: &mut Frame);
}

/// Typing screen - passage, live stats, progress
pub struct TypingScreen;

impl<B: HistoryBackend> Screen<B> for TypingScreen {
    fn render(&self, view: &AppView<'_, B>, f: &mut Frame) {
        f.render_widget(view, f.area());
    }
}

/// Results screen - the frozen record of the finished session
pub struct ResultsScreen;

impl<B: HistoryBackend> Screen<B> for ResultsScreen {
    fn render(&self, view: &AppView<'_, B>, f: &mut Frame) {
        f.render_widget(crate::ui::ResultsView(view), f.area());
    }
}

/// History screen - aggregate statistics and recent trend
pub struct HistoryScreen;

impl<B: HistoryBackend> Screen<B> for HistoryScreen {
    fn render(&self, view: &AppView<'_, B>, f: &mut Frame) {
        crate::ui::history::render_history(view.app.history(), f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen<B: HistoryBackend>(screen: ScreenKind) -> Box<dyn Screen<B>> {
    match screen {
        ScreenKind::Typing => Box::new(TypingScreen),
        ScreenKind::Results => Box::new(ResultsScreen),
        ScreenKind::History => Box::new(HistoryScreen),
    }
}
