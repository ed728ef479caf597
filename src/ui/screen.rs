use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;

use crate::{
    ui::{render_game, render_results, render_start},
    App, AppState,
};

/// A UI Screen boundary: responsible for rendering and optional key handling
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
    /// Optional per-screen key handling. Returns true if the key was handled.
    fn on_key(&mut self, _key: KeyEvent, _app: &mut App) -> bool {
        false
    }
}

pub struct StartScreen;

impl Screen for StartScreen {
    fn render(&self, _app: &mut App, f: &mut Frame) {
        let area = f.area();
        render_start(area, f.buffer_mut());
    }

    fn on_key(&mut self, key: KeyEvent, app: &mut App) -> bool {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                app.start();
                true
            }
            _ => false,
        }
    }
}

/// The conveyor. Stays up after the session ends until the results delay
/// has passed, so the last cards can finish their animations.
pub struct GameScreen;

impl Screen for GameScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        let area = f.area();
        let now = app.now;
        app.lane = render_game(app, now, area, f.buffer_mut());
    }
}

pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        if let Some(summary) = app.session.summary() {
            let area = f.area();
            render_results(&summary, area, f.buffer_mut());
        }
    }

    fn on_key(&mut self, key: KeyEvent, app: &mut App) -> bool {
        match key.code {
            KeyCode::Char('r') | KeyCode::Enter => {
                app.retry();
                true
            }
            _ => false,
        }
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Start => Box::new(StartScreen),
        AppState::Playing => Box::new(GameScreen),
        AppState::Results => Box::new(ResultsScreen),
    }
}
