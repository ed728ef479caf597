pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers, MouseEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
};
use tracing::info;

use sortline::{
    app_dirs::AppDirs,
    clock::{Millis, MonotonicTimeSource, TimeSource},
    config::{ConfigStore, FileConfigStore, GameConfig},
    feedback::Feedback,
    input::PointerMapper,
    logging,
    random::StdRandom,
    runtime::{CrosstermEventSource, EventSource, FixedTicker, GameEvent, Runner, Ticker},
    session::Session,
};

use crate::ui::{scene::Scene, screen::current_screen};

/// sort the line before the shift ends
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal conveyor-sorting minigame. Drag OK items right and NG items left with the mouse before they run off the end of the line."
)]
pub struct Cli {
    /// length of a shift in seconds
    #[clap(short = 'd', long)]
    duration_secs: Option<u64>,

    /// seed the item generator for a reproducible shift
    #[clap(long)]
    seed: Option<u64>,

    /// minimum horizontal travel of a swipe, in pointer units (one column is 8)
    #[clap(short = 't', long)]
    threshold: Option<f64>,

    /// disable the start/end bell
    #[clap(long)]
    no_sound: bool,

    /// write the effective settings to the config file and continue
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer command line overrides on top of the stored config
    fn apply(&self, mut config: GameConfig) -> GameConfig {
        if let Some(secs) = self.duration_secs {
            config.duration_ms = secs.saturating_mul(1000);
        }
        if let Some(threshold) = self.threshold {
            config.swipe_threshold = threshold;
        }
        if self.no_sound {
            config.sound = false;
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Start,
    Playing,
    Results,
}

pub type GameSession = Session<Scene, Feedback, StdRandom>;

pub struct App {
    pub config: GameConfig,
    pub session: GameSession,
    pub state: AppState,
    pub pointer: PointerMapper,
    /// Lane drawn in the last frame; mouse hit tests run against it
    pub lane: Rect,
    /// Timestamp of the event being handled
    pub now: Millis,
}

impl App {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRandom::seeded(seed),
            None => StdRandom::from_entropy(),
        };
        let session = Session::new(
            config.session_config(),
            Scene::new(config.exit_animation_ms),
            Feedback::from_settings(config.sound),
            rng,
        );

        Self {
            config,
            session,
            state: AppState::Start,
            pointer: PointerMapper::new(),
            lane: Rect::default(),
            now: 0,
        }
    }

    pub fn start(&mut self) {
        if self.session.start(self.now) {
            self.pointer.release();
            self.state = AppState::Playing;
        }
    }

    pub fn retry(&mut self) {
        if self.session.retry() {
            self.pointer.release();
            self.state = AppState::Start;
        }
    }

    /// Frame tick: run due timers and the countdown, then switch to the
    /// results once the session has been over for the results delay.
    pub fn on_tick(&mut self, now: Millis) {
        self.now = now;
        self.session.advance(now);

        if self.state == AppState::Playing {
            if let Some(ended_at) = self.session.ended_at() {
                if now >= ended_at.saturating_add(self.config.results_delay_ms) {
                    self.pointer.release();
                    self.state = AppState::Results;
                }
            }
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent, now: Millis) {
        self.now = now;
        if self.state != AppState::Playing {
            return;
        }
        // timers due before the input must fire first
        self.session.advance(now);

        let lane = self.lane;
        let scene = self.session.renderer();
        let event = self
            .pointer
            .map(&mouse, |column, row| scene.hit_test(lane, column, row, now));
        if let Some(stale) = self.pointer.take_abandoned() {
            self.session.cancel_pointer(stale);
        }
        if let Some(event) = event {
            self.session.on_pointer(event, now);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let _log_guard = AppDirs::log_dir().and_then(|dir| logging::init_tracing(&dir));

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if let Err(err) = config.validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, err.to_string()).exit();
    }
    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "saved config");
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, cli.seed);
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let result = start_tui(&mut terminal, &mut app, &runner, &MonotonicTimeSource::new());

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen,
    )?;
    terminal.show_cursor()?;

    result
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
    clock: &dyn TimeSource,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(app, f))?;

    loop {
        let event = runner.step();
        let now = clock.now_ms();

        match event {
            GameEvent::Tick => app.on_tick(now),
            GameEvent::Resize => app.now = now,
            GameEvent::Mouse(mouse) => app.on_mouse(mouse, now),
            GameEvent::Key(key) => {
                if is_quit(&key) {
                    break;
                }
                app.on_tick(now);
                let mut screen = current_screen(&app.state);
                screen.on_key(key, app);
            }
        }

        terminal.draw(|f| ui(app, f))?;
    }

    info!("quit");
    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    let screen = current_screen(&app.state);
    screen.render(app, f);
}
