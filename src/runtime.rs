use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};

/// ~60 frames per second
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, mouse, resize)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<GameEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                Ok(CtEvent::Key(key)) => tx.send(GameEvent::Key(key)),
                Ok(CtEvent::Mouse(mouse)) => tx.send(GameEvent::Mouse(mouse)),
                Ok(CtEvent::Resize(_, _)) => tx.send(GameEvent::Resize),
                Ok(_) => Ok(()),
                Err(err) => {
                    tracing::error!(error = %err, "terminal event stream failed");
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

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
        Self::new(FRAME_INTERVAL)
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-fed source for tests
pub struct TestEventSource {
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Advances the application one event or frame at a time
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to one frame and returns the next event, or Tick on timeout
    pub fn step(&self) -> GameEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => GameEvent::Tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crossterm::event::{KeyModifiers, MouseButton, MouseEventKind};
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(1)),
        );

        assert_matches!(runner.step(), GameEvent::Tick);
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameEvent::Resize).unwrap();
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(10)),
        );

        assert_matches!(runner.step(), GameEvent::Resize);
    }

    #[test]
    fn step_passes_through_mouse_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 7,
            modifiers: KeyModifiers::NONE,
        }))
        .unwrap();
        let runner = Runner::new(TestEventSource::new(rx), FixedTicker::default());

        assert_matches!(runner.step(), GameEvent::Mouse(m) if m.column == 4 && m.row == 7);
    }

    #[test]
    fn disconnected_source_ticks() {
        let (tx, rx) = mpsc::channel::<GameEvent>();
        drop(tx);
        let runner = Runner::new(TestEventSource::new(rx), FixedTicker::default());

        assert_matches!(runner.step(), GameEvent::Tick);
    }

    #[test]
    fn default_ticker_is_one_frame() {
        assert_eq!(FixedTicker::default().interval(), FRAME_INTERVAL);
    }
}
