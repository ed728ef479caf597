use std::io::{self, Write};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("playback rejected: {0}")]
    Rejected(String),
    #[error("feedback output failed: {0}")]
    Io(#[from] io::Error),
}

/// Ambient feedback (background music in the browser build). Every call may
/// fail; the session logs and ignores failures.
pub trait AmbientFeedback {
    fn play(&mut self) -> Result<(), FeedbackError>;
    fn pause(&mut self) -> Result<(), FeedbackError>;
    /// Rewind to the beginning
    fn reset(&mut self) -> Result<(), FeedbackError>;
}

/// Does nothing; used with `--no-sound` and in tests
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl AmbientFeedback for Silent {
    fn play(&mut self) -> Result<(), FeedbackError> {
        Ok(())
    }

    fn pause(&mut self) -> Result<(), FeedbackError> {
        Ok(())
    }

    fn reset(&mut self) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// Rings the terminal bell when a session starts and ends
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn ring(&mut self) -> Result<(), FeedbackError> {
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> AmbientFeedback for TerminalBell<W> {
    fn play(&mut self) -> Result<(), FeedbackError> {
        self.ring()
    }

    fn pause(&mut self) -> Result<(), FeedbackError> {
        self.ring()
    }

    fn reset(&mut self) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// Either of the shipped feedback sinks, picked at startup
pub enum Feedback {
    Silent(Silent),
    Bell(TerminalBell<io::Stdout>),
}

impl Feedback {
    pub fn from_settings(sound: bool) -> Self {
        if sound {
            Feedback::Bell(TerminalBell::new(io::stdout()))
        } else {
            Feedback::Silent(Silent)
        }
    }
}

impl AmbientFeedback for Feedback {
    fn play(&mut self) -> Result<(), FeedbackError> {
        match self {
            Feedback::Silent(s) => s.play(),
            Feedback::Bell(b) => b.play(),
        }
    }

    fn pause(&mut self) -> Result<(), FeedbackError> {
        match self {
            Feedback::Silent(s) => s.pause(),
            Feedback::Bell(b) => b.pause(),
        }
    }

    fn reset(&mut self) -> Result<(), FeedbackError> {
        match self {
            Feedback::Silent(s) => s.reset(),
            Feedback::Bell(b) => b.reset(),
        }
    }
}
