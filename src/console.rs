use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};

use crate::eclipse::EclipseStage;
use crate::engine::EngineState;
use crate::session::SessionSnapshot;
use crate::util::format_time;
use crate::MAX_MISTAKES;

/// What the player has typed in the current round.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Hands over the typed text and empties the buffer.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }
}

/// Everything the console shows for one frame.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub state: EngineState,
    pub session: &'a SessionSnapshot,
    pub input: &'a str,
    pub status: Option<&'a str>,
}

impl Frame<'_> {
    pub fn lines(&self) -> Vec<String> {
        let stage = EclipseStage::from_mistakes(self.session.mistakes);
        let mut lines = vec![
            format!(
                "Level: {}   {} {}%   Time: {}",
                self.session.level,
                stage.glyph(),
                stage.percent(),
                format_time(self.session.time_remaining)
            ),
            format!("Mistakes: {}/{}", self.session.mistakes, MAX_MISTAKES),
            String::new(),
        ];

        match self.state {
            EngineState::Ended => {
                lines.push("Total eclipse. Game over.".to_string());
                lines.push(format!("You reached level {}.", self.session.level));
                lines.push(String::new());
                lines.push("enter: retry   esc: quit".to_string());
            }
            EngineState::Idle => {
                lines.push("Waiting for a word...".to_string());
                lines.push(String::new());
                lines.push("enter: retry   esc: quit".to_string());
            }
            EngineState::RoundActive | EngineState::Evaluating => {
                lines.push(format!("    {}", self.session.word));
                lines.push(format!("  > {}", self.input));
                lines.push(String::new());
                lines.push("enter: submit   esc: quit".to_string());
            }
        }

        if let Some(status) = self.status {
            lines.push(String::new());
            lines.push(status.to_string());
        }
        lines
    }
}

pub fn render<W: Write>(out: &mut W, frame: &Frame<'_>) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;
    for (row, line) in frame.lines().iter().enumerate() {
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        queue!(out, MoveTo(2, row.saturating_add(1)), Print(line))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            word: "gato".to_string(),
            level: 3,
            time_remaining: 17,
            mistakes: 2,
        }
    }

    #[test]
    fn buffer_edits() {
        let mut input = InputBuffer::default();
        for c in "gatx".chars() {
            input.push(c);
        }
        input.backspace();
        input.push('o');
        assert_eq!(input.as_str(), "gato");
        assert_eq!(input.take(), "gato");
        assert_eq!(input.as_str(), "");
    }

    #[test]
    fn backspace_on_empty_is_noop() {
        let mut input = InputBuffer::default();
        input.backspace();
        assert_eq!(input, InputBuffer::default());
    }

    #[test]
    fn active_frame_shows_word_and_input() {
        let session = snapshot();
        let frame = Frame {
            state: EngineState::RoundActive,
            session: &session,
            input: "ga",
            status: None,
        };
        let lines = frame.lines();
        assert_eq!(lines[0], "Level: 3   ◑ 50%   Time: 00:17");
        assert_eq!(lines[1], "Mistakes: 2/4");
        assert!(lines.contains(&"    gato".to_string()));
        assert!(lines.contains(&"  > ga".to_string()));
    }

    #[test]
    fn ended_frame_offers_retry() {
        let session = SessionSnapshot {
            mistakes: 4,
            ..snapshot()
        };
        let frame = Frame {
            state: EngineState::Ended,
            session: &session,
            input: "",
            status: Some("no word available: timed out"),
        };
        let lines = frame.lines();
        assert!(lines[0].contains("● 100%"));
        assert!(lines.iter().any(|l| l.contains("Game over")));
        assert_eq!(lines.last().unwrap(), "no word available: timed out");
    }

    #[test]
    fn render_writes_every_line() {
        let session = snapshot();
        let frame = Frame {
            state: EngineState::RoundActive,
            session: &session,
            input: "",
            status: None,
        };
        let mut out = Vec::new();
        render(&mut out, &frame).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("gato"));
        assert!(text.contains("Mistakes: 2/4"));
    }
}
