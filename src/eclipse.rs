use crate::MAX_MISTAKES;

/// How far the eclipse has closed in, driven by the mistake count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EclipseStage(u32);

impl EclipseStage {
    pub fn from_mistakes(mistakes: u32) -> Self {
        Self(mistakes.min(MAX_MISTAKES))
    }

    /// Coverage in percent: 0, 25, 50, 75 or 100.
    pub fn percent(&self) -> u32 {
        self.0 * 100 / MAX_MISTAKES
    }

    pub fn is_total(&self) -> bool {
        self.0 == MAX_MISTAKES
    }

    /// Moon phase glyph for text front-ends.
    pub fn glyph(&self) -> char {
        match self.percent() {
            0 => '○',
            1..=25 => '◔',
            26..=50 => '◑',
            51..=75 => '◕',
            _ => '●',
        }
    }
}
