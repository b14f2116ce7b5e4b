// Library surface for the binary and headless/integration tests.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod console;
pub mod difficulty;
pub mod eclipse;
pub mod engine;
pub mod error;
pub mod runtime;
pub mod session;
pub mod util;
pub mod words;

pub use clock::{ClockId, ClockSignal};
pub use difficulty::{initial_time, DifficultyCurve};
pub use engine::{EngineState, RoundEngine, RoundOutcome, TickOutcome};
pub use error::{EngineError, WordUnavailable};
pub use session::{Field, FieldValue, SessionSnapshot, StateChange, SubscriptionId};
pub use words::{BoundedWordSource, SupportedLanguage, WordList, WordSource};

/// Mistakes that end a session.
pub const MAX_MISTAKES: u32 = 4;
/// Ticks allotted to a round below level 5.
pub const BASE_TIME: u32 = 20;
/// Ticks removed per group of levels.
pub const TIME_STEP: u32 = 2;
pub const LEVELS_PER_STEP: u32 = 5;
/// Shortest round, however high the level.
pub const MIN_TIME: u32 = 2;

pub const TICK_RATE_MS: u64 = 1000;
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 2000;
