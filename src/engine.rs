use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::{ClockId, ClockSignal, ClockSlot};
use crate::difficulty::DifficultyCurve;
use crate::error::{EngineError, WordUnavailable};
use crate::session::{SessionSnapshot, SessionState, StateChange, SubscriptionId};
use crate::words::WordSource;
use crate::MAX_MISTAKES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum EngineState {
    Idle,
    #[strum(serialize = "round active")]
    RoundActive,
    Evaluating,
    Ended,
}

/// How a round was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundOutcome {
    /// The word matched; play continues at `level`.
    LevelUp { level: u32 },
    /// The word did not match; a fresh round started at the same level.
    Mistake { mistakes: u32 },
    /// The mistake budget ran out.
    SessionEnded { mistakes: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TickOutcome {
    Counted { remaining: u32 },
    TimedOut(RoundOutcome),
    /// The tick was for a clock that no longer runs.
    Ignored,
}

/// Drives rounds: fetches words, runs the countdown and scores the player.
#[derive(Debug)]
pub struct RoundEngine<W: WordSource> {
    source: W,
    curve: DifficultyCurve,
    session: SessionState,
    clock: ClockSlot,
    state: EngineState,
}

impl<W: WordSource> RoundEngine<W> {
    pub fn new(source: W) -> Self {
        Self::with_curve(source, DifficultyCurve::default())
    }

    pub fn with_curve(source: W, curve: DifficultyCurve) -> Self {
        Self {
            source,
            curve,
            session: SessionState::default(),
            clock: ClockSlot::new(),
            state: EngineState::Idle,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn curve(&self) -> &DifficultyCurve {
        &self.curve
    }

    pub fn source_mut(&mut self) -> &mut W {
        &mut self.source
    }

    /// Stamp the tick scheduler must attach to ticks for the current round.
    pub fn clock_stamp(&self) -> Option<ClockId> {
        self.clock.active()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&StateChange) + 'static) -> SubscriptionId {
        self.session.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.session.unsubscribe(id)
    }

    pub fn start_session(&mut self) -> Result<(), EngineError> {
        match self.state {
            EngineState::Idle | EngineState::Ended => self.begin_session(),
            state => Err(EngineError::InvalidStateTransition {
                action: "start a session",
                state,
            }),
        }
    }

    pub fn restart(&mut self) -> Result<(), EngineError> {
        match self.state {
            EngineState::Ended => self.begin_session(),
            state => Err(EngineError::InvalidStateTransition {
                action: "restart",
                state,
            }),
        }
    }

    /// Starts a round at the current level and mistake count. Only valid
    /// while idle, e.g. to resume after the word source failed mid-session.
    pub fn start_round(&mut self) -> Result<(), EngineError> {
        if self.state != EngineState::Idle {
            return Err(EngineError::InvalidStateTransition {
                action: "start a round",
                state: self.state,
            });
        }
        let word = self.fetch_word()?;
        self.install_round(word);
        Ok(())
    }

    pub fn submit(&mut self, typed: &str) -> Result<RoundOutcome, EngineError> {
        if self.state != EngineState::RoundActive {
            return Err(EngineError::InvalidStateTransition {
                action: "submit",
                state: self.state,
            });
        }
        self.resolve(typed)
    }

    /// Delivers one tick from the scheduler. `input` is whatever the player
    /// has typed so far; it is scored if this tick ends the round.
    pub fn on_tick(&mut self, stamp: ClockId, input: &str) -> Result<TickOutcome, EngineError> {
        if self.state != EngineState::RoundActive {
            debug!(%stamp, state = %self.state, "dropping tick outside an active round");
            return Ok(TickOutcome::Ignored);
        }
        match self.clock.tick(stamp) {
            ClockSignal::Tick { remaining } => {
                self.session.set_time_remaining(remaining);
                Ok(TickOutcome::Counted { remaining })
            }
            ClockSignal::Expired => {
                debug!(%stamp, word = self.session.current_word(), "round timed out");
                self.resolve(input).map(TickOutcome::TimedOut)
            }
            ClockSignal::Stale => {
                debug!(%stamp, "dropping stale clock event");
                Ok(TickOutcome::Ignored)
            }
        }
    }

    pub fn cancel_clock(&mut self) {
        self.clock.cancel();
    }

    fn begin_session(&mut self) -> Result<(), EngineError> {
        // Fetch before touching anything so a failure leaves the old state.
        let word = self.fetch_word()?;
        self.clock.cancel();
        self.session.set_level(1);
        self.session.set_mistakes(0);
        self.session.set_time_remaining(0);
        info!("session started");
        self.install_round(word);
        Ok(())
    }

    fn resolve(&mut self, typed: &str) -> Result<RoundOutcome, EngineError> {
        self.state = EngineState::Evaluating;
        self.clock.cancel();

        if typed == self.session.current_word() {
            let level = self.session.level().saturating_add(1);
            self.session.set_level(level);
            self.next_round()?;
            return Ok(RoundOutcome::LevelUp { level });
        }

        let mistakes = self.session.mistakes().saturating_add(1);
        self.session.set_mistakes(mistakes);
        if mistakes >= MAX_MISTAKES {
            self.state = EngineState::Ended;
            info!(level = self.session.level(), mistakes, "session ended");
            return Ok(RoundOutcome::SessionEnded { mistakes });
        }
        self.next_round()?;
        Ok(RoundOutcome::Mistake { mistakes })
    }

    fn next_round(&mut self) -> Result<(), EngineError> {
        match self.fetch_word() {
            Ok(word) => {
                self.install_round(word);
                Ok(())
            }
            Err(err) => {
                // Park with no word; start_round() resumes at the same level.
                self.session.set_current_word(String::new());
                self.state = EngineState::Idle;
                Err(err)
            }
        }
    }

    fn fetch_word(&mut self) -> Result<String, EngineError> {
        let word = self
            .source
            .next_word()
            .and_then(|word| {
                if word.is_empty() {
                    Err(WordUnavailable::new("word source returned an empty word"))
                } else {
                    Ok(word)
                }
            })
            .inspect_err(|err| warn!(%err, "could not fetch a word"))?;
        Ok(word)
    }

    fn install_round(&mut self, word: String) {
        let allotted = self.curve.initial_time(self.session.level());
        self.session.set_current_word(word);
        self.session.set_time_remaining(allotted);
        let stamp = self.clock.start(allotted);
        self.state = EngineState::RoundActive;
        debug!(
            %stamp,
            level = self.session.level(),
            mistakes = self.session.mistakes(),
            allotted,
            "round started"
        );
    }
}
