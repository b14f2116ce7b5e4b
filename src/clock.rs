use std::fmt;

/// Identity stamp of one countdown. Every tick delivered to the engine carries
/// the stamp of the clock it was scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockId(u64);

impl fmt::Display for ClockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clock#{}", self.0)
    }
}

/// What a delivered tick meant to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSignal {
    /// One unit elapsed, `remaining` units left.
    Tick { remaining: u32 },
    /// The countdown had already reached zero. Fires once per clock.
    Expired,
    /// The tick belongs to a canceled, expired or superseded clock.
    Stale,
}

/// A cancelable countdown for a single round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundClock {
    id: ClockId,
    remaining: u32,
    running: bool,
}

impl RoundClock {
    fn start(id: ClockId, duration: u32) -> Self {
        Self {
            id,
            remaining: duration,
            running: true,
        }
    }

    pub fn id(&self) -> ClockId {
        self.id
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn cancel(&mut self) {
        self.running = false;
    }

    pub fn tick(&mut self, stamp: ClockId) -> ClockSignal {
        if !self.running || stamp != self.id {
            return ClockSignal::Stale;
        }
        if self.remaining == 0 {
            self.running = false;
            return ClockSignal::Expired;
        }
        self.remaining -= 1;
        ClockSignal::Tick {
            remaining: self.remaining,
        }
    }
}

/// Holds at most one active [`RoundClock`] and hands out fresh stamps.
///
/// Starting a new clock always cancels the previous one first, so a tick that
/// was queued for an earlier round can only ever resolve to
/// [`ClockSignal::Stale`].
#[derive(Debug, Default)]
pub struct ClockSlot {
    current: Option<RoundClock>,
    issued: u64,
}

impl ClockSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, duration: u32) -> ClockId {
        self.cancel();
        self.issued += 1;
        let id = ClockId(self.issued);
        self.current = Some(RoundClock::start(id, duration));
        id
    }

    /// Stops and discards the active clock, if any.
    pub fn cancel(&mut self) {
        if let Some(mut clock) = self.current.take() {
            clock.cancel();
        }
    }

    /// Stamp of the clock that is still counting, if any.
    pub fn active(&self) -> Option<ClockId> {
        self.current
            .as_ref()
            .filter(|clock| clock.is_running())
            .map(RoundClock::id)
    }

    pub fn remaining(&self) -> Option<u32> {
        self.current.as_ref().map(RoundClock::remaining)
    }

    pub fn tick(&mut self, stamp: ClockId) -> ClockSignal {
        let Some(clock) = self.current.as_mut() else {
            return ClockSignal::Stale;
        };
        let signal = clock.tick(stamp);
        if signal == ClockSignal::Expired {
            self.current = None;
        }
        signal
    }
}
