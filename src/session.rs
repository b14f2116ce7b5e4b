use std::fmt;

use serde::Serialize;

/// The observable fields of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    Word,
    Level,
    TimeRemaining,
    Mistakes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Count(u32),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "{text:?}"),
            FieldValue::Count(n) => write!(f, "{n}"),
        }
    }
}

/// One mutation of the session, as delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateChange {
    pub field: Field,
    pub old: FieldValue,
    pub new: FieldValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&StateChange)>;

#[derive(Default)]
struct Subscribers {
    entries: Vec<(SubscriptionId, Callback)>,
    issued: u64,
}

impl Subscribers {
    fn add(&mut self, callback: Callback) -> SubscriptionId {
        self.issued += 1;
        let id = SubscriptionId(self.issued);
        self.entries.push((id, callback));
        id
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    fn publish(&mut self, change: StateChange) {
        for (_, callback) in self.entries.iter_mut() {
            callback(&change);
        }
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.entries.len())
            .finish()
    }
}

/// Point-in-time copy of the session, for rendering and comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub word: String,
    pub level: u32,
    pub time_remaining: u32,
    pub mistakes: u32,
}

/// Word, level, countdown and mistakes of the running session.
///
/// Setters publish a [`StateChange`] to every subscriber whenever the stored
/// value actually changes.
#[derive(Debug)]
pub struct SessionState {
    current_word: String,
    level: u32,
    time_remaining: u32,
    mistakes: u32,
    subscribers: Subscribers,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            current_word: String::new(),
            level: 1,
            time_remaining: 0,
            mistakes: 0,
            subscribers: Subscribers::default(),
        }
    }
}

impl SessionState {
    pub fn current_word(&self) -> &str {
        &self.current_word
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            word: self.current_word.clone(),
            level: self.level,
            time_remaining: self.time_remaining,
            mistakes: self.mistakes,
        }
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&StateChange) + 'static) -> SubscriptionId {
        self.subscribers.add(Box::new(callback))
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    pub(crate) fn set_current_word(&mut self, word: String) {
        if word == self.current_word {
            return;
        }
        let old = std::mem::replace(&mut self.current_word, word);
        let new = FieldValue::Text(self.current_word.clone());
        self.subscribers.publish(StateChange {
            field: Field::Word,
            old: FieldValue::Text(old),
            new,
        });
    }

    pub(crate) fn set_level(&mut self, level: u32) {
        let old = std::mem::replace(&mut self.level, level);
        self.publish_count(Field::Level, old, level);
    }

    pub(crate) fn set_time_remaining(&mut self, time_remaining: u32) {
        let old = std::mem::replace(&mut self.time_remaining, time_remaining);
        self.publish_count(Field::TimeRemaining, old, time_remaining);
    }

    pub(crate) fn set_mistakes(&mut self, mistakes: u32) {
        let old = std::mem::replace(&mut self.mistakes, mistakes);
        self.publish_count(Field::Mistakes, old, mistakes);
    }

    fn publish_count(&mut self, field: Field, old: u32, new: u32) {
        if old != new {
            self.subscribers.publish(StateChange {
                field,
                old: FieldValue::Count(old),
                new: FieldValue::Count(new),
            });
        }
    }
}
