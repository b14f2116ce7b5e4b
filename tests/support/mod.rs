#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use eclipse_typing::{StateChange, WordSource, WordUnavailable};

/// Word source that serves a fixed script and records how often it was asked.
#[derive(Debug, Default)]
pub struct ScriptedWords {
    words: VecDeque<String>,
    pub requests: usize,
}

impl ScriptedWords {
    pub fn new(words: &[&str]) -> Self {
        Self {
            words: words.iter().map(|w| w.to_string()).collect(),
            requests: 0,
        }
    }

    pub fn push(&mut self, word: &str) {
        self.words.push_back(word.to_string());
    }
}

impl WordSource for ScriptedWords {
    fn next_word(&mut self) -> Result<String, WordUnavailable> {
        self.requests += 1;
        self.words
            .pop_front()
            .ok_or_else(|| WordUnavailable::new("script exhausted"))
    }
}

/// Collects every published change.
pub fn record<F>(subscribe: F) -> Rc<RefCell<Vec<StateChange>>>
where
    F: FnOnce(Box<dyn FnMut(&StateChange)>),
{
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    subscribe(Box::new(move |change| sink.borrow_mut().push(change.clone())));
    seen
}
