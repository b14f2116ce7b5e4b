use crate::error::WordUnavailable;
use include_dir::{include_dir, Dir};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};
use std::{fs, io, thread};

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// Supplies the word for each round.
pub trait WordSource {
    /// Returns the next word to type. Implementations must not hand out an
    /// empty word; the engine rejects one as [`WordUnavailable`] regardless.
    fn next_word(&mut self) -> Result<String, WordUnavailable>;
}

impl<W: WordSource + ?Sized> WordSource for Box<W> {
    fn next_word(&mut self) -> Result<String, WordUnavailable> {
        (**self).next_word()
    }
}

/// Built-in word lists
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SupportedLanguage {
    Spanish,
    English,
}

#[derive(Deserialize, Clone, Debug)]
struct LanguageFile {
    name: String,
    words: Vec<String>,
}

/// A fixed vocabulary drawn from at random.
#[derive(Debug, Clone)]
pub struct WordList {
    name: String,
    words: Vec<String>,
    rng: StdRng,
}

impl WordList {
    /// Trims every entry and drops blanks and duplicates.
    pub fn from_words<I, S>(name: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .unique()
            .collect();
        Self {
            name: name.into(),
            words,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn builtin(language: SupportedLanguage) -> Result<Self, WordUnavailable> {
        let file_name = format!("{language}.json");
        let file = LANG_DIR
            .get_file(&file_name)
            .ok_or_else(|| WordUnavailable::new(format!("missing word list {file_name}")))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| WordUnavailable::new(format!("{file_name} is not valid utf-8")))?;
        let parsed: LanguageFile = serde_json::from_str(contents)
            .map_err(|e| WordUnavailable::new(format!("{file_name}: {e}")))?;
        Ok(Self::from_words(parsed.name, parsed.words))
    }

    /// Reads a newline-separated list of words.
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "custom".to_string());
        Ok(Self::from_words(name, contents.lines()))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }
}

impl WordSource for WordList {
    fn next_word(&mut self) -> Result<String, WordUnavailable> {
        self.words
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| WordUnavailable::new(format!("word list {} is empty", self.name)))
    }
}

/// Runs a word source on a worker thread and waits at most `timeout` per word.
///
/// A reply that arrives after its request timed out is dropped when the next
/// request is made.
pub struct BoundedWordSource {
    requests: Sender<u64>,
    replies: Receiver<(u64, Result<String, WordUnavailable>)>,
    timeout: Duration,
    sequence: u64,
}

impl BoundedWordSource {
    pub fn spawn<W>(mut source: W, timeout: Duration) -> Self
    where
        W: WordSource + Send + 'static,
    {
        let (requests, request_rx) = mpsc::channel::<u64>();
        let (reply_tx, replies) = mpsc::channel();

        thread::spawn(move || {
            for seq in request_rx {
                if reply_tx.send((seq, source.next_word())).is_err() {
                    break;
                }
            }
        });

        Self {
            requests,
            replies,
            timeout,
            sequence: 0,
        }
    }
}

impl WordSource for BoundedWordSource {
    fn next_word(&mut self) -> Result<String, WordUnavailable> {
        self.sequence += 1;
        let seq = self.sequence;
        self.requests
            .send(seq)
            .map_err(|_| WordUnavailable::new("word source worker has stopped"))?;

        let deadline = Instant::now() + self.timeout;
        loop {
            let wait = deadline.saturating_duration_since(Instant::now());
            match self.replies.recv_timeout(wait) {
                Ok((reply_seq, result)) if reply_seq == seq => return result,
                Ok((late, _)) => {
                    tracing::debug!(late, current = seq, "discarding late word reply");
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(WordUnavailable::new(format!(
                        "word source did not answer within {}ms",
                        self.timeout.as_millis()
                    )));
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(WordUnavailable::new("word source worker has stopped"));
                }
            }
        }
    }
}
