//! Dictionary store: named, frozen sets of phrases used for indicator features.
//!
//! Dictionaries are loaded once at startup (one phrase per line) and only read
//! afterwards; the store is plain owned data, so a driver can share it across
//! worker threads once loading is done.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;

/// A single named dictionary: an immutable set of normalized phrases.
#[derive(Debug, Clone)]
struct Dictionary {
    id: String,
    phrases: HashSet<String>,
}

/// Registry of named phrase dictionaries.
///
/// Enumeration order is insertion order; re-registering an existing id
/// replaces its phrase set but keeps its position. There is no removal:
/// the store is write-once-at-startup, read-many.
#[derive(Debug, Clone, Default)]
pub struct DictionaryStore {
    entries: Vec<Dictionary>,
}

impl DictionaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dictionary from a file, one phrase per line (trimmed, as-is).
    ///
    /// Returns the id used to identify the dictionary: `id` if given,
    /// otherwise a sequential number scoped to this store.
    pub fn load_path<P: AsRef<Path>>(&mut self, path: P, id: Option<&str>) -> Result<String> {
        self.load_path_with(path, id, |line| line.to_string())
    }

    /// Load a dictionary from a file, applying `normalize` to each line.
    pub fn load_path_with<P, F>(&mut self, path: P, id: Option<&str>, normalize: F) -> Result<String>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> String,
    {
        let file = File::open(path.as_ref())?;
        self.load_reader_with(BufReader::new(file), id, normalize)
    }

    /// Load a dictionary from any buffered reader, applying `normalize` to
    /// each line. The store is left unchanged if reading fails.
    pub fn load_reader_with<R, F>(&mut self, reader: R, id: Option<&str>, normalize: F) -> Result<String>
    where
        R: BufRead,
        F: Fn(&str) -> String,
    {
        let mut phrases = HashSet::new();
        for line in reader.lines() {
            let line = line?;
            phrases.insert(normalize(line.trim()));
        }
        let id = match id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => self.entries.len().to_string(),
        };
        self.insert(id.clone(), phrases);
        Ok(id)
    }

    fn insert(&mut self, id: String, phrases: HashSet<String>) {
        if let Some(existing) = self.entries.iter_mut().find(|d| d.id == id) {
            existing.phrases = phrases;
        } else {
            self.entries.push(Dictionary { id, phrases });
        }
    }

    /// Membership test; false if the id is unknown.
    pub fn contains(&self, id: &str, phrase: &str) -> bool {
        self.entries
            .iter()
            .find(|d| d.id == id)
            .is_some_and(|d| d.phrases.contains(phrase))
    }

    /// All dictionary ids, in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|d| d.id.as_str())
    }

    /// Ids of all dictionaries containing `phrase`, in insertion order.
    pub fn matching_ids(&self, phrase: &str) -> impl Iterator<Item = &str> + '_ {
        let phrase = phrase.to_owned();
        self.entries
            .iter()
            .filter(move |d| d.phrases.contains(&phrase))
            .map(|d| d.id.as_str())
    }

    /// First dictionary (in insertion order) containing `phrase`.
    pub fn first_match(&self, phrase: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|d| d.phrases.contains(phrase))
            .map(|d| d.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
