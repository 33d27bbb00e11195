//! Frequency counting with a stable ranking order.
//!
//! Rankings sort by count descending and break ties by the value's natural
//! order, so the mode of `["b", "a", "a", "b"]` is `"a"`.

use std::{collections::HashMap, hash::Hash};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked<K> {
    pub value: K,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct FrequencyCounter<K> {
    counts: HashMap<K, usize>,
    total: usize,
}

impl<K> Default for FrequencyCounter<K> {
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
            total: 0,
        }
    }
}

impl<K: Eq + Hash + Ord + Clone> FrequencyCounter<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, value: K) {
        *self.counts.entry(value).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn ranked(&self) -> Vec<Ranked<K>> {
        let mut items = self
            .counts
            .iter()
            .map(|(value, count)| Ranked {
                value: value.clone(),
                count: *count,
            })
            .collect::<Vec<_>>();
        items.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
        items
    }

    /// The `top` most frequent values; `0` keeps everything.
    pub fn top(&self, top: usize) -> Vec<Ranked<K>> {
        let mut items = self.ranked();
        if top > 0 && items.len() > top {
            items.truncate(top);
        }
        items
    }

    pub fn mode(&self) -> Option<K> {
        self.counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(value, _)| value.clone())
    }
}

impl<K: Eq + Hash + Ord + Clone> FromIterator<K> for FrequencyCounter<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut counter = Self::new();
        for value in iter {
            counter.ingest(value);
        }
        counter
    }
}
