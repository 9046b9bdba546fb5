use std::{cmp::Ordering, hash::Hash};

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    invariants::{ClientAddress, Endpoint},
    models::LogEntry,
};

pub const DEFAULT_SUMMARY_LIMIT: usize = 3;

/// Hit counts per key. Keys are kept in first-seen order, which is what
/// breaks ties when ranking.
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    counts: IndexMap<K, u64>,
}

impl<K> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self {
            counts: IndexMap::new(),
        }
    }
}

struct Ranked<'a, K> {
    seen: usize,
    key: &'a K,
    count: u64,
}

fn by_rank<K>(a: &Ranked<'_, K>, b: &Ranked<'_, K>) -> Ordering {
    b.count.cmp(&a.count).then(a.seen.cmp(&b.seen))
}

impl<K: Hash + Eq + Clone> FrequencyTable<K> {
    pub fn record(&mut self, key: &K) {
        match self.counts.get_mut(key) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(key.clone(), 1);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn count(&self, key: &K) -> u64 {
        self.counts.get(key).copied().unwrap_or_default()
    }

    /// The `n` most frequent keys, highest count first.
    pub fn top(&self, n: usize) -> Vec<&K> {
        if n == 0 {
            return Vec::new();
        }
        let mut ranked: Vec<_> = self
            .counts
            .iter()
            .enumerate()
            .map(|(seen, (key, count))| Ranked {
                seen,
                key,
                count: *count,
            })
            .collect();
        if n < ranked.len() {
            ranked.select_nth_unstable_by(n - 1, by_rank);
            ranked.truncate(n);
        }
        ranked.sort_unstable_by(by_rank);
        ranked.into_iter().map(|r| r.key).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub unique_visitors: usize,
    pub top_active_visitors: Vec<String>,
    pub top_visited_urls: Vec<String>,
}

/// Rolling visitor and endpoint counts over a stream of parsed entries.
///
/// Memory grows with the number of distinct addresses and endpoints, never
/// with the number of entries added.
#[derive(Debug, Default)]
pub struct Analytics {
    visitors: FrequencyTable<ClientAddress>,
    endpoints: FrequencyTable<Endpoint>,
}

impl Analytics {
    pub fn add_log(&mut self, entry: &LogEntry) {
        self.visitors.record(&entry.client_address);
        self.endpoints.record(&entry.request.endpoint);
    }

    pub fn unique_visitors(&self) -> usize {
        self.visitors.len()
    }

    pub fn visits(&self, address: &ClientAddress) -> u64 {
        self.visitors.count(address)
    }

    pub fn hits(&self, endpoint: &Endpoint) -> u64 {
        self.endpoints.count(endpoint)
    }

    /// Snapshot of the current tables. Equal counts keep first-seen order.
    pub fn summary(&self, limit: usize) -> Summary {
        Summary {
            unique_visitors: self.unique_visitors(),
            top_active_visitors: self
                .visitors
                .top(limit)
                .into_iter()
                .map(ToString::to_string)
                .collect(),
            top_visited_urls: self
                .endpoints
                .top(limit)
                .into_iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}
