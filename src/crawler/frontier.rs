//! Crawl frontier
//!
//! This module handles:
//! - FIFO ordering of discovered-but-unvisited URLs
//! - Tracking which URLs are queued so each is enqueued at most once
//! - Tracking which URLs have been visited so none is processed twice

use std::collections::{HashSet, VecDeque};
use url::Url;

/// Breadth-first frontier with visited tracking
///
/// URLs are keyed by their string form, so callers should normalize them
/// before pushing.
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs waiting to be visited, in discovery order
    queue: VecDeque<Url>,

    /// Keys of URLs currently in `queue`
    queued: HashSet<String>,

    /// Keys of URLs already dequeued and visited
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier seeded with a single URL
    pub fn new(seed: Url) -> Self {
        let mut frontier = Self::default();
        frontier.push(seed);
        frontier
    }

    /// Enqueues a URL unless it was already visited or queued
    ///
    /// Returns true if the URL was added.
    pub fn push(&mut self, url: Url) -> bool {
        let key = url.as_str();
        if self.visited.contains(key) || self.queued.contains(key) {
            return false;
        }
        self.queued.insert(key.to_string());
        self.queue.push_back(url);
        true
    }

    /// Dequeues the next unvisited URL and marks it visited
    ///
    /// Returns `None` once the queue is empty.
    pub fn next_unvisited(&mut self) -> Option<Url> {
        while let Some(url) = self.queue.pop_front() {
            let key = url.as_str().to_string();
            self.queued.remove(&key);
            if self.visited.insert(key) {
                return Some(url);
            }
            tracing::trace!("Skipping already visited {}", url);
        }
        None
    }

    /// Marks a URL visited without dequeuing it
    ///
    /// Returns false if it was already visited. A queued copy is skipped when
    /// it reaches the front.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(url.as_str().to_string())
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    pub fn is_queued(&self, url: &Url) -> bool {
        self.queued.contains(url.as_str())
    }

    /// Number of URLs waiting in the queue
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of distinct URLs dequeued so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
