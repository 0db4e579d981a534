//! Session-scoped question identifiers.

use std::collections::HashSet;

use uuid::Uuid;

/// Hands out question ids that are unique within one session.
///
/// Each allocator carries its own random scope, so ids from two sessions
/// never collide and nothing is shared between them.
#[derive(Debug, Clone)]
pub struct QuestionIds {
    scope: String,
    next: u64,
    issued: HashSet<String>,
}

impl QuestionIds {
    pub fn new() -> Self {
        let scope = Uuid::new_v4().simple().to_string();
        Self {
            scope: scope[..8].to_string(),
            next: 0,
            issued: HashSet::new(),
        }
    }

    /// A never-before-issued id.
    pub fn fresh(&mut self) -> String {
        loop {
            self.next += 1;
            let id = format!("{}-q{}", self.scope, self.next);
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }

    /// Keep a supplied id if it is free, otherwise issue a fresh one.
    pub fn claim(&mut self, candidate: &str) -> String {
        let candidate = candidate.trim();
        if !candidate.is_empty() && self.issued.insert(candidate.to_string()) {
            candidate.to_string()
        } else {
            self.fresh()
        }
    }

    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }
}

impl Default for QuestionIds {
    fn default() -> Self {
        Self::new()
    }
}
