//! In-memory store
//!
//! Holds every table in one `RwLock`. Reads and writes go through closures
//! so callers can check and mutate several tables under one lock.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::domain::{Enrollment, Student, User};

use super::StoreError;

/// A live session, keyed by the hash of its token
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub user_id: u64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// All tables plus their id sequences
#[derive(Debug, Default)]
pub struct Tables {
    pub users: BTreeMap<u64, User>,
    pub sessions: HashMap<String, SessionRecord>,
    pub students: BTreeMap<u64, Student>,
    pub enrollments: BTreeMap<u64, Enrollment>,
    last_user_id: u64,
    last_student_id: u64,
    last_enrollment_id: u64,
}

impl Tables {
    pub fn next_user_id(&mut self) -> u64 {
        self.last_user_id += 1;
        self.last_user_id
    }

    pub fn next_student_id(&mut self) -> u64 {
        self.last_student_id += 1;
        self.last_student_id
    }

    pub fn next_enrollment_id(&mut self) -> u64 {
        self.last_enrollment_id += 1;
        self.last_enrollment_id
    }

    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }

    pub fn student_by_email(&self, email: &str) -> Option<&Student> {
        self.students.values().find(|s| s.email == email)
    }

    /// Drop every session whose expiry is not after `now`; returns how many
    pub fn purge_expired_sessions(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.expires_at > now);
        before - self.sessions.len()
    }

    pub fn enrollments_for(&self, student_id: u64) -> impl Iterator<Item = &Enrollment> {
        self.enrollments
            .values()
            .filter(move |e| e.student_id == student_id)
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with shared access to the tables
    pub fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, StoreError> {
        self.ensure_open()?;
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&tables))
    }

    /// Run `f` with exclusive access to the tables
    pub fn write<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> Result<T, StoreError> {
        self.ensure_open()?;
        let mut tables = self.tables.write().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&mut tables))
    }

    /// Reject all further operations
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        tracing::info!("Store closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}
