//! Authentication Service
//!
//! Demonstration accounts, login and session tokens. Tokens are opaque
//! random UUIDs; only their SHA-256 hash is kept in the store.

use std::sync::Arc;

use chrono::{Duration, DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    hash_secret, BusinessError, BusinessResult, Level, NewStudent, OperationContext, Role,
    Student, User,
};
use crate::store::{MemoryStore, SessionRecord};

use super::unavailable;

const SERVICE: &str = "AuthService";

/// Demonstration accounts: (username, password, display name, role)
pub const DEMO_ACCOUNTS: [(&str, &str, &str, Role); 5] = [
    ("admin", "admin123", "Administrateur", Role::Admin),
    ("enseignant", "prof123", "Moussa Ndiaye", Role::Enseignant),
    ("etudiant", "etudiant123", "Awa Diop", Role::Etudiant),
    ("scolarite", "scol123", "Fatou Sarr", Role::Scolarite),
    ("direction", "dir123", "Ibrahima Fall", Role::Direction),
];

/// An authenticated session
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

/// Login, session resolution and demo account seeding
pub struct AuthService {
    store: Arc<MemoryStore>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(store: Arc<MemoryStore>, session_ttl: Duration) -> Self {
        Self { store, session_ttl }
    }

    /// Create one account per role, plus the student record behind the
    /// `etudiant` account. Existing usernames are left untouched.
    pub fn seed_demo_accounts(&self) -> BusinessResult<()> {
        let created = self
            .store
            .write(|t| {
                let mut created = 0;
                for (username, password, display_name, role) in DEMO_ACCOUNTS {
                    if t.user_by_username(username).is_some() {
                        continue;
                    }

                    let id = t.next_user_id();
                    let mut user = User::new(id, username, display_name, role, password);

                    if role == Role::Etudiant {
                        let student_id = t.next_student_id();
                        let now = Utc::now();
                        let student = Student::create(student_id, demo_student(), now);
                        t.students.insert(student_id, student);
                        user = user.with_student(student_id);
                    }

                    t.users.insert(id, user);
                    created += 1;
                }
                created
            })
            .map_err(unavailable(SERVICE))?;

        tracing::info!(created, "Demo accounts seeded");
        Ok(())
    }

    /// Check credentials and open a session
    pub fn login(&self, username: &str, password: &str) -> BusinessResult<Session> {
        let username = username.trim();
        if username.is_empty() {
            return Err(BusinessError::validation("username", "champ obligatoire"));
        }
        if password.is_empty() {
            return Err(BusinessError::validation("password", "champ obligatoire"));
        }

        let token = Uuid::new_v4().simple().to_string();
        let now = Utc::now();
        let expires_at = now + self.session_ttl;

        let user = self
            .store
            .write(|t| {
                let purged = t.purge_expired_sessions(now);
                if purged > 0 {
                    tracing::debug!(purged, "Expired sessions purged");
                }

                let user = t
                    .user_by_username(username)
                    .filter(|u| u.verify_password(password))
                    .cloned()?;

                t.sessions.insert(
                    hash_secret(&token),
                    SessionRecord {
                        user_id: user.id,
                        created_at: now,
                        expires_at,
                    },
                );
                Some(user)
            })
            .map_err(unavailable(SERVICE))?;

        match user {
            Some(user) => {
                tracing::info!(user_id = user.id, role = %user.role, "Login succeeded");
                Ok(Session {
                    token,
                    user,
                    expires_at,
                })
            }
            None => {
                tracing::warn!(username, "Login failed");
                Err(BusinessError::authentication("Identifiants invalides"))
            }
        }
    }

    /// Look up the session behind a token; expired sessions are dropped
    pub fn resolve(&self, token: &str) -> BusinessResult<Session> {
        let key = hash_secret(token);
        let now = Utc::now();

        let found = self
            .store
            .write(|t| {
                let record = t.sessions.get(&key)?.clone();
                if record.expires_at <= now {
                    t.sessions.remove(&key);
                    return None;
                }
                t.users.get(&record.user_id).cloned().map(|user| (user, record))
            })
            .map_err(unavailable(SERVICE))?;

        let (user, record) =
            found.ok_or_else(|| BusinessError::authentication("Session invalide ou expirée"))?;

        Ok(Session {
            token: token.to_string(),
            user,
            expires_at: record.expires_at,
        })
    }

    /// Close a session; unknown tokens are ignored
    pub fn logout(&self, token: &str) -> BusinessResult<()> {
        let key = hash_secret(token);
        let removed = self
            .store
            .write(|t| t.sessions.remove(&key))
            .map_err(unavailable(SERVICE))?;

        if let Some(record) = removed {
            tracing::info!(
                user_id = record.user_id,
                session_age_secs = (Utc::now() - record.created_at).num_seconds(),
                "Logout"
            );
        }
        Ok(())
    }

    /// The full user record behind the context's actor
    pub fn current_user(&self, context: &OperationContext) -> BusinessResult<User> {
        let actor = context.actor()?;
        self.store
            .read(|t| t.users.get(&actor.user_id).cloned())
            .map_err(unavailable(SERVICE))?
            .ok_or_else(|| BusinessError::not_found("Utilisateur", actor.user_id))
    }
}

fn demo_student() -> NewStudent {
    NewStudent {
        last_name: "Diop".to_string(),
        first_name: "Awa".to_string(),
        email: "awa.diop@etu.univ.example".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(2004, 3, 12).unwrap_or_default(),
        program: "Informatique".to_string(),
        level: Level::L2,
    }
}
