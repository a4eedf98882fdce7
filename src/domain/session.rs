use crate::domain::user::User;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A stored login. One row per active login; a user signed in from several
/// devices holds several of these concurrently.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// A validated session joined with its owning user.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub session: Session,
    pub user: User,
}

/// The outcome of issuing a session: the raw bearer token handed to the
/// client (never stored) and the matching expiry for the cookie.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
