use crate::domain::session::{ActiveSession, Session};
use crate::domain::user::User;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A session row joined with its owning user, fetched in one query so a
/// request never observes a session whose user row has vanished.
#[derive(sqlx::FromRow)]
pub(crate) struct ActiveSessionRecord {
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub current_budget: Decimal,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<ActiveSessionRecord> for ActiveSession {
    fn from(record: ActiveSessionRecord) -> Self {
        Self {
            session: Session { user_id: record.user_id, expires_at: record.expires_at },
            user: User {
                id: record.user_id,
                email: record.email,
                name: record.name,
                password_hash: record.password_hash,
                current_budget: record.current_budget,
                created_at: record.created_at,
            },
        }
    }
}
