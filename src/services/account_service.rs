use crate::config::ExpenseConfig;
use crate::domain::money;
use crate::domain::session::IssuedSession;
use crate::domain::user::User;
use crate::error::{AppError, Result};
use crate::services::session_service::SessionService;
use crate::storage::user_repo::UserRepository;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use opentelemetry::{global, metrics::Counter};
use rand::rngs::OsRng;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Metrics {
    registrations_total: Counter<u64>,
    signins_total: Counter<u64>,
    signouts_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("budget-server");
        Self {
            registrations_total: meter
                .u64_counter("registrations_total")
                .with_description("Total number of successful account registrations")
                .build(),
            signins_total: meter
                .u64_counter("signins_total")
                .with_description("Total number of successful sign-ins")
                .build(),
            signouts_total: meter
                .u64_counter("signouts_total")
                .with_description("Total number of sign-outs")
                .build(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccountService {
    user_repo: UserRepository,
    session_service: SessionService,
    max_budget: Decimal,
    metrics: Metrics,
}

impl AccountService {
    #[must_use]
    pub fn new(user_repo: UserRepository, session_service: SessionService, limits: &ExpenseConfig) -> Self {
        Self {
            user_repo,
            session_service,
            max_budget: Decimal::from(limits.max_amount),
            metrics: Metrics::new(),
        }
    }

    /// Creates an account and signs it in. Email addresses are normalized
    /// to lowercase before the uniqueness check so `A@b.com` and `a@b.com`
    /// cannot coexist.
    #[tracing::instrument(skip(self, email, password, name), fields(user_id = tracing::field::Empty), err(level = "warn"))]
    pub async fn register(&self, email: &str, password: &str, name: Option<&str>) -> Result<(User, IssuedSession)> {
        let email = normalize_email(email);
        validate_credentials(&email, password)?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("An account with that email already exists".to_string()));
        }

        let password_hash = hash_password(password).await?;
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        let user = self
            .user_repo
            .create(&email, name, &password_hash)
            .await
            .map_err(map_duplicate_email)?;

        tracing::Span::current().record("user_id", tracing::field::display(user.id));

        let issued = self.session_service.create_session(user.id).await?;
        self.metrics.registrations_total.add(1, &[]);
        Ok((user, issued))
    }

    /// Verifies credentials and establishes a session. The browser's
    /// existing session, if any, is deleted first so switching accounts
    /// cannot leave the old token valid.
    ///
    /// Unknown email and wrong password take the same branch and produce
    /// the same error, so responses cannot be used to enumerate accounts.
    #[tracing::instrument(skip_all, fields(user_id = tracing::field::Empty), err(level = "warn"))]
    pub async fn sign_in(&self, email: &str, password: &str, existing_token: Option<&str>) -> Result<(User, IssuedSession)> {
        let email = normalize_email(email);

        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            tracing::warn!("Sign-in failed: unknown email");
            return Err(AppError::AuthError);
        };

        tracing::Span::current().record("user_id", tracing::field::display(user.id));

        if !verify_password(password, &user.password_hash).await? {
            tracing::warn!("Sign-in failed: invalid password");
            return Err(AppError::AuthError);
        }

        // Delete-then-create. Not atomic against a concurrent sign-in from
        // another tab; the momentary second session is accepted.
        if let Some(token) = existing_token {
            self.session_service.delete_session(token).await?;
        }

        let issued = self.session_service.create_session(user.id).await?;
        self.metrics.signins_total.add(1, &[]);
        Ok((user, issued))
    }

    /// Revokes the browser's session. No-op without a token.
    #[tracing::instrument(err, skip_all)]
    pub async fn sign_out(&self, token: Option<&str>) -> Result<()> {
        if let Some(token) = token {
            self.session_service.delete_session(token).await?;
            self.metrics.signouts_total.add(1, &[]);
        }
        Ok(())
    }

    /// Replaces the user's monthly budget with a validated amount.
    #[tracing::instrument(err, skip(self, raw_amount), fields(user_id = %user_id))]
    pub async fn update_budget(&self, user_id: Uuid, raw_amount: &str) -> Result<Decimal> {
        let budget = money::parse_budget(raw_amount, self.max_budget).map_err(AppError::BadRequest)?;

        if self.user_repo.update_budget(user_id, budget).await? == 0 {
            return Err(AppError::NotFound);
        }

        Ok(budget)
    }
}

/// The pre-insert lookup in `register` races with concurrent registrations
/// for the same address; the database unique constraint is the authority,
/// so a unique violation on insert reports the same conflict as the lookup.
fn map_duplicate_email(err: AppError) -> AppError {
    match err {
        AppError::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            AppError::Conflict("An account with that email already exists".to_string())
        }
        other => other,
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("Enter a valid email address".to_string()));
    }
    if password.len() < 6 {
        return Err(AppError::BadRequest("Passwords need at least 6 characters".to_string()));
    }
    if password.len() > 128 {
        return Err(AppError::BadRequest("Passwords are capped at 128 characters".to_string()));
    }
    Ok(())
}

async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| AppError::Internal)
            .map(|h| h.to_string())
    })
    .await
    .map_err(|_| AppError::Internal)?
}

async fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let password = password.to_string();
    let password_hash = password_hash.to_string();
    tokio::task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&password_hash).map_err(|_| AppError::Internal)?;
        Ok(Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_ok())
    })
    .await
    .map_err(|_| AppError::Internal)?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn password_hashing_round_trips() {
        let password = "password12345";
        let hash = hash_password(password).await.expect("hash");

        assert!(verify_password(password, &hash).await.expect("verify"));
        assert!(!verify_password("wrong_password", &hash).await.expect("verify"));
    }

    #[test]
    fn email_normalization_lowercases_and_trims() {
        assert_eq!(normalize_email(" Casey@Example.COM "), "casey@example.com");
        assert_eq!(normalize_email("casey@example.com"), "casey@example.com");
    }

    #[derive(Debug)]
    struct StubDbError {
        unique: bool,
    }

    impl std::fmt::Display for StubDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "stub database error")
        }
    }

    impl std::error::Error for StubDbError {}

    impl sqlx::error::DatabaseError for StubDbError {
        fn message(&self) -> &str {
            "stub database error"
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            if self.unique {
                sqlx::error::ErrorKind::UniqueViolation
            } else {
                sqlx::error::ErrorKind::Other
            }
        }
    }

    #[test]
    fn duplicate_email_insert_maps_to_conflict() {
        let duplicate = AppError::Database(sqlx::Error::Database(Box::new(StubDbError { unique: true })));
        assert!(matches!(map_duplicate_email(duplicate), AppError::Conflict(_)));

        let unrelated = AppError::Database(sqlx::Error::Database(Box::new(StubDbError { unique: false })));
        assert!(matches!(map_duplicate_email(unrelated), AppError::Database(_)));

        assert!(matches!(map_duplicate_email(AppError::NotFound), AppError::NotFound));
    }

    #[test]
    fn credential_validation_bounds() {
        assert!(validate_credentials("casey@example.com", "secret1").is_ok());
        assert!(validate_credentials("not-an-email", "secret1").is_err());
        assert!(validate_credentials("", "secret1").is_err());
        assert!(validate_credentials("casey@example.com", "short").is_err());
        assert!(validate_credentials("casey@example.com", &"x".repeat(129)).is_err());
    }
}
