use chrono_tz::Tz;
use clap::{Args, Parser, ValueEnum};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Database connection URL
    #[arg(long, env = "BUDGET_DATABASE_URL")]
    pub database_url: String,

    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub auth: AuthConfig,

    #[command(flatten)]
    pub rate_limit: RateLimitConfig,

    #[command(flatten)]
    pub display: DisplayConfig,

    #[command(flatten)]
    pub expenses: ExpenseConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "BUDGET_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "BUDGET_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Port for the management (health) endpoints
    #[arg(long, env = "BUDGET_MGMT_PORT", default_value_t = 3001)]
    pub mgmt_port: u16,

    /// Seconds to wait for in-flight requests during shutdown
    #[arg(long, env = "BUDGET_SHUTDOWN_TIMEOUT_SECS", default_value_t = 10)]
    pub shutdown_timeout_secs: u64,

    /// Timeout for the readiness database probe
    #[arg(long, env = "BUDGET_HEALTH_DB_TIMEOUT_MS", default_value_t = 2000)]
    pub health_db_timeout_ms: u64,
}

#[derive(Clone, Debug, Args)]
pub struct AuthConfig {
    /// Session time-to-live in days
    #[arg(long, env = "BUDGET_SESSION_TTL_DAYS", default_value_t = 90)]
    pub session_ttl_days: i64,

    /// Name of the session cookie
    #[arg(long, env = "BUDGET_SESSION_COOKIE_NAME", default_value = "budget_session")]
    pub cookie_name: String,

    /// Mark the session cookie Secure (set in production behind TLS)
    #[arg(long, env = "BUDGET_SESSION_COOKIE_SECURE", default_value_t = false)]
    pub cookie_secure: bool,
}

#[derive(Clone, Debug, Args)]
pub struct RateLimitConfig {
    /// Requests per second allowed for standard endpoints
    #[arg(long, env = "BUDGET_RATE_LIMIT_PER_SECOND", default_value_t = 10)]
    pub per_second: u32,

    /// Burst allowance for standard endpoints
    #[arg(long, env = "BUDGET_RATE_LIMIT_BURST", default_value_t = 20)]
    pub burst: u32,

    /// Stricter rate limit for expensive auth-related endpoints (register/sign-in)
    #[arg(long, env = "BUDGET_AUTH_RATE_LIMIT_PER_SECOND", default_value_t = 1)]
    pub auth_per_second: u32,

    /// Burst allowance for expensive auth-related endpoints
    #[arg(long, env = "BUDGET_AUTH_RATE_LIMIT_BURST", default_value_t = 3)]
    pub auth_burst: u32,
}

#[derive(Clone, Debug, Args)]
pub struct DisplayConfig {
    /// IANA timezone used to bucket expenses into calendar months
    #[arg(long, env = "BUDGET_DISPLAY_TIMEZONE", default_value = "America/Winnipeg")]
    pub timezone: Tz,
}

#[derive(Clone, Debug, Args)]
pub struct ExpenseConfig {
    /// Maximum length of an expense note in characters
    #[arg(long, env = "BUDGET_MAX_NOTE_CHARS", default_value_t = 160)]
    pub max_note_chars: usize,

    /// Maximum single expense amount in currency units
    #[arg(long, env = "BUDGET_MAX_AMOUNT", default_value_t = 1_000_000)]
    pub max_amount: u32,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// OTLP endpoint for trace and metric export; telemetry export is disabled when unset
    #[arg(long, env = "BUDGET_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Log output format
    #[arg(long, env = "BUDGET_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
