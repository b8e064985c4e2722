use std::env;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const SESSION_TTL_HOURS: &str = "SESSION_TTL_HOURS";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8080;
    pub const DATABASE_URL: &str = "./.db/notes.db";
    pub const SESSION_TTL_HOURS: i64 = 24;
}

pub fn port() -> u16 {
    env::var(env_vars::PORT)
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(defaults::PORT)
}

/// Path of the SQLite database file
pub fn database_url() -> String {
    env::var(env_vars::DATABASE_URL).unwrap_or_else(|_| defaults::DATABASE_URL.to_string())
}

/// How long an auth session lives without activity
pub fn session_ttl_hours() -> i64 {
    env::var(env_vars::SESSION_TTL_HOURS)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults::SESSION_TTL_HOURS)
}
