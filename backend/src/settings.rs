//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from `BAZAAR_*` environment variables, matching CLI flags and
//! an optional configuration file. Required values are checked by the
//! accessors so each binary can decide which ones it needs.

use std::fmt;
use std::net::SocketAddr;

use chrono::Duration;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::TokenLifetimes;
use crate::outbound::security::MIN_SECRET_LEN;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Problems with the loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("BAZAAR_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    #[error("BAZAAR_JWT_SECRET must be set")]
    MissingJwtSecret,
    #[error("BAZAAR_JWT_SECRET must be at least {min} bytes")]
    ShortJwtSecret { min: usize },
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },
    #[error("{field} must be a positive number of seconds")]
    NonPositiveTtl { field: &'static str },
}

/// Settings shared by the HTTP server and the admin tooling.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BAZAAR")]
pub struct ServerSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// HS256 signing secret for access and refresh tokens.
    pub jwt_secret: Option<String>,
    /// Access token lifetime in seconds.
    pub access_token_ttl_secs: Option<i64>,
    /// Refresh token lifetime in seconds.
    pub refresh_token_ttl_secs: Option<i64>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Apply embedded migrations before serving.
    pub run_migrations: Option<bool>,
}

impl fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .field("refresh_token_ttl_secs", &self.refresh_token_ttl_secs)
            .field("db_max_connections", &self.db_max_connections)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

impl ServerSettings {
    /// Return the configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| {
            SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            }
        })
    }

    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Return the signing secret, rejecting secrets shorter than
    /// [`MIN_SECRET_LEN`] bytes.
    pub fn jwt_secret(&self) -> Result<Zeroizing<String>, SettingsError> {
        let secret = self
            .jwt_secret
            .as_ref()
            .ok_or(SettingsError::MissingJwtSecret)?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(SettingsError::ShortJwtSecret {
                min: MIN_SECRET_LEN,
            });
        }
        Ok(Zeroizing::new(secret.clone()))
    }

    /// Token lifetimes, defaulting to one hour and one day.
    pub fn token_lifetimes(&self) -> Result<TokenLifetimes, SettingsError> {
        let defaults = TokenLifetimes::default();
        Ok(TokenLifetimes {
            access: ttl(
                self.access_token_ttl_secs,
                "access_token_ttl_secs",
                defaults.access,
            )?,
            refresh: ttl(
                self.refresh_token_ttl_secs,
                "refresh_token_ttl_secs",
                defaults.refresh,
            )?,
        })
    }

    #[must_use]
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Whether pending migrations run at startup; on unless disabled.
    #[must_use]
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }
}

fn ttl(
    seconds: Option<i64>,
    field: &'static str,
    default: Duration,
) -> Result<Duration, SettingsError> {
    match seconds {
        None => Ok(default),
        Some(value) if value > 0 => Ok(Duration::seconds(value)),
        Some(_) => Err(SettingsError::NonPositiveTtl { field }),
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "BAZAAR_BIND_ADDR",
        "BAZAAR_DATABASE_URL",
        "BAZAAR_JWT_SECRET",
        "BAZAAR_ACCESS_TOKEN_TTL_SECS",
        "BAZAAR_REFRESH_TOKEN_TTL_SECS",
        "BAZAAR_DB_MAX_CONNECTIONS",
        "BAZAAR_RUN_MIGRATIONS",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("bazaar")]).expect("config should load")
    }

    fn cleared() -> Vec<(&'static str, Option<String>)> {
        VARS.iter().map(|name| (*name, None)).collect()
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(cleared());

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default address"),
            SocketAddr::from(([0, 0, 0, 0], 8080))
        );
        assert!(settings.run_migrations());
        assert_eq!(settings.db_max_connections(), DEFAULT_DB_MAX_CONNECTIONS);
        assert_eq!(
            settings.token_lifetimes().expect("default lifetimes"),
            TokenLifetimes::default()
        );
        assert_eq!(
            settings.database_url(),
            Err(SettingsError::MissingDatabaseUrl)
        );
        assert_eq!(
            settings.jwt_secret().map(|_| ()),
            Err(SettingsError::MissingJwtSecret)
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let mut vars = cleared();
        for (name, value) in [
            ("BAZAAR_BIND_ADDR", "127.0.0.1:9000"),
            ("BAZAAR_DATABASE_URL", "postgres://bazaar@localhost/bazaar"),
            ("BAZAAR_JWT_SECRET", "an-adequately-long-signing-secret-value"),
            ("BAZAAR_ACCESS_TOKEN_TTL_SECS", "600"),
            ("BAZAAR_DB_MAX_CONNECTIONS", "4"),
            ("BAZAAR_RUN_MIGRATIONS", "false"),
        ] {
            if let Some(slot) = vars.iter_mut().find(|(var, _)| *var == name) {
                slot.1 = Some(value.to_owned());
            }
        }
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("address"),
            SocketAddr::from(([127, 0, 0, 1], 9000))
        );
        assert_eq!(
            settings.database_url(),
            Ok("postgres://bazaar@localhost/bazaar")
        );
        assert!(settings.jwt_secret().is_ok());
        assert!(!settings.run_migrations());
        assert_eq!(settings.db_max_connections(), 4);
        let lifetimes = settings.token_lifetimes().expect("lifetimes");
        assert_eq!(lifetimes.access, Duration::seconds(600));
        assert_eq!(lifetimes.refresh, Duration::days(1));
    }

    #[rstest]
    #[case("short", Err(SettingsError::ShortJwtSecret { min: MIN_SECRET_LEN }))]
    #[case("0123456789abcdef0123456789abcdef", Ok(()))]
    fn jwt_secret_length_is_enforced(
        #[case] secret: &str,
        #[case] expected: Result<(), SettingsError>,
    ) {
        let mut vars = cleared();
        if let Some(slot) = vars.iter_mut().find(|(var, _)| *var == "BAZAAR_JWT_SECRET") {
            slot.1 = Some(secret.to_owned());
        }
        let _guard = lock_env(vars);

        assert_eq!(load_from_empty_args().jwt_secret().map(|_| ()), expected);
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some("true"), true)]
    #[case(Some("false"), false)]
    fn migrations_run_unless_disabled(#[case] value: Option<&str>, #[case] expected: bool) {
        let mut vars = cleared();
        if let Some(slot) = vars
            .iter_mut()
            .find(|(var, _)| *var == "BAZAAR_RUN_MIGRATIONS")
        {
            slot.1 = value.map(str::to_owned);
        }
        let _guard = lock_env(vars);

        assert_eq!(load_from_empty_args().run_migrations(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("-5")]
    fn non_positive_lifetimes_are_rejected(#[case] seconds: &str) {
        let mut vars = cleared();
        if let Some(slot) = vars
            .iter_mut()
            .find(|(var, _)| *var == "BAZAAR_REFRESH_TOKEN_TTL_SECS")
        {
            slot.1 = Some(seconds.to_owned());
        }
        let _guard = lock_env(vars);

        assert_eq!(
            load_from_empty_args().token_lifetimes(),
            Err(SettingsError::NonPositiveTtl {
                field: "refresh_token_ttl_secs"
            })
        );
    }

    #[rstest]
    fn invalid_bind_addresses_are_reported() {
        let mut vars = cleared();
        if let Some(slot) = vars.iter_mut().find(|(var, _)| *var == "BAZAAR_BIND_ADDR") {
            slot.1 = Some("not-an-address".to_owned());
        }
        let _guard = lock_env(vars);

        assert!(matches!(
            load_from_empty_args().bind_addr(),
            Err(SettingsError::InvalidBindAddr { .. })
        ));
    }
}
