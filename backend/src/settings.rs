//! Server settings loaded via OrthoConfig.
//!
//! Values come from `ONBOARDING_*` environment variables, command-line flags
//! or a config file, in OrthoConfig's usual precedence.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_HOST: &str = "0.0.0.0";

/// Runtime configuration of the onboarding server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ONBOARDING")]
pub struct AppSettings {
    /// Interface to bind; defaults to every interface.
    pub host: Option<String>,
    #[ortho_config(default = 3001)]
    pub port: u16,
    /// PostgreSQL URL. Without one the server runs on a seeded in-memory store.
    pub database_url: Option<String>,
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Upper bound on waiting for a pooled connection.
    #[ortho_config(default = 30)]
    pub db_connection_timeout_secs: u64,
    /// Run the full post-join sequence through orientation.
    pub extended_sequence: Option<bool>,
    /// Apply embedded migrations before serving.
    pub run_migrations: Option<bool>,
}

/// Settings that cannot be turned into a server configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid host address {host:?}")]
    InvalidHost { host: String },
}

impl AppSettings {
    /// Configured host, falling back to every interface.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Whether the extended post-join sequence is enabled; off unless set.
    pub fn extended_sequence(&self) -> bool {
        self.extended_sequence.unwrap_or(false)
    }

    /// Whether embedded migrations run at startup; on unless disabled.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Socket address assembled from `host` and `port`.
    ///
    /// # Errors
    /// [`SettingsError::InvalidHost`] when `host` is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host();
        host.parse::<IpAddr>()
            .map(|ip| SocketAddr::new(ip, self.port))
            .map_err(|_| SettingsError::InvalidHost {
                host: host.to_owned(),
            })
    }

    /// Pool settings when a database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url.as_ref().map(|url| {
            PoolConfig::new(url.clone())
                .with_max_size(self.db_max_connections)
                .with_connection_timeout(Duration::from_secs(self.db_connection_timeout_secs))
        })
    }
}

#[cfg(test)]
mod tests {
    //! Settings parsing against a controlled environment.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 7] = [
        "ONBOARDING_HOST",
        "ONBOARDING_PORT",
        "ONBOARDING_DATABASE_URL",
        "ONBOARDING_DB_MAX_CONNECTIONS",
        "ONBOARDING_DB_CONNECTION_TIMEOUT_SECS",
        "ONBOARDING_EXTENDED_SEQUENCE",
        "ONBOARDING_RUN_MIGRATIONS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("onboarding-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.host(), "0.0.0.0");
        assert_eq!(settings.port, 3001);
        assert!(settings.database_url.is_none());
        assert!(settings.pool_config().is_none());
        assert!(!settings.extended_sequence());
        assert!(settings.run_migrations());
        assert_eq!(
            settings.bind_addr().expect("valid default address"),
            SocketAddr::from(([0, 0, 0, 0], 3001))
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("ONBOARDING_HOST", Some("127.0.0.1".to_owned())),
            ("ONBOARDING_PORT", Some("8088".to_owned())),
            (
                "ONBOARDING_DATABASE_URL",
                Some("postgres://localhost/onboarding".to_owned()),
            ),
            ("ONBOARDING_DB_MAX_CONNECTIONS", Some("4".to_owned())),
            ("ONBOARDING_DB_CONNECTION_TIMEOUT_SECS", Some("5".to_owned())),
            ("ONBOARDING_EXTENDED_SEQUENCE", Some("true".to_owned())),
            ("ONBOARDING_RUN_MIGRATIONS", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("valid address"),
            SocketAddr::from(([127, 0, 0, 1], 8088))
        );
        let pool = settings.pool_config().expect("database configured");
        assert_eq!(pool.database_url(), "postgres://localhost/onboarding");
        assert_eq!(pool.max_size(), 4);
        assert_eq!(pool.connection_timeout(), Duration::from_secs(5));
        assert!(settings.extended_sequence());
        assert!(!settings.run_migrations());
    }

    #[rstest]
    #[case(Some("true"), None, true, true)]
    #[case(None, Some("false"), false, false)]
    #[case(Some("false"), Some("true"), false, true)]
    fn boolean_switches_fall_back_independently(
        #[case] extended: Option<&str>,
        #[case] migrations: Option<&str>,
        #[case] expect_extended: bool,
        #[case] expect_migrations: bool,
    ) {
        let _guard = lock_env([
            ("ONBOARDING_EXTENDED_SEQUENCE", extended.map(str::to_owned)),
            ("ONBOARDING_RUN_MIGRATIONS", migrations.map(str::to_owned)),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.extended_sequence(), expect_extended);
        assert_eq!(settings.run_migrations(), expect_migrations);
    }

    #[rstest]
    fn hostnames_are_rejected() {
        let _guard = lock_env([("ONBOARDING_HOST", Some("localhost".to_owned()))]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr(),
            Err(SettingsError::InvalidHost {
                host: "localhost".to_owned()
            })
        );
    }
}
