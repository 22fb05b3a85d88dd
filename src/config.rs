// ============================================================================
// CONFIGURATION
// ============================================================================
//
// Description:
//   Charge la configuration du serveur depuis les variables d'environnement
//   (fichier .env chargé par dotenv dans main.rs).
//
// Variables:
//   - DATABASE_URL (obligatoire)
//   - DB_MAX_CONNECTIONS (défaut 10)
//   - DB_CONNECT_TIMEOUT_SECS (défaut 8)
//   - JWT_SECRET_KEY (défaut INSECURE + warning)
//   - JWT_ALGORITHM (défaut HS256, HMAC seulement)
//   - JWT_EXPIRES_IN (défaut "1h" ; formats: 3600, 30s, 15m, 1h, 7d)
//   - SERVER_HOST (défaut 127.0.0.1)
//   - SERVER_PORT (défaut 8080)
//
// ============================================================================

use std::env;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use thiserror::Error;

const DEFAULT_JWT_SECRET: &str = "default-insecure-key-change-this";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set in .env file")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub expires_in: chrono::Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

impl Config {
    /// Lit la configuration depuis l'environnement du processus
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construit la configuration à partir d'une fonction de lecture clé → valeur
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let max_connections = parse_or("DB_MAX_CONNECTIONS", lookup("DB_MAX_CONNECTIONS"), 10u32)?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS",
                reason: "must be at least 1".to_string(),
            });
        }
        let connect_timeout_secs = parse_or("DB_CONNECT_TIMEOUT_SECS", lookup("DB_CONNECT_TIMEOUT_SECS"), 8u64)?;

        let secret = match lookup("JWT_SECRET_KEY").filter(|v| !v.is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET_KEY not found in .env, using default (INSECURE)");
                DEFAULT_JWT_SECRET.to_string()
            }
        };

        let algorithm = match lookup("JWT_ALGORITHM") {
            Some(raw) => parse_hmac_algorithm(&raw)?,
            None => Algorithm::HS256,
        };

        let expires_in = match lookup("JWT_EXPIRES_IN") {
            Some(raw) => {
                let expires_in = parse_duration(&raw).ok_or_else(|| ConfigError::Invalid {
                    var: "JWT_EXPIRES_IN",
                    reason: format!("'{}' is not a duration (expected e.g. 3600, 15m, 1h, 7d)", raw),
                })?;
                // l'expiration doit rester une date représentable
                if chrono::Utc::now().checked_add_signed(expires_in).is_none() {
                    return Err(ConfigError::Invalid {
                        var: "JWT_EXPIRES_IN",
                        reason: format!("'{}' is too far in the future", raw),
                    });
                }
                expires_in
            }
            None => chrono::Duration::hours(1),
        };

        let host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or("SERVER_PORT", lookup("SERVER_PORT"), 8080u16)?;

        Ok(Config {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url,
                max_connections,
                connect_timeout: Duration::from_secs(connect_timeout_secs),
            },
            jwt: JwtConfig {
                secret,
                algorithm,
                expires_in,
            },
        })
    }
}

fn parse_or<T: FromStr>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
            var,
            reason: format!("'{}' is not a valid number", value),
        }),
    }
}

/// Seuls les algorithmes HMAC fonctionnent avec un secret partagé
fn parse_hmac_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    let algorithm = Algorithm::from_str(raw.trim()).map_err(|_| ConfigError::Invalid {
        var: "JWT_ALGORITHM",
        reason: format!("unknown algorithm '{}'", raw),
    })?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => Err(ConfigError::Invalid {
            var: "JWT_ALGORITHM",
            reason: format!("{:?} needs a key pair, only HS256/HS384/HS512 are supported", other),
        }),
    }
}

/// Parse une durée du type "3600", "30s", "15m", "1h", "7d"
pub fn parse_duration(raw: &str) -> Option<chrono::Duration> {
    let raw = raw.trim();
    let split = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    let amount: i64 = digits.parse().ok()?;

    match unit.trim() {
        "" | "s" => chrono::Duration::try_seconds(amount),
        "m" => chrono::Duration::try_minutes(amount),
        "h" => chrono::Duration::try_hours(amount),
        "d" => chrono::Duration::try_days(amount),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/clinic")])).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.connect_timeout, Duration::from_secs(8));
        assert_eq!(config.jwt.algorithm, Algorithm::HS256);
        assert_eq!(config.jwt.expires_in, chrono::Duration::hours(1));
        assert_eq!(config.jwt.secret, DEFAULT_JWT_SECRET);
    }

    #[test]
    fn test_database_url_required() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/clinic"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("JWT_SECRET_KEY", "s3cret"),
            ("JWT_ALGORITHM", "HS512"),
            ("JWT_EXPIRES_IN", "15m"),
            ("SERVER_PORT", "3000"),
        ]))
        .unwrap();

        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.jwt.secret, "s3cret");
        assert_eq!(config.jwt.algorithm, Algorithm::HS512);
        assert_eq!(config.jwt.expires_in, chrono::Duration::minutes(15));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_rejects_asymmetric_algorithm() {
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/clinic"),
            ("JWT_ALGORITHM", "RS256"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { var: "JWT_ALGORITHM", .. })));
    }

    #[test]
    fn test_rejects_bad_port() {
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/clinic"),
            ("SERVER_PORT", "http"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { var: "SERVER_PORT", .. })));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("3600"), Some(chrono::Duration::seconds(3600)));
        assert_eq!(parse_duration("30s"), Some(chrono::Duration::seconds(30)));
        assert_eq!(parse_duration("1h"), Some(chrono::Duration::hours(1)));
        assert_eq!(parse_duration("7d"), Some(chrono::Duration::days(7)));
        assert_eq!(parse_duration("1w"), None);
        assert_eq!(parse_duration("h"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("9223372036854775807d"), None);
        assert_eq!(parse_duration("9223372036854775807"), None);
    }

    #[test]
    fn test_rejects_expiry_past_calendar() {
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/clinic"),
            ("JWT_EXPIRES_IN", "100000000d"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { var: "JWT_EXPIRES_IN", .. })));
    }
}
