//! Configuration for the Credo credential issuer.
//!
//! This crate provides:
//! - [`ParameterSource`]: the async key-value lookup every deployment wires
//!   to its parameter store
//! - [`CachedParameterSource`]: write-once memoization of resolved values
//! - [`IssuerConfig`]: the explicit configuration object resolved once at
//!   process start and passed into every component constructor
//!
//! There is deliberately no process-wide configuration singleton: callers
//! resolve an [`IssuerConfig`] during startup and share it by `Arc`.

pub mod source;

pub use source::{CachedParameterSource, EnvSource, ParameterSource};

use std::sync::Arc;

/// Error types for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required parameter is absent from the source. Fatal to the owning
    /// component; never retried.
    #[error("Missing configuration parameter: {0}")]
    Missing(String),

    /// A parameter resolved but could not be interpreted.
    #[error("Invalid configuration parameter {name}: {message}")]
    Invalid { name: String, message: String },

    /// The underlying parameter store failed.
    #[error("Parameter source error: {0}")]
    Source(String),
}

/// Convenience result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Parameter names resolved at startup.
pub mod keys {
    /// Name of the session table.
    pub const SESSION_TABLE: &str = "SESSION_TABLE";
    /// Name of the audit-event table the consumer writes into.
    pub const AUDIT_EVENT_TABLE: &str = "AUDIT_EVENT_TABLE";
    /// Session lifetime in seconds.
    pub const SESSION_TTL: &str = "SESSION_TTL";
    /// Authorization-code lifetime in seconds.
    pub const AUTHORIZATION_CODE_TTL: &str = "AUTHORIZATION_CODE_TTL";
    /// Prefix prepended to every audit event name.
    pub const AUDIT_EVENT_PREFIX: &str = "AUDIT_EVENT_PREFIX";
    /// Issuer identity recorded as `component_id` on audit events.
    pub const ISSUER: &str = "ISSUER";
}

/// Authorization-code lifetime applied when the parameter is unset.
pub const DEFAULT_AUTHORIZATION_CODE_TTL_S: i64 = 600;

/// Startup configuration for the credential issuer.
///
/// Resolved once via [`IssuerConfig::load`] and shared by `Arc`; values are
/// immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    /// Session table name.
    pub session_table: String,
    /// Audit-event table name (consumer side).
    pub audit_event_table: String,
    /// Session TTL in seconds.
    pub session_ttl_s: i64,
    /// Authorization-code TTL in seconds.
    pub authorization_code_ttl_s: i64,
    /// Audit event-name prefix, e.g. `IPV_CRI`.
    pub audit_event_prefix: String,
    /// Issuer identity of this service.
    pub issuer: String,
}

impl IssuerConfig {
    /// Resolves every required parameter from `source`.
    ///
    /// Absence of any parameter other than `AUTHORIZATION_CODE_TTL` (which
    /// falls back to [`DEFAULT_AUTHORIZATION_CODE_TTL_S`]) is fatal.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] for an absent required parameter,
    /// [`ConfigError::Invalid`] for an unparsable TTL, and
    /// [`ConfigError::Source`] when the store itself fails.
    pub async fn load(source: &dyn ParameterSource) -> ConfigResult<Self> {
        let config = Self {
            session_table: require(source, keys::SESSION_TABLE).await?,
            audit_event_table: require(source, keys::AUDIT_EVENT_TABLE).await?,
            session_ttl_s: require_ttl(source, keys::SESSION_TTL).await?,
            authorization_code_ttl_s: optional_ttl(
                source,
                keys::AUTHORIZATION_CODE_TTL,
                DEFAULT_AUTHORIZATION_CODE_TTL_S,
            )
            .await?,
            audit_event_prefix: require(source, keys::AUDIT_EVENT_PREFIX).await?,
            issuer: require(source, keys::ISSUER).await?,
        };
        tracing::info!(
            session_table = %config.session_table,
            audit_event_table = %config.audit_event_table,
            session_ttl_s = config.session_ttl_s,
            authorization_code_ttl_s = config.authorization_code_ttl_s,
            "Issuer configuration resolved"
        );
        Ok(config)
    }

    /// Resolves configuration and wraps it for sharing across components.
    pub async fn load_shared(source: &dyn ParameterSource) -> ConfigResult<Arc<Self>> {
        Ok(Arc::new(Self::load(source).await?))
    }
}

async fn require(source: &dyn ParameterSource, name: &str) -> ConfigResult<String> {
    source
        .get(name)
        .await?
        .ok_or_else(|| ConfigError::Missing(name.to_string()))
}

async fn require_ttl(source: &dyn ParameterSource, name: &str) -> ConfigResult<i64> {
    parse_ttl(name, &require(source, name).await?)
}

async fn optional_ttl(
    source: &dyn ParameterSource,
    name: &str,
    default: i64,
) -> ConfigResult<i64> {
    match source.get(name).await? {
        Some(raw) => parse_ttl(name, &raw),
        None => Ok(default),
    }
}

fn parse_ttl(name: &str, raw: &str) -> ConfigResult<i64> {
    let value: i64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name: name.to_string(),
        message: format!("expected integer seconds, got {raw:?}"),
    })?;
    if value <= 0 {
        return Err(ConfigError::Invalid {
            name: name.to_string(),
            message: format!("TTL must be positive, got {value}"),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::source::tests::MapSource;
    use super::*;

    fn full_source() -> MapSource {
        MapSource::new(&[
            (keys::SESSION_TABLE, "session-table"),
            (keys::AUDIT_EVENT_TABLE, "audit-table"),
            (keys::SESSION_TTL, "7200"),
            (keys::AUTHORIZATION_CODE_TTL, "600"),
            (keys::AUDIT_EVENT_PREFIX, "IPV_CRI"),
            (keys::ISSUER, "https://issuer.example"),
        ])
    }

    #[tokio::test]
    async fn test_load_resolves_all_parameters() {
        let config = IssuerConfig::load(&full_source()).await.unwrap();
        assert_eq!(config.session_table, "session-table");
        assert_eq!(config.audit_event_table, "audit-table");
        assert_eq!(config.session_ttl_s, 7200);
        assert_eq!(config.authorization_code_ttl_s, 600);
        assert_eq!(config.audit_event_prefix, "IPV_CRI");
        assert_eq!(config.issuer, "https://issuer.example");
    }

    #[tokio::test]
    async fn test_missing_required_parameter_is_fatal() {
        let source = MapSource::new(&[(keys::SESSION_TABLE, "session-table")]);
        let err = IssuerConfig::load(&source).await.unwrap_err();
        assert!(matches!(err, ConfigError::Missing(name) if name == keys::AUDIT_EVENT_TABLE));
    }

    #[tokio::test]
    async fn test_authorization_code_ttl_defaults() {
        let source = full_source().without(keys::AUTHORIZATION_CODE_TTL);
        let config = IssuerConfig::load(&source).await.unwrap();
        assert_eq!(
            config.authorization_code_ttl_s,
            DEFAULT_AUTHORIZATION_CODE_TTL_S
        );
    }

    #[tokio::test]
    async fn test_non_numeric_ttl_is_invalid() {
        let source = full_source().with(keys::SESSION_TTL, "soon");
        let err = IssuerConfig::load(&source).await.unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name, .. } if name == keys::SESSION_TTL));
    }

    #[tokio::test]
    async fn test_negative_ttl_is_invalid() {
        let source = full_source().with(keys::SESSION_TTL, "-5");
        assert!(IssuerConfig::load(&source).await.is_err());
    }
}
