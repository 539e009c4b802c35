//! Parameter sources.
//!
//! A [`ParameterSource`] is the boundary to whatever parameter store a
//! deployment uses. Lookups may involve a network round trip, so the trait
//! is async; [`CachedParameterSource`] memoizes successful resolutions for
//! the process lifetime (values are never invalidated in-process).

use async_trait::async_trait;
use dashmap::DashMap;

use crate::{ConfigError, ConfigResult};

/// Async key-value lookup against a parameter store.
#[async_trait]
pub trait ParameterSource: Send + Sync {
    /// Resolves a parameter by name.
    ///
    /// Returns `Ok(None)` when the parameter does not exist; reserve errors
    /// for the store itself failing.
    async fn get(&self, name: &str) -> ConfigResult<Option<String>>;
}

/// Parameter source backed by process environment variables.
///
/// Used in tests and local runs; deployments substitute their parameter
/// store behind the same trait.
#[derive(Debug, Default)]
pub struct EnvSource;

impl EnvSource {
    /// Creates a new environment-backed source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ParameterSource for EnvSource {
    async fn get(&self, name: &str) -> ConfigResult<Option<String>> {
        match std::env::var(name) {
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::Invalid {
                name: name.to_string(),
                message: "environment value is not valid UTF-8".to_string(),
            }),
        }
    }
}

/// Memoizing decorator over any [`ParameterSource`].
///
/// Each key is written at most once, on its first successful resolution,
/// and is safe for concurrent readers afterwards. Failed lookups are not
/// cached, so a transient store outage does not poison the process.
pub struct CachedParameterSource<S> {
    inner: S,
    cache: DashMap<String, Option<String>>,
}

impl<S: ParameterSource> CachedParameterSource<S> {
    /// Wraps `inner` with a process-lifetime cache.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
        }
    }

    /// Number of memoized entries, for diagnostics.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<S: ParameterSource> ParameterSource for CachedParameterSource<S> {
    async fn get(&self, name: &str) -> ConfigResult<Option<String>> {
        if let Some(hit) = self.cache.get(name) {
            return Ok(hit.clone());
        }
        let resolved = self.inner.get(name).await?;
        tracing::debug!(parameter = name, found = resolved.is_some(), "Parameter resolved");
        self.cache
            .entry(name.to_string())
            .or_insert_with(|| resolved.clone());
        Ok(resolved)
    }
}
