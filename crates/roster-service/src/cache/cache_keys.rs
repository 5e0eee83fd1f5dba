//! Cache key derivation for consistent key naming.
//!
//! A key is either the request path of a route with no identifying
//! parameters (`/users`, `/data`) or a route-specific prefix followed by the
//! identifying parameter values, joined with [`KEY_SEPARATOR`]
//! (`user_data::7`).

use roster_core::UserId;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Separator between a key prefix and its parameters.
pub const KEY_SEPARATOR: &str = "::";

/// Prefix for the per-user view.
pub const USER_DATA_PREFIX: &str = "user_data";

/// A derived cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Uses a route path verbatim as the key.
    #[must_use]
    pub fn from_path(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Joins `prefix` and `parts` with [`KEY_SEPARATOR`].
    #[must_use]
    pub fn from_parts<I, S>(prefix: &str, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut key = prefix.to_string();
        for part in parts {
            key.push_str(KEY_SEPARATOR);
            key.push_str(part.as_ref());
        }
        Self(key)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of the cached view for one user.
#[must_use]
pub fn user_data(id: UserId) -> CacheKey {
    CacheKey::from_parts(USER_DATA_PREFIX, [id.to_string()])
}

/// Request facts a key function may draw on.
#[derive(Debug, Clone, Default)]
pub struct KeyContext {
    /// Request path, without query string.
    pub path: String,
    /// Matched path parameters in declaration order.
    pub params: Vec<(String, String)>,
    /// Raw query string, if any.
    pub query: Option<String>,
}

impl KeyContext {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Looks up a path parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Derives a key from a request.
pub type KeyFn = Arc<dyn Fn(&KeyContext) -> CacheKey + Send + Sync>;

/// How a cacheable route is keyed and how long its entries live.
#[derive(Clone)]
pub struct CachePolicy {
    key_fn: KeyFn,
    ttl: Duration,
}

impl CachePolicy {
    #[must_use]
    pub fn new(key_fn: KeyFn, ttl: Duration) -> Self {
        Self { key_fn, ttl }
    }

    /// Keys entries by request path. The query string is ignored.
    #[must_use]
    pub fn route_path(ttl: Duration) -> Self {
        Self::new(Arc::new(|ctx: &KeyContext| CacheKey::from_path(ctx.path.clone())), ttl)
    }

    /// Keys entries by `prefix` and the values of the named path parameters,
    /// each passed through `normalize` so equivalent spellings of one value
    /// share an entry. Missing parameters normalize from `""`.
    #[must_use]
    pub fn prefixed(
        prefix: &'static str,
        params: &'static [&'static str],
        normalize: fn(&str) -> String,
        ttl: Duration,
    ) -> Self {
        Self::new(
            Arc::new(move |ctx: &KeyContext| {
                CacheKey::from_parts(
                    prefix,
                    params
                        .iter()
                        .map(|name| normalize(ctx.param(name).unwrap_or_default())),
                )
            }),
            ttl,
        )
    }

    #[must_use]
    pub fn key_for(&self, ctx: &KeyContext) -> CacheKey {
        (self.key_fn)(ctx)
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl fmt::Debug for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachePolicy")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
