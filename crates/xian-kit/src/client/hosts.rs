//! Masternode host pool and selection strategies.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

use crate::error::ConfigError;

const SCHEMES: [&str; 2] = ["http://", "https://"];

/// Strategy for picking one host per request.
///
/// Implementations must be safe to call concurrently and must return an
/// index below `len`. `len` is never zero.
pub trait HostSelector: Send + Sync {
    /// Pick the index of the host to use for the next request.
    fn select(&self, len: usize) -> usize;
}

/// Uniform random selection with replacement.
///
/// Every call is an independent draw. No health tracking, no affinity.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl HostSelector for RandomSelector {
    fn select(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Cycles through the hosts in configuration order.
#[derive(Debug, Default)]
pub struct RoundRobinSelector {
    next: AtomicUsize,
}

impl RoundRobinSelector {
    /// Create a selector starting at the first host.
    pub fn new() -> Self {
        Self::default()
    }
}

impl HostSelector for RoundRobinSelector {
    fn select(&self, len: usize) -> usize {
        self.next.fetch_add(1, Ordering::Relaxed) % len
    }
}

/// A validated, non-empty set of masternode URIs.
#[derive(Clone)]
pub struct HostPool {
    hosts: Vec<String>,
    selector: Arc<dyn HostSelector>,
}

impl HostPool {
    /// Validate hosts and build a pool using [`RandomSelector`].
    ///
    /// Each host must start with `http://` or `https://` (any case) and is
    /// stored lowercased, without a trailing slash.
    ///
    /// # Example
    ///
    /// ```
    /// use xian_kit::HostPool;
    ///
    /// let pool = HostPool::new(["HTTPS://Node.Xian.org/"]).unwrap();
    /// assert_eq!(pool.hosts(), ["https://node.xian.org"]);
    /// assert!(HostPool::new(["node.xian.org"]).is_err());
    /// ```
    pub fn new<I, S>(hosts: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hosts = hosts
            .into_iter()
            .map(|h| validate_host(h.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        if hosts.is_empty() {
            return Err(ConfigError::EmptyHosts);
        }

        Ok(Self {
            hosts,
            selector: Arc::new(RandomSelector),
        })
    }

    /// Replace the selection strategy.
    pub fn with_selector(self, selector: impl HostSelector + 'static) -> Self {
        self.with_shared_selector(Arc::new(selector))
    }

    pub(crate) fn with_shared_selector(mut self, selector: Arc<dyn HostSelector>) -> Self {
        self.selector = selector;
        self
    }

    /// Pick a host for one request.
    pub fn select(&self) -> &str {
        let index = self.selector.select(self.hosts.len());
        &self.hosts[index % self.hosts.len()]
    }

    /// All configured hosts, in configuration order.
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Number of configured hosts.
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Always false; an empty pool cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl fmt::Debug for HostPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostPool")
            .field("hosts", &self.hosts)
            .finish()
    }
}

fn validate_host(host: &str) -> Result<String, ConfigError> {
    let normalized = host.trim().to_lowercase();
    let has_scheme = SCHEMES
        .iter()
        .any(|scheme| normalized.len() > scheme.len() && normalized.starts_with(scheme));
    if !has_scheme {
        return Err(ConfigError::MissingScheme(host.to_string()));
    }
    Ok(normalized.trim_end_matches('/').to_string())
}
