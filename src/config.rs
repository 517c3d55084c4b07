//! Runtime configuration.
//!
//! Nothing in the kernel itself — [`Context`](crate::context::Context),
//! [`Actor`](crate::actor::Actor), [`Queue`](crate::queue::Queue) — reads
//! this type; it exists for the CLI harness and for embedders who want one
//! typed place to configure a fleet of contexts, following the same
//! `Config`-struct-with-`Default`-and-`validate` shape the storage
//! configuration in this codebase's lineage uses.

use thiserror::Error;

const DEFAULT_THREAD_NAME_PREFIX: &str = "actor-rt";

/// Typed configuration for wiring up a fleet of [`Context`](crate::context::Context)s.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Number of contexts (loop + worker thread pairs) to create.
    ///
    /// Defaults to the number of available parallelism units reported by the
    /// OS, matching spec.md §6's "Construct N contexts (N ≈ number of
    /// cores)".
    pub contexts: usize,
    /// Prefix used both for the worker OS thread name of each context and
    /// for the index suffix appended to it (e.g. `actor-rt-0`, `actor-rt-1`).
    pub thread_name_prefix: String,
    /// Whether the CLI harness should install a default `tracing` subscriber
    /// on startup. Ignored by library embedders, who are expected to manage
    /// their own subscriber.
    pub install_tracing: bool,
}

impl RuntimeConfig {
    /// Validates this configuration, returning an error describing the
    /// first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.contexts == 0 {
            return Err(ConfigError::ZeroContexts);
        }
        Ok(())
    }

    /// The worker thread name for the `index`-th context.
    pub fn thread_name(&self, index: usize) -> String {
        format!("{}-{}", self.thread_name_prefix, index)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            contexts: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
            install_tracing: true,
        }
    }
}

/// Problems found by [`RuntimeConfig::validate`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `contexts` was zero; a fleet needs at least one loop to run on.
    #[error("`contexts` must be at least 1")]
    ZeroContexts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RuntimeConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.contexts >= 1);
    }

    #[test]
    fn zero_contexts_is_rejected() {
        let mut config = RuntimeConfig::default();
        config.contexts = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroContexts)));
    }

    #[test]
    fn thread_names_are_indexed() {
        let config = RuntimeConfig {
            thread_name_prefix: "worker".to_string(),
            ..RuntimeConfig::default()
        };
        assert_eq!(config.thread_name(0), "worker-0");
        assert_eq!(config.thread_name(3), "worker-3");
    }
}
