//! Runtime adapters: async entry points for tokio callers.

#[cfg(feature = "tokio-runtime")]
pub mod api;
