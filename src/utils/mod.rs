//! This module aggregates utility submodules used by the event handler and the binary.

/// Channel and voice-state lookups served from the serenity cache.
pub mod cache_lookup;
/// Process signals that trigger a graceful shutdown.
pub mod signals;
