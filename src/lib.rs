// Public API - topology model, tracing, probing and export
pub mod config;
pub mod error;
pub mod export;
pub mod net;
pub mod probe;
pub mod trace;

// CLI surface consumed by the xprobe binary
pub mod cli;
