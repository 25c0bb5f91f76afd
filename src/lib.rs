//! ChatIM Server Core Library
//!
//! Provides the shared infrastructure for IM sub-services: discovery-driven
//! RPC channel management, logging and configuration.

pub mod channel;
pub mod client;
pub mod config;
pub mod error;
pub mod logger;

// Re-exports
pub use channel::{ChannelRef, ServiceChannel, ServiceManager, ServiceNotify};
pub use client::ChannelBuilder;
pub use config::{ChannelConfig, Config, LogConfig, ServiceConfig};
pub use error::{CoreError, Result};
pub use logger::init_logger;
