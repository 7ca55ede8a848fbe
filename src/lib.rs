//! QR relay server: clients stream encoded camera frames over TCP, the
//! server scans them for QR codes, and every live client receives the
//! results.
//!
//! The pipeline is lossy. A bounded latest-wins buffer sits between the
//! connection readers and the single detection loop, so a slow detector
//! drops stale frames instead of slowing capture; a slow or broken
//! client is dropped instead of stalling the broadcast.

mod buffer;
mod config;
mod connection;
mod error;
mod hub;
mod server;

pub mod common;
pub mod detect;
pub mod wire;

pub use buffer::FrameBuffer;
pub use config::ServerConfig;
pub use error::{Error, Result};
pub use hub::ClientHub;
pub use server::{QrServer, ServerState};
