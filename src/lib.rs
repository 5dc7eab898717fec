//! ipwatch: External IP Address Monitor
//!
//! A library for polling a public lookup service for the host's external
//! IP address and keeping an append-only CSV log of every change.

pub mod changelog;
pub mod config;
pub mod monitor;
pub mod notify;
pub mod provider;
pub mod time;
pub mod transport;
