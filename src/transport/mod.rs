//! HTTP transport used to reach the external address lookup service.
//!
//! This module provides:
//! - Request and response value types ([`HttpRequest`], [`HttpResponse`])
//! - An abstraction over HTTP clients ([`HttpClient`])
//! - The production client backed by reqwest ([`ReqwestClient`])

mod client;
mod error;
mod message;


pub use client::ReqwestClient;
pub use error::HttpError;
pub use message::{HttpClient, HttpRequest, HttpResponse};
