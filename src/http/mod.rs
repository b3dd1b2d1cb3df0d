//! HTTP client module
//!
//! Used by the HTTP-based action executors and the HTTP worker channel.

mod client;

pub use client::{HttpClient, HttpError, HttpRequest, HttpResponse};
