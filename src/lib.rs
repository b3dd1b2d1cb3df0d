//! Functional Tester - declarative functional test orchestration
//!
//! A suite is described as data: global setup actions, batches of tests and
//! global teardown actions. Each action names a registered executor, its
//! parameters and an expected response or error, with optional retries.
//!
//! ## Layout
//!
//! - [`models`]: configuration and result types (camelCase JSON)
//! - [`compare`]: expected-versus-actual value comparison
//! - [`actions`]: executor trait, registry and built-in executors
//! - [`validation`]: configuration validation with scoped messages
//! - [`runner`]: action, test, batch and suite runners
//! - [`worker`]: channel used to hand a batch to a worker
//! - [`config`], [`results`], [`output`]: settings, result sink, rendering

pub mod actions;
pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod output;
pub mod results;
pub mod runner;
pub mod utils;
pub mod validation;
pub mod worker;
