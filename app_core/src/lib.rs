//! Composition root for the client core. The visual shell builds one
//! [`app_container::Application`] at startup (after calling
//! `shared_kernel::telemetry::init_telemetry()`), hands its controllers to
//! the screens and drops it on shutdown.

pub mod app_container;
pub mod config;
