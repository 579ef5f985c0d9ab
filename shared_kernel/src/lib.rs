pub mod configuration;
pub mod connectivity;
pub mod failure;
pub mod http_client;
pub mod ids;
pub mod telemetry;
