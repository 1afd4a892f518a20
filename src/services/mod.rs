//! Built-in service implementations.

pub(crate) mod heartbeat;
pub(crate) mod http;

pub(crate) use heartbeat::HeartbeatService;
pub(crate) use http::HttpService;
