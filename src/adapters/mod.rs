// Adapters layer: concrete implementations of the domain ports (http, storage, sinks).

pub mod http;
pub mod sink;
pub mod storage;
