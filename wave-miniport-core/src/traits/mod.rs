pub mod adapter_common;
pub mod hardware;
pub mod port;
