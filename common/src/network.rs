pub mod endpoint;
pub mod flags;
pub mod host;
pub mod packet;
