pub mod api;
pub mod key;

pub(crate) mod wire_bytes;
