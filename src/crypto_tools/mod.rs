pub mod message_digest;
pub mod rng;
