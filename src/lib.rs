pub mod bls;
mod constants;
mod crypto_tools;
pub mod curve;
pub mod sdk;
