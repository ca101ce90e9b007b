//! Transport layer entry points

pub mod http;
