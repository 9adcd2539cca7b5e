#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub mod convert;
pub mod error;
pub mod msgpack;
pub mod util;
