//! Ports (Interfaces)
//!
//! Abstract interfaces through which rendered messages leave the library.
//!
//! Implementations of these traits live in the binaries.

mod sink;

pub use sink::*;
