//! Email delivery backends

pub mod console;
pub mod smtp;
