//! Age calculator: validates a birth date and works out how long ago it was.
//!
//! The core (`validate`, `age`, `stats`) is pure and takes the reference
//! instant as a parameter. The remaining modules are the terminal front end.

pub mod age;
pub mod ascii;
pub mod cli;
pub mod display;
pub mod form;
pub mod schedule;
pub mod stats;
pub mod svg;
pub mod validate;
