//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every route. Access control
//! lives with the HTTP adapter because it reads the route policy table.

pub mod trace;

pub use trace::Trace;
