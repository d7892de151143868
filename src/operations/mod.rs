//! Operations on surfaces, one struct per operation.
//!
//! Each operation is configured through its constructor (and optional
//! `with_*` builders) and run with `execute`.

pub mod query;
pub mod transform;
