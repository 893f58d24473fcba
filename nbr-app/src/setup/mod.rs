//! Setup and execution of a lookup run.

pub mod execution;
