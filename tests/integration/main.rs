//! Integration tests for the `logwrap` library and binary.

mod call_location;
mod cli;
mod decorate;
