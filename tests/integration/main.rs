//! Integration tests
//!
//! Single entry point for all integration tests. Submodules share the stream
//! builders in `helpers`.

mod helpers;

mod cli_test;
mod pipeline_test;
