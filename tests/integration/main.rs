//! Integration test driver for `tests/integration/`.
//!
//! Each `mod` below maps to a file that exercises the channel engine
//! end to end over the in-memory store and the scriptable RPC client.

mod catalog_tests;
mod dispatch_tests;
mod mocks;
