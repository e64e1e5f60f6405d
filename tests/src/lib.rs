//! # Accumulator-Auth Test Suite
//!
//! Unified test crate for cross-module pipeline tests that exercise the
//! processor the way the hosting runtime does: raw payload bytes in,
//! state context at the boundary.
//!
//! ```bash
//! cargo test -p auth-tests
//! cargo test -p auth-tests integration::
//! ```

#![allow(dead_code)]

pub mod integration;
