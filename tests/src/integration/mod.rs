//! End-to-end pipeline tests.

pub mod pipeline;
