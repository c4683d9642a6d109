//! Unit test suite entry point.

mod error_tests;
mod packing_scenarios;
mod sweep_tests;
