//! Contract tests for dynamic_value
//!
//! These tests verify the public operations and the properties callers rely on

mod property_tests;
mod scenario_tests;
