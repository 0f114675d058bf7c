//! Integration tests for urlsdigest
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! HTTP engine, full digest runs and the command-line binary.

mod cli_tests;
mod common;
mod digest_tests;
mod fetch_tests;
