//! Integration tests for Celeb-Harvest
//!
//! These tests use wiremock to stand in for the upstream APIs and exercise
//! the collection pipeline end-to-end.

mod harvest_tests;
