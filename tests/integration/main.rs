//! Integration tests for Deepsift
//!
//! These tests use wiremock to stand in for the search endpoint and run the
//! real HTTP fetcher with the proxy disabled.

mod crawl_tests;
