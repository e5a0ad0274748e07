//! Synchronizer and migration tests against a scripted in-memory store

mod fake;
mod migrate;
