//! Shared upstream fixtures for integration tests
#![allow(dead_code)]

pub mod pages;

pub use pages::*;
