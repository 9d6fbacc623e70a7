#[path = "../common/mod.rs"]
mod common;

mod client_tests;
mod merkle_tests;
