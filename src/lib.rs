// Library module for hashsum
// Re-exports modules for use in integration tests and external crates

pub mod hash;
