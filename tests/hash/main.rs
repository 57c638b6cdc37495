// Test entry point for hash tests
// All digest, walk, report and scan tests organized here

mod digest_tests;
mod error_tests;
