//! Integration tests for castdoc

mod helpers;

mod cli_test;
mod pipeline_test;
mod process_test;
mod show_test;
