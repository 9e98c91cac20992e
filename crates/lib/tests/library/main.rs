mod common;
mod import_tests;
mod stdlib_tests;
