mod config_tests;
mod stream_tests;
