mod file_output_tests;
mod stream_format_tests;
