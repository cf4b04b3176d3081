mod common;
mod extraction_tests;
mod pipeline_tests;
