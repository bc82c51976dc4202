//! Integration tests for the scan → rank → report pipeline.

mod mock_source;
mod pipeline;
