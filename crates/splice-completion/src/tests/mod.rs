//! Tests for the completion engine.

mod support;
