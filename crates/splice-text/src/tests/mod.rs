//! Unit tests for the text primitives.
