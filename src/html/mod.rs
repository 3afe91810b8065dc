//! Document composition: the interactive HTML page with the diff, the
//! commit metadata and the viewer assets embedded inline.

mod document;
mod escape;

pub use document::{compose, DIFF_CONTAINER_ID};
