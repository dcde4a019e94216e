//! photomark: the annotation surface used when attaching a marked-up
//! reference photo to a booking request.
//!
//! The crate is headless. A host shell owns the window, toolbar and photo
//! picker; it feeds raw pointer events into an [`editor::EditorSession`],
//! blits the frames [`EditorSession::render`] produces, and receives the
//! flattened markup PNG through its [`editor::AnnotationSink`] when the
//! user saves.
//!
//! [`EditorSession::render`]: editor::EditorSession::render

pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod sticker;
pub mod viewport;

pub use editor::{AnnotationSink, EditorSession, SinkError};
pub use error::EditorError;
