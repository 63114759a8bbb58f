// ============================================================================
// lib.rs — Library API (used by the iconforge binary and integration tests)
// ============================================================================

pub mod config;
pub mod deps;
pub mod error;
pub mod icon;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod utils;

pub use config::{Config, IconPaths, DEFAULT_ICO_SIZES, DEFAULT_PNG_SIZE};
pub use deps::{missing_backends, Backend, DependencyStatus, Installer};
pub use error::{IconError, Result};
pub use icon::{convert_png_to_ico, inspect_ico, IconEntry};
pub use pipeline::{Job, PipelineOutcome, Report};
pub use render::convert_svg_to_png;
