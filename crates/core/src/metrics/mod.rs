//! Metric definitions and display formatting.
//!
//! - **Registry** (`registry.rs`) - The immutable metric table and its types
//! - **Formatter** (`formatter.rs`) - Per-semantic-type value formatting

pub mod formatter;
pub mod registry;

pub use formatter::{format_for_metric, format_missing, format_value, OVERFLOW_SENTINEL};
pub use registry::{MetricDescriptor, MetricRegistry, PriorityTier, SemanticType};
