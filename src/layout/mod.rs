//! Layout engine components.
//!
//! Leaves first: [`marker`] finds table regions in the template,
//! [`dataset`] reads and classifies records, [`resolver`] reduces all
//! tables to one document page count, [`replicator`] stamps page instances,
//! [`streamer`] pours records into them and [`image`] anchors pictures for
//! filename-valued fields. [`LayoutOptions`] configures all of them.

pub mod dataset;
pub mod image;
pub mod marker;
mod options;
pub mod replicator;
pub mod resolver;
pub mod streamer;

pub use dataset::{DatasetSummary, RecordStream, RowKind};
pub use image::{Embedded, ImageEmbedder};
pub use marker::{Marker, MarkerKind, MarkerLocator, MarkerParser, MarkerSpan};
pub use options::{LayoutOptions, DEFAULT_IMAGE_EXTENSIONS, DEFAULT_IMAGE_PADDING};
pub use replicator::TemplateReplicator;
pub use resolver::resolve_page_count;
pub use streamer::{RowStreamer, StreamReport, StreamState};
