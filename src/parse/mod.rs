pub mod blob;
pub mod task_parser;

pub use blob::{BlobError, ExportBlob, decode_blob, encode_blob};
pub use task_parser::{distinct_tags, find_tags, parse_priority, split_segments, split_tags, truncate_chars};
