//! Core record types, question segmentation, pinyin sort keys, and
//! plain-text output for question bank sorting.

pub mod error;
pub mod normalize;
pub mod render;
pub mod sections;
pub mod segment;
pub mod sink;
pub mod table;
pub mod text;
pub mod types;

pub use error::{Error, Result};
pub use normalize::QuestionNormalizer;
pub use render::{Progress, Renderer, ANSWER_LABEL, DEFAULT_TITLE};
pub use sections::{sections, sort_records, Numbered, Section};
pub use segment::{find_answer, segment};
pub use sink::{log_channel, ChannelSink, FacadeSink, LogDrain, LogSink, MemorySink};
pub use table::{ColumnRoles, Table};
pub use text::TextRenderer;
pub use types::{OutputFormat, Record, SortKey, SourceFormat, UNREAD_KEY};
