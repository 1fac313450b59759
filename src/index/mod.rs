mod page;
mod render;

pub use page::{IndexEntry, IndexPage, build_entry, build_index};
pub use render::{INDEX_FILENAME, format_timestamp, render_index, write_index};
