mod filename;
mod writer;

pub use filename::{MIRROR_EXTENSION, MirrorId, is_mirror_file, mirror_filename, mirror_path};
pub use writer::{
    MirrorOutcome, PARTIAL_SUFFIX, content_hash, has_changed, mirror_feed, partial_path,
    write_mirror,
};
