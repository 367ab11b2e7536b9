pub mod error;
pub mod fs;
mod path;

pub use crate::path::validate as validate_path;
pub use crate::path::{
    CHAPTER_EXTENSION, FALLBACK_STEM, INDEX_FILE_NAME, MAX_STEM_BYTES, chapter_file, chapter_file_stem, index_file,
    is_valid_code, relative_chapter_file, resolve, work_dir,
};
