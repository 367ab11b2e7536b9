//! Works, chapters, and keeping the index in step with the files on disk.
//!
//! ```no_run
//! let mut library = quire_library::Library::open("data")?;
//! library.create_work("Moonlight", "a story")?;
//! library.add_chapter(1, "Ch1", "Hello")?;
//! # Ok::<(), quire_library::error::Error>(())
//! ```

mod code;
pub mod error;
mod library;
mod selector;

pub use crate::code::{CODE_LENGTH, CodeGenerator, RandomCode, generate_code};
pub use crate::error::Target;
pub use crate::library::{Edit, Library, MAX_CODE_ATTEMPTS};
pub use crate::selector::parse_selector;
pub use quire_chapter::ChapterText;
pub use quire_index::{Chapter, Work};
pub use quire_storage::is_valid_code;
