mod chapter;
mod work;

pub use self::chapter::Chapter;
pub use self::work::Work;
