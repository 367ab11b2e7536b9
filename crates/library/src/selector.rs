//! 1-based positions, as typed by users.

use crate::error::{ErrorKind, Result, Target};
use exn::ResultExt;

/// Parses user input such as `"2"` or `" 2 "` into a 1-based position.
///
/// Only checks that the text is a number; whether it points at anything is
/// checked by the operation it is passed to.
///
/// ```
/// use quire_library::parse_selector;
/// assert_eq!(parse_selector(" 2 ").unwrap(), 2);
/// assert!(parse_selector("two").is_err());
/// ```
pub fn parse_selector(input: &str) -> Result<usize> {
    input.trim().parse::<usize>().or_raise(|| ErrorKind::InvalidSelector(input.to_string()))
}

/// Converts a 1-based `position` into an index into a sequence of `len` items.
pub(crate) fn to_index(target: Target, position: usize, len: usize) -> Result<usize> {
    match position {
        p if (1..=len).contains(&p) => Ok(p - 1),
        _ => exn::bail!(ErrorKind::OutOfRange { target, position, len }),
    }
}
