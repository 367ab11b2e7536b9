//! Work codes: the short random identifiers that name work directories.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Number of characters in a generated code.
pub const CODE_LENGTH: usize = 8;

/// Source of candidate work codes.
///
/// Generators don't need to guarantee uniqueness; the
/// [`Library`](crate::Library) checks every candidate against the index and
/// the storage root and asks again on a collision. Any `FnMut() -> String`
/// is a generator, which keeps tests deterministic.
pub trait CodeGenerator {
    fn generate(&mut self) -> String;
}

/// The default generator, see [`generate_code`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCode;
impl CodeGenerator for RandomCode {
    fn generate(&mut self) -> String {
        generate_code()
    }
}

impl<F: FnMut() -> String> CodeGenerator for F {
    fn generate(&mut self) -> String {
        self()
    }
}

/// Eight characters drawn uniformly from `A-Z`, `a-z` and `0-9`.
pub fn generate_code() -> String {
    rand::rng().sample_iter(Alphanumeric).take(CODE_LENGTH).map(char::from).collect()
}
