//! Command-line error types.

use derive_more::{Display, Error};
use std::path::PathBuf;

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("could not open the library at {}", _0.display())]
    Open(#[error(not(source))] PathBuf),
    #[display("command failed")]
    Command,
    #[display("could not read {}", _0.display())]
    ReadInput(#[error(not(source))] PathBuf),
    #[display("could not write output")]
    Output,
}
