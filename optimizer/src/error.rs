use std::fmt;
use std::path::PathBuf;

/// Top-level error type for the optimizer library: the front-end can only
/// fail by rejecting malformed IR text, so this is thinner than
/// `compiler::Error` — no semantic-error variant, since rewriting a
/// well-formed program never fails.
#[derive(Debug)]
pub enum Error {
    /// The input listing doesn't parse, or violates the JTRUE/JFALSE
    /// pairing invariant the rewrite passes depend on.
    Parse(ir::IrError),
    /// Resource: file I/O failure, tagged with what we were doing and which path.
    Io(std::io::Error, IoContext, PathBuf),
}

#[derive(Debug)]
pub enum IoContext {
    ReadInput,
    WriteOutput,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(err) => write!(f, "parse error: {}", err),
            Error::Io(err, context, path) => write!(
                f,
                "{} file \"{}\" failed: {}",
                match context {
                    IoContext::ReadInput => "reading input",
                    IoContext::WriteOutput => "writing output",
                },
                path.display(),
                err
            ),
        }
    }
}

impl std::error::Error for Error {}

impl From<ir::IrError> for Error {
    fn from(err: ir::IrError) -> Self {
        Error::Parse(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
