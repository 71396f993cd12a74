use std::fmt;
use std::path::PathBuf;

use crate::grammar::Rule;

/// Semantic errors raised by the code-generation engine: a duplicate
/// function name, or a field dereference naming a field outside the
/// whitelist.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CompileError {
    DuplicateFunction(String),
    UnknownField(String),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::DuplicateFunction(name) => {
                write!(f, "function {} already exists", name)
            }
            CompileError::UnknownField(name) => write!(f, "invalid field name: {}", name),
        }
    }
}

impl std::error::Error for CompileError {}

/// Top-level error type for the compiler library: a small hand-rolled
/// enum with manual `From` impls rather than `thiserror`, distinguishing
/// lexical/syntactic, semantic, and resource (I/O) failures.
#[derive(Debug)]
pub enum Error {
    /// Lexical/syntactic: the grammar driver rejected the input.
    Syntax(Box<pest::error::Error<Rule>>),
    /// Semantic: duplicate function, unknown field.
    Compile(CompileError),
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
            Error::Syntax(err) => write!(f, "parse error:\n{}", err),
            Error::Compile(err) => write!(f, "error: {}", err),
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

impl From<pest::error::Error<Rule>> for Error {
    fn from(err: pest::error::Error<Rule>) -> Self {
        Error::Syntax(Box::new(err))
    }
}

impl From<CompileError> for Error {
    fn from(err: CompileError) -> Self {
        Error::Compile(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
