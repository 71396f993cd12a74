use std::fmt;

/// Errors produced while reading the textual IR back in.
///
/// Hand-rolled rather than built on `thiserror`: the error surface here is
/// small enough that a manual `Display` costs nothing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum IrError {
    /// The GOT/code text could not be parsed at all.
    Syntax(String),
    /// A mnemonic token isn't one of the twelve in the closed opcode set.
    UnknownMnemonic(String),
    /// A JTRUE at offset `i` was not immediately followed by a JFALSE at
    /// `i + 1`.
    UnpairedJtrue { jtrue_offset: u32 },
    /// A jump or GOT entry targets an offset outside `[0, instruction_count)`.
    TargetOutOfRange { target: u32, instruction_count: u32 },
}

impl fmt::Display for IrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrError::Syntax(msg) => write!(f, "malformed IR: {}", msg),
            IrError::UnknownMnemonic(m) => write!(f, "unknown mnemonic: {}", m),
            IrError::UnpairedJtrue { jtrue_offset } => write!(
                f,
                "VM_JTRUE at offset {} is not immediately followed by VM_JFALSE",
                jtrue_offset
            ),
            IrError::TargetOutOfRange {
                target,
                instruction_count,
            } => write!(
                f,
                "jump target {} is out of range (program has {} instructions)",
                target, instruction_count
            ),
        }
    }
}

impl std::error::Error for IrError {}

pub type Result<T> = std::result::Result<T, IrError>;
