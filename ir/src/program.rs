use std::fmt;

use crate::buffer::InstructionBuffer;
use crate::error::{IrError, Result};

/// One entry in the global offset table: a function name and the offset
/// of its first instruction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GotEntry {
    pub name: String,
    pub start: u32,
}

/// A complete compiled (or optimized) program: the GOT plus the code
/// section. Shared between `compiler` (which builds one from scratch) and
/// `optimizer` (which parses one back in, rewrites it, and builds a fresh
/// one to emit).
#[derive(Clone, Debug, Default)]
pub struct Program {
    pub got: Vec<GotEntry>,
    pub code: InstructionBuffer,
}

impl Program {
    pub fn new() -> Self {
        Program {
            got: Vec::new(),
            code: InstructionBuffer::new(),
        }
    }

    /// Checks the invariants a caller can't get wrong by construction
    /// (offset density is automatic for an append-only `Vec`-backed
    /// buffer, so it isn't re-checked here): every jump target and every
    /// GOT entry must address a real instruction, and every JTRUE must be
    /// immediately followed by a JFALSE.
    pub fn validate(&self) -> Result<()> {
        let n = self.code.len() as u32;

        for instr in self.code.iter() {
            if let Some(target) = instr.target() {
                if target >= n {
                    return Err(IrError::TargetOutOfRange {
                        target,
                        instruction_count: n,
                    });
                }
            }
            if instr.is_jtrue() {
                let paired = (instr.offset() + 1) < n && self.code.get(instr.offset() + 1).is_jfalse();
                if !paired {
                    return Err(IrError::UnpairedJtrue {
                        jtrue_offset: instr.offset(),
                    });
                }
            }
        }

        for entry in &self.got {
            if entry.start >= n {
                return Err(IrError::TargetOutOfRange {
                    target: entry.start,
                    instruction_count: n,
                });
            }
        }

        Ok(())
    }

    /// Serializes this program as `.got`/`.code` text. An empty program is
    /// handled by the caller (compiler/optimizer `main.rs`), which prints
    /// a warning diagnostic in addition to calling this, rather than
    /// skipping output entirely.
    pub fn write<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(out, ".got")?;
        for entry in &self.got {
            writeln!(out, "\t{} {}", entry.name, entry.start)?;
        }
        writeln!(out)?;
        writeln!(out, ".code")?;
        for instr in self.code.iter() {
            writeln!(out, "\t{} {}", instr.offset(), instr)?;
        }
        Ok(())
    }

    pub fn to_text(&self) -> String {
        let mut s = String::new();
        self.write(&mut s).expect("writing to a String never fails");
        s
    }
}
