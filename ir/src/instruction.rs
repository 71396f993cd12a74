use std::fmt;
use std::str::FromStr;

use crate::error::IrError;

/// One of the six comparison opcodes.
///
/// Grouped into a single payload field rather than six separate
/// `Instruction` variants: they all share the same shape (two operand
/// lexemes, no target) and differ only in mnemonic, so a flat sum type
/// per-opcode would just be six copies of the same fields.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CmpOp {
    Eq,
    Mag,
    Min,
    Maeq,
    Mieq,
    Neq,
}

impl CmpOp {
    fn mnemonic(self) -> &'static str {
        match self {
            CmpOp::Eq => "VM_EQ",
            CmpOp::Mag => "VM_MAG",
            CmpOp::Min => "VM_MIN",
            CmpOp::Maeq => "VM_MAEQ",
            CmpOp::Mieq => "VM_MIEQ",
            CmpOp::Neq => "VM_NEQ",
        }
    }
}

impl FromStr for CmpOp {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, IrError> {
        match s {
            "VM_EQ" => Ok(CmpOp::Eq),
            "VM_MAG" => Ok(CmpOp::Mag),
            "VM_MIN" => Ok(CmpOp::Min),
            "VM_MAEQ" => Ok(CmpOp::Maeq),
            "VM_MIEQ" => Ok(CmpOp::Mieq),
            "VM_NEQ" => Ok(CmpOp::Neq),
            _ => Err(IrError::UnknownMnemonic(s.to_string())),
        }
    }
}

/// A single instruction in the global buffer.
///
/// Modeled as a tagged union per kind rather than one struct with
/// optional fields: the emitter and the optimizer's rewrite rules both
/// become total matches, and a JTRUE/JFALSE pair becomes a pattern on two
/// adjacent variants instead of a runtime assertion on an untyped `kind`
/// tag.
///
/// `offset` is assigned once, at creation, and never changes after.
/// `target` on jump variants starts `None` and is written exactly once by
/// [`crate::InstructionBuffer::backpatch`].
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    Nop {
        offset: u32,
    },
    Exec {
        offset: u32,
        arg: String,
    },
    Cmp {
        offset: u32,
        op: CmpOp,
        lhs: String,
        rhs: String,
    },
    JTrue {
        offset: u32,
        target: Option<u32>,
    },
    JFalse {
        offset: u32,
        target: Option<u32>,
    },
    Jmp {
        offset: u32,
        target: Option<u32>,
    },
    Return {
        offset: u32,
    },
}

impl Instruction {
    pub fn offset(&self) -> u32 {
        match *self {
            Instruction::Nop { offset }
            | Instruction::Exec { offset, .. }
            | Instruction::Cmp { offset, .. }
            | Instruction::JTrue { offset, .. }
            | Instruction::JFalse { offset, .. }
            | Instruction::Jmp { offset, .. }
            | Instruction::Return { offset } => offset,
        }
    }

    /// Re-tags this instruction with a fresh offset, used by the
    /// optimizer's compaction pass to renumber in place.
    pub fn set_offset(&mut self, new_offset: u32) {
        match self {
            Instruction::Nop { offset }
            | Instruction::Exec { offset, .. }
            | Instruction::Cmp { offset, .. }
            | Instruction::JTrue { offset, .. }
            | Instruction::JFalse { offset, .. }
            | Instruction::Jmp { offset, .. }
            | Instruction::Return { offset } => *offset = new_offset,
        }
    }

    /// The jump target, if this instruction is one of JTRUE/JFALSE/JMP.
    pub fn target(&self) -> Option<u32> {
        match *self {
            Instruction::JTrue { target, .. }
            | Instruction::JFalse { target, .. }
            | Instruction::Jmp { target, .. } => target,
            _ => None,
        }
    }

    /// Overwrite the jump target. Panics if called on a non-jump
    /// instruction: callers only ever reach this through a patch list,
    /// which by construction only ever holds jump instruction ids.
    pub fn set_target(&mut self, new_target: u32) {
        match self {
            Instruction::JTrue { target, .. }
            | Instruction::JFalse { target, .. }
            | Instruction::Jmp { target, .. } => *target = Some(new_target),
            other => panic!("set_target called on non-jump instruction {:?}", other),
        }
    }

    pub fn is_nop(&self) -> bool {
        matches!(self, Instruction::Nop { .. })
    }

    pub fn is_jtrue(&self) -> bool {
        matches!(self, Instruction::JTrue { .. })
    }

    pub fn is_jfalse(&self) -> bool {
        matches!(self, Instruction::JFalse { .. })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Nop { .. } => write!(f, "VM_NOP"),
            Instruction::Exec { arg, .. } => write!(f, "VM_EXEC {}", arg),
            Instruction::Cmp { op, lhs, rhs, .. } => write!(f, "{} {} {}", op.mnemonic(), lhs, rhs),
            Instruction::JTrue { target, .. } => {
                write!(f, "VM_JTRUE {}", target.expect("unresolved JTRUE target"))
            }
            Instruction::JFalse { target, .. } => {
                write!(f, "VM_JFALSE {}", target.expect("unresolved JFALSE target"))
            }
            Instruction::Jmp { target, .. } => {
                write!(f, "VM_JMP {}", target.expect("unresolved JMP target"))
            }
            Instruction::Return { .. } => write!(f, "VM_RETURN"),
        }
    }
}
