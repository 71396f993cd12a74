//! The backpatching calculus: one function per grammar production, each
//! taking the [`ParseNode`]s produced by its children and synthesizing a
//! new one.
//!
//! Each action takes the instruction buffer and symbol table as explicit
//! arguments rather than reaching for global state, so the whole pipeline
//! is reentrant and testable in-process.

use ir::{CmpOp, InstrId, Instruction, InstructionBuffer};

use crate::error::CompileError;
use crate::fields::field_register;
use crate::parsenode::ParseNode;
use crate::patchlist::PatchList;
use crate::symboltable::FunctionTable;

/// `CMP(op, L, R)`: emits the comparison triple (cmp, JTRUE, JFALSE) and
/// returns a Boolean-state node. This is the only place a JTRUE/JFALSE
/// pair is emitted, which is what lets the optimizer assume every JTRUE
/// is immediately followed in buffer order by a JFALSE.
pub fn cmp(code: &mut InstructionBuffer, op: CmpOp, l: &ParseNode, r: &ParseNode) -> ParseNode {
    let lhs = l.lexeme.clone().expect("comparison operand must carry a lexeme");
    let rhs = r.lexeme.clone().expect("comparison operand must carry a lexeme");

    let cmp_instr = code.push(Instruction::Cmp { offset: 0, op, lhs, rhs });
    let jtrue = code.push(Instruction::JTrue { offset: 0, target: None });
    let jfalse = code.push(Instruction::JFalse { offset: 0, target: None });

    ParseNode {
        lexeme: None,
        code: Some(cmp_instr),
        truelist: PatchList::make(jtrue),
        falselist: PatchList::make(jfalse),
        nextlist: PatchList::empty(),
    }
}

/// `AND(L, R)`: short-circuit conjunction.
pub fn and(code: &mut InstructionBuffer, l: ParseNode, r: ParseNode) -> ParseNode {
    l.truelist.backpatch(code, first(&r));
    ParseNode {
        lexeme: None,
        code: l.code,
        truelist: r.truelist,
        falselist: l.falselist.merge(r.falselist),
        nextlist: PatchList::empty(),
    }
}

/// `OR(L, R)`: dual of AND.
pub fn or(code: &mut InstructionBuffer, l: ParseNode, r: ParseNode) -> ParseNode {
    l.falselist.backpatch(code, first(&r));
    ParseNode {
        lexeme: None,
        code: l.code,
        truelist: l.truelist.merge(r.truelist),
        falselist: r.falselist,
        nextlist: PatchList::empty(),
    }
}

/// `NOT(X)`: swap true/false lists. No instruction emitted.
pub fn not(x: ParseNode) -> ParseNode {
    ParseNode {
        lexeme: None,
        code: x.code,
        truelist: x.falselist,
        falselist: x.truelist,
        nextlist: PatchList::empty(),
    }
}

/// `NOP()`: the grammatical no-op body, for a function whose braces are
/// empty.
pub fn nop(code: &mut InstructionBuffer) -> ParseNode {
    let nop_instr = code.push(Instruction::Nop { offset: 0 });
    let jmp = code.push(Instruction::Jmp { offset: 0, target: None });
    ParseNode {
        lexeme: None,
        code: Some(nop_instr),
        truelist: PatchList::empty(),
        falselist: PatchList::empty(),
        nextlist: PatchList::make(jmp),
    }
}

/// `EXEC(S)`: emits the action call plus a trailing JMP for the next
/// statement to backpatch into. The JMP is frequently redundant (its
/// target ends up being the very next instruction) and is the main
/// target of the optimizer's peephole pass.
pub fn exec(code: &mut InstructionBuffer, s: &ParseNode) -> ParseNode {
    let arg = s.lexeme.clone().expect("EXEC argument must carry a lexeme");
    let exec_instr = code.push(Instruction::Exec { offset: 0, arg });
    let jmp = code.push(Instruction::Jmp { offset: 0, target: None });
    ParseNode {
        lexeme: None,
        code: Some(exec_instr),
        truelist: PatchList::empty(),
        falselist: PatchList::empty(),
        nextlist: PatchList::make(jmp),
    }
}

/// `IF(cond, body)`.
pub fn if_then(code: &mut InstructionBuffer, cond: ParseNode, body: ParseNode) -> ParseNode {
    let body_first = first(&body);
    cond.truelist.backpatch(code, body_first);
    ParseNode {
        lexeme: None,
        code: cond.code,
        truelist: PatchList::empty(),
        falselist: PatchList::empty(),
        nextlist: cond.falselist.merge(body.nextlist),
    }
}

/// `IF_ELSE(cond, then, else)`.
pub fn if_else(
    code: &mut InstructionBuffer,
    cond: ParseNode,
    then_body: ParseNode,
    else_body: ParseNode,
) -> ParseNode {
    let then_first = first(&then_body);
    let else_first = first(&else_body);
    cond.truelist.backpatch(code, then_first);
    cond.falselist.backpatch(code, else_first);
    ParseNode {
        lexeme: None,
        code: cond.code,
        truelist: PatchList::empty(),
        falselist: PatchList::empty(),
        nextlist: then_body.nextlist.merge(else_body.nextlist),
    }
}

/// `BODY(body, stmt)`: sequencing. Backpatches the running body's
/// nextlist into the new statement's entry point.
pub fn body(code: &mut InstructionBuffer, body: ParseNode, stmt: ParseNode) -> ParseNode {
    let stmt_first = first(&stmt);
    body.nextlist.backpatch(code, stmt_first);
    ParseNode {
        lexeme: None,
        code: body.code,
        truelist: PatchList::empty(),
        falselist: PatchList::empty(),
        nextlist: stmt.nextlist,
    }
}

/// `FUNC(name, params, body)`: emits RETURN, backpatches the body's
/// nextlist into it, and installs the function in the symbol table.
/// A duplicate name is a fatal semantic error.
///
/// `params` is accepted but unused beyond being part of the function's
/// declared signature: the parameter list is never cross-checked against
/// field dereferences inside the body.
pub fn func(
    code: &mut InstructionBuffer,
    functions: &mut FunctionTable,
    name: &str,
    _params: &[String],
    body: ParseNode,
) -> Result<(), CompileError> {
    let ret = code.push(Instruction::Return { offset: 0 });
    body.nextlist.backpatch(code, ret);
    let entry = first(&body);
    functions.install(name, entry)
}

/// Field dereference `ID.FIELD`: maps the field name to its register,
/// ignoring the parameter identifier (see the Open Question note above).
/// Fatal if the field isn't in the whitelist (scenario S6).
pub fn field_deref(_param: &str, field: &str) -> Result<ParseNode, CompileError> {
    Ok(ParseNode::leaf(field_register(field)?))
}

pub fn leaf(lexeme: impl Into<String>) -> ParseNode {
    ParseNode::leaf(lexeme)
}

fn first(node: &ParseNode) -> InstrId {
    node.code.expect("statement/boolean node must have an entry instruction")
}
