//! Rewrites a compiled program: peephole cleanup over small windows of
//! adjacent instructions, then a compaction pass that drops NOPs and
//! renumbers everything densely.

mod compaction;
mod error;
mod peephole;

pub use error::{Error, IoContext, Result};

use ir::{GotEntry, InstructionBuffer, Program};

/// Parses `text` as a GOT+code listing and returns the rewritten,
/// compacted program. Running this twice on its own output is a no-op:
/// peephole has nothing left to simplify, and compaction of an
/// already-dense, NOP-free program is the identity.
pub fn optimize_text(text: &str) -> Result<Program> {
    let program = ir::parse(text)?;
    Ok(optimize(program))
}

/// Parses multiple listings, in order, and optimizes them as one
/// accumulated program — the shape behind the CLI's multi-file
/// invocation, mirroring `compiler::compile_many`. Each listing already
/// has its own dense, zero-based offsets, so accumulating them means
/// shifting every offset a listing carries (jump targets, GOT starts) by
/// the length of the buffer built so far, then appending its instructions
/// in order.
pub fn optimize_many<'a>(sources: impl IntoIterator<Item = &'a str>) -> Result<Program> {
    let mut got = Vec::new();
    let mut code = InstructionBuffer::new();
    for source in sources {
        let program = ir::parse(source)?;
        append(&mut got, &mut code, program);
    }
    Ok(optimize(Program { got, code }))
}

fn append(got: &mut Vec<GotEntry>, code: &mut InstructionBuffer, program: Program) {
    let base = code.len() as u32;
    for mut instr in program.code.into_vec() {
        if let Some(target) = instr.target() {
            instr.set_target(target + base);
        }
        code.push(instr);
    }
    got.extend(program.got.into_iter().map(|entry| GotEntry {
        name: entry.name,
        start: entry.start + base,
    }));
}

/// Applies both rewrite passes to an already-parsed program.
pub fn optimize(mut program: Program) -> Program {
    let mut instructions = program.code.into_vec();
    peephole::rewrite(&mut instructions);
    program.code = InstructionBuffer::from_vec(instructions);
    compaction::compact(program)
}

#[cfg(test)]
mod tests;
