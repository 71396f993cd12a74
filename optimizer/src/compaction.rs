//! Offset-remap and NOP-forwarding compaction, ported from the original
//! toolchain's `optimize_code`: build a remap vector in one forward walk,
//! then rewrite jump targets, GOT entries, and re-emit, dropping NOPs.

use ir::{GotEntry, InstructionBuffer, Program};

/// Renumbers `program` densely, dropping every NOP, and rewrites every
/// jump target and GOT entry through the same remap.
///
/// The remap is built in a single pass: each surviving instruction claims
/// the next dense offset; a NOP claims whatever offset the *next*
/// surviving instruction will get, without consuming it. That makes a
/// NOP-sled function entry point remap to the first real instruction after
/// the sled, so jumps into it still land correctly once the NOPs are gone.
pub fn compact(program: Program) -> Program {
    let Program { got, code } = program;
    let instructions = code.into_vec();

    let mut remap = vec![0u32; instructions.len()];
    let mut next = 0u32;
    for (old_offset, instr) in instructions.iter().enumerate() {
        remap[old_offset] = next;
        if !instr.is_nop() {
            next += 1;
        }
    }

    let mut new_code = InstructionBuffer::new();
    for mut instr in instructions {
        if instr.is_nop() {
            continue;
        }
        if let Some(target) = instr.target() {
            instr.set_target(remap[target as usize]);
        }
        new_code.push(instr);
    }

    let new_got = got
        .into_iter()
        .map(|entry| GotEntry {
            start: remap[entry.start as usize],
            ..entry
        })
        .collect();

    Program {
        got: new_got,
        code: new_code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ir::Instruction;

    #[test]
    fn drops_nops_and_renumbers() {
        let mut code = InstructionBuffer::new();
        code.push(Instruction::Nop { offset: 0 });
        code.push(Instruction::Return { offset: 0 });
        let program = Program {
            got: vec![GotEntry {
                name: "f".to_string(),
                start: 0,
            }],
            code,
        };

        let compacted = compact(program);
        assert_eq!(compacted.code.len(), 1);
        assert_eq!(compacted.code.get(0).offset(), 0);
        // NOP-forwarding: the function's entry, a NOP, remaps to the
        // first surviving instruction after it.
        assert_eq!(compacted.got[0].start, 0);
    }

    #[test]
    fn rewrites_jump_targets_through_the_remap() {
        let mut code = InstructionBuffer::new();
        code.push(Instruction::Jmp {
            offset: 0,
            target: Some(2),
        });
        code.push(Instruction::Nop { offset: 1 });
        code.push(Instruction::Return { offset: 2 });
        let program = Program {
            got: Vec::new(),
            code,
        };

        let compacted = compact(program);
        assert_eq!(compacted.code.len(), 2);
        match compacted.code.get(0) {
            Instruction::Jmp { target, .. } => assert_eq!(*target, Some(1)),
            other => panic!("expected JMP, got {:?}", other),
        }
    }

    #[test]
    fn nop_sled_at_function_entry_remaps_to_instruction_after_it() {
        let mut code = InstructionBuffer::new();
        code.push(Instruction::Nop { offset: 0 });
        code.push(Instruction::Nop { offset: 1 });
        code.push(Instruction::Return { offset: 2 });
        let program = Program {
            got: vec![GotEntry {
                name: "f".to_string(),
                start: 0,
            }],
            code,
        };

        let compacted = compact(program);
        assert_eq!(compacted.code.len(), 1);
        assert_eq!(compacted.got[0].start, 0);
    }
}
