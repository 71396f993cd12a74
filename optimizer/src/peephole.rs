//! Local rewrites over small, fixed windows of adjacent instructions, run
//! once over the freshly-parsed instruction sequence before compaction.
//! Both rules rely on the input having come through [`ir::parse`], which
//! rejects any JTRUE not immediately followed by a JFALSE — so a JTRUE at
//! index `i` always has a JFALSE at `i + 1`, and both always carry a
//! resolved target.

use ir::Instruction;

/// Rewrites `instructions` in place. Two rules, applied left to right in a
/// single scan:
///
/// 1. A JMP whose target is the very next instruction is dead; turn it into
///    a NOP.
/// 2. A JTRUE/JFALSE pair where one side targets the fall-through (the
///    instruction right after the pair) collapses to just its complement:
///    the redundant half becomes NOP, the other keeps whichever target
///    actually steers control flow.
///
/// Offsets are untouched here — renumbering is compaction's job.
pub fn rewrite(instructions: &mut [Instruction]) {
    let n = instructions.len();
    let mut i = 0;
    while i < n {
        if instructions[i].is_jtrue() && i + 1 < n && instructions[i + 1].is_jfalse() {
            let jtrue_target = instructions[i]
                .target()
                .expect("JTRUE target is resolved by the time the optimizer sees it");
            let jfalse_target = instructions[i + 1]
                .target()
                .expect("JFALSE target is resolved by the time the optimizer sees it");
            let fall_through = (i + 2) as u32;

            if jtrue_target == fall_through {
                // The true branch falls through anyway; only the JFALSE's
                // target matters, so keep it and drop the JTRUE.
                let offset = instructions[i].offset();
                instructions[i] = Instruction::Nop { offset };
            } else if jfalse_target == fall_through {
                // The false branch falls through anyway; replace the pair
                // with a single JTRUE carrying the original branch target.
                let offset = instructions[i].offset();
                instructions[i] = Instruction::Nop { offset };
                let offset_next = instructions[i + 1].offset();
                instructions[i + 1] = Instruction::JTrue {
                    offset: offset_next,
                    target: Some(jtrue_target),
                };
            }

            i += 2;
            continue;
        }

        if let Instruction::Jmp {
            offset,
            target: Some(target),
        } = &instructions[i]
        {
            let (offset, target) = (*offset, *target);
            if target == offset + 1 {
                instructions[i] = Instruction::Nop { offset };
            }
        }

        i += 1;
    }
}
