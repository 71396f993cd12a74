use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::buffer::InstructionBuffer;
use crate::error::{IrError, Result};
use crate::instruction::{CmpOp, Instruction};
use crate::program::{GotEntry, Program};

#[derive(Parser)]
#[grammar = "ir.pest"]
struct IrParser;

/// Reads a `.got`/`.code` listing back into a [`Program`].
///
/// The optimizer assumes the JTRUE/JFALSE pairing invariant holds on
/// input; a violation is a fatal parse error. [`Program::validate`] is
/// what enforces that, called unconditionally before returning.
pub fn parse(input: &str) -> Result<Program> {
    let mut pairs = IrParser::parse(Rule::program, input)
        .map_err(|err| IrError::Syntax(err.to_string()))?;
    let program_pair = pairs.next().expect("program rule always matches once");

    let mut got = Vec::new();
    let mut code = InstructionBuffer::new();

    for section in program_pair.into_inner() {
        match section.as_rule() {
            Rule::got_section => {
                for line in section.into_inner() {
                    got.push(parse_got_line(line)?);
                }
            }
            Rule::code_section => {
                for line in section.into_inner() {
                    parse_code_line(line, &mut code)?;
                }
            }
            Rule::EOI => {}
            other => unreachable!("unexpected top-level rule {:?}", other),
        }
    }

    let program = Program { got, code };
    program.validate()?;
    Ok(program)
}

fn parse_got_line(pair: Pair<Rule>) -> Result<GotEntry> {
    let mut inner = pair.into_inner();
    let name = inner.next().unwrap().as_str().to_string();
    let start: u32 = inner
        .next()
        .unwrap()
        .as_str()
        .parse()
        .expect("uint rule only matches digits");
    Ok(GotEntry { name, start })
}

fn parse_code_line(pair: Pair<Rule>, code: &mut InstructionBuffer) -> Result<()> {
    let mut inner = pair.into_inner();
    let offset: u32 = inner
        .next()
        .unwrap()
        .as_str()
        .parse()
        .expect("uint rule only matches digits");
    let mnemonic = inner.next().unwrap().into_inner().next().unwrap();

    let instr = match mnemonic.as_rule() {
        Rule::nop_mn => Instruction::Nop { offset },
        Rule::return_mn => Instruction::Return { offset },
        Rule::exec_mn => {
            let arg = mnemonic.into_inner().next().unwrap().as_str().to_string();
            Instruction::Exec { offset, arg }
        }
        Rule::cmp_mn => {
            let mut parts = mnemonic.into_inner();
            let op: CmpOp = parts.next().unwrap().as_str().parse()?;
            let lhs = operand_text(parts.next().unwrap());
            let rhs = operand_text(parts.next().unwrap());
            Instruction::Cmp { offset, op, lhs, rhs }
        }
        Rule::jump_mn => {
            let mut parts = mnemonic.into_inner();
            let op = parts.next().unwrap().as_str();
            let target: u32 = parts
                .next()
                .unwrap()
                .as_str()
                .parse()
                .expect("uint rule only matches digits");
            match op {
                "VM_JTRUE" => Instruction::JTrue {
                    offset,
                    target: Some(target),
                },
                "VM_JFALSE" => Instruction::JFalse {
                    offset,
                    target: Some(target),
                },
                "VM_JMP" => Instruction::Jmp {
                    offset,
                    target: Some(target),
                },
                _ => unreachable!("jump_op only matches the three jump mnemonics"),
            }
        }
        other => unreachable!("unexpected mnemonic rule {:?}", other),
    };

    // Lines appear in offset order in well-formed input, but nothing in
    // the grammar enforces it; a Vec push assumes it does. Guard it here
    // rather than silently reindexing, since a gap or reorder means the
    // input wasn't produced by this toolchain.
    if instr.offset() as usize != code.len() {
        return Err(IrError::Syntax(format!(
            "code line offset {} out of sequence (expected {})",
            instr.offset(),
            code.len()
        )));
    }
    code.push(instr);
    Ok(())
}

fn operand_text(pair: Pair<Rule>) -> String {
    pair.into_inner().next().unwrap().as_str().to_string()
}
