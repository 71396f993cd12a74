//! Walks the parse tree bottom-up, invoking the semantic actions in
//! [`crate::actions`] in the same order a grammar's reductions would fire.

use matches::debug_assert_matches;
use pest::iterators::Pair;
use pest::Parser;

use ir::{CmpOp, GotEntry, InstructionBuffer, Program};

use crate::actions;
use crate::error::{Error, Result};
use crate::grammar::{Rule, SourceParser};
use crate::parsenode::ParseNode;
use crate::symboltable::FunctionTable;

/// Compiles a single source text into a complete program.
pub fn compile(source: &str) -> Result<Program> {
    let mut code = InstructionBuffer::new();
    let mut functions = FunctionTable::new();
    compile_into(source, &mut code, &mut functions)?;
    Ok(finish(code, functions))
}

/// Compiles multiple source texts, in order, into one accumulated
/// program — the shape behind the CLI's multi-file invocation, where
/// each file is parsed in turn but all functions land in a single
/// symbol table and instruction buffer.
pub fn compile_many<'a>(sources: impl IntoIterator<Item = &'a str>) -> Result<Program> {
    let mut code = InstructionBuffer::new();
    let mut functions = FunctionTable::new();
    for source in sources {
        compile_into(source, &mut code, &mut functions)?;
    }
    Ok(finish(code, functions))
}

fn compile_into(
    source: &str,
    code: &mut InstructionBuffer,
    functions: &mut FunctionTable,
) -> Result<()> {
    let mut pairs = SourceParser::parse(Rule::program, source)?;
    let program_pair = pairs.next().expect("program rule always matches once");

    for item in program_pair.into_inner() {
        match item.as_rule() {
            Rule::function => compile_function(item, code, functions)?,
            Rule::EOI => {}
            other => unreachable!("unexpected top-level rule {:?}", other),
        }
    }
    Ok(())
}

fn finish(code: InstructionBuffer, functions: FunctionTable) -> Program {
    let got = functions
        .iter()
        .map(|(name, start)| GotEntry {
            name: name.to_string(),
            start,
        })
        .collect();
    Program { got, code }
}

fn compile_function(
    pair: Pair<Rule>,
    code: &mut InstructionBuffer,
    functions: &mut FunctionTable,
) -> Result<()> {
    let mut name = None;
    let mut params = Vec::new();
    let mut body_node = None;

    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::identifier => name = Some(child.as_str().to_string()),
            Rule::params => {
                params = child
                    .into_inner()
                    .filter(|p| p.as_rule() == Rule::identifier)
                    .map(|p| p.as_str().to_string())
                    .collect();
            }
            Rule::body => body_node = Some(compile_body(child, code)?),
            Rule::GO | Rule::GC | Rule::TO | Rule::TC => {}
            other => unreachable!("unexpected rule inside function: {:?}", other),
        }
    }

    let name = name.expect("function always has a name");
    let body_node = body_node.expect("function always has a body");
    actions::func(code, functions, &name, &params, body_node)?;
    Ok(())
}

fn compile_body(pair: Pair<Rule>, code: &mut InstructionBuffer) -> Result<ParseNode> {
    let mut node: Option<ParseNode> = None;
    for stmt in pair.into_inner() {
        let stmt_node = compile_statement(stmt, code)?;
        node = Some(match node {
            None => stmt_node,
            Some(prev) => actions::body(code, prev, stmt_node),
        });
    }
    Ok(node.unwrap_or_else(|| actions::nop(code)))
}

fn compile_statement(pair: Pair<Rule>, code: &mut InstructionBuffer) -> Result<ParseNode> {
    let inner = pair
        .into_inner()
        .next()
        .expect("statement always wraps exactly one alternative");
    match inner.as_rule() {
        Rule::if_stmt => compile_if_stmt(inner, code),
        Rule::if_else_stmt => compile_if_else_stmt(inner, code),
        Rule::exec_stmt => compile_exec_stmt(inner, code),
        other => unreachable!("unexpected statement alternative: {:?}", other),
    }
}

fn compile_if_stmt(pair: Pair<Rule>, code: &mut InstructionBuffer) -> Result<ParseNode> {
    let mut cond = None;
    let mut body = None;
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::bool_expr => cond = Some(compile_bool_expr(child, code)?),
            Rule::statement => body = Some(compile_statement(child, code)?),
            Rule::IF | Rule::GO | Rule::GC => {}
            other => unreachable!("unexpected rule inside if_stmt: {:?}", other),
        }
    }
    let cond = cond.expect("if_stmt always has a condition");
    let body = body.expect("if_stmt always has a guarded statement");
    Ok(actions::if_then(code, cond, body))
}

fn compile_if_else_stmt(pair: Pair<Rule>, code: &mut InstructionBuffer) -> Result<ParseNode> {
    let mut cond = None;
    let mut branches = Vec::new();
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::bool_expr => cond = Some(compile_bool_expr(child, code)?),
            Rule::statement => branches.push(compile_statement(child, code)?),
            Rule::IF | Rule::ELSE | Rule::GO | Rule::GC => {}
            other => unreachable!("unexpected rule inside if_else_stmt: {:?}", other),
        }
    }
    let cond = cond.expect("if_else_stmt always has a condition");
    let mut branches = branches.into_iter();
    let then_branch = branches.next().expect("if/else always has a then branch");
    let else_branch = branches.next().expect("if/else always has an else branch");
    Ok(actions::if_else(code, cond, then_branch, else_branch))
}

fn compile_exec_stmt(pair: Pair<Rule>, code: &mut InstructionBuffer) -> Result<ParseNode> {
    let string_pair = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::string)
        .expect("exec_stmt always carries a string literal");
    let arg = actions::leaf(unquote(string_pair.as_str()));
    Ok(actions::exec(code, &arg))
}

/// Strips the surrounding `"..."` off a source string literal. Instruction
/// operands in the textual IR are written quoted-free, so the quotes only
/// ever exist in source syntax, never in the compiled representation.
fn unquote(s: &str) -> &str {
    s.trim_matches('"')
}

fn compile_bool_expr(pair: Pair<Rule>, code: &mut InstructionBuffer) -> Result<ParseNode> {
    let or_expr = pair
        .into_inner()
        .next()
        .expect("bool_expr always wraps an or_expr");
    compile_or_expr(or_expr, code)
}

fn compile_or_expr(pair: Pair<Rule>, code: &mut InstructionBuffer) -> Result<ParseNode> {
    let mut parts = pair.into_inner();
    let mut acc = compile_and_expr(
        parts.next().expect("or_expr always has a left operand"),
        code,
    )?;
    while let Some(op) = parts.next() {
        debug_assert_matches!(op.as_rule(), Rule::OR);
        let rhs = compile_and_expr(
            parts.next().expect("OR must be followed by an operand"),
            code,
        )?;
        acc = actions::or(code, acc, rhs);
    }
    Ok(acc)
}

fn compile_and_expr(pair: Pair<Rule>, code: &mut InstructionBuffer) -> Result<ParseNode> {
    let mut parts = pair.into_inner();
    let mut acc = compile_not_expr(
        parts.next().expect("and_expr always has a left operand"),
        code,
    )?;
    while let Some(op) = parts.next() {
        debug_assert_matches!(op.as_rule(), Rule::AND);
        let rhs = compile_not_expr(
            parts.next().expect("AND must be followed by an operand"),
            code,
        )?;
        acc = actions::and(code, acc, rhs);
    }
    Ok(acc)
}

fn compile_not_expr(pair: Pair<Rule>, code: &mut InstructionBuffer) -> Result<ParseNode> {
    let mut negate = false;
    let mut atom = None;
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::NOT => negate = true,
            Rule::cmp_atom => atom = Some(compile_cmp_atom(child, code)?),
            other => unreachable!("unexpected rule inside not_expr: {:?}", other),
        }
    }
    let atom = atom.expect("not_expr always wraps a cmp_atom");
    Ok(if negate { actions::not(atom) } else { atom })
}

fn compile_cmp_atom(pair: Pair<Rule>, code: &mut InstructionBuffer) -> Result<ParseNode> {
    let mut parenthesized = None;
    let mut comparison = None;
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::bool_expr => parenthesized = Some(compile_bool_expr(child, code)?),
            Rule::comparison => comparison = Some(compile_comparison(child, code)?),
            Rule::GO | Rule::GC => {}
            other => unreachable!("unexpected rule inside cmp_atom: {:?}", other),
        }
    }
    match (parenthesized, comparison) {
        (Some(node), None) | (None, Some(node)) => Ok(node),
        _ => unreachable!("cmp_atom always wraps exactly one alternative"),
    }
}

fn compile_comparison(pair: Pair<Rule>, code: &mut InstructionBuffer) -> Result<ParseNode> {
    let mut operands = Vec::new();
    let mut op = None;
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::operand => operands.push(compile_operand(child)?),
            Rule::cmp_op => op = Some(compile_cmp_op(child)),
            other => unreachable!("unexpected rule inside comparison: {:?}", other),
        }
    }
    let mut operands = operands.into_iter();
    let lhs = operands.next().expect("comparison always has a left operand");
    let rhs = operands
        .next()
        .expect("comparison always has a right operand");
    let op = op.expect("comparison always has an operator");
    Ok(actions::cmp(code, op, &lhs, &rhs))
}

fn compile_cmp_op(pair: Pair<Rule>) -> CmpOp {
    let token = pair
        .into_inner()
        .next()
        .expect("cmp_op always wraps one token");
    match token.as_rule() {
        Rule::EQ => CmpOp::Eq,
        Rule::MAEQ => CmpOp::Maeq,
        Rule::MAG => CmpOp::Mag,
        Rule::MIEQ => CmpOp::Mieq,
        Rule::MIN => CmpOp::Min,
        Rule::NEQ => CmpOp::Neq,
        other => unreachable!("unexpected cmp_op token: {:?}", other),
    }
}

fn compile_operand(pair: Pair<Rule>) -> Result<ParseNode> {
    let inner = pair
        .into_inner()
        .next()
        .expect("operand always wraps one alternative");
    match inner.as_rule() {
        Rule::string => Ok(actions::leaf(unquote(inner.as_str()))),
        Rule::field_deref => compile_field_deref(inner),
        other => unreachable!("unexpected operand alternative: {:?}", other),
    }
}

fn compile_field_deref(pair: Pair<Rule>) -> Result<ParseNode> {
    let mut identifiers = pair.into_inner().filter(|p| p.as_rule() == Rule::identifier);
    let param = identifiers
        .next()
        .expect("field_deref always has a parameter name")
        .as_str()
        .to_string();
    let field = identifiers
        .next()
        .expect("field_deref always has a field name")
        .as_str()
        .to_string();
    actions::field_deref(&param, &field).map_err(Error::from)
}
