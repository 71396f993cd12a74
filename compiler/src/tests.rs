use ::pest::*;

use crate::grammar::{Rule, SourceParser};
use crate::{compile, Error};

#[test]
fn grammar_field_deref() {
    parses_to! {
        parser: SourceParser,
        input: "p.port",
        rule: Rule::field_deref,
        tokens: [
            field_deref(0, 6, [
                identifier(0, 1),
                P(1, 2),
                identifier(2, 6),
            ]),
        ]
    };
}

#[test]
fn grammar_cmp_op_alternatives() {
    parses_to! {
        parser: SourceParser,
        input: "==",
        rule: Rule::cmp_op,
        tokens: [ cmp_op(0, 2, [ EQ(0, 2) ]) ]
    };
    parses_to! {
        parser: SourceParser,
        input: ">=",
        rule: Rule::cmp_op,
        tokens: [ cmp_op(0, 2, [ MAEQ(0, 2) ]) ]
    };
}

#[test]
fn grammar_comparison() {
    parses_to! {
        parser: SourceParser,
        input: "p.port==\"80\"",
        rule: Rule::comparison,
        tokens: [
            comparison(0, 12, [
                operand(0, 6, [
                    field_deref(0, 6, [identifier(0, 1), P(1, 2), identifier(2, 6)]),
                ]),
                cmp_op(6, 8, [ EQ(6, 8) ]),
                operand(8, 12, [ string(8, 12) ]),
            ]),
        ]
    };
}

#[test]
fn grammar_exec_stmt() {
    parses_to! {
        parser: SourceParser,
        input: "exec \"log\";",
        rule: Rule::exec_stmt,
        tokens: [
            exec_stmt(0, 11, [
                EXEC(0, 4),
                string(5, 10),
            ]),
        ]
    };
}

#[test]
fn grammar_empty_function() {
    parses_to! {
        parser: SourceParser,
        input: "f(){}",
        rule: Rule::program,
        tokens: [
            function(0, 5, [
                identifier(0, 1),
                GO(1, 2),
                GC(2, 3),
                TO(3, 4),
                body(4, 4, []),
                TC(4, 5),
            ]),
            EOI(5, 5),
        ]
    };
}

#[test]
fn s1_nop_body() {
    let program = compile("f() { }").expect("empty body compiles");
    assert_eq!(
        program.to_text(),
        "\
.got
\tf 0

.code
\t0 VM_NOP
\t1 VM_JMP 2
\t2 VM_RETURN
"
    );
}

#[test]
fn s2_single_comparison() {
    let program = compile("f() { if (p.port == \"80\") exec \"log\"; }")
        .expect("single comparison compiles");
    assert_eq!(
        program.to_text(),
        "\
.got
\tf 0

.code
\t0 VM_EQ $1 80
\t1 VM_JTRUE 3
\t2 VM_JFALSE 5
\t3 VM_EXEC log
\t4 VM_JMP 5
\t5 VM_RETURN
"
    );
}

#[test]
fn s3_and_merges_falselists_to_one_target() {
    let program =
        compile("f() { if (p.port == \"80\" AND p.hostname == \"x\") exec \"a\"; }")
            .expect("AND compiles");
    // Both comparisons' JFALSE must target the same instruction (RETURN),
    // since both share L.falselist merged with R.falselist.
    let jfalse_targets: Vec<u32> = program
        .code
        .iter()
        .filter_map(|instr| match instr {
            ir::Instruction::JFalse { target, .. } => *target,
            _ => None,
        })
        .collect();
    assert_eq!(jfalse_targets.len(), 2);
    assert_eq!(jfalse_targets[0], jfalse_targets[1]);
    let ret_offset = (program.code.len() - 1) as u32;
    assert!(jfalse_targets.iter().all(|&t| t == ret_offset));
}

#[test]
fn s4_if_else_converges_on_return() {
    let program =
        compile("f() { if (p.port == \"80\") exec \"a\"; else exec \"b\"; }").expect("if/else compiles");
    let ret_offset = (program.code.len() - 1) as u32;
    let jmp_targets: Vec<u32> = program
        .code
        .iter()
        .filter_map(|instr| match instr {
            ir::Instruction::Jmp { target, .. } => *target,
            _ => None,
        })
        .collect();
    assert!(jmp_targets.iter().all(|&t| t == ret_offset));
}

#[test]
fn s5_duplicate_function_is_fatal() {
    let err = compile("f(){} f(){}").unwrap_err();
    match err {
        Error::Compile(crate::CompileError::DuplicateFunction(name)) => assert_eq!(name, "f"),
        other => panic!("expected DuplicateFunction, got {:?}", other),
    }
}

#[test]
fn s6_unknown_field_is_fatal() {
    let err = compile("f() { if (p.banana == \"80\") exec \"log\"; }").unwrap_err();
    match err {
        Error::Compile(crate::CompileError::UnknownField(name)) => assert_eq!(name, "banana"),
        other => panic!("expected UnknownField, got {:?}", other),
    }
}

#[test]
fn accepts_parenthesized_sub_expression() {
    compile("f() { if ((p.port == \"80\")) exec \"log\"; }").expect("parenthesized comparison compiles");
}

#[test]
fn accepts_not_and_or() {
    compile("f() { if (NOT p.port == \"80\" OR p.hostname == \"x\") exec \"log\"; }")
        .expect("NOT/OR compiles");
}

#[test]
fn multiple_functions_share_one_program() {
    let program = compile("a() { } b() { }").expect("two functions compile");
    assert_eq!(program.got.len(), 2);
    assert_eq!(program.got[0].name, "a");
    assert_eq!(program.got[1].name, "b");
}
