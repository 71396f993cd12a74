use crate::{optimize_many, optimize_text};

#[test]
fn drops_nop_body_and_redundant_jmp() {
    // f() { } compiles to a NOP body followed by a redundant JMP to RETURN.
    let input = "\
.got
\tf 0

.code
\t0 VM_NOP
\t1 VM_JMP 2
\t2 VM_RETURN
";
    let program = optimize_text(input).expect("well-formed listing optimizes");
    assert_eq!(
        program.to_text(),
        "\
.got
\tf 0

.code
\t0 VM_RETURN
"
    );
}

#[test]
fn collapses_single_comparison_pair_and_compacts() {
    // f() { if (p.port == "80") exec "log"; }
    let input = "\
.got
\tf 0

.code
\t0 VM_EQ $1 80
\t1 VM_JTRUE 3
\t2 VM_JFALSE 5
\t3 VM_EXEC log
\t4 VM_JMP 5
\t5 VM_RETURN
";
    let program = optimize_text(input).expect("well-formed listing optimizes");
    // JTRUE's target (3) is the instruction right after the pair, so it
    // falls through anyway: the pair collapses to just the JFALSE, and
    // the trailing JMP (also a fall-through) is dead too.
    assert_eq!(
        program.to_text(),
        "\
.got
\tf 0

.code
\t0 VM_EQ $1 80
\t1 VM_JFALSE 3
\t2 VM_EXEC log
\t3 VM_RETURN
"
    );
}

#[test]
fn keeps_pair_where_neither_branch_falls_through() {
    // Both branches of the pair jump somewhere other than offset 2, so the
    // pair is load-bearing and must survive unchanged.
    let input = "\
.got

.code
\t0 VM_JTRUE 4
\t1 VM_JFALSE 5
\t2 VM_EXEC a
\t3 VM_JMP 6
\t4 VM_EXEC b
\t5 VM_JMP 6
\t6 VM_RETURN
";
    let program = optimize_text(input).expect("well-formed listing optimizes");
    // Only the JMP at offset 5 (targeting its own immediate successor) is
    // dead; the JMP at offset 3 targets the shared RETURN two instructions
    // away and survives, remapped to the RETURN's new, denser offset.
    assert_eq!(
        program.to_text(),
        "\
.got

.code
\t0 VM_JTRUE 4
\t1 VM_JFALSE 5
\t2 VM_EXEC a
\t3 VM_JMP 5
\t4 VM_EXEC b
\t5 VM_RETURN
"
    );
}

#[test]
fn optimizing_twice_is_a_no_op() {
    let input = "\
.got
\tf 0

.code
\t0 VM_NOP
\t1 VM_JMP 2
\t2 VM_RETURN
";
    let once = optimize_text(input).expect("first pass succeeds").to_text();
    let twice = optimize_text(&once).expect("second pass succeeds").to_text();
    assert_eq!(once, twice);
}

#[test]
fn rejects_unpaired_jtrue() {
    let input = ".got\n\n.code\n\t0 VM_JTRUE 0\n\t1 VM_RETURN\n";
    assert!(optimize_text(input).is_err());
}

#[test]
fn accepts_tabless_input() {
    let input = ".got\nf 0\n\n.code\n0 VM_NOP\n1 VM_RETURN\n";
    let program = optimize_text(input).expect("tabless listing parses");
    assert_eq!(program.to_text(), ".got\n\tf 0\n\n.code\n\t0 VM_RETURN\n");
}

#[test]
fn optimize_many_accumulates_multiple_listings() {
    // Two independently compiled `f() { }`/`g() { }` listings, each with
    // its own zero-based offsets, the way `compiler f.src g.src` would
    // accumulate them — except here the accumulation happens on the
    // optimizer's side of already-compiled text.
    let a = "\
.got
\tf 0

.code
\t0 VM_NOP
\t1 VM_JMP 2
\t2 VM_RETURN
";
    let b = "\
.got
\tg 0

.code
\t0 VM_NOP
\t1 VM_JMP 2
\t2 VM_RETURN
";
    let program = optimize_many([a, b]).expect("both listings accumulate and optimize");
    assert_eq!(
        program.to_text(),
        "\
.got
\tf 0
\tg 1

.code
\t0 VM_RETURN
\t1 VM_RETURN
"
    );
}

#[test]
fn nop_sled_entry_point_survives_compaction() {
    let input = "\
.got
\tf 0

.code
\t0 VM_NOP
\t1 VM_NOP
\t2 VM_RETURN
";
    let program = optimize_text(input).expect("NOP sled parses");
    assert_eq!(program.got[0].start, 0);
    assert_eq!(program.code.len(), 1);
}
