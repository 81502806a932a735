//! End-to-end optimizer tests
//!
//! Source text goes through the whole engine (lex, parse, check, lower,
//! optimize) and the listings are inspected.
//! Run with: cargo test -p rlc-engine --test optimizer_scenarios

use rlc_engine::compiler::optimize::{find_loops, CodeFacts};
use rlc_engine::{analyze_program, generate, parse_source, render_listing, Instruction, Opcode, Optimizer};

fn lower(source: &str) -> Vec<Instruction> {
    let program = parse_source(source).expect("parse error");
    let diagnostics = analyze_program(&program);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
    generate(&program)
}

fn count(code: &[Instruction], op: Opcode) -> usize {
    code.iter().filter(|i| i.op == op).count()
}

// ──── Test 1: folding through variables ────

#[test]
fn test_constant_chain_folds_to_five() {
    let code = lower("x = 2; y = x + 3; print(y);");
    assert_eq!(render_listing(&code), vec!["x = 2", "t1 = x + 3", "y = t1", "PRINT y"]);

    let (optimized, log) = Optimizer::default().optimize(&code);
    assert_eq!(render_listing(&optimized), vec!["y = 5", "PRINT y"]);
    assert!(log.iter().any(|entry| entry.to_string() == "Applied constant_folding at position 1"));
}

// ──── Test 2: if/else shape ────

#[test]
fn test_if_else_shape() {
    let code = lower("scan(x); if (x > 0) { print(x); } else { print(0 - x); }");
    assert_eq!(count(&code, Opcode::IfFalse), 1);
    assert_eq!(count(&code, Opcode::Goto), 1);
    assert_eq!(count(&code, Opcode::Label), 2);
}

// ──── Test 3: unused assignment ────

#[test]
fn test_unused_assignment_removed() {
    let code = lower("a = 1; print(2);");
    let (optimized, _) = Optimizer::default().optimize(&code);
    assert_eq!(render_listing(&optimized), vec!["PRINT 2"]);
}

// ──── Test 4: division by literal zero stops the pipeline ────

#[test]
fn test_division_by_zero_is_diagnosed() {
    let program = parse_source("print(5 / 0);").unwrap();
    assert_eq!(analyze_program(&program), vec!["Division by zero"]);
}

// ──── Test 5: loop records ────

#[test]
fn test_loop_record_covers_label_and_back_edge() {
    let code = lower("i = 0; while (i < 10) { i += 1; }");
    let loops = find_loops(&code);
    assert_eq!(loops.len(), 1);
    assert_eq!(code[loops[0].start].to_string(), "L1:");
    assert_eq!(code[loops[0].end].to_string(), "GOTO L1");
}

#[test]
fn test_nested_loop_records() {
    let code = lower(
        "i = 0; while (i < 3) { j = 0; while (j < 3) { k = 0; while (k < 3) { k += 1; } j += 1; } i += 1; }",
    );
    let loops = find_loops(&code);
    assert_eq!(loops.len(), 3);
    assert_eq!(loops[0].parent, None);
    assert_eq!(loops[1].parent, Some(0));
    assert_eq!(loops[2].parent, Some(1));
    for lp in &loops[1..] {
        let parent = &loops[lp.parent.unwrap()];
        assert!(parent.start < lp.start && lp.end < parent.end);
    }
}

// ──── Test 6: dead-code safety ────

#[test]
fn test_surviving_reads_keep_their_definitions() {
    let sources = [
        "scan(n); i = 0; s = 0; while (i < n) { s = s + i; i += 1; } print(s);",
        "scan(a); b = a * 2; c = b + 1; if (c > 3) { print(c); } else { print(b); }",
        "x = 1; y = 2; z = x + y; x = 4; print(z);",
    ];

    for source in sources {
        let code = lower(source);
        let (optimized, _) = Optimizer::default().optimize(&code);

        assert_eq!(count(&optimized, Opcode::Print), count(&code, Opcode::Print));
        assert_eq!(count(&optimized, Opcode::Scan), count(&code, Opcode::Scan));

        // Every name read somewhere is still defined somewhere
        let facts = CodeFacts::compute(&optimized);
        for instr in &optimized {
            for name in instr.uses() {
                assert!(
                    !facts.def_use.defs_of(name).is_empty(),
                    "{} lost its definition in {:?}",
                    name,
                    render_listing(&optimized)
                );
            }
        }
    }
}

// ──── Test 7: loop-carried state ────

#[test]
fn test_accumulator_loop_keeps_shape() {
    let code = lower("s = 0; i = 0; while (i < 5) { s += 2; i += 1; } print(s);");
    let (optimized, _) = Optimizer::default().optimize(&code);
    let listing = render_listing(&optimized);
    assert!(listing.contains(&"s = s + 2".to_string()));
    assert!(listing.contains(&"i = i + 1".to_string()));
    assert_eq!(count(&optimized, Opcode::Label), 2);
    assert_eq!(listing.last().map(String::as_str), Some("PRINT s"));
}

// ──── Test 8: determinism ────

#[test]
fn test_optimize_is_repeatable() {
    let code = lower("i = 0; while (i < 3) { k = 2 * 4; print(k + i); i += 1; }");
    let optimizer = Optimizer::default();
    assert_eq!(optimizer.optimize(&code), optimizer.optimize(&code));
}
