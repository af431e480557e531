use std::fs::{self};

use plainscript::{
    error::{CompileError, ParseError, RuntimeError},
    interpreter::{
        evaluator::core::{Context, Execution},
        lexer::tokenize,
        parser::parse,
    },
    run,
};
use walkdir::WalkDir;

#[test]
fn sample_scripts_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| e.path().extension().is_some_and(|ext| ext == "pls"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let expected_path = path.with_extension("out");
        let expected = fs::read_to_string(&expected_path).unwrap_or_else(|e| {
                                                             panic!("Failed to read {expected_path:?}: {e}")
                                                         });

        count += 1;
        match run(&source) {
            Ok(output) => {
                let expected = expected.lines().collect::<Vec<_>>();
                assert_eq!(output, expected, "Unexpected output from {path:?}");
            },
            Err(e) => panic!("Script {path:?} failed:\n{source}\nErrors: {e:?}"),
        }
    }

    assert!(count > 0, "No sample scripts found in tests/scripts");
}

fn assert_output(src: &str, expected: &[&str]) {
    match run(src) {
        Ok(output) => assert_eq!(output, expected, "Unexpected output from:\n{src}"),
        Err(e) => panic!("Script failed: {e:?}"),
    }
}

fn assert_success(src: &str) {
    if let Err(e) = run(src) {
        panic!("Script failed: {e:?}");
    }
}

fn assert_failure(src: &str) -> Vec<CompileError> {
    match run(src) {
        Ok(output) => panic!("Script succeeded but was expected to fail, output: {output:?}"),
        Err(errors) => errors,
    }
}

/// Runs a syntactically valid program and keeps both the printed lines and
/// the diagnostics.
fn execute(src: &str) -> Execution {
    let program = parse(&tokenize(src).lexemes).program
                                               .unwrap_or_else(|| panic!("Script does not parse:\n{src}"));
    let mut context = Context::new();
    context.run_program(&program);
    context.finish()
}

fn runtime_errors(src: &str) -> Vec<RuntimeError> {
    assert_failure(src).into_iter()
                       .map(|e| match e {
                           CompileError::Runtime(e) => e,
                           other => panic!("Expected a semantic error, got {other}"),
                       })
                       .collect()
}

#[test]
fn assignment_and_basic_arithmetic() {
    assert_output("let x = 2 + 3 * 4; print(x);", &["14"]);
    assert_output("let x = (2 + 3) * 4; print(x);", &["20"]);
    assert_output("let x = 8 - 5 - 1; print(x);", &["2"]);
    assert_output("let x = 10 / 4; print(x);", &["2.5"]);
    assert_output("let x = 10 / 2; print(x);", &["5.0"]);
    assert_output("let x = 1.5 * 2; print(x);", &["3.0"]);
}

#[test]
fn unary_operators() {
    assert_output("let x = 4; print(-x, +x, - -x);", &["-4 4 4"]);
    assert_output("print(3 - -2);", &["5"]);
}

#[test]
fn print_joins_items_with_spaces() {
    assert_output(r#"print("a", 1+2, "b");"#, &["a 3 b"]);
    assert_output(r#"print("tab\there", true, 0.5);"#, &["tab\there true 0.5"]);
}

#[test]
fn wrapped_programs_run() {
    assert_output("begin\n  let x = 1;\n  print(x);\nend", &["1"]);
}

#[test]
fn comments_are_ignored() {
    assert_output("// first\nlet x = 1; /* a\nlonger\ncomment */ print(x);", &["1"]);
}

#[test]
fn if_elseif_else() {
    let src = "function grade(n) begin
                   if n >= 90 begin return \"A\"; end
                   elseif n >= 80 begin return \"B\"; end
                   else begin return \"C\"; end
               end
               print(grade(95), grade(85), grade(10));";
    assert_output(src, &["A B C"]);
}

#[test]
fn conditions_combine() {
    assert_output("let x = 5; if x > 1 and not x > 9 print(\"in\"); else print(\"out\");",
                  &["in"]);
    assert_output("let x = 5; if (x < 1 or x == 5) and true print(1);", &["1"]);
    assert_output("if \"\" print(1); else print(0);", &["0"]);
}

#[test]
fn branch_scopes_are_discarded() {
    assert_output("let x = 1; if true begin let x = 2; print(x); end print(x);",
                  &["2", "1"]);
}

#[test]
fn for_loops_count_in_both_directions() {
    assert_output("for let i = 1 to 5 print(i);", &["1", "2", "3", "4", "5"]);
    assert_output("for let i = 5 to 1 step -1 print(i);", &["5", "4", "3", "2", "1"]);
    assert_output("for let i = 0 to 1 step 0.5 print(i);", &["0", "0.5", "1.0"]);
    assert_output("for let i = 1 to 0 print(i); print(\"done\");", &["done"]);
}

#[test]
fn for_loops_drive_existing_variables() {
    assert_output("let i = 0; for i = 1 to 3 begin end print(i);", &["3"]);
    assert_output("for let i = 1; to 2 print(i);", &["1", "2"]);
}

#[test]
fn loop_scope_allows_redeclaration_afterwards() {
    assert_output("for let i = 1 to 2 begin let t = i; end let t = 9; print(t);", &["9"]);
    assert_output("for let i = 1 to 3 begin let sq = i * i; print(sq); end", &["1", "4", "9"]);
}

#[test]
fn existing_variables_count_down() {
    assert_output("let i = 0; for i = 5 to 1 step -1 print(i); print(i);",
                  &["5", "4", "3", "2", "1", "1"]);
}

#[test]
fn large_integers_mix_with_reals() {
    assert_output("let x = 9007199254740993; print(x / 1); print(x - 1);",
                  &["9007199254740992.0", "9007199254740992"]);
}

#[test]
fn continue_in_while_rechecks_the_condition() {
    let src = "let i = 0;
               while i < 5 begin
                   i = i + 1;
                   if i == 1 or i == 3 continue;
                   print(i);
               end";
    assert_output(src, &["2", "4", "5"]);
}

#[test]
fn break_and_continue() {
    let src = "for let i = 1 to 10 begin
                   if i == 2 continue;
                   if i == 4 break;
                   print(i);
               end";
    assert_output(src, &["1", "3"]);

    let src = "let i = 0;
               while i < 3 begin
                   i = i + 1;
                   for let j = 1 to 5 begin
                       if j > 1 break;
                       print(i, j);
                   end
               end";
    assert_output(src, &["1 1", "2 1", "3 1"]);
}

#[test]
fn while_loops() {
    assert_output("let n = 3; while n > 0 begin print(n); n = n - 1; end", &["3", "2", "1"]);
}

#[test]
fn recursion() {
    let src = "function f(n) begin
                   if n > 10 begin return n; end
                   else begin return f(n + 1); end
               end
               print(f(1));";
    assert_output(src, &["11"]);

    let src = "function fact(n) begin
                   if n <= 1 return 1;
                   return n * fact(n - 1);
               end
               print(fact(10));";
    assert_output(src, &["3628800"]);
}

#[test]
fn return_leaves_loops_inside_functions() {
    let src = "function first_over(limit) begin
                   for let i = 1 to 100 begin
                       if i * i > limit return i;
                   end
                   return 0;
               end
               print(first_over(50));";
    assert_output(src, &["8"]);
}

#[test]
fn functions_without_return_yield_null() {
    assert_output("function noop() begin end let x = noop(); print(1);", &["1"]);
}

#[test]
fn natural_language_operations() {
    let src = "let x = 10;
               add 5 to x;
               sub 3 from x;
               mult x by 2;
               print(x);
               div x by 8;
               print(x);
               set x to \"done\";
               print(x);";
    assert_output(src, &["24", "3.0", "done"]);
}

#[test]
fn natural_language_if() {
    assert_output("let x = 7; if x is > 5 then print(\"big\"); print(\"after\");",
                  &["big", "after"]);
    assert_output("let x = 1; if x is == 2 then begin print(\"two\"); end print(\"end\");",
                  &["end"]);
}

#[test]
fn fresh_state_for_every_run() {
    assert_success("let x = 1;");
    assert_success("let x = 2; print(x);");
    let errors = assert_failure("print(x);");
    assert_eq!(errors.len(), 1);
}

#[test]
fn division_by_zero_is_one_diagnostic() {
    let errors = runtime_errors("let x = 1;\nlet y = x / 0;");
    assert_eq!(errors, vec![RuntimeError::DivisionByZero { line: 2 }]);

    let errors = runtime_errors("let x = 1;\n\ndiv x by 0;");
    assert_eq!(errors, vec![RuntimeError::DivisionByZero { line: 3 }]);
}

#[test]
fn failed_values_are_absent() {
    let errors = runtime_errors("let y = 1 / 0;\nprint(y);");
    assert_eq!(errors,
               vec![RuntimeError::DivisionByZero { line: 1 },
                    RuntimeError::NoValue { name: "y".to_string(),
                                            line: 2, }]);
}

#[test]
fn redeclaration_in_the_same_scope() {
    let errors = runtime_errors("let x = 1;\nlet x = 2;\nprint(x);");
    assert_eq!(errors,
               vec![RuntimeError::Redeclaration { name: "x".to_string(),
                                                  line: 2, }]);
}

#[test]
fn undeclared_names_stop_the_program() {
    let errors = runtime_errors("y = 1;\nprint(z);");
    assert_eq!(errors,
               vec![RuntimeError::UnknownVariable { name: "y".to_string(),
                                                    line: 1, }]);

    let errors = runtime_errors("let a = missing(1);");
    assert!(matches!(errors[..], [RuntimeError::UnknownFunction { line: 1, .. }]));
}

#[test]
fn type_mismatches_are_reported_and_evaluation_continues() {
    let errors = runtime_errors("let s = \"a\" + 1;\nlet t = true * 2;\nprint(1);");
    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0], RuntimeError::TypeMismatch { line: 1, .. }));
    assert!(matches!(errors[1], RuntimeError::TypeMismatch { line: 2, .. }));
}

#[test]
fn argument_count_mismatch() {
    let errors = runtime_errors("function f(a, b) begin return a; end\nprint(f(1));");
    assert!(matches!(errors[..],
                     [RuntimeError::ArgumentCountMismatch { expected: 2,
                                                            found: 1,
                                                            line: 2,
                                                            .. }]));
}

#[test]
fn missing_arguments_leave_parameters_unbound() {
    let execution = execute("function f(a, b) begin print(a); print(b); end\nf(1);");

    assert_eq!(execution.output, ["1"]);
    assert_eq!(execution.diagnostics,
               [RuntimeError::ArgumentCountMismatch { name:     "f".to_string(),
                                                      expected: 2,
                                                      found:    1,
                                                      line:     2, },
                RuntimeError::UnknownVariable { name: "b".to_string(),
                                                line: 1, }]);
}

#[test]
fn extra_arguments_are_dropped() {
    let execution = execute("function g(a) begin print(a); end\ng(7, 8, 9);");

    assert_eq!(execution.output, ["7"]);
    assert_eq!(execution.diagnostics,
               [RuntimeError::ArgumentCountMismatch { name:     "g".to_string(),
                                                      expected: 1,
                                                      found:    3,
                                                      line:     2, }]);
}

#[test]
fn break_outside_loop() {
    let errors = runtime_errors("print(1);\nbreak;\nprint(2);");
    assert_eq!(errors, vec![RuntimeError::BreakOutsideLoop { line: 2 }]);

    let errors = runtime_errors("function f() begin continue; end\nf();");
    assert_eq!(errors, vec![RuntimeError::ContinueOutsideLoop { line: 1 }]);
}

#[test]
fn runaway_while_loops_are_stopped() {
    let errors = runtime_errors("let i = 0;\nwhile true begin i = i + 1; end\nprint(i);");
    assert_eq!(errors,
               vec![RuntimeError::IterationLimit { limit: 100_000,
                                                   line:  2, }]);
}

#[test]
fn runaway_recursion_is_stopped() {
    let errors = runtime_errors("function down(n) begin return down(n + 1); end\ndown(0);");
    assert!(matches!(errors[..], [RuntimeError::CallDepthExceeded { limit: 1_000, .. }]));
}

#[test]
fn reserved_words_are_rejected_as_names() {
    let errors = assert_failure("let if = 5;");
    assert!(matches!(errors[..],
                     [CompileError::Parse(ParseError::ReservedName { ref word, line: 1 })] if word == "if"));

    let errors = assert_failure("function to(a) begin end");
    assert!(matches!(errors[0], CompileError::Parse(ParseError::ReservedName { .. })));
}

#[test]
fn syntax_errors_are_all_reported() {
    let errors = assert_failure("let x = ;\nprint(1);\nlet = 3;\nprint(2)");
    let lines = errors.iter().map(CompileError::line).collect::<Vec<_>>();
    assert_eq!(lines, [Some(1), Some(3), Some(4)]);
}

#[test]
fn lexical_errors_win() {
    let errors = assert_failure("let x = 1 # 2;\nlet = ;");
    assert!(matches!(errors[..], [CompileError::Lex(_)]));
    assert_eq!(errors[0].to_string(),
               "Lexical error on line 1: Illegal character '#' at position 10.");
}
