use std::{fs, io};

use mimic::{
    error::{ParseError, RuntimeError},
    interpreter::{executor::Interpreter, value::Value},
    parse_program, run_script,
};
use walkdir::WalkDir;

fn run(source: &str) -> String {
    let mut out = Vec::new();
    if let Err(e) = run_script(source, &mut out) {
        panic!("Script failed: {e}");
    }
    String::from_utf8(out).expect("script output should be UTF-8")
}

fn parse_err(source: &str) -> ParseError {
    match parse_program(source) {
        Ok(_) => panic!("Script parsed but was expected to fail"),
        Err(e) => e,
    }
}

fn run_err(source: &str) -> RuntimeError {
    let program = match parse_program(source) {
        Ok(program) => program,
        Err(e) => panic!("Script failed to parse: {e}"),
    };

    let mut out = Vec::new();
    let mut interpreter = Interpreter::new(&mut out);
    match interpreter.execute(&program) {
        Ok(()) => panic!("Script succeeded but was expected to fail"),
        Err(e) => e,
    }
}

#[test]
fn bundled_scripts_run() {
    let mut count = 0;

    for entry in
        WalkDir::new("scripts").into_iter()
                               .filter_map(Result::ok)
                               .filter(|e| e.path().extension().is_some_and(|ext| ext == "mim"))
    {
        count += 1;
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        let mut out = Vec::new();
        if let Err(e) = run_script(&source, &mut out) {
            panic!("Script {path:?} failed: {e}");
        }
    }

    assert!(count > 0, "No scripts found in scripts/");
}

#[test]
fn while_loop_with_nested_repeat() {
    let output = run(r#"
        SET i = 10;
        WHILE (i > 1) {
            i--;
            IF (i == 5) {
                REPEAT i TIMES {
                    PRINTLN "Hello";
                };
            };
            PRINTLN i;
        };
    "#);
    assert_eq!(output, "9\n8\n7\n6\nHello\nHello\nHello\nHello\nHello\n5\n4\n3\n2\n1\n");
}

#[test]
fn function_definition_and_call() {
    let output = run(r#"
        DEFUN add(a, b) {
            SET c = a + b;
            RETURN c;
        }
        PRINTLN add(5, 3);
    "#);
    assert_eq!(output, "8\n");
}

#[test]
fn continue_skips_to_the_next_iteration() {
    let output = run(r#"
        REPEAT 3 TIMES {
            SET j = 0;
            WHILE (j < 3) {
                IF (j == 1) {
                    j++;
                    CONTINUE;
                };
                PRINTLN j;
                j++;
            };
        };
    "#);
    assert_eq!(output, "0\n2\n0\n2\n0\n2\n");
}

#[test]
fn prefix_and_postfix_updates() {
    let output = run(r#"
        SET i = 5;
        SET j = 10;
        PRINTLN i++;
        PRINTLN i;
        PRINTLN j--;
        PRINTLN j;
        PRINTLN ++i;
        PRINTLN --j;
        SET k = i++ + ++j;
        PRINTLN k;
        PRINTLN i;
        PRINTLN j;
    "#);
    assert_eq!(output, "5\n6\n10\n9\n7\n8\n16\n8\n9\n");
}

#[test]
fn pipeline_composes_functions() {
    let output = run(r#"
        DEFUN add_one(x) {
            RETURN x + 1;
        }
        DEFUN double(x) {
            RETURN x * 2;
        }
        SET result = 5 |> add_one |> double;
        PRINTLN result;
    "#);
    assert_eq!(output, "12\n");
}

#[test]
fn break_leaves_the_innermost_loop() {
    let output = run(r#"
        SET i = 0;
        WHILE (TRUE) {
            i++;
            IF (i == 3) {
                BREAK;
            };
        };
        PRINTLN i;
    "#);
    assert_eq!(output, "3\n");
}

#[test]
fn operator_precedence() {
    assert_eq!(run("PRINTLN 2 + 3 * 4;"), "14\n");
    assert_eq!(run("PRINTLN (2 + 3) * 4;"), "20\n");
    assert_eq!(run("PRINTLN 2 ** 3 ** 2;"), "512\n");
    assert_eq!(run("PRINTLN 7 // 2;"), "3\n");
    assert_eq!(run("PRINTLN 10 % 3;"), "1\n");
    assert_eq!(run("PRINTLN 1 << 3;"), "8\n");
    assert_eq!(run("PRINTLN 6 & 3;"), "2\n");
    assert_eq!(run("PRINTLN 6 | 3;"), "7\n");
    assert_eq!(run("PRINTLN 6 ^ 3;"), "5\n");
    assert_eq!(run("PRINTLN -4 + 1;"), "-3\n");
}

#[test]
fn division_always_produces_a_float_value() {
    assert_eq!(run("PRINTLN 10 / 4;"), "2.5\n");
    assert_eq!(run("PRINTLN 10 / 2;"), "5\n");
}

#[test]
fn boolean_operators_and_display() {
    assert_eq!(run("PRINTLN TRUE && FALSE;"), "FALSE\n");
    assert_eq!(run("PRINTLN TRUE || FALSE;"), "TRUE\n");
    assert_eq!(run("PRINTLN 2 < 3 && 3 < 2 || TRUE;"), "TRUE\n");
}

#[test]
fn strict_equality_requires_the_same_kind() {
    assert_eq!(run("PRINTLN 1 == 1.0;"), "TRUE\n");
    assert_eq!(run("PRINTLN 1 === 1.0;"), "FALSE\n");
    assert_eq!(run("PRINTLN 1 !== 1.0;"), "TRUE\n");
    assert_eq!(run("PRINTLN 1 == \"1\";"), "FALSE\n");
}

#[test]
fn relational_operators_reject_mismatched_kinds() {
    let error = run_err("PRINTLN 1 < \"one\";");
    assert!(matches!(error, RuntimeError::TypeError { .. }));
}

#[test]
fn string_concatenation_and_comparison() {
    assert_eq!(run("PRINTLN \"n = \" + 4;"), "n = 4\n");
    assert_eq!(run("PRINTLN 4 + \"!\";"), "4!\n");
    assert_eq!(run("PRINTLN \"abc\" < \"abd\";"), "TRUE\n");
}

#[test]
fn print_does_not_append_a_newline() {
    assert_eq!(run("PRINT \"a\"; PRINT \"b\"; PRINTLN \"\";"), "ab\n");
}

struct ClosedSink;

impl io::Write for ClosedSink {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn printing_to_a_failed_sink_is_a_runtime_error() {
    let program = parse_program("PRINTLN 1;").unwrap();

    let mut sink = ClosedSink;
    let mut interpreter = Interpreter::new(&mut sink);
    let error = interpreter.execute(&program).unwrap_err();
    assert!(matches!(error, RuntimeError::OutputFailed { line: 1 }));
}

#[test]
fn if_elseif_else_chain() {
    let output = run(r#"
        SET x = 2;
        IF (x == 1) {
            PRINTLN "one";
        } ELSEIF (x == 2) {
            PRINTLN "two";
        } ELSE {
            PRINTLN "many";
        }
    "#);
    assert_eq!(output, "two\n");
}

#[test]
fn else_if_is_a_synonym_for_elseif() {
    let output = run(r#"
        SET x = 3;
        IF (x == 1) THEN {
            PRINTLN "one";
        } ELSE IF (x == 3) THEN {
            PRINTLN "three";
        } ELSE {
            PRINTLN "many";
        }
    "#);
    assert_eq!(output, "three\n");
}

#[test]
fn repeat_with_non_positive_count_runs_zero_times() {
    assert_eq!(run("REPEAT 0 TIMES { PRINTLN \"x\"; } PRINTLN \"done\";"), "done\n");
    assert_eq!(run("REPEAT -2 TIMES { PRINTLN \"x\"; } PRINTLN \"done\";"), "done\n");
}

#[test]
fn repeat_truncates_a_fractional_count() {
    assert_eq!(run("REPEAT 2.5 TIMES { PRINTLN \"x\"; } PRINTLN \"done\";"), "x\nx\ndone\n");
    assert_eq!(run("REPEAT -0.5 TIMES { PRINTLN \"x\"; } PRINTLN \"done\";"), "done\n");
}

#[test]
fn typed_assignment_coerces_and_survives_reassignment() {
    let output = run(r#"
        SET x: INT = "42";
        PRINTLN x;
        SET x = 7.0;
        PRINTLN x;
        SET b AS BOOL = "true";
        PRINTLN b;
    "#);
    assert_eq!(output, "42\n7\nTRUE\n");
}

#[test]
fn declared_type_rejects_a_later_bad_value() {
    let error = run_err(r#"
        SET x: INT = 1;
        SET x = 2.5;
    "#);
    assert!(matches!(error, RuntimeError::FractionalPart { .. }));
}

#[test]
fn time_coercion_accepts_only_time_values() {
    let error = run_err("SET t: TIME = 5;");
    assert!(matches!(error, RuntimeError::InvalidCoercion { .. }));
}

#[test]
fn time_literals_are_seconds() {
    assert_eq!(run("SET t = 500ms + 1.5s; PRINTLN t;"), "2\n");
    assert_eq!(run("PRINTLN 2m;"), "120\n");
}

#[test]
fn named_arguments_are_order_independent() {
    let output = run(r#"
        DEFUN sub(a, b) {
            RETURN a - b;
        }
        PRINTLN sub(10, 2);
        PRINTLN sub(b = 2, a = 10);
        PRINTLN sub(10, b = 2);
    "#);
    assert_eq!(output, "8\n8\n8\n");
}

#[test]
fn missing_argument_is_a_runtime_error() {
    let error = run_err(r#"
        DEFUN sub(a, b) {
            RETURN a - b;
        }
        PRINTLN sub(10);
    "#);
    assert!(matches!(error, RuntimeError::MissingArgument { .. }));
}

#[test]
fn lambdas_capture_a_snapshot_of_their_scope() {
    let output = run(r#"
        SET n = 1;
        SET f = LAMBDA(x) { x + n };
        SET n = 100;
        PRINTLN f(1);
    "#);
    assert_eq!(output, "2\n");
}

#[test]
fn lambda_body_yields_its_last_value_without_return() {
    let output = run(r#"
        SET twice = LAMBDA(x) {
            SET doubled = x * 2;
            doubled
        };
        PRINTLN twice(21);
    "#);
    assert_eq!(output, "42\n");
}

#[test]
fn a_closure_bound_at_top_level_shadows_a_defined_function() {
    let output = run(r#"
        SET f = LAMBDA(x) { RETURN "closure"; };
        DEFUN f(x) {
            RETURN "defined";
        }
        PRINTLN f(1);
    "#);
    assert_eq!(output, "closure\n");
}

#[test]
fn closures_take_positional_arguments_only() {
    let error = run_err(r#"
        SET f = LAMBDA(x) { RETURN x; };
        PRINTLN f(x = 1);
    "#);
    assert!(matches!(error, RuntimeError::TypeError { .. }));
}

#[test]
fn recursion_works_up_to_the_depth_limit() {
    let output = run(r#"
        DEFUN fib(n) {
            IF (n < 2) {
                RETURN n;
            }
            RETURN fib(n - 1) + fib(n - 2);
        }
        PRINTLN fib(10);
    "#);
    assert_eq!(output, "55\n");
}

#[test]
fn unbounded_recursion_hits_the_depth_limit() {
    let error = run_err(r#"
        DEFUN forever() {
            RETURN forever();
        }
        forever();
    "#);
    assert!(matches!(error, RuntimeError::RecursionLimit { .. }));
}

#[test]
fn duplicate_function_definition_is_rejected() {
    let error = run_err(r#"
        DEFUN f() { RETURN 1; }
        DEFUN f() { RETURN 2; }
    "#);
    assert!(matches!(error, RuntimeError::FunctionAlreadyDefined { .. }));
}

#[test]
fn division_by_zero_is_always_an_error() {
    assert!(matches!(run_err("SET x = 1 / 0;"), RuntimeError::DivisionByZero { .. }));
    assert!(matches!(run_err("SET x = 1 // 0;"), RuntimeError::DivisionByZero { .. }));
    assert!(matches!(run_err("SET x = 1.5 % 0;"), RuntimeError::DivisionByZero { .. }));
}

#[test]
fn integer_overflow_is_checked() {
    assert!(matches!(run_err("SET x = 9223372036854775807 + 1;"),
                     RuntimeError::Overflow { .. }));
}

#[test]
fn points_are_first_class_values() {
    let output = run(r#"
        SET p = POINT(3, 4);
        PRINTLN p;
    "#);
    assert_eq!(output, "POINT(3, 4)\n");
}

#[test]
fn control_statements_are_validated_at_parse_time() {
    assert!(matches!(parse_err("BREAK;"), ParseError::ControlOutsideLoop { .. }));
    assert!(matches!(parse_err("CONTINUE;"), ParseError::ControlOutsideLoop { .. }));
    assert!(matches!(parse_err("RETURN 1;"), ParseError::ControlOutsideFunction { .. }));
    assert!(matches!(parse_err("YIELD 1;"), ParseError::ControlOutsideFunction { .. }));
    assert!(matches!(parse_err("DEFUN f() { BREAK; }"),
                     ParseError::ControlOutsideLoop { .. }));
    assert!(matches!(parse_err("WHILE (TRUE) { RETURN; }"),
                     ParseError::ControlOutsideFunction { .. }));
}

#[test]
fn break_inside_a_loop_in_a_function_is_fine() {
    let output = run(r#"
        DEFUN first() {
            SET i = 0;
            WHILE (TRUE) {
                i++;
                BREAK;
            }
            RETURN i;
        }
        PRINTLN first();
    "#);
    assert_eq!(output, "1\n");
}

#[test]
fn undeclared_names_are_rejected_at_parse_time() {
    assert!(matches!(parse_err("PRINTLN y;"), ParseError::UndefinedVariable { .. }));
    assert!(matches!(parse_err("SET x = f(1);"), ParseError::UndefinedFunction { .. }));
    assert!(matches!(parse_err("SET x = ++missing;"),
                     ParseError::UndefinedVariable { .. }));
}

#[test]
fn invalid_type_annotation_is_rejected() {
    assert!(matches!(parse_err("SET x: COLOR = 1;"), ParseError::InvalidType { .. }));
}

#[test]
fn reserved_words_are_rejected() {
    assert!(matches!(parse_err("SCROLL;"), ParseError::ReservedKeyword { .. }));
    assert!(matches!(parse_err("OPEN APP \"calc\";"), ParseError::ReservedKeyword { .. }));
}

#[test]
fn malformed_expressions_are_syntax_errors() {
    assert!(matches!(parse_err("SET x = 1 +;"), ParseError::UnexpectedToken { .. }));
    assert!(matches!(parse_err("SET x = (1 + 2"), ParseError::UnexpectedEndOfInput { .. }));
}

#[test]
fn pass_does_nothing() {
    assert_eq!(run("PASS; PRINTLN 1;"), "1\n");
}

#[test]
fn generators_yield_then_finish() {
    let program = parse_program(r#"
        DEFUN gen() {
            YIELD 1;
            YIELD 2;
            RETURN 3;
        }
        SET g = gen();
    "#).unwrap();

    let mut out = Vec::new();
    let mut interpreter = Interpreter::new(&mut out);
    interpreter.execute(&program).unwrap();

    let generator = interpreter.globals.get("g").unwrap().value.clone();
    assert_eq!(interpreter.resume_generator(&generator, 0).unwrap(),
               Some(mimic::interpreter::value::Value::Integer(1)));
    assert_eq!(interpreter.resume_generator(&generator, 0).unwrap(),
               Some(mimic::interpreter::value::Value::Integer(2)));
    assert_eq!(interpreter.resume_generator(&generator, 0).unwrap(),
               Some(mimic::interpreter::value::Value::Integer(3)));
    assert_eq!(interpreter.resume_generator(&generator, 0).unwrap(), None);
}

#[test]
fn generators_keep_their_local_scope_between_resumes() {
    let program = parse_program(r#"
        DEFUN gen() {
            SET a = 10;
            YIELD a;
            a++;
            YIELD a;
        }
        SET g = gen();
    "#).unwrap();

    let mut out = Vec::new();
    let mut interpreter = Interpreter::new(&mut out);
    interpreter.execute(&program).unwrap();

    let generator = interpreter.globals.get("g").unwrap().value.clone();
    assert_eq!(interpreter.resume_generator(&generator, 0).unwrap(),
               Some(mimic::interpreter::value::Value::Integer(10)));
    assert_eq!(interpreter.resume_generator(&generator, 0).unwrap(),
               Some(mimic::interpreter::value::Value::Integer(11)));
    assert_eq!(interpreter.resume_generator(&generator, 0).unwrap(), None);
}

#[test]
fn a_running_generator_cannot_be_resumed_again() {
    let program = parse_program(r#"
        DEFUN gen() {
            YIELD 1;
            YIELD 2;
        }
        SET g = gen();
    "#).unwrap();

    let mut out = Vec::new();
    let mut interpreter = Interpreter::new(&mut out);
    interpreter.execute(&program).unwrap();

    let generator = interpreter.globals.get("g").unwrap().value.clone();
    let Value::Generator(state) = &generator else {
        panic!("expected a generator value");
    };

    // hold the state borrowed, the way a resume in progress does
    let running = state.borrow_mut();
    let error = interpreter.resume_generator(&generator, 7).unwrap_err();
    assert!(matches!(error, RuntimeError::GeneratorBusy { line: 7 }));
    drop(running);

    assert_eq!(interpreter.resume_generator(&generator, 0).unwrap(),
               Some(Value::Integer(1)));
}

#[test]
fn wait_accumulates_virtual_time() {
    let program = parse_program("WAIT 500ms; WAIT 1.5s;").unwrap();

    let mut out = Vec::new();
    let mut interpreter = Interpreter::new(&mut out);
    interpreter.execute(&program).unwrap();

    assert!((interpreter.clock.elapsed() - 2.0).abs() < f64::EPSILON);
}

#[test]
fn windows_can_be_moved_focused_and_checked() {
    let program = parse_program(r#"
        IF (WINDOW "editor" EXISTS) {
            MOVE WINDOW "editor" TO (10, 20);
            FOCUS WINDOW "editor";
        }
        PRINTLN WINDOW "ghost" EXISTS;
    "#).unwrap();

    let mut out = Vec::new();
    let mut interpreter = Interpreter::new(&mut out);
    interpreter.windows.create_window("editor", 800, 600);
    interpreter.execute(&program).unwrap();

    let window = interpreter.windows.get("editor").unwrap();
    assert_eq!((window.x, window.y), (10, 20));
    assert_eq!(interpreter.windows.focused(), Some("editor"));
    assert_eq!(String::from_utf8(out).unwrap(), "FALSE\n");
}

#[test]
fn focusing_a_missing_window_is_an_error() {
    let error = run_err("FOCUS WINDOW \"nope\";");
    assert!(matches!(error, RuntimeError::WindowNotFound { .. }));
}

#[test]
fn keyboard_holds_and_taps_are_recorded() {
    let program = parse_program(r#"
        HOLD KEY LSHIFT;
        PRESS KEY a;
        PRESS KEY ENTER;
        RELEASE KEY LSHIFT;
        HOLD KEY LCTRL;
    "#).unwrap();

    let mut out = Vec::new();
    let mut interpreter = Interpreter::new(&mut out);
    interpreter.execute(&program).unwrap();

    assert!(!interpreter.keyboard.is_held("LSHIFT"));
    assert!(interpreter.keyboard.is_held("LCTRL"));
    assert_eq!(interpreter.keyboard.taps(), ["a", "ENTER"]);
}

#[test]
fn mouse_moves_to_coordinates_and_points() {
    let program = parse_program(r#"
        MOVE MOUSE TO (100, 200);
        PRESS BUTTON LEFT;
        SET p = POINT(5, 7);
        MOVE MOUSE TO p;
    "#).unwrap();

    let mut out = Vec::new();
    let mut interpreter = Interpreter::new(&mut out);
    interpreter.execute(&program).unwrap();

    assert_eq!(interpreter.mouse.position(), (5, 7));
    assert_eq!(interpreter.mouse.presses(), ["LEFT"]);
}

#[test]
fn key_names_still_work_as_variable_names() {
    // single letters and key words double as identifiers outside KEY position
    let output = run(r#"
        SET a = 1;
        SET ENTER = 2;
        PRINTLN a + ENTER;
    "#);
    assert_eq!(output, "3\n");
}

#[test]
fn predeclared_names_parse_across_programs() {
    let mut out = Vec::new();
    let mut interpreter = Interpreter::new(&mut out);
    interpreter.execute(&parse_program("SET x = 1;").unwrap()).unwrap();

    // a second program sees the live bindings, the way the interactive
    // loop feeds one interpreter line by line
    let tokens = mimic::interpreter::lexer::tokenize("PRINTLN x + 1;").unwrap();
    let mut parser = mimic::interpreter::parser::Parser::new(tokens);
    parser.predeclare(interpreter.globals.keys().map(String::as_str),
                      interpreter.function_names());
    let program = parser.parse().unwrap();
    interpreter.execute(&program).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "2\n");
}

#[test]
fn comments_are_ignored() {
    let output = run(r#"
        # a line comment
        SET x = 1; # trailing
        #* a block
           comment *#
        PRINTLN x;
    "#);
    assert_eq!(output, "1\n");
}
