mod common;
use common::*;
use toy::lang::ErrorCode;
use toy::mach::{Event, Program, Runtime};

fn compile_error(source: &str) -> ErrorCode {
    match Program::compile(source) {
        Ok(_) => panic!("compiled: {}", source),
        Err(e) => e.code(),
    }
}

#[test]
fn test_static_errors() {
    assert_eq!(compile_error("continue;"), ErrorCode::ContinueWithoutLoop);
    assert_eq!(compile_error("break;"), ErrorCode::BreakWithoutLoop);
    assert_eq!(compile_error("return 1;"), ErrorCode::ReturnWithoutFunction);
    assert_eq!(compile_error("x = 1 $"), ErrorCode::IllegalCharacter);
}

#[test]
fn test_loop_context_cleared_in_function() {
    assert_eq!(
        compile_error("while (1) { def f() { break; } }"),
        ErrorCode::BreakWithoutLoop
    );
    assert_eq!(
        compile_error("def f() { def g() { return; } } return;"),
        ErrorCode::ReturnWithoutFunction
    );
}

#[test]
fn test_syntax_errors() {
    for source in [
        "x = 1",
        "x = ;",
        "if x print(1);",
        "for (i = 0; i < 3) print(i);",
        "def f(a, a) { return a; }",
        "def f(a,) { }",
        "{ x = 1;",
        "}",
        "dim a;",
        "print(1) print(2);",
        "x = (1 + 2;",
        ";",
        "5 = x;",
        "f(1) + 2;",
    ] {
        assert_eq!(compile_error(source), ErrorCode::SyntaxError, "{}", source);
    }
}

#[test]
fn test_error_position() {
    let mut r = Runtime::default();
    r.enter("x = 1;\nif (x) {\n  y = ;\n}");
    assert_eq!(
        exec(&mut r),
        "SYNTAX ERROR IN 3 (6..7); EXPECTED EXPRESSION GOT ;\n"
    );
}

#[test]
fn test_errors_stop_the_run() {
    let mut r = Runtime::default();
    r.enter("print(1); x = y; print(2);");
    assert_eq!(r.execute(100), Event::Print("1\n".to_string()));
    match r.execute(100) {
        Event::Errors(errors) => assert_eq!(errors[0].code(), ErrorCode::UndeclaredName),
        event => panic!("{:?}", event),
    }
    assert_eq!(r.execute(100), Event::Stopped);
}

#[test]
fn test_increment_undeclared() {
    let s = run("q++;");
    assert!(s.starts_with("UNDECLARED NAME AT 0"), "{}", s);
}

#[test]
fn test_function_as_variable() {
    let s = run("def f() { return 1; } x = f + 1;");
    assert!(s.starts_with("TYPE MISMATCH"), "{}", s);
}
