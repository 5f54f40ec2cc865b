mod common;
use common::*;
use toy::mach::Runtime;

#[test]
fn test_factorial() {
    let mut r = Runtime::default();
    r.enter(
        "
        def fact(n) {
            if (n <= 1) { return 1; }
            return n * fact(n - 1);
        }
        print(fact(5));
        ",
    );
    assert_eq!(exec(&mut r), "120\n");
    assert_eq!(r.max_depth(), 5);
}

#[test]
fn test_fibonacci() {
    assert_eq!(
        run("
            def fib(n) {
                if (n <= 1) { return n; }
                return fib(n - 1) + fib(n - 2);
            }
            for (i = 0; i < 10; i++) print(fib(i));
        "),
        "0\n1\n1\n2\n3\n5\n8\n13\n21\n34\n"
    );
}

#[test]
fn test_parameter_writes() {
    assert_eq!(
        run("
            def countdown(n) {
                while (n > 0) { n = n - 1; }
                n++;
                return n;
            }
            n = 10;
            print(countdown(3));
            print(n);
        "),
        "1\n10\n"
    );
}

#[test]
fn test_parameters_shadow_globals() {
    assert_eq!(
        run("
            a = 100;
            def f(a, b) { return a - b; }
            print(f(5, 2));
            print(a);
        "),
        "3\n100\n"
    );
}

#[test]
fn test_call_statement_drops_value() {
    assert_eq!(
        run("
            count = 0;
            def bump() { count = count + 1; return count; }
            bump();
            bump();
            print(bump());
        "),
        "3\n"
    );
}

#[test]
fn test_nested_calls_in_arguments() {
    assert_eq!(
        run("
            def add(a, b) { return a + b; }
            def twice(x) { return add(x, x); }
            print(add(twice(2), add(1, twice(3))));
        "),
        "11\n"
    );
}

#[test]
fn test_redefinition_replaces() {
    assert_eq!(
        run("
            def f() { return 1; }
            print(f());
            def f() { return 2; }
            print(f());
        "),
        "1\n2\n"
    );
}

#[test]
fn test_fall_off_end() {
    assert_eq!(
        run("
            def hello() { print(1); }
            hello();
            print(2);
        "),
        "1\n2\n"
    );
}

#[test]
fn test_missing_return_value() {
    let s = run("
        def nothing() { x = 1; }
        y = nothing() + 1;
    ");
    assert!(s.starts_with("MISSING RETURN VALUE AT "), "{}", s);
}

#[test]
fn test_wrong_argument_count() {
    let s = run("def f(a) { return a; } f(1, 2);");
    assert!(s.starts_with("ILLEGAL FUNCTION CALL AT "), "{}", s);
    assert!(s.ends_with("; WRONG NUMBER OF ARGUMENTS TO f\n"), "{}", s);
}

#[test]
fn test_undefined_function() {
    assert_eq!(
        run("nope(1);"),
        "UNDECLARED NAME AT 2; FUNCTION nope NOT DECLARED\n"
    );
}

#[test]
fn test_builtins() {
    assert_eq!(run("print(sqrt(16) + pow(2, 3));"), "12\n");
    assert_eq!(run("print(int(-1.5));"), "-2\n");
    assert_eq!(run("print(round(1.5) + round(-1.5));"), "1\n");
    assert_eq!(run("print(exp(0) + cos(0) + sin(0) + tan(0) + atan(0));"), "2\n");
    assert_eq!(run("print(log(1) + log10(1) + 2);"), "2\n");
    assert_eq!(run("sqrt(4); print(1);"), "1\n");
}

#[test]
fn test_rand_is_seeded() {
    let mut a = Runtime::with_seed(7);
    let mut b = Runtime::with_seed(7);
    let source = "for (i = 0; i < 5; i++) print(int(rand() * 1000));";
    a.enter(source);
    b.enter(source);
    let sa = exec(&mut a);
    assert_eq!(sa, exec(&mut b));
    assert_eq!(sa.lines().count(), 5);
    a.enter(source);
    assert_eq!(sa, exec(&mut a));
}

#[test]
fn test_print_has_no_value() {
    let s = run("x = print(1);");
    assert!(s.starts_with("SYNTAX ERROR IN 1 (4..9)"), "{}", s);
}

#[test]
fn test_builtin_arity_checked_at_compile() {
    assert_eq!(
        run("print(1);\nx = pow(2);"),
        "ILLEGAL FUNCTION CALL IN 2 (4..7); WRONG NUMBER OF ARGUMENTS TO pow\n"
    );
}
