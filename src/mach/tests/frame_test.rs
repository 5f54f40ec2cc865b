use super::*;

#[test]
fn test_factorial_depth() {
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
    assert_eq!(run(&mut r), "120\n");
    assert_eq!(r.max_depth(), 5);
}

#[test]
fn test_stack_balanced_after_calls() {
    let mut r = Runtime::default();
    r.enter(
        "
        def f(a, b) { t = a + b; return t; }
        for (i = 0; i < 100; i++) f(i, 1);
        print(f(2, 3));
        ",
    );
    assert_eq!(run(&mut r), "5\n");
    assert_eq!(r.max_depth(), 1);
}

#[test]
fn test_runaway_recursion() {
    let mut r = Runtime::default();
    r.enter("def f(n) { return f(n + 1); } f(0);");
    let s = run_cycles(&mut r, 10_000_000);
    assert!(s.starts_with("OUT OF MEMORY"), "{}", s);
}
