use super::*;

#[test]
fn test_continue_runs_step() {
    let mut r = Runtime::default();
    r.enter(
        "
        n = 0;
        for (i = 0; i < 5; i++) {
            if (i % 2 == 0) { continue; }
            n = n + i;
        }
        print(n);
        print(i);
        ",
    );
    assert_eq!(run(&mut r), "4\n5\n");
}

#[test]
fn test_break_skips_step() {
    let mut r = Runtime::default();
    r.enter(
        "
        for (i = 0; i < 10; i++) {
            if (i == 3) break;
        }
        print(i);
        ",
    );
    assert_eq!(run(&mut r), "3\n");
}

#[test]
fn test_break_from_nested_blocks() {
    let mut r = Runtime::default();
    r.enter(
        "
        for (i = 0; i < 10; i++) {
            {
                { if (i == 2) { break; } }
            }
        }
        print(i);
        ",
    );
    assert_eq!(run(&mut r), "2\n");
    assert_eq!(r.symbols().depth(), 1);
}

#[test]
fn test_empty_init_and_step() {
    let mut r = Runtime::default();
    r.enter("i = 3; for (; i > 0;) i--; print(i);");
    assert_eq!(run(&mut r), "0\n");
}

#[test]
fn test_interrupt() {
    let mut r = Runtime::default();
    r.enter("while (1) { x = 1; }");
    assert_eq!(r.execute(100), Event::Running);
    r.interrupt();
    let s = run(&mut r);
    assert!(s.starts_with("BREAK AT "));
}
