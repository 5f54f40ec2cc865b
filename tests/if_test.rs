mod common;
use common::*;

#[test]
fn test_if_true_false() {
    assert_eq!(run("if (1) print(1); if (0) print(2); print(3);"), "1\n3\n");
}

#[test]
fn test_if_truthiness() {
    assert_eq!(run("if (-0.5) print(1);"), "1\n");
    assert_eq!(run("if (0 / 0) print(1); print(2);"), "2\n");
}

#[test]
fn test_if_block() {
    assert_eq!(
        run("
            x = 5;
            if (x > 3) {
                y = x * 2;
                print(y);
            }
            if (x > 10) {
                print(0);
            }
        "),
        "10\n"
    );
}

#[test]
fn test_nested_if() {
    assert_eq!(
        run("
            for (i = 0; i < 6; i++) {
                if (i % 2 == 0) {
                    if (i % 3 == 0) print(i);
                }
            }
        "),
        "0\n"
    );
}
