/*!
# Introductory Tutorial

A toy program is a sequence of statements. Statements end with a
semicolon unless they end with a block. Save the following as
`hello.toy` and run it with `toy hello.toy`.

```text
print(6 * 7);
```

Every value is a number. There are no strings, so `print` takes a
single number, or nothing at all to print an empty line.

## Variables

Assigning to a name creates it in the innermost scope if it does not
already exist somewhere in an enclosing scope. Reading a name that was
never assigned is an error.

```text
x = y = 3;
print(x + y);
```

A pair of braces opens a new scope. Names created inside disappear
when the block ends, but names that already existed outside are
updated in place.

```text
x = 1;
{
    x = 2;
    y = 3;
}
print(x);   // 2
print(y);   // UNDECLARED NAME
```

## Loops and conditions

There is `if`, `while` and a C-style `for`. Conditions are numbers:
zero and NaN are false, everything else is true. `break` and
`continue` work in both kinds of loop. In a `for` loop `continue`
still runs the step.

```text
for (i = 1; i <= 10; i++) {
    if (i % 2) continue;
    print(i);
}
```

## Functions

Functions are defined with `def`. Parameters are local to the call.
Other names inside a function resolve against the function's own
scope and then the global scope, never the caller's.

```text
def fib(n) {
    if (n <= 1) { return n; }
    return fib(n - 1) + fib(n - 2);
}
print(fib(20));
```

## Arrays

`dim` allocates a fixed-size array of zeros. Indexes start at zero and
are checked. Arrays can be passed to functions by name.

```text
dim squares[5];
for (i = 0; i < 5; i++) squares[i] = i * i;
print(squares[4]);
```

Stop a running program with CTRL-C.
*/
