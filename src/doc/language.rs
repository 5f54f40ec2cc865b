/*!
# Language Reference

## Lexical structure

Whitespace is space, tab, carriage return and newline. `//` starts a
comment that runs to the end of the line.

Identifiers are an ASCII letter followed by letters and digits.
Numbers are unsigned decimals like `42`, `3.5` or `.25`. There is no
exponent form and no sign; `-1` is negation applied to `1`.

Keywords: `if for while def return dim break continue`

## Operators

From loosest to tightest binding. Binary operators of the same rank
associate to the left.

| Operators | Meaning |
|-----------|---------|
| `\|\|` | logical or |
| `&&` | logical and |
| `\|` | bitwise or |
| `^` | bitwise xor |
| `&` | bitwise and |
| `==` `!=` | equality |
| `<` `<=` `>` `>=` | comparison |
| `<<` `>>` | shift |
| `+` `-` | additive |
| `*` `/` `%` | multiplicative |
| `-` `!` `~` `++` `--` | prefix |

Comparisons and logic produce `1` or `0`. Both sides of `&&` and `||`
are always evaluated. Bitwise operators and shifts convert their
operands to 32-bit integers first; the shift amount uses its low five
bits. Postfix `++` and `--` are also available on variables and array
elements.

## Scopes

Each block and each function call opens a scope. Assigning an unknown
name creates it in the innermost scope. A function body encloses the
global scope, not the scope it was called from, so it never sees the
block-local variables of its caller:

```text
def f() { print(x); }
{ x = 5; f(); }     // UNDECLARED NAME
x = 5; f();         // 5
```

Builtin functions and the constants `pi` and `e` live in the global
scope and are visible everywhere.

## Builtin functions

| Function | Result |
|----------|--------|
| `print(x)` | prints `x` on its own line; `print()` prints an empty line |
| `sin(x)` `cos(x)` `tan(x)` `atan(x)` | trigonometry in radians |
| `exp(x)` `log(x)` `log10(x)` | `log` is the natural logarithm |
| `sqrt(x)` `pow(x, y)` | |
| `int(x)` | largest integer not above `x` |
| `round(x)` | nearest integer, halves round up |
| `rand()` | uniform in `[0, 1)` |

`print` has no value and can only be used as a statement.

The constants `pi` and `e` are predefined and read-only.

## Number output

Integral values print without a decimal point. NaN prints as `NaN` and
infinities as `Infinity` and `-Infinity`. Magnitudes of `1e21` and
above, or below `1e-6`, print in exponent form such as `1e+21`.

## Errors

Errors stop the program. Compile errors report the line and column
range of the offending token. Run-time errors report the address of
the failing instruction, which can be found with `toy --listing`.

| Error | Raised by |
|-------|-----------|
| `ILLEGAL CHARACTER` | a character the lexer does not know |
| `SYNTAX ERROR` | malformed statements |
| `CONTINUE WITHOUT LOOP` `BREAK WITHOUT LOOP` | outside any loop |
| `RETURN WITHOUT FUNCTION` | `return` at the top level |
| `UNDECLARED NAME` | reading an unknown variable, array or function |
| `REDIMENSIONED ARRAY` | `dim` of a name already in the same scope |
| `TYPE MISMATCH` | using an array as a number, assigning a constant |
| `SUBSCRIPT OUT OF RANGE` | array index outside the array |
| `ILLEGAL FUNCTION CALL` | wrong argument count, bad array size |
| `MISSING RETURN VALUE` | a function used as a value returned nothing |
| `OUT OF MEMORY` | runaway recursion |
| `BREAK` | CTRL-C |
*/
