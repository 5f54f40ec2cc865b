//! # toy
//!
//! Runs a toy language program from a file or the command line.
//!

mod term;

use toy::mach;

fn main() {
    term::main();
}
