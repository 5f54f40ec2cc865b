//! # toy
//!
//! A tiny imperative scripting language. Source text is lexed, then
//! compiled in a single pass straight into a flat instruction stream
//! for a stack machine. There is no syntax tree.
//!
//! ```
//! use toy::mach::{Event, Runtime};
//!
//! let mut runtime = Runtime::default();
//! runtime.enter("def sq(x) { return x * x; } print(sq(7));");
//! assert_eq!(runtime.execute(1000), Event::Print("49\n".to_string()));
//! assert_eq!(runtime.execute(1000), Event::Stopped);
//! ```
//!
//! The `toy` executable runs a program file or a `-e` argument.
//! ```text
//! $ toy -e 'for (i = 0; i < 3; i++) print(i * i);'
//! 0
//! 1
//! 4
//! ```

#[path = "doc/introduction.rs"]
#[allow(non_snake_case)]
pub mod _Introduction;

#[path = "doc/language.rs"]
#[allow(non_snake_case)]
pub mod __Language_Reference;

pub mod lang;
pub mod mach;
