/*!
## Rust Machine Module

This Rust module is a code generator and stack-based virtual machine
for the toy language.

*/

pub type Address = usize;

mod code;
mod codegen;
mod frame;
mod function;
mod link;
mod listing;
mod opcode;
mod operation;
mod program;
mod runtime;
mod stack;
mod symbol;
mod val;

pub use code::Cell;
pub use code::Code;
pub use codegen::codegen;
pub use frame::CallFrame;
pub use function::Function;
pub use link::Label;
pub use link::Link;
pub use listing::Listing;
pub use opcode::Opcode;
pub use operation::Operation;
pub use program::Program;
pub use runtime::Event;
pub use runtime::Runtime;
pub use stack::Stack;
pub use symbol::Symbol;
pub use symbol::SymbolId;
pub use symbol::SymbolTable;
pub use symbol::UserFunction;
pub use val::Val;

#[cfg(test)]
mod tests;
