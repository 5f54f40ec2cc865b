use super::{Address, Label, Opcode};
use std::rc::Rc;

/// One slot of the instruction stream. Labels only exist until the
/// program is assembled; afterwards a `Define` is a `Nop` and a
/// `Reference` is the `Address` it resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Op(Opcode),
    Name(Rc<str>),
    Number(f64),
    Count(usize),
    Flag(bool),
    Address(Address),
    Define(Label),
    Reference(Label),
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Cell::*;
        match self {
            Op(op) => write!(f, "{}", op),
            Name(s) => write!(f, "{}", s),
            Number(n) => write!(f, "{}", super::Val::Number(*n)),
            Count(n) => write!(f, "#{}", n),
            Flag(b) => write!(f, "{}", b),
            Address(a) => write!(f, "@{}", a),
            Define(l) => write!(f, "{}:", l),
            Reference(l) => write!(f, "{}", l),
        }
    }
}

/// A fragment of the instruction stream under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Code {
    cells: Vec<Cell>,
}

impl Code {
    pub fn new() -> Code {
        Code::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    pub fn op(&mut self, op: Opcode) -> &mut Code {
        self.cells.push(Cell::Op(op));
        self
    }

    pub fn name(&mut self, name: &Rc<str>) -> &mut Code {
        self.cells.push(Cell::Name(name.clone()));
        self
    }

    pub fn number(&mut self, n: f64) -> &mut Code {
        self.cells.push(Cell::Number(n));
        self
    }

    pub fn count(&mut self, n: usize) -> &mut Code {
        self.cells.push(Cell::Count(n));
        self
    }

    pub fn flag(&mut self, b: bool) -> &mut Code {
        self.cells.push(Cell::Flag(b));
        self
    }

    pub fn define(&mut self, label: Label) -> &mut Code {
        self.cells.push(Cell::Define(label));
        self
    }

    pub fn reference(&mut self, label: Label) -> &mut Code {
        self.cells.push(Cell::Reference(label));
        self
    }

    pub fn append(&mut self, mut other: Code) -> &mut Code {
        self.cells.append(&mut other.cells);
        self
    }
}
