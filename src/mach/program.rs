use super::{codegen, Address, Cell, Code, Link};
use crate::lang::{lex, Error};

type Result<T> = std::result::Result<T, Error>;

/// ## Assembled program
///
/// The fragments from code generation concatenated into one stream
/// with every label resolved to an address.

#[derive(Debug, Default)]
pub struct Program {
    cells: Vec<Cell>,
}

impl Program {
    pub fn compile(source: &str) -> Result<Program> {
        let tokens = lex(source)?;
        let fragments = codegen(&tokens)?;
        Program::assemble(fragments)
    }

    pub fn assemble<T: IntoIterator<Item = Code>>(fragments: T) -> Result<Program> {
        let mut link = Link::new();
        let mut cells: Vec<Cell> = vec![];
        for fragment in fragments {
            for cell in fragment.into_cells() {
                let addr = cells.len();
                match cell {
                    Cell::Define(label) => {
                        link.define(label, addr)?;
                        cells.push(Cell::Op(super::Opcode::Nop));
                    }
                    Cell::Reference(label) => {
                        link.reference(label, addr);
                        cells.push(cell);
                    }
                    _ => cells.push(cell),
                }
            }
        }
        link.link(&mut cells)?;
        log::debug!("assembled {} cells", cells.len());
        Ok(Program { cells })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, addr: Address) -> Option<&Cell> {
        self.cells.get(addr)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}
