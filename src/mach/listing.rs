use super::{Cell, Opcode, Program};

/// Disassembly of a program, one instruction per line with its
/// inline operands.
pub struct Listing<'a> {
    program: &'a Program,
}

impl<'a> Listing<'a> {
    pub fn new(program: &'a Program) -> Listing<'a> {
        Listing { program }
    }
}

/// Operand cells that follow the opcode at `addr`.
pub fn operand_len(program: &Program, addr: usize) -> usize {
    match program.get(addr) {
        Some(Cell::Op(Opcode::FuncDef)) => match program.get(addr + 2) {
            Some(Cell::Count(n)) => n + 3,
            _ => Opcode::FuncDef.arity(),
        },
        Some(Cell::Op(op)) => op.arity(),
        _ => 0,
    }
}

impl<'a> std::fmt::Display for Listing<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let cells = self.program.cells();
        let mut addr = 0;
        while addr < cells.len() {
            let len = operand_len(self.program, addr);
            write!(f, "{:>5}  {}", addr, cells[addr])?;
            for cell in cells.iter().skip(addr + 1).take(len) {
                write!(f, " {}", cell)?;
            }
            writeln!(f)?;
            addr += len + 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing() {
        let program = Program::compile("def f(a, b) { return a; }\nwhile (0) x = 1;").unwrap();
        let s = Listing::new(&program).to_string();
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines[0], "    0  FUNCDEF f #2 a b #8");
        assert_eq!(lines[1], "    6  ENTERFUNCTION");
        assert_eq!(lines[2], "    7  PUSHVAR a false");
        assert_eq!(lines[3], "   10  EXTRACT");
        assert_eq!(lines[4], "   11  RETURN true");
        assert_eq!(lines[5], "   13  LEAVEFUNCTION");
        assert_eq!(lines[6], "   14  NOP");
        assert_eq!(lines[7], "   15  PUSHNUM 0");
        assert_eq!(lines[8], "   17  WHILE @28");
    }
}
