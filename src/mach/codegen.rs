use super::{Code, Label, Opcode};
use crate::error;
use crate::lang::token::{Builtin, IncDec, Kind, Operator, Word};
use crate::lang::{Error, Token};
use std::collections::HashSet;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Generates one fragment of cells for every top-level statement.
/// There is no syntax tree; each rule returns the code it parsed.
pub fn codegen(tokens: &[Token]) -> Result<Vec<Code>> {
    let mut generator = Generator::new(tokens);
    let fragments = generator.program()?;
    log::debug!(
        "generated {} fragments with {} labels",
        fragments.len(),
        generator.labels
    );
    Ok(fragments)
}

#[derive(Debug, Clone, Copy)]
struct Loop {
    next: Label,
    exit: Label,
    blocks: usize,
}

struct Generator<'a> {
    tokens: &'a [Token],
    end: Token,
    pos: usize,
    labels: usize,
    loops: Vec<Loop>,
    blocks: usize,
    functions: usize,
    arrays: HashSet<Rc<str>>,
}

impl<'a> Generator<'a> {
    fn new(tokens: &'a [Token]) -> Generator<'a> {
        let end = match tokens.last() {
            Some(t) => Token::new(Kind::End, "", t.line, t.column.end..t.column.end),
            None => Token::new(Kind::End, "", 1, 0..0),
        };
        Generator {
            tokens,
            end,
            pos: 0,
            labels: 0,
            loops: vec![],
            blocks: 0,
            functions: 0,
            arrays: HashSet::new(),
        }
    }

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).unwrap_or(&self.end)
    }

    fn kind(&self) -> Kind {
        self.peek().kind
    }

    fn kind_at(&self, offset: usize) -> Kind {
        self.peek_at(offset).kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: Kind) -> Result<Token> {
        if self.kind() == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("EXPECTED {}", kind.text())))
        }
    }

    fn unexpected(&self, message: &str) -> Error {
        let token = self.peek();
        error!(SyntaxError, token; format!("{} GOT {}", message, token))
    }

    fn ident(&mut self) -> Result<Rc<str>> {
        Ok(self.expect(Kind::Ident)?.lexeme)
    }

    fn label(&mut self) -> Label {
        self.labels += 1;
        Label(self.labels - 1)
    }

    fn program(&mut self) -> Result<Vec<Code>> {
        let mut fragments = vec![];
        while self.kind() != Kind::End {
            fragments.push(self.stmt_unit()?);
        }
        Ok(fragments)
    }

    fn stmt_unit(&mut self) -> Result<Code> {
        if self.kind() == Kind::LBrace {
            self.block()
        } else {
            self.statement()
        }
    }

    /// Statements up to the closing brace, which is consumed.
    fn stmts(&mut self) -> Result<Code> {
        let mut code = Code::new();
        while self.kind() != Kind::RBrace {
            if self.kind() == Kind::End {
                return Err(self.unexpected("EXPECTED }"));
            }
            code.append(self.stmt_unit()?);
        }
        self.advance();
        Ok(code)
    }

    fn block(&mut self) -> Result<Code> {
        self.expect(Kind::LBrace)?;
        let mut code = Code::new();
        code.op(Opcode::EnterBlock);
        self.blocks += 1;
        let body = self.stmts();
        self.blocks -= 1;
        code.append(body?);
        code.op(Opcode::LeaveBlock);
        Ok(code)
    }

    fn statement(&mut self) -> Result<Code> {
        if self.is_assignment() {
            let mut code = self.assignment()?;
            self.expect(Kind::Semicolon)?;
            code.op(Opcode::Discard);
            return Ok(code);
        }
        let call = self.kind_at(1) == Kind::LParen;
        let code = match self.kind() {
            Kind::Builtin(builtin) if call => {
                let mut code = self.builtin_call(builtin, false)?;
                if builtin.has_value() {
                    code.op(Opcode::Discard);
                }
                code
            }
            Kind::Ident if call => self.user_call(false)?,
            Kind::Word(word) => return self.word_statement(word),
            Kind::Number
            | Kind::Constant(_)
            | Kind::LParen
            | Kind::Operator(_)
            | Kind::IncDec(_)
            | Kind::Builtin(_)
            | Kind::Ident => {
                let mut code = self.expr()?;
                code.op(Opcode::Discard);
                code
            }
            _ => return Err(self.unexpected("EXPECTED STATEMENT")),
        };
        self.expect(Kind::Semicolon)?;
        Ok(code)
    }

    fn word_statement(&mut self, word: Word) -> Result<Code> {
        match word {
            Word::If => self.r#if(),
            Word::While => self.r#while(),
            Word::For => self.r#for(),
            Word::Def => self.def(),
            Word::Return => self.r#return(),
            Word::Dim => self.dim(),
            Word::Continue | Word::Break => self.jump_out(word),
        }
    }

    /// `ID =` or `ID [ ... ] =` with balanced brackets.
    fn is_assignment(&self) -> bool {
        if self.kind() != Kind::Ident {
            return false;
        }
        let mut offset = 1;
        if self.kind_at(offset) == Kind::LBracket {
            let mut depth = 0;
            loop {
                match self.kind_at(offset) {
                    Kind::LBracket => depth += 1,
                    Kind::RBracket => depth -= 1,
                    Kind::End | Kind::Semicolon => return false,
                    _ => {}
                }
                offset += 1;
                if depth == 0 {
                    break;
                }
            }
        }
        self.kind_at(offset) == Kind::Assign
    }

    fn assignment(&mut self) -> Result<Code> {
        let name = self.ident()?;
        let mut code = Code::new();
        let element = self.kind() == Kind::LBracket;
        if element {
            code.append(self.subscript()?);
            code.op(Opcode::PushArr).name(&name);
        } else {
            code.op(Opcode::PushVar).name(&name).flag(true);
        }
        self.expect(Kind::Assign)?;
        let value = if self.is_assignment() {
            self.assignment()?
        } else {
            self.expr()?
        };
        code.append(value);
        code.op(if element {
            Opcode::AssignElem
        } else {
            Opcode::Assign
        });
        Ok(code)
    }

    fn subscript(&mut self) -> Result<Code> {
        self.expect(Kind::LBracket)?;
        let code = self.expr()?;
        self.expect(Kind::RBracket)?;
        Ok(code)
    }

    fn r#if(&mut self) -> Result<Code> {
        self.advance();
        let skip = self.label();
        let mut code = self.condition()?;
        code.op(Opcode::If).reference(skip);
        code.append(self.stmt_unit()?);
        code.define(skip);
        Ok(code)
    }

    fn r#while(&mut self) -> Result<Code> {
        self.advance();
        let top = self.label();
        let skip = self.label();
        let mut code = Code::new();
        code.define(top);
        code.append(self.condition()?);
        code.op(Opcode::While).reference(skip);
        code.append(self.loop_body(top, skip)?);
        code.op(Opcode::Jump).reference(top);
        code.define(skip);
        Ok(code)
    }

    fn r#for(&mut self) -> Result<Code> {
        self.advance();
        let top = self.label();
        let step_label = self.label();
        let skip = self.label();
        self.expect(Kind::LParen)?;
        let mut code = self.for_inner(Kind::Semicolon)?;
        self.expect(Kind::Semicolon)?;
        code.define(top);
        code.append(self.expr()?);
        self.expect(Kind::Semicolon)?;
        let step = self.for_inner(Kind::RParen)?;
        self.expect(Kind::RParen)?;
        code.op(Opcode::For).reference(skip);
        code.append(self.loop_body(step_label, skip)?);
        code.define(step_label);
        code.append(step);
        code.op(Opcode::Jump).reference(top);
        code.define(skip);
        Ok(code)
    }

    fn for_inner(&mut self, terminator: Kind) -> Result<Code> {
        if self.kind() == terminator {
            return Ok(Code::new());
        }
        let mut code = if self.is_assignment() {
            self.assignment()?
        } else {
            self.expr()?
        };
        code.op(Opcode::Discard);
        Ok(code)
    }

    fn condition(&mut self) -> Result<Code> {
        self.expect(Kind::LParen)?;
        let code = self.expr()?;
        self.expect(Kind::RParen)?;
        Ok(code)
    }

    fn loop_body(&mut self, next: Label, exit: Label) -> Result<Code> {
        self.loops.push(Loop {
            next,
            exit,
            blocks: self.blocks,
        });
        let body = self.stmt_unit();
        self.loops.pop();
        body
    }

    fn jump_out(&mut self, word: Word) -> Result<Code> {
        let token = self.advance();
        let lp = match self.loops.last() {
            Some(lp) => *lp,
            None if word == Word::Continue => return Err(error!(ContinueWithoutLoop, &token)),
            None => return Err(error!(BreakWithoutLoop, &token)),
        };
        self.expect(Kind::Semicolon)?;
        let mut code = Code::new();
        for _ in lp.blocks..self.blocks {
            code.op(Opcode::LeaveBlock);
        }
        let target = if word == Word::Continue {
            lp.next
        } else {
            lp.exit
        };
        code.op(Opcode::Jump).reference(target);
        Ok(code)
    }

    fn def(&mut self) -> Result<Code> {
        self.advance();
        let name = self.ident()?;
        self.expect(Kind::LParen)?;
        let mut params: Vec<Rc<str>> = vec![];
        if self.kind() != Kind::RParen {
            loop {
                let token = self.expect(Kind::Ident)?;
                if params.contains(&token.lexeme) {
                    return Err(error!(SyntaxError, &token; "DUPLICATE PARAMETER"));
                }
                params.push(token.lexeme);
                if self.kind() != Kind::Comma {
                    break;
                }
                self.advance();
            }
        }
        self.expect(Kind::RParen)?;
        self.expect(Kind::LBrace)?;

        let loops = std::mem::take(&mut self.loops);
        let blocks = std::mem::take(&mut self.blocks);
        self.functions += 1;
        let body = self.stmts();
        self.functions -= 1;
        self.blocks = blocks;
        self.loops = loops;

        let mut inner = Code::new();
        inner.op(Opcode::EnterFunction);
        inner.append(body?);
        inner.op(Opcode::LeaveFunction);

        let mut code = Code::new();
        code.op(Opcode::FuncDef).name(&name).count(params.len());
        for param in &params {
            code.name(param);
        }
        code.count(inner.len());
        code.append(inner);
        Ok(code)
    }

    fn r#return(&mut self) -> Result<Code> {
        let token = self.advance();
        if self.functions == 0 {
            return Err(error!(ReturnWithoutFunction, &token));
        }
        let mut code = Code::new();
        let has_value = self.kind() != Kind::Semicolon;
        if has_value {
            code.append(self.expr()?);
        }
        self.expect(Kind::Semicolon)?;
        code.op(Opcode::Return).flag(has_value);
        Ok(code)
    }

    fn dim(&mut self) -> Result<Code> {
        self.advance();
        let name = self.ident()?;
        let mut code = self.subscript()?;
        self.expect(Kind::Semicolon)?;
        code.op(Opcode::Dim).name(&name);
        self.arrays.insert(name);
        Ok(code)
    }

    fn expr(&mut self) -> Result<Code> {
        self.expr_above(0)
    }

    fn binary_operator(&self) -> Option<(Operator, u8)> {
        match self.kind() {
            Kind::Operator(op) => op.rank().map(|rank| (op, rank)),
            _ => None,
        }
    }

    fn expr_above(&mut self, min_rank: u8) -> Result<Code> {
        let lhs = self.term()?;
        self.climb(lhs, min_rank)
    }

    /// Absorbs only operators that bind tighter than `min_rank`. After each
    /// operator one term is read; if the following operator binds tighter
    /// still, that term becomes the left side of an expression at this
    /// operator's rank. Each token is read once.
    fn climb(&mut self, mut code: Code, min_rank: u8) -> Result<Code> {
        while let Some((op, rank)) = self.binary_operator() {
            if rank <= min_rank {
                break;
            }
            self.advance();
            let mut rhs = self.term()?;
            if matches!(self.binary_operator(), Some((_, next)) if next > rank) {
                rhs = self.climb(rhs, rank)?;
            }
            code.append(rhs);
            code.op(binary_opcode(op));
        }
        Ok(code)
    }

    fn term(&mut self) -> Result<Code> {
        let mut code = Code::new();
        match self.kind() {
            Kind::Number => {
                let token = self.advance();
                match token.number() {
                    Some(n) => code.op(Opcode::PushNum).number(n),
                    None => return Err(error!(SyntaxError, &token; "BAD NUMBER")),
                };
            }
            Kind::Constant(_) => {
                let token = self.advance();
                code.op(Opcode::PushVar).name(&token.lexeme).flag(false);
                code.op(Opcode::Extract);
            }
            Kind::LParen => {
                self.advance();
                code.append(self.expr()?);
                self.expect(Kind::RParen)?;
            }
            Kind::Operator(op) if op.is_unary() => {
                self.advance();
                code.append(self.term()?);
                code.op(match op {
                    Operator::Minus => Opcode::Neg,
                    Operator::Not => Opcode::Not,
                    _ => Opcode::BitNot,
                });
            }
            Kind::IncDec(incdec) => {
                self.advance();
                let name = self.ident()?;
                if self.kind() == Kind::LBracket {
                    code.append(self.subscript()?);
                    code.op(Opcode::PushArr).name(&name);
                    code.op(match incdec {
                        IncDec::Increment => Opcode::PreIncElem,
                        IncDec::Decrement => Opcode::PreDecElem,
                    });
                } else {
                    code.op(Opcode::PushVar).name(&name).flag(false);
                    code.op(match incdec {
                        IncDec::Increment => Opcode::PreInc,
                        IncDec::Decrement => Opcode::PreDec,
                    });
                }
            }
            Kind::Builtin(builtin) => {
                code.append(self.builtin_call(builtin, true)?);
            }
            Kind::Ident if self.kind_at(1) == Kind::LParen => {
                code.append(self.user_call(true)?);
            }
            Kind::Ident => {
                code.append(self.variable()?);
            }
            _ => return Err(self.unexpected("EXPECTED EXPRESSION")),
        }
        Ok(code)
    }

    fn variable(&mut self) -> Result<Code> {
        let name = self.ident()?;
        let mut code = Code::new();
        let postfix = |kind| match kind {
            Kind::IncDec(IncDec::Increment) => Some(true),
            Kind::IncDec(IncDec::Decrement) => Some(false),
            _ => None,
        };
        if self.kind() == Kind::LBracket {
            code.append(self.subscript()?);
            code.op(Opcode::PushArr).name(&name);
            match postfix(self.kind()) {
                Some(inc) => {
                    self.advance();
                    code.op(if inc {
                        Opcode::PostIncElem
                    } else {
                        Opcode::PostDecElem
                    });
                }
                None => {
                    code.op(Opcode::ExtractElem);
                }
            }
            return Ok(code);
        }
        match postfix(self.kind()) {
            Some(inc) => {
                self.advance();
                code.op(Opcode::PushVar).name(&name).flag(false);
                code.op(if inc { Opcode::PostInc } else { Opcode::PostDec });
            }
            None if self.arrays.contains(&name) => {
                code.op(Opcode::PushArr).name(&name);
            }
            None => {
                code.op(Opcode::PushVar).name(&name).flag(false);
                code.op(Opcode::Extract);
            }
        }
        Ok(code)
    }

    fn arguments(&mut self) -> Result<(Code, usize)> {
        self.expect(Kind::LParen)?;
        let mut code = Code::new();
        let mut count = 0;
        if self.kind() != Kind::RParen {
            loop {
                code.append(self.expr()?);
                count += 1;
                if self.kind() != Kind::Comma {
                    break;
                }
                self.advance();
            }
        }
        self.expect(Kind::RParen)?;
        Ok((code, count))
    }

    fn builtin_call(&mut self, builtin: Builtin, in_expression: bool) -> Result<Code> {
        let token = self.advance();
        if in_expression && !builtin.has_value() {
            return Err(error!(SyntaxError, &token; format!("{} HAS NO VALUE", token)));
        }
        let (mut code, count) = self.arguments()?;
        if !builtin.arity().contains(&count) {
            return Err(error!(IllegalFunctionCall, &token;
                format!("WRONG NUMBER OF ARGUMENTS TO {}", token)));
        }
        code.op(Opcode::CallBuiltin).name(&token.lexeme).count(count);
        Ok(code)
    }

    fn user_call(&mut self, wants_value: bool) -> Result<Code> {
        let name = self.ident()?;
        let (mut code, count) = self.arguments()?;
        code.op(Opcode::PushFunc).name(&name);
        code.op(Opcode::Call).count(count).flag(wants_value);
        Ok(code)
    }
}

fn binary_opcode(op: Operator) -> Opcode {
    use Operator::*;
    match op {
        Plus => Opcode::Add,
        Minus => Opcode::Sub,
        Multiply => Opcode::Mul,
        Divide => Opcode::Div,
        Modulus => Opcode::Mod,
        And => Opcode::And,
        Or => Opcode::Or,
        GreaterEqual => Opcode::Ge,
        Greater => Opcode::Gt,
        Less => Opcode::Lt,
        LessEqual => Opcode::Le,
        NotEqual => Opcode::Ne,
        Equal => Opcode::Eq,
        BitAnd => Opcode::BitAnd,
        BitXor => Opcode::BitXor,
        BitOr => Opcode::BitOr,
        ShiftRight => Opcode::Shr,
        ShiftLeft => Opcode::Shl,
        Not => Opcode::Not,
        BitNot => Opcode::BitNot,
    }
}
