use super::{
    Address, CallFrame, Cell, Function, Listing, Opcode, Operation, Program, Stack, Symbol,
    SymbolTable, UserFunction, Val,
};
use crate::error;
use crate::lang::token::Builtin;
use crate::lang::Error;
use rand::{rngs::StdRng, SeedableRng};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Events for the user interface

#[derive(Debug, PartialEq)]
pub enum Event {
    Stopped,
    Running,
    Print(String),
    Errors(Vec<Error>),
}

#[derive(Debug, Clone, Copy)]
struct CallSite {
    return_address: Address,
    wants_value: bool,
}

/// ## Stack machine

pub struct Runtime {
    program: Program,
    pending: Vec<Error>,
    pc: Address,
    fp: usize,
    stack: Stack<Val>,
    calls: Stack<CallSite>,
    symbols: SymbolTable,
    rng: StdRng,
    seed: Option<u64>,
    interrupted: bool,
    depth: usize,
    max_depth: usize,
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime {
            program: Program::default(),
            pending: vec![],
            pc: 0,
            fp: 0,
            stack: Stack::new("STACK OVERFLOW"),
            calls: Stack::new("TOO MANY CALLS"),
            symbols: SymbolTable::new(),
            rng: StdRng::from_entropy(),
            seed: None,
            interrupted: false,
            depth: 0,
            max_depth: 0,
        }
    }
}

impl Runtime {
    /// A runtime whose `rand()` sequence repeats after every `reset`.
    pub fn with_seed(seed: u64) -> Runtime {
        Runtime {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
            ..Runtime::default()
        }
    }

    /// Compiles `source` and resets the machine. Compile errors are
    /// reported by the next `execute`.
    pub fn enter(&mut self, source: &str) {
        self.pending.clear();
        match Program::compile(source) {
            Ok(program) => self.program = program,
            Err(error) => {
                log::debug!("compile failed: {}", error);
                self.program = Program::default();
                self.pending.push(error);
            }
        }
        self.reset();
    }

    pub fn reset(&mut self) {
        self.pc = 0;
        self.fp = 0;
        self.stack.clear();
        self.calls.clear();
        self.symbols = SymbolTable::new();
        if let Some(seed) = self.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.interrupted = false;
        self.depth = 0;
        self.max_depth = 0;
    }

    pub fn interrupt(&mut self) {
        self.interrupted = true;
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn listing(&self) -> Listing<'_> {
        Listing::new(&self.program)
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Deepest nesting of user function calls seen since the last reset.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn stop(&mut self) {
        self.pc = self.program.len();
    }

    pub fn execute(&mut self, cycles: usize) -> Event {
        if !self.pending.is_empty() {
            self.stop();
            return Event::Errors(std::mem::take(&mut self.pending));
        }
        if self.interrupted {
            self.interrupted = false;
            if self.pc < self.program.len() {
                let error = error!(Break).in_address(self.pc);
                self.stop();
                return Event::Errors(vec![error]);
            }
        }
        for _ in 0..cycles {
            if self.pc >= self.program.len() {
                log::debug!("stopped; max call depth {}", self.max_depth);
                return Event::Stopped;
            }
            let addr = self.pc;
            match self.step() {
                Ok(None) => {}
                Ok(Some(event)) => return event,
                Err(error) => {
                    self.stop();
                    return Event::Errors(vec![error.in_address(addr)]);
                }
            }
        }
        Event::Running
    }

    fn fetch(&mut self) -> Result<&Cell> {
        let cell = self
            .program
            .get(self.pc)
            .ok_or_else(|| error!(InternalError; "RAN OFF END OF PROGRAM"))?;
        self.pc += 1;
        Ok(cell)
    }

    fn fetch_name(&mut self) -> Result<Rc<str>> {
        match self.fetch()? {
            Cell::Name(name) => Ok(name.clone()),
            _ => Err(error!(InternalError; "EXPECTED NAME")),
        }
    }

    fn fetch_number(&mut self) -> Result<f64> {
        match self.fetch()? {
            Cell::Number(n) => Ok(*n),
            _ => Err(error!(InternalError; "EXPECTED NUMBER")),
        }
    }

    fn fetch_count(&mut self) -> Result<usize> {
        match self.fetch()? {
            Cell::Count(n) => Ok(*n),
            _ => Err(error!(InternalError; "EXPECTED COUNT")),
        }
    }

    fn fetch_flag(&mut self) -> Result<bool> {
        match self.fetch()? {
            Cell::Flag(b) => Ok(*b),
            _ => Err(error!(InternalError; "EXPECTED FLAG")),
        }
    }

    fn fetch_address(&mut self) -> Result<Address> {
        match self.fetch()? {
            Cell::Address(a) => Ok(*a),
            _ => Err(error!(InternalError; "EXPECTED ADDRESS")),
        }
    }

    fn step(&mut self) -> Result<Option<Event>> {
        let addr = self.pc;
        let op = match self.fetch()? {
            Cell::Op(op) => *op,
            cell => return Err(error!(InternalError; format!("{} IS NOT AN OPCODE", cell))),
        };
        log::trace!("{:>5}  {}", addr, op);
        use Opcode::*;
        match op {
            Nop => {}
            PushNum => {
                let n = self.fetch_number()?;
                self.stack.push(Val::Number(n))?;
            }
            PushVar => {
                let name = self.fetch_name()?;
                let create = self.fetch_flag()?;
                let val = self.resolve_var(&name, create)?;
                self.stack.push(val)?;
            }
            PushArr => {
                let name = self.fetch_name()?;
                let val = self.resolve_arr(&name)?;
                self.stack.push(val)?;
            }
            PushFunc => {
                let name = self.fetch_name()?;
                let val = self.resolve_func(&name)?;
                self.stack.push(val)?;
            }
            Extract => {
                let reference = self.stack.pop()?;
                let val = match reference {
                    Val::Slot(_) | Val::Array(_) => self.read_slot(reference)?,
                    _ => Val::Number(self.read(&reference)?),
                };
                self.stack.push(val)?;
            }
            ExtractElem => {
                let (idx, array) = self.pop_element()?;
                let n = *self.element(&array, idx)?;
                self.stack.push(Val::Number(n))?;
            }
            Assign => {
                let n = self.pop_number()?;
                let reference = self.stack.pop()?;
                self.write(&reference, n)?;
                self.stack.push(Val::Number(n))?;
            }
            AssignElem => {
                let n = self.pop_number()?;
                let (idx, array) = self.pop_element()?;
                *self.element(&array, idx)? = n;
                self.stack.push(Val::Number(n))?;
            }
            Discard => {
                self.stack.pop()?;
            }
            PreInc | PreDec | PostInc | PostDec => {
                let reference = self.stack.pop()?;
                let old = self.read(&reference)?;
                let new = if matches!(op, PreInc | PostInc) {
                    old + 1.0
                } else {
                    old - 1.0
                };
                self.write(&reference, new)?;
                let n = if matches!(op, PreInc | PreDec) { new } else { old };
                self.stack.push(Val::Number(n))?;
            }
            PreIncElem | PreDecElem | PostIncElem | PostDecElem => {
                let (idx, array) = self.pop_element()?;
                let element = self.element(&array, idx)?;
                let old = *element;
                let new = if matches!(op, PreIncElem | PostIncElem) {
                    old + 1.0
                } else {
                    old - 1.0
                };
                *element = new;
                let n = if matches!(op, PreIncElem | PreDecElem) {
                    new
                } else {
                    old
                };
                self.stack.push(Val::Number(n))?;
            }
            Neg | Not | BitNot => {
                let n = self.pop_number()?;
                self.stack.push(Val::Number(Operation::unary(op, n)?))?;
            }
            Add | Sub | Mul | Div | Mod | Shl | Shr | Lt | Le | Gt | Ge | Eq | Ne | BitAnd
            | BitOr | BitXor | And | Or => {
                let rhs = self.pop_number()?;
                let lhs = self.pop_number()?;
                self.stack
                    .push(Val::Number(Operation::binary(op, lhs, rhs)?))?;
            }
            If | For | While => {
                let dest = self.fetch_address()?;
                if !Val::is_true(self.pop_number()?) {
                    self.pc = dest;
                }
            }
            Jump => {
                self.pc = self.fetch_address()?;
            }
            CallBuiltin => {
                let name = self.fetch_name()?;
                let argc = self.fetch_count()?;
                return self.call_builtin(&name, argc);
            }
            FuncDef => self.function_definition()?,
            Call => {
                let argc = self.fetch_count()?;
                let wants_value = self.fetch_flag()?;
                let function = match self.stack.last() {
                    Some(Val::Function(f)) => f.clone(),
                    _ => return Err(error!(TypeMismatch; "NOT A FUNCTION")),
                };
                if function.params.len() != argc {
                    return Err(error!(IllegalFunctionCall; format!(
                        "WRONG NUMBER OF ARGUMENTS TO {}",
                        function.name
                    )));
                }
                self.calls.push(CallSite {
                    return_address: self.pc,
                    wants_value,
                })?;
                self.pc = function.start;
            }
            EnterFunction => self.enter_function()?,
            Return => {
                let has_value = self.fetch_flag()?;
                self.return_from_function(has_value)?;
            }
            LeaveFunction => self.return_from_function(false)?,
            Dim => {
                let name = self.fetch_name()?;
                let size = self.pop_number()?;
                if !(size >= 0.0 && size.fract() == 0.0) {
                    return Err(error!(IllegalFunctionCall; "BAD ARRAY SIZE"));
                }
                if size > (u16::MAX as f64) * 16.0 {
                    return Err(error!(OutOfMemory; "ARRAY TOO LARGE"));
                }
                self.symbols
                    .define(&name, Symbol::Array(vec![0.0; size as usize]))?;
            }
            EnterBlock => self.symbols.enter_scope()?,
            LeaveBlock => self.symbols.leave_scope()?,
        }
        Ok(None)
    }

    fn pop_number(&mut self) -> Result<f64> {
        match self.stack.pop()? {
            Val::Number(n) => Ok(n),
            _ => Err(error!(TypeMismatch; "EXPECTED NUMBER")),
        }
    }

    /// Pops an array reference and the index beneath it.
    fn pop_element(&mut self) -> Result<(f64, Val)> {
        let array = self.stack.pop()?;
        let idx = self.pop_number()?;
        Ok((idx, array))
    }

    fn element(&mut self, array: &Val, idx: f64) -> Result<&mut f64> {
        let id = match array {
            Val::Array(id) => *id,
            _ => return Err(error!(TypeMismatch; "NOT AN ARRAY")),
        };
        match self.symbols.get_mut(id) {
            Some(Symbol::Array(vec)) => {
                let idx = idx.trunc();
                if !(idx >= 0.0 && idx < vec.len() as f64) {
                    return Err(error!(SubscriptOutOfRange; format!("{} OF {}", idx, vec.len())));
                }
                Ok(&mut vec[idx as usize])
            }
            _ => Err(error!(InternalError; "LOST ARRAY")),
        }
    }

    fn read_slot(&self, reference: Val) -> Result<Val> {
        match reference {
            Val::Slot(index) => match self.stack.get(index) {
                Some(val) => Ok(val.clone()),
                None => Err(error!(InternalError; "BAD SLOT")),
            },
            val => Ok(val),
        }
    }

    fn read(&self, reference: &Val) -> Result<f64> {
        match reference {
            Val::Var(id) => match self.symbols.get(*id) {
                Some(Symbol::Var(n)) | Some(Symbol::Const(n)) => Ok(*n),
                _ => Err(error!(TypeMismatch)),
            },
            Val::Slot(index) => match self.stack.get(*index) {
                Some(Val::Number(n)) => Ok(*n),
                Some(_) => Err(error!(TypeMismatch; "EXPECTED NUMBER")),
                None => Err(error!(InternalError; "BAD SLOT")),
            },
            Val::Number(n) => Ok(*n),
            _ => Err(error!(TypeMismatch)),
        }
    }

    fn write(&mut self, reference: &Val, n: f64) -> Result<()> {
        match reference {
            Val::Var(id) => match self.symbols.get_mut(*id) {
                Some(Symbol::Var(v)) => {
                    *v = n;
                    Ok(())
                }
                Some(Symbol::Const(_)) => Err(error!(TypeMismatch; "CONSTANT")),
                _ => Err(error!(TypeMismatch)),
            },
            Val::Slot(index) => match self.stack.get_mut(*index) {
                Some(slot @ Val::Number(_)) => {
                    *slot = Val::Number(n);
                    Ok(())
                }
                Some(_) => Err(error!(TypeMismatch; "EXPECTED NUMBER")),
                None => Err(error!(InternalError; "BAD SLOT")),
            },
            Val::Array(_) => Err(error!(TypeMismatch; "ARRAY")),
            _ => Err(error!(TypeMismatch)),
        }
    }

    /// Stack index of `name` when it is a parameter of the running function.
    fn param_slot(&self, name: &str) -> Option<usize> {
        let function = self.symbols.current_function()?;
        let index = function.param_index(name)?;
        CallFrame::slot(self.fp, function.params.len(), index)
    }

    fn resolve_var(&mut self, name: &Rc<str>, create: bool) -> Result<Val> {
        if let Some(slot) = self.param_slot(name) {
            return Ok(Val::Slot(slot));
        }
        match self.symbols.lookup(name) {
            Some(id) => match self.symbols.get(id) {
                Some(Symbol::Var(_)) | Some(Symbol::Const(_)) => Ok(Val::Var(id)),
                Some(Symbol::Array(_)) => Ok(Val::Array(id)),
                Some(_) => Err(error!(TypeMismatch; format!("{} IS A FUNCTION", name))),
                None => Err(error!(InternalError; "LOST SYMBOL")),
            },
            None if create => Ok(Val::Var(self.symbols.lookup_or_create(name)?)),
            None => Err(error!(UndeclaredName; format!("VARIABLE {} NOT DECLARED", name))),
        }
    }

    fn resolve_arr(&mut self, name: &Rc<str>) -> Result<Val> {
        if let Some(slot) = self.param_slot(name) {
            return match self.stack.get(slot) {
                Some(val @ Val::Array(_)) => Ok(val.clone()),
                _ => Err(error!(TypeMismatch; format!("{} IS NOT AN ARRAY", name))),
            };
        }
        match self.symbols.lookup(name) {
            Some(id) => match self.symbols.get(id) {
                Some(Symbol::Array(_)) => Ok(Val::Array(id)),
                _ => Err(error!(TypeMismatch; format!("{} IS NOT AN ARRAY", name))),
            },
            None => Err(error!(UndeclaredName; format!("ARRAY {} NOT DECLARED", name))),
        }
    }

    fn resolve_func(&mut self, name: &Rc<str>) -> Result<Val> {
        match self.symbols.lookup(name).and_then(|id| self.symbols.get(id)) {
            Some(Symbol::Function(f)) => Ok(Val::Function(f.clone())),
            Some(_) => Err(error!(TypeMismatch; format!("{} IS NOT A FUNCTION", name))),
            None => Err(error!(UndeclaredName; format!("FUNCTION {} NOT DECLARED", name))),
        }
    }

    fn call_builtin(&mut self, name: &str, argc: usize) -> Result<Option<Event>> {
        let builtin = match self.symbols.lookup(name).and_then(|id| self.symbols.get(id)) {
            Some(Symbol::Builtin(builtin)) => *builtin,
            _ => return Err(error!(InternalError; format!("NO BUILTIN {}", name))),
        };
        Function::check_arity(builtin, argc)?;
        let mut args = Vec::with_capacity(argc);
        for val in self.stack.pop_n(argc)? {
            match val {
                Val::Number(n) => args.push(n),
                _ => return Err(error!(TypeMismatch; "EXPECTED NUMBER")),
            }
        }
        if builtin == Builtin::Print {
            let line = match args.first() {
                Some(n) => format!("{}\n", Val::Number(*n)),
                None => "\n".to_string(),
            };
            return Ok(Some(Event::Print(line)));
        }
        let n = Function::evaluate(builtin, &args, &mut self.rng)?;
        self.stack.push(Val::Number(n))?;
        Ok(None)
    }

    fn function_definition(&mut self) -> Result<()> {
        let name = self.fetch_name()?;
        let count = self.fetch_count()?;
        let mut params = Vec::with_capacity(count);
        for _ in 0..count {
            params.push(self.fetch_name()?);
        }
        let len = self.fetch_count()?;
        let function = Rc::new(UserFunction {
            name: name.clone(),
            params,
            start: self.pc,
            end: self.pc + len,
        });
        self.pc = function.end;
        self.symbols.define(&name, Symbol::Function(function))?;
        Ok(())
    }

    fn enter_function(&mut self) -> Result<()> {
        let function = match self.stack.pop()? {
            Val::Function(f) => f,
            _ => return Err(error!(InternalError; "MISSING FUNCTION")),
        };
        let site = match self.calls.last() {
            Some(site) => *site,
            None => return Err(error!(InternalError; "MISSING CALL")),
        };
        let frame = CallFrame {
            return_address: site.return_address,
            param_count: function.params.len(),
            saved_fp: self.fp,
        };
        frame.push_onto(&mut self.stack)?;
        self.fp = self.stack.len();
        self.symbols.enter_function(function)?;
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        Ok(())
    }

    fn return_from_function(&mut self, has_value: bool) -> Result<()> {
        let value = if has_value {
            Some(self.pop_number()?)
        } else {
            None
        };
        let site = self.calls.pop()?;
        self.stack.truncate(self.fp);
        let frame = CallFrame::pop_from(&mut self.stack)?;
        self.stack.pop_n(frame.param_count)?;
        self.fp = frame.saved_fp;
        self.pc = frame.return_address;
        self.symbols.leave_function()?;
        self.depth -= 1;
        if site.wants_value {
            match value {
                Some(n) => self.stack.push(Val::Number(n))?,
                None => return Err(error!(MissingReturnValue)),
            }
        }
        Ok(())
    }
}
