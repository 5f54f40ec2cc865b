use super::{Address, Stack};
use crate::error;
use crate::lang::token::{Builtin, Constant};
use crate::lang::Error;
use std::collections::HashMap;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Index of a symbol in the table's arena.
pub type SymbolId = usize;

/// A function defined with `def`. The body spans `start..end`
/// and begins with `ENTERFUNCTION`.
#[derive(Debug, PartialEq)]
pub struct UserFunction {
    pub name: Rc<str>,
    pub params: Vec<Rc<str>>,
    pub start: Address,
    pub end: Address,
}

impl UserFunction {
    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| &**p == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Var(f64),
    Const(f64),
    Array(Vec<f64>),
    Function(Rc<UserFunction>),
    Builtin(Builtin),
}

impl Symbol {
    fn is_function(&self) -> bool {
        matches!(self, Symbol::Function(_) | Symbol::Builtin(_))
    }
}

#[derive(Debug)]
struct Scope {
    names: HashMap<Rc<str>, SymbolId>,
    parent: Option<usize>,
    base: SymbolId,
    caller: Option<Option<Rc<UserFunction>>>,
}

/// ## Scope chain
///
/// Symbols live in one arena. Scopes only map names to arena slots, so
/// leaving a scope frees its symbols by truncating the arena. A function
/// body's scope encloses directly onto the global scope.

#[derive(Debug)]
pub struct SymbolTable {
    entries: Vec<Symbol>,
    scopes: Stack<Scope>,
    current: Option<Rc<UserFunction>>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        let mut this = SymbolTable {
            entries: vec![],
            scopes: Stack::new("SCOPE OVERFLOW"),
            current: None,
        };
        this.reset();
        this
    }
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    /// Rebuilds the global scope with the constants and builtins.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.scopes.clear();
        self.current = None;
        self.scopes.push(Scope::global()).ok();
        for c in Constant::ALL.iter() {
            self.install(c.text().into(), Symbol::Const(c.value()));
        }
        for b in Builtin::ALL.iter() {
            self.install(b.text().into(), Symbol::Builtin(*b));
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn current_function(&self) -> Option<&Rc<UserFunction>> {
        self.current.as_ref()
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.entries.get_mut(id)
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        let mut index = Some(self.scopes.len().checked_sub(1)?);
        while let Some(i) = index {
            let scope = self.scopes.get(i)?;
            if let Some(id) = scope.names.get(name) {
                return Some(*id);
            }
            index = scope.parent;
        }
        None
    }

    pub fn lookup_or_create(&mut self, name: &Rc<str>) -> Result<SymbolId> {
        match self.lookup(name) {
            Some(id) => Ok(id),
            None => self.try_install(name.clone(), Symbol::Var(0.0)),
        }
    }

    /// Installs in the innermost scope. A function replaces an existing
    /// function of the same name; anything else must be new to the scope.
    pub fn define(&mut self, name: &Rc<str>, symbol: Symbol) -> Result<SymbolId> {
        let existing = self.innermost()?.names.get(name).copied();
        match existing {
            Some(id) => {
                let entry = self.entries.get_mut(id).ok_or_else(|| error!(InternalError))?;
                if symbol.is_function() && entry.is_function() {
                    *entry = symbol;
                    Ok(id)
                } else {
                    Err(error!(RedimensionedArray; name.to_string()))
                }
            }
            None => self.try_install(name.clone(), symbol),
        }
    }

    pub fn enter_scope(&mut self) -> Result<()> {
        let parent = self.scopes.len().checked_sub(1);
        self.scopes.push(Scope::new(parent, self.entries.len(), None))
    }

    pub fn leave_scope(&mut self) -> Result<()> {
        if self.scopes.len() <= 1 {
            return Err(error!(InternalError; "LEAVING GLOBAL SCOPE"));
        }
        let scope = self.scopes.pop()?;
        self.entries.truncate(scope.base);
        if let Some(caller) = scope.caller {
            self.current = caller;
        }
        Ok(())
    }

    pub fn enter_function(&mut self, function: Rc<UserFunction>) -> Result<()> {
        let caller = self.current.replace(function);
        self.scopes
            .push(Scope::new(Some(0), self.entries.len(), Some(caller)))
    }

    /// Pops every scope down to and including the innermost function scope.
    pub fn leave_function(&mut self) -> Result<()> {
        loop {
            let is_function = self.innermost()?.caller.is_some();
            self.leave_scope()?;
            if is_function {
                return Ok(());
            }
        }
    }

    fn innermost(&self) -> Result<&Scope> {
        self.scopes
            .last()
            .ok_or_else(|| error!(InternalError; "NO SCOPE"))
    }

    fn try_install(&mut self, name: Rc<str>, symbol: Symbol) -> Result<SymbolId> {
        let id = self.entries.len();
        if id > u16::MAX as usize * 16 {
            return Err(error!(OutOfMemory; "TOO MANY SYMBOLS"));
        }
        let last = self.scopes.len().checked_sub(1);
        match last.and_then(|i| self.scopes.get_mut(i)) {
            Some(scope) => {
                scope.names.insert(name, id);
            }
            None => return Err(error!(InternalError; "NO SCOPE")),
        }
        self.entries.push(symbol);
        Ok(id)
    }

    fn install(&mut self, name: Rc<str>, symbol: Symbol) {
        if let Err(e) = self.try_install(name, symbol) {
            log::error!("{}", e);
        }
    }
}

impl Scope {
    fn global() -> Scope {
        Scope::new(None, 0, None)
    }

    fn new(
        parent: Option<usize>,
        base: SymbolId,
        caller: Option<Option<Rc<UserFunction>>>,
    ) -> Scope {
        Scope {
            names: HashMap::new(),
            parent,
            base,
            caller,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    fn function(name: &str, params: &[&str]) -> Rc<UserFunction> {
        Rc::new(UserFunction {
            name: name.into(),
            params: params.iter().map(|p| (*p).into()).collect(),
            start: 0,
            end: 0,
        })
    }

    #[test]
    fn test_reset_installs_globals() {
        let t = SymbolTable::new();
        let pi = t.lookup("pi").unwrap();
        assert_eq!(t.get(pi), Some(&Symbol::Const(std::f64::consts::PI)));
        let sqrt = t.lookup("sqrt").unwrap();
        assert_eq!(t.get(sqrt), Some(&Symbol::Builtin(Builtin::Sqrt)));
        assert_eq!(t.depth(), 1);
    }

    #[test]
    fn test_block_scope_frees() {
        let mut t = SymbolTable::new();
        let x: Rc<str> = "x".into();
        let outer = t.lookup_or_create(&x).unwrap();
        t.enter_scope().unwrap();
        assert_eq!(t.lookup_or_create(&x).unwrap(), outer);
        let y: Rc<str> = "y".into();
        t.lookup_or_create(&y).unwrap();
        assert!(t.lookup("y").is_some());
        t.leave_scope().unwrap();
        assert!(t.lookup("y").is_none());
        assert_eq!(t.lookup("x"), Some(outer));
    }

    #[test]
    fn test_leave_global_scope() {
        let mut t = SymbolTable::new();
        let e = t.leave_scope().unwrap_err();
        assert_eq!(e.code(), ErrorCode::InternalError);
        assert_eq!(t.depth(), 1);
    }

    #[test]
    fn test_redimension() {
        let mut t = SymbolTable::new();
        let a: Rc<str> = "a".into();
        t.define(&a, Symbol::Array(vec![0.0; 3])).unwrap();
        let e = t.define(&a, Symbol::Array(vec![])).unwrap_err();
        assert_eq!(e.code(), ErrorCode::RedimensionedArray);
        t.enter_scope().unwrap();
        assert!(t.define(&a, Symbol::Array(vec![0.0])).is_ok());
    }

    #[test]
    fn test_function_scope_skips_caller() {
        let mut t = SymbolTable::new();
        t.enter_scope().unwrap();
        let local: Rc<str> = "local".into();
        t.lookup_or_create(&local).unwrap();
        let f = function("f", &["n"]);
        t.enter_function(f.clone()).unwrap();
        assert!(t.lookup("local").is_none());
        assert!(t.lookup("pi").is_some());
        assert_eq!(t.current_function(), Some(&f));
        t.enter_scope().unwrap();
        t.leave_function().unwrap();
        assert_eq!(t.current_function(), None);
        assert!(t.lookup("local").is_some());
        assert_eq!(t.depth(), 2);
    }

    #[test]
    fn test_nested_function_restores_caller() {
        let mut t = SymbolTable::new();
        let f = function("f", &[]);
        let g = function("g", &[]);
        t.enter_function(f.clone()).unwrap();
        t.enter_function(g).unwrap();
        t.leave_function().unwrap();
        assert_eq!(t.current_function(), Some(&f));
        t.leave_function().unwrap();
        assert_eq!(t.current_function(), None);
    }
}
