use super::{Address, Cell};
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// A deferred address. Allocated by the code generator, resolved by `Link`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(pub usize);

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "L{}", self.0)
    }
}

#[derive(Debug, Default, Clone)]
struct Record {
    definition: Option<Address>,
    references: Vec<Address>,
}

/// ## Label arena and relocation pass

#[derive(Debug, Default)]
pub struct Link {
    records: Vec<Record>,
}

impl Link {
    pub fn new() -> Link {
        Link::default()
    }

    fn record(&mut self, label: Label) -> &mut Record {
        if label.0 >= self.records.len() {
            self.records.resize(label.0 + 1, Record::default());
        }
        &mut self.records[label.0]
    }

    pub fn define(&mut self, label: Label, addr: Address) -> Result<()> {
        let record = self.record(label);
        if record.definition.is_some() {
            return Err(error!(DuplicateLabel; label.to_string()));
        }
        record.definition = Some(addr);
        Ok(())
    }

    pub fn reference(&mut self, label: Label, addr: Address) {
        self.record(label).references.push(addr);
    }

    pub fn definition(&self, label: Label) -> Option<Address> {
        self.records.get(label.0).and_then(|r| r.definition)
    }

    /// Overwrites every referencing cell with its label's address.
    pub fn link(&mut self, cells: &mut [Cell]) -> Result<()> {
        for (index, record) in self.records.iter().enumerate() {
            if record.references.is_empty() {
                continue;
            }
            let dest = match record.definition {
                Some(dest) => dest,
                None => return Err(error!(UndefinedLabel; Label(index).to_string())),
            };
            for addr in &record.references {
                match cells.get_mut(*addr) {
                    Some(cell) => *cell = Cell::Address(dest),
                    None => return Err(error!(InternalError; "LINK FAILURE")),
                }
            }
        }
        Ok(())
    }
}
