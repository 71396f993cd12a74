use std::collections::HashMap;

use ir::InstrId;

use crate::error::CompileError;

/// Name → first-instruction-offset map.
///
/// Keeps a parallel `order` vector alongside the lookup map so the GOT
/// comes out in declaration order rather than whatever order a bare
/// `HashMap` would iterate in. The only behavior that matters for
/// correctness is the *uniqueness* check — a duplicate name is a fatal
/// semantic error — but deterministic output is worth the extra `Vec`.
#[derive(Debug, Default)]
pub struct FunctionTable {
    index: HashMap<String, usize>,
    order: Vec<(String, InstrId)>,
}

impl FunctionTable {
    pub fn new() -> Self {
        FunctionTable::default()
    }

    pub fn install(&mut self, name: &str, entry: InstrId) -> Result<(), CompileError> {
        if self.index.contains_key(name) {
            return Err(CompileError::DuplicateFunction(name.to_string()));
        }
        self.index.insert(name.to_string(), self.order.len());
        self.order.push((name.to_string(), entry));
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, InstrId)> {
        self.order.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
