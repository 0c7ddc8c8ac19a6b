//! Process-wide symbol registry
//!
//! Provides [`SymbolRegistry`], the immutable bidirectional code/label tables
//! for every [`SymbolDomain`]. The tables are built once, verified to be
//! injective in both directions, and never mutated afterwards, so the registry
//! is shared freely across threads without locking.

use crate::error::SymbolError;
use crate::symbol::{Code, Container, Location, ObjectKind, Symbol, SymbolCode, SymbolDomain, TaskType};
use once_cell::sync::Lazy;
use std::collections::HashMap;

static GLOBAL: Lazy<SymbolRegistry> = Lazy::new(|| {
    SymbolRegistry::build().expect("built-in symbol tables are injective")
});

/// Bidirectional table for one symbol domain
#[derive(Debug, Clone)]
pub struct SymbolTable<S: Symbol> {
    by_code: HashMap<Code, S>,
    by_label: HashMap<&'static str, S>,
}

impl<S: Symbol> SymbolTable<S> {
    /// Build the table for the full domain
    ///
    /// # Errors
    /// Returns `DuplicateCode`/`DuplicateLabel` if the domain is not injective.
    pub fn build() -> Result<Self, SymbolError> {
        Self::from_entries(S::ALL)
    }

    /// Build a table from an explicit member list
    ///
    /// # Errors
    /// Returns `DuplicateCode`/`DuplicateLabel` on the first repeated entry.
    pub fn from_entries(entries: &[S]) -> Result<Self, SymbolError> {
        let mut by_code = HashMap::with_capacity(entries.len());
        let mut by_label = HashMap::with_capacity(entries.len());

        for &symbol in entries {
            if by_code.insert(symbol.code(), symbol).is_some() {
                return Err(SymbolError::DuplicateCode {
                    domain: S::DOMAIN,
                    code: symbol.code(),
                });
            }
            if by_label.insert(symbol.label(), symbol).is_some() {
                return Err(SymbolError::DuplicateLabel {
                    domain: S::DOMAIN,
                    label: symbol.label().to_string(),
                });
            }
        }

        Ok(Self { by_code, by_label })
    }

    /// Look up a member by its exact label
    ///
    /// # Errors
    /// Returns `UnknownLabel` if no member carries `label`.
    pub fn by_label(&self, label: &str) -> Result<S, SymbolError> {
        self.by_label
            .get(label)
            .copied()
            .ok_or_else(|| SymbolError::UnknownLabel {
                domain: S::DOMAIN,
                label: label.to_string(),
            })
    }

    /// Look up a member by its code
    ///
    /// # Errors
    /// Returns `UnknownCode` if no member carries `code`.
    pub fn by_code(&self, code: Code) -> Result<S, SymbolError> {
        self.by_code
            .get(&code)
            .copied()
            .ok_or(SymbolError::UnknownCode {
                domain: S::DOMAIN,
                code,
            })
    }

    /// Number of members
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    /// Whether the table has no members
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    /// Members in ascending code order
    #[must_use]
    pub fn entries(&self) -> Vec<SymbolCode> {
        let mut entries: Vec<SymbolCode> = self.by_code.values().map(|s| s.symbol_code()).collect();
        entries.sort_by_key(|e| e.code);
        entries
    }
}

/// Immutable registry of all symbol domains
#[derive(Debug, Clone)]
pub struct SymbolRegistry {
    pub(crate) locations: SymbolTable<Location>,
    pub(crate) objects: SymbolTable<ObjectKind>,
    pub(crate) containers: SymbolTable<Container>,
    pub(crate) task_types: SymbolTable<TaskType>,
}

impl SymbolRegistry {
    /// Build all domain tables from the fixed definitions
    ///
    /// # Errors
    /// Returns the first injectivity violation found.
    pub fn build() -> Result<Self, SymbolError> {
        Ok(Self {
            locations: SymbolTable::build()?,
            objects: SymbolTable::build()?,
            containers: SymbolTable::build()?,
            task_types: SymbolTable::build()?,
        })
    }

    /// The process-wide registry, built on first access
    #[inline]
    #[must_use]
    pub fn global() -> &'static SymbolRegistry {
        &GLOBAL
    }

    /// Resolve a label in a domain chosen at runtime
    ///
    /// # Errors
    /// Returns `UnknownLabel` if the domain has no such label.
    pub fn resolve(&self, domain: SymbolDomain, label: &str) -> Result<SymbolCode, SymbolError> {
        match domain {
            SymbolDomain::Location => self.locations.by_label(label).map(Symbol::symbol_code),
            SymbolDomain::Object => self.objects.by_label(label).map(Symbol::symbol_code),
            SymbolDomain::Container => self.containers.by_label(label).map(Symbol::symbol_code),
            SymbolDomain::TaskType => self.task_types.by_label(label).map(Symbol::symbol_code),
        }
    }

    /// Canonical label of a code in a domain chosen at runtime
    ///
    /// # Errors
    /// Returns `UnknownCode` if the domain has no such code.
    pub fn label_of(&self, domain: SymbolDomain, code: Code) -> Result<&'static str, SymbolError> {
        match domain {
            SymbolDomain::Location => self.locations.by_code(code).map(Symbol::label),
            SymbolDomain::Object => self.objects.by_code(code).map(Symbol::label),
            SymbolDomain::Container => self.containers.by_code(code).map(Symbol::label),
            SymbolDomain::TaskType => self.task_types.by_code(code).map(Symbol::label),
        }
    }

    /// Typed label lookup
    ///
    /// # Errors
    /// Returns `UnknownLabel` if `S`'s domain has no such label.
    #[inline]
    pub fn lookup<S: Symbol>(&self, label: &str) -> Result<S, SymbolError> {
        S::table(self).by_label(label)
    }

    /// Typed code lookup
    ///
    /// # Errors
    /// Returns `UnknownCode` if `S`'s domain has no such code.
    #[inline]
    pub fn from_code<S: Symbol>(&self, code: Code) -> Result<S, SymbolError> {
        S::table(self).by_code(code)
    }

    /// All `(code, label)` entries of a domain in ascending code order
    #[must_use]
    pub fn entries(&self, domain: SymbolDomain) -> Vec<SymbolCode> {
        match domain {
            SymbolDomain::Location => self.locations.entries(),
            SymbolDomain::Object => self.objects.entries(),
            SymbolDomain::Container => self.containers.entries(),
            SymbolDomain::TaskType => self.task_types.entries(),
        }
    }
}
