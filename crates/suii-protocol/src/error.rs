//! Error types for symbol resolution

use crate::symbol::{Code, SymbolDomain};

/// Symbol lookup and table construction errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    /// Label does not name any member of the domain
    #[error("unknown {domain} label: '{label}'")]
    UnknownLabel { domain: SymbolDomain, label: String },

    /// Code does not identify any member of the domain
    #[error("unknown {domain} code: {code}")]
    UnknownCode { domain: SymbolDomain, code: Code },

    /// Two members share a label
    #[error("duplicate {domain} label: '{label}'")]
    DuplicateLabel { domain: SymbolDomain, label: String },

    /// Two members share a code
    #[error("duplicate {domain} code: {code}")]
    DuplicateCode { domain: SymbolDomain, code: Code },
}

impl SymbolError {
    /// Domain the failed lookup was made in
    #[inline]
    #[must_use]
    pub fn domain(&self) -> SymbolDomain {
        match self {
            Self::UnknownLabel { domain, .. }
            | Self::UnknownCode { domain, .. }
            | Self::DuplicateLabel { domain, .. }
            | Self::DuplicateCode { domain, .. } => *domain,
        }
    }

    /// Offending label or code, rendered for diagnostics
    #[must_use]
    pub fn offending_value(&self) -> String {
        match self {
            Self::UnknownLabel { label, .. } | Self::DuplicateLabel { label, .. } => label.clone(),
            Self::UnknownCode { code, .. } | Self::DuplicateCode { code, .. } => code.to_string(),
        }
    }
}
