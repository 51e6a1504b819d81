//! Backend selection.
//!
//! The engine picks one backend family when it creates its session and
//! keeps it for the session's lifetime. [`Backend`] wraps the two concrete
//! sessions behind one type so the caller does not have to be generic:
//!
//! ```
//! use satexpr::backend::Backend;
//!
//! let mut backend = Backend::from_tag("fraig").unwrap();
//! let x = backend.new_var();
//! let y = backend.new_var();
//! let f = backend.or(x, y);
//! assert!(backend.is_sat(f).unwrap());
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::config::Config;
use crate::entry::EntryId;
use crate::error::{Error, Result};
use crate::expr::aig::Aig;
use crate::expr::native::NativeExpr;
use crate::formula::Formula;
use crate::session::{Session, Stats};
use crate::solver::bdd::BddSolver;
use crate::solver::cadical::CadicalSolver;
use crate::types::Status;

/// Backend family tag.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BackendKind {
    /// Native expression trees decided by CaDiCaL.
    NativeExpr,
    /// And-inverter graphs decided by BDDs.
    Fraig,
}

impl BackendKind {
    pub const ALL: [BackendKind; 2] = [BackendKind::NativeExpr, BackendKind::Fraig];

    /// Canonical tag.
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::NativeExpr => "native-expression",
            BackendKind::Fraig => "fraig",
        }
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "native" | "native-expr" | "native-expression" => Ok(BackendKind::NativeExpr),
            "fraig" | "aig" => Ok(BackendKind::Fraig),
            _ => Err(Error::UnknownBackend(s.to_string())),
        }
    }
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A session of either backend family.
pub enum Backend {
    Native(Session<NativeExpr, CadicalSolver>),
    Fraig(Session<Aig, BddSolver>),
}

macro_rules! dispatch {
    ($self:ident, $s:ident => $body:expr) => {
        match $self {
            Backend::Native($s) => $body,
            Backend::Fraig($s) => $body,
        }
    };
}

impl Backend {
    /// Session of the given kind with otherwise default settings.
    pub fn configure(kind: BackendKind) -> Result<Self> {
        Backend::from_config(&Config::default().with_backend(kind))
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(match config.backend {
            BackendKind::NativeExpr => Backend::Native(Session::native(config)?),
            BackendKind::Fraig => Backend::Fraig(Session::fraig(config)?),
        })
    }

    /// Parse the tag and configure a session of that kind.
    pub fn from_tag(tag: &str) -> Result<Self> {
        Backend::configure(tag.parse()?)
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Native(_) => BackendKind::NativeExpr,
            Backend::Fraig(_) => BackendKind::Fraig,
        }
    }

    pub fn config(&self) -> &Config {
        dispatch!(self, s => s.config())
    }

    pub fn stats(&self) -> Stats {
        dispatch!(self, s => s.stats())
    }

    pub fn num_vars(&self) -> u64 {
        dispatch!(self, s => s.num_vars())
    }

    pub fn num_entries(&self) -> usize {
        dispatch!(self, s => s.num_entries())
    }

    pub fn const_true(&mut self) -> Formula {
        dispatch!(self, s => s.const_true())
    }

    pub fn const_false(&mut self) -> Formula {
        dispatch!(self, s => s.const_false())
    }

    pub fn new_var(&mut self) -> Formula {
        dispatch!(self, s => s.new_var())
    }

    pub fn not(&mut self, f: Formula) -> Formula {
        dispatch!(self, s => s.not(f))
    }

    pub fn and(&mut self, left: Formula, right: Formula) -> Formula {
        dispatch!(self, s => s.and(left, right))
    }

    pub fn or(&mut self, left: Formula, right: Formula) -> Formula {
        dispatch!(self, s => s.or(left, right))
    }

    pub fn and_many(&mut self, fs: impl IntoIterator<Item = Formula>) -> Formula {
        dispatch!(self, s => s.and_many(fs))
    }

    pub fn or_many(&mut self, fs: impl IntoIterator<Item = Formula>) -> Formula {
        dispatch!(self, s => s.or_many(fs))
    }

    pub fn formulas_equal(&self, a: Formula, b: Formula) -> bool {
        dispatch!(self, s => s.formulas_equal(a, b))
    }

    pub fn formula_hash(&self, f: Formula) -> u64 {
        dispatch!(self, s => s.formula_hash(f))
    }

    pub fn display(&self, f: Formula) -> String {
        dispatch!(self, s => s.display(f))
    }

    pub fn build(&mut self, f: Formula) -> Result<EntryId> {
        dispatch!(self, s => s.build(f))
    }

    pub fn status(&self, f: Formula) -> Option<Status> {
        dispatch!(self, s => s.status(f))
    }

    pub fn is_sat(&mut self, f: Formula) -> Result<bool> {
        dispatch!(self, s => s.is_sat(f))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_parse_kind() {
        for tag in ["native", "native-expr", "Native-Expression"] {
            assert_eq!(tag.parse::<BackendKind>().unwrap(), BackendKind::NativeExpr);
        }
        for tag in ["fraig", "AIG"] {
            assert_eq!(tag.parse::<BackendKind>().unwrap(), BackendKind::Fraig);
        }
        for kind in BackendKind::ALL {
            assert_eq!(kind.to_string().parse::<BackendKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_backend() {
        let err = "abc".parse::<BackendKind>().unwrap_err();
        assert!(matches!(err, Error::UnknownBackend(ref tag) if tag == "abc"));
        assert!(matches!(Backend::from_tag("z3"), Err(Error::UnknownBackend(_))));
    }

    #[test]
    fn test_kind_is_kept() {
        for kind in BackendKind::ALL {
            let backend = Backend::configure(kind).unwrap();
            assert_eq!(backend.kind(), kind);
            assert_eq!(backend.config().backend, kind);
        }
    }

    #[test]
    fn test_invalid_config() {
        let config = Config::default().with_storage_bits(64);
        assert!(matches!(Backend::from_config(&config), Err(Error::InvalidBits(64))));
    }

    #[test]
    fn test_forwarding() {
        for kind in BackendKind::ALL {
            let mut backend = Backend::configure(kind).unwrap();
            let x = backend.new_var();
            let nx = backend.not(x);
            let f = backend.and(x, nx);
            assert_eq!(backend.status(f), None);
            assert!(!backend.is_sat(f).unwrap());
            assert_eq!(backend.status(f), Some(Status::Unsat));
            assert_eq!(backend.num_vars(), 1);
        }
    }
}
