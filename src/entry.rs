//! Formula-cache entries.

use std::fmt;

use crate::types::Status;

/// Stable index of an entry in a session's formula cache.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EntryId(u32);

impl EntryId {
    pub(crate) fn new(index: usize) -> Self {
        assert!(index <= u32::MAX as usize, "Formula cache is full");
        EntryId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Solver object together with what is known about its satisfiability.
///
/// The payload of `Unsat` is always the solver's constant false object.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SatState<O> {
    Unknown(O),
    Sat(O),
    Unsat(O),
}

/// One entry of the formula cache.
#[derive(Debug, Clone)]
pub struct SatObject<O> {
    state: SatState<O>,
}

impl<O> SatObject<O> {
    /// Create an entry with a seeded status.
    ///
    /// For `Status::Unsat` the object must already be the solver's constant false.
    pub fn new(object: O, status: Status) -> Self {
        let state = match status {
            Status::Unknown => SatState::Unknown(object),
            Status::Sat => SatState::Sat(object),
            Status::Unsat => SatState::Unsat(object),
        };
        Self { state }
    }

    pub fn state(&self) -> &SatState<O> {
        &self.state
    }

    pub fn status(&self) -> Status {
        match self.state {
            SatState::Unknown(_) => Status::Unknown,
            SatState::Sat(_) => Status::Sat,
            SatState::Unsat(_) => Status::Unsat,
        }
    }

    /// The current solver object.
    pub fn object(&self) -> &O {
        match &self.state {
            SatState::Unknown(o) | SatState::Sat(o) | SatState::Unsat(o) => o,
        }
    }

    /// Record the answer of a decision.
    ///
    /// On `Unsat` the object is replaced by `falsity`.
    ///
    /// # Panics
    ///
    /// Panics if the entry is already decided.
    pub(crate) fn resolve(&mut self, sat: bool, falsity: O) {
        let state = std::mem::replace(&mut self.state, SatState::Unsat(falsity));
        match state {
            SatState::Unknown(object) => {
                if sat {
                    self.state = SatState::Sat(object);
                }
            }
            _ => panic!("status of a decided entry cannot change"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded() {
        let e = SatObject::new(7, Status::Sat);
        assert_eq!(e.status(), Status::Sat);
        assert_eq!(*e.object(), 7);
        let e = SatObject::new(0, Status::Unsat);
        assert_eq!(e.state(), &SatState::Unsat(0));
    }

    #[test]
    fn test_resolve_sat_keeps_object() {
        let mut e = SatObject::new(7, Status::Unknown);
        e.resolve(true, 0);
        assert_eq!(e.state(), &SatState::Sat(7));
    }

    #[test]
    fn test_resolve_unsat_canonicalizes() {
        let mut e = SatObject::new(7, Status::Unknown);
        e.resolve(false, 0);
        assert_eq!(e.status(), Status::Unsat);
        assert_eq!(*e.object(), 0);
    }

    #[test]
    #[should_panic(expected = "status of a decided entry cannot change")]
    fn test_resolve_twice_panics() {
        let mut e = SatObject::new(7, Status::Unknown);
        e.resolve(true, 0);
        e.resolve(false, 0);
    }
}
