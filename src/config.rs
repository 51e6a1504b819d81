//! Session configuration.

use crate::backend::BackendKind;
use crate::error::{Error, Result};

/// Knobs for a [`Session`][crate::session::Session].
///
/// ```
/// use satexpr::backend::BackendKind;
/// use satexpr::config::Config;
///
/// let config = Config::default()
///     .with_backend(BackendKind::Fraig)
///     .with_fraig_precheck(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Which expression library / solver pair to use.
    pub backend: BackendKind,
    /// Bucket bits of the hash-consing tables.
    pub storage_bits: usize,
    /// Size bits of the BDD computed table.
    pub cache_bits: usize,
    /// Consult the bounded fraiging check before the exact solver.
    pub fraig_precheck: bool,
    /// Rounds of 64 simulation patterns per bounded check.
    pub fraig_patterns: u32,
    /// Seed of the simulation patterns.
    pub seed: u64,
    /// Diagnostics level; above 4 every solver call is logged.
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::NativeExpr,
            storage_bits: 16,
            cache_bits: 16,
            fraig_precheck: false,
            fraig_patterns: 8,
            seed: 0x5eed,
            verbosity: 0,
        }
    }
}

impl Config {
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_storage_bits(mut self, bits: usize) -> Self {
        self.storage_bits = bits;
        self
    }

    pub fn with_cache_bits(mut self, bits: usize) -> Self {
        self.cache_bits = bits;
        self
    }

    pub fn with_fraig_precheck(mut self, enabled: bool) -> Self {
        self.fraig_precheck = enabled;
        self
    }

    pub fn with_fraig_patterns(mut self, rounds: u32) -> Self {
        self.fraig_patterns = rounds;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Check the table sizes.
    pub fn validate(&self) -> Result<()> {
        for bits in [self.storage_bits, self.cache_bits] {
            if bits > 31 {
                return Err(Error::InvalidBits(bits));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.backend, BackendKind::NativeExpr);
        assert!(!config.fraig_precheck);
    }

    #[test]
    fn test_invalid_bits() {
        let config = Config::default().with_storage_bits(32);
        assert!(matches!(config.validate(), Err(Error::InvalidBits(32))));
        let config = Config::default().with_cache_bits(40);
        assert!(matches!(config.validate(), Err(Error::InvalidBits(40))));
    }
}
