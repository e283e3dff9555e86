//! Substructure pattern matching.

use std::fmt;

use crate::errors::BridgeError;
use crate::molecule::Molecule;
use crate::toolkit::Toolkit;

/// A substructure pattern, compiled once by toolkit `T`.
///
/// ```ignore
/// let smarts = Smarts::<Mini>::new("[#6][#6]")?;
/// let matches = smarts.find_all(&mol);
/// ```
pub struct Smarts<T: Toolkit> {
    pattern: String,
    query: T::Query,
}

impl<T: Toolkit> Smarts<T> {
    /// Compile `pattern`; syntax errors surface as `MalformedInput`.
    pub fn new(pattern: &str) -> Result<Self, BridgeError> {
        T::ensure_ready()?;
        let query = T::compile_query(pattern)?;
        Ok(Smarts { pattern: pattern.to_string(), query })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// All matches against `molecule`, as vectors of atom indices.
    pub fn find_all(&self, molecule: &Molecule<T>) -> Vec<Vec<usize>> {
        T::find_matches(molecule.handle(), &self.query)
    }
}

// Manual impl: `T::Query` is opaque and need not be `Debug` itself.
impl<T: Toolkit> fmt::Debug for Smarts<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Smarts").field("pattern", &self.pattern).finish()
    }
}
