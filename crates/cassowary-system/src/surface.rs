//! Consumers of per-tick change-sets.

use crate::scheduler::ChangeSet;

/// Receives the values that changed on a tick.
///
/// Any `FnMut(&ChangeSet)` closure is a surface:
///
/// ```
/// use cassowary_system::prelude::*;
///
/// let spec = Specification::new().producer("x", || 3.0);
/// let mut system = System::new(spec).unwrap();
///
/// let mut seen = Vec::new();
/// system
///     .tick_into(&mut |changes: &ChangeSet| seen.extend(changes.names().map(String::from)))
///     .unwrap();
/// assert_eq!(seen, ["x"]);
/// ```
pub trait Surface {
    fn apply(&mut self, changes: &ChangeSet);
}

impl<F> Surface for F
where
    F: FnMut(&ChangeSet),
{
    fn apply(&mut self, changes: &ChangeSet) {
        self(changes)
    }
}
