use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a curve within a [`CurveRegistry`](crate::registry::CurveRegistry).
///
/// Keys are issued monotonically by the registry and never reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurveKey(u64);

impl CurveKey {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// The key following this one, or `None` at the end of the key space.
    pub(crate) const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }
}

impl fmt::Debug for CurveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for CurveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_order_by_issue() {
        let a = CurveKey::new(3);
        assert!(Some(a) < a.next());
        assert_eq!(a.next().map(CurveKey::get), Some(4));
        assert_eq!(format!("{a}"), "#3");
    }

    #[test]
    fn last_key_has_no_successor() {
        assert_eq!(CurveKey::new(u64::MAX).next(), None);
    }
}
