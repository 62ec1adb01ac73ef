use std::fmt::{Display, Formatter};

/// Per-dispatch correlation identifier backed by ULID.
///
/// Only ever appears in log events; it is never sent over the bus.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct DispatchId(pub ulid::Ulid);

impl DispatchId {
    #[must_use]
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }
}

impl Default for DispatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for DispatchId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_ids_are_distinct_ulids() {
        let a = DispatchId::new();
        let b = DispatchId::new();
        assert_ne!(a, b);
        let rendered = a.to_string();
        assert_eq!(rendered.len(), 26);
        assert_eq!(ulid::Ulid::from_string(&rendered).unwrap(), a.0);
    }
}
