//! Arc-based statement parameters.
//!
//! Builders store parameters as `Arc<dyn ToSql>` so they stay cloneable and
//! placeholder indices (`$n`) can be assigned when the SQL text is built,
//! not when the value is captured.

use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A clone-friendly statement parameter.
#[derive(Clone)]
pub struct Param(pub(crate) Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Wrap any ToSql value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// Borrow the inner value as the trait object tokio-postgres expects.
    pub fn as_ref(&self) -> &(dyn ToSql + Sync) {
        &*self.0 as &(dyn ToSql + Sync)
    }
}

impl std::fmt::Debug for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Param").field(&"<dyn ToSql>").finish()
    }
}

/// Ordered parameter list with 1-based placeholder indices.
#[derive(Clone, Debug, Default)]
pub struct ParamList {
    params: Vec<Param>,
}

impl ParamList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a value and return its 1-based placeholder index.
    pub fn push<T: ToSql + Send + Sync + 'static>(&mut self, value: T) -> usize {
        self.params.push(Param::new(value));
        self.params.len()
    }

    /// Add a pre-wrapped Param and return its 1-based placeholder index.
    pub fn push_param(&mut self, param: Param) -> usize {
        self.params.push(param);
        self.params.len()
    }

    /// Current parameter count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// All parameters as references for tokio-postgres.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }

    /// Append another list's parameters.
    pub fn extend(&mut self, other: &ParamList) {
        self.params.extend(other.params.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_returns_one_based_index() {
        let mut params = ParamList::new();
        assert_eq!(params.push(1i64), 1);
        assert_eq!(params.push("two"), 2);
        assert_eq!(params.len(), 2);
        assert_eq!(params.as_refs().len(), 2);
    }

    #[test]
    fn extend_appends() {
        let mut a = ParamList::new();
        a.push(1i32);
        let mut b = ParamList::new();
        b.push(2i32);
        b.push(3i32);
        a.extend(&b);
        assert_eq!(a.len(), 3);
    }
}
