//! Source spans and spanned values shared by tokens, AST nodes, and errors.

use std::ops::Range;

/// A half-open byte range into the source text.
pub type Span = Range<usize>;

/// Returns a span covering both `start` and `end`.
pub fn join(start: &Span, end: &Span) -> Span {
    start.start.min(end.start)..start.end.max(end.end)
}

/// A value paired with the source range it was parsed from.
///
/// Used for small leaves such as alias names, where a dedicated node struct
/// would add nothing but a span.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Spanned<T> {
    /// The wrapped value.
    pub node: T,
    /// Where the value appears in the source.
    pub span: Span,
}

impl<T> Spanned<T> {
    /// Creates a new spanned value.
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }

    /// Maps the inner value while keeping the span.
    pub fn map<U, F>(self, f: F) -> Spanned<U>
    where
        F: FnOnce(T) -> U,
    {
        Spanned {
            node: f(self.node),
            span: self.span,
        }
    }

    /// Extracts the inner value, discarding the span.
    pub fn into_inner(self) -> T {
        self.node
    }
}

impl<T> AsRef<T> for Spanned<T> {
    fn as_ref(&self) -> &T {
        &self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_covers_both_ranges() {
        assert_eq!(join(&(4..6), &(10..12)), 4..12);
        assert_eq!(join(&(10..12), &(4..6)), 4..12);
    }

    #[test]
    fn spanned_map_keeps_span() {
        let spanned = Spanned::new(5, 10..15);
        let mapped = spanned.map(|x| x * 2);
        assert_eq!(mapped.node, 10);
        assert_eq!(mapped.span, 10..15);
    }

    #[test]
    fn spanned_into_inner() {
        let spanned = Spanned::new("hello", 0..5);
        assert_eq!(*spanned.as_ref(), "hello");
        assert_eq!(spanned.into_inner(), "hello");
    }
}
