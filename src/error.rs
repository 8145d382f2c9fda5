/// Errors raised by bucket stores.
///
/// Ranges that fall outside a constrained store are not errors; the
/// operation reports zero buckets touched instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The upper bound given to a constrained store sorts before its lower bound.
    #[error("bounds are out of order: the upper bound sorts before the lower bound")]
    BoundsOutOfOrder,
    /// Bounds were queried on a store that has none.
    #[error("bounds are not constrained")]
    Unconstrained,
}
