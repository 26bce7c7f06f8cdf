use super::Cents;

/// Whether `spend` breaches a monthly `limit`.
///
/// A limit of zero means no budget is configured and never triggers.
/// The comparison is strict: spending exactly the limit is still within budget.
pub fn is_over_budget(spend: Cents, limit: Cents) -> bool {
    limit > 0 && spend > limit
}
