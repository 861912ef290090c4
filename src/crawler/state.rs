//! Crawl phase definitions
//!
//! A crawl moves Seeded -> Traversing -> Exhausted and never goes back.

use std::fmt;

/// Why a crawl stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExhaustReason {
    /// The page budget was reached
    BudgetReached,

    /// No URLs were left to visit
    FrontierEmpty,
}

/// Current phase of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Frontier holds only the seed
    Seeded,

    /// At least one URL has been dequeued
    Traversing,

    /// Terminal: the loop has stopped
    Exhausted(ExhaustReason),
}

impl CrawlPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Exhausted(_))
    }

    /// Checks whether moving from this phase to `next` is allowed
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        match (self, next) {
            (Self::Seeded, Self::Traversing) => true,
            // A seed-only frontier can still end empty-handed or hit a zero budget
            (Self::Seeded, Self::Exhausted(_)) => true,
            (Self::Traversing, Self::Traversing) => true,
            (Self::Traversing, Self::Exhausted(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seeded => write!(f, "seeded"),
            Self::Traversing => write!(f, "traversing"),
            Self::Exhausted(ExhaustReason::BudgetReached) => write!(f, "exhausted (budget reached)"),
            Self::Exhausted(ExhaustReason::FrontierEmpty) => write!(f, "exhausted (frontier empty)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(CrawlPhase::Seeded.can_transition_to(CrawlPhase::Traversing));
        assert!(CrawlPhase::Traversing.can_transition_to(CrawlPhase::Traversing));
        assert!(CrawlPhase::Traversing
            .can_transition_to(CrawlPhase::Exhausted(ExhaustReason::BudgetReached)));
        assert!(CrawlPhase::Seeded
            .can_transition_to(CrawlPhase::Exhausted(ExhaustReason::FrontierEmpty)));
    }

    #[test]
    fn test_terminal_has_no_exit() {
        let done = CrawlPhase::Exhausted(ExhaustReason::FrontierEmpty);
        assert!(done.is_terminal());
        assert!(!done.can_transition_to(CrawlPhase::Traversing));
        assert!(!done.can_transition_to(CrawlPhase::Seeded));
        assert!(!CrawlPhase::Traversing.can_transition_to(CrawlPhase::Seeded));
    }

    #[test]
    fn test_display() {
        assert_eq!(CrawlPhase::Seeded.to_string(), "seeded");
        assert_eq!(
            CrawlPhase::Exhausted(ExhaustReason::BudgetReached).to_string(),
            "exhausted (budget reached)"
        );
    }
}
