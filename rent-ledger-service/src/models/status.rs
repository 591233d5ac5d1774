//! Outstanding-balance status classification.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Upper bound (inclusive) of an outstanding balance still considered pending.
pub const PENDING_LIMIT: Decimal = Decimal::from_parts(5_000, 0, 0, false, 0);

/// Upper bound (inclusive) of an outstanding balance considered overdue.
/// Anything above is critical.
pub const OVERDUE_LIMIT: Decimal = Decimal::from_parts(15_000, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusTier {
    Paid,
    Pending,
    Overdue,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTier {
    Green,
    Amber,
    Orange,
    Red,
}

/// Display colors used by the dashboard cards for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub border: &'static str,
    pub badge_background: &'static str,
    pub badge_text: &'static str,
}

impl StatusTier {
    pub const ALL: [StatusTier; 4] = [
        StatusTier::Paid,
        StatusTier::Pending,
        StatusTier::Overdue,
        StatusTier::Critical,
    ];

    pub fn color(self) -> ColorTier {
        match self {
            Self::Paid => ColorTier::Green,
            Self::Pending => ColorTier::Amber,
            Self::Overdue => ColorTier::Orange,
            Self::Critical => ColorTier::Red,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Paid => "PAID",
            Self::Pending => "PENDING",
            Self::Overdue => "OVERDUE",
            Self::Critical => "CRITICAL",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Paid => Palette {
                border: "#10b981",
                badge_background: "#d1fae5",
                badge_text: "#064e3b",
            },
            Self::Pending => Palette {
                border: "#f59e0b",
                badge_background: "#fef3c7",
                badge_text: "#78350f",
            },
            Self::Overdue => Palette {
                border: "#f97316",
                badge_background: "#ffedd5",
                badge_text: "#7c2d12",
            },
            Self::Critical => Palette {
                border: "#ef4444",
                badge_background: "#fee2e2",
                badge_text: "#7f1d1d",
            },
        }
    }
}

impl std::fmt::Display for StatusTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classifies what is still owed on a bill.
///
/// Overpayment (a negative difference) counts as paid.
pub fn classify(billed: Decimal, paid: Decimal) -> StatusTier {
    let diff = billed - paid;
    if diff <= Decimal::ZERO {
        StatusTier::Paid
    } else if diff <= PENDING_LIMIT {
        StatusTier::Pending
    } else if diff <= OVERDUE_LIMIT {
        StatusTier::Overdue
    } else {
        StatusTier::Critical
    }
}
