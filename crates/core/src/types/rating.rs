//! Customer rating attached to every catalog product.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Number of stars a rating is drawn with.
pub const MAX_STARS: usize = 5;

/// Average rating and number of reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// Average score between 0 and 5.
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    /// Number of ratings the average is taken over.
    pub count: u32,
}

/// One star of a rendered rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Star {
    Full,
    Half,
    Empty,
}

impl Star {
    /// Single-character glyph for terminal output.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Full => '★',
            Self::Half => '⯪',
            Self::Empty => '☆',
        }
    }
}

impl Rating {
    /// Create a rating.
    #[must_use]
    pub const fn new(rate: Decimal, count: u32) -> Self {
        Self { rate, count }
    }

    /// The rating as five stars.
    ///
    /// Each whole point is a full star. The star after the last full one is a
    /// half star when the fractional part is at least one half. The rest are
    /// empty. Out-of-range rates are clamped to `0..=5`.
    #[must_use]
    pub fn stars(&self) -> [Star; MAX_STARS] {
        let rate = self.rate.clamp(Decimal::ZERO, Decimal::from(MAX_STARS));
        let full = rate.trunc().to_usize().unwrap_or(0);
        let has_half = rate.fract() >= Decimal::new(5, 1);

        let mut stars = [Star::Empty; MAX_STARS];
        for (i, star) in stars.iter_mut().enumerate() {
            if i < full {
                *star = Star::Full;
            } else if i == full && has_half {
                *star = Star::Half;
            }
        }
        stars
    }

    /// Stars followed by the review count, e.g. `★★★⯪☆ (120)`.
    #[must_use]
    pub fn render(&self) -> String {
        let stars: String = self.stars().iter().map(|s| s.glyph()).collect();
        format!("{stars} ({})", self.count)
    }
}
