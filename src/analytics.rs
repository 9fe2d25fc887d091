// Spending analytics: category totals shaped for a pie chart
//
// Slice sizes are proportional to each category's summed amount. Categories
// whose sum is zero or negative keep their legend entry but get no area.

use crate::context::AppContext;
use crate::db::{self, CategoryTotal};
use crate::error::{ExpenseError, Result};
use log::info;

pub const CHART_TITLE: &str = "Spending Distribution";

/// ColorBrewer "Set3" qualitative palette, used in slice order and cycled.
pub const PALETTE: [(u8, u8, u8); 12] = [
    (141, 211, 199),
    (255, 255, 179),
    (190, 186, 218),
    (251, 128, 114),
    (128, 177, 211),
    (253, 180, 98),
    (179, 222, 105),
    (252, 205, 229),
    (217, 217, 217),
    (188, 128, 189),
    (204, 235, 197),
    (255, 237, 111),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub category: String,
    pub total: f64,
    /// Fraction of the whole pie, 0.0..=1.0
    pub share: f64,
    pub color: (u8, u8, u8),
}

impl Slice {
    pub fn percent(&self) -> f64 {
        self.share * 100.0
    }

    /// "<category> <pct>%" with one decimal place.
    pub fn label(&self) -> String {
        format!("{} {:.1}%", self.category, self.percent())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpendingSummary {
    pub slices: Vec<Slice>,
}

impl SpendingSummary {
    pub fn from_totals(totals: Vec<CategoryTotal>) -> Result<Self> {
        if totals.is_empty() {
            return Err(ExpenseError::NoData);
        }

        let grand: f64 = totals.iter().map(|t| t.total.max(0.0)).sum();
        let slices = totals
            .into_iter()
            .enumerate()
            .map(|(i, t)| {
                let share = if grand > 0.0 { t.total.max(0.0) / grand } else { 0.0 };
                Slice {
                    category: t.category,
                    total: t.total,
                    share,
                    color: PALETTE[i % PALETTE.len()],
                }
            })
            .collect();

        Ok(Self { slices })
    }

    pub fn grand_total(&self) -> f64 {
        self.slices.iter().map(|s| s.total).sum()
    }

    /// Index of the slice covering `fraction` of the way around the circle.
    /// Returns `None` when nothing has area (all totals <= 0).
    pub fn slice_at(&self, fraction: f64) -> Option<usize> {
        let fraction = fraction.clamp(0.0, 1.0);
        let mut cumulative = 0.0;
        let mut last_with_area = None;

        for (i, slice) in self.slices.iter().enumerate() {
            if slice.share <= 0.0 {
                continue;
            }
            cumulative += slice.share;
            last_with_area = Some(i);
            if fraction < cumulative {
                return Some(i);
            }
        }

        // Rounding can leave the cumulative sum a hair under 1.0
        last_with_area
    }
}

/// Aggregate the store by category. An empty store is `NoData`, which the
/// shell shows as an empty-state notice instead of a chart.
pub fn spending_summary(ctx: &AppContext) -> Result<SpendingSummary> {
    let summary = SpendingSummary::from_totals(db::sum_by_category(&ctx.conn)?)?;
    info!(
        "event=analytics module=analytics status=ok categories={}",
        summary.slices.len()
    );
    Ok(summary)
}
