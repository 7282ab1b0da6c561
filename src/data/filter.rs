use chrono::NaiveDate;

use super::model::CumulativeSeries;

// ---------------------------------------------------------------------------
// Date window: which part of the series is on screen
// ---------------------------------------------------------------------------

/// Inclusive date range used to restrict what the plot and table show.
///
/// Windowing is applied to an already computed series, so the running
/// totals keep counting everything before `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        DateWindow { from, to }.normalized()
    }

    /// Smallest window covering every point, or `None` for an empty series.
    pub fn spanning(series: &CumulativeSeries) -> Option<Self> {
        let summary = series.summary();
        Some(DateWindow {
            from: summary.first_date?,
            to: summary.last_date?,
        })
    }

    /// Swap the bounds if they were picked in the wrong order.
    pub fn normalized(self) -> Self {
        if self.from > self.to {
            DateWindow {
                from: self.to,
                to: self.from,
            }
        } else {
            self
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Indices of the points inside the window, in series order.
    pub fn visible_indices(&self, series: &CumulativeSeries) -> Vec<usize> {
        series
            .points
            .iter()
            .enumerate()
            .filter(|(_, p)| self.contains(p.date))
            .map(|(i, _)| i)
            .collect()
    }
}
