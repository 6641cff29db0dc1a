//! Class distribution summary with a text bar chart.

use std::fmt;

use crate::domain::Label;

const BAR_WIDTH: usize = 40;

/// Number of records per outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassCounts {
    /// Records labeled 0.
    pub not_enrolled: usize,
    /// Records labeled 1.
    pub enrolled: usize,
}

impl ClassCounts {
    /// Tally a label sequence.
    #[must_use]
    pub fn from_labels(labels: &[Label]) -> Self {
        let enrolled = labels.iter().filter(|&&l| l == Label::Enrolled).count();
        Self {
            not_enrolled: labels.len() - enrolled,
            enrolled,
        }
    }

    /// Return the total number of records.
    #[must_use]
    pub fn total(&self) -> usize {
        self.not_enrolled + self.enrolled
    }

    /// Return the count for one outcome.
    #[must_use]
    pub fn get(&self, label: Label) -> usize {
        match label {
            Label::NotEnrolled => self.not_enrolled,
            Label::Enrolled => self.enrolled,
        }
    }

    /// Return the share of the smaller class, or `NaN` when empty.
    #[must_use]
    pub fn minority_share(&self) -> f64 {
        if self.total() == 0 {
            return f64::NAN;
        }
        self.not_enrolled.min(self.enrolled) as f64 / self.total() as f64
    }

    /// Return majority count divided by minority count (infinite if a class is empty).
    #[must_use]
    pub fn imbalance_ratio(&self) -> f64 {
        let lo = self.not_enrolled.min(self.enrolled);
        let hi = self.not_enrolled.max(self.enrolled);
        if lo == 0 {
            f64::INFINITY
        } else {
            hi as f64 / lo as f64
        }
    }

    /// Return the counts as `[not_enrolled, enrolled]`.
    #[must_use]
    pub fn as_array(&self) -> [usize; 2] {
        [self.not_enrolled, self.enrolled]
    }
}

impl fmt::Display for ClassCounts {
    /// Horizontal bars scaled so the larger class spans the full width.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total();
        let max = self.not_enrolled.max(self.enrolled).max(1);
        for label in [Label::NotEnrolled, Label::Enrolled] {
            let count = self.get(label);
            let len = (count * BAR_WIDTH).div_ceil(max);
            let pct = if total == 0 {
                0.0
            } else {
                100.0 * count as f64 / total as f64
            };
            writeln!(
                f,
                "{label} | {bar:<width$} {count:>7} ({pct:5.1}%)",
                bar = "#".repeat(len),
                width = BAR_WIDTH,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(zero: usize, one: usize) -> ClassCounts {
        ClassCounts {
            not_enrolled: zero,
            enrolled: one,
        }
    }

    #[test]
    fn tally_labels() {
        let c = ClassCounts::from_labels(&[Label::Enrolled, Label::NotEnrolled, Label::NotEnrolled]);
        assert_eq!(c, counts(2, 1));
        assert_eq!(c.total(), 3);
        assert_eq!(c.as_array(), [2, 1]);
    }

    #[test]
    fn shares_and_ratio() {
        let c = counts(7, 3);
        assert!((c.minority_share() - 0.3).abs() < 1e-12);
        assert!((c.imbalance_ratio() - 7.0 / 3.0).abs() < 1e-12);
        assert!(counts(4, 0).imbalance_ratio().is_infinite());
    }

    #[test]
    fn chart_scales_to_larger_class() {
        let text = counts(80, 20).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].matches('#').count(), BAR_WIDTH);
        assert_eq!(lines[1].matches('#').count(), BAR_WIDTH / 4);
        assert!(lines[0].starts_with("0 |"));
        assert!(lines[1].contains("20.0%"));
    }
}
