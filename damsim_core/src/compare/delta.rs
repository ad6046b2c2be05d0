//! Base-vs-comp differences of the final figures

use crate::formula::{DamageResult, Figure};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeltaSign {
    Gain,
    Loss,
    Even,
}

/// Difference of one final figure, comp minus base
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultDelta {
    pub base: u64,
    pub comp: u64,
    /// Saturates at the `i64` bounds
    pub diff: i64,
    /// Relative to `max(1, base)`
    pub pct: f64,
}

impl ResultDelta {
    pub fn new(base: u64, comp: u64) -> Self {
        // u64 figures can differ by more than i64 holds
        let wide = i128::from(comp) - i128::from(base);
        let diff = wide.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;
        let pct = wide as f64 / base.max(1) as f64 * 100.0;
        ResultDelta {
            base,
            comp,
            diff,
            pct,
        }
    }

    pub fn sign(&self) -> DeltaSign {
        match self.diff {
            d if d > 0 => DeltaSign::Gain,
            d if d < 0 => DeltaSign::Loss,
            _ => DeltaSign::Even,
        }
    }
}

impl fmt::Display for ResultDelta {
    /// `+1234 (+12%)`, `−50 (−3%)` or `±0 (0%)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, pct_sign) = match self.sign() {
            DeltaSign::Gain => ("+", "+"),
            DeltaSign::Loss => ("−", "−"),
            DeltaSign::Even => ("±", ""),
        };
        write!(
            f,
            "{}{} ({}{}%)",
            sign,
            self.diff.unsigned_abs(),
            pct_sign,
            self.pct.abs().round()
        )
    }
}

/// Both evaluated sides plus per-figure deltas
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub base: DamageResult,
    pub comp: DamageResult,
}

impl Comparison {
    pub fn new(base: DamageResult, comp: DamageResult) -> Self {
        Comparison { base, comp }
    }

    pub fn delta(&self, figure: Figure) -> ResultDelta {
        ResultDelta::new(self.base.figure(figure), self.comp.figure(figure))
    }

    /// Deltas in display order
    pub fn deltas(&self) -> [(Figure, ResultDelta); 3] {
        [Figure::NoCrit, Figure::Expected, Figure::OnCrit].map(|f| (f, self.delta(f)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_gain() {
        let d = ResultDelta::new(5000, 5500);
        assert_eq!(d.diff, 500);
        assert!((d.pct - 10.0).abs() < f64::EPSILON);
        assert_eq!(d.sign(), DeltaSign::Gain);
        assert_eq!(d.to_string(), "+500 (+10%)");
    }

    #[test]
    fn test_delta_loss_and_even() {
        let d = ResultDelta::new(2000, 1500);
        assert_eq!(d.sign(), DeltaSign::Loss);
        assert_eq!(d.to_string(), "−500 (−25%)");

        let d = ResultDelta::new(42, 42);
        assert_eq!(d.sign(), DeltaSign::Even);
        assert_eq!(d.to_string(), "±0 (0%)");
    }

    #[test]
    fn test_delta_zero_base() {
        let d = ResultDelta::new(0, 3);
        assert!((d.pct - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_delta_saturates_on_huge_figures() {
        let d = ResultDelta::new(0, 1 << 63);
        assert_eq!(d.diff, i64::MAX);
        assert_eq!(d.sign(), DeltaSign::Gain);

        let d = ResultDelta::new(u64::MAX, 5000);
        assert_eq!(d.diff, i64::MIN);
        assert_eq!(d.sign(), DeltaSign::Loss);
        assert!(d.pct < -99.0);
    }

    #[test]
    fn test_comparison_against_huge_attack() {
        use crate::formula::evaluate;
        use crate::snapshot::ParameterSnapshot;
        use crate::types::InputMode;

        let base = ParameterSnapshot::with_mode(InputMode::Gear);
        let mut comp = base.clone();
        comp.base_atk = 1e20;
        let cmp = Comparison::new(evaluate(&base), evaluate(&comp));
        assert_eq!(cmp.comp.no_crit, u64::MAX);
        for (_, delta) in cmp.deltas() {
            assert_eq!(delta.sign(), DeltaSign::Gain);
            assert_eq!(delta.diff, i64::MAX);
        }
    }
}
