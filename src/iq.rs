// src/iq.rs

use crate::constants::*;
use crate::models::IqTestResult;
use serde::Serialize;

pub fn iq_score(correct_count: u32) -> u32 {
    IQ_BASE_SCORE.saturating_add(correct_count.saturating_mul(IQ_POINTS_PER_CORRECT))
}

/// Share of the population scoring at or below `score`, in percent.
pub fn percentile(score: u32) -> f64 {
    let z = (score as f64 - IQ_MEAN) / IQ_STD_DEV;
    normal_cdf(z) * 100.0
}

pub fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// Abramowitz & Stegun 7.1.26, absolute error below 1.5e-7.
pub fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

pub fn classify(score: u32) -> &'static str {
    match score {
        130.. => "Very Superior",
        120..=129 => "Superior",
        110..=119 => "High Average",
        90..=109 => "Average",
        80..=89 => "Low Average",
        70..=79 => "Borderline",
        _ => "Extremely Low",
    }
}

/// Aggregate view over the IQ results ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IqSummary {
    pub tests_completed: u32,
    pub high_score: u32,
    pub average_score: f64,
    pub latest_score: Option<u32>,
}

impl IqSummary {
    pub fn from_results(results: &[IqTestResult]) -> Self {
        if results.is_empty() {
            return IqSummary::default();
        }
        let total: u64 = results.iter().map(|r| r.score as u64).sum();
        IqSummary {
            tests_completed: results.len() as u32,
            high_score: results.iter().map(|r| r.score).max().unwrap_or(0),
            average_score: total as f64 / results.len() as f64,
            latest_score: results.last().map(|r| r.score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_score_formula() {
        assert_eq!(iq_score(0), 100);
        assert_eq!(iq_score(10), 130);
    }

    #[test]
    fn test_percentile_at_two_sigma() {
        let p = percentile(130);
        assert!((p - 97.725).abs() < 0.01, "got {}", p);
    }

    #[test]
    fn test_percentile_symmetry() {
        assert!((percentile(100) - 50.0).abs() < 1e-6);
        assert!((percentile(85) + percentile(115) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_classification_bands() {
        assert_eq!(classify(130), "Very Superior");
        assert_eq!(classify(129), "Superior");
        assert_eq!(classify(100), "Average");
        assert_eq!(classify(69), "Extremely Low");
    }

    #[test]
    fn test_summary() {
        let mk = |score| IqTestResult {
            score,
            taken_at: Utc::now(),
            category: IQ_DEFAULT_CATEGORY.to_string(),
            percentile: percentile(score),
        };
        let summary = IqSummary::from_results(&[mk(115), mk(124), mk(106)]);
        assert_eq!(summary.tests_completed, 3);
        assert_eq!(summary.high_score, 124);
        assert_eq!(summary.latest_score, Some(106));
        assert!((summary.average_score - 115.0).abs() < 1e-9);
    }
}
