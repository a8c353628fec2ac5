use crate::council::domain::{
    AnomalyAssessment, AnomalyReason, LoanApplication, SimilarityMatch, TrackedFeature,
};

use super::config::AnomalyThresholds;

const SPREAD_FLOOR: f64 = 1e-9;

/// Compare the application against its retrieved neighborhood and decide
/// whether it is statistically unlike anything on record.
///
/// Two independent triggers: a tracked feature falling outside the configured
/// multiple of the neighborhood spread, or the closest match being too
/// distant to count as precedent at all. The assessment is advisory; it never
/// rejects an application by itself.
pub(crate) fn assess(
    application: &LoanApplication,
    matches: &[SimilarityMatch],
    thresholds: &AnomalyThresholds,
) -> AnomalyAssessment {
    if matches.is_empty() {
        return AnomalyAssessment {
            flagged: true,
            severity: 1.0,
            reasons: vec![AnomalyReason::NoPrecedent],
        };
    }

    let mut reasons = Vec::new();
    let mut severity: f64 = 0.0;

    let best_distance = matches
        .iter()
        .map(|m| m.distance)
        .fold(f64::INFINITY, f64::min);
    if best_distance > thresholds.max_best_distance {
        let excess = (best_distance - thresholds.max_best_distance) / thresholds.max_best_distance;
        severity = severity.max(excess.clamp(0.0, 1.0));
        reasons.push(AnomalyReason::NoClosePrecedent {
            best_distance,
            threshold: thresholds.max_best_distance,
        });
    }

    if matches.len() >= thresholds.min_neighborhood {
        for feature in [
            TrackedFeature::DtiRatio,
            TrackedFeature::CreditScore,
            TrackedFeature::Amount,
        ] {
            let value = application_feature(application, feature);
            let samples: Vec<f64> = matches
                .iter()
                .map(|m| case_feature(m, feature))
                .collect();
            let (mean, spread) = mean_and_spread(&samples);

            let deviation = (value - mean).abs();
            let outlier_severity = if spread < SPREAD_FLOOR {
                // Degenerate neighborhood: any real deviation is an outlier.
                if deviation > SPREAD_FLOOR {
                    Some(1.0)
                } else {
                    None
                }
            } else {
                let ratio = deviation / (spread * thresholds.spread_multiplier);
                if ratio > 1.0 {
                    Some((ratio - 1.0).clamp(0.0, 1.0))
                } else {
                    None
                }
            };

            if let Some(feature_severity) = outlier_severity {
                severity = severity.max(feature_severity);
                reasons.push(AnomalyReason::FeatureOutlier {
                    feature,
                    value,
                    neighborhood_mean: mean,
                    neighborhood_spread: spread,
                });
            }
        }
    }

    AnomalyAssessment {
        flagged: !reasons.is_empty(),
        severity,
        reasons,
    }
}

fn application_feature(application: &LoanApplication, feature: TrackedFeature) -> f64 {
    match feature {
        TrackedFeature::DtiRatio => application.dti_ratio(),
        TrackedFeature::CreditScore => f64::from(application.credit_score),
        TrackedFeature::Amount => application.amount,
    }
}

fn case_feature(matched: &SimilarityMatch, feature: TrackedFeature) -> f64 {
    match feature {
        TrackedFeature::DtiRatio => matched.case.dti,
        TrackedFeature::CreditScore => f64::from(matched.case.credit_score),
        TrackedFeature::Amount => matched.case.loan_amount,
    }
}

fn mean_and_spread(samples: &[f64]) -> (f64, f64) {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
