use super::verdict::{Outcome, Verdict};
use crate::core::vision::{catalog, RankedLabel, StabilityInfo};

pub const ACCEPT_THRESHOLD: f64 = 0.5;
pub const TENTATIVE_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Accepted,
    Tentative,
    Rejected,
}

/// Total over every `(label, confidence)` pair; NaN falls through to `Rejected`.
pub fn tier_for(label: Option<&str>, confidence: f64) -> Tier {
    match label {
        Some(_) if confidence >= ACCEPT_THRESHOLD => Tier::Accepted,
        Some(_) if confidence >= TENTATIVE_THRESHOLD => Tier::Tentative,
        _ => Tier::Rejected,
    }
}

/// Turns a raw classification into a user-facing verdict.
#[derive(Debug, Clone, Copy)]
pub struct DecisionPolicy {
    min_confidence: f64,
}

impl DecisionPolicy {
    /// Labels scored below `min_confidence` are treated as no label at all.
    pub fn new(min_confidence: f64) -> Self {
        Self { min_confidence }
    }

    pub fn decide(
        &self,
        label: Option<&str>,
        confidence: f64,
        top_k: Vec<RankedLabel>,
        stability: &StabilityInfo,
    ) -> Verdict {
        let raw_label = label;
        let label = label.filter(|_| confidence >= self.min_confidence);

        match (tier_for(label, confidence), label) {
            (Tier::Accepted, Some(letter)) => {
                let info = catalog::describe(letter);
                Verdict {
                    success: true,
                    label: Some(letter.to_string()),
                    gesture: Some(letter.to_string()),
                    confidence,
                    description: Some(info.description),
                    category: Some(info.category),
                    top_predictions: top_k,
                    stability_info: Some(stability.clone()),
                    ..Verdict::base(Outcome::Accepted, format!("Letter {} recognized", letter))
                }
            }
            (Tier::Tentative, Some(letter)) => {
                let info = catalog::describe(letter);
                Verdict {
                    label: Some(letter.to_string()),
                    confidence,
                    description: Some(info.description),
                    category: Some(info.category),
                    top_predictions: top_k,
                    stability_info: Some(stability.clone()),
                    suggestions: tentative_suggestions(letter),
                    ..Verdict::base(
                        Outcome::Tentative,
                        format!("Detected {}, hold the position ({})", letter, stability.message),
                    )
                }
            }
            _ => Verdict {
                confidence: if raw_label.is_some() { confidence } else { 0.0 },
                top_predictions: top_k,
                stability_info: Some(stability.clone()),
                suggestions: rejected_suggestions(),
                ..Verdict::base(Outcome::Rejected, "Could not recognize the letter clearly")
            },
        }
    }
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self::new(TENTATIVE_THRESHOLD)
    }
}

fn tentative_suggestions(letter: &str) -> Vec<String> {
    vec![
        format!("Hold letter {} steady for 2-3 seconds", letter),
        "Form the letter clearly".to_string(),
        "Keep the lighting even".to_string(),
    ]
}

fn rejected_suggestions() -> Vec<String> {
    vec![
        "Form a clear letter of the ASL alphabet".to_string(),
        "Hold the position for a moment".to_string(),
        "Check your finger placement".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decide(label: Option<&str>, confidence: f64) -> Verdict {
        DecisionPolicy::default().decide(label, confidence, Vec::new(), &StabilityInfo::default())
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier_for(Some("A"), 0.5), Tier::Accepted);
        assert_eq!(tier_for(Some("A"), 0.499), Tier::Tentative);
        assert_eq!(tier_for(Some("A"), 0.3), Tier::Tentative);
        assert_eq!(tier_for(Some("A"), 0.299), Tier::Rejected);
        assert_eq!(tier_for(None, 0.99), Tier::Rejected);
        assert_eq!(tier_for(Some("A"), f64::NAN), Tier::Rejected);
    }

    #[test]
    fn test_tiers_are_total_and_disjoint() {
        for step in 0..=1000 {
            let confidence = step as f64 / 1000.0;
            for label in [Some("K"), None] {
                let verdict = decide(label, confidence);
                let expected = match tier_for(label, confidence) {
                    Tier::Accepted => Outcome::Accepted,
                    Tier::Tentative => Outcome::Tentative,
                    Tier::Rejected => Outcome::Rejected,
                };
                assert_eq!(verdict.outcome, expected);
                assert_eq!(verdict.success, expected == Outcome::Accepted);
            }
        }
    }

    #[test]
    fn test_accepted_carries_letter_metadata() {
        let top = vec![RankedLabel {
            letter: "A".to_string(),
            confidence: 0.92,
        }];
        let verdict = DecisionPolicy::default().decide(Some("A"), 0.92, top, &StabilityInfo::default());

        assert!(verdict.success);
        assert_eq!(verdict.label.as_deref(), Some("A"));
        assert_eq!(verdict.gesture.as_deref(), Some("A"));
        assert_eq!(verdict.confidence, 0.92);
        assert_eq!(verdict.category.as_deref(), Some(catalog::ASL_CATEGORY));
        assert_eq!(verdict.top_predictions.len(), 1);
        assert!(verdict.stability_info.unwrap().stable);
    }

    #[test]
    fn test_tentative_surfaces_label_without_gesture() {
        let verdict = decide(Some("B"), 0.40);
        assert!(!verdict.success);
        assert_eq!(verdict.label.as_deref(), Some("B"));
        assert!(verdict.gesture.is_none());
        assert!(verdict.suggestions[0].contains('B'));

        let shaky = StabilityInfo {
            stable: false,
            message: "Model still warming up".to_string(),
        };
        let verdict = DecisionPolicy::default().decide(Some("B"), 0.40, Vec::new(), &shaky);
        assert!(verdict.message.contains("Model still warming up"));
        assert_eq!(verdict.stability_info, Some(shaky));
    }

    #[test]
    fn test_rejected_clears_label() {
        let verdict = decide(None, 0.1);
        assert!(!verdict.success);
        assert!(verdict.label.is_none());
        assert_eq!(verdict.confidence, 0.0);
        assert_eq!(verdict.suggestions.len(), 3);

        let weak = decide(Some("C"), 0.2);
        assert!(weak.label.is_none());
        assert_eq!(weak.confidence, 0.2);
        assert_eq!(weak.stability_info, Some(StabilityInfo::default()));
    }

    #[test]
    fn test_min_confidence_masks_labels() {
        let strict = DecisionPolicy::new(0.6);
        let verdict = strict.decide(Some("D"), 0.55, Vec::new(), &StabilityInfo::default());
        assert_eq!(verdict.outcome, Outcome::Rejected);
        assert!(verdict.label.is_none());
        assert_eq!(verdict.confidence, 0.55);
    }
}
