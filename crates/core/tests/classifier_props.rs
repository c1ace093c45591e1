//! Property tests for classification and planning.

#![allow(clippy::unwrap_used)]

use lucy_core::{Intent, IntentClassifier, Planner};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_classification_is_deterministic(text in any::<String>()) {
        let classifier = IntentClassifier::new().unwrap();
        prop_assert_eq!(classifier.classify(&text), classifier.classify(&text));
    }

    #[test]
    fn test_trigger_prefix_always_wins(
        trigger in prop::sample::select(vec!["открой", "запусти", "open", "launch"]),
        rest in "[a-z ]{0,20}",
    ) {
        let classifier = IntentClassifier::new().unwrap();
        let text = format!("{} {}", trigger, rest);
        prop_assert_eq!(classifier.classify(&text), Intent::OpenApplication);
    }

    #[test]
    fn test_basic_planning_never_panics(text in any::<String>()) {
        let classifier = IntentClassifier::new().unwrap();
        let planner = Planner::new().unwrap();
        let intent = classifier.classify(&text);
        let plan = planner.basic_plan(&text, intent, None);
        prop_assert!(plan.steps.len() <= 1);
    }
}
