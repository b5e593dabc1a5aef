use std::collections::BTreeMap;
use std::sync::Arc;
use crate::enums::activity_level::ActivityLevel;
use crate::enums::recommended_action::RecommendedAction;
use crate::enums::value_level::ValueLevel;
use crate::errors::OrganizerResult;
use crate::services::event_bus::EventBus;
use crate::structs::analysis_result::AnalysisResult;
use crate::structs::domain_event::DomainEvent;
use crate::structs::recommended_analysis::RecommendedAnalysis;
use crate::structs::repository::Repository;

/// Maps an analysis onto DELETE/ARCHIVE/EXTRACT/KEEP/PIN and announces the decision.
pub struct ActionRecommendationEngine {
    event_bus: Arc<EventBus>,
}

impl ActionRecommendationEngine {
    pub fn new(event_bus: Arc<EventBus>) -> Self {
        Self { event_bus }
    }

    /// Decides the action, then dispatches `RepositoryActionRecommended` followed by one
    /// `HighPriorityIssueIdentified` per high-priority recommendation.
    pub async fn recommend(
        &self,
        repository: &Repository,
        analysis: Arc<AnalysisResult>,
    ) -> OrganizerResult<RecommendedAnalysis> {
        let (action, reasoning) = Self::decide(repository, &analysis);
        log::debug!("{}: recommending {action}", repository.name);

        self.event_bus
            .dispatch(&DomainEvent::action_recommended(&repository.name, action, &reasoning))
            .await?;

        for issue in analysis.recommendations.iter().filter(|r| r.is_high_priority()) {
            self.event_bus
                .dispatch(&DomainEvent::high_priority_issue(&repository.name, issue.clone()))
                .await?;
        }

        Ok(RecommendedAnalysis::new(analysis, action, reasoning))
    }

    pub fn decide(repository: &Repository, analysis: &AnalysisResult) -> (RecommendedAction, String) {
        let activity = analysis.activity_level();
        let value = analysis.value_level();

        let mut action = if analysis.recommended_action == RecommendedAction::Keep {
            Self::apply_rules(analysis, activity, value)
        } else {
            analysis.recommended_action
        };

        if repository.is_archived {
            action = if value == ValueLevel::Low {
                RecommendedAction::Delete
            } else {
                RecommendedAction::Archive
            };
        }

        let reasoning = if analysis.has_custom_reasoning() {
            analysis.action_reasoning.clone()
        } else {
            Self::reasoning_for(action, activity, value)
        };

        (action, reasoning)
    }

    fn apply_rules(analysis: &AnalysisResult, activity: ActivityLevel, value: ValueLevel) -> RecommendedAction {
        let mut action = match (activity, value) {
            (ActivityLevel::Inactive, ValueLevel::Low) => RecommendedAction::Delete,
            (ActivityLevel::Inactive, _) | (ActivityLevel::Low, ValueLevel::Low) => RecommendedAction::Archive,
            (ActivityLevel::Low, ValueLevel::High) if Self::suggests_extraction(analysis) => {
                RecommendedAction::Extract
            }
            _ => RecommendedAction::Keep,
        };

        if value == ValueLevel::High {
            match activity {
                ActivityLevel::Medium | ActivityLevel::High => action = RecommendedAction::Pin,
                ActivityLevel::Inactive => action = RecommendedAction::Archive,
                ActivityLevel::Low => {}
            }
        }

        action
    }

    fn suggests_extraction(analysis: &AnalysisResult) -> bool {
        analysis
            .recommendations
            .iter()
            .any(|r| r.text.to_lowercase().contains("extract"))
    }

    fn reasoning_for(action: RecommendedAction, activity: ActivityLevel, value: ValueLevel) -> String {
        match action {
            RecommendedAction::Delete => format!(
                "Repository has low value ({value}) and {activity} activity. \
                 No significant code or documentation worth preserving."
            ),
            RecommendedAction::Archive => format!(
                "Repository has {activity} activity but {value} value. \
                 Should be preserved for reference but not actively maintained."
            ),
            RecommendedAction::Extract => format!(
                "Repository has valuable components that should be extracted before \
                 archiving or deleting. Value: {value}, Activity: {activity}."
            ),
            RecommendedAction::Pin => format!(
                "Repository has high value ({value}) and should be pinned for visibility. \
                 Activity level: {activity}."
            ),
            RecommendedAction::Keep => format!(
                "Repository should be kept active with its current settings. \
                 Value: {value}, Activity: {activity}."
            ),
        }
    }

    /// Groups results by their final action; every action has an entry, possibly empty.
    pub fn categorize(reports: &[RecommendedAnalysis]) -> BTreeMap<RecommendedAction, Vec<&RecommendedAnalysis>> {
        let mut categories: BTreeMap<RecommendedAction, Vec<&RecommendedAnalysis>> =
            RecommendedAction::ALL.iter().map(|a| (*a, Vec::new())).collect();

        for report in reports {
            categories.entry(report.recommended_action).or_default().push(report);
        }
        categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use proptest::prelude::*;
    use crate::enums::event_kind::EventKind;
    use crate::enums::priority::Priority;
    use crate::services::event_bus::FnHandler;
    use crate::structs::analysis_result::DEFAULT_ACTION_REASONING;
    use crate::structs::recommendation::Recommendation;

    fn analysis(activity: &str, value: &str) -> AnalysisResult {
        AnalysisResult {
            repository: "widget".to_string(),
            summary: "A widget".to_string(),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            recommendations: Vec::new(),
            activity_assessment: activity.to_string(),
            estimated_value: value.to_string(),
            tags: Default::default(),
            recommended_action: RecommendedAction::Keep,
            action_reasoning: DEFAULT_ACTION_REASONING.to_string(),
        }
    }

    fn repo(archived: bool) -> Repository {
        Repository {
            is_archived: archived,
            ..Repository::new("widget")
        }
    }

    fn action(archived: bool, analysis: &AnalysisResult) -> RecommendedAction {
        ActionRecommendationEngine::decide(&repo(archived), analysis).0
    }

    #[test]
    fn test_decision_matrix() {
        assert_eq!(action(false, &analysis("inactive", "low")), RecommendedAction::Delete);
        assert_eq!(action(false, &analysis("inactive", "high")), RecommendedAction::Archive);
        assert_eq!(action(false, &analysis("inactive", "medium")), RecommendedAction::Archive);
        assert_eq!(action(false, &analysis("low", "low")), RecommendedAction::Archive);
        assert_eq!(action(false, &analysis("low", "high")), RecommendedAction::Keep);
        assert_eq!(action(false, &analysis("medium", "high")), RecommendedAction::Pin);
        assert_eq!(action(false, &analysis("high", "high")), RecommendedAction::Pin);
        assert_eq!(action(false, &analysis("high", "low")), RecommendedAction::Keep);
        assert_eq!(action(false, &analysis("medium", "medium")), RecommendedAction::Keep);
    }

    #[test]
    fn test_low_activity_high_value_extracts_when_suggested() {
        let mut result = analysis("low", "high");
        result.recommendations.push(Recommendation::new(
            "Extract the parser into its own crate",
            "It is reusable",
            Priority::Medium,
        ));

        assert_eq!(action(false, &result), RecommendedAction::Extract);
    }

    #[test]
    fn test_archived_flag_overrides_everything() {
        assert_eq!(action(true, &analysis("high", "high")), RecommendedAction::Archive);
        assert_eq!(action(true, &analysis("inactive", "low")), RecommendedAction::Delete);

        let mut pinned = analysis("high", "low");
        pinned.recommended_action = RecommendedAction::Pin;
        assert_eq!(action(true, &pinned), RecommendedAction::Delete);
    }

    #[test]
    fn test_explicit_action_is_honored() {
        let mut result = analysis("inactive", "low");
        result.recommended_action = RecommendedAction::Extract;

        assert_eq!(action(false, &result), RecommendedAction::Extract);
    }

    #[test]
    fn test_reasoning_prefers_analyzer_text() {
        let mut result = analysis("inactive", "low");
        let (_, templated) = ActionRecommendationEngine::decide(&repo(false), &result);
        assert!(templated.starts_with("Repository has low value (low) and inactive activity"));

        result.action_reasoning = "Superseded by v2".to_string();
        let (_, supplied) = ActionRecommendationEngine::decide(&repo(false), &result);
        assert_eq!(supplied, "Superseded by v2");
    }

    #[tokio::test]
    async fn test_recommend_dispatches_action_and_high_priority_events() {
        let bus = Arc::new(EventBus::new());
        let actions = Arc::new(AtomicUsize::new(0));
        let issues = Arc::new(AtomicUsize::new(0));
        let (a, i) = (Arc::clone(&actions), Arc::clone(&issues));
        bus.register(
            EventKind::RepositoryActionRecommended,
            Arc::new(FnHandler::immediate("actions", move |_: &DomainEvent| {
                a.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })),
        );
        bus.register(
            EventKind::HighPriorityIssueIdentified,
            Arc::new(FnHandler::deferred("issues", move |_: &DomainEvent| {
                i.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })),
        );

        let mut result = analysis("high", "high");
        result.recommendations = vec![
            Recommendation::new("Add CI", "No tests run", Priority::High),
            Recommendation::new("Fix typo", "README", Priority::Low),
            Recommendation::new("Security audit", "Old deps", Priority::High),
        ];

        let engine = ActionRecommendationEngine::new(bus);
        let report = engine.recommend(&repo(false), Arc::new(result)).await.unwrap();

        assert_eq!(report.recommended_action, RecommendedAction::Pin);
        assert_eq!(report.repository(), "widget");
        assert_eq!(actions.load(Ordering::SeqCst), 1);
        assert_eq!(issues.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_categorize_lists_every_action() {
        let keep = RecommendedAnalysis::new(
            Arc::new(analysis("medium", "medium")),
            RecommendedAction::Keep,
            "fine".to_string(),
        );
        let reports = vec![keep.clone(), keep];

        let categories = ActionRecommendationEngine::categorize(&reports);

        assert_eq!(categories.len(), RecommendedAction::ALL.len());
        assert_eq!(categories[&RecommendedAction::Keep].len(), 2);
        assert!(categories[&RecommendedAction::Delete].is_empty());
    }

    fn label() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("high".to_string()),
            Just("medium".to_string()),
            Just("low".to_string()),
            Just("inactive".to_string()),
            ".*",
        ]
    }

    fn any_action() -> impl Strategy<Value = RecommendedAction> {
        prop::sample::select(RecommendedAction::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_archived_repositories_end_archived_or_deleted(
            activity in label(),
            value in label(),
            explicit in any_action(),
        ) {
            let mut result = analysis(&activity, &value);
            result.recommended_action = explicit;

            let decided = action(true, &result);

            if result.value_level() == ValueLevel::Low {
                prop_assert_eq!(decided, RecommendedAction::Delete);
            } else {
                prop_assert_eq!(decided, RecommendedAction::Archive);
            }
        }

        #[test]
        fn prop_reasoning_is_never_empty(activity in label(), value in label(), archived in any::<bool>()) {
            let (_, reasoning) = ActionRecommendationEngine::decide(&repo(archived), &analysis(&activity, &value));

            prop_assert!(!reasoning.trim().is_empty());
        }
    }
}
