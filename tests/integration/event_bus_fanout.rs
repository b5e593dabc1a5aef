use std::sync::Arc;
use repo_organizer::enums::event_kind::EventKind;
use repo_organizer::enums::priority::Priority;
use repo_organizer::enums::recommended_action::RecommendedAction;
use repo_organizer::errors::OrganizerError;
use repo_organizer::services::action_recommendation_engine::ActionRecommendationEngine;
use repo_organizer::services::event_bus::{EventBus, FnHandler};
use repo_organizer::structs::domain_event::DomainEvent;
use repo_organizer::structs::recommendation::Recommendation;
use repo_organizer::structs::repository::Repository;
use super::support::{analysis, RecordingHandler};

#[tokio::test]
async fn test_immediate_and_deferred_handlers_all_complete() {
    let bus = EventBus::new();
    let handlers = [
        RecordingHandler::new("first", false),
        RecordingHandler::new("second", false),
        RecordingHandler::new("audit", true),
        RecordingHandler::new("metrics", true),
    ];
    for handler in &handlers {
        assert!(bus.register(EventKind::AnalysisError, handler.clone()));
    }

    bus.dispatch(&DomainEvent::analysis_error("api", "timeout")).await.unwrap();

    for handler in &handlers {
        assert_eq!(handler.count(EventKind::AnalysisError), 1);
    }
    assert_eq!(bus.dispatched_count(), 1);
}

#[tokio::test]
async fn test_failing_handler_does_not_starve_the_rest() {
    let bus = EventBus::new();
    let failing = FnHandler::immediate("broken", |_: &DomainEvent| {
        Err(OrganizerError::io_error("append", "disk full"))
    });
    let recorder = RecordingHandler::new("after", true);
    bus.register(EventKind::Any, Arc::new(failing));
    bus.register(EventKind::Any, recorder.clone());

    let error = bus
        .dispatch(&DomainEvent::analysis_error("api", "timeout"))
        .await
        .unwrap_err();

    assert!(matches!(error, OrganizerError::EventHandler { .. }));
    assert_eq!(recorder.count(EventKind::AnalysisError), 1);
}

#[tokio::test]
async fn test_engine_publishes_one_event_per_high_priority_issue() {
    let bus = Arc::new(EventBus::new());
    let recorder = RecordingHandler::new("recorder", false);
    bus.register(EventKind::Any, recorder.clone());
    let engine = ActionRecommendationEngine::new(Arc::clone(&bus));

    let mut result = analysis("api", "high");
    result.recommendations = vec![
        Recommendation::new("Add CI", "No checks", Priority::High),
        Recommendation::new("Pin deps", "Drift", Priority::High),
        Recommendation::new("Badge", "Cosmetic", Priority::Low),
    ];

    let report = engine.recommend(&Repository::new("api"), Arc::new(result)).await.unwrap();

    assert_eq!(report.recommended_action, RecommendedAction::Pin);
    assert_eq!(recorder.count(EventKind::RepositoryActionRecommended), 1);
    assert_eq!(recorder.count(EventKind::HighPriorityIssueIdentified), 2);
}
