//! End-to-end behaviour of the composer against scripted collaborators.
//!
//! Every test runs on a paused clock: awaiting the next event advances time
//! straight to the next due timer, so debounce windows and response delays
//! are exact.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tradegrader_compose::autocomplete::AutocompleteState;
use tradegrader_compose::composer::Composer;
use tradegrader_compose::config::ComposerConfig;
use tradegrader_compose::error::{ComposeError, SubmissionError, ValidationError};
use tradegrader_compose::events::UserAction;
use tradegrader_compose::submission::SubmissionPhase;
use tradegrader_compose::view::ComposerView;
use tradegrader_core::error::{ServiceError, ServiceErrorKind};
use tradegrader_core::model::{
    AnalysisResult, Grade, Player, Recommendation, Side, TradeRequest,
};
use tradegrader_core::ports::{GradingClient, SearchClient};
use tradegrader_test_support::{RecordingGradingClient, ScriptedSearchClient};

fn good_result() -> AnalysisResult {
    AnalysisResult {
        score: 82,
        grade: Grade::Good,
        analysis: "Strong upgrade at QB.".to_owned(),
        trade_id: 7,
    }
}

fn composer_with(
    search: &Arc<ScriptedSearchClient>,
    grading: &Arc<RecordingGradingClient>,
) -> Composer {
    let search: Arc<dyn SearchClient> = search.clone();
    let grading: Arc<dyn GradingClient> = grading.clone();
    Composer::new(&ComposerConfig::default(), search, grading)
}

async fn pump(composer: &mut Composer) {
    let event = composer.next_event().await.unwrap();
    composer.handle_event(event);
}

fn input(side: Side, index: usize, text: &str) -> UserAction {
    UserAction::Input {
        side,
        index,
        text: text.to_owned(),
    }
}

fn update(side: Side, index: usize, text: &str) -> UserAction {
    UserAction::Update {
        side,
        index,
        text: text.to_owned(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_rapid_typing_issues_exactly_one_search() {
    // Arrange
    let mahomes = Player::new("Patrick Mahomes", "KC", "QB");
    let search = Arc::new(ScriptedSearchClient::new().respond("Mahomes", vec![mahomes.clone()]));
    let grading = Arc::new(RecordingGradingClient::new(Ok(good_result())));
    let mut composer = composer_with(&search, &grading);

    // Act
    for prefix in ["M", "Ma", "Mah", "Maho", "Mahom", "Mahome", "Mahomes"] {
        composer.apply(input(Side::Incoming, 0, prefix)).unwrap();
        tokio::time::advance(Duration::from_millis(100)).await;
    }
    pump(&mut composer).await;
    pump(&mut composer).await;

    // Assert
    assert_eq!(search.queries(), vec!["Mahomes".to_owned()]);
    let view = composer.view();
    assert_eq!(view.incoming[0].state, AutocompleteState::ShowingResults);
    assert_eq!(view.incoming[0].suggestions, vec![mahomes]);
}

#[tokio::test(start_paused = true)]
async fn test_selecting_a_suggestion_commits_display_string() {
    // Arrange
    let mahomes = Player::new("Patrick Mahomes", "KC", "QB");
    let search = Arc::new(ScriptedSearchClient::new().respond("Mahomes", vec![mahomes.clone()]));
    let grading = Arc::new(RecordingGradingClient::new(Ok(good_result())));
    let mut composer = composer_with(&search, &grading);
    composer.apply(input(Side::Incoming, 0, "Mahomes")).unwrap();
    pump(&mut composer).await;
    pump(&mut composer).await;

    // Act
    composer
        .apply(UserAction::Select {
            side: Side::Incoming,
            index: 0,
            suggestion: mahomes,
        })
        .unwrap();

    // Assert
    let view = composer.view();
    assert_eq!(view.incoming_texts(), vec!["Patrick Mahomes (KC - QB)"]);
    assert_eq!(view.incoming[0].state, AutocompleteState::Closed);
    assert!(view.incoming[0].suggestions.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_out_of_order_responses_keep_latest_results() {
    // Arrange
    let ma = vec![
        Player::new("Patrick Mahomes", "KC", "QB"),
        Player::new("Mark Andrews", "BAL", "TE"),
    ];
    let mahomes = vec![Player::new("Patrick Mahomes", "KC", "QB")];
    let search = Arc::new(
        ScriptedSearchClient::new()
            .respond_after("Ma", Duration::from_millis(500), ma)
            .respond_after("Mahomes", Duration::from_millis(50), mahomes.clone()),
    );
    let grading = Arc::new(RecordingGradingClient::new(Ok(good_result())));
    let mut composer = composer_with(&search, &grading);

    // Act
    composer.apply(input(Side::Incoming, 0, "Ma")).unwrap();
    pump(&mut composer).await;
    composer.apply(input(Side::Incoming, 0, "Mahomes")).unwrap();
    pump(&mut composer).await;
    pump(&mut composer).await;
    let after_latest = composer.view();
    pump(&mut composer).await;

    // Assert
    assert_eq!(search.queries(), vec!["Ma".to_owned(), "Mahomes".to_owned()]);
    assert_eq!(after_latest.incoming[0].suggestions, mahomes);
    let view = composer.view();
    assert_eq!(view.incoming[0].state, AutocompleteState::ShowingResults);
    assert_eq!(view.incoming[0].suggestions, mahomes);
    assert_eq!(view.incoming[0].text, "Mahomes");
}

#[tokio::test(start_paused = true)]
async fn test_dismissal_suppresses_late_response() {
    // Arrange
    let search = Arc::new(ScriptedSearchClient::new().respond_after(
        "Kel",
        Duration::from_millis(200),
        vec![Player::new("Travis Kelce", "KC", "TE")],
    ));
    let grading = Arc::new(RecordingGradingClient::new(Ok(good_result())));
    let mut composer = composer_with(&search, &grading);
    composer.apply(input(Side::Outgoing, 0, "Kel")).unwrap();
    pump(&mut composer).await;
    assert_eq!(composer.view().outgoing[0].state, AutocompleteState::Searching);

    // Act
    composer
        .apply(UserAction::Dismiss {
            side: Side::Outgoing,
            index: 0,
        })
        .unwrap();
    pump(&mut composer).await;

    // Assert
    let view = composer.view();
    assert_eq!(view.outgoing[0].state, AutocompleteState::Closed);
    assert_eq!(view.outgoing[0].text, "Kel");
    assert!(view.outgoing[0].suggestions.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_search_failure_is_shown_inline() {
    let search = Arc::new(ScriptedSearchClient::new().fail_after(
        "Zzz",
        Duration::ZERO,
        "Error: service unavailable",
    ));
    let grading = Arc::new(RecordingGradingClient::new(Ok(good_result())));
    let mut composer = composer_with(&search, &grading);

    composer.apply(input(Side::Incoming, 0, "Zzz")).unwrap();
    pump(&mut composer).await;
    pump(&mut composer).await;

    let view = composer.view();
    assert_eq!(view.incoming[0].state, AutocompleteState::Error);
    assert_eq!(
        view.incoming[0].error.as_deref(),
        Some("Error: service unavailable")
    );
    assert!(view.incoming[0].suggestions.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_erasing_text_never_searches() {
    let search = Arc::new(ScriptedSearchClient::new());
    let grading = Arc::new(RecordingGradingClient::new(Ok(good_result())));
    let mut composer = composer_with(&search, &grading);

    composer.apply(input(Side::Incoming, 0, "K")).unwrap();
    composer.apply(input(Side::Incoming, 0, "")).unwrap();
    pump(&mut composer).await;

    assert!(search.queries().is_empty());
    assert_eq!(composer.view().incoming[0].state, AutocompleteState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_removing_first_slot_keeps_second_value() {
    // Arrange
    let search = Arc::new(ScriptedSearchClient::new());
    let grading = Arc::new(RecordingGradingClient::new(Ok(good_result())));
    let mut composer = composer_with(&search, &grading);
    composer.apply(update(Side::Incoming, 0, "Mahomes")).unwrap();
    composer
        .apply(UserAction::AddSlot {
            side: Side::Incoming,
        })
        .unwrap();
    composer.apply(update(Side::Incoming, 1, "Kelce")).unwrap();

    // Act
    composer
        .apply(UserAction::Remove {
            side: Side::Incoming,
            index: 0,
        })
        .unwrap();

    // Assert
    let view = composer.view();
    assert_eq!(view.incoming_texts(), vec!["Kelce"]);
    assert_eq!(view.incoming[0].index, 0);
}

#[tokio::test(start_paused = true)]
async fn test_removing_only_slot_leaves_one_empty_slot() {
    let search = Arc::new(ScriptedSearchClient::new());
    let grading = Arc::new(RecordingGradingClient::new(Ok(good_result())));
    let mut composer = composer_with(&search, &grading);
    composer.apply(update(Side::Outgoing, 0, "Kelce")).unwrap();

    composer
        .apply(UserAction::Remove {
            side: Side::Outgoing,
            index: 0,
        })
        .unwrap();

    assert_eq!(composer.view().outgoing_texts(), vec![""]);
}

#[tokio::test(start_paused = true)]
async fn test_validation_failure_makes_no_network_call() {
    // Arrange
    let search = Arc::new(ScriptedSearchClient::new());
    let grading = Arc::new(RecordingGradingClient::new(Ok(good_result())));
    let mut composer = composer_with(&search, &grading);
    composer.apply(update(Side::Incoming, 0, "Mahomes")).unwrap();
    composer.apply(update(Side::Outgoing, 0, "   ")).unwrap();

    // Act
    let err = composer.apply(UserAction::Submit).unwrap_err();

    // Assert
    let expected = SubmissionError::Validation(ValidationError {
        empty_sides: vec![Side::Outgoing],
    });
    assert_eq!(err, ComposeError::Submission(expected.clone()));
    assert_eq!(
        err.to_string(),
        "Please enter at least one player on each side of the trade"
    );
    tokio::task::yield_now().await;
    assert!(grading.requests().is_empty());
    let view = composer.view();
    assert_eq!(view.submission, SubmissionPhase::Failed(expected));
    assert!(!view.loading);
}

#[tokio::test(start_paused = true)]
async fn test_successful_submission_stores_result_exactly() {
    // Arrange
    let search = Arc::new(ScriptedSearchClient::new());
    let grading = Arc::new(
        RecordingGradingClient::new(Ok(good_result())).with_delay(Duration::from_secs(2)),
    );
    let mut composer = composer_with(&search, &grading);
    composer
        .apply(update(Side::Incoming, 0, "Patrick Mahomes (KC - QB)"))
        .unwrap();
    composer
        .apply(UserAction::AddSlot {
            side: Side::Incoming,
        })
        .unwrap();
    composer
        .apply(update(Side::Outgoing, 0, "Justin Jefferson (MIN - WR)"))
        .unwrap();

    // Act
    composer.apply(UserAction::Submit).unwrap();
    let while_loading = composer.view();
    let second = composer.apply(UserAction::Submit);
    pump(&mut composer).await;

    // Assert
    assert!(while_loading.loading);
    assert_eq!(
        second,
        Err(ComposeError::Submission(SubmissionError::InFlight))
    );
    assert_eq!(
        grading.requests(),
        vec![TradeRequest {
            incoming_players: vec!["Patrick Mahomes (KC - QB)".to_owned()],
            outgoing_players: vec!["Justin Jefferson (MIN - WR)".to_owned()],
        }]
    );
    let view = composer.view();
    assert!(!view.loading);
    assert_eq!(view.submission, SubmissionPhase::Success);
    assert_eq!(view.result, Some(good_result()));
    assert_eq!(view.recommendation, Some(Recommendation::Recommended));
}

#[tokio::test(start_paused = true)]
async fn test_failed_resubmission_clears_previous_result() {
    // Arrange
    let search = Arc::new(ScriptedSearchClient::new());
    let grading = Arc::new(RecordingGradingClient::with_responses(vec![
        Ok(good_result()),
        Err(ServiceError::new(
            ServiceErrorKind::Status(500),
            "Failed to analyze trade. Please try again.",
        )),
    ]));
    let mut composer = composer_with(&search, &grading);
    composer.apply(update(Side::Incoming, 0, "A")).unwrap();
    composer.apply(update(Side::Outgoing, 0, "B")).unwrap();
    composer.apply(UserAction::Submit).unwrap();
    pump(&mut composer).await;
    assert_eq!(composer.view().result, Some(good_result()));

    // Act
    composer.apply(UserAction::Submit).unwrap();
    assert_eq!(composer.view().result, None);
    pump(&mut composer).await;

    // Assert
    let view = composer.view();
    assert_eq!(view.result, None);
    assert_eq!(view.recommendation, None);
    match view.submission {
        SubmissionPhase::Failed(SubmissionError::Service(error)) => {
            assert_eq!(error.kind, ServiceErrorKind::Status(500));
            assert_eq!(error.message, "Failed to analyze trade. Please try again.");
        }
        other => panic!("expected a service failure, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_run_loop_publishes_views_until_actions_close() {
    // Arrange
    let kelce = Player::new("Travis Kelce", "KC", "TE");
    let search = Arc::new(ScriptedSearchClient::new().respond("Kelce", vec![kelce.clone()]));
    let grading = Arc::new(RecordingGradingClient::new(Ok(good_result())));
    let composer = composer_with(&search, &grading);
    let (actions_tx, actions_rx) = mpsc::unbounded_channel();
    let (views_tx, mut views_rx) = watch::channel(ComposerView {
        incoming: Vec::new(),
        outgoing: Vec::new(),
        submission: SubmissionPhase::Idle,
        result: None,
        recommendation: None,
        loading: false,
    });
    let handle = tokio::spawn(composer.run(actions_rx, views_tx));

    // Act
    actions_tx.send(input(Side::Outgoing, 0, "Kelce")).unwrap();
    let showing = views_rx
        .wait_for(|view| {
            view.outgoing
                .first()
                .is_some_and(|slot| slot.state == AutocompleteState::ShowingResults)
        })
        .await
        .unwrap()
        .clone();

    actions_tx
        .send(UserAction::Select {
            side: Side::Outgoing,
            index: 0,
            suggestion: kelce.clone(),
        })
        .unwrap();
    actions_tx.send(update(Side::Incoming, 0, "Mahomes")).unwrap();
    actions_tx.send(UserAction::Submit).unwrap();
    let graded = views_rx
        .wait_for(|view| view.submission == SubmissionPhase::Success)
        .await
        .unwrap()
        .clone();

    drop(actions_tx);
    handle.await.unwrap();

    // Assert
    assert_eq!(showing.outgoing[0].suggestions, vec![kelce]);
    assert_eq!(graded.outgoing_texts(), vec!["Travis Kelce (KC - TE)"]);
    assert_eq!(graded.result, Some(good_result()));
    assert_eq!(search.queries(), vec!["Kelce".to_owned()]);
}
