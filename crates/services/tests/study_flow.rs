//! End-to-end flow over several simulated study days: answering,
//! study-time tracking, streaks, forecasting and persistence.

use std::sync::Arc;

use chrono::Duration;

use services::study_clock::View;
use services::study_service::StudyService;
use storage::{MemoryStore, ProgressRepository};
use trainer_core::forecast::Forecast;
use trainer_core::model::{Question, QuestionBank, QuestionId};
use trainer_core::time::fixed_clock;

fn question(id: &str, section: &str) -> Question {
    Question {
        id: QuestionId::new(id),
        exam: "Test 1".to_owned(),
        section: section.to_owned(),
        teil: 1,
        number: 1,
        context: String::new(),
        question: "Was passt?".to_owned(),
        instruction: String::new(),
        options: vec!["a) richtig".to_owned(), "b) falsch".to_owned()],
        correct: "a".to_owned(),
        explanation: String::new(),
        translation: None,
        vocabulary: Vec::new(),
    }
}

fn sample_bank() -> QuestionBank {
    QuestionBank::new(vec![
        question("q0", "Leseverstehen"),
        question("q1", "Leseverstehen"),
        question("q2", "Hörverstehen"),
        question("q3", "Hörverstehen"),
        question("q4", "Sprachbausteine"),
        question("q5", "Sprachbausteine"),
    ])
    .unwrap()
}

fn service_over(store: &MemoryStore) -> StudyService {
    let repo = ProgressRepository::new(Arc::new(store.clone()));
    StudyService::new(repo, fixed_clock()).with_rng_seed(7)
}

/// Ten-second interaction/tick rounds until `seconds` have accrued.
fn study_for(service: &mut StudyService, seconds: u32) {
    for _ in 0..seconds / 10 {
        service.register_interaction(View::Quiz);
        service.clock_mut().advance(Duration::seconds(10));
        service.tick(View::Quiz).unwrap();
    }
}

/// Ends the day (persisting pending time) and moves the clock to the next
/// one. The first tick after the jump only refreshes the tick baseline.
fn next_day(service: &mut StudyService) {
    service.suspend().unwrap();
    service.clock_mut().advance(Duration::days(1));
    service.tick(View::Quiz).unwrap();
}

fn master(service: &mut StudyService, q: &Question) {
    for _ in 0..2 {
        assert!(!service.submit_answer(q, 'a').unwrap().newly_mastered);
    }
    assert!(service.submit_answer(q, 'a').unwrap().newly_mastered);
}

#[test]
fn three_study_days_build_streak_and_forecast() {
    let store = MemoryStore::new();
    let mut service = service_over(&store);
    service.set_daily_goal_minutes(1).unwrap();
    let bank = sample_bank();

    // One mastered question and one completed goal per day.
    master(&mut service, &bank.questions()[0]);
    study_for(&mut service, 60);
    assert_eq!(service.displayed_streak(), 1);

    next_day(&mut service);
    master(&mut service, &bank.questions()[1]);
    study_for(&mut service, 60);
    assert_eq!(service.displayed_streak(), 2);

    next_day(&mut service);
    master(&mut service, &bank.questions()[2]);
    study_for(&mut service, 60);
    assert_eq!(service.displayed_streak(), 3);

    let snapshot = service.snapshot(&bank);
    assert_eq!(snapshot.total_questions, 6);
    assert_eq!(snapshot.mastered, 3);
    assert_eq!(snapshot.learning, 0);
    assert_eq!(snapshot.fresh, 3);
    assert_eq!(snapshot.accuracy_pct, 100);
    assert_eq!(snapshot.current_streak, 3);

    // 3 masteries over the 7-day window, 3 questions left:
    // 3 / (3/7) = 7 days, ×1.2 margin = 8.4, ceiled to 9.
    let forecast = service.forecast(&bank);
    let projection = forecast.projection().expect("3 study days should project");
    assert_eq!(projection.remaining, 3);
    assert_eq!(projection.estimated_days, 9);
    assert_eq!(projection.ready_on, service.clock().today().add_days(9));
}

#[test]
fn forecast_needs_history_first() {
    let store = MemoryStore::new();
    let mut service = service_over(&store);
    let bank = sample_bank();

    master(&mut service, &bank.questions()[0]);
    study_for(&mut service, 30);
    next_day(&mut service);
    study_for(&mut service, 30);

    assert_eq!(service.forecast(&bank), Forecast::InsufficientHistory);
}

#[test]
fn progress_survives_a_restart() {
    let store = MemoryStore::new();
    let bank = sample_bank();

    {
        let mut service = service_over(&store);
        service.set_daily_goal_minutes(1).unwrap();
        master(&mut service, &bank.questions()[0]);
        study_for(&mut service, 90);
        service.suspend().unwrap();
    }

    let reopened = service_over(&store);
    let record = reopened.progress().record(&bank.questions()[0].id);
    assert!(record.mastered);
    assert_eq!(record.seen, 3);

    let today = reopened.clock().today();
    assert_eq!(reopened.progress().seconds_on(today), 90);
    assert_eq!(reopened.displayed_streak(), 1);
}

#[test]
fn missed_day_resets_the_displayed_streak() {
    let store = MemoryStore::new();
    let mut service = service_over(&store);
    service.set_daily_goal_minutes(1).unwrap();

    study_for(&mut service, 60);
    next_day(&mut service);
    study_for(&mut service, 60);
    assert_eq!(service.displayed_streak(), 2);

    // Two idle days later the display decays, though the record remains.
    service.suspend().unwrap();
    service.clock_mut().advance(Duration::days(2));
    assert_eq!(service.displayed_streak(), 0);
    assert_eq!(service.progress().streak.longest, 2);

    // The next completed goal starts over at one.
    service.tick(View::Quiz).unwrap();
    study_for(&mut service, 60);
    assert_eq!(service.displayed_streak(), 1);
    assert_eq!(service.progress().streak.longest, 2);
}

#[test]
fn exam_results_feed_back_into_practice_records() {
    let store = MemoryStore::new();
    let mut service = service_over(&store);
    let bank = sample_bank();

    let mut exam = service.start_exam(&bank).unwrap();
    assert_eq!(exam.summary().attempted, 6);

    while let Some(q) = exam.current_question().cloned() {
        let now = service.clock().now();
        let result = exam.answer_current('a', now).unwrap();
        assert!(result.correct);
        service.submit_answer(&q, 'a').unwrap();
    }

    assert!(exam.is_finished());
    assert_eq!(exam.summary().accuracy_pct(), 100);

    let snapshot = service.snapshot(&bank);
    assert_eq!(snapshot.practiced, 6);
    assert_eq!(snapshot.accuracy_pct, 100);
}

#[test]
fn selection_always_yields_a_question_from_the_bank() {
    let store = MemoryStore::new();
    let mut service = service_over(&store);
    let bank = sample_bank();

    for _ in 0..50 {
        let picked = service.next_question(&bank).expect("bank is non-empty");
        assert!(bank.get(&picked.id).is_some());
    }
}
