//! End-to-end flow over in-memory storage: resolve an identity, complete
//! lessons, sit a quiz, and watch achievements unlock.

use storage::repository::Storage;
use tutor_core::model::{AchievementId, CourseId, ProjectId};
use tutor_core::time::fixed_clock;

use services::app_services::AppServices;

fn course(id: &str) -> CourseId {
    CourseId::new(id)
}

#[tokio::test]
async fn full_learning_flow() {
    let storage = Storage::in_memory();
    let services = AppServices::from_storage(&storage, "http://127.0.0.1:9", fixed_clock());

    // Identity is minted once and sticks.
    let user = services.identity().get_or_create().await;
    assert!(user.as_str().starts_with("user_"));
    assert_eq!(services.identity().get_or_create().await, user);

    // Three lessons in one course: a quarter of the assumed twelve.
    let progress = services.progress();
    for index in 0..3 {
        progress
            .mark_lesson_complete(&user, &course("html"), index)
            .await
            .unwrap();
    }
    assert_eq!(
        progress
            .course_percentage(&user, &course("html"), None)
            .await
            .unwrap(),
        25
    );

    // Quiz over the built-in fallback pool (the content store is down).
    let doc = services.course_data().load_course(&course("html")).await;
    assert_eq!(doc.lesson_count(), 12);

    let quizzes = services.quizzes();
    let mut session = quizzes.start_session(doc.questions()).unwrap();
    for index in 0..session.question_count() {
        session.go_to(index).unwrap();
        let correct = session.current_question().correct_option();
        session.select_answer(correct).unwrap();
    }
    quizzes.submit(&user, &course("html"), &mut session).await.unwrap();
    assert_eq!(session.outcome().unwrap().score, session.outcome().unwrap().total);

    let scores = quizzes.scores(&user).await.unwrap();
    assert_eq!(scores.len(), 1);
    assert_eq!(scores.best_percentage(), Some(100));

    // A direct sweep settles anything the background checks have not.
    services.achievements().check(&user).await.unwrap();
    let unlocked = services.achievements().unlocked(&user).await.unwrap();
    assert!(unlocked.contains(AchievementId::FirstLesson));
    assert!(unlocked.contains(AchievementId::QuizMaster));
    assert!(!unlocked.contains(AchievementId::Polyglot));

    // Projects track per user.
    let projects = services.projects();
    let gallery = projects.load_projects().await;
    assert_eq!(gallery.len(), 3);
    projects.mark_complete(&user, ProjectId::new(1)).await.unwrap();
    assert!(projects.is_complete(&user, ProjectId::new(1)).await.unwrap());
}

#[tokio::test]
async fn polyglot_unlocks_after_three_courses() {
    let storage = Storage::in_memory();
    let services = AppServices::from_storage(&storage, "http://127.0.0.1:9", fixed_clock());
    let user = services.identity().get_or_create().await;

    for slug in ["html", "css", "python"] {
        services
            .progress()
            .mark_lesson_complete(&user, &course(slug), 0)
            .await
            .unwrap();
    }

    services.achievements().check(&user).await.unwrap();
    let unlocked = services.achievements().unlocked(&user).await.unwrap();
    assert!(unlocked.contains(AchievementId::Polyglot));
}

#[tokio::test]
async fn reset_course_leaves_other_records_alone() {
    let storage = Storage::in_memory();
    let services = AppServices::from_storage(&storage, "http://127.0.0.1:9", fixed_clock());
    let user = services.identity().get_or_create().await;

    let progress = services.progress();
    progress
        .mark_lesson_complete(&user, &course("html"), 0)
        .await
        .unwrap();
    progress
        .mark_lesson_complete(&user, &course("css"), 1)
        .await
        .unwrap();

    progress.reset_course(&user, &course("html")).await.unwrap();

    assert!(progress
        .completed_lessons(&user, &course("html"))
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        progress.completed_lessons(&user, &course("css")).await.unwrap(),
        vec![1]
    );

    let overall = progress.overall(&user).await.unwrap();
    assert_eq!(overall.completed, 1);
    assert_eq!(overall.total, 12);
}
