// tests/api_tests.rs

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use quiz_engine::{
    config::Config,
    engine::{
        QuizEngine,
        question_bank::{QuestionBank, TopicDefinition},
        session_cache::SessionCache,
    },
    models::question::{Question, QuestionType},
    routes,
    state::AppState,
    store::MemoryResultStore,
    utils::clock::ManualClock,
};

struct TestApp {
    address: String,
    clock: ManualClock,
    engine: Arc<QuizEngine>,
}

fn topic(name: &str, aliases: &[&str], count: usize) -> TopicDefinition {
    TopicDefinition {
        name: name.to_string(),
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
        keywords: Vec::new(),
        questions: (1..=count)
            .map(|i| Question {
                text: format!("{} question {}", name, i),
                options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                // Every answer is "A" so the tests can submit a perfect paper.
                correct_answer: "A".to_string(),
                explanation: format!("Because {} {}", name, i),
                question_type: QuestionType::MultipleChoice,
            })
            .collect(),
    }
}

/// Helper function to spawn the app on a random port for testing.
async fn spawn_app() -> TestApp {
    let bank = QuestionBank::from_topics(vec![
        topic("python", &["py"], 20),
        topic("javascript", &["js"], 12),
        topic("sql", &[], 3),
    ])
    .expect("Failed to build test bank");

    let clock = ManualClock::default();
    let sessions = Arc::new(SessionCache::new(
        Arc::new(clock.clone()),
        Duration::from_secs(3600),
    ));
    let engine = Arc::new(QuizEngine::new(
        Arc::new(bank),
        sessions,
        Arc::new(MemoryResultStore::new()),
        Duration::from_secs(1),
    ));

    let config = Config {
        rust_log: "error".to_string(),
        ..Config::default()
    };

    let state = AppState {
        engine: engine.clone(),
        config,
    };
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        clock,
        engine,
    }
}

async fn generate(
    app: &TestApp,
    client: &reqwest::Client,
    body: serde_json::Value,
) -> reqwest::Response {
    client
        .post(format!("{}/api/quiz/generate", app.address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request")
}

fn all_a() -> HashMap<u32, String> {
    (1..=10).map(|i| (i, "A".to_string())).collect()
}

#[tokio::test]
async fn unknown_path_is_404() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/random_path_that_does_not_exist", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn generate_hides_answers() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = generate(&app, &client, serde_json::json!({ "topic": "python" })).await;
    assert_eq!(response.status().as_u16(), 200);

    let quiz: serde_json::Value = response.json().await.unwrap();
    assert_eq!(quiz["topic"], "python");
    assert_eq!(quiz["totalQuestions"], 10);
    assert_eq!(quiz["timeLimitSeconds"], 600);
    assert!(quiz["quizId"].as_str().is_some_and(|id| !id.is_empty()));

    let questions = quiz["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 10);
    for (i, q) in questions.iter().enumerate() {
        assert_eq!(q["id"], (i + 1) as u64);
        assert_eq!(q["type"], "multiple-choice");
        assert!(q.get("correctAnswer").is_none());
        assert!(q.get("explanation").is_none());
    }
}

#[tokio::test]
async fn generate_requires_topic_or_keyword() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = generate(&app, &client, serde_json::json!({})).await;
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn generate_rejects_overlong_topic() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = generate(&app, &client, serde_json::json!({ "topic": "x".repeat(101) })).await;
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn undersized_topic_is_404_with_suggestions() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = generate(&app, &client, serde_json::json!({ "topic": "sql" })).await;
    assert_eq!(response.status().as_u16(), 404);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Topic 'sql' is not available");
    assert_eq!(body["supportedTopics"], serde_json::json!(["python", "javascript"]));
}

#[tokio::test]
async fn alias_resolves_to_canonical_topic() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let quiz: serde_json::Value = generate(&app, &client, serde_json::json!({ "keyword": "JS" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(quiz["topic"], "javascript");
}

#[tokio::test]
async fn unmatched_subject_falls_back_to_mixed_pool() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = generate(&app, &client, serde_json::json!({ "topic": "astronomy" })).await;
    assert_eq!(response.status().as_u16(), 200);
    let quiz: serde_json::Value = response.json().await.unwrap();
    assert_eq!(quiz["topic"], "mixed");
}

#[tokio::test]
async fn quiz_round_trip_and_history() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let user_id = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);

    // 1. Take two quizzes as the same user
    let mut quiz_ids = Vec::new();
    for _ in 0..2 {
        let quiz: serde_json::Value = generate(&app, &client, serde_json::json!({ "topic": "py" }))
            .await
            .json()
            .await
            .unwrap();
        quiz_ids.push(quiz["quizId"].as_str().unwrap().to_string());
    }

    // 2. Perfect paper on the first quiz
    let result: serde_json::Value = client
        .post(format!("{}/api/quiz/submit", app.address))
        .json(&serde_json::json!({
            "quizId": quiz_ids[0],
            "answers": all_a(),
            "userId": user_id
        }))
        .send()
        .await
        .expect("Submit failed")
        .json()
        .await
        .unwrap();

    assert_eq!(result["score"], 100);
    assert_eq!(result["correctAnswers"], 10);
    assert_eq!(result["totalQuestions"], 10);
    assert_eq!(result["topic"], "python");
    assert!(result.get("persistenceWarning").is_none());
    let details = result["results"].as_array().unwrap();
    assert_eq!(details.len(), 10);
    assert_eq!(details[0]["questionId"], 1);
    assert_eq!(details[0]["userAnswer"], "A");
    assert_eq!(details[0]["isCorrect"], true);
    assert!(details[0]["explanation"].as_str().unwrap().starts_with("Because python"));

    // 3. Three correct answers on the second quiz, a little later
    app.clock.advance(chrono::Duration::seconds(30));
    let mut answers = all_a();
    for position in 4..=10 {
        answers.insert(position, "B".to_string());
    }
    let result: serde_json::Value = client
        .post(format!("{}/api/quiz/submit", app.address))
        .json(&serde_json::json!({
            "quizId": quiz_ids[1],
            "answers": answers,
            "userId": user_id
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(result["score"], 30);
    assert_eq!(result["correctAnswers"], 3);

    // 4. History holds both, newest first
    let history: Vec<serde_json::Value> = client
        .get(format!("{}/api/quiz/history/{}", app.address, user_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["quizId"], quiz_ids[1].as_str());
    assert_eq!(history[1]["quizId"], quiz_ids[0].as_str());
    assert_eq!(history[0]["userId"], user_id.as_str());

    // 5. Deleting an unknown quiz is a 404 and changes nothing
    let response = client
        .delete(format!("{}/api/quiz/history/{}/not-a-quiz", app.address, user_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Quiz not found in history");

    // 6. Delete one, then the rest
    let body: serde_json::Value = client
        .delete(format!("{}/api/quiz/history/{}/{}", app.address, user_id, quiz_ids[0]))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["remaining"], 1);

    let body: serde_json::Value = client
        .delete(format!("{}/api/quiz/history/{}", app.address, user_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["deleted"], 1);

    let history: Vec<serde_json::Value> = client
        .get(format!("{}/api/quiz/history/{}", app.address, user_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn anonymous_submission_is_not_saved() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let quiz: serde_json::Value = generate(&app, &client, serde_json::json!({ "topic": "python" }))
        .await
        .json()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/api/quiz/submit", app.address))
        .json(&serde_json::json!({ "quizId": quiz["quizId"], "answers": {} }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let result: serde_json::Value = response.json().await.unwrap();
    assert_eq!(result["score"], 0);
    assert!(result.get("userId").is_none());
}

#[tokio::test]
async fn unknown_quiz_is_404() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/quiz/submit", app.address))
        .json(&serde_json::json!({ "quizId": "does-not-exist", "answers": all_a() }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Quiz not found or expired");
}

#[tokio::test]
async fn expired_quiz_is_404_after_sweep() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let quiz: serde_json::Value = generate(&app, &client, serde_json::json!({ "topic": "python" }))
        .await
        .json()
        .await
        .unwrap();

    app.clock.advance(chrono::Duration::minutes(59));
    assert_eq!(app.engine.sessions().sweep_expired().await, 0);

    app.clock.advance(chrono::Duration::minutes(1));
    assert_eq!(app.engine.sessions().sweep_expired().await, 1);

    let response = client
        .post(format!("{}/api/quiz/submit", app.address))
        .json(&serde_json::json!({ "quizId": quiz["quizId"], "answers": all_a() }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn topics_and_health() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let topics: serde_json::Value = client
        .get(format!("{}/api/quiz/topics", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        topics["topics"],
        serde_json::json!([
            { "topic": "python", "questionCount": 20 },
            { "topic": "javascript", "questionCount": 12 }
        ])
    );

    generate(&app, &client, serde_json::json!({ "topic": "python" })).await;
    let health: serde_json::Value = client
        .get(format!("{}/api/health", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["activeSessions"], 1);
}

#[test]
fn shipped_question_bank_loads() {
    let bank = QuestionBank::load(concat!(env!("CARGO_MANIFEST_DIR"), "/data/question_bank.json"))
        .expect("Shipped question bank should be valid");
    assert!(!bank.supported_topics(10).is_empty());
    assert_eq!(bank.canonical("js"), Some("javascript"));
}
