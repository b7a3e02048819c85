//! Test fixtures and request bodies.

use serde_json::json;
use uuid::Uuid;

/// Create a deck request body with a unique name.
pub fn create_deck_request(prefix: &str) -> serde_json::Value {
    json!({
        "name": format!("{}_{}", prefix, &Uuid::new_v4().to_string()[..8]),
        "description": "integration test deck"
    })
}

/// Create a card request body.
pub fn create_card_request(front: &str, back: &str) -> serde_json::Value {
    json!({ "front": front, "back": back })
}

/// Bulk import body with `count` numbered cards.
pub fn bulk_cards_request(count: usize) -> serde_json::Value {
    let cards: Vec<_> = (1..=count)
        .map(|i| json!({ "front": format!("Question {i}?"), "back": format!("Answer {i}.") }))
        .collect();
    json!({ "cards": cards })
}

/// Submit review request body.
pub fn review_request(card_id: i64, rating: &str) -> serde_json::Value {
    json!({ "card_id": card_id, "rating": rating })
}

/// Create MCQ request body; the correct answer is B.
pub fn create_mcq_request() -> serde_json::Value {
    json!({
        "question_text": "What is 2 + 2?",
        "option_a": "3",
        "option_b": "4",
        "option_c": "5",
        "option_d": "22",
        "correct_option": "B",
        "explanation": "Basic arithmetic",
        "difficulty": "easy"
    })
}

/// MCQ answer request body.
pub fn mcq_answer_request(answer: &str) -> serde_json::Value {
    json!({ "answer": answer })
}
