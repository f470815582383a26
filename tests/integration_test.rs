use moodmentor::db::{self, chat, journals, moods, notifications, profiles, stress};
use moodmentor::error::AppError;
use moodmentor::format::{format_currency, slugify, DEFAULT_CURRENCY_CODE};
use moodmentor::models::*;
use moodmentor::state::DbPool;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

fn setup() -> (TempDir, DbPool) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let pool = db::create_pool(&db_path).expect("Failed to create test database");
    db::run_migrations(&pool).expect("Failed to run migrations");
    (temp_dir, pool)
}

fn profile(pool: &DbPool, role: Role, email: &str) -> UserProfile {
    profiles::create_profile(
        pool,
        NewProfile {
            email: Some(email.to_string()),
            full_name: None,
            role,
            avatar_url: None,
        },
    )
    .unwrap()
}

#[test]
fn test_patient_shares_journal_with_mentor() {
    let (_dir, pool) = setup();
    let patient = profile(&pool, Role::Patient, "pat@example.com");

    let entry = journals::create_entry(
        &pool,
        NewJournalEntry {
            user_id: patient.id.clone(),
            title: Some("Before my session".into()),
            content: "Work has been overwhelming".into(),
            mood: Some(MoodValue::Category("anxious".into())),
            tags: vec!["Work Stress".into(), "Sleep".into()],
        },
    )
    .unwrap();
    assert_eq!(entry.tags, vec!["work-stress", "sleep"]);

    let shared = journals::share_entry(&pool, &entry.id).unwrap();
    let code = shared.share_code.clone().expect("shared entry has a code");

    // Share codes resolve to the stored entry
    let found = journals::find_by_share_code(&pool, &code).unwrap();
    assert_eq!(found, shared);

    let response: JournalResponse = journals::list_entries(&pool, &patient.id, 10).into();
    let entries = response.into_result().unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].is_shared);
}

#[test]
fn test_wire_json_matches_record_shapes() {
    let (_dir, pool) = setup();
    let mentor = profile(&pool, Role::MoodMentor, "mentor@example.com");
    let patient = profile(&pool, Role::Patient, "p@example.com");

    let notification = notifications::create_notification(
        &pool,
        32,
        CreateNotificationParams {
            user_id: mentor.id.clone(),
            title: "New review".into(),
            message: "A patient left a review".into(),
            kind: NotificationType::Review,
            link: None,
            metadata: None,
        },
    )
    .unwrap();
    let json = serde_json::to_value(&notification).unwrap();
    for key in ["id", "userId", "title", "message", "type", "isRead", "metadata", "createdAt", "updatedAt"] {
        assert!(json.get(key).is_some(), "notification missing {}", key);
    }
    assert!(json.get("link").is_none());

    let conversation = chat::create_conversation(&pool, &[patient.id.clone(), mentor.id.clone()]).unwrap();
    let message = chat::send_message(
        &pool,
        NewChatMessage {
            conversation_id: conversation.id.clone(),
            sender_id: patient.id.clone(),
            content: "Hi!".into(),
        },
    )
    .unwrap();
    let json = serde_json::to_value(&message).unwrap();
    for key in ["id", "conversationId", "senderId", "content", "timestamp", "status"] {
        assert!(json.get(key).is_some(), "message missing {}", key);
    }

    let decoded: ChatMessage = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, message);
}

#[test]
fn test_chat_unread_counts_follow_read_receipts() {
    let (_dir, pool) = setup();
    let patient = profile(&pool, Role::Patient, "a@example.com");
    let mentor = profile(&pool, Role::MoodMentor, "b@example.com");
    let conversation = chat::create_conversation(&pool, &[patient.id.clone(), mentor.id.clone()]).unwrap();

    let mut sent = Vec::new();
    for text in ["first", "second", "third"] {
        sent.push(
            chat::send_message(
                &pool,
                NewChatMessage {
                    conversation_id: conversation.id.clone(),
                    sender_id: patient.id.clone(),
                    content: text.into(),
                },
            )
            .unwrap(),
        );
    }

    chat::update_message_status(&pool, &sent[0].id, MessageStatus::Delivered).unwrap();
    let inbox = chat::list_conversations(&pool, &mentor.id).unwrap();
    assert_eq!(inbox[0].unread_count, 3);
    assert_eq!(inbox[0].last_message, "third");

    assert_eq!(chat::mark_conversation_read(&pool, &conversation.id, &mentor.id).unwrap(), 3);
    assert_eq!(chat::list_conversations(&pool, &mentor.id).unwrap()[0].unread_count, 0);

    // Receipts never move backwards once read
    let err = chat::update_message_status(&pool, &sent[0].id, MessageStatus::Delivered).unwrap_err();
    assert!(matches!(err, AppError::Invalid(_)));
    let history = chat::list_messages(&pool, &conversation.id, 10).unwrap();
    assert!(history.iter().all(|m| m.status == MessageStatus::Read));
}

fn open_chat(pool: &DbPool) -> (UserProfile, UserProfile, Conversation) {
    let patient = profile(pool, Role::Patient, "race-p@example.com");
    let mentor = profile(pool, Role::MoodMentor, "race-m@example.com");
    let conversation = chat::create_conversation(pool, &[patient.id.clone(), mentor.id.clone()]).unwrap();
    (patient, mentor, conversation)
}

fn send(pool: &DbPool, conversation: &Conversation, sender: &UserProfile, content: &str) -> ChatMessage {
    chat::send_message(
        pool,
        NewChatMessage {
            conversation_id: conversation.id.clone(),
            sender_id: sender.id.clone(),
            content: content.into(),
        },
    )
    .unwrap()
}

fn stored_status(pool: &DbPool, conversation: &Conversation, message_id: &str) -> MessageStatus {
    chat::list_messages(pool, &conversation.id, 1000)
        .unwrap()
        .into_iter()
        .find(|m| m.id == message_id)
        .map(|m| m.status)
        .unwrap()
}

#[test]
fn test_concurrent_status_updates_never_regress() {
    let (_dir, pool) = setup();
    let (patient, _mentor, conversation) = open_chat(&pool);

    for round in 0..100 {
        let message = send(&pool, &conversation, &patient, &format!("round {}", round));
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = [MessageStatus::Read, MessageStatus::Delivered]
            .into_iter()
            .map(|status| {
                let pool = pool.clone();
                let barrier = barrier.clone();
                let id = message.id.clone();
                thread::spawn(move || {
                    barrier.wait();
                    chat::update_message_status(&pool, &id, status)
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(results[0].is_ok(), "round {}: read failed: {:?}", round, results[0]);
        if let Err(e) = &results[1] {
            assert!(matches!(e, AppError::Invalid(_)), "round {}: {:?}", round, e);
        }
        assert_eq!(stored_status(&pool, &conversation, &message.id), MessageStatus::Read, "round {}", round);
    }
}

#[test]
fn test_read_receipts_win_over_concurrent_delivery() {
    let (_dir, pool) = setup();
    let (patient, mentor, conversation) = open_chat(&pool);

    for round in 0..100 {
        let message = send(&pool, &conversation, &patient, &format!("round {}", round));
        let barrier = Arc::new(Barrier::new(2));

        let reader = {
            let pool = pool.clone();
            let barrier = barrier.clone();
            let conversation_id = conversation.id.clone();
            let mentor_id = mentor.id.clone();
            thread::spawn(move || {
                barrier.wait();
                chat::mark_conversation_read(&pool, &conversation_id, &mentor_id)
            })
        };
        let courier = {
            let pool = pool.clone();
            let barrier = barrier.clone();
            let id = message.id.clone();
            thread::spawn(move || {
                barrier.wait();
                chat::update_message_status(&pool, &id, MessageStatus::Delivered)
            })
        };

        reader.join().unwrap().unwrap();
        let _ = courier.join().unwrap();
        assert_eq!(stored_status(&pool, &conversation, &message.id), MessageStatus::Read, "round {}", round);
    }
}

#[test]
fn test_concurrent_shares_agree_on_one_code() {
    let (_dir, pool) = setup();
    let patient = profile(&pool, Role::Patient, "share@example.com");
    let entry = journals::create_entry(
        &pool,
        NewJournalEntry {
            user_id: patient.id.clone(),
            title: None,
            content: "for my mentor".into(),
            mood: None,
            tags: vec![],
        },
    )
    .unwrap();

    let barrier = Arc::new(Barrier::new(4));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pool = pool.clone();
            let barrier = barrier.clone();
            let id = entry.id.clone();
            thread::spawn(move || {
                barrier.wait();
                journals::share_entry(&pool, &id).unwrap().share_code.unwrap()
            })
        })
        .collect();
    let codes: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(codes.iter().all(|c| c == &codes[0]), "codes: {:?}", codes);
    assert_eq!(journals::find_by_share_code(&pool, &codes[0]).unwrap().id, entry.id);
}

#[test]
fn test_unknown_owner_is_reported_as_not_found() {
    let (_dir, pool) = setup();
    let result = journals::create_entry(
        &pool,
        NewJournalEntry {
            user_id: "typo".into(),
            title: None,
            content: "x".into(),
            mood: None,
            tags: vec![],
        },
    );
    let err = result.unwrap_err();
    assert_eq!(err.public_message(), "Not found: profile typo");
    assert_eq!(err.exit_code(), 3);

    let response: JournalResponse = journals::list_entries(&pool, "typo", 10).into();
    assert!(response.into_result().unwrap().is_empty());
}

#[test]
fn test_mood_and_stress_history() {
    let (_dir, pool) = setup();
    let patient = profile(&pool, Role::Patient, "m@example.com");

    for score in [2, 5, 8] {
        moods::create_entry(
            &pool,
            NewMoodEntry {
                user_id: patient.id.clone(),
                mood: MoodValue::Score(score),
                assessment_result: None,
                notes: None,
                tags: None,
                activities: None,
            },
        )
        .unwrap();
    }
    let summary = moods::summarize(&pool, &patient.id).unwrap();
    assert_eq!(summary.entries, 3);
    assert_eq!(summary.average_score, Some(5.0));

    let response: MoodResponse = moods::list_entries(&pool, &patient.id, 2).into();
    assert_eq!(response.into_result().unwrap().len(), 2);

    let scale = StressScale::default();
    let rejected = stress::create_assessment(
        &pool,
        &scale,
        NewStressAssessment {
            user_id: patient.id.clone(),
            stress_level: 11.0,
            symptoms: vec![],
            triggers: vec![],
            coping_strategies: None,
            notes: None,
        },
    );
    assert!(rejected.is_err());

    let response: StressResponse = stress::list_assessments(&pool, &patient.id, 10).into();
    assert!(response.into_result().unwrap().is_empty());
}

#[test]
fn test_deleting_profile_cascades_to_records() {
    let (_dir, pool) = setup();
    let patient = profile(&pool, Role::Patient, "gone@example.com");
    journals::create_entry(
        &pool,
        NewJournalEntry {
            user_id: patient.id.clone(),
            title: None,
            content: "temporary".into(),
            mood: None,
            tags: vec![],
        },
    )
    .unwrap();

    let conn = pool.get().unwrap();
    conn.execute("DELETE FROM profiles WHERE id = ?1", [&patient.id]).unwrap();
    drop(conn);

    assert!(journals::list_entries(&pool, &patient.id, 10).unwrap().is_empty());
}

#[test]
fn test_formatters() {
    assert_eq!(format_currency(1000.0, DEFAULT_CURRENCY_CODE).unwrap(), "$1,000");
    assert_eq!(format_currency(0.0, "USD").unwrap(), "$0");
    assert_eq!(slugify("Café Déjà Vu"), "cafe-deja-vu");
    assert_eq!(slugify("  Multiple   Spaces -- here!!"), "multiple-spaces-here");
}
