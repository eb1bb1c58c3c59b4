//! Tests for selection, confirmation and batch deletion of a single chat

use std::time::Duration;

use chrono::Utc;
use telegram_purge::purge::{delete_in_batches, purge_chat, BATCH_SIZE, MESSAGE_SCAN_LIMIT};
use telegram_purge::{ChatKind, Error, MessageRecord, Period, PurgeStatus};
use tokio::time::Instant;

use super::mock::{chat, console, outgoing, output, MockApi};

fn ids(n: usize) -> Vec<i32> {
    (1..=n as i32).collect()
}

#[tokio::test]
async fn cancelled_confirmation_deletes_nothing() {
    let group = chat(10, "Rust Chat", ChatKind::Group);
    let mut api = MockApi::new(vec![group.clone()]).with_history(10, outgoing(5, Utc::now()));

    for answer in ["нет\n", "yes\n", "\n", "д а\n", ""] {
        let mut console = console(answer);
        let deleted = purge_chat(&mut api, &mut console, &group, None, Utc::now())
            .await
            .unwrap();

        assert_eq!(deleted, 0, "answer {:?} must cancel", answer);
        assert!(output(&console).contains("Операция отменена"));
    }
    assert!(api.delete_calls.is_empty());
}

#[tokio::test(start_paused = true)]
async fn affirmative_answer_is_case_insensitive() {
    let group = chat(10, "Rust Chat", ChatKind::Group);
    let mut api = MockApi::new(vec![group.clone()]).with_history(10, outgoing(3, Utc::now()));
    let mut console = console("  ДА \n");

    let deleted = purge_chat(&mut api, &mut console, &group, None, Utc::now())
        .await
        .unwrap();

    assert_eq!(deleted, 3);
    assert_eq!(api.batch_sizes(), vec![3]);
}

#[tokio::test(start_paused = true)]
async fn batch_count_is_ceiling_of_message_count() {
    for n in [1, 99, 100, 101, 250, 1000] {
        let mut api = MockApi::default();
        let mut console = console("");

        let outcome = delete_in_batches(&mut api, &mut console, &7, &ids(n))
            .await
            .unwrap();

        assert_eq!(api.delete_calls.len(), n.div_ceil(BATCH_SIZE), "n = {}", n);
        assert_eq!(api.batch_sizes().iter().sum::<usize>(), n);
        assert_eq!(outcome.deleted, n);
        assert_eq!(outcome.total, n);
        assert_eq!(outcome.status, PurgeStatus::Completed);
    }
}

#[tokio::test(start_paused = true)]
async fn batches_keep_message_order() {
    let mut api = MockApi::default();
    let mut console = console("");
    let ids = ids(250);

    delete_in_batches(&mut api, &mut console, &7, &ids).await.unwrap();

    assert_eq!(api.delete_calls[0].1, ids[..100].to_vec());
    assert_eq!(api.delete_calls[1].1, ids[100..200].to_vec());
    assert_eq!(api.delete_calls[2].1, ids[200..].to_vec());
    assert!(api.delete_calls.iter().all(|(peer, _)| *peer == 7));
}

#[tokio::test(start_paused = true)]
async fn progress_is_printed_after_each_batch() {
    let mut api = MockApi::default();
    let mut console = console("");

    delete_in_batches(&mut api, &mut console, &7, &ids(250))
        .await
        .unwrap();

    let printed = output(&console);
    assert!(printed.contains("100/250 (40.0%)"));
    assert!(printed.contains("200/250 (80.0%)"));
    assert!(printed.contains("250/250 (100.0%)"));
}

#[tokio::test(start_paused = true)]
async fn fixed_pause_follows_every_successful_batch() {
    let mut api = MockApi::default();
    let mut console = console("");
    let start = Instant::now();

    delete_in_batches(&mut api, &mut console, &7, &ids(250))
        .await
        .unwrap();

    assert_eq!(start.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn forbidden_stops_remaining_batches() {
    let mut api = MockApi::default().fail_delete(3, Error::DeleteForbidden);
    let mut console = console("");

    let outcome = delete_in_batches(&mut api, &mut console, &7, &ids(450))
        .await
        .unwrap();

    assert_eq!(api.delete_calls.len(), 3);
    assert_eq!(outcome.deleted, 200);
    assert_eq!(outcome.status, PurgeStatus::Forbidden);
    assert!(output(&console).contains("Нет прав для удаления"));
}

#[tokio::test(start_paused = true)]
async fn flood_wait_suspends_once_and_skips_the_batch() {
    let mut api = MockApi::default().fail_delete(2, Error::FloodWait { seconds: 30 });
    let mut console = console("");
    let start = Instant::now();

    let outcome = delete_in_batches(&mut api, &mut console, &7, &ids(250))
        .await
        .unwrap();

    // batch 1: pause 1s, batch 2: flood wait 30s, batch 3: pause 1s
    assert_eq!(start.elapsed(), Duration::from_secs(32));
    assert_eq!(api.batch_sizes(), vec![100, 100, 50]);
    assert_eq!(outcome.deleted, 150);
    assert_eq!(outcome.status, PurgeStatus::Completed);

    let printed = output(&console);
    assert!(printed.contains("Ждем 30 секунд"));
    assert!(printed.contains("150/250"));
}

#[tokio::test(start_paused = true)]
async fn generic_error_aborts_with_partial_count() {
    let mut api = MockApi::default()
        .fail_delete(2, Error::TelegramError("connection reset".to_string()));
    let mut console = console("");

    let outcome = delete_in_batches(&mut api, &mut console, &7, &ids(300))
        .await
        .unwrap();

    assert_eq!(api.delete_calls.len(), 2);
    assert_eq!(outcome.deleted, 100);
    assert!(matches!(outcome.status, PurgeStatus::Failed(ref msg) if msg.contains("connection reset")));
    assert!(output(&console).contains("Ошибка при удалении"));
}

#[tokio::test]
async fn no_outgoing_messages_skips_confirmation() {
    let group = chat(10, "Quiet", ChatKind::Group);
    let incoming: Vec<MessageRecord> = outgoing(20, Utc::now())
        .into_iter()
        .map(|m| MessageRecord {
            outgoing: false,
            ..m
        })
        .collect();
    let mut api = MockApi::new(vec![group.clone()]).with_history(10, incoming);
    let mut console = console("да\n");

    let deleted = purge_chat(&mut api, &mut console, &group, None, Utc::now())
        .await
        .unwrap();

    assert_eq!(deleted, 0);
    let printed = output(&console);
    assert!(printed.contains("Ваши сообщения не найдены"));
    assert!(!printed.contains("(да/нет)"));
    assert!(api.delete_calls.is_empty());
}

#[tokio::test]
async fn scan_uses_safety_cap() {
    let group = chat(10, "Big", ChatKind::Channel);
    let mut api = MockApi::new(vec![group.clone()]);
    let mut console = console("");

    purge_chat(&mut api, &mut console, &group, None, Utc::now())
        .await
        .unwrap();

    assert_eq!(api.scan_calls, vec![(10, MESSAGE_SCAN_LIMIT)]);
}

#[tokio::test]
async fn scan_failure_returns_zero() {
    let group = chat(10, "Broken", ChatKind::Group);
    let mut api = MockApi::new(vec![group.clone()]);
    api.fail_scan = true;
    let mut console = console("да\n");

    let deleted = purge_chat(&mut api, &mut console, &group, None, Utc::now())
        .await
        .unwrap();

    assert_eq!(deleted, 0);
    assert!(output(&console).contains("history unavailable"));
    assert!(api.delete_calls.is_empty());
}

#[tokio::test(start_paused = true)]
async fn period_filter_excludes_older_messages() {
    let now = Utc::now();
    let friend = chat(42, "Alice", ChatKind::User);
    let mut history = outgoing(3, now - chrono::Duration::hours(1));
    history.push(MessageRecord {
        id: 100,
        date: now - chrono::Duration::days(3),
        outgoing: true,
    });
    history.push(MessageRecord {
        id: 101,
        date: now - chrono::Duration::minutes(5),
        outgoing: false,
    });
    let mut api = MockApi::new(vec![friend.clone()]).with_history(42, history);

    let mut day = console("да\n");
    let deleted = purge_chat(&mut api, &mut day, &friend, Some(Period::Day), now)
        .await
        .unwrap();
    assert_eq!(deleted, 3);
    assert_eq!(api.delete_calls[0].1, vec![3, 2, 1]);
    assert!(output(&day).contains("за последние 24 часа"));

    let mut week = console("да\n");
    let deleted = purge_chat(&mut api, &mut week, &friend, Some(Period::Week), now)
        .await
        .unwrap();
    assert_eq!(deleted, 4);
    assert_eq!(api.delete_calls[1].1, vec![3, 2, 1, 100]);
}

#[tokio::test]
async fn period_with_nothing_in_window() {
    let now = Utc::now();
    let friend = chat(42, "Alice", ChatKind::User);
    let mut api = MockApi::new(vec![friend.clone()])
        .with_history(42, outgoing(5, now - chrono::Duration::days(30)));
    let mut console = console("");

    let deleted = purge_chat(&mut api, &mut console, &friend, Some(Period::Week), now)
        .await
        .unwrap();

    assert_eq!(deleted, 0);
    assert!(output(&console).contains("за указанный период не найдены"));
}
