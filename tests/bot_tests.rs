use chrono::Duration;
use clockbot::bot::Bot;
use clockbot::bot::events::{Actor, Command, Outbound, VoiceStateEvent};
use clockbot::bot::serve::{handle_line, run_bridge, spawn_writer};
use clockbot::config::Config;
use clockbot::notify::LogNotifier;
use clockbot::presence::{VoiceRoster, VoiceTransition};
use serde_json::json;
use std::sync::Arc;
use tempfile::{TempDir, tempdir};
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc::unbounded_channel;

mod common;
use common::{temp_store, ts};

fn bot(require_voice: bool) -> (TempDir, Bot, VoiceRoster) {
    let dir = tempdir().unwrap();
    let mut cfg = Config::default();
    cfg.privileged.user_ids = vec!["boss".to_string()];

    let roster = VoiceRoster::new();
    let bot = clockbot::build_bot(
        &cfg,
        temp_store(dir.path()),
        roster.clone(),
        Arc::new(LogNotifier),
        require_voice,
    );
    (dir, bot, roster)
}

fn ann() -> Actor {
    Actor::new("u1", "Ann")
}

#[tokio::test]
async fn test_clock_in_requires_guild_and_voice() {
    let (_dir, bot, roster) = bot(true);
    let now = ts("2024-01-01T09:00:00Z");

    let reply = bot.handle_command(&ann(), false, &Command::ClockIn, now);
    assert!(!reply.ok);
    assert!(reply.content.contains("only be used in a server"));

    let reply = bot.handle_command(&ann(), true, &Command::ClockIn, now);
    assert!(!reply.ok);
    assert!(reply.content.contains("voice channel"));

    roster.apply("u1", None, Some("general"));
    let reply = bot.handle_command(&ann(), true, &Command::ClockIn, now);
    assert!(reply.ok);
    assert_eq!(reply.content, "🟢 CLOCKED IN");

    let reply = bot.handle_command(&ann(), true, &Command::ClockIn, now);
    assert!(!reply.ok);
    assert_eq!(reply.content, "❌ You are already clocked in.");
}

#[tokio::test]
async fn test_clock_out_reports_hours() {
    let (_dir, bot, _) = bot(false);
    let t0 = ts("2024-01-01T00:00:00Z");

    let reply = bot.handle_command(&ann(), true, &Command::ClockOut, t0);
    assert!(!reply.ok);

    bot.handle_command(&ann(), true, &Command::ClockIn, t0);
    let reply = bot.handle_command(&ann(), true, &Command::ClockOut, t0 + Duration::minutes(150));
    assert!(reply.ok);
    assert_eq!(reply.content, "🔴 CLOCKED OUT (2.50h)");
}

#[tokio::test]
async fn test_status_and_total() {
    let (_dir, bot, _) = bot(false);
    let t0 = ts("2024-01-01T00:00:00Z");

    let status = Command::Status { user: None };
    assert_eq!(
        bot.handle_command(&ann(), true, &status, t0).content,
        "📭 No record."
    );

    bot.handle_command(&ann(), true, &Command::ClockIn, t0);
    assert_eq!(
        bot.handle_command(&ann(), true, &status, t0 + Duration::minutes(42))
            .content,
        "🟢 Clocked in (42 min)"
    );

    bot.handle_command(&ann(), true, &Command::ClockOut, t0 + Duration::hours(2));
    let reply = bot.handle_command(&ann(), true, &Command::TotalHours, t0);
    assert!(reply.content.contains("2.00h"));
}

#[tokio::test]
async fn test_timesheet_of_someone_else_needs_privilege() {
    let (_dir, bot, _) = bot(false);
    let t0 = ts("2024-01-01T00:00:00Z");
    bot.handle_command(&ann(), true, &Command::ClockIn, t0);
    bot.handle_command(&ann(), true, &Command::ClockOut, t0 + Duration::minutes(150));

    let view = Command::TimesheetView {
        user: Some("u1".into()),
        start: Some("01/01/2024".into()),
        end: Some("01/01/2024".into()),
    };

    let own = bot.handle_command(&ann(), true, &view, t0);
    assert!(own.ok);
    assert!(own.content.contains("Total: 2.50h"));
    assert!(own.content.contains("1. January 1, 2024, 00:00 - 02:30 UTC (2.50h)"));

    let bob = Actor::new("u2", "Bob");
    let denied = bot.handle_command(&bob, true, &view, t0);
    assert!(!denied.ok);
    assert!(denied.content.contains("not allowed"));

    let manager = Actor::new("u2", "Bob").with_roles(&["Manager"]);
    assert!(bot.handle_command(&manager, true, &view, t0).ok);
}

#[tokio::test]
async fn test_timesheet_view_bad_range_is_rejected() {
    let (_dir, bot, _) = bot(false);
    let view = Command::TimesheetView {
        user: None,
        start: Some("01/05/2024".into()),
        end: Some("01/01/2024".into()),
    };

    let reply = bot.handle_command(&ann(), true, &view, ts("2024-01-01T00:00:00Z"));
    assert!(!reply.ok);
    assert!(reply.content.contains("Invalid date range"));
}

#[tokio::test]
async fn test_reset_and_force_clock_out_are_privileged() {
    let (_dir, bot, _) = bot(false);
    let t0 = ts("2024-01-01T00:00:00Z");
    let boss = Actor::new("boss", "Boss");
    bot.handle_command(&ann(), true, &Command::ClockIn, t0);

    let force = Command::ForceClockOut {
        user: "u1".into(),
        reason: None,
    };
    assert!(!bot.handle_command(&ann(), true, &force, t0).ok);

    let reply = bot.handle_command(&boss, true, &force, t0 + Duration::hours(1));
    assert!(reply.ok);
    assert!(reply.content.contains("1.00h"));

    let again = bot.handle_command(&boss, true, &force, t0 + Duration::hours(2));
    assert!(again.ok);
    assert!(again.content.contains("was not clocked in"));

    let reset = Command::TimesheetReset {
        start: None,
        end: None,
    };
    assert!(!bot.handle_command(&ann(), true, &reset, t0).ok);
    let reply = bot.handle_command(&boss, true, &reset, t0 + Duration::days(1));
    assert!(reply.ok);
    assert!(reply.content.contains("Archived 1 session(s)"));
    assert!(bot.store().read(|s| s.records().is_empty()));
}

#[tokio::test]
async fn test_voice_departure_arms_and_clock_out_disarms() {
    let (_dir, bot, _) = bot(true);
    let t0 = ts("2024-01-01T00:00:00Z");

    let join = VoiceStateEvent {
        user_id: "u1".into(),
        before: None,
        after: Some("general".into()),
    };
    assert_eq!(bot.handle_voice(&join, t0), VoiceTransition::Joined);
    bot.handle_command(&ann(), true, &Command::ClockIn, t0);

    let leave = VoiceStateEvent {
        user_id: "u1".into(),
        before: Some("general".into()),
        after: None,
    };
    assert_eq!(bot.handle_voice(&leave, t0), VoiceTransition::Left);
    assert!(bot.presence().is_armed("u1"));

    bot.handle_command(&ann(), true, &Command::ClockOut, t0 + Duration::minutes(1));
    assert!(!bot.presence().is_armed("u1"));
}

#[tokio::test]
async fn test_moving_between_channels_is_not_a_departure() {
    let (_dir, bot, roster) = bot(true);
    let t0 = ts("2024-01-01T00:00:00Z");
    roster.apply("u1", None, Some("general"));
    bot.handle_command(&ann(), true, &Command::ClockIn, t0);

    let moved = VoiceStateEvent {
        user_id: "u1".into(),
        before: Some("general".into()),
        after: Some("focus".into()),
    };
    assert_eq!(bot.handle_voice(&moved, t0), VoiceTransition::Moved);
    assert!(!bot.presence().is_armed("u1"));
}

#[tokio::test]
async fn test_bridge_line_handling() {
    let (_dir, bot, _) = bot(false);
    let now = ts("2024-01-01T00:00:00Z");

    let line = json!({
        "type": "command",
        "interactionId": "42",
        "user": { "id": "u1", "displayName": "Ann" },
        "command": { "name": "clockin" }
    })
    .to_string();
    assert_eq!(
        handle_line(&bot, &line, now),
        Some(Outbound::Reply {
            interaction_id: "42".into(),
            ok: true,
            content: "🟢 CLOCKED IN".into(),
        })
    );

    let legacy_alias = json!({
        "type": "command",
        "interactionId": "43",
        "user": { "id": "u1" },
        "command": { "name": "totalhours" }
    })
    .to_string();
    assert!(matches!(
        handle_line(&bot, &legacy_alias, now),
        Some(Outbound::Reply { ok: true, .. })
    ));

    let unknown = json!({
        "type": "command",
        "interactionId": "44",
        "user": { "id": "u1" },
        "command": { "name": "dance" }
    })
    .to_string();
    match handle_line(&bot, &unknown, now) {
        Some(Outbound::Reply { ok, content, .. }) => {
            assert!(!ok);
            assert!(content.contains("Unknown command: dance"));
        }
        other => panic!("unexpected {other:?}"),
    }

    assert_eq!(handle_line(&bot, "not json", now), None);
    assert_eq!(handle_line(&bot, "   ", now), None);

    let voice = json!({ "type": "voiceStateUpdate", "userId": "u1", "after": "general" }).to_string();
    assert_eq!(handle_line(&bot, &voice, now), None);
}

#[tokio::test]
async fn test_bridge_round_trip_over_streams() {
    let (_dir, bot, _) = bot(false);
    let input = concat!(
        r#"{"type":"command","interactionId":"1","user":{"id":"u1","displayName":"Ann"},"command":{"name":"clockin"}}"#,
        "\n",
        r#"{"type":"command","interactionId":"2","user":{"id":"u1"},"command":{"name":"status"}}"#,
        "\n",
    );

    let (tx, rx) = unbounded_channel();
    let (writer_end, mut reader_end) = tokio::io::duplex(64 * 1024);
    let writer = spawn_writer(rx, writer_end);

    let consumed = run_bridge(&bot, input.as_bytes(), &tx, std::future::pending())
        .await
        .unwrap();
    assert_eq!(consumed, 2);

    drop(tx);
    writer.await.unwrap().unwrap();

    let mut out = String::new();
    reader_end.read_to_string(&mut out).await.unwrap();
    let lines: Vec<serde_json::Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["type"], "reply");
    assert_eq!(lines[0]["interactionId"], "1");
    assert_eq!(lines[0]["ok"], true);
    assert!(lines[1]["content"].as_str().unwrap().starts_with("🟢 Clocked in"));
}

#[tokio::test]
async fn test_clock_in_when_already_in_voice_before_startup() {
    let (_dir, bot, roster) = bot(true);
    let now = ts("2024-01-01T09:00:00Z");

    // No voiceStateUpdate was ever seen for u1; the gateway reports the
    // channel along with the command.
    let line = json!({
        "type": "command",
        "interactionId": "7",
        "user": { "id": "u1", "displayName": "Ann" },
        "voiceChannel": "general",
        "command": { "name": "clockin" }
    })
    .to_string();

    assert_eq!(
        handle_line(&bot, &line, now),
        Some(Outbound::Reply {
            interaction_id: "7".into(),
            ok: true,
            content: "🟢 CLOCKED IN".into(),
        })
    );
    assert_eq!(roster.channel_of("u1").as_deref(), Some("general"));
}

#[tokio::test]
async fn test_command_voice_channel_counts_as_rejoin() {
    let (_dir, bot, roster) = bot(true);
    let t0 = ts("2024-01-01T09:00:00Z");

    assert_eq!(bot.observe_voice("u1", "general", t0), VoiceTransition::Joined);
    assert_eq!(bot.observe_voice("u1", "general", t0), VoiceTransition::Unchanged);
    bot.handle_command(&ann(), true, &Command::ClockIn, t0);

    roster.apply("u1", Some("general"), None);
    bot.presence().on_presence_lost("u1", t0);
    assert!(bot.presence().is_armed("u1"));

    assert_eq!(bot.observe_voice("u1", "focus", t0), VoiceTransition::Joined);
    assert!(!bot.presence().is_armed("u1"));
}
