mod support;

use callscreen::session::{LifecycleState, Role, SessionFlow};
use support::{
    build_session, event, finalized_result, media_event, start_event, stop_event, MemoryStore,
    RecordingSink, ScriptedModel,
};

#[tokio::test]
async fn test_media_before_start_is_dropped() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let model = ScriptedModel::new([]);
    let sink = RecordingSink::new();
    let store = MemoryStore::new();
    let session = build_session(model, store.clone(), sink.clone(), dir.path());

    let flow = session.process_event(event(&media_event("QUJD"))).await;

    assert_eq!(flow, SessionFlow::Continue);
    assert_eq!(session.state(), LifecycleState::AwaitingStart);
    assert!(sink.frames.lock().await.is_empty());
    assert!(session.transcript_snapshot().await.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_full_call_scenario() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let model = ScriptedModel::new([
        Some("Hi, I'm Carla from Coca-Cola. What's your name?"),
        Some("Great, let's begin."),
        Some("Final score: 9. Strong communication."),
    ]);
    let sink = RecordingSink::new();
    let store = MemoryStore::new();
    let session = build_session(model, store.clone(), sink.clone(), dir.path());

    assert_eq!(session.state(), LifecycleState::AwaitingStart);

    // start binds the stream and runs the bootstrap greeting
    assert_eq!(
        session.process_event(event(&start_event("S1"))).await,
        SessionFlow::Continue
    );
    assert_eq!(session.state(), LifecycleState::Active);
    assert_eq!(session.stream_sid(), Some("S1"));

    // caller audio is forwarded unmodified
    assert_eq!(
        session.process_event(event(&media_event("QUJD"))).await,
        SessionFlow::Continue
    );
    assert_eq!(*sink.frames.lock().await, vec![b"ABC".to_vec()]);

    // finalized recognition drives one caller→agent turn cycle
    session
        .handle_recognition_text(&finalized_result(&["yes", "I", "am", "ready"]))
        .await;

    // stop finalizes and closes
    assert_eq!(
        session.process_event(event(&stop_event())).await,
        SessionFlow::End
    );
    session.finalize().await;
    assert_eq!(session.state(), LifecycleState::Closed);

    let turns = session.transcript_snapshot().await;
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[0].role, Role::Agent);
    assert_eq!(turns[1].role, Role::Caller);
    assert_eq!(turns[1].text, "yes I am ready");
    assert_eq!(turns[2].role, Role::Agent);
    assert_eq!(turns[2].text, "Great, let's begin.");

    // durable transcript written once, under the stream id
    assert!(dir.path().join("S1.json").exists());

    // scoring handoff wrote the candidate record
    let writes = store.writes.lock().await;
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].candidate_uid, "cand-42");
    assert_eq!(writes[0].score, 9);
    assert!(writes[0].completed);

    // the channel was closed as part of teardown
    assert!(*sink.closed.lock().await);

    Ok(())
}

#[tokio::test]
async fn test_duplicate_stops_trigger_exactly_one_finalize() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let model = ScriptedModel::new([Some("Hello"), Some("Score: 7")]);
    let store = MemoryStore::new();
    let session = build_session(model, store.clone(), RecordingSink::new(), dir.path());

    session.process_event(event(&start_event("S1"))).await;

    assert_eq!(
        session.process_event(event(&stop_event())).await,
        SessionFlow::End
    );
    session.finalize().await;

    // A second stop races the first; the transition guard drops it.
    assert_eq!(
        session.process_event(event(&stop_event())).await,
        SessionFlow::End
    );
    session.finalize().await;

    assert_eq!(session.state(), LifecycleState::Closed);
    assert_eq!(store.writes.lock().await.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_duplicate_start_fails_the_session() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let model = ScriptedModel::new([Some("Hello"), Some("Score: 5")]);
    let store = MemoryStore::new();
    let session = build_session(model, store.clone(), RecordingSink::new(), dir.path());

    assert_eq!(
        session.process_event(event(&start_event("S1"))).await,
        SessionFlow::Continue
    );
    assert_eq!(
        session.process_event(event(&start_event("S2"))).await,
        SessionFlow::End
    );

    // Identity is immutable after assignment.
    assert_eq!(session.stream_sid(), Some("S1"));

    // The failed session still finalizes exactly once.
    session.finalize().await;
    assert_eq!(session.state(), LifecycleState::Closed);
    assert_eq!(store.writes.lock().await.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_session_that_never_started_closes_without_finalize() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let model = ScriptedModel::new([]);
    let store = MemoryStore::new();
    let session = build_session(model, store.clone(), RecordingSink::new(), dir.path());

    session.finalize().await;

    assert_eq!(session.state(), LifecycleState::Closed);
    assert!(store.writes.lock().await.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_events_after_close_are_dropped() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let model = ScriptedModel::new([Some("Hello"), Some("Score: 5")]);
    let sink = RecordingSink::new();
    let session = build_session(model, MemoryStore::new(), sink.clone(), dir.path());

    session.process_event(event(&start_event("S1"))).await;
    session.finalize().await;

    let frames_at_close = sink.frames.lock().await.len();
    session.process_event(event(&media_event("QUJD"))).await;

    assert_eq!(sink.frames.lock().await.len(), frames_at_close);
    assert_eq!(session.state(), LifecycleState::Closed);

    Ok(())
}

#[tokio::test]
async fn test_model_failure_skips_turn_and_session_recovers() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let model = ScriptedModel::new([
        Some("Hi, I'm Carla"),
        None, // first turn's completion fails
        Some("Thanks, that helps."),
        Some("Score: 6"),
    ]);
    let store = MemoryStore::new();
    let session = build_session(model, store.clone(), RecordingSink::new(), dir.path());

    session.process_event(event(&start_event("S1"))).await;

    session
        .handle_recognition_text(&finalized_result(&["first", "answer"]))
        .await;

    // Failed turn: caller utterance kept, no agent reply, still active.
    assert_eq!(session.state(), LifecycleState::Active);
    let turns = session.transcript_snapshot().await;
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[1].role, Role::Caller);

    session
        .handle_recognition_text(&finalized_result(&["second", "answer"]))
        .await;

    // Recovery: no duplicate or missing turns.
    let turns = session.transcript_snapshot().await;
    assert_eq!(turns.len(), 4);
    assert_eq!(turns[2].text, "second answer");
    assert_eq!(turns[3].role, Role::Agent);
    assert_eq!(turns[3].text, "Thanks, that helps.");

    session.process_event(event(&stop_event())).await;
    session.finalize().await;
    assert_eq!(store.writes.lock().await.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_replaying_the_same_events_yields_an_identical_transcript() -> anyhow::Result<()> {
    let script = || {
        ScriptedModel::new([
            Some("Hi, I'm Carla"),
            Some("Tell me more."),
            Some("Noted, thank you."),
            Some("Score: 8"),
        ])
    };

    let mut transcripts = Vec::new();

    for _ in 0..2 {
        let dir = tempfile::tempdir()?;
        let session = build_session(
            script(),
            MemoryStore::new(),
            RecordingSink::new(),
            dir.path(),
        );

        session.process_event(event(&start_event("S1"))).await;
        session.process_event(event(&media_event("QUJD"))).await;
        session
            .handle_recognition_text(&finalized_result(&["I", "built", "services"]))
            .await;
        session
            .handle_recognition_text(&finalized_result(&["mostly", "in", "payments"]))
            .await;
        session.process_event(event(&stop_event())).await;
        session.finalize().await;

        let turns: Vec<(Role, String)> = session
            .transcript_snapshot()
            .await
            .into_iter()
            .map(|t| (t.role, t.text))
            .collect();
        transcripts.push(turns);
    }

    assert_eq!(transcripts[0], transcripts[1]);

    Ok(())
}

#[tokio::test]
async fn test_malformed_events_do_not_kill_the_call() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let model = ScriptedModel::new([Some("Hello")]);
    let sink = RecordingSink::new();
    let session = build_session(model, MemoryStore::new(), sink.clone(), dir.path());

    session.process_event(event(&start_event("S1"))).await;

    // Undecodable payload is dropped; the session stays active.
    let flow = session
        .process_event(event(&media_event("!!not-base64!!")))
        .await;
    assert_eq!(flow, SessionFlow::Continue);
    assert_eq!(session.state(), LifecycleState::Active);
    assert!(sink.frames.lock().await.is_empty());

    // The next well-formed frame goes through.
    session.process_event(event(&media_event("QUJD"))).await;
    assert_eq!(sink.frames.lock().await.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_media_clock_never_moves_backward() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let model = ScriptedModel::new([Some("Hello")]);
    let session = build_session(model, MemoryStore::new(), RecordingSink::new(), dir.path());

    session.process_event(event(&start_event("S1"))).await;

    let timestamped = |ts: u64| {
        event(&format!(
            r#"{{"event":"media","media":{{"payload":"QUJD","timestamp":"{ts}"}}}}"#
        ))
    };

    session.process_event(timestamped(100)).await;
    session.process_event(timestamped(40)).await; // out of order
    session.process_event(timestamped(100)).await; // duplicate

    let stats = session.stats().await;
    assert_eq!(stats.media_clock_ms, 100);
    assert_eq!(stats.frames_relayed, 3);
    assert_eq!(stats.state, "active");
    assert_eq!(stats.stream_sid.as_deref(), Some("S1"));

    Ok(())
}
