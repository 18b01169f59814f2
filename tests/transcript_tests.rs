use callscreen::session::{DurableTurn, Role, TranscriptLog, TranscriptWriter};

#[tokio::test]
async fn test_append_preserves_order_and_positions() {
    let log = TranscriptLog::new();

    log.append(Role::Agent, "Hi, I'm Carla").await;
    log.append(Role::Caller, "hello there").await;
    log.append(Role::Agent, "Great to meet you").await;

    let turns = log.snapshot().await;
    assert_eq!(turns.len(), 3);

    for (i, turn) in turns.iter().enumerate() {
        assert_eq!(turn.position, i);
    }

    assert_eq!(turns[0].role, Role::Agent);
    assert_eq!(turns[1].role, Role::Caller);
    assert_eq!(turns[1].text, "hello there");
    assert_eq!(turns[2].role, Role::Agent);
}

#[tokio::test]
async fn test_snapshot_is_a_copy() {
    let log = TranscriptLog::new();
    log.append(Role::Caller, "one").await;

    let before = log.snapshot().await;
    log.append(Role::Agent, "two").await;

    assert_eq!(before.len(), 1);
    assert_eq!(log.len().await, 2);
}

#[tokio::test]
async fn test_flush_writes_one_document_per_session() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let writer = TranscriptWriter::new(dir.path());

    let log = TranscriptLog::new();
    log.append(Role::Agent, "Hi, I'm Carla").await;
    log.append(Role::Caller, "yes I am ready").await;

    let path = writer.flush("MZ123", &log.snapshot().await)?;
    assert_eq!(path, dir.path().join("MZ123.json"));

    let raw = std::fs::read_to_string(&path)?;
    let records: Vec<DurableTurn> = serde_json::from_str(&raw)?;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].role, Role::Agent);
    assert_eq!(records[1].role, Role::Caller);
    assert_eq!(records[1].text, "yes I am ready");

    // The durable shape is exactly {role, text}, role lowercased.
    let values: Vec<serde_json::Value> = serde_json::from_str(&raw)?;
    assert_eq!(values[0]["role"], "agent");
    assert_eq!(values[1]["role"], "caller");

    Ok(())
}

#[tokio::test]
async fn test_flush_of_empty_transcript() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let writer = TranscriptWriter::new(dir.path());

    let path = writer.flush("MZ999", &[])?;
    let records: Vec<DurableTurn> = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    assert!(records.is_empty());

    Ok(())
}
