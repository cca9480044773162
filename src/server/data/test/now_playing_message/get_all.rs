use super::*;

/// Tests listing every remembered display.
///
/// Expected: Ok with all records in insertion order
#[tokio::test]
async fn returns_all_records() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::NowPlayingMessage)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let first = factory::create_now_playing_message(db).await?;
    let second = factory::create_now_playing_message(db).await?;

    let repo = NowPlayingMessageRepository::new(db);
    let records = repo.get_all().await?;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].guild_id, first.guild_id);
    assert_eq!(records[1].guild_id, second.guild_id);

    Ok(())
}

/// Tests listing with no records.
///
/// Expected: Ok with empty vector
#[tokio::test]
async fn returns_empty_when_no_records() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::NowPlayingMessage)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = NowPlayingMessageRepository::new(db);
    let records = repo.get_all().await?;

    assert!(records.is_empty());

    Ok(())
}
