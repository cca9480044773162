use super::*;

/// Tests looking up the display of a guild with a record.
///
/// Expected: Ok(Some) with the stored IDs
#[tokio::test]
async fn returns_record_for_guild() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::NowPlayingMessage)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let record = factory::now_playing_message::NowPlayingMessageFactory::new(db)
        .guild_id("123")
        .channel_id("456")
        .message_id("789")
        .build()
        .await?;

    let repo = NowPlayingMessageRepository::new(db);
    let found = repo.get_by_guild_id("123").await?;

    assert!(found.is_some());
    let found = found.unwrap();
    assert_eq!(found.id, record.id);
    assert_eq!(found.channel_id, "456");
    assert_eq!(found.message_id, "789");

    Ok(())
}

/// Tests looking up a guild without a record.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_guild() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::NowPlayingMessage)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_now_playing_message(db).await?;

    let repo = NowPlayingMessageRepository::new(db);
    let found = repo.get_by_guild_id("999999999").await?;

    assert!(found.is_none());

    Ok(())
}
