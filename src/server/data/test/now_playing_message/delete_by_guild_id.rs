use super::*;

/// Tests deleting the record of one guild.
///
/// Verifies that only the targeted guild's record is removed.
///
/// Expected: Ok with the other guild's record kept
#[tokio::test]
async fn deletes_only_target_guild() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::NowPlayingMessage)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let target = factory::create_now_playing_message(db).await?;
    let other = factory::create_now_playing_message(db).await?;

    let repo = NowPlayingMessageRepository::new(db);
    repo.delete_by_guild_id(&target.guild_id).await?;

    assert!(repo.get_by_guild_id(&target.guild_id).await?.is_none());
    assert!(repo.get_by_guild_id(&other.guild_id).await?.is_some());

    Ok(())
}

/// Tests deleting a guild that has no record.
///
/// Expected: Ok without error
#[tokio::test]
async fn succeeds_without_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::NowPlayingMessage)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = NowPlayingMessageRepository::new(db);
    let result = repo.delete_by_guild_id("123").await;

    assert!(result.is_ok());

    Ok(())
}
