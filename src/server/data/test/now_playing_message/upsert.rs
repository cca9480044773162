use super::*;

/// Tests creating a new now-playing message record.
///
/// Verifies that the repository creates a record when the guild has none yet.
///
/// Expected: Ok with new record created
#[tokio::test]
async fn creates_new_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::NowPlayingMessage)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = NowPlayingMessageRepository::new(db);
    let record = repo
        .upsert(UpsertNowPlayingMessageParam {
            guild_id: 111,
            channel_id: 222,
            message_id: 333,
        })
        .await?;

    assert_eq!(record.guild_id, "111");
    assert_eq!(record.channel_id, "222");
    assert_eq!(record.message_id, "333");
    assert_eq!(record.discord_ids()?, (222, 333));

    let stored = entity::prelude::NowPlayingMessage::find()
        .filter(entity::now_playing_message::Column::GuildId.eq("111"))
        .one(db)
        .await?;
    assert!(stored.is_some());

    Ok(())
}

/// Tests pointing an existing record at a new display message.
///
/// Verifies that upserting for the same guild updates the record in place rather
/// than adding a second one.
///
/// Expected: Ok with same record ID and one record for the guild
#[tokio::test]
async fn updates_existing_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::NowPlayingMessage)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = NowPlayingMessageRepository::new(db);
    let original = repo
        .upsert(UpsertNowPlayingMessageParam {
            guild_id: 111,
            channel_id: 222,
            message_id: 333,
        })
        .await?;

    tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

    let updated = repo
        .upsert(UpsertNowPlayingMessageParam {
            guild_id: 111,
            channel_id: 444,
            message_id: 555,
        })
        .await?;

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.channel_id, "444");
    assert_eq!(updated.message_id, "555");
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.updated_at > original.updated_at);

    let count = entity::prelude::NowPlayingMessage::find()
        .filter(entity::now_playing_message::Column::GuildId.eq("111"))
        .count(db)
        .await?;
    assert_eq!(count, 1);

    Ok(())
}

/// Tests that records of different guilds are independent.
///
/// Expected: Ok with one record per guild
#[tokio::test]
async fn keeps_guilds_separate() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::NowPlayingMessage)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let existing = factory::create_now_playing_message(db).await?;

    let repo = NowPlayingMessageRepository::new(db);
    repo.upsert(UpsertNowPlayingMessageParam {
        guild_id: existing.guild_id.parse::<u64>().unwrap() + 1,
        channel_id: 1,
        message_id: 2,
    })
    .await?;

    let count = entity::prelude::NowPlayingMessage::find().count(db).await?;
    assert_eq!(count, 2);

    Ok(())
}
