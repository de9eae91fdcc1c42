use anyhow::Result;
use chrono::NaiveDate;
use sea_orm::{EntityTrait, PaginatorTrait, QueryFilter, ColumnTrait};

use super::setup_test_db;
use crate::{errors::ModelError, track, user};

#[tokio::test]
async fn test_user_create_and_find() -> Result<()> {
    let (_dir, db) = setup_test_db().await?;

    let created = user::create(&db, "alice", "alice@example.com", "$argon2id$fake").await?;
    assert!(created.id > 0);
    assert_eq!(created.username, "alice");
    assert!(created.picture.is_none());

    let by_id = user::find_by_id(&db, created.id).await?.expect("by id");
    assert_eq!(by_id, created);
    let by_email = user::find_by_email(&db, "alice@example.com").await?.expect("by email");
    assert_eq!(by_email.id, created.id);
    let by_name = user::find_by_username(&db, "alice").await?.expect("by username");
    assert_eq!(by_name.id, created.id);
    assert!(user::find_by_id(&db, created.id + 100).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_user_unique_email_is_conflict() -> Result<()> {
    let (_dir, db) = setup_test_db().await?;

    user::create(&db, "first", "dup@example.com", "hash").await?;
    let err = user::create(&db, "second", "dup@example.com", "hash").await.unwrap_err();
    assert!(matches!(err, ModelError::Conflict(_)), "got {err:?}");

    let err = user::create(&db, "first", "other@example.com", "hash").await.unwrap_err();
    assert!(matches!(err, ModelError::Conflict(_)), "got {err:?}");

    let n = user::Entity::find()
        .filter(user::Column::Email.eq("dup@example.com"))
        .count(&db)
        .await?;
    assert_eq!(n, 1);
    Ok(())
}

#[tokio::test]
async fn test_user_validation() -> Result<()> {
    let (_dir, db) = setup_test_db().await?;

    assert!(matches!(user::create(&db, "x", "x@example.com", "h").await, Err(ModelError::Validation(_))));
    assert!(matches!(user::create(&db, "valid", "not-an-email", "h").await, Err(ModelError::Validation(_))));
    assert!(matches!(user::create(&db, "valid", "v@example.com", " ").await, Err(ModelError::Validation(_))));

    assert!(user::validate_email("a@b.co").is_ok());
    assert!(user::validate_email("a@b").is_err());
    assert!(user::validate_email("@b.co").is_err());
    assert!(user::validate_email("a b@c.co").is_err());
    assert!(user::validate_username(&"z".repeat(20)).is_ok());
    assert!(user::validate_username(&"z".repeat(21)).is_err());
    Ok(())
}

#[tokio::test]
async fn test_user_picture_roundtrip() -> Result<()> {
    let (_dir, db) = setup_test_db().await?;

    let u = user::create(&db, "pic", "pic@example.com", "hash").await?;
    let updated = user::set_picture(&db, u.id, Some(vec![0x89, 0x50, 0x4e, 0x47])).await?;
    assert_eq!(updated.picture.as_deref(), Some(&[0x89, 0x50, 0x4e, 0x47][..]));

    let err = user::set_picture(&db, u.id + 1, None).await.unwrap_err();
    assert!(matches!(err, ModelError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn test_track_crud() -> Result<()> {
    let (_dir, db) = setup_test_db().await?;

    let created = track::create(
        &db,
        track::NewTrack {
            name: "Song A".into(),
            artist: "Artist B".into(),
            data: vec![1, 2, 3],
            cover: Some(vec![9, 9]),
            release_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        },
    )
    .await?;

    let found = track::find_by_id(&db, created.id).await?.expect("track");
    assert_eq!(found.name, "Song A");
    assert_eq!(found.artist, "Artist B");
    assert_eq!(found.data, vec![1, 2, 3]);
    assert_eq!(found.cover, Some(vec![9, 9]));
    assert_eq!(found.release_date, NaiveDate::from_ymd_opt(2024, 1, 1));

    let second = track::create(
        &db,
        track::NewTrack { name: "Song C".into(), artist: "D".into(), data: vec![0], ..Default::default() },
    )
    .await?;
    let all = track::list(&db).await?;
    assert_eq!(all.iter().map(|t| t.id).collect::<Vec<_>>(), vec![created.id, second.id]);

    let deleted = track::delete_by_id(&db, created.id).await?;
    assert_eq!(deleted.id, created.id);
    assert!(track::find_by_id(&db, created.id).await?.is_none());
    assert_eq!(track::count(&db).await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_track_delete_missing_is_not_found() -> Result<()> {
    let (_dir, db) = setup_test_db().await?;

    let kept = track::create(&db, track::NewTrack { name: "keep".into(), artist: "a".into(), data: vec![1], ..Default::default() }).await?;
    let err = track::delete_by_id(&db, kept.id + 42).await.unwrap_err();
    assert!(matches!(err, ModelError::NotFound(_)));
    assert_eq!(track::count(&db).await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_track_delete_all_keeps_table() -> Result<()> {
    let (_dir, db) = setup_test_db().await?;

    for i in 0..3 {
        track::create(&db, track::NewTrack { name: format!("t{i}"), artist: "a".into(), data: vec![i], ..Default::default() }).await?;
    }
    assert_eq!(track::delete_all(&db).await?, 3);
    assert!(track::list(&db).await?.is_empty());

    // still writable afterwards
    track::create(&db, track::NewTrack { name: "again".into(), artist: "a".into(), data: vec![7], ..Default::default() }).await?;
    assert_eq!(track::count(&db).await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_track_requires_name() -> Result<()> {
    let (_dir, db) = setup_test_db().await?;
    let err = track::create(&db, track::NewTrack { name: "  ".into(), ..Default::default() }).await.unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));
    Ok(())
}
