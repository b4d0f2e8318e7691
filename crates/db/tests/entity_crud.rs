//! Integration tests for the repository layer against a real database:
//! - User creation and unique email enforcement
//! - Track CRUD and filtered listing
//! - Session lifecycle (create, validity window, delete)
//! - Playback progress upsert semantics
//! - Bookmark owner scoping

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use lingopod_core::error::CoreError;
use sqlx::PgPool;

use lingopod_db::models::activity::CreateBookmark;
use lingopod_db::models::collection::{CreateCollection, UpdateCollection};
use lingopod_db::models::track::{CreateAudioTrack, TrackFilters};
use lingopod_db::models::user::CreateUser;
use lingopod_db::repositories::{
    BookmarkRepo, CollectionRepo, ProgressRepo, SessionRepo, TrackRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        name: "Test User".to_string(),
        password_hash: Some("$argon2id$fake".to_string()),
    }
}

fn new_track(title: &str, object_key: &str) -> CreateAudioTrack {
    CreateAudioTrack {
        title: title.to_string(),
        description: String::new(),
        language_code: "DE".to_string(),
        level: "B1".to_string(),
        duration_ms: 90_000,
        minio_bucket: "audio".to_string(),
        minio_object_key: object_key.to_string(),
        cover_image_url: None,
        uploader_id: None,
        is_public: true,
        tags: vec![],
    }
}

fn new_collection(owner_id: lingopod_core::types::DbId, title: &str) -> CreateCollection {
    CreateCollection {
        title: title.to_string(),
        description: String::new(),
        owner_id,
        collection_type: "PLAYLIST".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Test: Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_find_user(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("anna@example.com"))
        .await
        .unwrap();
    assert_eq!(user.email, "anna@example.com");

    let found = UserRepo::find_by_email(&pool, "anna@example.com")
        .await
        .unwrap()
        .expect("user should exist");
    assert_eq!(found.id, user.id);

    let by_id = UserRepo::find_by_id(&pool, user.id).await.unwrap();
    assert!(by_id.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_rejected(pool: PgPool) {
    UserRepo::create(&pool, &new_user("dup@example.com"))
        .await
        .unwrap();
    let result = UserRepo::create(&pool, &new_user("dup@example.com")).await;
    assert_matches!(result, Err(CoreError::Conflict(_)));
}

// ---------------------------------------------------------------------------
// Test: Tracks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_track_crud(pool: PgPool) {
    let track = TrackRepo::create(&pool, &new_track("Morgenroutine", "user-uploads/x/a.mp3"))
        .await
        .unwrap();
    assert_eq!(track.title, "Morgenroutine");
    assert_eq!(track.duration_ms, 90_000);

    let found = TrackRepo::find_by_id(&pool, track.id)
        .await
        .unwrap()
        .expect("track should exist");
    assert_eq!(found.minio_object_key, "user-uploads/x/a.mp3");

    assert!(TrackRepo::delete(&pool, track.id).await.unwrap());
    assert!(TrackRepo::find_by_id(&pool, track.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_object_key_rejected(pool: PgPool) {
    TrackRepo::create(&pool, &new_track("First", "user-uploads/x/same.mp3"))
        .await
        .unwrap();
    let result = TrackRepo::create(&pool, &new_track("Second", "user-uploads/x/same.mp3")).await;
    assert_matches!(result, Err(CoreError::Conflict(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_track_listing_filters(pool: PgPool) {
    let mut de = new_track("Wortschatz am Morgen", "user-uploads/x/de.mp3");
    de.language_code = "DE".to_string();
    de.level = "A2".to_string();
    TrackRepo::create(&pool, &de).await.unwrap();

    let mut fr = new_track("Vocabulaire du soir", "user-uploads/x/fr.mp3");
    fr.language_code = "FR".to_string();
    fr.level = "B2".to_string();
    TrackRepo::create(&pool, &fr).await.unwrap();

    let mut hidden = new_track("Privat", "user-uploads/x/private.mp3");
    hidden.is_public = false;
    TrackRepo::create(&pool, &hidden).await.unwrap();

    // No filters: only public tracks.
    let (all, total) = TrackRepo::list(&pool, &TrackFilters::default(), 50, 0)
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(all.len(), 2);

    // Language filter.
    let filters = TrackFilters {
        language_code: Some("FR".to_string()),
        ..Default::default()
    };
    let (french, total) = TrackRepo::list(&pool, &filters, 50, 0).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(french[0].title, "Vocabulaire du soir");

    // Title substring, case-insensitive.
    let filters = TrackFilters {
        query: Some("wortschatz".to_string()),
        ..Default::default()
    };
    let (matched, _) = TrackRepo::list(&pool, &filters, 50, 0).await.unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].level, "A2");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_existing_ids(pool: PgPool) {
    let a = TrackRepo::create(&pool, &new_track("A", "user-uploads/x/1.mp3"))
        .await
        .unwrap();
    let b = TrackRepo::create(&pool, &new_track("B", "user-uploads/x/2.mp3"))
        .await
        .unwrap();
    let phantom = uuid::Uuid::new_v4();

    let existing = TrackRepo::list_existing_ids(&pool, &[a.id, phantom, b.id])
        .await
        .unwrap();
    assert_eq!(existing.len(), 2);
    assert!(existing.contains(&a.id));
    assert!(existing.contains(&b.id));
    assert!(!existing.contains(&phantom));

    let none = TrackRepo::list_existing_ids(&pool, &[]).await.unwrap();
    assert!(none.is_empty());
}

// ---------------------------------------------------------------------------
// Test: Sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_session_lifecycle(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("sess@example.com"))
        .await
        .unwrap();

    let expires = Utc::now() + Duration::days(30);
    SessionRepo::create(&pool, user.id, "hash-live", expires)
        .await
        .unwrap();

    let found = SessionRepo::find_valid(&pool, "hash-live").await.unwrap();
    assert!(found.is_some());

    // Expired sessions are invisible to find_valid.
    let past = Utc::now() - Duration::hours(1);
    SessionRepo::create(&pool, user.id, "hash-stale", past)
        .await
        .unwrap();
    assert!(SessionRepo::find_valid(&pool, "hash-stale")
        .await
        .unwrap()
        .is_none());

    assert!(SessionRepo::delete(&pool, "hash-live").await.unwrap());
    assert!(SessionRepo::find_valid(&pool, "hash-live")
        .await
        .unwrap()
        .is_none());
    assert!(!SessionRepo::delete(&pool, "hash-live").await.unwrap());
}

// ---------------------------------------------------------------------------
// Test: Playback progress upsert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_progress_upsert_overwrites(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("listener@example.com"))
        .await
        .unwrap();
    let track = TrackRepo::create(&pool, &new_track("Episode 1", "user-uploads/x/e1.mp3"))
        .await
        .unwrap();

    let first = ProgressRepo::upsert(&pool, user.id, track.id, 12_000)
        .await
        .unwrap();
    assert_eq!(first.progress_ms, 12_000);

    let second = ProgressRepo::upsert(&pool, user.id, track.id, 48_000)
        .await
        .unwrap();
    assert_eq!(second.progress_ms, 48_000);

    let (rows, total) = ProgressRepo::list_by_user(&pool, user.id, 50, 0)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(rows[0].progress_ms, 48_000);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_progress_unknown_track_rejected(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("lost@example.com"))
        .await
        .unwrap();
    let result = ProgressRepo::upsert(&pool, user.id, uuid::Uuid::new_v4(), 1_000).await;
    assert_matches!(result, Err(CoreError::InvalidArgument(_)));
}

// ---------------------------------------------------------------------------
// Test: Bookmarks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bookmark_owner_scoping(pool: PgPool) {
    let owner = UserRepo::create(&pool, &new_user("owner@example.com"))
        .await
        .unwrap();
    let other = UserRepo::create(&pool, &new_user("other@example.com"))
        .await
        .unwrap();
    let track = TrackRepo::create(&pool, &new_track("Episode 2", "user-uploads/x/e2.mp3"))
        .await
        .unwrap();

    let bookmark = BookmarkRepo::create(
        &pool,
        owner.id,
        &CreateBookmark {
            track_id: track.id,
            timestamp_ms: 30_000,
            note: "tricky verb".to_string(),
        },
    )
    .await
    .unwrap();

    // Another user cannot delete it.
    assert!(!BookmarkRepo::delete(&pool, bookmark.id, other.id)
        .await
        .unwrap());
    let (rows, _) = BookmarkRepo::list_by_user(&pool, owner.id, Some(track.id), 50, 0)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].note, "tricky verb");

    // The owner can.
    assert!(BookmarkRepo::delete(&pool, bookmark.id, owner.id)
        .await
        .unwrap());
    let (rows, total) = BookmarkRepo::list_by_user(&pool, owner.id, None, 50, 0)
        .await
        .unwrap();
    assert!(rows.is_empty());
    assert_eq!(total, 0);
}

// ---------------------------------------------------------------------------
// Test: Collection metadata
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_collection_metadata_and_ownership(pool: PgPool) {
    let owner = UserRepo::create(&pool, &new_user("curator@example.com"))
        .await
        .unwrap();
    let stranger = UserRepo::create(&pool, &new_user("stranger@example.com"))
        .await
        .unwrap();

    let collection = CollectionRepo::create(&pool, &new_collection(owner.id, "Beginner German"))
        .await
        .unwrap();
    assert_eq!(collection.collection_type, "PLAYLIST");

    // Owner-scoped update succeeds.
    let updated = CollectionRepo::update_metadata(
        &pool,
        collection.id,
        owner.id,
        &UpdateCollection {
            title: "Beginner German (revised)".to_string(),
            description: Some("Slow dialogues".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.unwrap().description, "Slow dialogues");

    // A non-owner matches no row.
    let denied = CollectionRepo::update_metadata(
        &pool,
        collection.id,
        stranger.id,
        &UpdateCollection {
            title: "Hijacked".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();
    assert!(denied.is_none());
    assert!(CollectionRepo::exists(&pool, collection.id).await.unwrap());

    assert!(CollectionRepo::delete(&pool, collection.id).await.unwrap());
    assert!(!CollectionRepo::exists(&pool, collection.id).await.unwrap());
}
