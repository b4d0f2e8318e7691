//! End-to-end tests for the public catalog, playback progress, and bookmarks.

mod common;

use common::{body_json, build_test_app, register_user, send_json};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use lingopod_db::models::track::CreateAudioTrack;
use lingopod_db::repositories::TrackRepo;

async fn seed_track(pool: &PgPool, title: &str, language: &str, public: bool) -> Uuid {
    TrackRepo::create(
        pool,
        &CreateAudioTrack {
            title: title.to_string(),
            description: String::new(),
            language_code: language.to_string(),
            level: "B1".to_string(),
            duration_ms: 45_000,
            minio_bucket: "audio".to_string(),
            minio_object_key: format!("user-uploads/seed/{}.mp3", Uuid::new_v4()),
            cover_image_url: None,
            uploader_id: None,
            is_public: public,
            tags: vec![],
        },
    )
    .await
    .unwrap()
    .id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_catalog_listing_and_filters(pool: PgPool) {
    let app = build_test_app(pool.clone());

    seed_track(&pool, "Deutsch am Morgen", "DE", true).await;
    seed_track(&pool, "Matin en France", "FR", true).await;
    seed_track(&pool, "Hidden", "DE", false).await;

    // The catalog is public: no token needed, private tracks excluded.
    let response = send_json(&app, "GET", "/api/v1/tracks", None, None).await;
    assert_eq!(response.status(), 200);
    let json = body_json(response).await;
    assert_eq!(json["total"], 2);

    // Filters are canonicalized, so lowercase input matches.
    let response = send_json(&app, "GET", "/api/v1/tracks?language_code=fr", None, None).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["title"], "Matin en France");

    // An invalid filter is a 400, not an empty list.
    let response = send_json(&app, "GET", "/api/v1/tracks?level=WIZARD", None, None).await;
    assert_eq!(response.status(), 400);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_track_get_includes_stream_url(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let id = seed_track(&pool, "Streamable", "DE", true).await;

    let response = send_json(&app, "GET", &format!("/api/v1/tracks/{id}"), None, None).await;
    assert_eq!(response.status(), 200);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Streamable");
    let stream_url = json["data"]["stream_url"].as_str().unwrap();
    assert!(stream_url.contains("user-uploads/seed/"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_private_track_hidden_from_others(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (token, user_id) = register_user(&app, "owner@example.com").await;
    let (other_token, _) = register_user(&app, "other@example.com").await;

    // Private track owned by the first user.
    let track = TrackRepo::create(
        &pool,
        &CreateAudioTrack {
            title: "Secret".to_string(),
            description: String::new(),
            language_code: "DE".to_string(),
            level: "".to_string(),
            duration_ms: 1_000,
            minio_bucket: "audio".to_string(),
            minio_object_key: format!("user-uploads/{user_id}/secret.mp3"),
            cover_image_url: None,
            uploader_id: Some(user_id),
            is_public: false,
            tags: vec![],
        },
    )
    .await
    .unwrap();

    // Anonymous and foreign requests both get 404, not 403, so the
    // track's existence is not leaked.
    let uri = format!("/api/v1/tracks/{}", track.id);
    let response = send_json(&app, "GET", &uri, None, None).await;
    assert_eq!(response.status(), 404);
    let response = send_json(&app, "GET", &uri, Some(&other_token), None).await;
    assert_eq!(response.status(), 404);

    // The uploader sees it.
    let response = send_json(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(response.status(), 200);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_only_uploader_deletes_track(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (token, user_id) = register_user(&app, "owner@example.com").await;
    let (other_token, _) = register_user(&app, "other@example.com").await;

    let track = TrackRepo::create(
        &pool,
        &CreateAudioTrack {
            title: "Mine".to_string(),
            description: String::new(),
            language_code: "DE".to_string(),
            level: "".to_string(),
            duration_ms: 1_000,
            minio_bucket: "audio".to_string(),
            minio_object_key: format!("user-uploads/{user_id}/mine.mp3"),
            cover_image_url: None,
            uploader_id: Some(user_id),
            is_public: true,
            tags: vec![],
        },
    )
    .await
    .unwrap();

    let uri = format!("/api/v1/tracks/{}", track.id);
    let response = send_json(&app, "DELETE", &uri, Some(&other_token), None).await;
    assert_eq!(response.status(), 403);

    let response = send_json(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(response.status(), 204);
    assert!(TrackRepo::find_by_id(&pool, track.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_progress_roundtrip(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (token, _) = register_user(&app, "listener@example.com").await;
    let track = seed_track(&pool, "Episode", "ES", true).await;

    let uri = format!("/api/v1/progress/{track}");

    let response = send_json(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "progress_ms": 15000 })),
    )
    .await;
    assert_eq!(response.status(), 200);

    // Overwrite wins.
    let response = send_json(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "progress_ms": 42000 })),
    )
    .await;
    assert_eq!(response.status(), 200);
    let json = body_json(response).await;
    assert_eq!(json["data"]["progress_ms"], 42000);

    let response = send_json(&app, "GET", &uri, Some(&token), None).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["progress_ms"], 42000);

    // Negative progress is rejected.
    let response = send_json(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "progress_ms": -1 })),
    )
    .await;
    assert_eq!(response.status(), 400);

    // History lists the single row.
    let response = send_json(&app, "GET", "/api/v1/progress", Some(&token), None).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bookmark_lifecycle(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (token, _) = register_user(&app, "reader@example.com").await;
    let (other_token, _) = register_user(&app, "other@example.com").await;
    let track = seed_track(&pool, "Episode", "ES", true).await;

    let response = send_json(
        &app,
        "POST",
        "/api/v1/bookmarks",
        Some(&token),
        Some(json!({
            "track_id": track,
            "timestamp_ms": 30000,
            "note": "new idiom here",
        })),
    )
    .await;
    assert_eq!(response.status(), 201);
    let created = body_json(response).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let response = send_json(
        &app,
        "GET",
        &format!("/api/v1/bookmarks?track_id={track}"),
        Some(&token),
        None,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["note"], "new idiom here");

    // Someone else's delete is a 404 (scoped query matches nothing).
    let uri = format!("/api/v1/bookmarks/{id}");
    let response = send_json(&app, "DELETE", &uri, Some(&other_token), None).await;
    assert_eq!(response.status(), 404);

    let response = send_json(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(response.status(), 204);
}
