//! Integration tests for account management.

mod helpers;

use accounthub_core::ErrorKind;
use accounthub_core::types::{AccountId, FolderId};
use accounthub_entity::account::StatusBlock;
use accounthub_service::account::service::{CreateAccountRequest, UpdateAccountRequest};

use helpers::TestApp;

fn request(folder_id: FolderId, interval: Option<u8>) -> CreateAccountRequest {
    CreateAccountRequest {
        folder_id,
        name: "sales-bot".to_string(),
        phone: "+15550001111".to_string(),
        interval,
    }
}

#[tokio::test]
async fn test_create_assigns_random_interval() {
    let app = TestApp::new();
    let folder = app.top("Leads").await;

    let account = app
        .accounts
        .create_account(&app.ctx(), request(folder.id, None))
        .await
        .unwrap();

    assert!((15..=40).contains(&account.interval));
    assert_eq!(account.status_block, StatusBlock::Clean);
    assert!(!account.verify);
    assert!(!account.launch);
}

#[tokio::test]
async fn test_create_keeps_explicit_interval() {
    let app = TestApp::new();
    let folder = app.top("Leads").await;

    let account = app
        .accounts
        .create_account(&app.ctx(), request(folder.id, Some(0)))
        .await
        .unwrap();
    assert_eq!(account.interval, 0);
}

#[tokio::test]
async fn test_create_rejects_missing_folder_and_blank_name() {
    let app = TestApp::new();
    let ctx = app.ctx();

    let err = app
        .accounts
        .create_account(&ctx, request(FolderId::new(), None))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let folder = app.top("Leads").await;
    let mut blank = request(folder.id, None);
    blank.name = " ".to_string();
    let err = app.accounts.create_account(&ctx, blank).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_settings_lists_other_folders() {
    let app = TestApp::new();
    let ctx = app.ctx();
    let home = app.top("Home").await;
    let other = app.top("Other").await;
    let nested = app.child("Nested", &home).await;
    let account = app.account(&home, 20).await;
    app.folders
        .change_chat(&ctx, home.id, "@home_chat")
        .await
        .unwrap();

    let settings = app
        .accounts
        .settings(&ctx, home.id, account.id)
        .await
        .unwrap();

    assert_eq!(settings.folder_name, "Home");
    assert_eq!(settings.chat.as_deref(), Some("@home_chat"));
    let ids: Vec<_> = settings.move_targets.iter().map(|e| e.id).collect();
    assert_eq!(ids, [nested.id, other.id]);
}

#[tokio::test]
async fn test_settings_from_wrong_folder() {
    let app = TestApp::new();
    let home = app.top("Home").await;
    let elsewhere = app.top("Elsewhere").await;
    let account = app.account(&home, 20).await;

    let err = app
        .accounts
        .settings(&app.ctx(), elsewhere.id, account.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_update_moves_account() {
    let app = TestApp::new();
    let ctx = app.ctx();
    let home = app.top("Home").await;
    let other = app.top("Other").await;
    let account = app.account(&home, 20).await;

    let updated = app
        .accounts
        .update_account(
            &ctx,
            account.id,
            UpdateAccountRequest {
                name: Some("renamed".to_string()),
                folder_id: Some(other.id),
                launch: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "renamed");
    assert_eq!(updated.folder_id, other.id);
    assert_eq!(updated.interval, 20);
    assert!(updated.launch);
    assert_eq!(app.accounts.list_accounts(&ctx, home.id).await.unwrap().len(), 0);

    let err = app
        .accounts
        .update_account(
            &ctx,
            account.id,
            UpdateAccountRequest {
                folder_id: Some(FolderId::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_account() {
    let app = TestApp::new();
    let ctx = app.ctx();
    let home = app.top("Home").await;
    let account = app.account(&home, 20).await;

    app.accounts.delete_account(&ctx, account.id).await.unwrap();
    let err = app
        .accounts
        .delete_account(&ctx, account.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = app
        .accounts
        .get_account(&ctx, AccountId::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_generate_intervals_for_folder() {
    let app = TestApp::new();
    let ctx = app.ctx();
    let home = app.top("Home").await;
    let other = app.top("Other").await;
    for _ in 0..3 {
        app.account(&home, 0).await;
    }
    let untouched = app.account(&other, 0).await;

    let updated = app
        .accounts
        .generate_intervals(&ctx, home.id)
        .await
        .unwrap();

    assert_eq!(updated.len(), 3);
    assert!(updated.iter().all(|a| (15..=40).contains(&a.interval)));
    assert_eq!(
        app.accounts.get_account(&ctx, untouched.id).await.unwrap().interval,
        0
    );
}
