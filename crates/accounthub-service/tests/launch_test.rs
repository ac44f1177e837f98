//! Integration tests for campaign data and launch gating.

mod helpers;

use accounthub_core::ErrorKind;
use accounthub_core::types::FailureReason;
use accounthub_entity::campaign::CampaignMode;

use helpers::{TestApp, usernames};

#[tokio::test]
async fn test_missing_usernames_reported_before_chat() {
    let app = TestApp::new();
    let folder = app.top("Leads").await;
    app.account(&folder, 20).await;

    let err = app
        .folders
        .launch_inviting(&app.ctx(), folder.id)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotReady(FailureReason::MissingUsernames));
    assert_eq!(err.message, "First specify the usernames");
}

#[tokio::test]
async fn test_inviting_needs_five_usernames_per_account() {
    let app = TestApp::new();
    let ctx = app.ctx();
    let folder = app.top("Leads").await;
    for _ in 0..4 {
        app.account(&folder, 20).await;
    }
    app.folders
        .change_chat(&ctx, folder.id, "@sales_chat")
        .await
        .unwrap();

    app.folders
        .change_usernames(&ctx, folder.id, &usernames(19))
        .await
        .unwrap();
    let err = app
        .folders
        .launch_inviting(&ctx, folder.id)
        .await
        .unwrap_err();
    assert_eq!(
        err.readiness_reason(),
        Some(FailureReason::InsufficientUsernamesForInviting)
    );

    app.folders
        .change_usernames(&ctx, folder.id, &usernames(20))
        .await
        .unwrap();
    let launched = app.folders.launch_inviting(&ctx, folder.id).await.unwrap();
    assert_eq!(launched.campaign, Some(CampaignMode::Inviting));
}

#[tokio::test]
async fn test_launch_flags_only_paced_accounts() {
    let app = TestApp::new();
    let ctx = app.ctx();
    let folder = app.top("Mailing").await;
    let paced = app.account(&folder, 25).await;
    let idle = app.account(&folder, 0).await;
    app.folders
        .change_message(&ctx, folder.id, "Hello!")
        .await
        .unwrap();
    app.folders
        .change_groups(&ctx, folder.id, &["@group_one".to_string()])
        .await
        .unwrap();

    app.folders
        .launch_mailing_groups(&ctx, folder.id)
        .await
        .unwrap();

    assert!(app.accounts.get_account(&ctx, paced.id).await.unwrap().launch);
    assert!(!app.accounts.get_account(&ctx, idle.id).await.unwrap().launch);
}

#[tokio::test]
async fn test_mailing_groups_requires_message_then_groups() {
    let app = TestApp::new();
    let ctx = app.ctx();
    let folder = app.top("Groups").await;
    app.account(&folder, 30).await;

    let err = app
        .folders
        .launch_mailing_groups(&ctx, folder.id)
        .await
        .unwrap_err();
    assert_eq!(err.readiness_reason(), Some(FailureReason::MissingMessage));

    app.folders
        .change_message(&ctx, folder.id, "Hi there")
        .await
        .unwrap();
    let err = app
        .folders
        .launch_mailing_groups(&ctx, folder.id)
        .await
        .unwrap_err();
    assert_eq!(err.readiness_reason(), Some(FailureReason::MissingGroups));
}

#[tokio::test]
async fn test_blank_values_do_not_count() {
    let app = TestApp::new();
    let ctx = app.ctx();
    let folder = app.top("Blank").await;
    app.account(&folder, 30).await;

    let updated = app
        .folders
        .change_usernames(
            &ctx,
            folder.id,
            &["  ".to_string(), String::new(), "@real".to_string()],
        )
        .await
        .unwrap();
    assert_eq!(updated.usernames, ["@real"]);

    app.folders.change_message(&ctx, folder.id, "   ").await.unwrap();
    let err = app
        .folders
        .launch_mailing_usernames(&ctx, folder.id)
        .await
        .unwrap_err();
    assert_eq!(
        err.readiness_reason(),
        Some(FailureReason::InsufficientUsernamesForMailing)
    );

    app.folders
        .change_usernames(&ctx, folder.id, &usernames(5))
        .await
        .unwrap();
    let err = app
        .folders
        .check_readiness(&ctx, folder.id, CampaignMode::MailingUsernames)
        .await
        .unwrap_err();
    assert_eq!(err.readiness_reason(), Some(FailureReason::MissingMessage));
}

#[tokio::test]
async fn test_unpaced_folder_cannot_launch() {
    let app = TestApp::new();
    let ctx = app.ctx();
    let folder = app.top("Idle").await;
    app.account(&folder, 0).await;
    app.folders
        .change_message(&ctx, folder.id, "Hello")
        .await
        .unwrap();
    app.folders
        .change_groups(&ctx, folder.id, &["@g".to_string()])
        .await
        .unwrap();

    let err = app
        .folders
        .launch(&ctx, folder.id, CampaignMode::MailingGroups)
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::NotReady(FailureReason::NoAccountsConfigured)
    );

    let folder = app.folders.get_folder(&ctx, folder.id).await.unwrap();
    assert_eq!(folder.campaign, None);
}
