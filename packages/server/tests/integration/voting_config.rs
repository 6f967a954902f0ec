use chrono::{Duration, Utc};
use ::common::VotingConfig;
use serde_json::json;

use crate::common::{TestApp, routes};

mod voting_window {
    use super::*;

    #[tokio::test]
    async fn no_window_reads_as_not_found() {
        let app = TestApp::spawn().await;
        let user = app.create_authenticated_user("alice").await;

        let res = app.get_with_token(routes::ACTIVE_VOTING_CONFIG, &user.token).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn opened_window_becomes_the_active_one() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let id = app.open_voting_window(&admin.token).await;

        let res = app.get_with_token(routes::ACTIVE_VOTING_CONFIG, &admin.token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], id);
        assert_eq!(res.body["is_active"], true);
    }

    #[tokio::test]
    async fn opening_a_window_supersedes_the_previous_one() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let first = app.open_voting_window(&admin.token).await;
        let second = app.open_voting_window(&admin.token).await;
        assert_ne!(first, second);

        let res = app.get_with_token(routes::ACTIVE_VOTING_CONFIG, &admin.token).await;

        assert_eq!(res.body["id"], second);
    }

    #[tokio::test]
    async fn end_before_start_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let now = Utc::now();

        let res = app
            .post_with_token(
                routes::VOTING_CONFIG,
                &json!({"start_time": now, "end_time": now - Duration::minutes(1)}),
                &admin.token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn closing_ends_the_window_but_keeps_it_readable() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let id = app.open_voting_window(&admin.token).await;
        let before = Utc::now();

        let res = app
            .post_with_token(routes::CLOSE_VOTING_CONFIG, &json!({}), &admin.token)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["id"], id);

        let res = app.get_with_token(routes::ACTIVE_VOTING_CONFIG, &admin.token).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], id);
        assert_eq!(res.body["is_active"], true);

        let config: VotingConfig = serde_json::from_value(res.body).unwrap();
        assert!(config.end_time >= before);
        assert!(config.end_time <= Utc::now());
        assert!(config.results_available_at(Utc::now() + Duration::seconds(1)));
    }

    #[tokio::test]
    async fn closing_an_ended_window_keeps_its_bounds() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let now = Utc::now();
        let (start, end) = (now - Duration::hours(2), now - Duration::hours(1));
        let res = app
            .post_with_token(
                routes::VOTING_CONFIG,
                &json!({"start_time": start, "end_time": end}),
                &admin.token,
            )
            .await;
        assert_eq!(res.status, 201);

        let res = app
            .post_with_token(routes::CLOSE_VOTING_CONFIG, &json!({}), &admin.token)
            .await;
        assert_eq!(res.status, 200);

        let res = app.get_with_token(routes::ACTIVE_VOTING_CONFIG, &admin.token).await;
        let config: VotingConfig = serde_json::from_value(res.body).unwrap();
        assert!((config.end_time - end).num_milliseconds().abs() < 1);
        assert!(config.results_available_at(Utc::now()));
    }

    #[tokio::test]
    async fn closing_without_a_window_is_not_found() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;

        let res = app
            .post_with_token(routes::CLOSE_VOTING_CONFIG, &json!({}), &admin.token)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn regular_user_cannot_close_a_window() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        app.open_voting_window(&admin.token).await;
        let user = app.create_authenticated_user("alice").await;

        let res = app
            .post_with_token(routes::CLOSE_VOTING_CONFIG, &json!({}), &user.token)
            .await;

        assert_eq!(res.status, 403);
    }

    #[tokio::test]
    async fn regular_user_cannot_open_a_window() {
        let app = TestApp::spawn().await;
        let user = app.create_authenticated_user("alice").await;

        let now = Utc::now();
        let res = app
            .post_with_token(
                routes::VOTING_CONFIG,
                &json!({"start_time": now, "end_time": now + Duration::hours(1)}),
                &user.token,
            )
            .await;

        assert_eq!(res.status, 403);
    }
}
