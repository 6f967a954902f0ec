use chrono::{Duration, Utc};
use futures::future::join_all;
use serde_json::json;

use crate::common::{TestApp, TestResponse, TestUser, routes};

mod casting {
    use super::*;

    #[tokio::test]
    async fn vote_increments_team_and_marks_profile() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let team_id = app.create_team(&admin.token, "Rustaceans").await;
        app.open_voting_window(&admin.token).await;
        let voter = app.create_authenticated_user("alice").await;

        let res = app.cast_vote(&voter, team_id).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["user_id"], voter.id);
        assert_eq!(res.body["team_id"], team_id);

        let profile = app.get_with_token(&routes::profile(voter.id), &voter.token).await;
        assert_eq!(profile.body["has_voted"], true);

        let teams = app.get_with_token(routes::TEAMS, &voter.token).await;
        assert_eq!(teams.body[0]["votes"], 1);
    }

    #[tokio::test]
    async fn second_vote_is_a_conflict_and_changes_nothing() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let a = app.create_team(&admin.token, "A").await;
        let b = app.create_team(&admin.token, "B").await;
        app.open_voting_window(&admin.token).await;
        let voter = app.create_authenticated_user("alice").await;

        assert_eq!(app.cast_vote(&voter, a).await.status, 201);
        let res = app.cast_vote(&voter, b).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "ALREADY_VOTED");

        let stats = app.get_with_token(routes::STATS, &admin.token).await;
        assert_eq!(stats.body["total_votes"], 1);
        assert_eq!(stats.body["highest_votes"], 1);
    }

    #[tokio::test]
    async fn concurrent_votes_from_different_users_are_all_counted() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let team_id = app.create_team(&admin.token, "Popular").await;
        app.open_voting_window(&admin.token).await;

        let mut voters = Vec::new();
        for i in 0..5 {
            voters.push(app.create_authenticated_user(&format!("voter{i}")).await);
        }

        let results = join_all(voters.iter().map(|v| app.cast_vote(v, team_id))).await;
        assert!(results.iter().all(|r| r.status == 201));

        let teams = app.get_with_token(routes::TEAMS, &admin.token).await;
        assert_eq!(teams.body[0]["votes"], 5);
    }

    /// One ballot lands and the other is rejected as a duplicate.
    async fn assert_single_ballot(
        app: &TestApp,
        admin_token: &str,
        voter: &TestUser,
        results: &[TestResponse],
    ) {
        let created = results.iter().filter(|r| r.status == 201).count();
        let conflicts: Vec<_> = results.iter().filter(|r| r.status == 409).collect();
        assert_eq!(created, 1, "expected one accepted vote");
        assert_eq!(conflicts.len(), 1, "expected one rejected vote");
        assert_eq!(conflicts[0].body["code"], "ALREADY_VOTED");

        let stats = app.get_with_token(routes::STATS, admin_token).await;
        assert_eq!(stats.body["total_votes"], 1);

        let profile = app.get_with_token(&routes::profile(voter.id), &voter.token).await;
        assert_eq!(profile.body["has_voted"], true);
    }

    #[tokio::test]
    async fn simultaneous_ballots_for_one_team_count_once() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let team_id = app.create_team(&admin.token, "A").await;
        app.open_voting_window(&admin.token).await;
        let voter = app.create_authenticated_user("alice").await;

        let results =
            join_all([app.cast_vote(&voter, team_id), app.cast_vote(&voter, team_id)]).await;

        assert_single_ballot(&app, &admin.token, &voter, &results).await;
        let teams = app.get_with_token(routes::TEAMS, &admin.token).await;
        assert_eq!(teams.body[0]["votes"], 1);
    }

    #[tokio::test]
    async fn simultaneous_ballots_for_two_teams_count_once() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let a = app.create_team(&admin.token, "A").await;
        let b = app.create_team(&admin.token, "B").await;
        app.open_voting_window(&admin.token).await;
        let voter = app.create_authenticated_user("alice").await;

        let results = join_all([app.cast_vote(&voter, a), app.cast_vote(&voter, b)]).await;

        assert_single_ballot(&app, &admin.token, &voter, &results).await;
        let teams = app.get_with_token(routes::TEAMS, &admin.token).await;
        let votes: Vec<_> = teams
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["votes"].as_i64().unwrap())
            .collect();
        assert_eq!(votes, vec![1, 0]);
    }

    #[tokio::test]
    async fn cannot_vote_on_behalf_of_another_user() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let team_id = app.create_team(&admin.token, "A").await;
        app.open_voting_window(&admin.token).await;
        let alice = app.create_authenticated_user("alice").await;
        let bob = app.create_authenticated_user("bob").await;

        let res = app
            .post_with_token(
                routes::VOTES,
                &json!({"user_id": bob.id, "team_id": team_id}),
                &alice.token,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn vote_for_unknown_team_is_not_found() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        app.open_voting_window(&admin.token).await;
        let voter = app.create_authenticated_user("alice").await;

        let res = app.cast_vote(&voter, 9999).await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn malformed_vote_body_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let voter = app.create_authenticated_user("alice").await;

        let res = app
            .post_with_token(routes::VOTES, &json!({"team": "A"}), &voter.token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod window_enforcement {
    use super::*;

    #[tokio::test]
    async fn vote_without_a_window_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let team_id = app.create_team(&admin.token, "A").await;
        let voter = app.create_authenticated_user("alice").await;

        let res = app.cast_vote(&voter, team_id).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "VOTING_CLOSED");
    }

    #[tokio::test]
    async fn vote_after_the_window_ends_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let team_id = app.create_team(&admin.token, "A").await;
        let now = Utc::now();
        let res = app
            .post_with_token(
                routes::VOTING_CONFIG,
                &json!({"start_time": now - Duration::hours(2), "end_time": now - Duration::hours(1)}),
                &admin.token,
            )
            .await;
        assert_eq!(res.status, 201);
        let voter = app.create_authenticated_user("alice").await;

        let res = app.cast_vote(&voter, team_id).await;

        assert_eq!(res.body["code"], "VOTING_CLOSED");
    }

    #[tokio::test]
    async fn vote_after_an_admin_closes_the_window_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let team_id = app.create_team(&admin.token, "A").await;
        app.open_voting_window(&admin.token).await;
        let early = app.create_authenticated_user("early").await;
        assert_eq!(app.cast_vote(&early, team_id).await.status, 201);

        let res = app
            .post_with_token(routes::CLOSE_VOTING_CONFIG, &json!({}), &admin.token)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let late = app.create_authenticated_user("late").await;
        let res = app.cast_vote(&late, team_id).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "VOTING_CLOSED");
        let teams = app.get_with_token(routes::TEAMS, &admin.token).await;
        assert_eq!(teams.body[0]["votes"], 1);
    }
}

mod statistics {
    use super::*;

    #[tokio::test]
    async fn stats_summarize_all_teams() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let a = app.create_team(&admin.token, "A").await;
        let b = app.create_team(&admin.token, "B").await;
        app.create_team(&admin.token, "C").await;
        app.open_voting_window(&admin.token).await;

        for (name, team) in [("v1", a), ("v2", a), ("v3", b)] {
            let voter = app.create_authenticated_user(name).await;
            assert_eq!(app.cast_vote(&voter, team).await.status, 201);
        }

        let res = app.get_with_token(routes::STATS, &admin.token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["total_teams"], 3);
        assert_eq!(res.body["total_votes"], 3);
        assert_eq!(res.body["highest_votes"], 2);
    }

    #[tokio::test]
    async fn stats_are_admin_only() {
        let app = TestApp::spawn().await;
        let user = app.create_authenticated_user("alice").await;

        let res = app.get_with_token(routes::STATS, &user.token).await;

        assert_eq!(res.status, 403);
    }
}
