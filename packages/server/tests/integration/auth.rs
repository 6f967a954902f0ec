use serde_json::json;

use crate::common::{TestApp, routes};

fn registration(username: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": "securepass",
    })
}

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_user_can_register_with_valid_credentials() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::REGISTER, &registration("alice"))
            .await;

        assert_eq!(res.status, 201);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["username"], "alice");
        assert_eq!(res.body["email"], "alice@example.com");
    }

    #[tokio::test]
    async fn registration_creates_a_profile_that_has_not_voted() {
        let app = TestApp::spawn().await;
        let user = app.create_authenticated_user("alice").await;

        let res = app.get_with_token(&routes::profile(user.id), &user.token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["user_id"], user.id);
        assert_eq!(res.body["username"], "alice");
        assert_eq!(res.body["has_voted"], false);
        assert_eq!(res.body["is_admin"], false);
    }

    #[tokio::test]
    async fn cannot_register_with_an_already_taken_username() {
        let app = TestApp::spawn().await;

        let first = app
            .post_without_token(routes::REGISTER, &registration("alice"))
            .await;
        assert_eq!(first.status, 201, "First registration failed: {}", first.text);

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "alice", "email": "other@example.com", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "USERNAME_TAKEN");
    }

    #[tokio::test]
    async fn cannot_register_with_an_already_registered_email() {
        let app = TestApp::spawn().await;

        let first = app
            .post_without_token(routes::REGISTER, &registration("alice"))
            .await;
        assert_eq!(first.status, 201, "First registration failed: {}", first.text);

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "bob", "email": "ALICE@example.com", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "EMAIL_TAKEN");
    }

    #[tokio::test]
    async fn cannot_register_with_a_password_that_is_too_short() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "alice", "email": "alice@example.com", "password": "short"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_register_with_a_malformed_email() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "alice", "email": "not-an-email", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn registered_user_receives_a_token() {
        let app = TestApp::spawn().await;
        app.post_without_token(routes::REGISTER, &registration("alice"))
            .await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "alice", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["token"].is_string());
        assert_eq!(res.body["username"], "alice");
        assert_eq!(res.body["is_admin"], false);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;
        app.post_without_token(routes::REGISTER, &registration("alice"))
            .await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "alice", "password": "wrongpass"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_user_is_rejected_with_the_same_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "ghost", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn admin_flag_is_carried_in_the_login_response() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;

        let res = app.get_with_token(routes::ME, &admin.token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["is_admin"], true);
    }
}

mod authenticated_access {
    use super::*;

    #[tokio::test]
    async fn me_returns_the_current_identity() {
        let app = TestApp::spawn().await;
        let user = app.create_authenticated_user("alice").await;

        let res = app.get_with_token(routes::ME, &user.token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], user.id);
        assert_eq!(res.body["username"], "alice");
    }

    #[tokio::test]
    async fn me_without_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn me_with_garbage_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not.a.jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn logout_confirms_a_valid_token() {
        let app = TestApp::spawn().await;
        let user = app.create_authenticated_user("alice").await;

        let res = app
            .post_with_token(routes::LOGOUT, &json!({}), &user.token)
            .await;

        assert_eq!(res.status, 204);
    }

    #[tokio::test]
    async fn users_cannot_read_other_profiles() {
        let app = TestApp::spawn().await;
        let alice = app.create_authenticated_user("alice").await;
        let bob = app.create_authenticated_user("bob").await;

        let res = app.get_with_token(&routes::profile(bob.id), &alice.token).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn admins_can_read_any_profile() {
        let app = TestApp::spawn().await;
        let admin = app.create_admin("root").await;
        let bob = app.create_authenticated_user("bob").await;

        let res = app.get_with_token(&routes::profile(bob.id), &admin.token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], "bob");
    }
}
