use axum::body::Body;
use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use naviplus_core::AccountStore;
use naviplus_core::models::AccountId;

use crate::common::{TestApp, public_post, setup_test_app};

async fn account_id(app: &TestApp, username: &str) -> AccountId {
    app.store
        .find_account_by_username(username)
        .await
        .unwrap()
        .unwrap()
        .id
}

async fn create_building(app: &TestApp, token: &str, name: &str) -> i64 {
    let (status, body) = app
        .post("/api/buildings/", token, json!({"name": name}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_returns_200() {
    let app = setup_test_app();

    let (status, body) = app
        .send(Request::get("/health").body(Body::empty()).unwrap())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn health_returns_503_when_store_is_down() {
    let app = setup_test_app();
    app.store.set_offline(true);

    let (status, body) = app
        .send(Request::get("/health").body(Body::empty()).unwrap())
        .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["database"], "error");
}

#[tokio::test]
async fn api_root_lists_collection_urls() {
    let app = setup_test_app();
    let token = app.signup("alice").await;

    let request = Request::get("/api/")
        .header("host", "api.example.org")
        .header("authorization", format!("Token {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "buildings": "http://api.example.org/api/buildings/",
            "plds": "http://api.example.org/api/plds/",
            "user-profiles": "http://api.example.org/api/user-profiles/",
        })
    );
}

#[tokio::test]
async fn openapi_document_is_public() {
    let app = setup_test_app();

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn internal_errors_do_not_leak_detail() {
    let app = setup_test_app();
    let token = app.signup("alice").await;
    app.store.set_offline(true);

    let (status, body) = app.get("/api/buildings/", &token).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal_error");
    assert_eq!(body["message"], "Internal server error");
}

// ---------------------------------------------------------------------------
// Signup and login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn signup_then_login_returns_usable_token() {
    let app = setup_test_app();

    let signup_token = app.signup("alice").await;
    assert_eq!(signup_token.len(), 40);

    let credentials = json!({"username": "alice", "password": "alice-password"});
    let (status, body) = app.send(public_post("/api/login/", credentials.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let login_token = body["token"].as_str().unwrap().to_string();
    assert_eq!(login_token, signup_token);

    let (status, body) = app.send(public_post("/api/token-auth/", credentials)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], signup_token.as_str());

    let (status, _) = app.get("/api/buildings/", &login_token).await;
    assert_eq!(status, StatusCode::OK);

    let bearer = Request::get("/api/buildings/")
        .header("authorization", format!("Bearer {login_token}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = app.send(bearer).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn signup_never_echoes_password() {
    let app = setup_test_app();

    let (status, body) = app
        .send(public_post(
            "/api/signup/",
            json!({"username": "alice", "password": "s3cret"}),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.as_object().unwrap().len(), 1);
    assert!(!body.to_string().contains("s3cret"));
}

#[tokio::test]
async fn signup_with_taken_username_fails() {
    let app = setup_test_app();
    app.signup("alice").await;

    for password in ["alice-password", "something-else"] {
        let (status, body) = app
            .send(public_post(
                "/api/signup/",
                json!({"username": "alice", "password": password}),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Username already exists.");
    }
    assert_eq!(app.store.account_count(), 1);
}

#[tokio::test]
async fn signup_requires_username_and_password() {
    let app = setup_test_app();

    for payload in [
        json!({"username": "alice"}),
        json!({"password": "pw"}),
        json!({"username": "", "password": "pw"}),
        json!({}),
    ] {
        let (status, body) = app.send(public_post("/api/signup/", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
        assert_eq!(body["message"], "Username and password are required.");
    }
    assert_eq!(app.store.account_count(), 0);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = setup_test_app();
    app.signup("alice").await;
    app.signup("bob").await;
    let bob = account_id(&app, "bob").await;
    app.store.deactivate(bob);

    let attempts = [
        json!({"username": "nobody", "password": "whatever"}),
        json!({"username": "alice", "password": "wrong"}),
        json!({"username": "bob", "password": "bob-password"}),
    ];

    for attempt in attempts {
        let (status, body) = app.send(public_post("/api/login/", attempt)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "error": "invalid_credentials",
                "message": "Unable to log in with provided credentials.",
            })
        );
    }
}

#[tokio::test]
async fn login_reports_missing_fields() {
    let app = setup_test_app();

    let (status, body) = app
        .send(public_post("/api/login/", json!({"username": "alice"})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["fields"]["password"], json!(["This field is required."]));

    let (status, body) = app
        .send(public_post(
            "/api/login/",
            json!({"username": "alice", "password": null}),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["password"], json!(["This field may not be null."]));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = setup_test_app();

    let request = Request::post("/api/signup/")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

// ---------------------------------------------------------------------------
// Token enforcement
// ---------------------------------------------------------------------------

#[tokio::test]
async fn protected_routes_require_token() {
    let app = setup_test_app();

    for uri in ["/api/", "/api/buildings/", "/api/plds/", "/api/user-profiles/"] {
        let response = app
            .router
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(response.headers()[WWW_AUTHENTICATE], "Token");
    }
}

#[tokio::test]
async fn rejected_token_mutates_nothing() {
    let app = setup_test_app();
    let token = app.signup("alice").await;
    let building = create_building(&app, &token, "Library").await;

    let (status, body) = app
        .post("/api/buildings/", "not-a-real-token", json!({"name": "Ghost"}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "not_authenticated");
    assert_eq!(body["message"], "Invalid token.");

    let (status, _) = app
        .delete(&format!("/api/buildings/{building}/"), "not-a-real-token")
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let unauthenticated = public_post("/api/plds/", json!({"label": "Ramp", "building": building}));
    let (status, _) = app.send(unauthenticated).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(app.store.building_count(), 1);
    assert_eq!(app.store.pld_count(), 0);
}

#[tokio::test]
async fn inactive_account_token_is_rejected() {
    let app = setup_test_app();
    let token = app.signup("alice").await;
    app.store.deactivate(account_id(&app, "alice").await);

    let (status, body) = app.get("/api/buildings/", &token).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User inactive or deleted.");
}

// ---------------------------------------------------------------------------
// Buildings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn created_building_reads_back_with_id() {
    let app = setup_test_app();
    let token = app.signup("alice").await;

    let payload = json!({"name": "Science Hall", "location": "North campus"});
    let (status, created) = app.post("/api/buildings/", &token, payload).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) = app.get(&format!("/api/buildings/{id}/"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        fetched,
        json!({"id": id, "name": "Science Hall", "location": "North campus"})
    );

    let (status, listed) = app.get("/api/buildings/", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([fetched]));
}

#[tokio::test]
async fn building_list_is_ordered_by_id() {
    let app = setup_test_app();
    let token = app.signup("alice").await;
    let first = create_building(&app, &token, "B").await;
    let second = create_building(&app, &token, "A").await;

    let (_, listed) = app.get("/api/buildings/", &token).await;
    let ids: Vec<i64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![first, second]);
}

#[tokio::test]
async fn building_validation_errors_name_fields() {
    let app = setup_test_app();
    let token = app.signup("alice").await;

    let (status, body) = app
        .post("/api/buildings/", &token, json!({"location": "Somewhere"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["fields"]["name"], json!(["This field is required."]));

    let (_, body) = app.post("/api/buildings/", &token, json!({"name": "  "})).await;
    assert_eq!(body["fields"]["name"], json!(["This field may not be blank."]));

    let (_, body) = app
        .post("/api/buildings/", &token, json!({"name": "x".repeat(256)}))
        .await;
    assert_eq!(
        body["fields"]["name"],
        json!(["Ensure this field has no more than 255 characters."])
    );

    assert_eq!(app.store.building_count(), 0);
}

#[tokio::test]
async fn building_put_replaces_and_patch_merges() {
    let app = setup_test_app();
    let token = app.signup("alice").await;
    let (_, created) = app
        .post(
            "/api/buildings/",
            &token,
            json!({"name": "Hall", "location": "East"}),
        )
        .await;
    let uri = format!("/api/buildings/{}/", created["id"]);

    let (status, body) = app.put(&uri, &token, json!({"location": "West"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["name"], json!(["This field is required."]));

    let (status, body) = app.patch(&uri, &token, json!({"location": "West"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Hall");
    assert_eq!(body["location"], "West");

    // An omitted location keeps its stored value; only an explicit null clears it.
    let (status, body) = app.put(&uri, &token, json!({"name": "Hall 2"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Hall 2");
    assert_eq!(body["location"], "West");

    let (status, body) = app
        .put(&uri, &token, json!({"name": "Hall 2", "location": null}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], json!(null));
}

#[tokio::test]
async fn null_on_required_field_is_rejected() {
    let app = setup_test_app();
    let token = app.signup("alice").await;
    let building = create_building(&app, &token, "Hall").await;
    let uri = format!("/api/buildings/{building}/");

    let (status, body) = app.patch(&uri, &token, json!({"name": null})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["name"], json!(["This field may not be null."]));

    let (status, body) = app.put(&uri, &token, json!({"name": null})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["name"], json!(["This field may not be null."]));

    let (_, stored) = app.get(&uri, &token).await;
    assert_eq!(stored["name"], "Hall");

    let (status, body) = app
        .post("/api/plds/", &token, json!({"label": "Ramp", "building": null}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["building"], json!(["This field may not be null."]));
    assert_eq!(app.store.pld_count(), 0);
}

#[tokio::test]
async fn deleting_building_removes_its_plds() {
    let app = setup_test_app();
    let token = app.signup("alice").await;
    let building = create_building(&app, &token, "Hall").await;
    let (status, _) = app
        .post("/api/plds/", &token, json!({"label": "Ramp", "building": building}))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/buildings/{building}/");
    let (status, body) = app.delete(&uri, &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, json!(null));
    assert_eq!(app.store.pld_count(), 0);

    let (status, body) = app.get(&uri, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = app.delete(&uri, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_id_is_not_found() {
    let app = setup_test_app();
    let token = app.signup("alice").await;

    for uri in [
        "/api/buildings/abc/",
        "/api/plds/abc/",
        "/api/user-profiles/abc/",
    ] {
        let (status, _) = app.get(uri, &token).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

// ---------------------------------------------------------------------------
// PLDs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pld_building_filter() {
    let app = setup_test_app();
    let token = app.signup("alice").await;
    let hall = create_building(&app, &token, "Hall").await;
    let annex = create_building(&app, &token, "Annex").await;

    let (_, ramp) = app
        .post("/api/plds/", &token, json!({"label": "Ramp", "building": hall}))
        .await;
    let (_, lift) = app
        .post("/api/plds/", &token, json!({"label": "Lift", "building": annex}))
        .await;
    let (_, door) = app
        .post("/api/plds/", &token, json!({"label": "Door", "building": hall}))
        .await;

    let (status, body) = app.get(&format!("/api/plds/?building={hall}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([ramp.clone(), door.clone()]));

    let (_, body) = app.get("/api/plds/", &token).await;
    assert_eq!(body, json!([ramp, lift, door]));

    let (_, body) = app.get("/api/plds/?building=", &token).await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = app.get("/api/plds/?building=99999", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = app.get("/api/plds/?building=hall", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn pld_building_filter_scopes_detail_routes() {
    let app = setup_test_app();
    let token = app.signup("alice").await;
    let hall = create_building(&app, &token, "Hall").await;
    let annex = create_building(&app, &token, "Annex").await;
    let (_, ramp) = app
        .post("/api/plds/", &token, json!({"label": "Ramp", "building": hall}))
        .await;
    let id = &ramp["id"];

    for filter in [annex.to_string(), "hall".to_string()] {
        let uri = format!("/api/plds/{id}/?building={filter}");
        let (status, body) = app.get(&uri, &token).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["error"], "not_found");

        let (status, _) = app.put(&uri, &token, json!({"label": "Lift", "building": hall})).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        let (status, _) = app.patch(&uri, &token, json!({"label": "Lift"})).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        let (status, _) = app.delete(&uri, &token).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
    assert_eq!(app.store.pld_count(), 1);

    let (status, body) = app.get(&format!("/api/plds/{id}/?building={hall}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, ramp);

    let (status, body) = app.get(&format!("/api/plds/{id}/?building="), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "Ramp");

    let (status, _) = app
        .delete(&format!("/api/plds/{id}/?building={hall}"), &token)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.store.pld_count(), 0);
}

#[tokio::test]
async fn pld_requires_existing_building() {
    let app = setup_test_app();
    let token = app.signup("alice").await;

    let (status, body) = app
        .post("/api/plds/", &token, json!({"label": "", "building": 4242}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["label"], json!(["This field may not be blank."]));
    assert_eq!(
        body["fields"]["building"],
        json!(["Invalid pk \"4242\" - object does not exist."])
    );
    assert_eq!(app.store.pld_count(), 0);
}

#[tokio::test]
async fn pld_can_move_between_buildings() {
    let app = setup_test_app();
    let token = app.signup("alice").await;
    let hall = create_building(&app, &token, "Hall").await;
    let annex = create_building(&app, &token, "Annex").await;
    let (_, pld) = app
        .post("/api/plds/", &token, json!({"label": "Ramp", "building": hall}))
        .await;
    let uri = format!("/api/plds/{}/", pld["id"]);

    let (status, body) = app.patch(&uri, &token, json!({"building": annex})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": pld["id"], "label": "Ramp", "building": annex}));

    let (status, body) = app.put(&uri, &token, json!({"label": "Ramp"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["building"], json!(["This field is required."]));

    let (status, _) = app.delete(&uri, &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// ---------------------------------------------------------------------------
// User profiles
// ---------------------------------------------------------------------------

#[tokio::test]
async fn profile_user_is_always_the_caller() {
    let app = setup_test_app();
    let alice_token = app.signup("alice").await;
    app.signup("bob").await;
    let alice = account_id(&app, "alice").await;
    let bob = account_id(&app, "bob").await;

    let (status, body) = app
        .post(
            "/api/user-profiles/",
            &alice_token,
            json!({"user": bob.0, "disability_type": "visual"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"user": alice.0, "disability_type": "visual"}));

    let (status, _) = app
        .post(
            "/api/user-profiles/",
            &alice_token,
            json!({"disability_type": "hearing"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let profiles = app.store.all_profiles();
    assert_eq!(profiles.len(), 2);
    assert!(profiles.iter().all(|p| p.user == alice));

    let id = profiles[0].id;
    let (status, body) = app
        .patch(
            &format!("/api/user-profiles/{id}/"),
            &alice_token,
            json!({"user": bob.0}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"], alice.0);
    assert!(app.store.all_profiles().iter().all(|p| p.user == alice));
}

#[tokio::test]
async fn profile_with_unknown_user_is_rejected() {
    let app = setup_test_app();
    let token = app.signup("alice").await;

    let (status, body) = app
        .post(
            "/api/user-profiles/",
            &token,
            json!({"user": 999999, "disability_type": "visual"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["fields"]["user"],
        json!(["Invalid pk \"999999\" - object does not exist."])
    );
    assert!(app.store.all_profiles().is_empty());
}

#[tokio::test]
async fn profile_disability_type_is_limited_to_100_chars() {
    let app = setup_test_app();
    let token = app.signup("alice").await;

    let (status, body) = app
        .post(
            "/api/user-profiles/",
            &token,
            json!({"disability_type": "x".repeat(101)}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["fields"]["disability_type"],
        json!(["Ensure this field has no more than 100 characters."])
    );
}

#[tokio::test]
async fn profiles_are_invisible_to_other_accounts() {
    let app = setup_test_app();
    let alice_token = app.signup("alice").await;
    let bob_token = app.signup("bob").await;

    app.post(
        "/api/user-profiles/",
        &alice_token,
        json!({"disability_type": "visual"}),
    )
    .await;
    app.post(
        "/api/user-profiles/",
        &bob_token,
        json!({"disability_type": "mobility"}),
    )
    .await;
    let bob_profile = app
        .store
        .all_profiles()
        .into_iter()
        .find(|p| p.disability_type == "mobility")
        .unwrap();
    let bob_uri = format!("/api/user-profiles/{}/", bob_profile.id);

    let (status, body) = app.get("/api/user-profiles/", &alice_token).await;
    assert_eq!(status, StatusCode::OK);
    let alice = account_id(&app, "alice").await;
    assert_eq!(body, json!([{"user": alice.0, "disability_type": "visual"}]));

    let (status, _) = app.get(&bob_uri, &alice_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let change = json!({"disability_type": "hijacked"});
    let (status, _) = app.put(&bob_uri, &alice_token, change.clone()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.patch(&bob_uri, &alice_token, change).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.delete(&bob_uri, &alice_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get(&bob_uri, &bob_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["disability_type"], "mobility");

    let (status, _) = app.delete(&bob_uri, &bob_token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
