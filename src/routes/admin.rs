use actix_web::{http::header, post, route, web, HttpRequest, HttpResponse};
use log::{debug, info, warn};
use validator::Validate;

use crate::{
    db::{
        admin_repository::AdminRepository, hostel_repository::HostelRepository,
        user_repository::UserRepository,
    },
    errors::AdminError,
    models::{
        admin::{
            Admin, AdminEmailRequest, AdminIdRequest, AdminProfile, GetAdminRequest,
            RegisterAdminRequest,
        },
        response::{AdminResponse, DeleteResponse, HostelResponse, RegisterResponse},
    },
    state::AppState,
    utils::security::hash_password,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .app_data(json_config())
            .service(register_admin)
            .service(update_admin)
            .service(get_hostel)
            .service(get_admin)
            .route("", web::delete().to(delete_admin)),
    );
}

// Unparsable bodies get the same JSON envelope as every other failure
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        warn!("Rejected body for {}: {}", req.path(), err);
        AdminError::invalid(format!("Invalid request body: {}", err)).into()
    })
}

// Store and hashing work stays off the async workers
async fn run_blocking<T, F>(f: F) -> Result<T, AdminError>
where
    F: FnOnce() -> Result<T, AdminError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| AdminError::InternalError(format!("Blocking error: {}", e)))?
}

fn admin_not_found() -> AdminError {
    AdminError::NotFound("Admin does not exists".to_string())
}

fn invalid_token() -> AdminError {
    AdminError::Unauthorized("Token is not valid".to_string())
}

#[post("/register")]
pub async fn register_admin(
    state: web::Data<AppState>,
    body: web::Json<RegisterAdminRequest>,
) -> Result<HttpResponse, AdminError> {
    let request = body.into_inner();
    if !request.has_all_fields() {
        warn!("Admin registration rejected: missing fields");
        return Err(AdminError::invalid("All fields are required"));
    }
    let (profile, hostel_name, password) = request.into_parts();

    // Check email and hostel before paying for the hash
    let lookup = state.clone();
    let email = profile.email.clone();
    let hostel = run_blocking(move || {
        lookup.with_conn(|conn| {
            if AdminRepository::new(conn)
                .find_admin_by_email(&email)?
                .is_some()
            {
                return Err(AdminError::Conflict("Admin already exists".to_string()));
            }
            HostelRepository::new(conn)
                .find_hostel_by_name(&hostel_name)?
                .ok_or_else(|| AdminError::NotFound("Hostel not found".to_string()))
        })
    })
    .await?;
    let hostel_id = hostel
        .id
        .ok_or_else(|| AdminError::InternalError("Hostel row has no id".to_string()))?;

    // Hash the password
    let cost = state.bcrypt_cost;
    let password_hash =
        run_blocking(move || hash_password(&password, cost).map_err(AdminError::from)).await?;

    // User and admin land together or not at all. The email is checked again
    // under the same lock since a concurrent registration may have won.
    let create = state.clone();
    let (user, admin) = run_blocking(move || {
        create.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            if AdminRepository::new(&tx)
                .find_admin_by_email(&profile.email)?
                .is_some()
            {
                return Err(AdminError::Conflict("Admin already exists".to_string()));
            }
            let user = UserRepository::new(&tx)
                .create_user(&profile.email, &password_hash, true)?
                .ok_or_else(|| AdminError::InternalError("User not created".to_string()))?;
            let admin = AdminRepository::new(&tx)
                .create_admin(&Admin::new(profile, user.id, hostel_id))?
                .ok_or_else(|| AdminError::InternalError("Admin not created".to_string()))?;
            tx.commit()?;
            Ok((user, admin))
        })
    })
    .await?;

    // Issue the token
    let token = state.tokens.generate_token(user.id, user.is_admin)?;
    info!("Registered admin {} for hostel {}", admin.email, hostel.name);

    Ok(HttpResponse::Ok().json(RegisterResponse {
        success: true,
        token,
        admin,
    }))
}

#[route("/update", method = "POST", method = "PUT")]
pub async fn update_admin(
    state: web::Data<AppState>,
    body: web::Json<AdminProfile>,
) -> Result<HttpResponse, AdminError> {
    let profile = body.into_inner();
    profile.validate()?;

    // Find the admin by email and overwrite the profile
    let admin = run_blocking(move || {
        state.with_conn(|conn| {
            let repo = AdminRepository::new(conn);
            let mut admin = repo
                .find_admin_by_email(&profile.email)?
                .ok_or_else(admin_not_found)?;
            admin.apply(profile);
            repo.update_admin(&admin)?;
            Ok(admin)
        })
    })
    .await?;

    info!("Updated admin {}", admin.email);
    Ok(HttpResponse::Ok().json(AdminResponse {
        success: true,
        admin,
    }))
}

#[post("/hostel")]
pub async fn get_hostel(
    state: web::Data<AppState>,
    body: web::Json<AdminIdRequest>,
) -> Result<HttpResponse, AdminError> {
    let request = body.into_inner();
    request.validate()?;
    let admin_id = request.id;

    // Admin first, then the hostel it points at
    let hostel = run_blocking(move || {
        state.with_conn(|conn| {
            let admin = AdminRepository::new(conn)
                .find_admin_by_id(admin_id)?
                .ok_or_else(admin_not_found)?;
            HostelRepository::new(conn).find_hostel_by_id(admin.hostel_id)
        })
    })
    .await?;

    if hostel.is_none() {
        warn!("Admin {} references a missing hostel", admin_id);
    }
    Ok(HttpResponse::Ok().json(HostelResponse {
        success: true,
        hostel,
    }))
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

#[post("/me")]
pub async fn get_admin(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: Option<web::Json<GetAdminRequest>>,
) -> Result<HttpResponse, AdminError> {
    // A missing or unreadable body is treated as "not an admin"
    let request = body.map(|b| b.into_inner()).unwrap_or_default();
    if !request.is_admin() {
        return Err(AdminError::Unauthorized(
            "Not an Admin, authorization denied".to_string(),
        ));
    }

    // Body token first, then the Authorization header
    let token = request
        .token()
        .or_else(|| bearer_token(&req))
        .ok_or_else(|| AdminError::Unauthorized("No token, authorization denied".to_string()))?;

    // Decode and look up the admin linked to the user
    let claims = state.tokens.verify_token(&token).ok_or_else(invalid_token)?;
    debug!("Token verified for user {}", claims.user_id);

    let admin = run_blocking(move || {
        state.with_conn(|conn| {
            AdminRepository::new(conn)
                .find_admin_by_user_id(claims.user_id)?
                .ok_or_else(invalid_token)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(AdminResponse {
        success: true,
        admin,
    }))
}

// Mounted on the scope root, so it is routed by hand in `configure`
pub async fn delete_admin(
    state: web::Data<AppState>,
    body: web::Json<AdminEmailRequest>,
) -> Result<HttpResponse, AdminError> {
    let request = body.into_inner();
    request.validate()?;

    let email = request.email.clone();
    run_blocking(move || {
        state.with_conn(|conn| {
            let admin = AdminRepository::new(conn)
                .find_admin_by_email(&request.email)?
                .ok_or_else(admin_not_found)?;
            let admin_id = admin
                .id
                .ok_or_else(|| AdminError::InternalError("Admin row has no id".to_string()))?;

            // Linked user goes first, then the admin row
            let tx = conn.unchecked_transaction()?;
            if UserRepository::new(&tx).delete_user(admin.user_id)? == 0 {
                warn!("Admin {} had no linked user {}", admin.email, admin.user_id);
            }
            AdminRepository::new(&tx).delete_admin(admin_id)?;
            tx.commit()?;
            Ok(())
        })
    })
    .await?;

    info!("Deleted admin {}", email);
    Ok(HttpResponse::Ok().json(DeleteResponse {
        success: true,
        msg: "Admin deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::schema::init_memory_db, models::hostel::Hostel, utils::token::TokenService,
    };
    use actix_web::{http::StatusCode, test, App};
    use futures::future::join_all;
    use serde_json::{json, Value};

    fn test_state() -> web::Data<AppState> {
        let conn = init_memory_db().unwrap();
        HostelRepository::new(&conn)
            .create_hostel(&Hostel::new(
                "Iqbal Hall".to_string(),
                "Block C".to_string(),
                40,
                120,
            ))
            .unwrap();
        web::Data::new(AppState::new(
            conn,
            TokenService::new("test-secret", 3600),
            4,
        ))
    }

    fn count(state: &AppState, table: &str) -> i64 {
        state
            .with_conn(|conn| {
                Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?)
            })
            .unwrap()
    }

    fn register_body(email: &str) -> Value {
        json!({
            "name": "Ayesha Khan",
            "email": email,
            "father_name": "Imran Khan",
            "contact": "03001234567",
            "address": "12 Mall Road, Lahore",
            "dob": "1995-04-12",
            "cnic": "35202-1234567-1",
            "hostel": "Iqbal Hall",
            "password": "s3cret-pass",
        })
    }

    #[actix_web::test]
    async fn register_returns_token_for_new_user() {
        let state = test_state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/admin/register")
            .set_json(register_body("ayesha@example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["admin"]["email"], "ayesha@example.com");
        assert!(body["admin"].get("password").is_none());

        let claims = state
            .tokens
            .verify_token(body["token"].as_str().unwrap())
            .unwrap();
        assert_eq!(Value::from(claims.user_id), body["admin"]["user"]);
        assert!(claims.is_admin);

        let user = state
            .with_conn(|conn| UserRepository::new(conn).find_user_by_id(claims.user_id))
            .unwrap()
            .unwrap();
        assert!(user.is_admin);
        assert_ne!(user.password_hash, "s3cret-pass");
    }

    #[actix_web::test]
    async fn register_with_missing_field_creates_nothing() {
        let state = test_state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let mut body = register_body("ayesha@example.com");
        body.as_object_mut().unwrap().remove("password");
        let req = test::TestRequest::post()
            .uri("/admin/register")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "All fields are required");
        assert_eq!(count(&state, "users"), 0);
        assert_eq!(count(&state, "admins"), 0);
    }

    #[actix_web::test]
    async fn register_duplicate_email_is_rejected() {
        let state = test_state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        for expected in [StatusCode::OK, StatusCode::BAD_REQUEST] {
            let req = test::TestRequest::post()
                .uri("/admin/register")
                .set_json(register_body("ayesha@example.com"))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), expected);
        }

        assert_eq!(count(&state, "users"), 1);
        assert_eq!(count(&state, "admins"), 1);
    }

    #[actix_web::test]
    async fn register_unknown_hostel_is_rejected() {
        let state = test_state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let mut body = register_body("ayesha@example.com");
        body["hostel"] = json!("Jinnah Hall");
        let req = test::TestRequest::post()
            .uri("/admin/register")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Hostel not found");
        assert_eq!(count(&state, "users"), 0);
    }

    #[actix_web::test]
    async fn update_overwrites_fields() {
        let state = test_state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/admin/register")
            .set_json(register_body("ayesha@example.com"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let mut update = register_body("ayesha@example.com");
        update["address"] = json!("7 Canal View, Lahore");
        let req = test::TestRequest::put()
            .uri("/admin/update")
            .set_json(&update)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["admin"]["address"], "7 Canal View, Lahore");

        let stored = state
            .with_conn(|conn| AdminRepository::new(conn).find_admin_by_email("ayesha@example.com"))
            .unwrap()
            .unwrap();
        assert_eq!(stored.address, "7 Canal View, Lahore");

        // POST reaches the same handler
        let req = test::TestRequest::post()
            .uri("/admin/update")
            .set_json(&update)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn update_rejects_invalid_or_unknown() {
        let state = test_state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let mut invalid = register_body("not-an-email");
        invalid["cnic"] = json!("12");
        let req = test::TestRequest::put()
            .uri("/admin/update")
            .set_json(invalid)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        let params: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|e| e["param"].as_str())
            .collect();
        assert_eq!(params, vec!["cnic", "email"]);

        let req = test::TestRequest::put()
            .uri("/admin/update")
            .set_json(register_body("ghost@example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Admin does not exists");
    }

    #[actix_web::test]
    async fn malformed_body_uses_error_envelope() {
        let state = test_state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/admin/hostel")
            .set_json(json!({ "id": "abc" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
    }

    #[actix_web::test]
    async fn hostel_lookup_follows_admin_reference() {
        let state = test_state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/admin/register")
            .set_json(register_body("ayesha@example.com"))
            .to_request();
        let registered: Value = test::call_and_read_body_json(&app, req).await;
        let admin_id = registered["admin"]["id"].as_i64().unwrap();

        let req = test::TestRequest::post()
            .uri("/admin/hostel")
            .set_json(json!({ "id": admin_id }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["hostel"]["name"], "Iqbal Hall");
        assert_eq!(body["hostel"]["capacity"], 120);

        let req = test::TestRequest::post()
            .uri("/admin/hostel")
            .set_json(json!({ "id": admin_id + 100 }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[actix_web::test]
    async fn me_requires_admin_flag_and_valid_token() {
        let state = test_state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/admin/register")
            .set_json(register_body("ayesha@example.com"))
            .to_request();
        let registered: Value = test::call_and_read_body_json(&app, req).await;
        let token = registered["token"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri("/admin/me")
            .set_json(json!({ "isAdmin": true, "token": token }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["admin"]["email"], "ayesha@example.com");
        assert!(body["admin"].get("password").is_none());

        let req = test::TestRequest::post()
            .uri("/admin/me")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .set_json(json!({ "isAdmin": true }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let rejected = [
            json!({ "isAdmin": false, "token": token }),
            json!({ "isAdmin": true }),
            json!({ "isAdmin": true, "token": "garbage.token.value" }),
        ];
        for payload in rejected {
            let req = test::TestRequest::post()
                .uri("/admin/me")
                .set_json(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[actix_web::test]
    async fn me_rejects_expired_token() {
        let state = test_state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let past = chrono::Utc::now().timestamp() as u64 - 7200;
        let stale = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &crate::utils::token::Claims {
                user_id: 1,
                is_admin: true,
                iat: past,
                exp: past + 60,
            },
            &jsonwebtoken::EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(state.tokens.verify_token(&stale).is_none());

        let req = test::TestRequest::post()
            .uri("/admin/me")
            .set_json(json!({ "isAdmin": true, "token": stale }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn delete_removes_admin_and_user() {
        let state = test_state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/admin/register")
            .set_json(register_body("ayesha@example.com"))
            .to_request();
        let registered: Value = test::call_and_read_body_json(&app, req).await;
        let token = registered["token"].as_str().unwrap().to_string();

        let req = test::TestRequest::delete()
            .uri("/admin")
            .set_json(json!({ "email": "ayesha@example.com" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["msg"], "Admin deleted");

        assert_eq!(count(&state, "users"), 0);
        assert_eq!(count(&state, "admins"), 0);

        let req = test::TestRequest::post()
            .uri("/admin/me")
            .set_json(json!({ "isAdmin": true, "token": token }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );

        let req = test::TestRequest::delete()
            .uri("/admin")
            .set_json(json!({ "email": "ayesha@example.com" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[actix_web::test]
    async fn concurrent_duplicate_registrations_create_one_admin() {
        let state = test_state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let requests = (0..8).map(|_| {
            let req = test::TestRequest::post()
                .uri("/admin/register")
                .set_json(register_body("dup@example.com"))
                .to_request();
            test::call_service(&app, req)
        });
        let statuses: Vec<StatusCode> = join_all(requests)
            .await
            .into_iter()
            .map(|resp| resp.status())
            .collect();

        let ok = statuses.iter().filter(|s| **s == StatusCode::OK).count();
        let rejected = statuses
            .iter()
            .filter(|s| **s == StatusCode::BAD_REQUEST)
            .count();
        assert_eq!(ok, 1);
        assert_eq!(rejected, 7);
        assert_eq!(count(&state, "users"), 1);
        assert_eq!(count(&state, "admins"), 1);
    }

    #[actix_web::test]
    async fn me_treats_falsy_flags_and_missing_body_as_unauthorized() {
        let state = test_state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let falsy = [
            json!({ "isAdmin": null, "token": "x" }),
            json!({ "isAdmin": 0, "token": "x" }),
            json!({ "isAdmin": "", "token": "x" }),
            json!({ "token": "x" }),
        ];
        for payload in falsy {
            let req = test::TestRequest::post()
                .uri("/admin/me")
                .set_json(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["message"], "Not an Admin, authorization denied");
        }

        let req = test::TestRequest::post().uri("/admin/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // A truthy non-boolean flag reaches the token check
        let req = test::TestRequest::post()
            .uri("/admin/me")
            .set_json(json!({ "isAdmin": 1, "token": "garbage" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Token is not valid");
    }

    #[actix_web::test]
    async fn hostel_lookup_with_dangling_reference_returns_null() {
        let state = test_state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/admin/register")
            .set_json(register_body("ayesha@example.com"))
            .to_request();
        let registered: Value = test::call_and_read_body_json(&app, req).await;
        let admin_id = registered["admin"]["id"].as_i64().unwrap();

        state
            .with_conn(|conn| {
                conn.execute_batch(
                    "PRAGMA foreign_keys = OFF;
                     DELETE FROM hostels;
                     PRAGMA foreign_keys = ON;",
                )?;
                Ok(())
            })
            .unwrap();

        let req = test::TestRequest::post()
            .uri("/admin/hostel")
            .set_json(json!({ "id": admin_id }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert!(body["hostel"].is_null());
    }
}
