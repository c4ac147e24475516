use actix_web::{HttpRequest, HttpResponse, web};
use log::{info, warn};
use serde_json::json;

use crate::database::SessionRegistry;
use crate::middleware::auth::{JwtConfig, SessionUser, session_user};
use crate::user::model::{PublicUser, SignInRequest, SignUpRequest};
use crate::user::service::UserService;
use crate::utils::error::CustomError;
use crate::utils::response;
use crate::utils::validation::parse_object_id;

pub async fn sign_up(
    user_service: web::Data<UserService>,
    user_info: web::Json<SignUpRequest>,
) -> Result<HttpResponse, CustomError> {
    let user = user_service.sign_up(user_info.into_inner()).await?;

    Ok(response::created(
        "User created successfully",
        json!({ "user": PublicUser::from(&user) }),
    ))
}

pub async fn sign_in(
    req: HttpRequest,
    user_service: web::Data<UserService>,
    jwt: web::Data<JwtConfig>,
    login_info: web::Json<SignInRequest>,
) -> Result<HttpResponse, CustomError> {
    let user = user_service.authenticate(&login_info).await?;

    let user_id = user
        .id
        .ok_or_else(|| CustomError::InternalServerError("User ID missing".to_string()))?;
    let token = jwt.create_token(&user_id, user.role)?;

    // Register the session when a registry is configured. If it is down the
    // token still works, since verification falls back to the JWT alone.
    if let Some(sessions) = req.app_data::<web::Data<dyn SessionRegistry>>() {
        if let Err(e) = sessions
            .store_session(&user_id.to_hex(), &token, jwt.ttl_seconds())
            .await
        {
            warn!(
                "failed to register session for {}, issuing JWT-only token: {}",
                user_id, e
            );
        }
    }

    info!("user {} signed in", user_id);

    Ok(response::ok(
        "Login successful",
        json!({
            "token": token,
            "user": PublicUser::from(&user),
        }),
    ))
}

pub async fn sign_out(req: HttpRequest) -> Result<HttpResponse, CustomError> {
    let SessionUser { id, .. } = session_user(&req)?;

    if let Some(sessions) = req.app_data::<web::Data<dyn SessionRegistry>>() {
        if let Err(e) = sessions.invalidate_session(&id.to_hex()).await {
            warn!("failed to invalidate session for {}: {}", id, e);
            return Err(CustomError::InternalServerError(
                "Failed to invalidate session".to_string(),
            ));
        }
    }

    Ok(response::ok("User has been signed out", json!({})))
}

pub async fn get_user(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let user_id = parse_object_id(&path.into_inner(), "user ID")?;
    let user = user_service.get_user(&user_id).await?;

    Ok(response::ok(
        "User fetched successfully",
        json!({ "user": PublicUser::from(&user) }),
    ))
}
