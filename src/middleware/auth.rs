use actix_web::{Error, HttpMessage, HttpRequest, dev::ServiceRequest, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use log::warn;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::database::SessionRegistry;
use crate::user::model::Role;
use crate::utils::error::CustomError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: String,
    pub role: Role,
    pub exp: usize,
}

/// Signs and verifies session tokens.
#[derive(Clone)]
pub struct JwtConfig {
    secret: String,
    ttl: Duration,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, ttl_hours: i64) -> Self {
        JwtConfig {
            secret: secret.into(),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl.num_seconds().max(0) as u64
    }

    pub fn create_token(&self, user_id: &ObjectId, role: Role) -> Result<String, CustomError> {
        let expiration = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| CustomError::InternalServerError("Invalid token lifetime".into()))?
            .timestamp() as usize;

        let claims = Claims {
            id: user_id.to_hex(),
            role,
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|_| CustomError::InternalServerError("Token generation failed".to_string()))
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, CustomError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| CustomError::UnauthorizedError("Invalid token".to_string()))
    }
}

/// The caller behind a verified session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser {
    pub id: ObjectId,
    pub role: Role,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admin-only gate
    pub fn require_admin(&self) -> Result<(), CustomError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(CustomError::ForbiddenError(
                "Only admins can perform this action".to_string(),
            ))
        }
    }
}

impl TryFrom<&Claims> for SessionUser {
    type Error = CustomError;

    fn try_from(claims: &Claims) -> Result<Self, Self::Error> {
        let id = ObjectId::parse_str(&claims.id)
            .map_err(|_| CustomError::UnauthorizedError("Invalid user id in token".into()))?;
        Ok(SessionUser {
            id,
            role: claims.role,
        })
    }
}

/// Bearer validator: verifies the JWT and, when a session registry is configured, that the
/// session is still registered. Claims are stored in the request extensions.
pub async fn verify_token(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let token = credentials.token();

    let Some(jwt) = req.app_data::<web::Data<JwtConfig>>() else {
        return Err((
            CustomError::InternalServerError("Token verification is not configured".into()).into(),
            req,
        ));
    };

    let claims = match jwt.decode_token(token) {
        Ok(claims) => claims,
        Err(e) => return Err((e.into(), req)),
    };

    let Some(sessions) = req.app_data::<web::Data<dyn SessionRegistry>>() else {
        // JWT-only mode
        req.extensions_mut().insert(claims);
        return Ok(req);
    };

    match sessions.validate_session(token).await {
        Ok(Some(stored_user_id)) if stored_user_id == claims.id => {
            req.extensions_mut().insert(claims);
            Ok(req)
        }
        Ok(Some(_)) => Err((
            CustomError::UnauthorizedError("Session mismatch".into()).into(),
            req,
        )),
        Ok(None) => Err((
            CustomError::UnauthorizedError("Session expired or invalid".into()).into(),
            req,
        )),
        Err(e) => {
            // Registry outage: fall back to the JWT alone
            warn!("session lookup failed, accepting JWT only: {}", e);
            req.extensions_mut().insert(claims);
            Ok(req)
        }
    }
}

/// Caller of a route wrapped by `verify_token`
pub fn session_user(req: &HttpRequest) -> Result<SessionUser, CustomError> {
    let extensions = req.extensions();
    let claims = extensions
        .get::<Claims>()
        .ok_or_else(|| CustomError::UnauthorizedError("Not authenticated".to_string()))?;
    SessionUser::try_from(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_identity_and_role() {
        let jwt = JwtConfig::new("test-secret", 1);
        let user_id = ObjectId::new();

        let token = jwt.create_token(&user_id, Role::Admin).unwrap();
        let claims = jwt.decode_token(&token).unwrap();
        let user = SessionUser::try_from(&claims).unwrap();

        assert_eq!(user.id, user_id);
        assert!(user.is_admin());
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = JwtConfig::new("secret-a", 1)
            .create_token(&ObjectId::new(), Role::User)
            .unwrap();
        let err = JwtConfig::new("secret-b", 1).decode_token(&token).unwrap_err();
        assert!(matches!(err, CustomError::UnauthorizedError(_)));
    }

    #[test]
    fn rejects_expired_token() {
        // Default validation leeway is 60s, so go well past it
        let token = JwtConfig::new("test-secret", -2)
            .create_token(&ObjectId::new(), Role::User)
            .unwrap();
        assert!(JwtConfig::new("test-secret", 1).decode_token(&token).is_err());
    }

    #[test]
    fn require_admin_forbids_regular_users() {
        let user = SessionUser {
            id: ObjectId::new(),
            role: Role::User,
        };
        assert!(matches!(
            user.require_admin(),
            Err(CustomError::ForbiddenError(_))
        ));
    }
}
