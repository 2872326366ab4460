use axum::{
    async_trait,
    extract::FromRequestParts,
    headers::{authorization::Bearer, Authorization},
    http::request::Parts,
    RequestPartsExt, TypedHeader,
};
use jsonwebtoken::{
    decode, encode, errors::Result as JwtResult, DecodingKey, EncodingKey, Header, Validation,
};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::{
    constants::*,
    models::PrincipalKind,
    utils::{get_epoch_ts, AppError},
};

lazy_static! {
    pub static ref JWT_KEYS: JwtKeys = JwtKeys::new();
}

pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl JwtKeys {
    fn new() -> Self {
        let secret = std::env::var("JWT_SECRET_KEY").unwrap_or("my_secret".to_string());
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Session token for a principal, valid for `JWT_EXPIRY` seconds
    pub fn generate_token(&self, id: u32, kind: PrincipalKind) -> JwtResult<String> {
        let jwt_expiry = std::env::var("JWT_EXPIRY").unwrap_or_default();
        let jwt_expiry = jwt_expiry
            .parse::<usize>()
            .unwrap_or(JWT_DEFAULT_EXPIRY_SECS);
        let jwt_expiry = get_epoch_ts() as usize + jwt_expiry;
        self.sign(id, kind, jwt_expiry)
    }

    fn sign(&self, id: u32, kind: PrincipalKind, exp: usize) -> JwtResult<String> {
        let claims = JwtClaims { sub: id, kind, exp };
        encode(&Header::default(), &claims, &self.encoding)
    }

    pub fn verify(&self, token: &str) -> JwtResult<JwtClaims> {
        let token_data = decode::<JwtClaims>(token, &self.decoding, &Validation::default())?;
        Ok(token_data.claims)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JwtClaims {
    pub sub: u32,
    pub kind: PrincipalKind,
    pub exp: usize,
}

#[async_trait]
impl<S> FromRequestParts<S> for JwtClaims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Auth("Missing token".into()))?;
        JWT_KEYS
            .verify(bearer.token())
            .map_err(|_| AppError::Auth("Invalid Token".into()))
    }
}

/// Claims of a request made with an admin token
#[derive(Debug, Clone)]
pub struct AdminClaims(pub JwtClaims);

#[async_trait]
impl<S> FromRequestParts<S> for AdminClaims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = JwtClaims::from_request_parts(parts, state).await?;
        if claims.kind != PrincipalKind::Admin {
            return Err(AppError::Forbidden("Admin access required".into()));
        }
        Ok(Self(claims))
    }
}
