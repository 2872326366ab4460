use axum::{async_trait, extract::FromRequest, http::Request, Json, RequestExt};
use validator::Validate;

use super::AppError;

/// JSON body extractor which runs the `validator` rules before the handler
pub struct ValidatedBody<T>(pub T);

#[async_trait]
impl<S, B, T> FromRequest<S, B> for ValidatedBody<T>
where
    B: Send + 'static,
    S: Send + Sync,
    T: Validate + 'static,
    Json<T>: FromRequest<(), B>,
{
    type Rejection = AppError;

    async fn from_request(req: Request<B>, _state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = req.extract::<Json<T>, _>().await.map_err(|_| {
            let msg = "Error extracting the JSON body".to_string();
            AppError::BadRequestErr(msg)
        })?;
        data.validate()
            .map_err(|err| AppError::BadRequestErr(err.to_string()))?;
        Ok(Self(data))
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::StatusCode, routing::post, Router};
    use serde::Deserialize;
    use tower::ServiceExt;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct Body1 {
        #[validate(email)]
        email: String,
    }

    async fn handler(ValidatedBody(body): ValidatedBody<Body1>) -> String {
        body.email
    }

    fn req(body: &str) -> Request<Body> {
        Request::builder()
            .uri("/")
            .method("POST")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_validated_body() {
        let app = Router::new().route("/", post(handler));
        let res = app.clone().oneshot(req(r#"{"email": "a@b.co"}"#)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let res = app.clone().oneshot(req(r#"{"email": "nope"}"#)).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let res = app.oneshot(req(r#"{}"#)).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
