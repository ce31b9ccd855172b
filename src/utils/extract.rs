//! Extractores de axum con rechazos en el sobre de error de la API
//!
//! `Json` y `Query` envuelven a los de axum: un cuerpo o una query que no
//! se pueden deserializar responden 400 `BAD_REQUEST` en lugar del 422 en
//! texto plano de axum.

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Request,
    },
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::utils::errors::AppError;

/// Cuerpo JSON. También sirve como respuesta.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(request, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Parámetros de la query string
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Query(value)) => Ok(Query(value)),
            Err(rejection) => Err(query_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    debug!("Cuerpo JSON rechazado: {}", rejection.body_text());

    let message = match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "El cuerpo debe enviarse como application/json".to_string()
        }
        JsonRejection::JsonSyntaxError(_) => "El cuerpo no es un JSON válido".to_string(),
        other => format!("Cuerpo de la solicitud inválido: {}", other.body_text()),
    };

    AppError::BadRequest(message)
}

fn query_rejection(rejection: QueryRejection) -> AppError {
    AppError::BadRequest(format!(
        "Parámetros de consulta inválidos: {}",
        rejection.body_text()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Login {
        email: String,
    }

    fn request(content_type: Option<&str>, body: &str) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_json_accepts_valid_body() {
        let Json(login) = Json::<Login>::from_request(
            request(Some("application/json"), r#"{"email":"ana@mobzi.mx"}"#),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(login.email, "ana@mobzi.mx");
    }

    #[tokio::test]
    async fn test_json_rejections_are_bad_requests() {
        let cases = [
            (Some("application/json"), r#"{"email": 1"#, "El cuerpo no es un JSON válido"),
            (None, r#"{"email":"ana@mobzi.mx"}"#, "El cuerpo debe enviarse como application/json"),
        ];

        for (content_type, body, expected) in cases {
            let error = Json::<Login>::from_request(request(content_type, body), &())
                .await
                .unwrap_err();
            assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(error.to_string(), format!("Bad request: {}", expected));
        }
    }

    #[tokio::test]
    async fn test_json_missing_field_is_bad_request() {
        let error = Json::<Login>::from_request(request(Some("application/json"), "{}"), &())
            .await
            .unwrap_err();
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert!(error.to_string().contains("email"));
    }

    #[tokio::test]
    async fn test_query_rejection_is_bad_request() {
        #[derive(Debug, Deserialize)]
        struct Pagina {
            #[allow(dead_code)]
            pagina: u32,
        }

        let (mut parts, _) = axum::http::Request::builder()
            .uri("/?pagina=uno")
            .body(())
            .unwrap()
            .into_parts();

        let error = Query::<Pagina>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }
}
