//! The web form: one text input, one image output.

use crate::{
    config::AppConfig,
    error::{ErrorKind, FluxError, Result},
    models::ApiError,
    pipeline::Pipeline,
};
use actix_web::http::StatusCode;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};

pub mod page;
pub mod routes;

#[derive(Debug)]
pub struct WebError {
    err: FluxError,
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.err)
    }
}

impl actix_web::error::ResponseError for WebError {
    fn error_response(&self) -> HttpResponse {
        let kind = match self.err.kind() {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Request => "request",
            ErrorKind::Server => "server",
        };
        HttpResponse::build(self.status_code()).json(ApiError {
            error: self.to_string(),
            kind,
        })
    }

    fn status_code(&self) -> StatusCode {
        match &self.err {
            FluxError::EmptyPrompt => StatusCode::BAD_REQUEST,
            err if err.is_request_failure() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FluxError> for WebError {
    fn from(err: FluxError) -> WebError {
        WebError { err }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::index)
        .service(routes::generate_form)
        .service(routes::generate_api)
        .service(routes::health);
}

/// Binds the configured address and serves until the process is stopped.
pub async fn run(config: &AppConfig, pipeline: Pipeline) -> Result<()> {
    let pipeline = web::Data::new(pipeline);

    HttpServer::new(move || {
        App::new()
            .app_data(pipeline.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(config.bind_address())?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            WebError::from(FluxError::EmptyPrompt).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebError::from(FluxError::TranslationError("x".into())).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            WebError::from(FluxError::DecodeError("x".into())).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            WebError::from(FluxError::ConfigError("x".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
