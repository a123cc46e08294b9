use super::page::{self, Outcome};
use super::WebError;
use crate::{
    models::{GenerateForm, GenerateRequest},
    pipeline::Pipeline,
};
use actix_web::http::header::{ContentType, HeaderValue};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(page::render("", Outcome::Blank))
}

/// Form submission. Always answers with the page; failures render as
/// "no image produced".
#[post("/generate")]
pub async fn generate_form(
    form: web::Form<GenerateForm>,
    pipeline: web::Data<Pipeline>,
) -> impl Responder {
    let prompt = form.into_inner().prompt;

    let body = match pipeline.generate_image(prompt.as_str()).await {
        Ok(generation) => match generation.image.to_data_uri() {
            Ok(data_uri) => page::render(
                &prompt,
                Outcome::Image {
                    data_uri: &data_uri,
                    translated: generation.translated.as_str(),
                },
            ),
            Err(e) => {
                log::error!(request_id = generation.request_id.to_string().as_str(); "{}", e);
                page::render(&prompt, Outcome::NoImage { reason: &e.to_string() })
            }
        },
        Err(e) => page::render(&prompt, Outcome::NoImage { reason: &e.to_string() }),
    };

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

/// JSON in, PNG out.
#[post("/api/generate")]
pub async fn generate_api(
    req: web::Json<GenerateRequest>,
    pipeline: web::Data<Pipeline>,
) -> Result<HttpResponse, WebError> {
    let generation = pipeline.generate_image(req.into_inner().prompt).await?;
    let png = generation.image.to_png()?;

    let mut response = HttpResponse::Ok();
    response.content_type(ContentType::png());
    if let Ok(value) = HeaderValue::from_str(generation.translated.as_str()) {
        response.insert_header(("X-Translated-Prompt", value));
    }
    Ok(response.body(png))
}

#[get("/health")]
pub async fn health() -> impl Responder {
    web::Json(json!({ "status": "ok" }))
}
