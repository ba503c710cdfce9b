use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use services::{
    diffusion::{Diffusion, GenerationParameters, TryOnMode},
    ImageFile, Services,
};

pub mod request;

use crate::response::{ApiResponse, IntoApiResponse};
use crate::util::multipart::FormData;
use crate::{ApiError, ApiState};

use self::request::{mode_from_form, parameters_from_form};

/// Images checked against what the chosen mode needs.
#[derive(Debug)]
pub enum TryOnImages {
    Simple {
        person: ImageFile,
    },
    Img2img {
        person: ImageFile,
        clothing: ImageFile,
    },
    Inpaint {
        person: ImageFile,
        mask: ImageFile,
        clothing: ImageFile,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingImage {
    Person,
    Clothing,
    ClothingAndMask,
}

impl MissingImage {
    /// What the page tells the user.
    pub fn message(&self) -> &'static str {
        match self {
            MissingImage::Person => "Please upload a person image",
            MissingImage::Clothing => {
                "Please upload a clothing image for img2img mode"
            }
            MissingImage::ClothingAndMask => {
                "Please upload a clothing image and a mask image for inpaint mode"
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            MissingImage::Person => "400-002",
            MissingImage::Clothing => "400-005",
            MissingImage::ClothingAndMask => "400-006",
        }
    }
}

impl TryOnImages {
    pub fn new(
        mode: TryOnMode,
        person: Option<ImageFile>,
        clothing: Option<ImageFile>,
        mask: Option<ImageFile>,
    ) -> Result<Self, MissingImage> {
        let person = person.ok_or(MissingImage::Person)?;

        match mode {
            TryOnMode::Simple => Ok(TryOnImages::Simple { person }),
            TryOnMode::Img2img => Ok(TryOnImages::Img2img {
                person,
                clothing: clothing.ok_or(MissingImage::Clothing)?,
            }),
            TryOnMode::Inpaint => match (clothing, mask) {
                (Some(clothing), Some(mask)) => Ok(TryOnImages::Inpaint {
                    person,
                    mask,
                    clothing,
                }),
                _ => Err(MissingImage::ClothingAndMask),
            },
        }
    }

    pub async fn generate(
        self,
        services: &Services,
        parameters: GenerationParameters,
    ) -> anyhow::Result<Bytes> {
        match self {
            TryOnImages::Simple { person } => {
                services.try_on_simple(person, parameters).await
            }
            TryOnImages::Img2img { person, clothing } => {
                services.try_on_img2img(person, clothing, parameters).await
            }
            TryOnImages::Inpaint {
                person,
                mask,
                clothing,
            } => {
                services
                    .try_on_inpaint(person, mask, clothing, parameters)
                    .await
            }
        }
    }
}

fn png(image: Bytes) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/png")], image)
}

/// Generate a try-on image
#[utoipa::path(
    post,
    path = "/api/try-on",
    request_body(content = crate::try_on::request::TryOnForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Generated PNG", content_type = "image/png"),
        (status = 400, description = "Missing image or invalid parameters"),
        (status = 502, description = "Diffusion service failed")
    )
)]
pub async fn post_try_on(
    State(state): State<ApiState>,
    multipart: Multipart,
) -> ApiResponse<impl IntoResponse> {
    let mut form = FormData::read(multipart).await.into_response("400-001")?;

    let mode = mode_from_form(&form).into_response("400-003")?;
    let parameters = parameters_from_form(&form).into_response("400-003")?;
    parameters.validate().into_response("400-003")?;

    let images = TryOnImages::new(
        mode,
        form.take_file("person_image"),
        form.take_file("clothing_image"),
        form.take_file("mask_image"),
    )
    .map_err(|missing| ApiError::from_code(missing.error_code()))?;

    let image = images
        .generate(&state.services, parameters)
        .await
        .into_response("502-008")?;

    Ok(png(image))
}

/// Generate an outfit picture from text
#[utoipa::path(
    post,
    path = "/api/generate-outfit",
    request_body = GenerationParameters,
    responses(
        (status = 200, description = "Generated PNG", content_type = "image/png"),
        (status = 400, description = "Invalid parameters"),
        (status = 502, description = "Diffusion service failed")
    )
)]
pub async fn post_generate_outfit(
    State(state): State<ApiState>,
    Json(parameters): Json<GenerationParameters>,
) -> ApiResponse<impl IntoResponse> {
    parameters.validate().into_response("400-003")?;

    let image = state
        .services
        .generate_outfit(parameters)
        .await
        .into_response("502-009")?;

    Ok(png(image))
}
