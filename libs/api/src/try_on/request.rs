use services::diffusion::{GenerationParameters, TryOnMode};
use utoipa::ToSchema;

use crate::util::multipart::FormData;

/// Multipart body of `POST /api/try-on`, documentation only.
#[derive(ToSchema)]
pub struct TryOnForm {
    pub mode: Option<TryOnMode>,
    pub prompt: Option<String>,
    pub strength: Option<f32>,
    pub guidance_scale: Option<f32>,
    pub num_inference_steps: Option<u32>,
    #[schema(value_type = String, format = Binary)]
    pub person_image: Vec<u8>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub clothing_image: Option<Vec<u8>>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub mask_image: Option<Vec<u8>>,
}

/// Starts from the defaults and applies whatever the form sets.
pub fn parameters_from_form(
    form: &FormData,
) -> anyhow::Result<GenerationParameters> {
    let mut parameters = GenerationParameters::default();

    if let Some(prompt) = form.text("prompt") {
        parameters.prompt = prompt;
    }
    if let Some(strength) = form.parse("strength")? {
        parameters.strength = strength;
    }
    if let Some(guidance_scale) = form.parse("guidance_scale")? {
        parameters.guidance_scale = guidance_scale;
    }
    if let Some(steps) = form.parse("num_inference_steps")? {
        parameters.num_inference_steps = steps;
    }

    Ok(parameters)
}

pub fn mode_from_form(form: &FormData) -> anyhow::Result<TryOnMode> {
    Ok(form.parse("mode")?.unwrap_or_default())
}
