pub mod implementation;

use std::{fmt, ops::RangeInclusive, str::FromStr};

use anyhow::{anyhow, ensure};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ImageFile;

pub const DEFAULT_PROMPT: &str =
    "person wearing stylish casual outfit, high quality photo";
pub const STRENGTH_RANGE: RangeInclusive<f32> = 0.0..=1.0;
pub const GUIDANCE_SCALE_RANGE: RangeInclusive<f32> = 1.0..=20.0;
pub const STEPS_RANGE: RangeInclusive<u32> = 10..=100;

/// Every method answers with the generated PNG.
pub trait Diffusion {
    fn try_on_simple(
        &self,
        person: ImageFile,
        parameters: GenerationParameters,
    ) -> impl std::future::Future<Output = anyhow::Result<Bytes>> + Send;

    fn try_on_img2img(
        &self,
        person: ImageFile,
        clothing: ImageFile,
        parameters: GenerationParameters,
    ) -> impl std::future::Future<Output = anyhow::Result<Bytes>> + Send;

    /// `strength` is not used by the inpainting pipeline.
    fn try_on_inpaint(
        &self,
        person: ImageFile,
        mask: ImageFile,
        clothing: ImageFile,
        parameters: GenerationParameters,
    ) -> impl std::future::Future<Output = anyhow::Result<Bytes>> + Send;

    /// Text-only visualization; `strength` is fixed by the service.
    fn generate_outfit(
        &self,
        parameters: GenerationParameters,
    ) -> impl std::future::Future<Output = anyhow::Result<Bytes>> + Send;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct GenerationParameters {
    pub prompt: String,
    pub strength: f32,
    pub guidance_scale: f32,
    pub num_inference_steps: u32,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            strength: 0.7,
            guidance_scale: 7.5,
            num_inference_steps: 30,
        }
    }
}

impl GenerationParameters {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.prompt.trim().is_empty(), "prompt must not be empty");
        ensure!(
            STRENGTH_RANGE.contains(&self.strength),
            "strength must be within {:?}, got {}",
            STRENGTH_RANGE,
            self.strength
        );
        ensure!(
            GUIDANCE_SCALE_RANGE.contains(&self.guidance_scale),
            "guidance scale must be within {:?}, got {}",
            GUIDANCE_SCALE_RANGE,
            self.guidance_scale
        );
        ensure!(
            STEPS_RANGE.contains(&self.num_inference_steps),
            "step count must be within {:?}, got {}",
            STEPS_RANGE,
            self.num_inference_steps
        );

        Ok(())
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum TryOnMode {
    #[default]
    Simple,
    Img2img,
    Inpaint,
}

impl TryOnMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TryOnMode::Simple => "simple",
            TryOnMode::Img2img => "img2img",
            TryOnMode::Inpaint => "inpaint",
        }
    }
}

impl fmt::Display for TryOnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TryOnMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(TryOnMode::Simple),
            "img2img" => Ok(TryOnMode::Img2img),
            "inpaint" => Ok(TryOnMode::Inpaint),
            other => Err(anyhow!("unknown try-on mode: {}", other)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{GenerationParameters, TryOnMode};

    #[test]
    fn test_default_parameters_are_valid() {
        let parameters = GenerationParameters::default();

        assert!(parameters.validate().is_ok());
        assert_eq!(parameters.num_inference_steps, 30);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let cases = [
            GenerationParameters {
                strength: 1.5,
                ..Default::default()
            },
            GenerationParameters {
                guidance_scale: 0.5,
                ..Default::default()
            },
            GenerationParameters {
                num_inference_steps: 5,
                ..Default::default()
            },
            GenerationParameters {
                prompt: "  ".to_string(),
                ..Default::default()
            },
        ];

        for parameters in cases {
            assert!(parameters.validate().is_err(), "{:?}", parameters);
        }
    }

    #[test]
    fn test_validate_accepts_bounds() {
        let parameters = GenerationParameters {
            prompt: "linen suit".to_string(),
            strength: 0.0,
            guidance_scale: 20.0,
            num_inference_steps: 100,
        };

        assert!(parameters.validate().is_ok());
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("IMG2IMG".parse::<TryOnMode>().unwrap(), TryOnMode::Img2img);
        assert!("collage".parse::<TryOnMode>().is_err());
    }
}
