use bytes::Bytes;
use reqwest::multipart::Form;
use tracing::info;

use crate::{ImageFile, Services};

use super::{Diffusion, GenerationParameters};

fn text_fields(parameters: &GenerationParameters, with_strength: bool) -> Form {
    let form = Form::new()
        .text("prompt", parameters.prompt.clone())
        .text("guidance_scale", parameters.guidance_scale.to_string())
        .text(
            "num_inference_steps",
            parameters.num_inference_steps.to_string(),
        );

    if with_strength {
        form.text("strength", parameters.strength.to_string())
    } else {
        form
    }
}

impl Diffusion for Services {
    async fn try_on_simple(
        &self,
        person: ImageFile,
        parameters: GenerationParameters,
    ) -> anyhow::Result<Bytes> {
        info!(task = "try-on", mode = "simple", prompt = %parameters.prompt);

        let form = text_fields(&parameters, true)
            .part("person_image", person.into_part()?);
        let request = self.diffusion.post("/try-on/simple").multipart(form);

        self.diffusion.binary_response(request).await
    }

    async fn try_on_img2img(
        &self,
        person: ImageFile,
        clothing: ImageFile,
        parameters: GenerationParameters,
    ) -> anyhow::Result<Bytes> {
        info!(task = "try-on", mode = "img2img", prompt = %parameters.prompt);

        let form = text_fields(&parameters, true)
            .part("person_image", person.into_part()?)
            .part("clothing_image", clothing.into_part()?);
        let request = self.diffusion.post("/try-on/img2img").multipart(form);

        self.diffusion.binary_response(request).await
    }

    async fn try_on_inpaint(
        &self,
        person: ImageFile,
        mask: ImageFile,
        clothing: ImageFile,
        parameters: GenerationParameters,
    ) -> anyhow::Result<Bytes> {
        info!(task = "try-on", mode = "inpaint", prompt = %parameters.prompt);

        let form = text_fields(&parameters, false)
            .part("person_image", person.into_part()?)
            .part("mask_image", mask.into_part()?)
            .part("clothing_image", clothing.into_part()?);
        let request = self.diffusion.post("/try-on/inpaint").multipart(form);

        self.diffusion.binary_response(request).await
    }

    async fn generate_outfit(
        &self,
        parameters: GenerationParameters,
    ) -> anyhow::Result<Bytes> {
        info!(task = "generate outfit", prompt = %parameters.prompt);

        let form = text_fields(&parameters, false);
        let request = self.diffusion.post("/generate-outfit").multipart(form);

        self.diffusion.binary_response(request).await
    }
}
