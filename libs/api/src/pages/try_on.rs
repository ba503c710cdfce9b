use std::fmt::Write;

use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use bytes::Bytes;
use services::{
    diffusion::{Diffusion, GenerationParameters, TryOnMode},
    ImageFile,
};
use tracing::{error, info};

use crate::{
    session::{Action, Busy, Notice, SessionHandle},
    try_on::{
        request::{mode_from_form, parameters_from_form},
        MissingImage, TryOnImages,
    },
    util::{data_url, multipart::FormData},
    ApiState,
};

use super::layout::{escape, page};

pub const TRY_ON_FAILED: &str =
    "Failed to generate try-on. Make sure the diffusion service is running.";
pub const OUTFIT_FAILED: &str = "Failed to generate outfit visualization";

const MODES: [(TryOnMode, &str); 3] = [
    (TryOnMode::Simple, "Quick preview from the person photo and prompt"),
    (TryOnMode::Img2img, "Blend a clothing image into the person photo"),
    (TryOnMode::Inpaint, "Repaint only the masked area"),
];

#[derive(Debug, Default)]
pub struct TryOnView {
    pub mode: TryOnMode,
    pub person: Option<ImageFile>,
    pub clothing: Option<ImageFile>,
    pub mask: Option<ImageFile>,
    pub parameters: GenerationParameters,
    pub result: Option<Bytes>,
}

impl TryOnView {
    /// Newly uploaded images replace the stored ones; inputs left empty keep
    /// what was uploaded before.
    pub fn accept_uploads(&mut self, form: &mut FormData) {
        if let Some(person) = form.take_file("person_image") {
            self.person = Some(person);
        }
        if let Some(clothing) = form.take_file("clothing_image") {
            self.clothing = Some(clothing);
        }
        if let Some(mask) = form.take_file("mask_image") {
            self.mask = Some(mask);
        }
    }

    pub fn images(&self) -> Result<TryOnImages, MissingImage> {
        TryOnImages::new(
            self.mode,
            self.person.clone(),
            self.clothing.clone(),
            self.mask.clone(),
        )
    }
}

pub async fn get_try_on(
    State(state): State<ApiState>,
    jar: CookieJar,
) -> impl IntoResponse {
    let (jar, session) = state.sessions.resolve(jar);

    let mut session = session.lock();
    let generating = session.is_busy(Action::TryOn);
    let notice = session.take_notice();
    let body = render(&session.try_on, generating);

    (jar, page("Virtual Try-On", notice, &body))
}

pub async fn post_generate(
    State(state): State<ApiState>,
    jar: CookieJar,
    multipart: Multipart,
) -> impl IntoResponse {
    let (jar, session) = state.sessions.resolve(jar);
    let back = (jar, Redirect::to("/try-on"));

    let Some(_busy) = Busy::begin(&session, Action::TryOn) else {
        return back;
    };
    let Some(mut form) = read_form(&session, multipart, TRY_ON_FAILED).await else {
        return back;
    };

    // uploads are kept even when the settings below are rejected
    session.lock().try_on.accept_uploads(&mut form);

    let settings = mode_from_form(&form)
        .and_then(|mode| Ok((mode, parameters_from_form(&form)?)));
    let (mode, parameters) = match settings {
        Ok(settings) => settings,
        Err(e) => {
            invalid(&session, &e);
            return back;
        }
    };

    let images = {
        let mut guard = session.lock();
        let view = &mut guard.try_on;
        view.mode = mode;
        view.parameters = parameters.clone();

        let images = parameters
            .validate()
            .map_err(|e| invalid_notice(&e))
            .and_then(|()| {
                view.images().map_err(|missing| {
                    Notice::Error(missing.message().to_string())
                })
            });
        match images {
            Ok(images) => {
                view.result = None;
                images
            }
            Err(notice) => {
                guard.notify(notice);
                return back;
            }
        }
    };

    match images.generate(&state.services, parameters).await {
        Ok(image) => {
            info!(task = "try-on", mode = %mode, bytes = image.len());
            session.lock().try_on.result = Some(image);
        }
        Err(e) => {
            error!(task = "try-on", mode = %mode, error = ?e);
            fail(&session, TRY_ON_FAILED);
        }
    }

    back
}

pub async fn post_generate_outfit(
    State(state): State<ApiState>,
    jar: CookieJar,
    multipart: Multipart,
) -> impl IntoResponse {
    let (jar, session) = state.sessions.resolve(jar);
    let back = (jar, Redirect::to("/try-on"));

    let Some(_busy) = Busy::begin(&session, Action::TryOn) else {
        return back;
    };
    let Some(form) = read_form(&session, multipart, OUTFIT_FAILED).await else {
        return back;
    };

    let parameters = match parameters_from_form(&form) {
        Ok(parameters) => parameters,
        Err(e) => {
            invalid(&session, &e);
            return back;
        }
    };
    {
        let mut session = session.lock();
        session.try_on.parameters = parameters.clone();
        if let Err(e) = parameters.validate() {
            session.notify(invalid_notice(&e));
            return back;
        }
        session.try_on.result = None;
    }

    match state.services.generate_outfit(parameters).await {
        Ok(image) => {
            info!(task = "generate outfit", bytes = image.len());
            session.lock().try_on.result = Some(image);
        }
        Err(e) => {
            error!(task = "generate outfit", error = ?e);
            fail(&session, OUTFIT_FAILED);
        }
    }

    back
}

async fn read_form(
    session: &SessionHandle,
    multipart: Multipart,
    failure: &str,
) -> Option<FormData> {
    match FormData::read(multipart).await {
        Ok(form) => Some(form),
        Err(e) => {
            error!(task = "read try-on form", error = ?e);
            fail(session, failure);
            None
        }
    }
}

fn invalid_notice(e: &anyhow::Error) -> Notice {
    Notice::Error(format!("Invalid generation parameters: {}", e))
}

fn invalid(session: &SessionHandle, e: &anyhow::Error) {
    session.lock().notify(invalid_notice(e));
}

fn fail(session: &SessionHandle, message: &str) {
    session.lock().notify(Notice::Error(message.to_string()));
}

fn preview(label: &str, image: Option<&ImageFile>) -> String {
    match image {
        Some(image) => format!(
            r#"<p class="muted">{label}: {name}</p><img class="preview" src="{src}" alt="{label}">"#,
            label = escape(label),
            name = escape(&image.file_name),
            src = data_url(image.mime(), &image.bytes),
        ),
        None => String::new(),
    }
}

fn render(view: &TryOnView, generating: bool) -> String {
    let mut modes = String::new();
    for (mode, description) in MODES {
        let checked = if mode == view.mode { " checked" } else { "" };
        let _ = write!(
            modes,
            r#"<label><input type="radio" name="mode" value="{value}"{checked}> <strong>{value}</strong> <span class="muted">{description}</span></label>"#,
            value = mode.as_str(),
        );
    }

    let result = if generating {
        r#"<p class="muted">Generating...</p>"#.to_string()
    } else {
        match &view.result {
            Some(image) => {
                let src = data_url("image/png", image);
                format!(
                    r#"<img class="preview" src="{src}" alt="Generated result"><p><a href="{src}" download="outfit-result.png">Download</a></p>"#
                )
            }
            None => r#"<p class="muted">Your generated image will appear here</p>"#
                .to_string(),
        }
    };

    let parameters = &view.parameters;

    format!(
        r#"<form method="post" action="/try-on/generate" enctype="multipart/form-data">
<div class="grid">
<aside>
<div class="card">
<h2>Mode</h2>
{modes}
</div>
<div class="card">
<h2>Images</h2>
<label>Person Image<input type="file" name="person_image" accept="image/*"></label>
{person}
<label>Clothing Image<input type="file" name="clothing_image" accept="image/*"></label>
{clothing}
<label>Mask Image<input type="file" name="mask_image" accept="image/*"></label>
{mask}
</div>
<div class="card">
<h2>Parameters</h2>
<label>Prompt<textarea name="prompt" rows="3">{prompt}</textarea></label>
<label>Strength<input type="number" name="strength" min="0" max="1" step="0.05" value="{strength}"></label>
<label>Guidance Scale<input type="number" name="guidance_scale" min="1" max="20" step="0.5" value="{guidance_scale}"></label>
<label>Steps<input type="number" name="num_inference_steps" min="10" max="100" step="1" value="{steps}"></label>
</div>
<button type="submit">Generate Try-On</button>
<button type="submit" formaction="/try-on/generate-outfit">Generate from Text</button>
</aside>
<section class="card">
<h2>Result</h2>
{result}
</section>
</div>
</form>"#,
        person = preview("Person", view.person.as_ref()),
        clothing = preview("Clothing", view.clothing.as_ref()),
        mask = preview("Mask", view.mask.as_ref()),
        prompt = escape(&parameters.prompt),
        strength = parameters.strength,
        guidance_scale = parameters.guidance_scale,
        steps = parameters.num_inference_steps,
    )
}
