use std::{fmt::Write, str::FromStr};

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_with::{serde_as, NoneAsEmptyString};
use services::{
    catalog::{Catalog, ClothingItem},
    recommender::{Occasion, OutfitRequest, RecommendResponse, Recommender, Weather},
};
use tracing::{error, info, warn};

use crate::{
    session::{Action, Busy, Notice},
    util::non_blank,
    ApiState,
};

use super::layout::{escape, options, page};

pub const GREETING: &str = "Hi! I'm your AI fashion stylist. Tell me about the \
    outfit you're looking for - what's the occasion, weather, or style you prefer?";
pub const FALLBACK: &str =
    "Sorry, I couldn't generate a recommendation. Please try again.";
pub const SERVICE_ERROR: &str = "Sorry, I encountered an error. Please make \
    sure the recommendation service is running and try again.";
pub const INVALID_OPTIONS: &str = "Unknown occasion or weather";

pub const QUICK_PROMPTS: [&str; 5] = [
    "Suggest a casual weekend outfit",
    "What should I wear to a business meeting?",
    "Help me with a date night outfit",
    "I need something for a wedding",
    "Casual Friday work outfit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendOptions {
    pub occasion: Option<Occasion>,
    pub weather: Option<Weather>,
    pub style_preference: Option<String>,
    pub color_preference: Option<String>,
}

impl RecommendOptions {
    /// Reads the option fields of a submitted form; blank selects mean "any".
    pub fn from_form(form: &SendForm) -> anyhow::Result<Self> {
        Ok(Self {
            occasion: parse_choice(&form.occasion)?,
            weather: parse_choice(&form.weather)?,
            style_preference: non_blank(form.style_preference.clone()),
            color_preference: non_blank(form.color_preference.clone()),
        })
    }
}

fn parse_choice<T>(value: &Option<String>) -> anyhow::Result<Option<T>>
where
    T: FromStr<Err = anyhow::Error>,
{
    value.as_deref().map(str::parse).transpose()
}

/// The conversation of one session, oldest message first.
#[derive(Debug)]
pub struct Chat {
    messages: Vec<ChatMessage>,
    pub options: RecommendOptions,
    /// Wardrobe as loaded with the page, sent along with every prompt.
    pub wardrobe: Vec<ClothingItem>,
}

impl Default for Chat {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage {
                role: Role::Assistant,
                content: GREETING.to_string(),
            }],
            options: RecommendOptions::default(),
            wardrobe: Vec::new(),
        }
    }
}

impl Chat {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role,
            content: content.into(),
        });
    }

    /// Starts over with the greeting, keeping options and wardrobe.
    pub fn reset(&mut self) {
        let options = std::mem::take(&mut self.options);
        let wardrobe = std::mem::take(&mut self.wardrobe);
        *self = Chat {
            options,
            wardrobe,
            ..Chat::default()
        };
    }

    pub fn outfit_request(&self, prompt: String) -> OutfitRequest {
        OutfitRequest {
            prompt,
            occasion: self.options.occasion,
            weather: self.options.weather,
            style_preference: self.options.style_preference.clone(),
            color_preference: self.options.color_preference.clone(),
            available_items: (!self.wardrobe.is_empty())
                .then(|| self.wardrobe.clone()),
        }
    }
}

/// Turns a service answer into the assistant's chat text. The free text wins;
/// the structured fields are only used when it is missing.
pub fn compose_assistant_message(response: &RecommendResponse) -> String {
    if response.success {
        if let Some(full_text) = response.full_text.as_deref() {
            if !full_text.is_empty() {
                return full_text.to_string();
            }
        }
    }

    let Some(recommendation) = &response.recommendation else {
        return FALLBACK.to_string();
    };

    let mut message = format!("**{}**\n\n", recommendation.outfit_description);

    if !recommendation.items.is_empty() {
        message.push_str("**Items:**\n");
        for (i, item) in recommendation.items.iter().enumerate() {
            let _ = writeln!(message, "{}. {}", i + 1, item.description);
        }
        message.push('\n');
    }

    if !recommendation.reasoning.is_empty() {
        let _ = write!(
            message,
            "**Why this works:**\n{}\n\n",
            recommendation.reasoning
        );
    }

    if let Some(style_tips) = recommendation.style_tips.as_deref() {
        if !style_tips.is_empty() {
            let _ = write!(message, "**Style Tips:**\n{}", style_tips);
        }
    }

    message
}

#[derive(Deserialize)]
pub struct RecommendPageParam {
    pub prompt: Option<String>,
}

#[serde_as]
#[derive(Deserialize)]
pub struct SendForm {
    #[serde(default)]
    pub message: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub style_preference: Option<String>,
    #[serde(default)]
    pub color_preference: Option<String>,
}

pub async fn get_recommend(
    State(state): State<ApiState>,
    jar: CookieJar,
    Query(params): Query<RecommendPageParam>,
) -> impl IntoResponse {
    let (jar, session) = state.sessions.resolve(jar);

    let wardrobe = match state.services.list_items::<Vec<ClothingItem>>().await {
        Ok(items) => items,
        Err(e) => {
            error!(task = "load wardrobe", error = ?e);
            Vec::new()
        }
    };

    let mut session = session.lock();
    session.chat.wardrobe = wardrobe;
    let thinking = session.is_busy(Action::Recommend);
    let notice = session.take_notice();
    let body = render(&session.chat, thinking, params.prompt.as_deref());

    (jar, page("AI Outfit Recommender", notice, &body))
}

pub async fn post_send(
    State(state): State<ApiState>,
    jar: CookieJar,
    Form(form): Form<SendForm>,
) -> impl IntoResponse {
    let (jar, session) = state.sessions.resolve(jar);
    let back = (jar, Redirect::to("/recommend"));

    let options = match RecommendOptions::from_form(&form) {
        Ok(options) => options,
        Err(e) => {
            warn!(task = "recommend", error = %e);
            session
                .lock()
                .notify(Notice::Error(INVALID_OPTIONS.to_string()));
            return back;
        }
    };
    session.lock().chat.options = options;

    let Some(message) = non_blank(Some(form.message)) else {
        return back;
    };
    let Some(_busy) = Busy::begin(&session, Action::Recommend) else {
        return back;
    };

    let request = {
        let mut session = session.lock();
        session.chat.push(Role::User, message.clone());
        session.chat.outfit_request(message)
    };

    let reply = match state
        .services
        .recommend::<_, RecommendResponse>(&request)
        .await
    {
        Ok(response) => compose_assistant_message(&response),
        Err(e) => {
            error!(task = "recommend", error = ?e);
            SERVICE_ERROR.to_string()
        }
    };
    info!(task = "recommend", reply_len = reply.len());

    session.lock().chat.push(Role::Assistant, reply);

    back
}

pub async fn post_reset(
    State(state): State<ApiState>,
    jar: CookieJar,
) -> impl IntoResponse {
    let (jar, session) = state.sessions.resolve(jar);
    session.lock().chat.reset();

    (jar, Redirect::to("/recommend"))
}

fn render(chat: &Chat, thinking: bool, prefill: Option<&str>) -> String {
    let mut messages = String::new();
    for message in chat.messages() {
        let author = match message.role {
            Role::Assistant => "<strong>AI Stylist</strong>\n",
            Role::User => "",
        };
        let _ = write!(
            messages,
            r#"<div class="message {}">{}{}</div>"#,
            message.role.as_str(),
            author,
            escape(&message.content)
        );
    }
    if thinking {
        messages.push_str(r#"<div class="message assistant muted">Thinking...</div>"#);
    }

    let occasions = Occasion::ALL.map(|o| o.as_str());
    let weathers = Weather::ALL.map(|w| w.as_str());
    let chosen = &chat.options;
    let wardrobe_hint = if chat.wardrobe.is_empty() {
        "Add items to wardrobe for personalized suggestions"
    } else {
        "AI will consider your wardrobe"
    };

    let quick_prompts = QUICK_PROMPTS
        .iter()
        .map(|prompt| {
            format!(
                r#"<form method="get" action="/recommend"><input type="hidden" name="prompt" value="{value}"><button type="submit">{value}</button></form>"#,
                value = escape(prompt)
            )
        })
        .collect::<String>();

    format!(
        r#"<p class="muted">Powered by the recommendation service</p>
<form method="post" action="/recommend/send">
<div class="grid">
<aside class="card">
<h2>Options</h2>
<label>Occasion<select name="occasion">{occasion}</select></label>
<label>Weather<select name="weather">{weather}</select></label>
<label>Style<input type="text" name="style_preference" value="{style}" placeholder="e.g., minimalist"></label>
<label>Color Preference<input type="text" name="color_preference" value="{color}" placeholder="e.g., earth tones"></label>
<p class="muted">Wardrobe: {count} items<br>{wardrobe_hint}</p>
</aside>
<section class="card">
<div id="messages">{messages}</div>
<input type="text" name="message" value="{prefill}" placeholder="Describe what you're looking for..." autofocus>
<button type="submit">Send</button>
</section>
</div>
</form>
<div class="card">
<h3>Quick Prompts</h3>
{quick_prompts}
<form method="post" action="/recommend/reset"><button type="submit">New conversation</button></form>
</div>"#,
        occasion = options("Any", &occasions, chosen.occasion.map(|o| o.as_str())),
        weather = options("Any", &weathers, chosen.weather.map(|w| w.as_str())),
        style = escape(chosen.style_preference.as_deref().unwrap_or_default()),
        color = escape(chosen.color_preference.as_deref().unwrap_or_default()),
        count = chat.wardrobe.len(),
        prefill = escape(prefill.unwrap_or_default()),
    )
}
