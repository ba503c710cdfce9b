use axum::response::Html;

use super::layout::{escape, page};

const FEATURES: [(&str, &str, &str, [&str; 3]); 3] = [
    (
        "/wardrobe",
        "Virtual Wardrobe",
        "Upload and organize your clothing items. Search your wardrobe by \
         description or with a photo of a similar piece.",
        [
            "Upload clothing images",
            "Similarity search",
            "Smart categorization",
        ],
    ),
    (
        "/recommend",
        "AI Recommender",
        "Get outfit suggestions based on occasion, weather, and your style \
         preferences.",
        [
            "Smart outfit combinations",
            "Context-aware suggestions",
            "Style reasoning & tips",
        ],
    ),
    (
        "/try-on",
        "Virtual Try-On",
        "Visualize how outfits look on you with image generation.",
        [
            "Realistic try-on simulation",
            "Multiple generation modes",
            "Instant previews",
        ],
    ),
];

const STEPS: [(&str, &str); 3] = [
    (
        "Upload Your Wardrobe",
        "Add your clothing items to build your virtual wardrobe",
    ),
    (
        "Get AI Recommendations",
        "Describe your needs and get outfit suggestions",
    ),
    (
        "Visualize & Try On",
        "See how outfits look with generated try-on previews",
    ),
];

pub async fn get_home() -> Html<String> {
    page("Transform Your Wardrobe with AI", None, &render())
}

fn render() -> String {
    let cards = FEATURES
        .iter()
        .map(|(href, title, text, bullets)| {
            let bullets = bullets
                .iter()
                .map(|b| format!("<li>{}</li>", escape(b)))
                .collect::<String>();
            format!(
                r#"<a class="card" href="{href}"><h2>{title}</h2><p>{text}</p><ul class="muted">{bullets}</ul></a>"#,
                title = escape(title),
                text = escape(text),
            )
        })
        .collect::<String>();

    let steps = STEPS
        .iter()
        .enumerate()
        .map(|(i, (title, text))| {
            format!(
                r#"<div class="card"><strong>{}. {}</strong><p class="muted">{}</p></div>"#,
                i + 1,
                escape(title),
                escape(text)
            )
        })
        .collect::<String>();

    format!(
        r#"<p>Upload clothing items, get outfit recommendations, and visualize how they look on you.</p>
<div class="cards">{cards}</div>
<h2>How It Works</h2>
<div class="cards">{steps}</div>"#
    )
}
