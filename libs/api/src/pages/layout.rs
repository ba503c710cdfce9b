use std::fmt::Write;

use axum::response::Html;

use crate::session::Notice;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f7f7fb; color: #1f2937; }
header { background: #fff; box-shadow: 0 1px 2px rgba(0,0,0,.08); padding: 1rem 2rem; }
header a { margin-right: 1rem; color: #4f46e5; text-decoration: none; }
main { max-width: 72rem; margin: 0 auto; padding: 2rem; }
.grid { display: grid; grid-template-columns: 20rem 1fr; gap: 2rem; }
.cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(12rem, 1fr)); gap: 1rem; }
.card { background: #fff; border-radius: .5rem; padding: 1rem; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
.notice { padding: .75rem 1rem; border-radius: .5rem; margin-bottom: 1rem; }
.notice.success { background: #dcfce7; }
.notice.error { background: #fee2e2; }
.message { white-space: pre-wrap; padding: .75rem 1rem; border-radius: .5rem; margin: .5rem 0; max-width: 80%; }
.message.user { background: #4f46e5; color: #fff; margin-left: auto; }
.message.assistant { background: #f3f4f6; }
label { display: block; margin-top: .75rem; font-size: .875rem; }
input[type=text], select, textarea { width: 100%; box-sizing: border-box; padding: .4rem; }
img.preview { max-width: 100%; border-radius: .5rem; }
.muted { color: #6b7280; font-size: .875rem; }
"#;

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn page(title: &str, notice: Option<Notice>, body: &str) -> Html<String> {
    let notice = match notice {
        Some(Notice::Success(text)) => {
            format!(r#"<div class="notice success">{}</div>"#, escape(&text))
        }
        Some(Notice::Error(text)) => {
            format!(r#"<div class="notice error">{}</div>"#, escape(&text))
        }
        None => String::new(),
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | AI Outfit Simulator</title>
<style>{STYLE}</style>
</head>
<body>
<header>
<a href="/"><strong>AI Outfit Simulator &amp; Recommender</strong></a>
<a href="/wardrobe">Wardrobe</a>
<a href="/recommend">Recommender</a>
<a href="/try-on">Try-On</a>
</header>
<main>
<h1>{title}</h1>
{notice}
{body}
</main>
</body>
</html>"#,
        title = escape(title),
    ))
}

/// `<option>` list with `selected` on the current value. The first entry is
/// the empty "any" choice.
pub fn options(any_label: &str, choices: &[&str], selected: Option<&str>) -> String {
    let mut html = format!(r#"<option value="">{}</option>"#, escape(any_label));
    for choice in choices {
        let is_selected = if selected == Some(*choice) { " selected" } else { "" };
        let _ = write!(
            html,
            r#"<option value="{value}"{is_selected}>{label}</option>"#,
            value = escape(choice),
            label = escape(&capitalize(choice)),
        );
    }
    html
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
