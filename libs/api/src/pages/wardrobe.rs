use std::fmt::Write;

use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Redirect},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use services::catalog::{
    Catalog, ClothingItem, ItemMetadata, SimilarityResult, TextSearchRequest,
    UploadResponse,
};
use tracing::{error, info};

use crate::{
    session::{Action, Busy, Notice, SessionHandle},
    util::{multipart::FormData, non_blank},
    ApiState,
};

use super::layout::{escape, options, page};

pub const CATEGORIES: [&str; 6] =
    ["top", "bottom", "dress", "outerwear", "shoes", "accessory"];

pub const UPLOADED: &str = "Item uploaded successfully!";
pub const UPLOAD_FAILED: &str = "Failed to upload item";
pub const SEARCH_FAILED: &str = "Search failed";
pub const IMAGE_SEARCH_FAILED: &str = "Image search failed";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    #[default]
    None,
    Text,
    Image,
}

#[derive(Debug, Default)]
pub struct WardrobeView {
    pub mode: SearchMode,
    pub query: String,
    pub results: Vec<ClothingItem>,
}

impl WardrobeView {
    pub fn show_results(
        &mut self,
        mode: SearchMode,
        results: Vec<ClothingItem>,
    ) {
        self.mode = mode;
        self.results = results;
    }

    pub fn clear(&mut self) {
        *self = WardrobeView::default();
    }

    /// Search results while a search is active, the whole wardrobe otherwise.
    pub fn displayed<'a>(&'a self, items: &'a [ClothingItem]) -> &'a [ClothingItem] {
        match self.mode {
            SearchMode::None => items,
            SearchMode::Text | SearchMode::Image => &self.results,
        }
    }
}

pub fn match_label(score: f32) -> String {
    format!("Match: {:.1}%", score * 100.0)
}

#[derive(Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub query: String,
}

pub async fn get_wardrobe(
    State(state): State<ApiState>,
    jar: CookieJar,
) -> impl IntoResponse {
    let (jar, session) = state.sessions.resolve(jar);

    let items = match state.services.list_items::<Vec<ClothingItem>>().await {
        Ok(items) => items,
        Err(e) => {
            error!(task = "load items", error = ?e);
            Vec::new()
        }
    };

    let mut session = session.lock();
    let notice = session.take_notice();
    let body = render(&session.wardrobe, &items);

    (jar, page("Virtual Wardrobe", notice, &body))
}

pub async fn post_upload(
    State(state): State<ApiState>,
    jar: CookieJar,
    multipart: Multipart,
) -> impl IntoResponse {
    let (jar, session) = state.sessions.resolve(jar);
    let back = (jar, Redirect::to("/wardrobe"));

    let Some(_busy) = Busy::begin(&session, Action::Upload) else {
        return back;
    };

    let mut form = match FormData::read(multipart).await {
        Ok(form) => form,
        Err(e) => {
            error!(task = "upload item", error = ?e);
            fail(&session, UPLOAD_FAILED);
            return back;
        }
    };
    // nothing chosen, nothing to do
    let Some(file) = form.take_file("file") else {
        return back;
    };

    let metadata = ItemMetadata {
        item_id: None,
        category: form.text("category"),
        color: form.text("color"),
        style: form.text("style"),
        description: form.text("description"),
    };

    match state
        .services
        .upload_item::<UploadResponse>(file, metadata)
        .await
    {
        Ok(response) => {
            info!(
                task = "upload item",
                item_id = %response.item_id,
                total_items = response.total_items
            );
            session.lock().notify(Notice::Success(UPLOADED.to_string()));
        }
        Err(e) => {
            error!(task = "upload item", error = ?e);
            fail(&session, UPLOAD_FAILED);
        }
    }

    back
}

pub async fn post_search(
    State(state): State<ApiState>,
    jar: CookieJar,
    Form(form): Form<SearchForm>,
) -> impl IntoResponse {
    let (jar, session) = state.sessions.resolve(jar);
    let back = (jar, Redirect::to("/wardrobe"));

    let Some(query) = non_blank(Some(form.query)) else {
        return back;
    };
    let Some(_busy) = Busy::begin(&session, Action::Search) else {
        return back;
    };
    session.lock().wardrobe.query = query.clone();

    let request = TextSearchRequest {
        query_text: query,
        top_k: state.config.search.top_k,
    };
    match state
        .services
        .search_by_text::<Vec<SimilarityResult>>(request)
        .await
    {
        Ok(results) => {
            let results = results.into_iter().map(ClothingItem::from).collect();
            session
                .lock()
                .wardrobe
                .show_results(SearchMode::Text, results);
        }
        Err(e) => {
            error!(task = "search by text", error = ?e);
            fail(&session, SEARCH_FAILED);
        }
    }

    back
}

pub async fn post_search_image(
    State(state): State<ApiState>,
    jar: CookieJar,
    multipart: Multipart,
) -> impl IntoResponse {
    let (jar, session) = state.sessions.resolve(jar);
    let back = (jar, Redirect::to("/wardrobe"));

    let Some(_busy) = Busy::begin(&session, Action::Search) else {
        return back;
    };

    let file = match FormData::read(multipart).await {
        Ok(mut form) => form.take_file("file"),
        Err(e) => {
            error!(task = "search by image", error = ?e);
            fail(&session, IMAGE_SEARCH_FAILED);
            return back;
        }
    };
    let Some(file) = file else {
        return back;
    };

    match state
        .services
        .search_by_image::<Vec<SimilarityResult>>(file, state.config.search.top_k)
        .await
    {
        Ok(results) => {
            let results = results.into_iter().map(ClothingItem::from).collect();
            session
                .lock()
                .wardrobe
                .show_results(SearchMode::Image, results);
        }
        Err(e) => {
            error!(task = "search by image", error = ?e);
            fail(&session, IMAGE_SEARCH_FAILED);
        }
    }

    back
}

pub async fn post_clear(
    State(state): State<ApiState>,
    jar: CookieJar,
) -> impl IntoResponse {
    let (jar, session) = state.sessions.resolve(jar);
    session.lock().wardrobe.clear();

    (jar, Redirect::to("/wardrobe"))
}

fn fail(session: &SessionHandle, message: &str) {
    session.lock().notify(Notice::Error(message.to_string()));
}

fn item_card(item: &ClothingItem) -> String {
    let mut card = format!(
        r#"<div class="card"><strong>{}</strong>"#,
        escape(item.category.as_deref().unwrap_or("Item"))
    );
    for detail in [&item.color, &item.style].into_iter().flatten() {
        let _ = write!(card, r#"<p class="muted">{}</p>"#, escape(detail));
    }
    if let Some(score) = item.similarity_score {
        let _ = write!(card, "<p>{}</p>", match_label(score));
    }
    card.push_str("</div>");
    card
}

fn render(view: &WardrobeView, items: &[ClothingItem]) -> String {
    let displayed = view.displayed(items);
    let searching = view.mode != SearchMode::None;

    let heading = if searching { "Search Results" } else { "Your Items" };
    let grid = if displayed.is_empty() {
        let empty = if searching {
            "No matching items found"
        } else {
            "No items yet. Upload your first clothing item!"
        };
        format!(r#"<p class="muted">{}</p>"#, empty)
    } else {
        format!(
            r#"<div class="cards">{}</div>"#,
            displayed.iter().map(item_card).collect::<String>()
        )
    };

    let clear = if searching {
        r#"<form method="post" action="/wardrobe/clear"><button type="submit">Clear Search</button></form>"#
    } else {
        ""
    };

    format!(
        r#"<div class="grid">
<aside>
<form class="card" method="post" action="/wardrobe/upload" enctype="multipart/form-data">
<h2>Upload Item</h2>
<label>Category<select name="category">{categories}</select></label>
<label>Color<input type="text" name="color" placeholder="e.g., blue, red"></label>
<label>Style<input type="text" name="style" placeholder="e.g., casual, formal"></label>
<label>Description<textarea name="description" rows="3" placeholder="Optional description"></textarea></label>
<label>Image<input type="file" name="file" accept="image/*" required></label>
<button type="submit">Upload</button>
</form>
<div class="card">
<h2>Search</h2>
<form method="post" action="/wardrobe/search">
<label>Search by Description<input type="text" name="query" value="{query}" placeholder="e.g., red t-shirt"></label>
<button type="submit">Search</button>
</form>
<form method="post" action="/wardrobe/search-image" enctype="multipart/form-data">
<label>Search by Image<input type="file" name="file" accept="image/*" required></label>
<button type="submit">Find similar</button>
</form>
{clear}
</div>
</aside>
<section>
<h2>{heading} <span class="muted">{count} items</span></h2>
{grid}
</section>
</div>"#,
        categories = options("Select category", &CATEGORIES, None),
        query = escape(&view.query),
        count = displayed.len(),
    )
}
