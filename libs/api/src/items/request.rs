use services::catalog::ItemMetadata;
use utoipa::ToSchema;

use crate::util::multipart::FormData;

/// Multipart body of `POST /api/items`, documentation only.
#[derive(ToSchema)]
pub struct ItemUploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    pub item_id: Option<String>,
    pub category: Option<String>,
    pub color: Option<String>,
    pub style: Option<String>,
    pub description: Option<String>,
}

pub fn metadata_from_form(form: &FormData) -> ItemMetadata {
    ItemMetadata {
        item_id: form.text("item_id"),
        category: form.text("category"),
        color: form.text("color"),
        style: form.text("style"),
        description: form.text("description"),
    }
}
