use std::{collections::HashMap, fmt::Display, str::FromStr};

use anyhow::{anyhow, Context};
use axum::extract::Multipart;
use services::ImageFile;

/// A multipart body split into text fields and files. File inputs left empty
/// by the browser are dropped.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, ImageFile>,
}

impl FormData {
    pub async fn read(mut multipart: Multipart) -> anyhow::Result<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .context("failed to read multipart field")?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .with_context(|| format!("failed to read file {}", name))?;
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }

                    let mut file = ImageFile::new(file_name, bytes);
                    file.content_type = content_type;
                    form.files.insert(name, file);
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .with_context(|| format!("failed to read field {}", name))?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Trimmed text value, `None` when missing or blank.
    pub fn text(&self, name: &str) -> Option<String> {
        crate::util::non_blank(self.fields.get(name).cloned())
    }

    pub fn take_file(&mut self, name: &str) -> Option<ImageFile> {
        self.files.remove(name)
    }

    pub fn parse<T>(&self, name: &str) -> anyhow::Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.text(name)
            .map(|value| {
                value
                    .parse::<T>()
                    .map_err(|e| anyhow!("invalid {} {:?}: {}", name, value, e))
            })
            .transpose()
    }

    #[cfg(test)]
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }
}
