use reqwest::multipart::Form;
use serde::de::DeserializeOwned;

use crate::{ImageFile, Services};

use super::{Catalog, ItemMetadata, TextSearchRequest};

impl Catalog for Services {
    async fn list_items<T: DeserializeOwned + Send>(&self) -> anyhow::Result<T> {
        self.catalog
            .json_response(self.catalog.get("/items"))
            .await
    }

    async fn upload_item<T: DeserializeOwned + Send>(
        &self,
        file: ImageFile,
        metadata: ItemMetadata,
    ) -> anyhow::Result<T> {
        let form = Form::new().part("file", file.into_part()?);
        let request = self
            .catalog
            .post("/upload")
            .query(&metadata)
            .multipart(form);

        self.catalog.json_response(request).await
    }

    async fn search_by_text<T: DeserializeOwned + Send>(
        &self,
        request: TextSearchRequest,
    ) -> anyhow::Result<T> {
        let request = self.catalog.post("/search/text").json(&request);

        self.catalog.json_response(request).await
    }

    async fn search_by_image<T: DeserializeOwned + Send>(
        &self,
        file: ImageFile,
        top_k: u32,
    ) -> anyhow::Result<T> {
        let form = Form::new().part("file", file.into_part()?);
        let request = self
            .catalog
            .post("/search/image")
            .query(&[("top_k", top_k)])
            .multipart(form);

        self.catalog.json_response(request).await
    }
}
