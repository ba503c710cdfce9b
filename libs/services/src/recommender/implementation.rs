use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::Services;

use super::Recommender;

impl Recommender for Services {
    async fn recommend<B, T>(&self, request: &B) -> anyhow::Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        debug!(task = "recommend", "posting recommendation request");
        let request = self.recommender.post("/recommend").json(request);

        self.recommender.json_response(request).await
    }

    async fn chat<B, T>(&self, request: &B) -> anyhow::Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let request = self.recommender.post("/chat").json(request);

        self.recommender.json_response(request).await
    }

    async fn analyze_outfit<B, T>(&self, items: &B) -> anyhow::Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let request = self.recommender.post("/analyze-outfit").json(items);

        self.recommender.json_response(request).await
    }
}
