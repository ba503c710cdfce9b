use std::time::Duration;

use services::{
    recommender::{Occasion, OutfitRequest, RecommendResponse, Recommender, Weather},
    ServiceUrls, Services,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let secrets = util::load_env()?;

    let mut urls = ServiceUrls::default();
    if let Some(url) = util::env_or_secret(&secrets, "GEMINI_API") {
        urls.recommender = url;
    }

    let services = Services::new(&urls, Duration::from_secs(120))?;

    let result: RecommendResponse = services
        .recommend(&OutfitRequest {
            prompt: "Something comfortable for a weekend brunch".into(),
            occasion: Some(Occasion::Casual),
            weather: Some(Weather::Warm),
            ..Default::default()
        })
        .await?;

    println!("{:?}", result);

    Ok(())
}
