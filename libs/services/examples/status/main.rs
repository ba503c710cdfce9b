use std::time::Duration;

use services::{Service, ServiceUrls, Services};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let secrets = util::load_env()?;

    let mut urls = ServiceUrls::default();
    if let Some(url) = util::env_or_secret(&secrets, "CLIP_API") {
        urls.catalog = url;
    }
    if let Some(url) = util::env_or_secret(&secrets, "GEMINI_API") {
        urls.recommender = url;
    }
    if let Some(url) = util::env_or_secret(&secrets, "DIFFUSION_API") {
        urls.diffusion = url;
    }

    let services = Services::new(&urls, Duration::from_secs(10))?;

    for service in Service::ALL {
        match services.status(service).await {
            Ok(status) => println!("{:?}: {:?}", service, status),
            Err(e) => println!("{:?}: unreachable ({:#})", service, e),
        }
    }

    Ok(())
}
