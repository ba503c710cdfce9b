pub mod implementation;

use std::{fmt, str::FromStr};

use anyhow::anyhow;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::ToSchema;

use crate::catalog::ClothingItem;

/// Request bodies are sent as given and responses decoded into the type the
/// caller asks for, so the same calls serve typed and pass-through users.
pub trait Recommender {
    fn recommend<B, T>(
        &self,
        request: &B,
    ) -> impl std::future::Future<Output = anyhow::Result<T>> + Send
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send;

    fn chat<B, T>(
        &self,
        request: &B,
    ) -> impl std::future::Future<Output = anyhow::Result<T>> + Send
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send;

    /// `items` is a JSON array of clothing items.
    fn analyze_outfit<B, T>(
        &self,
        items: &B,
    ) -> impl std::future::Future<Output = anyhow::Result<T>> + Send
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Occasion {
    Casual,
    Business,
    Formal,
    Party,
    Date,
    Sports,
}

impl Occasion {
    pub const ALL: [Occasion; 6] = [
        Occasion::Casual,
        Occasion::Business,
        Occasion::Formal,
        Occasion::Party,
        Occasion::Date,
        Occasion::Sports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Occasion::Casual => "casual",
            Occasion::Business => "business",
            Occasion::Formal => "formal",
            Occasion::Party => "party",
            Occasion::Date => "date",
            Occasion::Sports => "sports",
        }
    }
}

impl fmt::Display for Occasion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Occasion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Occasion::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow!("unknown occasion: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Hot,
    Warm,
    Cool,
    Cold,
    Rainy,
}

impl Weather {
    pub const ALL: [Weather; 5] = [
        Weather::Hot,
        Weather::Warm,
        Weather::Cool,
        Weather::Cold,
        Weather::Rainy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Hot => "hot",
            Weather::Warm => "warm",
            Weather::Cool => "cool",
            Weather::Cold => "cold",
            Weather::Rainy => "rainy",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weather {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weather::ALL
            .into_iter()
            .find(|w| w.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow!("unknown weather: {}", s))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OutfitRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occasion: Option<Occasion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<Weather>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_preference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_preference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_items: Option<Vec<ClothingItem>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecommendResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Recommendation {
    #[serde(default)]
    pub outfit_description: String,
    #[serde(default)]
    pub items: Vec<RecommendedItem>,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_tips: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecommendedItem {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    #[serde(default)]
    pub success: bool,
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub success: bool,
    pub analysis: String,
}
