//! Data models for catalog products and their click history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Physical product kind a QR code is mounted on.
///
/// The remote API tags products with lowercase strings; anything outside this
/// set is a deserialization error rather than a silently-invented category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Stander,
    Sticker,
    Kort,
    Plate,
}

impl ProductType {
    /// Parse a user-supplied type name (CLI filter input).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "stander" => Some(Self::Stander),
            "sticker" => Some(Self::Sticker),
            "kort" => Some(Self::Kort),
            "plate" => Some(Self::Plate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stander => "stander",
            Self::Sticker => "sticker",
            Self::Kort => "kort",
            Self::Plate => "plate",
        }
    }
}

/// A single timestamped scan of a physical device.
///
/// Created by the remote system when a device is scanned; the engine only
/// reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    /// Moment of the scan
    pub timestamp: DateTime<Utc>,
}

/// A QR product as returned by the catalog API.
///
/// Treated as a read-only snapshot valid for one aggregation pass. The click
/// history carries no ordering guarantee.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,

    /// Product kind (used for the optional analytics filter)
    pub product_type: ProductType,

    /// Redirect target currently configured for the device
    #[serde(default)]
    pub redirect_url: Option<String>,

    /// Raw per-device click timestamps
    #[serde(default)]
    pub click_history: Vec<ClickEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub product_type: ProductType,
    pub redirect_url: Option<String>,
}
