//! Movie catalog records.

use serde::{Deserialize, Serialize};

/// Catalog entry as returned by the backend.
///
/// Read-only from the client, except for `enriched_poster_url` which is
/// filled locally after a poster lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    pub director: String,
    #[serde(rename = "anio")]
    pub year: i32,
    #[serde(rename = "duracion")]
    pub duration_minutes: i32,
    #[serde(rename = "genero")]
    pub genre: String,
    #[serde(rename = "imagen", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(
        rename = "imagenThumbnail",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub thumbnail_url: Option<String>,
    /// Client-side enrichment; absent until a poster lookup succeeds.
    #[serde(skip)]
    pub enriched_poster_url: Option<String>,
}

impl Movie {
    /// Returns whether `needle` occurs in the title or director, ignoring case.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.director.to_lowercase().contains(needle)
    }

    /// Returns a copy carrying the given enriched poster URL.
    pub fn with_poster(mut self, poster_url: impl Into<String>) -> Self {
        self.enriched_poster_url = Some(poster_url.into());
        self
    }
}

/// Request body for creating a catalog entry. The backend assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMovie {
    #[serde(rename = "titulo")]
    pub title: String,
    pub director: String,
    #[serde(rename = "anio")]
    pub year: i32,
    #[serde(rename = "duracion")]
    pub duration_minutes: i32,
    #[serde(rename = "genero")]
    pub genre: String,
    #[serde(rename = "imagen", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "imagenThumbnail", skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}
