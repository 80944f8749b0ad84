//! Shared resource fragments used by several YouTube API endpoints.

use serde::{Deserialize, Serialize};

/// Paging details for lists of resources.
///
/// Includes the total number of items available and the number of resources
/// returned in a single page response.
///
/// See: <https://developers.google.com/youtube/v3/docs/pageInfo>
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    /// The total number of results in the result set.
    #[serde(rename = "totalResults", default)]
    pub total_results: u32,
    /// The number of results included in the API response.
    #[serde(rename = "resultsPerPage", default)]
    pub results_per_page: u32,
}

/// A map of thumbnail images associated with a resource.
///
/// Every key is optional; the API omits sizes it has not generated.
///
/// See: <https://developers.google.com/youtube/v3/docs/thumbnails>
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Thumbnails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Thumbnail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<Thumbnail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Thumbnail>,
}

impl Thumbnails {
    /// URL of the medium-sized image, falling back to whatever else is there.
    pub fn medium_url(&self) -> Option<&str> {
        self.medium
            .as_ref()
            .or(self.high.as_ref())
            .or(self.default.as_ref())
            .map(|t| t.url.as_str())
    }

    /// URL of the smallest available image.
    ///
    /// Channel avatars are shown at icon size, so the `default` (88x88) variant is preferred.
    pub fn icon_url(&self) -> Option<&str> {
        self.default
            .as_ref()
            .or(self.medium.as_ref())
            .or(self.high.as_ref())
            .map(|t| t.url.as_str())
    }
}

/// A single thumbnail image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thumbnail {
    /// The image's URL.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn medium_preferred_for_video_thumbnails() {
        let thumbnails: Thumbnails = serde_json::from_value(serde_json::json!({
            "default": { "url": "https://i.ytimg.com/vi/x/default.jpg", "width": 120, "height": 90 },
            "medium": { "url": "https://i.ytimg.com/vi/x/mqdefault.jpg", "width": 320, "height": 180 },
        }))
        .unwrap();
        assert_eq!(
            thumbnails.medium_url(),
            Some("https://i.ytimg.com/vi/x/mqdefault.jpg")
        );
        assert_eq!(
            thumbnails.icon_url(),
            Some("https://i.ytimg.com/vi/x/default.jpg")
        );
    }

    #[test]
    fn missing_sizes_fall_back() {
        let thumbnails: Thumbnails = serde_json::from_value(serde_json::json!({
            "high": { "url": "https://yt3.ggpht.com/high" },
        }))
        .unwrap();
        assert_eq!(thumbnails.medium_url(), Some("https://yt3.ggpht.com/high"));
        assert_eq!(thumbnails.icon_url(), Some("https://yt3.ggpht.com/high"));
        assert_eq!(Thumbnails::default().icon_url(), None);
    }
}
