//! HTTP DTOs for user-scoped endpoints.

use serde::Serialize;

use crate::ports::FavoriteToggle;

/// Result of a favorite toggle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggleResponse {
    pub message: String,
    pub favorited: bool,
    pub favorites_count: u64,
}

impl From<FavoriteToggle> for FavoriteToggleResponse {
    fn from(toggle: FavoriteToggle) -> Self {
        let message = if toggle.favorited {
            "Recipe added to favorites"
        } else {
            "Recipe removed from favorites"
        };
        Self {
            message: message.to_string(),
            favorited: toggle.favorited,
            favorites_count: toggle.favorites_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_response_is_camel_case() {
        let json = serde_json::to_value(FavoriteToggleResponse::from(FavoriteToggle {
            favorited: true,
            favorites_count: 3,
        }))
        .unwrap();

        assert_eq!(json["favorited"], true);
        assert_eq!(json["favoritesCount"], 3);
        assert_eq!(json["message"], "Recipe added to favorites");
    }
}
