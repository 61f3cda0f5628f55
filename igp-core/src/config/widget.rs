use igp_sdk::widget_token::FALLBACK_SECRET;

/// Signing settings of the on-site widget token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WidgetConfig {
    /// Platform-wide secret, used when the user has none of their own.
    pub jwt_secret: Option<String>,
}

impl WidgetConfig {
    /// Pick the signing secret: the user's own, then the platform's, then
    /// the well-known fallback.
    pub fn secret_for<'a>(&'a self, user_secret: Option<&'a str>) -> &'a str {
        user_secret
            .filter(|s| !s.is_empty())
            .or(self.jwt_secret.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or(FALLBACK_SECRET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_precedence() {
        let platform = WidgetConfig {
            jwt_secret: Some("platform".to_string()),
        };
        assert_eq!(platform.secret_for(Some("mine")), "mine");
        assert_eq!(platform.secret_for(Some("")), "platform");
        assert_eq!(platform.secret_for(None), "platform");
        assert_eq!(WidgetConfig::default().secret_for(None), FALLBACK_SECRET);
    }
}
