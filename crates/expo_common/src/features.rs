//! Runtime feature flags.
//!
//! Compile-time features (`openapi`, `testing`) are declared per crate in
//! Cargo.toml. The helpers here cover the runtime flags in `AppConfig`,
//! where a feature is on only when its flag is set and its config section
//! is present.

use expo_config::AppConfig;

/// A feature is enabled when its flag is set and its section is configured.
pub fn is_feature_enabled<T>(use_feature: bool, feature_config: Option<&T>) -> bool {
    use_feature && feature_config.is_some()
}

/// Whether outgoing email is wired up.
pub fn is_mail_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_mail, config.mail.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use expo_config::models::MailConfig;

    #[test]
    fn mail_needs_flag_and_section() {
        let mut config = AppConfig::default();
        assert!(!is_mail_enabled(&config));

        config.use_mail = true;
        assert!(!is_mail_enabled(&config));

        config.mail = Some(MailConfig {
            endpoint_url: "http://mail.local/send".to_string(),
            timeout_secs: None,
        });
        assert!(is_mail_enabled(&config));
    }
}
