//! Application configuration structures.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::TrackedProduct;
use crate::pipeline::ActiveWindow;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Page loading behavior
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Polling interval and active hours
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// SMTP relay, sender and recipients
    #[serde(default)]
    pub mail: MailConfig,

    /// Notification policy
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Products to check, in check order
    #[serde(default = "defaults::products")]
    pub products: Vec<TrackedProduct>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, or defaults if the file does not exist.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::load(&path) {
            Err(AppError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!(
                    "Config file {:?} not found. Using defaults.",
                    path.as_ref()
                );
                Ok(Self::default())
            }
            result => result,
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Keys follow the environment variable names (`SMTP_SERVER`,
    /// `RECEIVER_EMAILS`, `START_HOUR`, ...). Values that fail to parse are
    /// ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SMTP_SERVER") {
            self.mail.smtp_host = host;
        }
        if let Some(port) = lookup("SMTP_PORT").and_then(|v| parse_override("SMTP_PORT", &v)) {
            self.mail.smtp_port = port;
        }
        if let Some(sender) = lookup("SENDER_EMAIL") {
            self.mail.sender = sender;
        }
        if let Some(password) = lookup("SENDER_PASSWORD") {
            self.mail.password = password;
        }
        if let Some(raw) = lookup("RECEIVER_EMAILS") {
            self.mail.recipients = parse_recipients(&raw);
        }
        if let Some(secs) =
            lookup("CHECK_INTERVAL").and_then(|v| parse_override("CHECK_INTERVAL", &v))
        {
            self.schedule.interval_secs = secs;
        }
        if let Some(hour) = lookup("START_HOUR").and_then(|v| parse_override("START_HOUR", &v)) {
            self.schedule.start_hour = hour;
        }
        if let Some(hour) = lookup("END_HOUR").and_then(|v| parse_override("END_HOUR", &v)) {
            self.schedule.end_hour = hour;
        }
        if let Some(agent) = lookup("USER_AGENT") {
            self.fetcher.user_agent = agent;
        }
        if let Some(secs) =
            lookup("FETCH_TIMEOUT_SECS").and_then(|v| parse_override("FETCH_TIMEOUT_SECS", &v))
        {
            self.fetcher.timeout_secs = secs;
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetcher.user_agent is empty"));
        }
        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::validation("fetcher.timeout_secs must be > 0"));
        }
        if self.schedule.interval_secs == 0 {
            return Err(AppError::validation("schedule.interval_secs must be > 0"));
        }
        if self.schedule.start_hour > 23 || self.schedule.end_hour > 23 {
            return Err(AppError::validation(
                "schedule hours must be between 0 and 23",
            ));
        }
        if self.schedule.start_hour > self.schedule.end_hour {
            return Err(AppError::validation(format!(
                "schedule.start_hour ({}) is after schedule.end_hour ({})",
                self.schedule.start_hour, self.schedule.end_hour
            )));
        }
        if self.products.is_empty() {
            return Err(AppError::validation("No products defined"));
        }
        for product in &self.products {
            url::Url::parse(&product.url).map_err(|e| {
                AppError::validation(format!(
                    "Product '{}' has an invalid URL '{}': {}",
                    product.name, product.url, e
                ))
            })?;
        }
        if self.mail.smtp_host.trim().is_empty() {
            return Err(AppError::validation("mail.smtp_host is empty"));
        }
        Ok(())
    }

    /// Validate the settings needed to actually send mail.
    pub fn validate_mail(&self) -> Result<()> {
        if self.mail.sender.trim().is_empty() {
            return Err(AppError::validation(
                "mail.sender is empty (set SENDER_EMAIL)",
            ));
        }
        if self.mail.recipients.is_empty() {
            return Err(AppError::validation(
                "No recipients configured (set RECEIVER_EMAILS)",
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetcher: FetcherConfig::default(),
            schedule: ScheduleConfig::default(),
            mail: MailConfig::default(),
            notify: NotifyConfig::default(),
            products: defaults::products(),
        }
    }
}

/// Split a comma-separated recipient list, dropping blank entries.
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_override<T: FromStr>(key: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::warn!("Ignoring {}={:?}: not a valid number", key, value);
            None
        }
    }
}

/// Page loading settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header presented to shops
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Navigation timeout in seconds
    #[serde(default = "defaults::fetch_timeout")]
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::fetch_timeout(),
        }
    }
}

/// Polling cadence and daily active window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds to wait between cycles
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,

    /// First hour (local, inclusive) in which checks run
    #[serde(default = "defaults::start_hour")]
    pub start_hour: u32,

    /// Last hour (local, inclusive) in which checks run
    #[serde(default = "defaults::end_hour")]
    pub end_hour: u32,
}

impl ScheduleConfig {
    /// The active window described by this schedule.
    pub fn window(&self) -> ActiveWindow {
        ActiveWindow::new(self.start_hour, self.end_hour)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
            start_hour: defaults::start_hour(),
            end_hour: defaults::end_hour(),
        }
    }
}

/// SMTP relay settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default = "defaults::smtp_host")]
    pub smtp_host: String,

    #[serde(default = "defaults::smtp_port")]
    pub smtp_port: u16,

    /// Sender address, also used as the SMTP login
    #[serde(default)]
    pub sender: String,

    #[serde(default, skip_serializing)]
    pub password: String,

    #[serde(default)]
    pub recipients: Vec<String>,

    /// SMTP connection timeout in seconds
    #[serde(default = "defaults::smtp_timeout")]
    pub timeout_secs: u64,
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("sender", &self.sender)
            .field("password", &"<redacted>")
            .field("recipients", &self.recipients)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: defaults::smtp_host(),
            smtp_port: defaults::smtp_port(),
            sender: String::new(),
            password: String::new(),
            recipients: Vec::new(),
            timeout_secs: defaults::smtp_timeout(),
        }
    }
}

/// Notification policy.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotifyConfig {
    /// Send once per restock instead of on every available cycle
    #[serde(default)]
    pub once_per_restock: bool,
}

mod defaults {
    use crate::models::TrackedProduct;

    // Fetcher defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".into()
    }
    pub fn fetch_timeout() -> u64 {
        30
    }

    // Schedule defaults
    pub fn interval() -> u64 {
        300
    }
    pub fn start_hour() -> u32 {
        3
    }
    pub fn end_hour() -> u32 {
        9
    }

    // Mail defaults
    pub fn smtp_host() -> String {
        "smtp.gmail.com".into()
    }
    pub fn smtp_port() -> u16 {
        587
    }
    pub fn smtp_timeout() -> u64 {
        20
    }

    // Product defaults
    pub fn products() -> Vec<TrackedProduct> {
        [
            // Ippodo Tea
            (
                "Sayaka Matcha 100g",
                "https://ippodotea.com/products/sayaka-100g",
            ),
            (
                "Sayaka Matcha 40g",
                "https://ippodotea.com/collections/all/products/sayaka-no-mukashi",
            ),
            (
                "Horai 20g",
                "https://ippodotea.com/collections/all/products/horai-no-mukashi",
            ),
            (
                "Ummon 20g",
                "https://ippodotea.com/collections/all/products/ummon-no-mukashi-20g",
            ),
            (
                "Ummon 40g",
                "https://ippodotea.com/collections/all/products/ummon-no-mukashi-40g",
            ),
            // Rocky's Matcha
            (
                "Rocky Matcha Tsujiki Ceremonial Blend Matcha 20g",
                "https://www.rockysmatcha.com/products/rockys-matcha-tsujiki-blend-matcha-20g",
            ),
            (
                "Rocky Matcha Shirakawa Ceremonial Blend Matcha 100g",
                "https://www.rockysmatcha.com/products/rockys-matcha-shirakawa-ceremonial-blend-matcha-100g",
            ),
            (
                "Rocky Matcha for Saie Ceremonial Blend Matcha 20g",
                "https://www.rockysmatcha.com/products/rocky-s-matcha-for-saie-ceremonial-blend-matcha-20g",
            ),
            (
                "Rocky Matcha Ceremonial Blend Matcha 100g",
                "https://www.rockysmatcha.com/products/rockys-matcha-ceremonial-blend-matcha-100g",
            ),
            (
                "Rocky Matcha Osada Ceremonial Blend Matcha 20g",
                "https://www.rockysmatcha.com/products/rockys-matcha-osada-ceremonial-blend-matcha-20g",
            ),
            (
                "Rocky Matcha Ceremonial Blend Matcha 20g",
                "https://www.rockysmatcha.com/products/rockys-matcha-ceremonial-blend-matcha-20g",
            ),
            // Marukyu Koyamaen via Ujicha Matcha
            (
                "Wakatake 100g bag",
                "https://ujichamatcha.com/products/wakatake-marukyu-koyamaen?variant=41732342644810",
            ),
            (
                "Wakatake 100g tin",
                "https://ujichamatcha.com/products/wakatake-marukyu-koyamaen?variant=42028381470794",
            ),
        ]
        .into_iter()
        .map(|(name, url)| TrackedProduct::new(name, url))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn default_config_matches_known_values() {
        let config = Config::default();
        assert_eq!(config.schedule.interval_secs, 300);
        assert_eq!(config.schedule.start_hour, 3);
        assert_eq!(config.schedule.end_hour, 9);
        assert_eq!(config.fetcher.timeout_secs, 30);
        assert_eq!(config.mail.smtp_host, "smtp.gmail.com");
        assert_eq!(config.mail.smtp_port, 587);
        assert_eq!(config.products.len(), 13);
        assert_eq!(config.products[0].name, "Sayaka Matcha 100g");
        assert!(!config.notify.once_per_restock);
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.fetcher.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_window() {
        let mut config = Config::default();
        config.schedule.start_hour = 10;
        config.schedule.end_hour = 9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_hour() {
        let mut config = Config::default();
        config.schedule.end_hour = 24;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_product_url() {
        let mut config = Config::default();
        config.products = vec![TrackedProduct::new("Broken", "not a url")];
        assert!(matches!(config.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn validate_mail_requires_sender_and_recipients() {
        let mut config = Config::default();
        assert!(config.validate_mail().is_err());

        config.mail.sender = "bot@example.com".to_string();
        assert!(config.validate_mail().is_err());

        config.mail.recipients = vec!["me@example.com".to_string()];
        assert!(config.validate_mail().is_ok());
    }

    #[test]
    fn parse_recipients_trims_and_drops_blanks() {
        assert_eq!(
            parse_recipients(" a@example.com, b@example.com ,,"),
            vec!["a@example.com".to_string(), "b@example.com".to_string()]
        );
        assert!(parse_recipients("").is_empty());
    }

    #[test]
    fn overrides_replace_mail_and_schedule() {
        let mut config = Config::default();
        config.apply_overrides(lookup_from(&[
            ("SMTP_SERVER", "mail.example.com"),
            ("SMTP_PORT", "2525"),
            ("SENDER_EMAIL", "bot@example.com"),
            ("SENDER_PASSWORD", "secret"),
            ("RECEIVER_EMAILS", "a@example.com,b@example.com"),
            ("CHECK_INTERVAL", "60"),
            ("START_HOUR", "6"),
            ("END_HOUR", "22"),
        ]));

        assert_eq!(config.mail.smtp_host, "mail.example.com");
        assert_eq!(config.mail.smtp_port, 2525);
        assert_eq!(config.mail.sender, "bot@example.com");
        assert_eq!(config.mail.password, "secret");
        assert_eq!(config.mail.recipients.len(), 2);
        assert_eq!(config.schedule.interval_secs, 60);
        assert_eq!(config.schedule.window(), ActiveWindow::new(6, 22));
    }

    #[test]
    fn overrides_ignore_unparseable_numbers() {
        let mut config = Config::default();
        config.apply_overrides(lookup_from(&[("SMTP_PORT", "abc"), ("CHECK_INTERVAL", "")]));
        assert_eq!(config.mail.smtp_port, 587);
        assert_eq!(config.schedule.interval_secs, 300);
    }

    #[test]
    fn debug_output_redacts_password() {
        let mut mail = MailConfig::default();
        mail.password = "hunter2".to_string();
        let rendered = format!("{:?}", mail);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn load_overlays_file_on_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[schedule]
interval_secs = 120

[notify]
once_per_restock = true

[[products]]
name = "Test Tea"
url = "https://shop.example.com/products/test-tea"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.schedule.interval_secs, 120);
        assert_eq!(config.schedule.start_hour, 3);
        assert_eq!(config.fetcher.timeout_secs, 30);
        assert!(config.notify.once_per_restock);
        assert_eq!(config.products.len(), 1);
        assert_eq!(config.products[0].name, "Test Tea");
    }

    #[test]
    fn load_without_products_keeps_default_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[mail]\nsender = \"bot@example.com\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.mail.sender, "bot@example.com");
        assert_eq!(config.products.len(), 13);
    }

    #[test]
    fn example_config_is_valid() {
        let config: Config = toml::from_str(include_str!("../../config.example.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.products.len(), 2);
    }

    #[test]
    fn load_or_default_falls_back_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.products.len(), 13);
    }

    #[test]
    fn load_or_default_rejects_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[schedule]
interval_secs = "five minutes"
start_hour = 30

[[products]]
name = "Test Tea"
url = "https://shop.example.com/products/test-tea"
"#
        )
        .unwrap();

        assert!(matches!(
            Config::load_or_default(file.path()),
            Err(AppError::Toml(_))
        ));
    }
}
