pub mod http;

use anyhow::bail;
use anyhow::Result;

use crate::configuration::{Config, ConfigKey};
use crate::domain::models::ChatBackendBox;

pub struct BackendManager {}

impl BackendManager {
    pub fn get(config: &Config) -> Result<ChatBackendBox> {
        for key in [ConfigKey::ChatUrl, ConfigKey::UploadUrl] {
            let url = config.get(key);
            if url.is_empty() {
                bail!("{key} is not defined");
            }
            if reqwest::Url::parse(&url).is_err() {
                bail!("{key} is not a valid URL: {url}");
            }
        }

        return Ok(Box::new(http::HttpBackend::from_config(config)));
    }
}
