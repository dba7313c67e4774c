//! Interceptor configuration.
//!
//! There is no configuration file. The embedding page may pass an options
//! object at install time; every field has a default, so an empty object (or
//! no object at all) yields the stock behavior.

use serde::{Deserialize, Serialize};

use crate::format::ImageFormat;

/// URL prefix of the host surface known to silently reject converted AVIF.
pub const RESTRICTED_SURFACE_PREFIX: &str = "https://docs.google.com/presentation/";

/// A host-specific override: on documents whose URL starts with
/// `url_prefix`, the listed formats are never intercepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostRule {
    pub url_prefix: String,
    #[serde(default)]
    pub excluded: Vec<ImageFormat>,
}

impl HostRule {
    pub fn new(url_prefix: impl Into<String>, excluded: Vec<ImageFormat>) -> Self {
        Self {
            url_prefix: url_prefix.into(),
            excluded,
        }
    }

    pub fn applies_to(&self, document_url: &str) -> bool {
        document_url.starts_with(&self.url_prefix)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InterceptorConfig {
    /// Enable the file-name-suffix detection path for HEIF/HEIC.
    pub experimental_heif: bool,
    pub host_rules: Vec<HostRule>,
    /// Run interception cycles one at a time, in arrival order.
    pub serialize_cycles: bool,
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            experimental_heif: true,
            host_rules: vec![HostRule::new(
                RESTRICTED_SURFACE_PREFIX,
                vec![ImageFormat::Avif],
            )],
            serialize_cycles: true,
        }
    }
}

impl InterceptorConfig {
    /// Whether `format` is excluded on the document at `document_url`.
    pub fn is_excluded(&self, format: ImageFormat, document_url: &str) -> bool {
        self.host_rules
            .iter()
            .filter(|rule| rule.applies_to(document_url))
            .any(|rule| rule.excluded.contains(&format))
    }
}
