//! Format classification of transfer items.

use crate::config::InterceptorConfig;
use crate::format::{Detected, detect};
use crate::platform::SourceFile;
use crate::types::{CandidateImage, ItemKind, TransferItem};

/// Selects the convertible items of a transfer payload.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: InterceptorConfig,
}

impl Classifier {
    pub fn new(config: InterceptorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InterceptorConfig {
        &self.config
    }

    /// Classify a single item.
    ///
    /// Non-file items and file items without a backing file are `Unsupported`.
    pub fn classify<F: SourceFile>(&self, item: &TransferItem<F>) -> Detected {
        let Some(file) = item.file.as_ref().filter(|_| item.kind == ItemKind::File) else {
            return Detected::Unsupported;
        };
        detect(&item.declared_type, file.name(), self.config.experimental_heif)
    }

    /// Ordered subset of `items` that should be converted on the document at
    /// `document_url`.
    ///
    /// Items whose format is excluded by a host rule are dropped here and
    /// left for the host's own handling.
    pub fn candidates<F: SourceFile + Clone>(
        &self,
        items: &[TransferItem<F>],
        document_url: &str,
    ) -> Vec<CandidateImage<F>> {
        items
            .iter()
            .filter_map(|item| match self.classify(item) {
                Detected::Convertible(format) => {
                    if self.config.is_excluded(format, document_url) {
                        tracing::debug!(%format, "format excluded on this host surface");
                        return None;
                    }
                    let file = item.file.clone()?;
                    Some(CandidateImage { file, format })
                }
                Detected::Native | Detected::Unsupported => None,
            })
            .collect()
    }
}
