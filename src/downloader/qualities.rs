//! Metadata-only quality discovery

use super::MediaDownloader;
use crate::error::{Error, Result};
use std::collections::BTreeSet;

impl MediaDownloader {
    /// List the distinct vertical resolutions available for a URL.
    ///
    /// Invokes the extraction engine in metadata-only mode (nothing is
    /// downloaded), collects each variant's height where present, and returns
    /// the deduplicated set as strings in ascending numeric order. Audio-only
    /// variants carry no height and are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Discovery`] when the engine cannot resolve the URL.
    pub async fn list_qualities(&self, url: &str) -> Result<Vec<String>> {
        let variants = self.extractor.probe(url).await.map_err(|e| match e {
            already @ Error::Discovery(_) => already,
            other => Error::Discovery(other.to_string()),
        })?;

        let heights: BTreeSet<u32> = variants.into_iter().filter_map(|v| v.height).collect();

        Ok(heights.into_iter().map(|h| h.to_string()).collect())
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::super::test_helpers::{MockExtractor, create_test_downloader_with, variant};
    use crate::error::Error;

    #[tokio::test]
    async fn heights_are_deduplicated_and_sorted_ascending() {
        let mock = MockExtractor {
            variants: vec![
                variant("hls-720", Some(720)),
                variant("dash-240", Some(240)),
                variant("dash-480", Some(480)),
                variant("hls-480", Some(480)),
                variant("audio", None),
            ],
            ..MockExtractor::default()
        };
        let (downloader, _temp) = create_test_downloader_with(mock).await;

        let qualities = downloader
            .list_qualities("https://media.example.com/multi")
            .await
            .unwrap();

        assert_eq!(qualities, vec!["240", "480", "720"]);
    }

    #[tokio::test]
    async fn numeric_order_beats_lexicographic_order() {
        let mock = MockExtractor {
            variants: vec![
                variant("a", Some(1080)),
                variant("b", Some(144)),
                variant("c", Some(720)),
            ],
            ..MockExtractor::default()
        };
        let (downloader, _temp) = create_test_downloader_with(mock).await;

        let qualities = downloader
            .list_qualities("https://media.example.com/wide-range")
            .await
            .unwrap();

        // Lexicographic sorting would put "1080" before "144"
        assert_eq!(qualities, vec!["144", "720", "1080"]);
    }

    #[tokio::test]
    async fn audio_only_media_yields_empty_list() {
        let mock = MockExtractor {
            variants: vec![variant("opus", None), variant("m4a", None)],
            ..MockExtractor::default()
        };
        let (downloader, _temp) = create_test_downloader_with(mock).await;

        let qualities = downloader
            .list_qualities("https://media.example.com/podcast")
            .await
            .unwrap();

        assert!(qualities.is_empty());
    }

    #[tokio::test]
    async fn probe_failure_surfaces_as_discovery_error() {
        let mock = MockExtractor {
            probe_error: Some("Unsupported URL".to_string()),
            ..MockExtractor::default()
        };
        let (downloader, _temp) = create_test_downloader_with(mock).await;

        let result = downloader
            .list_qualities("https://media.example.com/unsupported")
            .await;

        match result {
            Err(Error::Discovery(msg)) => assert!(msg.contains("Unsupported URL")),
            other => panic!("expected Discovery error, got {other:?}"),
        }
    }
}
