//! CLI-based extraction engine using an external yt-dlp-compatible binary

use super::parser::{PROGRESS_MARKER, parse_probe_output, parse_progress_line, stderr_tail};
use super::traits::{ExtractionRequest, Extractor, FormatSelection, RawProgress, StreamVariant};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

/// Name of the extraction binary searched for on PATH
const DEFAULT_BINARY: &str = "yt-dlp";

/// CLI-based extraction engine.
///
/// Spawns the external binary once per operation: download mode streams
/// progress lines from stdout, metadata mode captures a single JSON document.
///
/// # Examples
///
/// ```no_run
/// use media_dl::extractor::CliExtractor;
/// use std::path::PathBuf;
///
/// // Create with explicit path
/// let engine = CliExtractor::new(PathBuf::from("/usr/local/bin/yt-dlp"));
///
/// // Or auto-discover from PATH
/// let engine = CliExtractor::from_path()
///     .expect("yt-dlp not found in PATH");
/// ```
pub struct CliExtractor {
    binary_path: PathBuf,
}

impl CliExtractor {
    /// Create a new CLI engine with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }

    /// Attempt to find the extraction binary in PATH.
    ///
    /// Uses the `which` crate to search for `yt-dlp` in the system PATH.
    ///
    /// # Returns
    ///
    /// `Some(CliExtractor)` if the binary is found, `None` otherwise.
    pub fn from_path() -> Option<Self> {
        which::which(DEFAULT_BINARY).ok().map(Self::new)
    }
}

/// Build the full argument list for a download invocation.
///
/// Split out of `download` so argument construction is testable without the
/// binary installed.
pub(crate) fn build_download_args(request: &ExtractionRequest) -> Vec<String> {
    let mut args = vec![
        "--newline".to_string(),
        "--no-warnings".to_string(),
        "--progress-template".to_string(),
        format!(
            "download:{PROGRESS_MARKER}%(progress.downloaded_bytes)s:%(progress.total_bytes)s:%(progress.total_bytes_estimate)s"
        ),
        "--print".to_string(),
        "after_move:filepath".to_string(),
        "--no-simulate".to_string(),
        "-o".to_string(),
        request.output_template.to_string_lossy().into_owned(),
    ];

    match &request.selection {
        FormatSelection::Video {
            selector,
            container,
        } => {
            args.push("-f".to_string());
            args.push(selector.clone());
            args.push("--merge-output-format".to_string());
            args.push(container.clone());
        }
        FormatSelection::Audio {
            codec,
            bitrate_kbps,
        } => {
            args.push("-f".to_string());
            args.push("bestaudio/best".to_string());
            args.push("-x".to_string());
            args.push("--audio-format".to_string());
            args.push(codec.clone());
            args.push("--audio-quality".to_string());
            args.push(format!("{bitrate_kbps}K"));
        }
    }

    args.push(request.url.clone());
    args
}

#[async_trait]
impl Extractor for CliExtractor {
    async fn download(
        &self,
        request: &ExtractionRequest,
        progress: tokio::sync::mpsc::Sender<RawProgress>,
    ) -> Result<PathBuf> {
        let args = build_download_args(request);

        tracing::debug!(
            binary = %self.binary_path.display(),
            url = %request.url,
            "Spawning extraction engine"
        );

        let mut child = Command::new(&self.binary_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                Error::ExternalTool(format!(
                    "failed to execute {}: {e}",
                    self.binary_path.display()
                ))
            })?;

        // Drain stderr concurrently so a chatty engine can't fill the pipe
        // and stall while we read stdout.
        let stderr_pipe = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            if let Some(mut stderr) = stderr_pipe {
                stderr.read_to_string(&mut buf).await.ok();
            }
            buf
        });

        let stdout = child.stdout.take().ok_or_else(|| {
            Error::ExternalTool("engine process has no stdout handle".to_string())
        })?;
        let mut lines = BufReader::new(stdout).lines();
        let mut final_path: Option<PathBuf> = None;

        while let Some(line) = lines.next_line().await.map_err(Error::Io)? {
            if let Some(raw) = parse_progress_line(&line) {
                // Best-effort delivery: dropping an update beats stalling the
                // transfer behind a slow consumer.
                let _ = progress.try_send(raw);
            } else if !line.trim().is_empty() {
                // The only other line printed is the after-move filepath
                final_path = Some(PathBuf::from(line.trim()));
            }
        }

        let status = child.wait().await.map_err(Error::Io)?;
        let stderr_buf = stderr_task.await.unwrap_or_default();

        if !status.success() {
            return Err(Error::Extraction(format!(
                "engine exited with {status}: {}",
                stderr_tail(&stderr_buf)
            )));
        }

        progress.send(RawProgress::Finished).await.ok();

        final_path.ok_or_else(|| {
            Error::Extraction("engine finished without reporting an output path".to_string())
        })
    }

    async fn probe(&self, url: &str) -> Result<Vec<StreamVariant>> {
        let output = Command::new(&self.binary_path)
            .arg("-J")
            .arg("--no-warnings")
            .arg(url)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                Error::ExternalTool(format!(
                    "failed to execute {}: {e}",
                    self.binary_path.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Discovery(stderr_tail(&stderr)));
        }

        parse_probe_output(&output.stdout)
    }

    fn name(&self) -> &'static str {
        "cli-yt-dlp"
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn video_request() -> ExtractionRequest {
        ExtractionRequest {
            url: "https://media.example.com/watch?v=abc".to_string(),
            selection: FormatSelection::Video {
                selector: "bestvideo[height<=480]+bestaudio/best".to_string(),
                container: "mp4".to_string(),
            },
            output_template: PathBuf::from("downloads/%(title)s.%(ext)s"),
        }
    }

    #[test]
    fn from_path_returns_none_for_nonexistent_binary() {
        // This passes as long as no binary with this name exists on PATH
        let result = which::which("nonexistent-extraction-binary-xyz");
        assert!(result.is_err());
    }

    #[test]
    fn video_args_carry_selector_and_container() {
        let args = build_download_args(&video_request());

        let f_pos = args.iter().position(|a| a == "-f").unwrap();
        assert_eq!(args[f_pos + 1], "bestvideo[height<=480]+bestaudio/best");

        let merge_pos = args
            .iter()
            .position(|a| a == "--merge-output-format")
            .unwrap();
        assert_eq!(args[merge_pos + 1], "mp4");

        assert!(
            !args.iter().any(|a| a == "-x"),
            "video requests must not ask for audio extraction"
        );
    }

    #[test]
    fn audio_args_request_transcode_at_bitrate() {
        let request = ExtractionRequest {
            selection: FormatSelection::Audio {
                codec: "m4a".to_string(),
                bitrate_kbps: 192,
            },
            ..video_request()
        };
        let args = build_download_args(&request);

        let f_pos = args.iter().position(|a| a == "-f").unwrap();
        assert_eq!(args[f_pos + 1], "bestaudio/best");
        assert!(args.iter().any(|a| a == "-x"));

        let codec_pos = args.iter().position(|a| a == "--audio-format").unwrap();
        assert_eq!(args[codec_pos + 1], "m4a");

        let quality_pos = args.iter().position(|a| a == "--audio-quality").unwrap();
        assert_eq!(args[quality_pos + 1], "192K");
    }

    #[test]
    fn args_end_with_the_url() {
        let args = build_download_args(&video_request());
        assert_eq!(
            args.last().map(String::as_str),
            Some("https://media.example.com/watch?v=abc"),
            "URL must come last so it cannot be mistaken for an option value"
        );
    }

    #[test]
    fn args_include_machine_readable_progress_template() {
        let args = build_download_args(&video_request());
        let template_pos = args
            .iter()
            .position(|a| a == "--progress-template")
            .unwrap();
        let template = &args[template_pos + 1];

        assert!(template.starts_with("download:"));
        assert!(
            template.contains(PROGRESS_MARKER),
            "progress lines must carry the marker the parser looks for"
        );
        assert!(template.contains("%(progress.downloaded_bytes)s"));
        assert!(template.contains("%(progress.total_bytes_estimate)s"));
    }

    #[test]
    fn args_print_final_filepath_after_move() {
        let args = build_download_args(&video_request());
        let print_pos = args.iter().position(|a| a == "--print").unwrap();
        assert_eq!(args[print_pos + 1], "after_move:filepath");
        assert!(
            args.iter().any(|a| a == "--no-simulate"),
            "--print alone would put the engine into simulate mode"
        );
    }

    #[test]
    fn output_template_is_passed_through() {
        let args = build_download_args(&video_request());
        let o_pos = args.iter().position(|a| a == "-o").unwrap();
        assert_eq!(args[o_pos + 1], "downloads/%(title)s.%(ext)s");
    }
}
