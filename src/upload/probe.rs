use std::process::Stdio;

use camino::Utf8Path as Path;
use eyre::{eyre, Context, Result};
use serde::Deserialize;
use tokio::process::Command;
use tracing::instrument;

/// Media duration in seconds, read from the container metadata of a local
/// file before anything is uploaded.
#[instrument]
pub async fn ffprobe_duration(path: &Path, ffprobe_bin: Option<&str>) -> Result<f64> {
    let ffprobe_result = Command::new(ffprobe_bin.unwrap_or("ffprobe"))
        .args(["-v", "error", "-show_format", "-of", "json=compact=1"])
        .arg(path)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .wrap_err("failed to call ffprobe")?
        .wait_with_output()
        .await
        .wrap_err("ffprobe error")?;
    if !ffprobe_result.status.success() {
        return Err(eyre!(
            "ffprobe exited with {}: {}",
            ffprobe_result.status,
            String::from_utf8_lossy(&ffprobe_result.stderr)
        ));
    }
    parse_ffprobe_duration(&ffprobe_result.stdout)
}

fn parse_ffprobe_duration(json: &[u8]) -> Result<f64> {
    #[derive(Debug, Clone, Deserialize)]
    struct FFProbeFormat {
        pub duration: Option<String>,
    }
    #[derive(Debug, Clone, Deserialize)]
    struct FFProbeOutput {
        pub format: FFProbeFormat,
    }

    let parsed: FFProbeOutput =
        serde_json::from_slice(json).wrap_err("could not parse ffprobe output")?;
    let duration: f64 = parsed
        .format
        .duration
        .ok_or(eyre!("no duration in ffprobe output"))?
        .parse()
        .wrap_err("could not parse duration in ffprobe output")?;
    if !duration.is_finite() || duration < 0.0 {
        return Err(eyre!("invalid duration in ffprobe output: {}", duration));
    }
    Ok(duration)
}
