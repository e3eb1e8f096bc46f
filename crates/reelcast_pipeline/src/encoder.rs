//! `ffmpeg`/`ffprobe` encoder.

use async_trait::async_trait;
use reelcast_config::MediaConfig;
use reelcast_error::{MediaError, MediaErrorKind, ReelcastResult};
use reelcast_interface::{EncodeJob, FrameSpec, MediaEncoder, VideoProbe};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Volume of the music track relative to narration.
const MUSIC_VOLUME: &str = "0.25";

/// Top-level ffprobe JSON output (`-print_format json -show_format -show_streams`).
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    #[serde(default)]
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Runs the external `ffmpeg` and `ffprobe` binaries.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    ffmpeg_timeout: Duration,
    ffprobe_timeout: Duration,
}

impl FfmpegEncoder {
    /// Create an encoder from media settings.
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            ffmpeg: config.ffmpeg_path.clone(),
            ffprobe: config.ffprobe_path.clone(),
            ffmpeg_timeout: Duration::from_secs(config.ffmpeg_timeout_secs),
            ffprobe_timeout: Duration::from_secs(config.ffprobe_timeout_secs),
        }
    }

    async fn run(&self, program: &Path, args: Vec<OsString>, timeout: Duration) -> Result<Vec<u8>, MediaError> {
        debug!(program = %program.display(), ?args, "Running encoder");
        let output = tokio::time::timeout(
            timeout,
            Command::new(program).args(&args).kill_on_drop(true).output(),
        )
        .await
        .map_err(|_| {
            MediaError::new(MediaErrorKind::Timeout(format!(
                "{} timed out after {}s",
                program.display(),
                timeout.as_secs()
            )))
        })?
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MediaError::new(MediaErrorKind::ToolNotFound(format!(
                    "{} (install ffmpeg and add it to PATH)",
                    program.display()
                )))
            } else {
                MediaError::new(MediaErrorKind::Io(format!("{}: {}", program.display(), e)))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: String = stderr
                .lines()
                .rev()
                .take(5)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect::<Vec<_>>()
                .join(" | ");
            return Err(MediaError::new(MediaErrorKind::Encoding(format!(
                "{} exited with {:?}: {}",
                program.display(),
                output.status.code(),
                tail
            ))));
        }
        Ok(output.stdout)
    }
}

/// `scale` + `pad` filter fitting any input into `frame`.
pub(crate) fn fit_filter(frame: FrameSpec) -> String {
    let FrameSpec { width: w, height: h } = frame;
    format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setsar=1"
    )
}

fn os(s: impl Into<OsString>) -> OsString {
    s.into()
}

/// ffmpeg arguments for a job. Concat list files must already exist.
pub(crate) fn ffmpeg_args(job: &EncodeJob, concat_list: Option<&Path>) -> Vec<OsString> {
    let mut args = vec![os("-y"), os("-hide_banner"), os("-loglevel"), os("error")];
    match job {
        EncodeJob::Finalize {
            input,
            output,
            frame,
            rescale,
            keep_audio,
            music,
        } => {
            args.extend([os("-i"), input.as_os_str().to_owned()]);
            if let Some(music) = music {
                args.extend([os("-stream_loop"), os("-1"), os("-i"), music.as_os_str().to_owned()]);
            }
            let video = if *rescale {
                format!("[0:v]{}[v]", fit_filter(*frame))
            } else {
                "[0:v]null[v]".to_string()
            };
            let audio = match (music.is_some(), *keep_audio) {
                (true, true) => Some(format!(
                    "[1:a]volume={MUSIC_VOLUME}[m];[0:a][m]amix=inputs=2:duration=first:dropout_transition=0[a]"
                )),
                (true, false) => Some(format!("[1:a]volume={MUSIC_VOLUME}[a]")),
                (false, _) => None,
            };
            let graph = match &audio {
                Some(audio) => format!("{};{}", video, audio),
                None => video,
            };
            args.extend([os("-filter_complex"), os(graph), os("-map"), os("[v]")]);
            match (&audio, *keep_audio) {
                (Some(_), _) => args.extend([os("-map"), os("[a]")]),
                (None, true) => args.extend([os("-map"), os("0:a?")]),
                (None, false) => {}
            }
            args.extend([
                os("-c:v"),
                os("libx264"),
                os("-pix_fmt"),
                os("yuv420p"),
                os("-c:a"),
                os("aac"),
                os("-shortest"),
                os("-movflags"),
                os("+faststart"),
                output.as_os_str().to_owned(),
            ]);
        }
        EncodeJob::Reencode {
            input,
            output,
            frame,
            max_secs,
        } => {
            args.extend([
                os("-i"),
                input.as_os_str().to_owned(),
                os("-t"),
                os(max_secs.to_string()),
                os("-vf"),
                os(fit_filter(*frame)),
                os("-c:v"),
                os("libx264"),
                os("-pix_fmt"),
                os("yuv420p"),
                os("-c:a"),
                os("aac"),
                os("-movflags"),
                os("+faststart"),
                output.as_os_str().to_owned(),
            ]);
        }
        EncodeJob::Slideshow { output, frame, .. } => {
            if let Some(list) = concat_list {
                args.extend([
                    os("-f"),
                    os("concat"),
                    os("-safe"),
                    os("0"),
                    os("-i"),
                    list.as_os_str().to_owned(),
                ]);
            }
            args.extend([
                os("-vf"),
                os(fit_filter(*frame)),
                os("-c:v"),
                os("libx264"),
                os("-pix_fmt"),
                os("yuv420p"),
                os("-r"),
                os("30"),
                output.as_os_str().to_owned(),
            ]);
        }
        EncodeJob::LoopImage {
            image,
            output,
            frame,
            secs,
        } => {
            args.extend([
                os("-loop"),
                os("1"),
                os("-i"),
                image.as_os_str().to_owned(),
                os("-t"),
                os(secs.to_string()),
                os("-vf"),
                os(fit_filter(*frame)),
                os("-c:v"),
                os("libx264"),
                os("-pix_fmt"),
                os("yuv420p"),
                os("-r"),
                os("30"),
                output.as_os_str().to_owned(),
            ]);
        }
    }
    args
}

/// ffmpeg concat demuxer list showing each image for `secs_per_image`.
pub(crate) fn concat_list(images: &[PathBuf], secs_per_image: u32) -> String {
    let quote = |p: &Path| p.display().to_string().replace('\'', "'\\''");
    let mut lines = Vec::with_capacity(images.len() * 2 + 1);
    for image in images {
        lines.push(format!("file '{}'", quote(image)));
        lines.push(format!("duration {}", secs_per_image));
    }
    // The last image must be listed twice for its duration to apply.
    if let Some(last) = images.last() {
        lines.push(format!("file '{}'", quote(last)));
    }
    lines.join("\n")
}

#[async_trait]
impl MediaEncoder for FfmpegEncoder {
    #[instrument(skip(self), fields(path = %path.display()))]
    async fn probe(&self, path: &Path) -> ReelcastResult<VideoProbe> {
        let args = vec![
            os("-v"),
            os("quiet"),
            os("-print_format"),
            os("json"),
            os("-show_format"),
            os("-show_streams"),
            path.as_os_str().to_owned(),
        ];
        let stdout = self.run(&self.ffprobe, args, self.ffprobe_timeout).await?;
        let parsed: FfprobeOutput = serde_json::from_slice(&stdout).map_err(|e| {
            MediaError::new(MediaErrorKind::CorruptPayload(format!(
                "unreadable ffprobe output for {}: {}",
                path.display(),
                e
            )))
        })?;

        let video = parsed
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .ok_or_else(|| {
                MediaError::new(MediaErrorKind::CorruptPayload(format!(
                    "{} has no video stream",
                    path.display()
                )))
            })?;
        let (Some(width), Some(height)) = (video.width, video.height) else {
            return Err(MediaError::new(MediaErrorKind::CorruptPayload(format!(
                "{} has no frame size",
                path.display()
            )))
            .into());
        };

        Ok(VideoProbe {
            width,
            height,
            has_audio: parsed
                .streams
                .iter()
                .any(|s| s.codec_type.as_deref() == Some("audio")),
            duration_secs: parsed
                .format
                .and_then(|f| f.duration)
                .and_then(|d| d.parse().ok()),
        })
    }

    #[instrument(skip(self, job), fields(output = %job.output().display()))]
    async fn encode(&self, job: &EncodeJob) -> ReelcastResult<()> {
        let list_path = match job {
            EncodeJob::Slideshow {
                images,
                output,
                secs_per_image,
                ..
            } => {
                if images.is_empty() {
                    return Err(MediaError::new(MediaErrorKind::Asset(
                        "slideshow needs at least one image".to_string(),
                    ))
                    .into());
                }
                let list = output.with_extension("concat.txt");
                tokio::fs::write(&list, concat_list(images, *secs_per_image))
                    .await
                    .map_err(|e| {
                        MediaError::new(MediaErrorKind::Io(format!("{}: {}", list.display(), e)))
                    })?;
                Some(list)
            }
            _ => None,
        };

        let result = self
            .run(
                &self.ffmpeg,
                ffmpeg_args(job, list_path.as_deref()),
                self.ffmpeg_timeout,
            )
            .await;
        if let Some(list) = list_path {
            let _ = tokio::fs::remove_file(list).await;
        }
        result?;

        match tokio::fs::metadata(job.output()).await {
            Ok(meta) if meta.len() > 0 => Ok(()),
            _ => Err(MediaError::new(MediaErrorKind::Encoding(format!(
                "no output written to {}",
                job.output().display()
            )))
            .into()),
        }
    }

    async fn is_available(&self) -> bool {
        let ffmpeg = Command::new(&self.ffmpeg).arg("-version").output().await;
        let ffprobe = Command::new(&self.ffprobe).arg("-version").output().await;
        matches!((ffmpeg, ffprobe), (Ok(a), Ok(b)) if a.status.success() && b.status.success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> FrameSpec {
        FrameSpec {
            width: 1080,
            height: 1920,
        }
    }

    fn joined(args: &[OsString]) -> String {
        args.iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn finalize_mixes_music_under_narration() {
        let job = EncodeJob::Finalize {
            input: PathBuf::from("in.mp4"),
            output: PathBuf::from("out.mp4"),
            frame: frame(),
            rescale: true,
            keep_audio: true,
            music: Some(PathBuf::from("pop.mp3")),
        };
        let args = joined(&ffmpeg_args(&job, None));
        assert!(args.contains("-stream_loop -1 -i pop.mp3"));
        assert!(args.contains("amix=inputs=2"));
        assert!(args.contains("scale=1080:1920"));
        assert!(args.ends_with("out.mp4"));
    }

    #[test]
    fn finalize_without_music_keeps_source_audio() {
        let job = EncodeJob::Finalize {
            input: PathBuf::from("in.mp4"),
            output: PathBuf::from("out.mp4"),
            frame: frame(),
            rescale: true,
            keep_audio: true,
            music: None,
        };
        let args = joined(&ffmpeg_args(&job, None));
        assert!(!args.contains("amix"));
        assert!(args.contains("-map 0:a?"));
    }

    #[test]
    fn concat_list_repeats_last_image() {
        let list = concat_list(
            &[PathBuf::from("/a/1.png"), PathBuf::from("/a/2.png")],
            3,
        );
        assert_eq!(
            list,
            "file '/a/1.png'\nduration 3\nfile '/a/2.png'\nduration 3\nfile '/a/2.png'"
        );
    }
}
