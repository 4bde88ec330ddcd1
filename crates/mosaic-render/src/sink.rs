//! Frame sinks.
//!
//! The compositor hands finished RGBA8 buffers to a [`FrameSink`]. The
//! production sink pipes raw video into an `ffmpeg` child process that
//! encodes H.264 and pushes FLV to an RTMP ingest; a raw-file sink exists
//! for local debugging.

use std::io::Write;
use std::process::{Child, ChildStdin, Command, Stdio};

use tracing::{info, warn};

use mosaic_core::error::MosaicError;

/// Consumer of finished frames.
pub trait FrameSink: Send {
    /// `frame` is one full canvas: RGBA8, row-major, width * height * 4 bytes.
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), MosaicError>;

    /// Flush and release the output. Called once on shutdown.
    fn close(&mut self);
}

/// Pipes raw frames into an `ffmpeg` encoder process.
///
/// Frames arrive at the compositor rate; ffmpeg duplicates them up to the
/// output rate so the stream carries a steady cadence regardless of how
/// often the mosaic actually changes.
pub struct FfmpegSink {
    child: Child,
    stdin: Option<ChildStdin>,
}

impl FfmpegSink {
    pub fn spawn(
        output_url: &str,
        width: u32,
        height: u32,
        input_fps: u32,
        output_fps: u32,
    ) -> Result<Self, MosaicError> {
        let mut child = Command::new("ffmpeg")
            .args(["-y", "-f", "rawvideo", "-pix_fmt", "rgba"])
            .args(["-s", &format!("{width}x{height}")])
            .args(["-r", &input_fps.to_string()])
            .args(["-i", "-"])
            .args(["-vf", &format!("fps={output_fps},format=yuv420p")])
            .args(["-c:v", "libx264", "-preset", "ultrafast", "-tune", "zerolatency"])
            .args(["-f", "flv", output_url])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| MosaicError::Sink(format!("spawning ffmpeg: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| MosaicError::Sink("ffmpeg stdin unavailable".into()))?;

        info!("ffmpeg encoder started ({width}x{height} @ {input_fps} -> {output_fps} fps)");
        Ok(Self { child, stdin: Some(stdin) })
    }
}

impl FrameSink for FfmpegSink {
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), MosaicError> {
        let stdin =
            self.stdin.as_mut().ok_or_else(|| MosaicError::Sink("encoder closed".into()))?;
        stdin
            .write_all(frame)
            .map_err(|e| MosaicError::Sink(format!("writing frame to ffmpeg: {e}")))
    }

    fn close(&mut self) {
        // Dropping stdin sends EOF; ffmpeg then flushes and exits.
        drop(self.stdin.take());
        match self.child.wait() {
            Ok(status) => info!("ffmpeg exited: {status}"),
            Err(e) => warn!("waiting for ffmpeg: {e}"),
        }
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if self.stdin.is_some() {
            self.close();
        }
    }
}

/// Appends raw RGBA frames to a file. Debug aid; the result plays with
/// `ffplay -f rawvideo -pix_fmt rgba -s WxH`.
pub struct FileSink {
    file: Option<std::fs::File>,
}

impl FileSink {
    pub fn create(path: &str) -> Result<Self, MosaicError> {
        let file = std::fs::File::create(path)
            .map_err(|e| MosaicError::Sink(format!("creating {path}: {e}")))?;
        Ok(Self { file: Some(file) })
    }
}

impl FrameSink for FileSink {
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), MosaicError> {
        let file = self.file.as_mut().ok_or_else(|| MosaicError::Sink("sink closed".into()))?;
        file.write_all(frame).map_err(|e| MosaicError::Sink(format!("writing frame: {e}")))
    }

    fn close(&mut self) {
        self.file.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sink_appends_frames() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("mosaic-sink-{}.raw", std::process::id()));
        let path_str = path.to_str().unwrap();

        let mut sink = FileSink::create(path_str).unwrap();
        sink.write_frame(&[1u8; 16]).unwrap();
        sink.write_frame(&[2u8; 16]).unwrap();
        sink.close();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written.len(), 32);
        assert!(sink.write_frame(&[3u8; 16]).is_err());

        std::fs::remove_file(&path).ok();
    }
}
