//! Frame-producing abstractions.
//!
//! [`FrameSource`] is the narrow interface the boundary detector consumes:
//! frame rate, frame count, and a sequential read. [`VideoFrameSource`] is
//! the production implementation, decoding a video file via FFmpeg (through
//! the [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate) and
//! yielding tightly-packed RGB24 frames on demand. Keeping decode behind the
//! trait means the detection algorithm can be exercised with synthetic
//! sources that never touch a real file.
//!
//! The decoder handle is owned by the source and released when the source is
//! dropped, on every exit path: normal completion, early stop, or error.

use std::path::Path;

use ffmpeg_next::{
    Error as FfmpegError, Packet,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};

use crate::error::SceneSplitError;

/// One decoded frame: a tightly-packed RGB24 pixel buffer plus its ordinal
/// index within the stream.
///
/// Frames are transient; the detector computes a descriptor and drops them.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Zero-based ordinal index of this frame in decode order.
    pub index: u64,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB24 pixel data, row-major, 3 bytes per pixel, no row padding.
    pub rgb: Vec<u8>,
}

/// Stream-level metadata for an opened video.
#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use]
pub struct VideoInfo {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second; 0.0 when the container does not report a rate.
    pub frames_per_second: f64,
    /// Total frame count (exact when the container reports it, otherwise
    /// estimated from duration × frame rate); 0 when unknown.
    pub frame_count: u64,
}

impl VideoInfo {
    /// Total duration in seconds, or 0.0 when frame rate or frame count is
    /// unknown.
    pub fn duration_seconds(&self) -> f64 {
        if self.frames_per_second > 0.0 && self.frame_count > 0 {
            self.frame_count as f64 / self.frames_per_second
        } else {
            0.0
        }
    }
}

/// A sequential source of decoded video frames.
///
/// Sequential-only: no seeking is required (or offered) by the detection
/// core. Implementations report `Ok(None)` at end of stream and
/// [`SceneSplitError::DecodeInterrupted`] for mid-stream failures, which the
/// detector treats as end of stream rather than a fatal abort.
pub trait FrameSource {
    /// Native frame rate in frames per second; 0.0 when unknown.
    fn frame_rate(&self) -> f64;

    /// Total number of frames; 0 when unknown.
    fn frame_count(&self) -> u64;

    /// Read the next frame in decode order.
    fn read_next(&mut self) -> Result<Option<Frame>, SceneSplitError>;
}

/// FFmpeg-backed [`FrameSource`] over a video file.
///
/// Opens the file, selects the best video stream, and decodes frames
/// sequentially, scaling each to RGB24 at the source resolution.
///
/// # Example
///
/// ```no_run
/// use scenesplit::{FrameSource, VideoFrameSource};
///
/// let mut source = VideoFrameSource::open("input.mp4")?;
/// println!("{:.2} fps, ~{} frames", source.frame_rate(), source.frame_count());
/// while let Some(frame) = source.read_next()? {
///     println!("frame {} ({}x{})", frame.index, frame.width, frame.height);
/// }
/// # Ok::<(), scenesplit::SceneSplitError>(())
/// ```
pub struct VideoFrameSource {
    input_context: Input,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    video_stream_index: usize,
    info: VideoInfo,
    decoded_frame: VideoFrame,
    scaled_frame: VideoFrame,
    next_index: u64,
    eof_sent: bool,
    done: bool,
}

impl VideoFrameSource {
    /// Open a video file for sequential frame reading.
    ///
    /// Initializes FFmpeg (idempotent), opens the file, locates the best
    /// video stream, and caches stream metadata.
    ///
    /// # Errors
    ///
    /// Returns [`SceneSplitError::VideoOpen`] if the file cannot be opened or
    /// its video codec cannot be set up, and [`SceneSplitError::NoVideoStream`]
    /// if the file carries no video stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SceneSplitError> {
        let path = path.as_ref();

        log::debug!("Opening video: {}", path.display());

        // Initialise ffmpeg (safe to call multiple times).
        ffmpeg_next::init().map_err(|error| SceneSplitError::VideoOpen {
            path: path.to_path_buf(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| SceneSplitError::VideoOpen {
                path: path.to_path_buf(),
                reason: error.to_string(),
            })?;

        let video_stream_index = input_context
            .streams()
            .best(Type::Video)
            .map(|stream| stream.index())
            .ok_or(SceneSplitError::NoVideoStream)?;

        let (frames_per_second, reported_frames, decoder) = {
            let stream = input_context
                .stream(video_stream_index)
                .ok_or(SceneSplitError::NoVideoStream)?;

            // Prefer the stream's average frame rate; fall back to the raw
            // rate field when the average is unset.
            let average = stream.avg_frame_rate();
            let frames_per_second = if average.denominator() != 0 {
                average.numerator() as f64 / average.denominator() as f64
            } else {
                let rate = stream.rate();
                if rate.denominator() != 0 {
                    rate.numerator() as f64 / rate.denominator() as f64
                } else {
                    0.0
                }
            };

            let decoder_context = CodecContext::from_parameters(stream.parameters())
                .map_err(|error| SceneSplitError::VideoOpen {
                    path: path.to_path_buf(),
                    reason: format!("Failed to read video codec parameters: {error}"),
                })?;
            let decoder =
                decoder_context
                    .decoder()
                    .video()
                    .map_err(|error| SceneSplitError::VideoOpen {
                        path: path.to_path_buf(),
                        reason: format!("Failed to create video decoder: {error}"),
                    })?;

            (frames_per_second, stream.frames(), decoder)
        };

        let width = decoder.width();
        let height = decoder.height();

        // Exact count when the container reports one, otherwise estimate
        // from the container duration.
        let frame_count = if reported_frames > 0 {
            reported_frames as u64
        } else {
            let duration_microseconds = input_context.duration();
            if duration_microseconds > 0 && frames_per_second > 0.0 {
                (duration_microseconds as f64 / 1_000_000.0 * frames_per_second) as u64
            } else {
                0
            }
        };

        let scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|error| SceneSplitError::VideoOpen {
            path: path.to_path_buf(),
            reason: format!("Failed to create scaling context: {error}"),
        })?;

        let info = VideoInfo {
            width,
            height,
            frames_per_second,
            frame_count,
        };

        log::info!(
            "Opened video: {} ({}x{}, {:.2} fps, ~{} frames)",
            path.display(),
            width,
            height,
            frames_per_second,
            frame_count,
        );

        Ok(Self {
            input_context,
            decoder,
            scaler,
            video_stream_index,
            info,
            decoded_frame: VideoFrame::empty(),
            scaled_frame: VideoFrame::empty(),
            next_index: 0,
            eof_sent: false,
            done: false,
        })
    }

    /// Open a video file, read its metadata, and close it immediately.
    ///
    /// # Errors
    ///
    /// Same as [`open`](VideoFrameSource::open).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use scenesplit::VideoFrameSource;
    ///
    /// let info = VideoFrameSource::probe("input.mp4")?;
    /// println!("{}x{} @ {:.2} fps", info.width, info.height, info.frames_per_second);
    /// # Ok::<(), scenesplit::SceneSplitError>(())
    /// ```
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<VideoInfo, SceneSplitError> {
        Ok(Self::open(path)?.info)
    }

    /// Cached stream metadata.
    pub fn info(&self) -> VideoInfo {
        self.info
    }

    /// Scale and convert the current decoded frame into an owned [`Frame`].
    fn convert_current_frame(&mut self) -> Result<Frame, SceneSplitError> {
        if let Err(error) = self.scaler.run(&self.decoded_frame, &mut self.scaled_frame) {
            self.done = true;
            return Err(SceneSplitError::DecodeInterrupted(error.to_string()));
        }

        let rgb = frame_to_buffer(&self.scaled_frame, self.info.width, self.info.height);
        let index = self.next_index;
        self.next_index += 1;

        Ok(Frame {
            index,
            width: self.info.width,
            height: self.info.height,
            rgb,
        })
    }
}

impl FrameSource for VideoFrameSource {
    fn frame_rate(&self) -> f64 {
        self.info.frames_per_second
    }

    fn frame_count(&self) -> u64 {
        self.info.frame_count
    }

    fn read_next(&mut self) -> Result<Option<Frame>, SceneSplitError> {
        if self.done {
            return Ok(None);
        }

        loop {
            // Drain frames the decoder has already produced.
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                return self.convert_current_frame().map(Some);
            }

            if self.eof_sent {
                // Decoder fully drained.
                self.done = true;
                return Ok(None);
            }

            // Feed the decoder more packets.
            let mut packet = Packet::empty();
            match packet.read(&mut self.input_context) {
                Ok(()) => {
                    if packet.stream() == self.video_stream_index
                        && let Err(error) = self.decoder.send_packet(&packet)
                    {
                        self.done = true;
                        return Err(SceneSplitError::DecodeInterrupted(error.to_string()));
                    }
                    // Non-video packets are silently skipped.
                }
                Err(FfmpegError::Eof) => {
                    let _ = self.decoder.send_eof();
                    self.eof_sent = true;
                }
                Err(error) => {
                    self.done = true;
                    return Err(SceneSplitError::DecodeInterrupted(error.to_string()));
                }
            }
        }
    }
}

/// Copy pixel data from a scaled FFmpeg frame into a tightly-packed RGB24
/// buffer, collapsing any row stride padding.
fn frame_to_buffer(video_frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    const BYTES_PER_PIXEL: usize = 3;

    let stride = video_frame.stride(0);
    let expected_stride = width as usize * BYTES_PER_PIXEL;
    let data = video_frame.data(0);

    if stride == expected_stride {
        data[..expected_stride * height as usize].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(expected_stride * height as usize);
        for row in 0..height as usize {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + expected_stride]);
        }
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_from_rate_and_count() {
        let info = VideoInfo {
            width: 1920,
            height: 1080,
            frames_per_second: 25.0,
            frame_count: 250,
        };
        assert_eq!(info.duration_seconds(), 10.0);
    }

    #[test]
    fn duration_unknown_when_rate_or_count_missing() {
        let no_rate = VideoInfo {
            width: 640,
            height: 480,
            frames_per_second: 0.0,
            frame_count: 100,
        };
        assert_eq!(no_rate.duration_seconds(), 0.0);

        let no_count = VideoInfo {
            width: 640,
            height: 480,
            frames_per_second: 30.0,
            frame_count: 0,
        };
        assert_eq!(no_count.duration_seconds(), 0.0);
    }
}
