//! Live camera capture through GStreamer.
//!
//! Cameras come from the GStreamer device monitor (`Video/Source` class), so
//! V4L2, PipeWire, AVFoundation and Media Foundation sources all work where
//! their plugins are installed. Opening a stream builds
//!
//! ```text
//! <source> ! videoconvert ! videoscale ! video/x-raw,format=RGBA,width=640 ! appsink
//! ```
//!
//! and the appsink callback publishes every decoded frame into a
//! [`FrameSlot`] that the preview uploads as a texture. Stopping the track
//! sets the pipeline to `Null`, which releases the device.
//!
//! # Dependencies
//!
//! - [`gstreamer`], [`gstreamer_app`], [`gstreamer_video`] - capture pipeline

use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer_app as gst_app;
use gstreamer_video as gst_video;

use softlight_core::{
    CaptureConstraints, DeviceInfo, FrameSlot, MediaDevices, MediaError, MediaStream, MediaTrack,
    VideoFrame,
};
use tracing::{debug, trace, warn};

/// Width frames are scaled to; height follows the source aspect.
pub const PREVIEW_WIDTH: i32 = 640;

/// How long a pipeline may take to start.
const START_TIMEOUT: gst::ClockTime = gst::ClockTime::from_seconds(5);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    /// First camera reported by the device monitor.
    Monitor,
    /// Fixed pipeline fragment, e.g. `videotestsrc is-live=true`.
    Launch(String),
}

/// Cameras reachable through GStreamer.
#[derive(Debug, Clone)]
pub struct GstCamera {
    source: Source,
}

impl GstCamera {
    /// Cameras found by the device monitor.
    pub const fn new() -> Self {
        Self {
            source: Source::Monitor,
        }
    }

    /// A single "camera" built from a pipeline fragment ending in a video
    /// source pad.
    pub fn with_source(description: impl Into<String>) -> Self {
        Self {
            source: Source::Launch(description.into()),
        }
    }

    fn source_element(&self) -> Result<(String, gst::Element), MediaError> {
        match &self.source {
            Source::Launch(description) => {
                let bin = gst::parse::bin_from_description(description, true)
                    .map_err(|e| MediaError::Device(e.to_string()))?;
                Ok((description.clone(), bin.upcast()))
            }
            Source::Monitor => {
                let device = monitor_devices()?
                    .into_iter()
                    .next()
                    .ok_or(MediaError::NotFound)?;
                let element = device
                    .create_element(None)
                    .map_err(|e| MediaError::Device(e.to_string()))?;
                Ok((device.display_name().to_string(), element))
            }
        }
    }
}

impl Default for GstCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaDevices for GstCamera {
    fn enumerate(&self) -> Result<Vec<DeviceInfo>, MediaError> {
        trace!(source = ?self.source, "GstCamera::enumerate");
        let devices = match &self.source {
            Source::Launch(description) => {
                vec![DeviceInfo::video_input(description.clone(), description.clone())]
            }
            Source::Monitor => monitor_devices()?
                .iter()
                .enumerate()
                .map(|(i, d)| DeviceInfo::video_input(i.to_string(), d.display_name().to_string()))
                .collect(),
        };
        debug!(count = devices.len(), "Video devices enumerated");
        Ok(devices)
    }

    fn open(&self, constraints: &CaptureConstraints) -> Result<MediaStream, MediaError> {
        if constraints.video.is_none() {
            return Err(MediaError::NotFound);
        }
        init()?;

        let (label, source) = self.source_element()?;
        let slot = FrameSlot::new();
        let pipeline = build_pipeline(&source, slot.clone())?;
        start(&pipeline)?;
        debug!(%label, "Camera pipeline playing");

        let track = PipelineTrack {
            label: label.clone(),
            pipeline: Some(pipeline),
            slot,
        };
        Ok(MediaStream::new(label, vec![Box::new(track)]))
    }
}

// =============================================================================
// Pipeline
// =============================================================================

fn init() -> Result<(), MediaError> {
    gst::init().map_err(|e| {
        warn!(error = %e, "GStreamer unavailable");
        MediaError::Unsupported
    })
}

fn monitor_devices() -> Result<Vec<gst::Device>, MediaError> {
    init()?;
    let monitor = gst::DeviceMonitor::new();
    let _filter = monitor.add_filter(Some("Video/Source"), None);
    monitor
        .start()
        .map_err(|e| MediaError::Device(e.to_string()))?;
    let devices: Vec<gst::Device> = monitor.devices().into_iter().collect();
    monitor.stop();
    Ok(devices)
}

fn make(factory: &str) -> Result<gst::Element, MediaError> {
    gst::ElementFactory::make(factory)
        .build()
        .map_err(|e| MediaError::Device(format!("{factory}: {e}")))
}

fn build_pipeline(source: &gst::Element, slot: FrameSlot) -> Result<gst::Pipeline, MediaError> {
    let convert = make("videoconvert")?;
    let scale = make("videoscale")?;
    let caps = gst_video::VideoCapsBuilder::new()
        .format(gst_video::VideoFormat::Rgba)
        .width(PREVIEW_WIDTH)
        .build();
    let sink = gst_app::AppSink::builder()
        .caps(&caps)
        .max_buffers(1)
        .drop(true)
        .build();

    sink.set_callbacks(
        gst_app::AppSinkCallbacks::builder()
            .new_sample(move |sink| {
                let sample = sink.pull_sample().map_err(|_| gst::FlowError::Eos)?;
                match unpack_rgba(&sample) {
                    Some((width, height, pixels)) => {
                        slot.publish(width, height, pixels);
                    }
                    None => trace!("Unreadable camera sample skipped"),
                }
                Ok(gst::FlowSuccess::Ok)
            })
            .build(),
    );

    let pipeline = gst::Pipeline::new();
    let elements = [source, &convert, &scale, sink.upcast_ref::<gst::Element>()];
    pipeline
        .add_many(elements)
        .map_err(|e| MediaError::Device(e.to_string()))?;
    gst::Element::link_many(elements).map_err(|e| MediaError::Device(e.to_string()))?;
    Ok(pipeline)
}

/// Copies the RGBA plane out of `sample`, dropping row padding.
fn unpack_rgba(sample: &gst::Sample) -> Option<(u32, u32, Vec<u8>)> {
    let info = gst_video::VideoInfo::from_caps(sample.caps()?).ok()?;
    let buffer = sample.buffer()?;
    let map = buffer.map_readable().ok()?;
    let data = map.as_slice();

    let (width, height) = (info.width(), info.height());
    let row = width as usize * 4;
    let stride = usize::try_from(*info.stride().first()?).ok()?;
    let offset = *info.offset().first()?;

    let mut pixels = Vec::with_capacity(row * height as usize);
    for y in 0..height as usize {
        let start = offset + y * stride;
        pixels.extend_from_slice(data.get(start..start + row)?);
    }
    Some((width, height, pixels))
}

fn start(pipeline: &gst::Pipeline) -> Result<(), MediaError> {
    let started = pipeline.set_state(gst::State::Playing).is_ok()
        && pipeline.state(START_TIMEOUT).0.is_ok();
    if started {
        return Ok(());
    }
    let err = bus_error(pipeline);
    let _ = pipeline.set_state(gst::State::Null);
    Err(err)
}

fn bus_error(pipeline: &gst::Pipeline) -> MediaError {
    let message = pipeline
        .bus()
        .and_then(|bus| bus.pop_filtered(&[gst::MessageType::Error]));
    match message.as_ref().map(|m| m.view()) {
        Some(gst::MessageView::Error(err)) => {
            let debug = err.debug();
            classify(&err.error(), debug.as_deref())
        }
        _ => MediaError::Device("camera pipeline failed to start".into()),
    }
}

/// Maps a GStreamer error onto the camera error taxonomy.
fn classify(error: &gst::glib::Error, debug: Option<&str>) -> MediaError {
    let denied = debug.is_some_and(|d| d.contains("Permission denied"));
    match error.kind::<gst::ResourceError>() {
        Some(gst::ResourceError::NotAuthorized) => MediaError::PermissionDenied,
        Some(gst::ResourceError::NotFound) => MediaError::NotFound,
        Some(
            gst::ResourceError::OpenRead
            | gst::ResourceError::OpenReadWrite
            | gst::ResourceError::OpenWrite,
        ) if denied => MediaError::PermissionDenied,
        _ => MediaError::Device(error.message().to_string()),
    }
}

// =============================================================================
// Track
// =============================================================================

/// Video track backed by a running pipeline.
#[derive(Debug)]
struct PipelineTrack {
    label: String,
    pipeline: Option<gst::Pipeline>,
    slot: FrameSlot,
}

impl MediaTrack for PipelineTrack {
    fn label(&self) -> &str {
        &self.label
    }

    fn stop(&mut self) {
        if let Some(pipeline) = self.pipeline.take() {
            if let Err(e) = pipeline.set_state(gst::State::Null) {
                warn!(label = %self.label, error = %e, "Camera pipeline did not stop cleanly");
            }
            debug!(label = %self.label, "Camera released");
        }
    }

    fn is_live(&self) -> bool {
        self.pipeline.is_some()
    }

    fn latest_frame(&self) -> Option<VideoFrame> {
        self.pipeline.as_ref().and_then(|_| self.slot.latest())
    }
}
