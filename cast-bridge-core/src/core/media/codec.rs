use std::time::Duration;

use log::{debug, trace};
use url::Url;

use crate::core::config::BridgeProperties;
use crate::core::media::{
    LoadRequest, MediaDescriptor, MediaInfo, MediaMetadata, StreamType, WebImage,
    METADATA_TYPE_MOVIE,
};
use crate::core::tracks::{distinct_track_languages, track_languages, TrackCategory};

/// The codec between the host media descriptor and the receiver media information.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaCodec {
    default_content_type: String,
    image_width: u32,
    image_height: u32,
}

impl MediaCodec {
    /// Create a new codec for the given bridge properties.
    pub fn new(properties: &BridgeProperties) -> Self {
        Self {
            default_content_type: properties.default_content_type.clone(),
            image_width: properties.image_width,
            image_height: properties.image_height,
        }
    }

    /// Encode the host media descriptor into a load request for the receiver.
    pub fn encode(&self, descriptor: &MediaDescriptor) -> LoadRequest {
        let content_type = if descriptor.content_type.is_empty() {
            self.default_content_type.clone()
        } else {
            descriptor.content_type.clone()
        };
        let images = descriptor
            .image
            .as_ref()
            .and_then(|e| match Url::parse(e) {
                Ok(url) => Some(url),
                Err(err) => {
                    debug!("Ignoring invalid media image {}, {}", e, err);
                    None
                }
            })
            .map(|url| WebImage {
                url,
                width: Some(self.image_width),
                height: Some(self.image_height),
            })
            .into_iter()
            .collect();

        let request = LoadRequest {
            media: MediaInfo {
                content_id: descriptor.url.clone(),
                content_url: descriptor.url.clone(),
                content_type: Some(content_type),
                stream_type: descriptor.stream_type,
                duration: None,
                metadata: Some(MediaMetadata {
                    metadata_type: METADATA_TYPE_MOVIE,
                    title: descriptor.title.clone(),
                    subtitle: descriptor.subtitle.clone(),
                    images,
                }),
                tracks: vec![],
                custom_data: descriptor.custom_data.clone(),
            },
            autoplay: true,
            current_time: 0.0,
            active_track_ids: None,
            custom_data: descriptor.custom_data.clone(),
        };
        trace!("Encoded media descriptor into {:?}", request);
        request
    }

    /// Decode the receiver media information into the host media descriptor.
    ///
    /// The image is reported as the normalized absolute url of the receiver, which means
    /// that `http://x` is returned as `http://x/`.
    pub fn decode(&self, info: &MediaInfo) -> MediaDescriptor {
        let metadata = info.metadata.as_ref();

        MediaDescriptor {
            id: info.content_id.clone(),
            url: info.content_url.clone().or_else(|| info.content_id.clone()),
            title: metadata.and_then(|e| e.title.clone()),
            subtitle: metadata.and_then(|e| e.subtitle.clone()),
            image: metadata
                .and_then(|e| e.images.first())
                .map(|e| e.url.to_string()),
            content_type: info.content_type.clone().unwrap_or_default(),
            stream_type: match info.stream_type {
                StreamType::Live => StreamType::Live,
                _ => StreamType::Buffered,
            },
            custom_data: info.custom_data.clone(),
            audio_tracks: track_languages(TrackCategory::Audio, &info.tracks),
            subtitle_tracks: distinct_track_languages(TrackCategory::Subtitle, &info.tracks),
        }
    }
}

/// Convert the given number of seconds into the millisecond resolution of the receiver.
///
/// Non-finite values are treated as zero, out of range values saturate.
pub fn seconds_to_millis(seconds: f64) -> i64 {
    if !seconds.is_finite() {
        return 0;
    }

    (seconds * 1000.0).round() as i64
}

/// Resolve the absolute seek position of the receiver.
///
/// A relative seek is offset from the current stream position, the result never goes below zero.
pub fn resolve_seek_position(current_position: Duration, interval: f64, relative: bool) -> Duration {
    let mut position = seconds_to_millis(interval);
    if relative {
        let current = i64::try_from(current_position.as_millis()).unwrap_or(i64::MAX);
        position = position.saturating_add(current);
    }

    Duration::from_millis(position.max(0) as u64)
}
