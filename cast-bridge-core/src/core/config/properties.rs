use std::fs;
use std::path::Path;

use derive_more::Display;
use log::{debug, trace};
use serde::Deserialize;

use crate::core::config::{ConfigError, Result};

const DEFAULT_METHOD_PREFIX: fn() -> String = || "chromeCast#".to_string();
const DEFAULT_CHANNEL_PREFIX: fn() -> String = || "cast_bridge/chromeCast_".to_string();
const DEFAULT_CONTENT_TYPE: fn() -> String = || "video/mp4".to_string();
const DEFAULT_MEDIA_ERROR_CODE: fn() -> i32 = || 100;
const DEFAULT_IMAGE_WIDTH: fn() -> u32 = || 480;
const DEFAULT_IMAGE_HEIGHT: fn() -> u32 = || 360;

/// In-between wrapper for serde to support the `bridge` root key.
#[derive(Debug, Deserialize)]
struct PropertiesWrapper {
    #[serde(default)]
    bridge: BridgeProperties,
}

/// The static properties of the cast bridge.
#[derive(Debug, Display, Clone, Deserialize, PartialEq)]
#[display(
    "method_prefix: {}, channel_prefix: {}, default_content_type: {}",
    method_prefix,
    channel_prefix,
    default_content_type
)]
pub struct BridgeProperties {
    /// The prefix of the method names exchanged with the host.
    #[serde(alias = "method-prefix", alias = "methodPrefix")]
    #[serde(default = "DEFAULT_METHOD_PREFIX")]
    pub method_prefix: String,
    /// The prefix of the host channel name, followed by the view id.
    #[serde(alias = "channel-prefix", alias = "channelPrefix")]
    #[serde(default = "DEFAULT_CHANNEL_PREFIX")]
    pub channel_prefix: String,
    /// The MIME type used when a load request doesn't specify one.
    #[serde(alias = "default-content-type", alias = "defaultContentType")]
    #[serde(default = "DEFAULT_CONTENT_TYPE")]
    pub default_content_type: String,
    /// The error code reported when the receiver media error carries no detailed code.
    #[serde(alias = "media-error-code", alias = "mediaErrorCode")]
    #[serde(default = "DEFAULT_MEDIA_ERROR_CODE")]
    pub media_error_code: i32,
    #[serde(alias = "image-width", alias = "imageWidth")]
    #[serde(default = "DEFAULT_IMAGE_WIDTH")]
    pub image_width: u32,
    #[serde(alias = "image-height", alias = "imageHeight")]
    #[serde(default = "DEFAULT_IMAGE_HEIGHT")]
    pub image_height: u32,
}

impl BridgeProperties {
    /// Parse the given YAML config data.
    ///
    /// Missing properties fallback to their default value.
    pub fn from_str(data: &str) -> Result<Self> {
        trace!("Parsing bridge config data {}", data);
        if data.trim().is_empty() {
            return Ok(Self::default());
        }

        let wrapper: PropertiesWrapper =
            serde_yaml::from_str(data).map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
        debug!("Parsed bridge properties {:?}", wrapper.bridge);
        Ok(wrapper.bridge)
    }

    /// Read and parse the YAML config file at the given path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading bridge config file {:?}", path);
        let data =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        Self::from_str(data.as_str())
    }

    /// Returns the host channel name for the given platform view id.
    pub fn channel_name(&self, view_id: i64) -> String {
        format!("{}{}", self.channel_prefix, view_id)
    }
}

impl Default for BridgeProperties {
    fn default() -> Self {
        Self {
            method_prefix: DEFAULT_METHOD_PREFIX(),
            channel_prefix: DEFAULT_CHANNEL_PREFIX(),
            default_content_type: DEFAULT_CONTENT_TYPE(),
            media_error_code: DEFAULT_MEDIA_ERROR_CODE(),
            image_width: DEFAULT_IMAGE_WIDTH(),
            image_height: DEFAULT_IMAGE_HEIGHT(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init_logger;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_from_str_empty() {
        init_logger!();

        let result = BridgeProperties::from_str("").unwrap();

        assert_eq!(BridgeProperties::default(), result);
    }

    #[test]
    fn test_from_str() {
        init_logger!();
        let data = "
bridge:
  method-prefix: castVideo#
  default_content_type: application/x-mpegurl
  media-error-code: 500";

        let result = BridgeProperties::from_str(data).unwrap();

        assert_eq!(
            BridgeProperties {
                method_prefix: "castVideo#".to_string(),
                default_content_type: "application/x-mpegurl".to_string(),
                media_error_code: 500,
                ..Default::default()
            },
            result
        );
    }

    #[test]
    fn test_from_str_invalid() {
        init_logger!();

        let result = BridgeProperties::from_str("bridge:\n  image_width: lorem");

        assert_eq!(Err(ConfigError::InvalidConfig(String::new())), result);
    }

    #[test]
    fn test_from_file() {
        init_logger!();
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("bridge.yml");
        fs::write(&path, "bridge:\n  image_width: 1280\n  image_height: 720\n").unwrap();

        let result = BridgeProperties::from_file(&path).unwrap();

        assert_eq!(1280, result.image_width);
        assert_eq!(720, result.image_height);
        assert_eq!("chromeCast#", result.method_prefix.as_str());
    }

    #[test]
    fn test_from_file_not_found() {
        init_logger!();
        let path = PathBuf::from("/tmp/cast-bridge-missing/bridge.yml");

        let result = BridgeProperties::from_file(&path);

        assert_eq!(
            Err(ConfigError::Io(
                path,
                std::io::Error::from(std::io::ErrorKind::NotFound)
            )),
            result
        );
    }

    #[test]
    fn test_channel_name() {
        let properties = BridgeProperties::default();

        let result = properties.channel_name(7);

        assert_eq!("cast_bridge/chromeCast_7", result.as_str());
    }
}
