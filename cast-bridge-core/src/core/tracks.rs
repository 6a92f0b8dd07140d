use derive_more::Display;
use itertools::Itertools;
use log::{debug, trace};

use crate::core::media::{MediaTrack, TextTrackSubtype, TrackType};

/// The track categories which can be selected by language.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum TrackCategory {
    #[display("audio")]
    Audio,
    #[display("subtitle")]
    Subtitle,
}

impl TrackCategory {
    /// Verify if the given track belongs to this category.
    ///
    /// A subtitle is any text track, or any track with the subtitles subtype.
    pub fn matches(&self, track: &MediaTrack) -> bool {
        match self {
            TrackCategory::Audio => track.track_type == TrackType::Audio,
            TrackCategory::Subtitle => {
                track.track_type == TrackType::Text
                    || track.subtype == Some(TextTrackSubtype::Subtitles)
            }
        }
    }
}

/// Compute the new active track ids when selecting the given language for the category.
///
/// It returns `None` when the active track ids should be left untouched.
/// An empty language disables all subtitle tracks, but has no effect on audio tracks.
/// Otherwise, the first track with an exactly matching language replaces the active tracks of
/// the category, while the active ids of other categories keep their order.
pub fn select_track(
    category: TrackCategory,
    language: &str,
    tracks: &[MediaTrack],
    active_track_ids: &[i64],
) -> Option<Vec<i64>> {
    let category_ids = tracks
        .iter()
        .filter(|e| category.matches(e))
        .map(|e| e.id)
        .collect::<Vec<_>>();
    let retained = || {
        active_track_ids
            .iter()
            .filter(|id| !category_ids.contains(id))
            .cloned()
    };

    if language.is_empty() {
        return match category {
            TrackCategory::Subtitle => {
                debug!("Disabling all subtitle tracks");
                Some(retained().collect())
            }
            TrackCategory::Audio => {
                trace!("Ignoring empty audio track language");
                None
            }
        };
    }

    let track = tracks
        .iter()
        .filter(|e| category.matches(e))
        .find(|e| e.language.as_deref() == Some(language));

    match track {
        Some(track) => {
            debug!("Activating {} track {} for language {}", category, track.id, language);
            Some(retained().chain(std::iter::once(track.id)).collect())
        }
        None => {
            debug!("No {} track found for language {}", category, language);
            None
        }
    }
}

/// Returns the language of the first active track within the category, or an empty string.
pub fn active_language(
    category: TrackCategory,
    tracks: &[MediaTrack],
    active_track_ids: &[i64],
) -> String {
    tracks
        .iter()
        .filter(|e| category.matches(e))
        .find(|e| active_track_ids.contains(&e.id))
        .and_then(|e| e.language.clone())
        .unwrap_or_default()
}

/// Returns the languages of the tracks within the category in track order.
///
/// Tracks without a language are reported as `unknown`.
pub fn track_languages(category: TrackCategory, tracks: &[MediaTrack]) -> Vec<String> {
    tracks
        .iter()
        .filter(|e| category.matches(e))
        .map(|e| e.language.clone().unwrap_or_else(|| "unknown".to_string()))
        .collect()
}

/// Returns the distinct languages of the tracks within the category, keeping the first occurrence.
pub fn distinct_track_languages(category: TrackCategory, tracks: &[MediaTrack]) -> Vec<String> {
    track_languages(category, tracks)
        .into_iter()
        .unique()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: i64, track_type: TrackType, language: Option<&str>) -> MediaTrack {
        MediaTrack {
            id,
            track_type,
            subtype: None,
            language: language.map(|e| e.to_string()),
            name: None,
        }
    }

    fn tracks() -> Vec<MediaTrack> {
        vec![
            track(1, TrackType::Text, Some("fr")),
            track(2, TrackType::Text, Some("en")),
            track(5, TrackType::Audio, Some("en")),
            track(6, TrackType::Audio, Some("nl")),
            track(9, TrackType::Video, None),
        ]
    }

    #[test]
    fn test_matches() {
        let subtitle = MediaTrack {
            id: 3,
            track_type: TrackType::Video,
            subtype: Some(TextTrackSubtype::Subtitles),
            language: None,
            name: None,
        };

        assert!(TrackCategory::Subtitle.matches(&subtitle));
        assert!(TrackCategory::Subtitle.matches(&track(1, TrackType::Text, None)));
        assert!(!TrackCategory::Subtitle.matches(&track(5, TrackType::Audio, None)));
        assert!(TrackCategory::Audio.matches(&track(5, TrackType::Audio, None)));
        assert!(!TrackCategory::Audio.matches(&subtitle));
    }

    #[test]
    fn test_select_track_subtitle() {
        let result = select_track(TrackCategory::Subtitle, "fr", &tracks(), &[5]);

        assert_eq!(Some(vec![5, 1]), result);
    }

    #[test]
    fn test_select_track_replaces_category() {
        let result = select_track(TrackCategory::Subtitle, "en", &tracks(), &[1, 5]);

        assert_eq!(Some(vec![5, 2]), result);
    }

    #[test]
    fn test_select_track_idempotent() {
        let tracks = tracks();

        let first = select_track(TrackCategory::Subtitle, "fr", &tracks, &[5]).unwrap();
        let second = select_track(TrackCategory::Subtitle, "fr", &tracks, &first).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_select_track_audio_keeps_subtitles() {
        let result = select_track(TrackCategory::Audio, "nl", &tracks(), &[1, 5]);

        assert_eq!(Some(vec![1, 6]), result);
    }

    #[test]
    fn test_select_track_empty_subtitle_language() {
        let result = select_track(TrackCategory::Subtitle, "", &tracks(), &[5, 1, 2]);

        assert_eq!(Some(vec![5]), result);
    }

    #[test]
    fn test_select_track_empty_audio_language() {
        let result = select_track(TrackCategory::Audio, "", &tracks(), &[5, 1]);

        assert_eq!(None, result);
    }

    #[test]
    fn test_select_track_unknown_language() {
        let result = select_track(TrackCategory::Subtitle, "de", &tracks(), &[5]);

        assert_eq!(None, result);
    }

    #[test]
    fn test_select_track_is_case_sensitive() {
        let result = select_track(TrackCategory::Subtitle, "FR", &tracks(), &[5]);

        assert_eq!(None, result);
    }

    #[test]
    fn test_active_language() {
        let tracks = tracks();

        assert_eq!("fr", active_language(TrackCategory::Subtitle, &tracks, &[5, 1]));
        assert_eq!("en", active_language(TrackCategory::Audio, &tracks, &[5, 1]));
        assert_eq!("", active_language(TrackCategory::Subtitle, &tracks, &[5]));
        assert_eq!("", active_language(TrackCategory::Audio, &[], &[5]));
    }

    #[test]
    fn test_distinct_track_languages() {
        let tracks = vec![
            track(1, TrackType::Text, Some("fr")),
            track(2, TrackType::Text, None),
            track(3, TrackType::Text, Some("fr")),
            track(4, TrackType::Text, Some("en")),
        ];

        let result = distinct_track_languages(TrackCategory::Subtitle, &tracks);

        assert_eq!(
            vec!["fr".to_string(), "unknown".to_string(), "en".to_string()],
            result
        );
    }
}
