//! Media helpers: aspect ratios, narration voices, WAV packaging and data URLs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use vignette_error::{MusicError, MusicErrorKind};

/// Empty 44.1 kHz mono WAV returned by the simulated music generator.
pub const SILENT_WAV_DATA_URL: &str =
    "data:audio/wav;base64,UklGRiQAAABXQVZFZm10IBAAAAABAAEARKwAAIhYAQACABAAZGF0YQAAAAA=";

/// Output aspect ratio for generated images and video.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum AspectRatio {
    /// Square
    #[serde(rename = "1:1")]
    #[strum(serialize = "1:1")]
    Square,
    /// Widescreen landscape
    #[default]
    #[serde(rename = "16:9")]
    #[strum(serialize = "16:9")]
    Landscape,
    /// Vertical
    #[serde(rename = "9:16")]
    #[strum(serialize = "9:16")]
    Portrait,
    /// Classic landscape
    #[serde(rename = "4:3")]
    #[strum(serialize = "4:3")]
    Standard,
    /// Classic portrait
    #[serde(rename = "3:4")]
    #[strum(serialize = "3:4")]
    StandardPortrait,
}

/// Prebuilt narration voices offered by the speech model.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[allow(missing_docs)]
pub enum Voice {
    Zephyr,
    #[default]
    Puck,
    Charon,
    Kore,
    Fenrir,
    Leda,
    Orus,
    Aoede,
    Callirrhoe,
    Autonoe,
    Enceladus,
    Iapetus,
    Umbriel,
    Algieba,
    Despina,
    Erinome,
    Algenib,
    Rasalgethi,
    Laomedeia,
    Achernar,
    Alnilam,
    Schedar,
    Gacrux,
    Pulcherrima,
    Achird,
    Zubenelgenubi,
    Vindemiatrix,
    Sadachbia,
    Sadaltager,
    Sulafat,
}

/// Layout of raw little-endian PCM samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_getters::Getters)]
pub struct PcmFormat {
    sample_rate: u32,
    channels: u16,
    bits_per_sample: u16,
}

impl PcmFormat {
    /// Speech synthesis output: 24 kHz mono 16-bit.
    pub const SPEECH: PcmFormat = PcmFormat::new(24_000, 1, 16);

    /// Live music output: 48 kHz stereo 16-bit.
    pub const MUSIC: PcmFormat = PcmFormat::new(48_000, 2, 16);

    /// Describe a PCM layout.
    pub const fn new(sample_rate: u32, channels: u16, bits_per_sample: u16) -> Self {
        Self {
            sample_rate,
            channels,
            bits_per_sample,
        }
    }

    fn block_align(&self) -> u16 {
        self.channels * self.bits_per_sample / 8
    }

    fn byte_rate(&self) -> u32 {
        self.sample_rate * u32::from(self.block_align())
    }
}

/// Wrap raw PCM in a canonical 44-byte RIFF/WAVE header.
///
/// # Errors
///
/// Fails when the payload is too large for the 32-bit RIFF size fields.
///
/// # Examples
///
/// ```
/// use vignette_core::{PcmFormat, encode_wav};
///
/// let wav = encode_wav(&[0, 0, 1, 0], PcmFormat::SPEECH).unwrap();
/// assert_eq!(&wav[0..4], b"RIFF");
/// assert_eq!(wav.len(), 48);
/// ```
#[track_caller]
pub fn encode_wav(pcm: &[u8], format: PcmFormat) -> Result<Vec<u8>, MusicError> {
    let data_len = u32::try_from(pcm.len())
        .ok()
        .filter(|len| *len <= u32::MAX - 36)
        .ok_or_else(|| {
            MusicError::new(MusicErrorKind::Encoding(format!(
                "{} bytes exceeds the WAV size limit",
                pcm.len()
            )))
        })?;

    let mut wav = Vec::with_capacity(44 + pcm.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&format.channels.to_le_bytes());
    wav.extend_from_slice(&format.sample_rate.to_le_bytes());
    wav.extend_from_slice(&format.byte_rate().to_le_bytes());
    wav.extend_from_slice(&format.block_align().to_le_bytes());
    wav.extend_from_slice(&format.bits_per_sample.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.extend_from_slice(pcm);
    Ok(wav)
}

/// Encode bytes as a base64 `data:` URL.
pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Package raw PCM as a `data:audio/wav;base64,…` URL.
#[track_caller]
pub fn wav_data_url(pcm: &[u8], format: PcmFormat) -> Result<String, MusicError> {
    Ok(data_url("audio/wav", &encode_wav(pcm, format)?))
}

/// Split a base64 `data:` URL into its MIME type and decoded bytes.
///
/// Returns `None` for remote URIs or malformed payloads.
pub fn decode_data_url(url: &str) -> Option<(String, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime_type = header.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload).ok()?;
    Some((mime_type.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn empty_wav_matches_silent_constant() {
        let url = wav_data_url(&[], PcmFormat::new(44_100, 1, 16)).unwrap();
        assert_eq!(url, SILENT_WAV_DATA_URL);
    }

    #[test]
    fn music_header_describes_stereo_48k() {
        let wav = encode_wav(&[1, 2, 3, 4], PcmFormat::MUSIC).unwrap();
        assert_eq!(u16::from_le_bytes([wav[22], wav[23]]), 2);
        assert_eq!(
            u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]),
            48_000
        );
        assert_eq!(
            u32::from_le_bytes([wav[28], wav[29], wav[30], wav[31]]),
            192_000
        );
        assert_eq!(
            u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]),
            4
        );
        assert_eq!(&wav[44..], &[1, 2, 3, 4]);
    }

    #[test]
    fn data_url_survives_decoding() {
        let url = data_url("image/jpeg", b"\xff\xd8jpeg");
        assert!(url.starts_with("data:image/jpeg;base64,"));
        let (mime, bytes) = decode_data_url(&url).unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes, b"\xff\xd8jpeg");
        assert!(decode_data_url("https://example.com/video.mp4").is_none());
    }

    #[test]
    fn thirty_voices_default_puck() {
        assert_eq!(Voice::iter().count(), 30);
        assert_eq!(Voice::default(), Voice::Puck);
        assert_eq!(Voice::from_str("Sulafat").ok(), Some(Voice::Sulafat));
    }

    #[test]
    fn aspect_ratio_wire_names() {
        assert_eq!(AspectRatio::default().to_string(), "16:9");
        assert_eq!(AspectRatio::from_str("9:16").ok(), Some(AspectRatio::Portrait));
        assert_eq!(
            serde_json::to_string(&AspectRatio::Standard).unwrap(),
            "\"4:3\""
        );
    }
}
