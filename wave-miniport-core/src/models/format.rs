use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::guids::{
    KSDATAFORMAT_SPECIFIER_DSOUND, KSDATAFORMAT_SPECIFIER_WAVEFORMATEX, KSDATAFORMAT_SUBTYPE_DOLBY_AC3_SPDIF,
    KSDATAFORMAT_SUBTYPE_PCM, KSDATAFORMAT_TYPE_AUDIO, WILDCARD,
};

/// `WAVE_FORMAT_EXTENSIBLE`.
pub const WAVE_FORMAT_EXTENSIBLE: u16 = 0xFFFE;
/// `WAVE_FORMAT_DOLBY_AC3_SPDIF`.
pub const WAVE_FORMAT_DOLBY_AC3_SPDIF: u16 = 0x0092;

/// An audio data range (`KSDATARANGE_AUDIO`), either proposed by a client or
/// declared by one of the device pins.
///
/// Immutable once handed to the intersection engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRange {
    pub major_format: Uuid,
    pub sub_format: Uuid,
    pub specifier: Uuid,
    pub maximum_channels: u32,
    pub minimum_bits_per_sample: u32,
    pub maximum_bits_per_sample: u32,
    pub minimum_sample_frequency: u32,
    pub maximum_sample_frequency: u32,
}

impl DataRange {
    /// A PCM range described with the plain wave-format specifier.
    pub const fn pcm(channels: u32, bits: (u32, u32), rates: (u32, u32)) -> Self {
        Self {
            major_format: KSDATAFORMAT_TYPE_AUDIO,
            sub_format: KSDATAFORMAT_SUBTYPE_PCM,
            specifier: KSDATAFORMAT_SPECIFIER_WAVEFORMATEX,
            maximum_channels: channels,
            minimum_bits_per_sample: bits.0,
            maximum_bits_per_sample: bits.1,
            minimum_sample_frequency: rates.0,
            maximum_sample_frequency: rates.1,
        }
    }

    /// The fixed AC-3 over SPDIF range (2ch, 16 bit, 48 kHz).
    pub const fn ac3(specifier: Uuid) -> Self {
        Self {
            major_format: KSDATAFORMAT_TYPE_AUDIO,
            sub_format: KSDATAFORMAT_SUBTYPE_DOLBY_AC3_SPDIF,
            specifier,
            maximum_channels: 2,
            minimum_bits_per_sample: 16,
            maximum_bits_per_sample: 16,
            minimum_sample_frequency: 48000,
            maximum_sample_frequency: 48000,
        }
    }

    pub fn with_specifier(mut self, specifier: Uuid) -> Self {
        self.specifier = specifier;
        self
    }

    pub fn with_sub_format(mut self, sub_format: Uuid) -> Self {
        self.sub_format = sub_format;
        self
    }

    pub fn is_audio_or_wildcard(&self) -> bool {
        self.major_format == KSDATAFORMAT_TYPE_AUDIO || self.major_format == WILDCARD
    }
}

/// Wire wrapper convention the client used to describe the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Specifier {
    WaveFormatEx,
    DirectSound,
    Wildcard,
}

impl Specifier {
    pub fn from_guid(guid: &Uuid) -> Option<Self> {
        if *guid == KSDATAFORMAT_SPECIFIER_WAVEFORMATEX {
            Some(Self::WaveFormatEx)
        } else if *guid == KSDATAFORMAT_SPECIFIER_DSOUND {
            Some(Self::DirectSound)
        } else if *guid == WILDCARD {
            Some(Self::Wildcard)
        } else {
            None
        }
    }

    pub fn guid(self) -> Uuid {
        match self {
            Self::WaveFormatEx | Self::Wildcard => KSDATAFORMAT_SPECIFIER_WAVEFORMATEX,
            Self::DirectSound => KSDATAFORMAT_SPECIFIER_DSOUND,
        }
    }
}

/// Sample encoding carried by a negotiated format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubFormat {
    Pcm,
    DolbyAc3Spdif,
}

impl SubFormat {
    pub fn guid(self) -> Uuid {
        match self {
            Self::Pcm => KSDATAFORMAT_SUBTYPE_PCM,
            Self::DolbyAc3Spdif => KSDATAFORMAT_SUBTYPE_DOLBY_AC3_SPDIF,
        }
    }

    pub fn from_guid(guid: &Uuid) -> Option<Self> {
        if *guid == KSDATAFORMAT_SUBTYPE_PCM {
            Some(Self::Pcm)
        } else if *guid == KSDATAFORMAT_SUBTYPE_DOLBY_AC3_SPDIF {
            Some(Self::DolbyAc3Spdif)
        } else {
            None
        }
    }
}

/// Concrete format produced by a successful intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiatedFormat {
    pub channels: u16,
    pub samples_per_sec: u32,
    pub bits_per_sample: u16,
    pub block_align: u16,
    pub avg_bytes_per_sec: u32,
    /// Speaker mask; zero for the non-extensible AC-3 layout.
    pub channel_mask: u32,
    pub sub_format: SubFormat,
    pub specifier: Specifier,
}

impl NegotiatedFormat {
    /// Fills the derived fields (`block_align`, `avg_bytes_per_sec`) from the base ones.
    ///
    /// `None` when the frame size does not fit a 16-bit block alignment.
    pub fn derive(
        channels: u16,
        samples_per_sec: u32,
        bits_per_sample: u16,
        channel_mask: u32,
        sub_format: SubFormat,
        specifier: Specifier,
    ) -> Option<Self> {
        let block_align = u16::try_from((u32::from(bits_per_sample) * u32::from(channels)) / 8).ok()?;
        Some(Self {
            channels,
            samples_per_sec,
            bits_per_sample,
            block_align,
            avg_bytes_per_sec: samples_per_sec.saturating_mul(u32::from(block_align)),
            channel_mask,
            sub_format,
            specifier,
        })
    }

    pub fn is_compressed(&self) -> bool {
        self.sub_format == SubFormat::DolbyAc3Spdif
    }
}

/// Stream data format as handed to stream creation (`KSDATAFORMAT` + wave format).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFormat {
    pub major_format: Uuid,
    pub wave: NegotiatedFormat,
}

impl DataFormat {
    pub fn audio(wave: NegotiatedFormat) -> Self {
        Self {
            major_format: KSDATAFORMAT_TYPE_AUDIO,
            wave,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_computes_alignment_and_rate() {
        let f = NegotiatedFormat::derive(6, 48000, 24, 0x3F, SubFormat::Pcm, Specifier::WaveFormatEx).unwrap();
        assert_eq!(f.block_align, 18);
        assert_eq!(f.avg_bytes_per_sec, 864_000);
    }

    #[test]
    fn derive_rejects_frames_wider_than_block_align() {
        assert!(NegotiatedFormat::derive(u16::MAX, 48000, 32, 0, SubFormat::Pcm, Specifier::WaveFormatEx).is_none());
        let widest = NegotiatedFormat::derive(u16::MAX, 48000, 8, 0, SubFormat::Pcm, Specifier::WaveFormatEx).unwrap();
        assert_eq!(widest.block_align, u16::MAX);
    }

    #[test]
    fn specifier_wildcard_resolves_to_waveformatex_guid() {
        let spec = Specifier::from_guid(&WILDCARD);
        assert_eq!(spec, Some(Specifier::Wildcard));
        assert_eq!(Specifier::Wildcard.guid(), KSDATAFORMAT_SPECIFIER_WAVEFORMATEX);
    }

    #[test]
    fn unknown_specifier_is_rejected() {
        assert_eq!(Specifier::from_guid(&KSDATAFORMAT_SUBTYPE_PCM), None);
    }

    #[test]
    fn ac3_range_is_fixed() {
        let range = DataRange::ac3(KSDATAFORMAT_SPECIFIER_DSOUND);
        assert_eq!(range.maximum_channels, 2);
        assert_eq!(range.maximum_sample_frequency, 48000);
        assert_eq!(SubFormat::from_guid(&range.sub_format), Some(SubFormat::DolbyAc3Spdif));
    }
}
