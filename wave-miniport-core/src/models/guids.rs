//! Kernel-streaming GUIDs used during format negotiation and property dispatch.
//!
//! Values are stored in their canonical textual order; use
//! [`Uuid::to_bytes_le`] when laying them out in a host structure.

use uuid::Uuid;

/// `KSDATAFORMAT_TYPE_WILDCARD`; also the sub-format and specifier wildcard.
pub const WILDCARD: Uuid = Uuid::nil();

pub const KSDATAFORMAT_TYPE_AUDIO: Uuid = Uuid::from_u128(0x73647561_0000_0010_8000_00aa00389b71);

pub const KSDATAFORMAT_SUBTYPE_PCM: Uuid = Uuid::from_u128(0x00000001_0000_0010_8000_00aa00389b71);

pub const KSDATAFORMAT_SUBTYPE_DOLBY_AC3_SPDIF: Uuid =
    Uuid::from_u128(0x00000092_0000_0010_8000_00aa00389b71);

pub const KSDATAFORMAT_SPECIFIER_WAVEFORMATEX: Uuid =
    Uuid::from_u128(0x05589f81_c356_11ce_bf01_00aa0055595a);

pub const KSDATAFORMAT_SPECIFIER_DSOUND: Uuid = Uuid::from_u128(0x518590a2_a184_11d0_8522_00c04fd9baf3);

pub const KSPROPTYPESETID_GENERAL: Uuid = Uuid::from_u128(0x97e99ba0_bdea_11cf_a5d6_28db04c10000);

/// `VT_I4`, the variant type advertised by every `LONG`-valued property here.
pub const VT_I4: u32 = 3;
/// `VT_UI4`, used by the sampling-rate property.
pub const VT_UI4: u32 = 19;

/// Builds the sub-format GUID derived from a legacy `WAVE_FORMAT_*` tag.
pub const fn subformat_from_wave_tag(tag: u16) -> Uuid {
    Uuid::from_u128(((tag as u128) << 96) | 0x0000_0010_8000_00aa00389b71)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wave_tag_guids_match_table() {
        assert_eq!(subformat_from_wave_tag(0x0001), KSDATAFORMAT_SUBTYPE_PCM);
        assert_eq!(subformat_from_wave_tag(0x0092), KSDATAFORMAT_SUBTYPE_DOLBY_AC3_SPDIF);
    }

    #[test]
    fn audio_major_format_text() {
        assert_eq!(
            KSDATAFORMAT_TYPE_AUDIO.to_string(),
            "73647561-0000-0010-8000-00aa00389b71"
        );
    }

    #[test]
    fn little_endian_layout_swaps_first_three_fields() {
        let bytes = KSDATAFORMAT_SUBTYPE_PCM.to_bytes_le();
        assert_eq!(&bytes[0..4], &[1, 0, 0, 0]);
        assert_eq!(&bytes[6..8], &[0x10, 0x00]);
        assert_eq!(&bytes[8..10], &[0x80, 0x00]);
    }
}
