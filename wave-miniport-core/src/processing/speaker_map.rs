use bitflags::bitflags;

bitflags! {
    /// `SPEAKER_*` positions of a `WAVEFORMATEXTENSIBLE` channel mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SpeakerMask: u32 {
        const FRONT_LEFT = 0x0001;
        const FRONT_RIGHT = 0x0002;
        const FRONT_CENTER = 0x0004;
        const LOW_FREQUENCY = 0x0008;
        const BACK_LEFT = 0x0010;
        const BACK_RIGHT = 0x0020;
        const FRONT_LEFT_OF_CENTER = 0x0040;
        const FRONT_RIGHT_OF_CENTER = 0x0080;
        const BACK_CENTER = 0x0100;
        const SIDE_LEFT = 0x0200;
        const SIDE_RIGHT = 0x0400;

        const MONO = Self::FRONT_CENTER.bits();
        const STEREO = Self::FRONT_LEFT.bits() | Self::FRONT_RIGHT.bits();
        const QUAD = Self::STEREO.bits() | Self::BACK_LEFT.bits() | Self::BACK_RIGHT.bits();
        const SURROUND = Self::STEREO.bits() | Self::FRONT_CENTER.bits() | Self::BACK_CENTER.bits();
        const FIVE_POINT_ONE = Self::STEREO.bits()
            | Self::FRONT_CENTER.bits()
            | Self::LOW_FREQUENCY.bits()
            | Self::BACK_LEFT.bits()
            | Self::BACK_RIGHT.bits();
        const SEVEN_POINT_ONE = Self::FIVE_POINT_ONE.bits()
            | Self::FRONT_LEFT_OF_CENTER.bits()
            | Self::FRONT_RIGHT_OF_CENTER.bits();
    }
}

/// `KSAUDIO_STEREO_SPEAKER_GEOMETRY_WIDE`: the only geometry the card reports.
pub const STEREO_SPEAKER_GEOMETRY_WIDE: i32 = 20;

/// Canonical speaker layout for a channel count.
///
/// Unlisted counts (0, or more than 8) fall back to 5.1.
pub fn channel_mask_for(channels: u16) -> SpeakerMask {
    match channels {
        1 => SpeakerMask::MONO,
        2 => SpeakerMask::STEREO,
        3 => SpeakerMask::STEREO | SpeakerMask::FRONT_CENTER,
        4 => SpeakerMask::QUAD,
        5 => SpeakerMask::SURROUND | SpeakerMask::LOW_FREQUENCY,
        7 => SpeakerMask::FIVE_POINT_ONE | SpeakerMask::BACK_CENTER,
        8 => SpeakerMask::SEVEN_POINT_ONE,
        _ => SpeakerMask::FIVE_POINT_ONE,
    }
}

/// Output layout the card reports through the channel-configuration property.
pub fn output_configuration(extended_channels: bool) -> SpeakerMask {
    if extended_channels {
        SpeakerMask::SEVEN_POINT_ONE
    } else {
        SpeakerMask::FIVE_POINT_ONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_values() {
        assert_eq!(SpeakerMask::STEREO.bits(), 0x3);
        assert_eq!(SpeakerMask::QUAD.bits(), 0x33);
        assert_eq!(SpeakerMask::SURROUND.bits(), 0x107);
        assert_eq!(SpeakerMask::FIVE_POINT_ONE.bits(), 0x3F);
        assert_eq!(SpeakerMask::SEVEN_POINT_ONE.bits(), 0xFF);
    }

    #[test]
    fn mapping_table() {
        assert_eq!(channel_mask_for(1), SpeakerMask::MONO);
        assert_eq!(channel_mask_for(2), SpeakerMask::STEREO);
        assert_eq!(channel_mask_for(3).bits(), 0x7);
        assert_eq!(channel_mask_for(5).bits(), 0x10F);
        assert_eq!(channel_mask_for(6), SpeakerMask::FIVE_POINT_ONE);
        assert_eq!(channel_mask_for(7).bits(), 0x13F);
        assert_eq!(channel_mask_for(8), SpeakerMask::SEVEN_POINT_ONE);
    }

    #[test]
    fn unmapped_counts_default_to_five_one() {
        for channels in [0u16, 9, 16, u16::MAX] {
            assert_eq!(channel_mask_for(channels), SpeakerMask::FIVE_POINT_ONE);
        }
    }

    #[test]
    fn output_configuration_follows_chip_variant() {
        assert_eq!(output_configuration(true), SpeakerMask::SEVEN_POINT_ONE);
        assert_eq!(output_configuration(false), SpeakerMask::FIVE_POINT_ONE);
    }
}
