//! Data-range intersection.
//!
//! Negotiates one concrete wire format from a client-proposed range and a
//! range declared by one of our pins. Pure: the only side effect of
//! [`intersect_into`] is the caller's output buffer, so the host may probe
//! for the size and then call again to fill, from any thread.

use log::{debug, trace, warn};

use crate::models::error::WaveError;
use crate::models::format::{DataRange, NegotiatedFormat, Specifier, SubFormat};
use crate::models::guids::{KSDATAFORMAT_SPECIFIER_DSOUND, KSDATAFORMAT_TYPE_AUDIO, WILDCARD};
use crate::processing::speaker_map::channel_mask_for;
use crate::processing::wire_format::{self, FormatHeader};

/// What kind of pin the intersection is run for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinRole {
    /// Accepts PCM only.
    Wave,
    /// Accepts compressed AC-3 only.
    Spdif,
}

/// A successful negotiation, before serialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intersection {
    pub header: FormatHeader,
    pub format: NegotiatedFormat,
}

impl Intersection {
    /// Exact number of bytes the serialised result occupies.
    pub fn size(&self) -> usize {
        wire_format::resultant_size(self.format.sub_format, self.format.specifier)
    }
}

/// Host-facing inputs that change how a range is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NegotiationPolicy {
    /// Vista-class hosts get the device maxima verbatim.
    pub take_device_maximum: bool,
}

/// Negotiates a format for `pin` given `capacity` bytes of output space.
///
/// A zero `capacity` is a size probe and reports `BufferOverflow` with the
/// required size; a non-zero but insufficient one reports `BufferTooSmall`.
pub fn intersect(
    pin: PinRole,
    client: &DataRange,
    device: &DataRange,
    policy: NegotiationPolicy,
    capacity: usize,
) -> Result<Intersection, WaveError> {
    if !client.is_audio_or_wildcard() {
        debug!("intersection: major format {} is neither audio nor wildcard", client.major_format);
        return Err(WaveError::NoMatch("major format is not audio".into()));
    }

    match classify_sub_format(pin, client)? {
        SubFormat::Pcm => intersect_pcm(client, device, policy, capacity),
        SubFormat::DolbyAc3Spdif => intersect_ac3(pin, client, capacity),
    }
}

/// Runs [`intersect`] with `out.len()` as capacity and serialises the result into `out`.
pub fn intersect_into(
    pin: PinRole,
    client: &DataRange,
    device: &DataRange,
    policy: NegotiationPolicy,
    out: &mut [u8],
) -> Result<usize, WaveError> {
    let result = intersect(pin, client, device, policy, out.len())?;
    wire_format::write_resultant(&result.header, &result.format, out)
}

fn classify_sub_format(pin: PinRole, client: &DataRange) -> Result<SubFormat, WaveError> {
    if client.sub_format == WILDCARD {
        // Only the compressed path accepts a wildcard; the pin check follows.
        return Ok(SubFormat::DolbyAc3Spdif);
    }
    match SubFormat::from_guid(&client.sub_format) {
        Some(SubFormat::DolbyAc3Spdif) => Ok(SubFormat::DolbyAc3Spdif),
        Some(SubFormat::Pcm) if pin == PinRole::Spdif => {
            debug!("intersection: spdif pin offered a non-AC-3 sub-format");
            Err(WaveError::NoMatch("spdif pin accepts AC-3 only".into()))
        }
        Some(SubFormat::Pcm) => Ok(SubFormat::Pcm),
        None => {
            warn!("intersection: unknown sub-format {}", client.sub_format);
            Err(WaveError::NoMatch(format!("unknown sub-format {}", client.sub_format)))
        }
    }
}

fn check_capacity(required: usize, capacity: usize) -> Result<(), WaveError> {
    if capacity == 0 {
        return Err(WaveError::BufferOverflow { required });
    }
    if capacity < required {
        debug!("intersection: buffer of {} bytes, {} needed", capacity, required);
        return Err(WaveError::BufferTooSmall { required });
    }
    Ok(())
}

fn narrow(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

fn intersect_pcm(
    client: &DataRange,
    device: &DataRange,
    policy: NegotiationPolicy,
    capacity: usize,
) -> Result<Intersection, WaveError> {
    let specifier = match Specifier::from_guid(&client.specifier) {
        Some(Specifier::WaveFormatEx) => Specifier::WaveFormatEx,
        Some(Specifier::DirectSound) => {
            trace!("intersection: DirectSound specifier");
            Specifier::DirectSound
        }
        _ => {
            warn!("intersection: unknown specifier {}", client.specifier);
            return Err(WaveError::NoMatch(format!("unknown specifier {}", client.specifier)));
        }
    };

    check_capacity(wire_format::resultant_size(SubFormat::Pcm, specifier), capacity)?;

    let (channels, rate, bits) = if policy.take_device_maximum {
        debug!(
            "intersection: client {}ch/{}Hz/{}bit vs device {}ch/{}Hz/{}bit",
            client.maximum_channels,
            client.maximum_sample_frequency,
            client.maximum_bits_per_sample,
            device.maximum_channels,
            device.maximum_sample_frequency,
            device.maximum_bits_per_sample
        );
        (
            narrow(device.maximum_channels),
            device.maximum_sample_frequency,
            narrow(device.maximum_bits_per_sample),
        )
    } else {
        (
            narrow(client.maximum_channels).min(narrow(device.maximum_channels)),
            client.maximum_sample_frequency.min(device.maximum_sample_frequency),
            narrow(client.maximum_bits_per_sample).min(narrow(device.maximum_bits_per_sample)),
        )
    };

    if channels == 0 {
        return Err(WaveError::NoMatch("no channels in common".into()));
    }
    if rate < client.minimum_sample_frequency || rate < device.minimum_sample_frequency {
        debug!("intersection: sample rate {} below minimum", rate);
        return Err(WaveError::NoMatch(format!("sample rate {} below minimum", rate)));
    }
    let bits_wide = u32::from(bits);
    if bits_wide < client.minimum_bits_per_sample || bits_wide < device.minimum_bits_per_sample {
        debug!("intersection: {} bits below minimum", bits);
        return Err(WaveError::NoMatch(format!("{} bits below minimum", bits)));
    }

    let header = FormatHeader {
        major_format: device.major_format,
        sub_format: device.sub_format,
        specifier: match specifier {
            Specifier::DirectSound => KSDATAFORMAT_SPECIFIER_DSOUND,
            _ => device.specifier,
        },
    };
    let format = NegotiatedFormat::derive(
        channels,
        rate,
        bits,
        channel_mask_for(channels).bits(),
        SubFormat::Pcm,
        specifier,
    )
    .ok_or_else(|| {
        debug!("intersection: {} channels of {} bits overflow the block alignment", channels, bits);
        WaveError::NoMatch(format!("{}ch/{}bit frame is too wide", channels, bits))
    })?;
    Ok(Intersection { header, format })
}

fn intersect_ac3(pin: PinRole, client: &DataRange, capacity: usize) -> Result<Intersection, WaveError> {
    if pin != PinRole::Spdif {
        debug!("intersection: AC-3 requested on a non-spdif pin");
        return Err(WaveError::NoMatch("AC-3 is only offered on the spdif pin".into()));
    }

    let specifier = match Specifier::from_guid(&client.specifier) {
        Some(Specifier::WaveFormatEx) | Some(Specifier::Wildcard) => Specifier::WaveFormatEx,
        Some(Specifier::DirectSound) => Specifier::DirectSound,
        None => {
            warn!("intersection: unknown AC-3 specifier {}", client.specifier);
            return Err(WaveError::NotImplemented(format!("specifier {}", client.specifier)));
        }
    };

    check_capacity(wire_format::resultant_size(SubFormat::DolbyAc3Spdif, specifier), capacity)?;

    // 48 kHz stereo 16-bit is the de facto AC-3 over SPDIF framing.
    let format = NegotiatedFormat::derive(2, 48000, 16, 0, SubFormat::DolbyAc3Spdif, specifier)
        .ok_or_else(|| WaveError::NoMatch("AC-3 frame is too wide".into()))?;
    let header = FormatHeader {
        major_format: KSDATAFORMAT_TYPE_AUDIO,
        sub_format: SubFormat::DolbyAc3Spdif.guid(),
        specifier: specifier.guid(),
    };
    debug!("intersection: native AC-3");
    Ok(Intersection { header, format })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::guids::{
        KSDATAFORMAT_SPECIFIER_WAVEFORMATEX, KSDATAFORMAT_SUBTYPE_DOLBY_AC3_SPDIF, KSDATAFORMAT_SUBTYPE_PCM,
    };
    use crate::processing::speaker_map::SpeakerMask;
    use uuid::Uuid;

    const LEGACY: NegotiationPolicy = NegotiationPolicy { take_device_maximum: false };
    const VISTA: NegotiationPolicy = NegotiationPolicy { take_device_maximum: true };

    fn device() -> DataRange {
        DataRange::pcm(8, (16, 32), (8000, 96000))
    }

    fn client(channels: u32, bits: (u32, u32), rates: (u32, u32)) -> DataRange {
        DataRange::pcm(channels, bits, rates)
    }

    #[test]
    fn legacy_takes_minimum_of_maxima() {
        let r = intersect(PinRole::Wave, &client(2, (8, 24), (8000, 48000)), &device(), LEGACY, 512).unwrap();
        assert_eq!(r.format.channels, 2);
        assert_eq!(r.format.samples_per_sec, 48000);
        assert_eq!(r.format.bits_per_sample, 24);
        assert_eq!(r.format.block_align, 6);
        assert_eq!(r.format.avg_bytes_per_sec, 288_000);
        assert_eq!(r.format.channel_mask, SpeakerMask::STEREO.bits());
        assert_eq!(r.format.sub_format, SubFormat::Pcm);
        assert_eq!(r.size(), 104);
    }

    #[test]
    fn vista_takes_device_maxima_verbatim() {
        let r = intersect(PinRole::Wave, &client(2, (16, 16), (8000, 48000)), &device(), VISTA, 512).unwrap();
        assert_eq!(r.format.channels, 8);
        assert_eq!(r.format.samples_per_sec, 96000);
        assert_eq!(r.format.bits_per_sample, 32);
        assert_eq!(r.format.channel_mask, SpeakerMask::SEVEN_POINT_ONE.bits());
    }

    #[test]
    fn negotiated_values_respect_both_minima() {
        let cases = [
            (client(2, (16, 16), (44100, 44100)), device()),
            (client(6, (8, 32), (8000, 192_000)), device()),
            (client(1, (16, 24), (22050, 48000)), DataRange::pcm(2, (16, 16), (8000, 48000))),
        ];
        for (c, d) in cases {
            let r = intersect(PinRole::Wave, &c, &d, LEGACY, 104).unwrap();
            let f = r.format;
            assert!(f.samples_per_sec >= c.minimum_sample_frequency);
            assert!(f.samples_per_sec >= d.minimum_sample_frequency);
            assert!(u32::from(f.bits_per_sample) >= c.minimum_bits_per_sample);
            assert!(u32::from(f.bits_per_sample) >= d.minimum_bits_per_sample);
            assert!(f.samples_per_sec <= c.maximum_sample_frequency.min(d.maximum_sample_frequency));
            assert_eq!(f.block_align, f.bits_per_sample * f.channels / 8);
        }
    }

    #[test]
    fn rate_below_device_minimum_is_no_match() {
        let dev = DataRange {
            minimum_sample_frequency: 22050,
            ..device()
        };
        let err = intersect(PinRole::Wave, &client(2, (16, 16), (8000, 11025)), &dev, LEGACY, 104).unwrap_err();
        assert!(matches!(err, WaveError::NoMatch(_)));
    }

    #[test]
    fn bits_below_client_minimum_is_no_match() {
        let dev = DataRange::pcm(2, (16, 16), (8000, 48000));
        let err = intersect(PinRole::Wave, &client(2, (24, 32), (8000, 48000)), &dev, LEGACY, 104).unwrap_err();
        assert!(matches!(err, WaveError::NoMatch(_)));
    }

    #[test]
    fn non_audio_major_format_is_no_match() {
        let mut c = client(2, (16, 16), (48000, 48000));
        c.major_format = Uuid::from_u128(0x1234);
        assert!(matches!(
            intersect(PinRole::Wave, &c, &device(), LEGACY, 104),
            Err(WaveError::NoMatch(_))
        ));
    }

    #[test]
    fn wildcard_major_format_is_accepted() {
        let mut c = client(2, (16, 16), (48000, 48000));
        c.major_format = WILDCARD;
        assert!(intersect(PinRole::Wave, &c, &device(), LEGACY, 104).is_ok());
    }

    #[test]
    fn unknown_sub_format_is_no_match() {
        let c = client(2, (16, 16), (48000, 48000)).with_sub_format(Uuid::from_u128(0x3));
        assert!(matches!(
            intersect(PinRole::Wave, &c, &device(), LEGACY, 104),
            Err(WaveError::NoMatch(_))
        ));
    }

    #[test]
    fn pcm_on_spdif_pin_is_no_match() {
        let c = client(2, (16, 16), (48000, 48000));
        assert!(matches!(
            intersect(PinRole::Spdif, &c, &DataRange::ac3(KSDATAFORMAT_SPECIFIER_WAVEFORMATEX), LEGACY, 104),
            Err(WaveError::NoMatch(_))
        ));
    }

    #[test]
    fn ac3_on_wave_pin_is_no_match() {
        let c = DataRange::ac3(KSDATAFORMAT_SPECIFIER_WAVEFORMATEX);
        for capacity in [0, 4, 512] {
            assert!(matches!(
                intersect(PinRole::Wave, &c, &device(), LEGACY, capacity),
                Err(WaveError::NoMatch(_))
            ));
        }
    }

    #[test]
    fn pcm_wildcard_specifier_is_no_match() {
        let c = client(2, (16, 16), (48000, 48000)).with_specifier(WILDCARD);
        assert!(matches!(
            intersect(PinRole::Wave, &c, &device(), LEGACY, 104),
            Err(WaveError::NoMatch(_))
        ));
    }

    #[test]
    fn wildcard_sub_format_takes_the_ac3_path() {
        let c = client(2, (16, 16), (48000, 48000)).with_sub_format(WILDCARD);
        for capacity in [0, 104, 512] {
            assert!(matches!(
                intersect(PinRole::Wave, &c, &device(), LEGACY, capacity),
                Err(WaveError::NoMatch(_))
            ));
        }

        let ac3 = intersect(PinRole::Spdif, &c, &device(), LEGACY, 88).unwrap();
        assert_eq!(ac3.format.sub_format, SubFormat::DolbyAc3Spdif);
    }

    #[test]
    fn spdif_always_yields_fixed_ac3_format() {
        let clients = [
            DataRange::ac3(KSDATAFORMAT_SPECIFIER_WAVEFORMATEX),
            DataRange::pcm(8, (24, 32), (96000, 192_000)).with_sub_format(KSDATAFORMAT_SUBTYPE_DOLBY_AC3_SPDIF),
            DataRange::pcm(1, (8, 8), (8000, 8000))
                .with_sub_format(WILDCARD)
                .with_specifier(WILDCARD),
        ];
        for c in clients {
            for policy in [LEGACY, VISTA] {
                let r = intersect(PinRole::Spdif, &c, &device(), policy, 128).unwrap();
                assert_eq!(r.format.channels, 2);
                assert_eq!(r.format.samples_per_sec, 48000);
                assert_eq!(r.format.bits_per_sample, 16);
                assert_eq!(r.format.block_align, 4);
                assert_eq!(r.format.avg_bytes_per_sec, 192_000);
                assert_eq!(r.header.sub_format, KSDATAFORMAT_SUBTYPE_DOLBY_AC3_SPDIF);
            }
        }
    }

    #[test]
    fn ac3_unknown_specifier_is_not_implemented() {
        let c = DataRange::ac3(Uuid::from_u128(0x77));
        assert!(matches!(
            intersect(PinRole::Spdif, &c, &device(), LEGACY, 128),
            Err(WaveError::NotImplemented(_))
        ));
    }

    #[test]
    fn zero_capacity_reports_size_without_writing() {
        let mut empty: [u8; 0] = [];
        let pcm = intersect_into(PinRole::Wave, &client(2, (16, 16), (48000, 48000)), &device(), LEGACY, &mut empty);
        assert_eq!(pcm, Err(WaveError::BufferOverflow { required: 104 }));

        let ds = client(2, (16, 16), (48000, 48000)).with_specifier(KSDATAFORMAT_SPECIFIER_DSOUND);
        assert_eq!(
            intersect(PinRole::Wave, &ds, &device(), LEGACY, 0),
            Err(WaveError::BufferOverflow { required: 112 })
        );

        let ac3 = DataRange::ac3(KSDATAFORMAT_SPECIFIER_DSOUND);
        assert_eq!(
            intersect(PinRole::Spdif, &ac3, &device(), LEGACY, 0),
            Err(WaveError::BufferOverflow { required: 96 })
        );
    }

    #[test]
    fn size_probe_precedes_range_checks() {
        // Ranges that could never match still report their size first.
        let c = client(2, (16, 16), (8000, 8000));
        let d = DataRange::pcm(2, (16, 16), (48000, 48000));
        assert_eq!(
            intersect(PinRole::Wave, &c, &d, LEGACY, 0),
            Err(WaveError::BufferOverflow { required: 104 })
        );
    }

    #[test]
    fn small_buffer_is_too_small_and_untouched() {
        let mut out = [0x11u8; 64];
        let err = intersect_into(PinRole::Wave, &client(2, (16, 16), (48000, 48000)), &device(), LEGACY, &mut out)
            .unwrap_err();
        assert_eq!(err, WaveError::BufferTooSmall { required: 104 });
        assert!(out.iter().all(|&b| b == 0x11));
    }

    #[test]
    fn dsound_header_carries_dsound_specifier() {
        let c = client(2, (16, 16), (48000, 48000)).with_specifier(KSDATAFORMAT_SPECIFIER_DSOUND);
        let mut out = [0u8; 112];
        let used = intersect_into(PinRole::Wave, &c, &device(), LEGACY, &mut out).unwrap();
        assert_eq!(used, 112);
        assert_eq!(&out[48..64], &KSDATAFORMAT_SPECIFIER_DSOUND.to_bytes_le());
        assert_eq!(&out[32..48], &KSDATAFORMAT_SUBTYPE_PCM.to_bytes_le());
    }

    #[test]
    fn oversized_channel_counts_saturate_then_default_mask() {
        let c = client(u32::MAX, (8, 8), (48000, 48000));
        let d = DataRange::pcm(u32::MAX, (8, 8), (48000, 48000));
        let r = intersect(PinRole::Wave, &c, &d, LEGACY, 104).unwrap();
        assert_eq!(r.format.channels, u16::MAX);
        assert_eq!(r.format.channel_mask, SpeakerMask::FIVE_POINT_ONE.bits());
        assert_eq!(r.format.block_align, u16::MAX);
        assert_eq!(r.format.avg_bytes_per_sec, 48000 * u32::from(u16::MAX));
    }

    #[test]
    fn frame_wider_than_block_align_is_no_match() {
        let c = client(u32::MAX, (32, 32), (48000, 48000));
        let d = DataRange::pcm(u32::MAX, (32, 32), (48000, 48000));
        assert!(matches!(
            intersect(PinRole::Wave, &c, &d, LEGACY, 104),
            Err(WaveError::NoMatch(_))
        ));
    }
}
