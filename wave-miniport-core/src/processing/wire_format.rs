//! Host wire layout of negotiated formats.
//!
//! Lays out `KSDATAFORMAT` followed by the wave format block, little-endian,
//! in the exact shape the kernel-streaming host reads back.
//!
//! ```text
//! KSDATAFORMAT (64 bytes)
//! [0-3]    FormatSize          [16-31]  MajorFormat
//! [4-7]    Flags (0)           [32-47]  SubFormat
//! [8-11]   SampleSize          [48-63]  Specifier
//! [12-15]  Reserved (0)
//!
//! WAVEFORMATEX (18 bytes)           WAVEFORMATEXTENSIBLE (40 bytes)
//! [0-1]   wFormatTag                [0-17]   WAVEFORMATEX
//! [2-3]   nChannels                 [18-19]  wValidBitsPerSample
//! [4-7]   nSamplesPerSec            [20-23]  dwChannelMask
//! [8-11]  nAvgBytesPerSec           [24-39]  SubFormat
//! [12-13] nBlockAlign
//! [14-15] wBitsPerSample
//! [16-17] cbSize
//! ```
//!
//! The DirectSound-wrapped variants insert an 8-byte buffer description
//! (`Flags`, `Control`, both zero) between the two blocks.

use uuid::Uuid;

use crate::models::error::WaveError;
use crate::models::format::{NegotiatedFormat, Specifier, SubFormat, WAVE_FORMAT_DOLBY_AC3_SPDIF, WAVE_FORMAT_EXTENSIBLE};

pub const KSDATAFORMAT_SIZE: usize = 64;
pub const WAVEFORMATEX_SIZE: usize = 18;
pub const WAVEFORMATEXTENSIBLE_SIZE: usize = 40;
pub const DSOUND_BUFFERDESC_HEADER_SIZE: usize = 8;

/// `cbSize` of an extensible wave format.
const EXTENSIBLE_EXTRA_SIZE: u16 = 22;
/// `KSDATAFORMAT` carries a `LONGLONG` alignment member.
const KSDATAFORMAT_ALIGN: usize = 8;

const fn align_up(size: usize, align: usize) -> usize {
    (size + align - 1) & !(align - 1)
}

/// GUID triple at the head of a `KSDATAFORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatHeader {
    pub major_format: Uuid,
    pub sub_format: Uuid,
    pub specifier: Uuid,
}

/// Bytes the host must provide for a resultant format of this shape.
pub fn resultant_size(sub_format: SubFormat, specifier: Specifier) -> usize {
    match (sub_format, specifier) {
        (SubFormat::Pcm, Specifier::DirectSound) => {
            KSDATAFORMAT_SIZE + WAVEFORMATEXTENSIBLE_SIZE + DSOUND_BUFFERDESC_HEADER_SIZE
        }
        (SubFormat::Pcm, _) => KSDATAFORMAT_SIZE + WAVEFORMATEXTENSIBLE_SIZE,
        (SubFormat::DolbyAc3Spdif, Specifier::DirectSound) => align_up(
            KSDATAFORMAT_SIZE + DSOUND_BUFFERDESC_HEADER_SIZE + WAVEFORMATEX_SIZE,
            KSDATAFORMAT_ALIGN,
        ),
        (SubFormat::DolbyAc3Spdif, _) => align_up(KSDATAFORMAT_SIZE + WAVEFORMATEX_SIZE, KSDATAFORMAT_ALIGN),
    }
}

/// Serialises `format` behind `header` into `out`, returning the bytes used.
///
/// Fails with `BufferTooSmall` before touching `out` when it cannot hold the result.
pub fn write_resultant(header: &FormatHeader, format: &NegotiatedFormat, out: &mut [u8]) -> Result<usize, WaveError> {
    let size = resultant_size(format.sub_format, format.specifier);
    if out.len() < size {
        return Err(WaveError::BufferTooSmall { required: size });
    }
    let out = &mut out[..size];
    out.fill(0);

    let sample_size = match format.sub_format {
        SubFormat::Pcm => u32::from(format.block_align),
        SubFormat::DolbyAc3Spdif => 4,
    };
    write_ksdataformat(out, size as u32, sample_size, header);

    let mut offset = KSDATAFORMAT_SIZE;
    if format.specifier == Specifier::DirectSound {
        // KSDSOUND_BUFFERDESC Flags and Control stay zero: DirectSound
        // capabilities are not expressed through KS.
        offset += DSOUND_BUFFERDESC_HEADER_SIZE;
    }

    match format.sub_format {
        SubFormat::Pcm => write_wave_format_extensible(&mut out[offset..], format),
        SubFormat::DolbyAc3Spdif => write_wave_format_ex(&mut out[offset..], WAVE_FORMAT_DOLBY_AC3_SPDIF, 0, format),
    }

    Ok(size)
}

fn write_ksdataformat(out: &mut [u8], format_size: u32, sample_size: u32, header: &FormatHeader) {
    out[0..4].copy_from_slice(&format_size.to_le_bytes());
    out[4..8].copy_from_slice(&0u32.to_le_bytes());
    out[8..12].copy_from_slice(&sample_size.to_le_bytes());
    out[12..16].copy_from_slice(&0u32.to_le_bytes());
    out[16..32].copy_from_slice(&header.major_format.to_bytes_le());
    out[32..48].copy_from_slice(&header.sub_format.to_bytes_le());
    out[48..64].copy_from_slice(&header.specifier.to_bytes_le());
}

fn write_wave_format_ex(out: &mut [u8], tag: u16, cb_size: u16, format: &NegotiatedFormat) {
    out[0..2].copy_from_slice(&tag.to_le_bytes());
    out[2..4].copy_from_slice(&format.channels.to_le_bytes());
    out[4..8].copy_from_slice(&format.samples_per_sec.to_le_bytes());
    out[8..12].copy_from_slice(&format.avg_bytes_per_sec.to_le_bytes());
    out[12..14].copy_from_slice(&format.block_align.to_le_bytes());
    out[14..16].copy_from_slice(&format.bits_per_sample.to_le_bytes());
    out[16..18].copy_from_slice(&cb_size.to_le_bytes());
}

fn write_wave_format_extensible(out: &mut [u8], format: &NegotiatedFormat) {
    write_wave_format_ex(out, WAVE_FORMAT_EXTENSIBLE, EXTENSIBLE_EXTRA_SIZE, format);
    // Valid bits always equal the container size here.
    out[18..20].copy_from_slice(&format.bits_per_sample.to_le_bytes());
    out[20..24].copy_from_slice(&format.channel_mask.to_le_bytes());
    out[24..40].copy_from_slice(&format.sub_format.guid().to_bytes_le());
}
