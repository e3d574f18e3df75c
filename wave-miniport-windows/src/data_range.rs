//! Reading `KSDATARANGE_AUDIO` structures the port driver passes in.

use windows::Win32::Media::KernelStreaming::KSDATARANGE_AUDIO;

use wave_miniport_core::models::format::DataRange;

use crate::guid::{from_guid, to_guid};

/// Copies a host data range into the core representation.
pub fn from_ks(range: &KSDATARANGE_AUDIO) -> DataRange {
    // SAFETY: both union arms of KSDATAFORMAT cover the same bytes; the
    // header view is always initialised by the host.
    let header = unsafe { range.DataRange.Anonymous };
    DataRange {
        major_format: from_guid(&header.MajorFormat),
        sub_format: from_guid(&header.SubFormat),
        specifier: from_guid(&header.Specifier),
        maximum_channels: range.MaximumChannels,
        minimum_bits_per_sample: range.MinimumBitsPerSample,
        maximum_bits_per_sample: range.MaximumBitsPerSample,
        minimum_sample_frequency: range.MinimumSampleFrequency,
        maximum_sample_frequency: range.MaximumSampleFrequency,
    }
}

/// Builds the host structure for one of our declared ranges.
pub fn to_ks(range: &DataRange) -> KSDATARANGE_AUDIO {
    let mut ks = KSDATARANGE_AUDIO::default();
    ks.DataRange.Anonymous.FormatSize = std::mem::size_of::<KSDATARANGE_AUDIO>() as u32;
    ks.DataRange.Anonymous.MajorFormat = to_guid(&range.major_format);
    ks.DataRange.Anonymous.SubFormat = to_guid(&range.sub_format);
    ks.DataRange.Anonymous.Specifier = to_guid(&range.specifier);
    ks.MaximumChannels = range.maximum_channels;
    ks.MinimumBitsPerSample = range.minimum_bits_per_sample;
    ks.MaximumBitsPerSample = range.maximum_bits_per_sample;
    ks.MinimumSampleFrequency = range.minimum_sample_frequency;
    ks.MaximumSampleFrequency = range.maximum_sample_frequency;
    ks
}
