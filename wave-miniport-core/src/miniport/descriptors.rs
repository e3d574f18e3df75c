//! Filter descriptors per wave-device slot.
//!
//! Every query starts from the same immutable templates and applies the
//! slot and hardware overlay to a fresh copy.

use crate::models::config::{AdapterCapabilities, WaveConfig};
use crate::models::descriptor::{
    Connection, DataFlow, Endpoint, FilterDescriptor, FilterKind, NodeDescriptor, NodeType, PinCommunication,
    PinDescriptor,
};
use crate::models::format::DataRange;
use crate::models::guids::{KSDATAFORMAT_SPECIFIER_DSOUND, KSDATAFORMAT_SPECIFIER_WAVEFORMATEX};
use crate::registry::slot_table::WaveSlot;

pub const PIN_WAVE_OUT: u32 = 0;
pub const PIN_WAVE_OUT_BRIDGE: u32 = 1;
pub const PIN_WAVE_IN: u32 = 2;
pub const PIN_WAVE_IN_BRIDGE: u32 = 3;
pub const PIN_SPDIF: u32 = 4;
pub const PIN_SPDIF_BRIDGE: u32 = 5;

pub const NODE_SUPERMIX: u32 = 0;
pub const NODE_VOLUME1: u32 = 1;
pub const NODE_VOLUME2: u32 = 2;
pub const NODE_SUM: u32 = 3;
pub const NODE_ADC: u32 = 4;
pub const NODE_SPDIF: u32 = 5;

const PLAYBACK_MIN: DataRange = DataRange::pcm(2, (16, 16), (48000, 48000));
const PLAYBACK_HIFI: DataRange = DataRange::pcm(2, (16, 32), (8000, 192_000));
const PLAYBACK_MULTICHANNEL_8: DataRange = DataRange::pcm(8, (16, 32), (48000, 48000));
const PLAYBACK_MULTICHANNEL_6: DataRange = DataRange::pcm(6, (16, 32), (48000, 48000));

const CAPTURE_RANGES: [DataRange; 5] = [
    DataRange::pcm(2, (16, 16), (48000, 48000)),
    DataRange::pcm(2, (16, 16), (96000, 96000)),
    DataRange::pcm(2, (16, 16), (44100, 44100)),
    DataRange::pcm(2, (16, 16), (8000, 48000)),
    DataRange::pcm(2, (16, 32), (8000, 192_000)),
];

const SPDIF_RANGES: [DataRange; 3] = [
    DataRange::ac3(KSDATAFORMAT_SPECIFIER_WAVEFORMATEX),
    DataRange::ac3(KSDATAFORMAT_SPECIFIER_DSOUND),
    DataRange::pcm(2, (16, 16), (48000, 48000)),
];

/// Playback ranges the HiFi render pin declares before any overlay.
///
/// Vista-class hosts get the multichannel ranges ahead of the stereo ones.
fn hifi_playback_ranges(caps: &AdapterCapabilities) -> Vec<DataRange> {
    if caps.is_vista {
        vec![PLAYBACK_MULTICHANNEL_8, PLAYBACK_MULTICHANNEL_6, PLAYBACK_MIN, PLAYBACK_HIFI]
    } else {
        vec![PLAYBACK_MIN, PLAYBACK_HIFI]
    }
}

fn pin(name: &'static str, data_flow: DataFlow, communication: PinCommunication, ranges: Vec<DataRange>) -> PinDescriptor {
    PinDescriptor {
        name,
        data_flow,
        communication,
        data_ranges: ranges,
    }
}

fn node(node_type: NodeType, name: &'static str) -> NodeDescriptor {
    NodeDescriptor { node_type, name }
}

fn connect(from: Endpoint, to: Endpoint) -> Connection {
    Connection { from, to }
}

/// The render chain every slot shares: pin 0 → supermix → vol → vol → sum → bridge.
fn render_connections() -> Vec<Connection> {
    vec![
        connect(Endpoint::filter_pin(PIN_WAVE_OUT), Endpoint::node_in(NODE_SUPERMIX)),
        connect(Endpoint::node_out(NODE_SUPERMIX), Endpoint::node_in(NODE_VOLUME1)),
        connect(Endpoint::node_out(NODE_VOLUME1), Endpoint::node_in(NODE_VOLUME2)),
        connect(Endpoint::node_out(NODE_VOLUME2), Endpoint::node_in(NODE_SUM)),
        connect(Endpoint::node_out(NODE_SUM), Endpoint::filter_pin(PIN_WAVE_OUT_BRIDGE)),
    ]
}

fn render_nodes(slot: WaveSlot) -> Vec<NodeDescriptor> {
    let (out, volume) = match slot.index() {
        1 => ("Wave Out 2/3", "Wave Out 2/3 Volume"),
        2 => ("Wave Out 4/5", "Wave Out 4/5 Volume"),
        3 => ("Wave Out 6/7", "Wave Out 6/7 Volume"),
        _ => ("Wave Out", "Wave Out Volume"),
    };
    vec![
        node(NodeType::Supermix, out),
        node(NodeType::Volume, volume),
        node(NodeType::Volume, "Wave Out Master"),
        node(NodeType::Sum, out),
    ]
}

fn hifi_filter(caps: &AdapterCapabilities, config: &WaveConfig) -> FilterDescriptor {
    let mut playback = hifi_playback_ranges(caps);
    let mut capture = CAPTURE_RANGES.to_vec();
    let mut spdif = SPDIF_RANGES.to_vec();

    if caps.is_vista {
        capture.truncate(config.vista_capture_range_limit);
    } else {
        spdif.truncate(config.legacy_spdif_range_count);
    }
    if !caps.is_10k2 {
        let multichannel = [PLAYBACK_MULTICHANNEL_8, PLAYBACK_MULTICHANNEL_6];
        for range in playback.iter_mut().filter(|r| multichannel.contains(&**r)) {
            range.maximum_bits_per_sample = range.maximum_bits_per_sample.min(config.legacy_chip_max_bits);
            range.minimum_bits_per_sample = range.minimum_bits_per_sample.min(range.maximum_bits_per_sample);
        }
    }

    let mut nodes = render_nodes(WaveSlot::HIFI);
    nodes.push(node(NodeType::Adc, "Wave In"));
    nodes.push(node(NodeType::SpdifInterface, "SPDIF Out"));

    let mut connections = render_connections();
    connections.extend([
        connect(Endpoint::filter_pin(PIN_WAVE_IN_BRIDGE), Endpoint::node_in(NODE_ADC)),
        connect(Endpoint::node_out(NODE_ADC), Endpoint::filter_pin(PIN_WAVE_IN)),
        connect(Endpoint::filter_pin(PIN_SPDIF), Endpoint::node_in(NODE_SPDIF)),
        connect(Endpoint::node_out(NODE_SPDIF), Endpoint::filter_pin(PIN_SPDIF_BRIDGE)),
    ]);

    FilterDescriptor {
        kind: FilterKind::HiFi,
        pins: vec![
            pin("Wave Out", DataFlow::In, PinCommunication::Sink, playback),
            pin("Wave Out Bridge", DataFlow::Out, PinCommunication::Bridge, Vec::new()),
            pin("Wave In", DataFlow::Out, PinCommunication::Sink, capture),
            pin("Wave In Bridge", DataFlow::In, PinCommunication::Bridge, Vec::new()),
            pin("SPDIF Out", DataFlow::In, PinCommunication::Sink, spdif),
            pin("SPDIF Bridge", DataFlow::Out, PinCommunication::Bridge, Vec::new()),
        ],
        nodes,
        connections,
    }
}

fn output_pair_filter(slot: WaveSlot, caps: &AdapterCapabilities) -> FilterDescriptor {
    let playback = if caps.is_vista {
        vec![PLAYBACK_MIN]
    } else {
        vec![PLAYBACK_MIN, PLAYBACK_HIFI]
    };
    FilterDescriptor {
        kind: FilterKind::OutputPair,
        pins: vec![
            pin("Wave Out", DataFlow::In, PinCommunication::Sink, playback),
            pin("Wave Out Bridge", DataFlow::Out, PinCommunication::Bridge, Vec::new()),
        ],
        nodes: render_nodes(slot),
        connections: render_connections(),
    }
}

/// Descriptor for the device in `slot` on hardware reporting `caps`.
pub fn filter_descriptor(slot: WaveSlot, caps: &AdapterCapabilities, config: &WaveConfig) -> FilterDescriptor {
    if slot.is_hifi() {
        hifi_filter(caps, config)
    } else {
        output_pair_filter(slot, caps)
    }
}

/// Streaming pins of `slot` with their instance limits.
pub fn streaming_pin_limits(slot: WaveSlot, config: &WaveConfig) -> Vec<(u32, u32)> {
    if slot.is_hifi() {
        vec![
            (PIN_WAVE_OUT, config.max_playback_instances),
            (PIN_WAVE_IN, config.max_capture_instances),
            (PIN_SPDIF, config.max_spdif_instances),
        ]
    } else {
        vec![(PIN_WAVE_OUT, config.max_playback_instances)]
    }
}
