use serde::Serialize;

use super::format::DataRange;

/// Direction of data relative to the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataFlow {
    /// Data enters the filter (render).
    In,
    /// Data leaves the filter (capture).
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PinCommunication {
    /// Streaming pin a client can instantiate.
    Sink,
    /// Topology-only connection to the mixer filter.
    Bridge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinDescriptor {
    pub name: &'static str,
    pub data_flow: DataFlow,
    pub communication: PinCommunication,
    pub data_ranges: Vec<DataRange>,
}

impl PinDescriptor {
    pub fn is_streaming(&self) -> bool {
        self.communication == PinCommunication::Sink
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeType {
    Supermix,
    Volume,
    Sum,
    Adc,
    SpdifInterface,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDescriptor {
    pub node_type: NodeType,
    pub name: &'static str,
}

/// One end of a topology connection: a filter pin when `node` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub node: Option<u32>,
    pub pin: u32,
}

impl Endpoint {
    pub const fn filter_pin(pin: u32) -> Self {
        Self { node: None, pin }
    }

    /// Node endpoints use pin 1 for input and 0 for output, as KS does.
    pub const fn node_in(node: u32) -> Self {
        Self { node: Some(node), pin: 1 }
    }

    pub const fn node_out(node: u32) -> Self {
        Self { node: Some(node), pin: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub from: Endpoint,
    pub to: Endpoint,
}

/// Which physical wave device a descriptor describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FilterKind {
    /// Slot 0: capture, multichannel playback, SPDIF/AC-3.
    HiFi,
    /// Slots 1..3: a single multichannel output pair.
    OutputPair,
}

/// Filter, pin and topology description handed to the host.
///
/// Always an owned value computed for one query; nothing the host does with
/// it can affect another miniport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterDescriptor {
    pub kind: FilterKind,
    pub pins: Vec<PinDescriptor>,
    pub nodes: Vec<NodeDescriptor>,
    pub connections: Vec<Connection>,
}

impl FilterDescriptor {
    pub fn pin(&self, pin_id: u32) -> Option<&PinDescriptor> {
        self.pins.get(pin_id as usize)
    }

    pub fn node(&self, node_id: u32) -> Option<&NodeDescriptor> {
        self.nodes.get(node_id as usize)
    }
}
