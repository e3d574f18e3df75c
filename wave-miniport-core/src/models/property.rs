use bitflags::bitflags;
use uuid::Uuid;

use super::error::WaveError;
use crate::stream::WaveStream;

bitflags! {
    /// `KSPROPERTY_TYPE_*` verb bits carried by a property request.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PropertyVerb: u32 {
        const GET = 0x0000_0001;
        const SET = 0x0000_0002;
        const BASICSUPPORT = 0x0000_0200;
    }
}

/// Properties routed to the wave miniport by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyId {
    ChannelConfig,
    CpuResources,
    SpeakerGeometry,
    SamplingRate,
    VolumeLevel,
    MixLevelTable,
    MixLevelCaps,
    /// Vendor-private property set; the id is opaque to the miniport.
    Private(u32),
}

/// Size of `KSPROPERTY_DESCRIPTION`.
pub const PROPERTY_DESCRIPTION_SIZE: usize = 40;

/// `KSPROPERTY_DESCRIPTION` as returned for BASICSUPPORT queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDescription {
    pub access_flags: PropertyVerb,
    pub prop_type_set: Uuid,
    pub prop_type_id: u32,
    pub members_list_count: u32,
}

impl PropertyDescription {
    pub fn to_bytes(&self) -> [u8; PROPERTY_DESCRIPTION_SIZE] {
        let mut out = [0u8; PROPERTY_DESCRIPTION_SIZE];
        out[0..4].copy_from_slice(&self.access_flags.bits().to_le_bytes());
        out[4..8].copy_from_slice(&(PROPERTY_DESCRIPTION_SIZE as u32).to_le_bytes());
        out[8..24].copy_from_slice(&self.prop_type_set.to_bytes_le());
        out[24..28].copy_from_slice(&self.prop_type_id.to_le_bytes());
        // [28..32] PropTypeSet.Flags, always 0
        out[32..36].copy_from_slice(&self.members_list_count.to_le_bytes());
        // [36..40] Reserved
        out
    }
}

/// One property call from the host.
///
/// `value_size` starts out as the advertised buffer size and is rewritten
/// to the number of bytes actually produced on success. Handlers never
/// touch `value` on a failure path.
pub struct PropertyRequest<'a> {
    pub id: PropertyId,
    pub verb: PropertyVerb,
    pub node: Option<u32>,
    pub channel: Option<u32>,
    pub minor_target: Option<&'a WaveStream>,
    pub value: &'a mut [u8],
    pub value_size: usize,
}

impl<'a> PropertyRequest<'a> {
    pub fn new(id: PropertyId, verb: PropertyVerb, value: &'a mut [u8]) -> Self {
        let value_size = value.len();
        Self {
            id,
            verb,
            node: None,
            channel: None,
            minor_target: None,
            value,
            value_size,
        }
    }

    pub fn on_node(mut self, node: u32) -> Self {
        self.node = Some(node);
        self
    }

    pub fn on_channel(mut self, channel: u32) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn targeting(mut self, stream: &'a WaveStream) -> Self {
        self.minor_target = Some(stream);
        self
    }

    /// Overrides the advertised size (must not exceed the backing buffer).
    pub fn with_value_size(mut self, value_size: usize) -> Self {
        self.value_size = value_size;
        self
    }

    /// Advertised size, checked against the real buffer.
    pub fn advertised(&self) -> Result<usize, WaveError> {
        if self.value_size > self.value.len() {
            return Err(WaveError::InvalidParameter(format!(
                "advertised value size {} exceeds buffer of {}",
                self.value_size,
                self.value.len()
            )));
        }
        Ok(self.value_size)
    }

    pub fn require(&self, needed: usize) -> Result<(), WaveError> {
        if self.advertised()? < needed {
            return Err(WaveError::BufferTooSmall { required: needed });
        }
        Ok(())
    }

    pub fn read_i32(&self) -> Result<i32, WaveError> {
        self.require(4)?;
        Ok(i32::from_le_bytes([self.value[0], self.value[1], self.value[2], self.value[3]]))
    }

    pub fn read_u32(&self) -> Result<u32, WaveError> {
        self.read_i32().map(|v| v as u32)
    }

    pub fn write_i32(&mut self, value: i32) -> Result<(), WaveError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), WaveError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), WaveError> {
        self.require(bytes.len())?;
        self.value[..bytes.len()].copy_from_slice(bytes);
        self.value_size = bytes.len();
        Ok(())
    }

    /// Answers a BASICSUPPORT query with the full description, or with just
    /// the access flags when the buffer only holds a `ULONG`.
    pub fn write_basic_support(&mut self, description: &PropertyDescription) -> Result<(), WaveError> {
        let advertised = self.advertised()?;
        if advertised >= PROPERTY_DESCRIPTION_SIZE {
            self.write_bytes(&description.to_bytes())
        } else if advertised >= 4 {
            self.write_u32(description.access_flags.bits())
        } else {
            Err(WaveError::BufferTooSmall { required: 4 })
        }
    }
}
