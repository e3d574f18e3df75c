/// Interfaces a host may ask a miniport or stream object for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Unknown,
    Miniport,
    MiniportWaveCyclic,
    PowerNotify,
    PinCount,
    /// Music-synth miniport; recognised, never provided by wave objects.
    MiniportDMus,
    MiniportWaveCyclicStream,
    DrmAudioStream,
}
