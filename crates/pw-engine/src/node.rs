//! Processor trait for quantum-driven audio nodes.

use pw_core::ChannelConfig;

/// Metadata describing a node's declared parameter.
pub struct ParamInfo {
    pub id: u16,
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

/// Static metadata about a node.
pub struct NodeInfo {
    pub name: &'static str,
    pub short_name: &'static str,
    pub params: &'static [ParamInfo],
}

impl NodeInfo {
    /// Look up a parameter by name.
    pub fn param(&self, name: &str) -> Option<&ParamInfo> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// Core trait for nodes driven one fixed-size quantum at a time.
///
/// `process` runs on the real-time thread: it must not block, lock or
/// allocate.
pub trait QuantumProcessor: Send {
    fn info(&self) -> &NodeInfo;
    fn channel_config(&self) -> ChannelConfig;
    fn quantum_size(&self) -> usize;
    /// Samples between an input quantum and its first appearance at the output.
    fn latency(&self) -> usize;
    /// One quantum per channel in, one quantum per channel out. `params`
    /// holds the per-sub-quantum values of the node's parameter.
    fn process(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]], params: &[f32]);
    fn reset(&mut self);
}
