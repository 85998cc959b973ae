/// When free regions get merged back together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoalescePolicy {
    /// Merge only when an allocation finds no region large enough, then rescan once.
    #[default]
    OnAllocationMiss,
    /// Merge after every `free`, and still on an allocation miss.
    OnFree,
    /// Never merge. A miss fails immediately.
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllocatorConfig {
    pub coalesce: CoalescePolicy,
}

impl AllocatorConfig {
    pub fn with_coalesce_policy(mut self, policy: CoalescePolicy) -> Self {
        self.coalesce = policy;
        self
    }
}
