/// Tuning knobs for a mounted field.
#[derive(Debug, Clone, Default)]
pub struct ControllerOptions {
    /// Re-run the shape check on every external value, not only the initial
    /// one. An incompatible push then suspends editing until overridden.
    pub strict_pushes: bool,
}

impl ControllerOptions {
    pub fn with_strict_pushes(mut self, strict: bool) -> Self {
        self.strict_pushes = strict;
        self
    }
}
