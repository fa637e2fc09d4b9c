//! The model processing phase state machine.

use std::fmt;

/// Ordered phases of a model build.
///
/// Every statement context advances through these in order; a phase
/// completes for a context only once all its substatements and pending
/// mutations for that phase have completed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelProcessingPhase {
    /// Nothing has been processed yet.
    Init,
    /// Source trees are materialized and module names become known.
    SourcePreLinkage,
    /// Cross-source linkage: imports and includes resolve.
    SourceLinkage,
    /// Statement arguments are parsed into typed values.
    StatementDefinition,
    /// Substatement cardinality is enforced; declaration-time namespaces
    /// fill in and declaration-time cross-references resolve.
    FullDeclaration,
    /// Effective-model mutations (augments) apply; the model freezes.
    EffectiveModel,
}

impl ModelProcessingPhase {
    /// All phases after [`ModelProcessingPhase::Init`], in execution order.
    pub const EXECUTION_ORDER: [ModelProcessingPhase; 5] = [
        ModelProcessingPhase::SourcePreLinkage,
        ModelProcessingPhase::SourceLinkage,
        ModelProcessingPhase::StatementDefinition,
        ModelProcessingPhase::FullDeclaration,
        ModelProcessingPhase::EffectiveModel,
    ];

    /// Returns this phase's position in the execution order.
    #[must_use]
    pub const fn execution_order(self) -> u8 {
        match self {
            Self::Init => 0,
            Self::SourcePreLinkage => 1,
            Self::SourceLinkage => 2,
            Self::StatementDefinition => 3,
            Self::FullDeclaration => 4,
            Self::EffectiveModel => 5,
        }
    }

    /// Returns the phase that must complete before this one starts.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Init => None,
            Self::SourcePreLinkage => Some(Self::Init),
            Self::SourceLinkage => Some(Self::SourcePreLinkage),
            Self::StatementDefinition => Some(Self::SourceLinkage),
            Self::FullDeclaration => Some(Self::StatementDefinition),
            Self::EffectiveModel => Some(Self::FullDeclaration),
        }
    }

    /// Returns the phase name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::SourcePreLinkage => "SourcePreLinkage",
            Self::SourceLinkage => "SourceLinkage",
            Self::StatementDefinition => "StatementDefinition",
            Self::FullDeclaration => "FullDeclaration",
            Self::EffectiveModel => "EffectiveModel",
        }
    }
}

impl fmt::Display for ModelProcessingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one attempt to advance a source through the current phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PhaseProgress {
    /// The source completed the phase.
    Finished,
    /// Work was done but the phase is not complete.
    Progress,
    /// Nothing could be advanced.
    NoProgress,
}
