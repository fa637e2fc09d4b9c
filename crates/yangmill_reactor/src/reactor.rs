//! The cross-source statement reactor.
//!
//! Drives every supplied source through the processing phases to fixed
//! point, then freezes the effective model. A build either produces a
//! complete [`EffectiveModelContext`] or fails atomically; nothing is
//! retried and no partial model escapes.

use std::sync::Arc;

use log::debug;

use yangmill_foundation::{Error, Result, SourceId};
use yangmill_model::EffectiveModelContext;
use yangmill_parser::StatementSource;

use crate::effective::build_effective_model;
use crate::phase::{ModelProcessingPhase, PhaseProgress};
use crate::session::BuildSession;
use crate::support::SupportBundle;
use crate::supports::vanilla_bundle;

/// A statement reactor: sources in, effective model out.
pub struct Reactor {
    bundle: Arc<SupportBundle>,
    sources: Vec<Box<dyn StatementSource>>,
}

impl Reactor {
    /// Creates a reactor with the default statement support bundle.
    #[must_use]
    pub fn vanilla() -> Self {
        Self::with_bundle(vanilla_bundle())
    }

    /// Creates a reactor driven by a custom support bundle.
    #[must_use]
    pub fn with_bundle(bundle: SupportBundle) -> Self {
        Self {
            bundle: Arc::new(bundle),
            sources: Vec::new(),
        }
    }

    /// Adds a statement source to the build.
    pub fn add_source(&mut self, source: Box<dyn StatementSource>) -> &mut Self {
        self.sources.push(source);
        self
    }

    /// Adds a statement source, builder-style.
    #[must_use]
    pub fn with_source(mut self, source: Box<dyn StatementSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Runs the build: materializes every source, advances all of them
    /// through the processing phases to fixed point, and freezes the
    /// effective model.
    ///
    /// # Errors
    /// - [`Error::source`]-kind errors for malformed input,
    /// - a reactor error aggregating inference failures when a phase
    ///   runs out of progress with actions outstanding,
    /// - verification errors for internal invariant violations.
    pub fn build(self) -> Result<EffectiveModelContext> {
        let mut session = BuildSession::new(Arc::clone(&self.bundle));

        for source in &self.sources {
            let root = source.root()?;
            session.add_source(source.name(), &root)?;
        }

        for phase in ModelProcessingPhase::EXECUTION_ORDER {
            debug!("global phase {phase} started");
            Self::complete_phase(&mut session, phase)?;
            debug!("global phase {phase} finished");
        }

        build_effective_model(&session)
    }

    /// Advances all sources through one phase, iterating to fixed point.
    ///
    /// Mirrors the classic reactor loop: keep making passes while any
    /// source reports progress; once a full pass changes nothing and
    /// unfinished sources remain, convert their outstanding actions into
    /// a build failure.
    fn complete_phase(session: &mut BuildSession, phase: ModelProcessingPhase) -> Result<()> {
        let mut unfinished: Vec<usize> = (0..session.sources.len()).collect();

        let mut progressing = true;
        while progressing && !unfinished.is_empty() {
            progressing = false;
            let mut still_unfinished = Vec::new();
            for source_index in unfinished {
                match session.try_complete_phase(source_index, phase)? {
                    PhaseProgress::Finished => {
                        progressing = true;
                    }
                    PhaseProgress::Progress => {
                        progressing = true;
                        still_unfinished.push(source_index);
                    }
                    PhaseProgress::NoProgress => {
                        still_unfinished.push(source_index);
                    }
                }
            }
            unfinished = still_unfinished;
        }

        if unfinished.is_empty() {
            return Ok(());
        }

        // Deterministic, final failure: name the first source holding
        // unresolved actions and every prerequisite that could not be
        // satisfied, across all blocked sources.
        let mut blamed = unfinished[0];
        let mut causes = Vec::new();
        for source_index in unfinished {
            let source_causes = session.fail_modifiers(source_index, phase);
            if causes.is_empty() && !source_causes.is_empty() {
                blamed = source_index;
            }
            causes.extend(source_causes);
        }
        let source_id = SourceId::new(session.sources[blamed].name.as_ref(), None);
        Err(Error::reactor(phase.name(), source_id, causes))
    }
}

impl Default for Reactor {
    fn default() -> Self {
        Self::vanilla()
    }
}
