// Cooperative runner for interactive hosts: runs the generation loop in
// batches, yielding to the async runtime between batches, and honours a
// cancellation handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use super::GenerationLoop;
use crate::model::player::PlayerPool;
use crate::model::team::GenerationResult;
use crate::spec::{ConstraintSpec, SpecError};

/// Shared flag a host sets to stop a run early.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Run generation in batches of `batch_size` attempts, yielding between
/// batches. Cancellation is checked before every batch and ends the run the
/// same way budget exhaustion does.
///
/// For the same seed the result matches `generate_teams` unless cancelled.
pub async fn generate_teams_cooperative<R: Rng>(
    pool: &PlayerPool,
    spec: &ConstraintSpec,
    rng: R,
    batch_size: usize,
    cancel: &CancelHandle,
) -> Result<GenerationResult, SpecError> {
    let mut run = GenerationLoop::new(pool, spec, rng)?;
    let batch_size = batch_size.max(1);

    loop {
        if cancel.is_cancelled() {
            run.cancel();
            break;
        }
        if run.run_batch(batch_size).is_done() {
            break;
        }
        debug!(
            attempts = run.attempts_used(),
            accepted = run.teams().len(),
            "Yielding between generation batches"
        );
        tokio::task::yield_now().await;
    }

    Ok(run.into_result())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
