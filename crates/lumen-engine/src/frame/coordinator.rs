use std::sync::atomic::{AtomicU64, Ordering};

use super::{FrameError, IN_FLIGHT_FRAMES};

static NEXT_COORDINATOR_ID: AtomicU64 = AtomicU64::new(0);

/// Completion signal for the GPU work submitted with one frame slot.
pub trait FrameFence {
    /// Handle returned by the submission step, e.g. a queue submission index.
    type Submission;

    /// Blocks until the work last armed on this fence has retired. Returns immediately
    /// if nothing is armed.
    fn wait(&mut self) -> Result<(), FrameError>;

    /// Arms the fence with the submission that reads this slot's buffers.
    fn arm(&mut self, submission: Self::Submission);
}

/// Proof that slot `index` is free for CPU writes during frame number `frame`.
///
/// Only [`FrameCoordinator::begin_frame`] creates one, after waiting on the slot's
/// fence. It is neither `Clone` nor `Copy`; [`FrameCoordinator::end_frame`] consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct FrameSlot {
    owner: u64,
    index: usize,
    frame: u64,
}

impl FrameSlot {
    /// Ring position in `0..IN_FLIGHT_FRAMES`.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Monotonic frame number this slot was handed out for.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

/// Round-robin owner of the per-slot completion fences.
pub struct FrameCoordinator<F> {
    id: u64,
    fences: [F; IN_FLIGHT_FRAMES],
    frame_index: usize,
    frames_submitted: u64,
    in_progress: bool,
}

impl<F: FrameFence> FrameCoordinator<F> {
    pub fn new(fences: [F; IN_FLIGHT_FRAMES]) -> Self {
        Self {
            id: NEXT_COORDINATOR_ID.fetch_add(1, Ordering::Relaxed),
            fences,
            frame_index: 0,
            frames_submitted: 0,
            in_progress: false,
        }
    }

    /// Builds one fence per slot with `make(slot_index)`.
    pub fn from_fn(make: impl FnMut(usize) -> F) -> Self {
        Self::new(std::array::from_fn(make))
    }

    /// Slot the next `begin_frame` hands out.
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    pub fn is_frame_in_progress(&self) -> bool {
        self.in_progress
    }

    /// Waits for the current slot's previous GPU use to retire, then checks it out.
    ///
    /// The wait has no timeout. A lost device is reported as fatal.
    pub fn begin_frame(&mut self) -> Result<FrameSlot, FrameError> {
        let index = self.frame_index;
        if self.in_progress {
            return Err(FrameError::FrameInProgress { slot: index });
        }

        log::trace!("waiting on frame slot {index}");
        self.fences[index].wait()?;

        self.in_progress = true;
        Ok(FrameSlot {
            owner: self.id,
            index,
            frame: self.frames_submitted,
        })
    }

    /// Arms the slot's fence with `submission` and advances to the next slot.
    ///
    /// A slot this coordinator did not issue for the current frame is rejected and
    /// nothing changes.
    pub fn end_frame(&mut self, slot: FrameSlot, submission: F::Submission) -> Result<(), FrameError> {
        self.check_current(&slot)?;

        self.fences[slot.index].arm(submission);
        self.frame_index = (slot.index + 1) % IN_FLIGHT_FRAMES;
        self.frames_submitted = self.frames_submitted.wrapping_add(1);
        self.in_progress = false;
        Ok(())
    }

    /// Returns a slot without submitting anything, e.g. when no drawable was available.
    ///
    /// The ring does not advance; the next `begin_frame` reuses the same slot.
    pub fn abandon_frame(&mut self, slot: FrameSlot) -> Result<(), FrameError> {
        self.check_current(&slot)?;

        log::debug!("frame {} abandoned on slot {}", slot.frame, slot.index);
        self.in_progress = false;
        Ok(())
    }

    fn check_current(&self, slot: &FrameSlot) -> Result<(), FrameError> {
        let current = self.in_progress
            && slot.owner == self.id
            && slot.index == self.frame_index
            && slot.frame == self.frames_submitted;
        if current {
            return Ok(());
        }
        log::error!("rejected frame slot {} (frame {})", slot.index, slot.frame);
        Err(FrameError::ForeignSlot {
            slot: slot.index,
            frame: slot.frame,
        })
    }
}
