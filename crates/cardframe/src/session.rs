use crate::GuideResult;

/// Caller-side capture session state machine.
///
/// The analyzer itself is stateless; absorbing single-frame noise is the
/// caller's job. Feed every [`GuideResult`] into [`CaptureSession::observe`]
/// and trigger the capture when it reports [`SessionState::Capturing`]:
/// a good verdict advances the streak, any bad verdict resets it, and
/// `required_streak` consecutive good verdicts arm the capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Not watching frames.
    Idle,
    /// Watching frames, no good streak yet.
    Framing,
    /// Consecutive good verdicts so far.
    Confirming { streak: u32 },
    /// Streak reached; the caller should fire the capture and then
    /// `reset()`.
    Capturing,
}

#[derive(Clone, Debug)]
pub struct CaptureSession {
    required_streak: u32,
    state: SessionState,
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new(3)
    }
}

impl CaptureSession {
    pub fn new(required_streak: u32) -> Self {
        Self {
            required_streak: required_streak.max(1),
            state: SessionState::Idle,
        }
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Begin watching frames.
    pub fn start(&mut self) {
        if self.state == SessionState::Idle {
            self.state = SessionState::Framing;
        }
    }

    /// Return to `Idle`, e.g. after a completed or failed capture.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
    }

    /// Drive the state machine with one per-frame verdict.
    ///
    /// Verdicts observed while `Idle` or `Capturing` are ignored; the
    /// caller controls those transitions explicitly.
    pub fn observe(&mut self, verdict: &GuideResult) -> SessionState {
        self.state = match self.state {
            SessionState::Idle | SessionState::Capturing => self.state,
            SessionState::Framing | SessionState::Confirming { .. } => {
                if !verdict.is_good {
                    SessionState::Framing
                } else {
                    let streak = match self.state {
                        SessionState::Confirming { streak } => streak + 1,
                        _ => 1,
                    };
                    if streak >= self.required_streak {
                        SessionState::Capturing
                    } else {
                        SessionState::Confirming { streak }
                    }
                }
            }
        };
        self.state
    }
}
