/// What a confirmed prompt does. The session controller interprets these;
/// the gate itself stores no behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    AdvanceSection,
    EndTest,
    Quit,
}

#[derive(Debug, Clone)]
pub struct Prompt {
    pub title: String,
    pub message: String,
    pub action: PendingAction,
    /// Forced prompts have no cancellation path: dismissing performs the
    /// affirmative action and the UI renders no cancel control.
    pub forced: bool,
}

/// Single confirmation slot gating irreversible transitions.
///
/// One gate exists per session. Opening while already open overwrites the
/// pending prompt (last writer wins, no queueing). The gate never closes
/// itself; resolution happens by `take`, so closing is part of the caller's
/// confirm/dismiss effect.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationGate {
    prompt: Option<Prompt>,
}

impl ConfirmationGate {
    pub fn open(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        action: PendingAction,
        forced: bool,
    ) {
        self.prompt = Some(Prompt {
            title: title.into(),
            message: message.into(),
            action,
            forced,
        });
    }

    pub fn is_open(&self) -> bool {
        self.prompt.is_some()
    }

    pub fn current(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    /// Close the gate, handing the pending prompt to the caller.
    pub fn take(&mut self) -> Option<Prompt> {
        self.prompt.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed() {
        let gate = ConfirmationGate::default();
        assert!(!gate.is_open());
        assert!(gate.current().is_none());
    }

    #[test]
    fn open_take_round_trip() {
        let mut gate = ConfirmationGate::default();
        gate.open("Quit Test?", "Progress will be lost.", PendingAction::Quit, false);
        assert!(gate.is_open());

        let prompt = gate.take().unwrap();
        assert_eq!(prompt.title, "Quit Test?");
        assert_eq!(prompt.action, PendingAction::Quit);
        assert!(!prompt.forced);
        assert!(!gate.is_open(), "take closes the gate");
    }

    #[test]
    fn last_writer_wins() {
        let mut gate = ConfirmationGate::default();
        gate.open("End Section Early?", "...", PendingAction::AdvanceSection, false);
        gate.open("Time is Up!", "...", PendingAction::AdvanceSection, true);

        let prompt = gate.take().unwrap();
        assert_eq!(prompt.title, "Time is Up!");
        assert!(prompt.forced);
        assert!(gate.take().is_none(), "no queueing behind the overwrite");
    }
}
