//! Human-in-the-loop decision dialogs.
//!
//! A dialog moves `Idle → AwaitingInput → Applied | Cancelled`. The prompt
//! owns the parsing of the answer, so the flow can be driven from tests or
//! from any front end without blocking.

/// A question whose answer becomes a typed value.
pub trait Prompt {
    /// Value produced from a valid answer.
    type Output;

    /// Text shown to the operator.
    fn question(&self) -> String;

    /// Parse an answer that is not blank.
    ///
    /// # Errors
    /// Returns [`DialogError::InvalidAnswer`] when the answer is unusable.
    fn resolve(&self, answer: &str) -> Result<Self::Output, DialogError>;
}

/// Dialog failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogError {
    /// A prompt is already waiting for an answer.
    #[error("a prompt is already awaiting input")]
    Busy,
    /// An answer or cancel arrived while nothing was being asked.
    #[error("no prompt is awaiting input")]
    NotAwaiting,
    /// The answer could not be used; the prompt stays open.
    #[error("{message}")]
    InvalidAnswer {
        /// Why the answer was refused.
        message: String,
    },
}

impl DialogError {
    /// Shorthand for [`DialogError::InvalidAnswer`].
    #[must_use]
    pub fn invalid_answer(message: impl Into<String>) -> Self {
        Self::InvalidAnswer {
            message: message.into(),
        }
    }
}

/// Current dialog state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogState<P> {
    /// Nothing is being asked.
    #[default]
    Idle,
    /// Waiting for the operator. `error` holds the last refused answer.
    AwaitingInput {
        /// Open prompt.
        prompt: P,
        /// Error from the previous answer, if any.
        error: Option<DialogError>,
    },
    /// The last prompt produced a value.
    Applied,
    /// The last prompt was dismissed.
    Cancelled,
}

/// Dialog driver.
///
/// # Examples
/// ```
/// use recordkeeper::domain::{Dialog, DialogError, DialogState, Prompt};
///
/// struct Name;
/// impl Prompt for Name {
///     type Output = String;
///     fn question(&self) -> String { "Who?".to_owned() }
///     fn resolve(&self, answer: &str) -> Result<String, DialogError> {
///         Ok(answer.trim().to_owned())
///     }
/// }
///
/// let mut dialog = Dialog::new();
/// dialog.open(Name).expect("idle dialog opens");
/// assert_eq!(dialog.submit("Ana").expect("answer"), Some("Ana".to_owned()));
/// assert!(matches!(dialog.state(), DialogState::Applied));
/// ```
#[derive(Debug, Default)]
pub struct Dialog<P> {
    state: DialogState<P>,
}

impl<P: Prompt> Dialog<P> {
    /// A dialog in the idle state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: DialogState::Idle,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &DialogState<P> {
        &self.state
    }

    /// Open prompt, when awaiting input.
    #[must_use]
    pub const fn prompt(&self) -> Option<&P> {
        match &self.state {
            DialogState::AwaitingInput { prompt, .. } => Some(prompt),
            _ => None,
        }
    }

    /// Ask a question.
    ///
    /// # Errors
    /// Returns [`DialogError::Busy`] while another prompt is open.
    pub fn open(&mut self, prompt: P) -> Result<(), DialogError> {
        if matches!(self.state, DialogState::AwaitingInput { .. }) {
            return Err(DialogError::Busy);
        }
        self.state = DialogState::AwaitingInput {
            prompt,
            error: None,
        };
        Ok(())
    }

    /// Answer the open prompt.
    ///
    /// A blank answer cancels and yields `Ok(None)`. An unusable answer keeps
    /// the prompt open and returns the error.
    ///
    /// # Errors
    /// Returns [`DialogError::NotAwaiting`] when nothing is open, or the
    /// prompt's [`DialogError::InvalidAnswer`].
    pub fn submit(&mut self, answer: &str) -> Result<Option<P::Output>, DialogError> {
        let DialogState::AwaitingInput { prompt, .. } = std::mem::take(&mut self.state) else {
            return Err(DialogError::NotAwaiting);
        };
        if answer.trim().is_empty() {
            self.state = DialogState::Cancelled;
            return Ok(None);
        }
        match prompt.resolve(answer) {
            Ok(output) => {
                self.state = DialogState::Applied;
                Ok(Some(output))
            }
            Err(error) => {
                self.state = DialogState::AwaitingInput {
                    prompt,
                    error: Some(error.clone()),
                };
                Err(error)
            }
        }
    }

    /// Dismiss the open prompt.
    ///
    /// # Errors
    /// Returns [`DialogError::NotAwaiting`] when nothing is open.
    pub fn cancel(&mut self) -> Result<(), DialogError> {
        if !matches!(self.state, DialogState::AwaitingInput { .. }) {
            return Err(DialogError::NotAwaiting);
        }
        self.state = DialogState::Cancelled;
        Ok(())
    }
}
