/// Whether the entry field currently holds query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Idle,
    Querying,
}

/// Effect a content-change event has on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Idle -> Idle
    StayIdle,
    /// Querying -> Idle
    EnterIdle,
    /// -> Querying; only a response carrying this ticket may be rendered
    Query { ticket: u64 },
}

/// Two-state machine driven by the entry field's live value.
///
/// Every event bumps the generation, so any query issued before it is
/// superseded. Going idle therefore also invalidates in-flight queries.
#[derive(Debug)]
pub struct InputController {
    state: InputState,
    query: String,
    generation: u64,
}

impl Default for InputController {
    fn default() -> Self {
        Self::new()
    }
}

impl InputController {
    pub fn new() -> Self {
        Self {
            state: InputState::Idle,
            query: String::new(),
            generation: 0,
        }
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn on_change(&mut self, value: &str) -> Transition {
        self.generation += 1;
        self.query = value.to_string();

        if value.is_empty() {
            let previous = std::mem::replace(&mut self.state, InputState::Idle);
            match previous {
                InputState::Idle => Transition::StayIdle,
                InputState::Querying => Transition::EnterIdle,
            }
        } else {
            self.state = InputState::Querying;
            Transition::Query {
                ticket: self.generation,
            }
        }
    }

    /// True when `ticket` belongs to the most recent event and that event
    /// is still a query.
    pub fn is_current(&self, ticket: u64) -> bool {
        self.state == InputState::Querying && ticket == self.generation
    }
}
