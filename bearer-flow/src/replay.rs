//! replay - folds the procedure handlers over a call flow, keeping the state after every message

use crate::data::{Config, Lbi, NodeState, SessionContext};
use crate::procedures::next_state;
use gtpc::{CallFlowMessage, NodeId};
use serde::Serialize;
use slog::{Logger, debug, info, o, warn};

static EMPTY: NodeState = NodeState::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Replaying { step: usize },
    Done,
}

pub struct ReplayEngine {
    config: Config,
    logger: Logger,
    state: EngineState,
}

impl ReplayEngine {
    pub fn new(config: Config, logger: Logger) -> Self {
        ReplayEngine {
            config,
            logger,
            state: EngineState::Idle,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Replay a call flow from an empty state.  The messages are applied in the order
    /// given and the result has one snapshot per message.
    pub fn replay(&mut self, messages: &[CallFlowMessage]) -> History {
        info!(self.logger, "Replaying {} call flow messages", messages.len());
        let mut snapshots: Vec<NodeState> = Vec::with_capacity(messages.len());
        let mut last_id = None;
        for (step, cf) in messages.iter().enumerate() {
            self.state = EngineState::Replaying { step };
            if last_id.is_some_and(|last| cf.id <= last) {
                warn!(self.logger, "Message id {} does not follow {:?}", cf.id, last_id);
            }
            last_id = Some(cf.id);

            let logger = self.logger.new(o!("step" => step, "id" => cf.id));
            let previous = snapshots.last().unwrap_or(&EMPTY);
            let next = next_state(previous, cf, &self.config, &logger);
            debug!(logger, "{} {} -> {}", cf.procedure, cf.src_node, cf.dst_node);
            snapshots.push(next);
        }
        self.state = EngineState::Done;
        History { snapshots }
    }
}

/// The state after each message of a call flow.  Every snapshot is independent of the
/// others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct History {
    snapshots: Vec<NodeState>,
}

impl History {
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// The state after the message at `index`.
    pub fn get(&self, index: usize) -> Option<&NodeState> {
        self.snapshots.get(index)
    }

    /// The state once `step` messages have been applied.  Step 0 is the empty state
    /// before the first message.
    pub fn at_step(&self, step: usize) -> Option<&NodeState> {
        match step {
            0 => Some(&EMPTY),
            _ => self.snapshots.get(step - 1),
        }
    }

    pub fn last(&self) -> Option<&NodeState> {
        self.snapshots.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeState> {
        self.snapshots.iter()
    }

    pub fn session(&self, index: usize, node: &NodeId, lbi: Lbi) -> Option<&SessionContext> {
        self.get(index)?.session(node, lbi)
    }
}

impl std::ops::Index<usize> for History {
    type Output = NodeState;

    fn index(&self, index: usize) -> &NodeState {
        &self.snapshots[index]
    }
}
