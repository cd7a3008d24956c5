/// Which half of the turn cycle the battle is in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnPhase {
    /// Waiting for the player's command.
    #[default]
    Player,
    /// A round is being resolved; new commands are rejected.
    Resolving,
}

/// Position of an in-flight round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnCursor {
    Companion,
    /// Index into the hostile roster.
    Hostile(usize),
    EndOfRound,
}

/// Turn and round counters.
///
/// `cursor` is `Some` exactly when `phase` is [`TurnPhase::Resolving`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    pub phase: TurnPhase,
    /// 1-based round counter.
    pub round: u32,
    /// Loot drops earned so far this battle.
    pub drops: u32,
    pub cursor: Option<TurnCursor>,
}

impl TurnState {
    pub fn new() -> Self {
        Self {
            phase: TurnPhase::Player,
            round: 1,
            drops: 0,
            cursor: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.phase == TurnPhase::Resolving
    }

    pub(crate) fn open(&mut self, cursor: TurnCursor) {
        self.phase = TurnPhase::Resolving;
        self.cursor = Some(cursor);
    }

    pub(crate) fn close(&mut self) {
        self.phase = TurnPhase::Player;
        self.cursor = None;
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}
