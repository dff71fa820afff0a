//! Choices submitted back to the battle engine.

use std::fmt;

use crate::ids::{MoveId, TeraType};

#[derive(Debug, Clone, PartialEq)]
pub enum ChosenAction {
    Move {
        move_id: MoveId,
        /// Relative target location: positive for foes, negative for allies, 0 for auto.
        target: i8,
        terastallize: Option<TeraType>,
    },
    Switch {
        /// Team position of the incoming Pokémon.
        index: usize,
    },
    /// Team preview ordering entry.
    Team {
        index: usize,
        original_index: usize,
        priority: i32,
    },
    Pass,
}

/// A full choice: one action per active slot (or per team member at preview).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Choice {
    pub actions: Vec<ChosenAction>,
}

impl Choice {
    pub fn new(actions: Vec<ChosenAction>) -> Self {
        Self { actions }
    }

    pub fn pass() -> Self {
        Self {
            actions: vec![ChosenAction::Pass],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl fmt::Display for ChosenAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChosenAction::Move {
                move_id,
                target,
                terastallize,
            } => {
                write!(f, "move {}", move_id.0)?;
                if *target != 0 {
                    write!(f, " {}", target)?;
                }
                if let Some(t) = terastallize {
                    write!(f, " terastallize({:?})", t)?;
                }
                Ok(())
            }
            ChosenAction::Switch { index } => write!(f, "switch {}", index + 1),
            ChosenAction::Team { original_index, .. } => write!(f, "team {}", original_index + 1),
            ChosenAction::Pass => write!(f, "pass"),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, action) in self.actions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", action)?;
        }
        Ok(())
    }
}
