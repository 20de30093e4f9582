//! Flash texts shown to the player as the hunt unfolds.

use maze_hunt_core::{Event, GateState};

/// Line printed before the hunt begins.
pub(crate) const INTRO: &str = "Enter. Find the artifacts. Escape.";

/// Flash text for an event, if the event deserves one.
pub(crate) fn narrate(event: &Event) -> Option<String> {
    match event {
        Event::GateChanged {
            state: GateState::Closed,
        } => Some("Find the artifacts... do not get caught.".to_owned()),
        Event::GateChanged {
            state: GateState::Open,
        } => Some("The passage is open. Escape.".to_owned()),
        Event::ObjectiveCollected { remaining, .. } if *remaining > 0 => {
            Some(remaining_text(*remaining))
        }
        Event::TargetCaught { .. } => Some("This will be your tomb".to_owned()),
        Event::TargetEscaped => Some("You escaped the maze.".to_owned()),
        _ => None,
    }
}

fn remaining_text(remaining: u32) -> String {
    if remaining == 1 {
        "1 artifact remains".to_owned()
    } else {
        format!("{remaining} artifacts remain")
    }
}
