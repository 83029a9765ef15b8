use serde::{Deserialize, Serialize};

/// State-change notifications buffered by the session and drained by the
/// consumer after each call. The UI renders from these instead of the
/// session mutating any presentation state itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// Fresh grids were generated; all prior display state is stale.
    NewGame,
    SelectionChanged {
        row: usize,
        col: usize,
    },
    /// A value was stored. `conflict` is advisory: the value is kept even
    /// when it clashes with another filled cell.
    CellUpdated {
        row: usize,
        col: usize,
        value: u8,
        conflict: bool,
    },
    CellCleared {
        row: usize,
        col: usize,
    },
    /// All 81 cells are filled and match the solution.
    Completed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_tag_by_variant_name() {
        let json = serde_json::to_value(SessionEvent::CellUpdated {
            row: 2,
            col: 7,
            value: 5,
            conflict: true,
        })
        .unwrap();
        assert_eq!(json["type"], "CellUpdated");
        assert_eq!(json["row"], 2);
        assert_eq!(json["col"], 7);
        assert_eq!(json["value"], 5);
        assert_eq!(json["conflict"], true);
    }

    #[test]
    fn unit_events_round_trip() {
        let json = serde_json::to_string(&SessionEvent::Completed).unwrap();
        let back: SessionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SessionEvent::Completed);
    }
}
