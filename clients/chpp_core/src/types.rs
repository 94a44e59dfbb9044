use serde::{Deserialize, Serialize};

use crate::error::LineupError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupPlayer {
    pub player_id: u32,
    pub role_id: i32,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub behaviour: Option<i32>,
}

impl LineupPlayer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// How a match order changes the lineup. CHPP codes 1 (substitution) and 2
/// (behaviour or position change) are both replacements; 3 is a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum OrderType {
    Replacement,
    Swap,
}

impl OrderType {
    pub fn from_code(code: i32) -> Result<Self, LineupError> {
        match code {
            1 | 2 => Ok(OrderType::Replacement),
            3 => Ok(OrderType::Swap),
            other => Err(LineupError::UnknownOrderType(other)),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            OrderType::Replacement => 1,
            OrderType::Swap => 3,
        }
    }
}

impl TryFrom<i32> for OrderType {
    type Error = LineupError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        OrderType::from_code(code)
    }
}

impl From<OrderType> for i32 {
    fn from(order_type: OrderType) -> Self {
        order_type.code()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionEvent {
    #[serde(default)]
    pub team_id: u32,
    pub subject_player_id: u32,
    /// 0 when nobody comes on
    #[serde(default)]
    pub object_player_id: u32,
    pub order_type: OrderType,
    #[serde(default)]
    pub new_position_id: i32,
    #[serde(default)]
    pub new_position_behaviour: i32,
    pub match_minute: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedCardEvent {
    pub player_id: u32,
    pub match_minute: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchEvent {
    Substitution(SubstitutionEvent),
    RedCard(RedCardEvent),
}

impl MatchEvent {
    pub fn minute(&self) -> u32 {
        match self {
            MatchEvent::Substitution(sub) => sub.match_minute,
            MatchEvent::RedCard(card) => card.match_minute,
        }
    }
}

impl From<SubstitutionEvent> for MatchEvent {
    fn from(sub: SubstitutionEvent) -> Self {
        MatchEvent::Substitution(sub)
    }
}

impl From<RedCardEvent> for MatchEvent {
    fn from(card: RedCardEvent) -> Self {
        MatchEvent::RedCard(card)
    }
}

/// One team's lineup for one match, as delivered by the `matchlineup`
/// document plus the red cards from the match details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchLineupData {
    #[serde(default)]
    pub match_id: u64,
    #[serde(default)]
    pub team_id: u32,
    #[serde(default)]
    pub team_name: String,
    pub starting_lineup: Vec<LineupPlayer>,
    pub ending_lineup: Vec<LineupPlayer>,
    #[serde(default)]
    pub substitutions: Vec<SubstitutionEvent>,
    #[serde(default)]
    pub red_cards: Vec<RedCardEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormationChange {
    pub minute: u32,
    pub formation: String,
}

impl FormationChange {
    pub fn new(minute: u32, formation: impl Into<String>) -> Self {
        Self {
            minute,
            formation: formation.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_order_type_codes() {
        assert_eq!(OrderType::from_code(1).unwrap(), OrderType::Replacement);
        assert_eq!(OrderType::from_code(2).unwrap(), OrderType::Replacement);
        assert_eq!(OrderType::from_code(3).unwrap(), OrderType::Swap);
        assert!(matches!(
            OrderType::from_code(7),
            Err(LineupError::UnknownOrderType(7))
        ));
    }

    #[test]
    fn test_substitution_deserialize() {
        let sub: SubstitutionEvent = serde_json::from_str(
            r#"{"subject_player_id": 10, "object_player_id": 20, "order_type": 3, "match_minute": 60}"#,
        )
        .unwrap();
        assert_eq!(sub.order_type, OrderType::Swap);
        assert_eq!(sub.new_position_id, 0);

        let bad = serde_json::from_str::<SubstitutionEvent>(
            r#"{"subject_player_id": 10, "order_type": 9, "match_minute": 60}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_match_event_tagging() {
        let event: MatchEvent =
            serde_json::from_str(r#"{"kind": "red_card", "player_id": 5, "match_minute": 33}"#)
                .unwrap();
        assert_eq!(event.minute(), 33);
        assert_eq!(
            event,
            MatchEvent::RedCard(RedCardEvent {
                player_id: 5,
                match_minute: 33
            })
        );
    }

    #[test]
    fn test_full_name() {
        let player = LineupPlayer {
            player_id: 1,
            role_id: 100,
            first_name: "Jan".to_string(),
            last_name: "Keeper".to_string(),
            behaviour: None,
        };
        assert_eq!(player.full_name(), "Jan Keeper");
        assert_eq!(LineupPlayer::default().full_name(), "");
    }
}
