//! Replaying match orders against a starting lineup.
//!
//! CHPP only reports the lineup at kick-off, the lineup at the final whistle
//! and the list of orders executed in between. Replaying the orders on a copy
//! of the starting lineup gives every formation the team played in.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::LineupError;
use crate::types::{
    FormationChange, LineupPlayer, MatchEvent, MatchLineupData, OrderType, RedCardEvent,
    SubstitutionEvent,
};

const KEEPER_ROLES: &[i32] = &[100];
const DEFENDER_ROLES: &[i32] = &[101, 102, 103, 104, 105];
const MIDFIELD_ROLES: &[i32] = &[106, 107, 108, 109, 110];
const FORWARD_ROLES: &[i32] = &[111, 112, 113];
const SUBSTITUTE_ROLES: &[i32] = &[
    114, 115, 116, 117, 118, 119, 120, 200, 201, 202, 203, 204, 205, 206,
];
const BACKUP_ROLES: &[i32] = &[207, 208, 209, 210, 211, 212, 213];
const SET_PIECES_ROLES: &[i32] = &[17];
const CAPTAIN_ROLES: &[i32] = &[18];
const REPLACED_ROLES: &[i32] = &[19, 20, 21];
const PENALTY_TAKER_ROLES: &[i32] = &[22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32];
const RED_CARDED_ROLES: &[i32] = &[33, 34, 35];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineupPosition {
    Keeper,
    Defender,
    Midfield,
    Forward,
    Substitute,
    Backup,
    SetPieces,
    Captain,
    Replaced,
    PenaltyTaker,
    RedCarded,
}

impl LineupPosition {
    pub const ALL: [LineupPosition; 11] = [
        LineupPosition::Keeper,
        LineupPosition::Defender,
        LineupPosition::Midfield,
        LineupPosition::Forward,
        LineupPosition::Substitute,
        LineupPosition::Backup,
        LineupPosition::SetPieces,
        LineupPosition::Captain,
        LineupPosition::Replaced,
        LineupPosition::PenaltyTaker,
        LineupPosition::RedCarded,
    ];

    pub fn role_ids(self) -> &'static [i32] {
        match self {
            LineupPosition::Keeper => KEEPER_ROLES,
            LineupPosition::Defender => DEFENDER_ROLES,
            LineupPosition::Midfield => MIDFIELD_ROLES,
            LineupPosition::Forward => FORWARD_ROLES,
            LineupPosition::Substitute => SUBSTITUTE_ROLES,
            LineupPosition::Backup => BACKUP_ROLES,
            LineupPosition::SetPieces => SET_PIECES_ROLES,
            LineupPosition::Captain => CAPTAIN_ROLES,
            LineupPosition::Replaced => REPLACED_ROLES,
            LineupPosition::PenaltyTaker => PENALTY_TAKER_ROLES,
            LineupPosition::RedCarded => RED_CARDED_ROLES,
        }
    }

    pub fn from_role_id(role_id: i32) -> Result<Self, LineupError> {
        match role_id {
            100 => Ok(LineupPosition::Keeper),
            101..=105 => Ok(LineupPosition::Defender),
            106..=110 => Ok(LineupPosition::Midfield),
            111..=113 => Ok(LineupPosition::Forward),
            114..=120 | 200..=206 => Ok(LineupPosition::Substitute),
            207..=213 => Ok(LineupPosition::Backup),
            17 => Ok(LineupPosition::SetPieces),
            18 => Ok(LineupPosition::Captain),
            19..=21 => Ok(LineupPosition::Replaced),
            22..=32 => Ok(LineupPosition::PenaltyTaker),
            33..=35 => Ok(LineupPosition::RedCarded),
            other => Err(LineupError::UnknownRoleId(other)),
        }
    }

    /// Keeper and outfield slots, i.e. players actually on the pitch.
    pub fn is_on_field(self) -> bool {
        matches!(
            self,
            LineupPosition::Keeper
                | LineupPosition::Defender
                | LineupPosition::Midfield
                | LineupPosition::Forward
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            LineupPosition::Keeper => "keeper",
            LineupPosition::Defender => "defender",
            LineupPosition::Midfield => "midfield",
            LineupPosition::Forward => "forward",
            LineupPosition::Substitute => "substitute",
            LineupPosition::Backup => "backup",
            LineupPosition::SetPieces => "set_pieces",
            LineupPosition::Captain => "captain",
            LineupPosition::Replaced => "replaced",
            LineupPosition::PenaltyTaker => "penalty_taker",
            LineupPosition::RedCarded => "red_carded",
        }
    }
}

impl fmt::Display for LineupPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub type RoleSlots = BTreeMap<i32, Option<LineupPlayer>>;

/// Who stands in which role at one moment of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LineupSnapshot {
    slots: BTreeMap<LineupPosition, RoleSlots>,
}

impl Default for LineupSnapshot {
    fn default() -> Self {
        let slots = LineupPosition::ALL
            .iter()
            .map(|&position| {
                let roles = position.role_ids().iter().map(|&role| (role, None)).collect();
                (position, roles)
            })
            .collect();
        Self { slots }
    }
}

impl LineupSnapshot {
    pub fn from_players(players: &[LineupPlayer]) -> Result<Self, LineupError> {
        let mut snapshot = Self::default();
        for player in players {
            if let Some(previous) = snapshot.place(player.role_id, player.clone())? {
                warn!(
                    "Role {} listed twice: player {} replaces player {}",
                    player.role_id, player.player_id, previous.player_id
                );
            }
        }
        Ok(snapshot)
    }

    pub fn position(&self, position: LineupPosition) -> &RoleSlots {
        &self.slots[&position]
    }

    pub fn iter(&self) -> impl Iterator<Item = (LineupPosition, &RoleSlots)> {
        self.slots.iter().map(|(&position, roles)| (position, roles))
    }

    pub fn get(&self, role_id: i32) -> Result<Option<&LineupPlayer>, LineupError> {
        let position = LineupPosition::from_role_id(role_id)?;
        Ok(self.slots[&position][&role_id].as_ref())
    }

    fn slot_mut(&mut self, role_id: i32) -> Result<&mut Option<LineupPlayer>, LineupError> {
        let position = LineupPosition::from_role_id(role_id)?;
        self.slots
            .get_mut(&position)
            .and_then(|roles| roles.get_mut(&role_id))
            .ok_or(LineupError::UnknownRoleId(role_id))
    }

    /// Put a player into a role, returning whoever stood there before. The
    /// player's tracked role id follows the slot.
    pub fn place(
        &mut self,
        role_id: i32,
        mut player: LineupPlayer,
    ) -> Result<Option<LineupPlayer>, LineupError> {
        player.role_id = role_id;
        Ok(self.slot_mut(role_id)?.replace(player))
    }

    pub fn clear(&mut self, role_id: i32) -> Result<Option<LineupPlayer>, LineupError> {
        Ok(self.slot_mut(role_id)?.take())
    }

    /// Exchange the occupants of two roles.
    pub fn swap(&mut self, first: i32, second: i32) -> Result<(), LineupError> {
        let a = self.clear(first)?;
        let b = self.clear(second)?;
        if let Some(player) = b {
            self.place(first, player)?;
        }
        if let Some(player) = a {
            self.place(second, player)?;
        }
        Ok(())
    }

    /// Role id of the player if they are currently on the pitch.
    pub fn find_on_field(&self, player_id: u32) -> Option<i32> {
        self.iter()
            .filter(|(position, _)| position.is_on_field())
            .flat_map(|(_, roles)| roles.iter())
            .find(|(_, player)| matches!(player, Some(p) if p.player_id == player_id))
            .map(|(&role, _)| role)
    }

    /// First record of the player anywhere in the snapshot, pitch first.
    pub fn find_player(&self, player_id: u32) -> Option<&LineupPlayer> {
        self.slots
            .values()
            .flat_map(|roles| roles.values())
            .flatten()
            .find(|player| player.player_id == player_id)
    }

    pub fn count(&self, position: LineupPosition) -> usize {
        self.position(position)
            .values()
            .filter(|player| player.is_some())
            .count()
    }

    pub fn outfield_count(&self) -> usize {
        self.count(LineupPosition::Defender)
            + self.count(LineupPosition::Midfield)
            + self.count(LineupPosition::Forward)
    }

    /// Defender, midfield and forward counts, e.g. `"442"`.
    pub fn formation(&self) -> String {
        format!(
            "{}{}{}",
            self.count(LineupPosition::Defender),
            self.count(LineupPosition::Midfield),
            self.count(LineupPosition::Forward)
        )
    }
}

/// Replay `events` on a copy of `starting` and list every formation the team
/// went through. `ending` is only used to look up players who came on.
pub fn compute_formation_changes(
    starting: &LineupSnapshot,
    ending: &LineupSnapshot,
    events: &[MatchEvent],
) -> Result<Vec<FormationChange>, LineupError> {
    let mut live = starting.clone();
    let mut ordered: Vec<&MatchEvent> = events.iter().collect();
    // Stable, so events of the same minute keep their order
    ordered.sort_by_key(|event| event.minute());

    let mut changes = vec![FormationChange::new(0, live.formation())];
    for event in ordered {
        match event {
            MatchEvent::Substitution(sub) => apply_substitution(&mut live, ending, sub)?,
            MatchEvent::RedCard(card) => apply_red_card(&mut live, card)?,
        }

        let formation = live.formation();
        if changes.last().map(|c| c.formation.as_str()) != Some(formation.as_str()) {
            debug!("Formation changed to {} at minute {}", formation, event.minute());
            changes.push(FormationChange::new(event.minute(), formation));
        }
    }

    Ok(changes)
}

fn apply_red_card(live: &mut LineupSnapshot, card: &RedCardEvent) -> Result<(), LineupError> {
    match live.find_on_field(card.player_id) {
        Some(role) => {
            debug!(
                "Minute {}: player {} sent off from role {}",
                card.match_minute, card.player_id, role
            );
            live.clear(role)?;
        }
        None => warn!(
            "Minute {}: red-carded player {} is not on the pitch",
            card.match_minute, card.player_id
        ),
    }
    Ok(())
}

fn apply_substitution(
    live: &mut LineupSnapshot,
    ending: &LineupSnapshot,
    sub: &SubstitutionEvent,
) -> Result<(), LineupError> {
    match sub.order_type {
        OrderType::Replacement => apply_replacement(live, ending, sub),
        OrderType::Swap => apply_swap(live, sub),
    }
}

fn apply_replacement(
    live: &mut LineupSnapshot,
    ending: &LineupSnapshot,
    sub: &SubstitutionEvent,
) -> Result<(), LineupError> {
    let Some(vacated) = live.find_on_field(sub.subject_player_id) else {
        warn!(
            "Minute {}: player {} is not on the pitch, order skipped",
            sub.match_minute, sub.subject_player_id
        );
        return Ok(());
    };
    let subject = live.clear(vacated)?;

    if sub.object_player_id == 0 {
        debug!(
            "Minute {}: player {} leaves role {} without replacement",
            sub.match_minute, sub.subject_player_id, vacated
        );
        return Ok(());
    }

    let target = if sub.new_position_id > 0 {
        sub.new_position_id
    } else {
        vacated
    };

    // Players coming off the bench are only known to the ending lineup
    let object = if sub.object_player_id == sub.subject_player_id {
        subject
    } else {
        ending
            .find_player(sub.object_player_id)
            .or_else(|| live.find_player(sub.object_player_id))
            .cloned()
    };
    let object = object.unwrap_or_else(|| {
        warn!(
            "Minute {}: no record of incoming player {}",
            sub.match_minute, sub.object_player_id
        );
        LineupPlayer {
            player_id: sub.object_player_id,
            role_id: target,
            ..LineupPlayer::default()
        }
    });

    // e.g. a field player taking over from the keeper
    if let Some(previous) = live.find_on_field(sub.object_player_id) {
        live.clear(previous)?;
    }

    debug!(
        "Minute {}: player {} ({}) replaces player {} ({})",
        sub.match_minute, sub.object_player_id, target, sub.subject_player_id, vacated
    );
    if let Some(displaced) = live.place(target, object)? {
        warn!(
            "Minute {}: role {} was still held by player {}",
            sub.match_minute, target, displaced.player_id
        );
    }
    Ok(())
}

fn apply_swap(live: &mut LineupSnapshot, sub: &SubstitutionEvent) -> Result<(), LineupError> {
    match (
        live.find_on_field(sub.subject_player_id),
        live.find_on_field(sub.object_player_id),
    ) {
        (Some(first), Some(second)) => {
            debug!(
                "Minute {}: players {} and {} swap roles {} and {}",
                sub.match_minute, sub.subject_player_id, sub.object_player_id, first, second
            );
            live.swap(first, second)
        }
        _ => {
            warn!(
                "Minute {}: swap of players {} and {} needs both on the pitch, order skipped",
                sub.match_minute, sub.subject_player_id, sub.object_player_id
            );
            Ok(())
        }
    }
}

/// A team's lineup for one match with its derived snapshots.
#[derive(Debug, Clone)]
pub struct MatchLineup {
    data: MatchLineupData,
    starting: LineupSnapshot,
    ending: LineupSnapshot,
}

impl MatchLineup {
    pub fn new(data: MatchLineupData) -> Result<Self, LineupError> {
        let starting = LineupSnapshot::from_players(&data.starting_lineup)?;
        let ending = LineupSnapshot::from_players(&data.ending_lineup)?;
        Ok(Self {
            data,
            starting,
            ending,
        })
    }

    pub fn data(&self) -> &MatchLineupData {
        &self.data
    }

    pub fn starting_snapshot(&self) -> &LineupSnapshot {
        &self.starting
    }

    pub fn ending_snapshot(&self) -> &LineupSnapshot {
        &self.ending
    }

    /// Substitutions then red cards, ordered by minute.
    pub fn events(&self) -> Vec<MatchEvent> {
        let mut events: Vec<MatchEvent> = self
            .data
            .substitutions
            .iter()
            .cloned()
            .map(MatchEvent::from)
            .chain(self.data.red_cards.iter().cloned().map(MatchEvent::from))
            .collect();
        events.sort_by_key(|event| event.minute());
        events
    }

    pub fn formations(&self) -> Result<Vec<FormationChange>, LineupError> {
        let changes = compute_formation_changes(&self.starting, &self.ending, &self.events())?;
        info!(
            "Match {} team {}: {} formation(s)",
            self.data.match_id,
            self.data.team_id,
            changes.len()
        );
        Ok(changes)
    }
}

pub fn load_match_lineup(path: impl AsRef<Path>) -> Result<MatchLineup, LineupError> {
    let json = std::fs::read_to_string(path)?;
    MatchLineup::new(serde_json::from_str(&json)?)
}
