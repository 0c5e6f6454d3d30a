use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque JSON object for sections and fields the bridge forwards
/// without inspecting their shape.
pub type JsonObject = serde_json::Map<String, Value>;

/// Engine marker the client prepends to match-phase labels.
pub(crate) const GAME_STATE_MARKER: &str = "dota_gamerules_state_";

/// Engine marker the client prepends to hero names.
pub(crate) const HERO_NAME_MARKER: &str = "npc_dota_hero_";

// ---------------------------------------------------------------------------
// Snapshot sections
// ---------------------------------------------------------------------------

/// Game client identity reported with every snapshot.
///
/// Descriptive only; never republished downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub appid: u32,
    pub name: String,
    pub timestamp: i64,
    pub version: u32,
}

/// Global match state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapState {
    pub name: String,
    pub matchid: String,
    pub game_time: i32,
    /// Match clock; negative before the horn.
    pub clock_time: i32,
    pub daytime: bool,
    pub nightstalker_night: bool,
    /// Match phase, lower-cased with the engine marker removed
    /// (`DOTA_GAMERULES_STATE_PRE_GAME` → `pre_game`).
    #[serde(deserialize_with = "game_state_label::deserialize")]
    pub game_state: String,
    pub paused: bool,
    pub win_team: String,
    pub customgamename: String,
    pub radiant_score: u32,
    pub dire_score: u32,
    pub ward_purchase_cooldown: i32,
}

/// Per-player economy and combat counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub accountid: String,
    pub steamid: String,
    pub name: String,
    pub activity: String,
    pub team_name: String,
    pub team_slot: i32,
    pub player_slot: i32,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    pub last_hits: i32,
    pub denies: i32,
    pub kill_streak: i32,
    pub commands_issued: i32,
    pub gold: i32,
    pub gold_reliable: i32,
    pub gold_unreliable: i32,
    pub gold_from_creep_kills: i32,
    pub gold_from_hero_kills: i32,
    pub gold_from_income: i32,
    pub gold_from_shared: i32,
    pub gpm: i32,
    pub xpm: i32,
    /// Recent-kill breakdown keyed by victim slot; forwarded untouched.
    pub kill_list: JsonObject,
}

/// Current-hero attributes.
///
/// The client reports whichever fields it currently knows (a snapshot
/// may carry only the fields that changed), so every field is
/// independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub id: Option<u32>,
    /// Hero name with the engine marker removed
    /// (`npc_dota_hero_axe` → `axe`).
    #[serde(default, deserialize_with = "hero_name::deserialize")]
    pub name: Option<String>,
    pub level: Option<i32>,
    pub alive: Option<bool>,
    pub respawn_seconds: Option<i32>,
    pub buyback_cost: Option<i32>,
    pub buyback_cooldown: Option<i32>,
    pub health: Option<i32>,
    pub max_health: Option<i32>,
    pub health_percent: Option<i32>,
    pub mana: Option<i32>,
    pub max_mana: Option<i32>,
    pub mana_percent: Option<i32>,
    pub xp: Option<i32>,
    /// Map position; the origin is centered, so both axes can go negative.
    pub xpos: Option<i32>,
    pub ypos: Option<i32>,
    pub facet: Option<i32>,
    pub attributes_level: Option<i32>,
    // Status effects
    pub silenced: Option<bool>,
    pub stunned: Option<bool>,
    pub disarmed: Option<bool>,
    pub magicimmune: Option<bool>,
    pub hexed: Option<bool>,
    pub muted: Option<bool>,
    /// Wire name is `break`, a Rust keyword; republished as `break_state`.
    #[serde(rename(deserialize = "break"))]
    pub break_state: Option<bool>,
    pub has_debuff: Option<bool>,
    pub smoked: Option<bool>,
    // Aghanim's upgrades
    pub aghanims_scepter: Option<bool>,
    pub aghanims_shard: Option<bool>,
    // Talent tree, bottom to top
    pub talent_1: Option<bool>,
    pub talent_2: Option<bool>,
    pub talent_3: Option<bool>,
    pub talent_4: Option<bool>,
    pub talent_5: Option<bool>,
    pub talent_6: Option<bool>,
    pub talent_7: Option<bool>,
    pub talent_8: Option<bool>,
    pub permanent_buffs: Option<JsonObject>,
}

/// One validated snapshot. Sections the client did not report are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub provider: Option<Provider>,
    pub map: Option<MapState>,
    pub player: Option<Player>,
    pub hero: Option<Hero>,
    pub abilities: Option<JsonObject>,
    pub items: Option<JsonObject>,
    pub auth: Option<JsonObject>,
}

// ---------------------------------------------------------------------------
// Field transforms
// ---------------------------------------------------------------------------

/// Serde helper for [`MapState::game_state`].
///
/// Lower-cases the raw label, then removes every occurrence of the
/// engine marker. Idempotent: an already-normalized label passes
/// through unchanged.
mod game_state_label {
    use serde::{Deserialize, Deserializer};

    use super::GAME_STATE_MARKER;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.to_lowercase().replace(GAME_STATE_MARKER, ""))
    }
}

/// Serde helper for [`Hero::name`]: removes every occurrence of the
/// engine marker from a non-null name.
mod hero_name {
    use serde::{Deserialize, Deserializer};

    use super::HERO_NAME_MARKER;

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|name| name.replace(HERO_NAME_MARKER, "")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_game_state_is_lowercased_and_stripped() {
        let map: MapState = serde_json::from_value(serde_json::json!({
            "name": "start", "matchid": "812397812", "game_time": 120,
            "clock_time": 95, "daytime": true, "nightstalker_night": false,
            "game_state": "DOTA_GAMERULES_STATE_GAME_IN_PROGRESS",
            "paused": false, "win_team": "none", "customgamename": "",
            "radiant_score": 3, "dire_score": 1, "ward_purchase_cooldown": 0
        }))
        .unwrap();
        assert_eq!(map.game_state, "game_in_progress");
    }

    #[test]
    fn hero_name_marker_removed() {
        let hero: Hero =
            serde_json::from_value(serde_json::json!({"name": "npc_dota_hero_axe"})).unwrap();
        assert_eq!(hero.name.as_deref(), Some("axe"));
    }

    #[test]
    fn hero_null_name_stays_null() {
        let hero: Hero = serde_json::from_value(serde_json::json!({"name": null})).unwrap();
        assert_eq!(hero.name, None);
    }

    #[test]
    fn hero_break_wire_alias() {
        let hero: Hero = serde_json::from_value(serde_json::json!({"break": true})).unwrap();
        assert_eq!(hero.break_state, Some(true));

        // Republished payloads use the internal name, not the keyword.
        let json = serde_json::to_string(&hero).unwrap();
        assert!(json.contains("\"break_state\":true"));
        assert!(!json.contains("\"break\":"));
    }

    #[test]
    fn hero_unreported_fields_serialize_as_null() {
        // Home Assistant value templates rely on a stable key set.
        let hero: Hero = serde_json::from_value(serde_json::json!({"id": 12})).unwrap();
        let json = serde_json::to_string(&hero).unwrap();
        assert!(json.contains("\"health\":null"));
        assert!(json.contains("\"talent_8\":null"));
    }

    #[test]
    fn provider_wrong_kind_rejected() {
        let result: Result<Provider, _> = serde_json::from_value(serde_json::json!({
            "appid": "570", "name": "Dota 2", "timestamp": 1, "version": 47
        }));
        assert!(result.is_err());
    }
}
