fn main() {
    println!("Run `cargo test -p snapshot-compat` to execute snapshot compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use serde_json::Value;

    use gsibridge_gamestate::GameState;
    use gsibridge_mqtt::outbound_messages;

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a captured game-client payload as a `serde_json::Value`.
    fn load_fixture(name: &str) -> Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    fn normalize_fixture(name: &str) -> GameState {
        GameState::from_snapshot(load_fixture(name))
            .unwrap_or_else(|e| panic!("fixture {name} should validate: {e}"))
    }

    // --- In-match payload ---

    #[test]
    fn full_snapshot_validates() {
        let state = normalize_fixture("full_snapshot.json");
        assert!(state.provider.is_some());
        assert!(state.map.is_some());
        assert!(state.player.is_some());
        assert!(state.hero.is_some());
        assert!(state.abilities.is_some());
        assert!(state.items.is_some());
        assert!(state.auth.is_some());
    }

    #[test]
    fn full_snapshot_is_normalized() {
        let state = normalize_fixture("full_snapshot.json");

        let map = state.map.as_ref().unwrap();
        assert_eq!(map.game_state, "game_in_progress");

        let hero = state.hero.as_ref().unwrap();
        assert_eq!(hero.name.as_deref(), Some("invoker"));
        assert_eq!(hero.break_state, Some(false));
        assert_eq!(hero.xpos, Some(-1712));
    }

    #[test]
    fn full_snapshot_drops_unknown_sections() {
        // The client also reports `buildings` and `previously`; the
        // bridge has no consumers for them.
        let state = normalize_fixture("full_snapshot.json");
        let round_trip = serde_json::to_value(&state).unwrap();
        assert!(round_trip.get("buildings").is_none());
        assert!(round_trip.get("previously").is_none());
    }

    #[test]
    fn full_snapshot_fans_out_three_topics() {
        let state = normalize_fixture("full_snapshot.json");
        let mut topics: Vec<String> = outbound_messages(&state, "dota2")
            .into_iter()
            .map(|m| m.topic)
            .collect();
        topics.sort();
        assert_eq!(topics, ["dota2/hero", "dota2/map", "dota2/player"]);
    }

    #[test]
    fn published_hero_payload_keeps_internal_names() {
        let state = normalize_fixture("full_snapshot.json");
        let messages = outbound_messages(&state, "dota2");
        let hero = messages.iter().find(|m| m.topic == "dota2/hero").unwrap();
        let payload: Value = serde_json::from_slice(&hero.payload).unwrap();

        assert_eq!(payload["name"], "invoker");
        assert_eq!(payload["break_state"], false);
        assert!(payload.get("break").is_none());
    }

    // --- Main-menu payload (no hero controlled) ---

    #[test]
    fn menu_snapshot_has_no_hero() {
        let state = normalize_fixture("menu_snapshot.json");
        assert_eq!(state.hero, None);
        assert_eq!(state.map.as_ref().unwrap().game_state, "init");
    }

    #[test]
    fn menu_snapshot_publishes_only_map() {
        let state = normalize_fixture("menu_snapshot.json");
        let messages = outbound_messages(&state, "dota2");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].topic, "dota2/map");
    }

    // --- Delta payload (hero fields only) ---

    #[test]
    fn partial_hero_snapshot_validates() {
        let state = normalize_fixture("partial_hero_snapshot.json");
        let hero = state.hero.unwrap();
        assert_eq!(hero.id, Some(14));
        assert_eq!(hero.health, Some(412));
        assert_eq!(hero.name, None);
        assert_eq!(hero.max_health, None);
    }

    // --- Rejected payload ---

    #[test]
    fn malformed_player_rejects_whole_snapshot() {
        // `gold` is missing; the otherwise-valid hero section must not
        // slip through either.
        let err = GameState::from_snapshot(load_fixture("malformed_player_snapshot.json"))
            .unwrap_err();
        assert_eq!(err.section(), Some("player"));
    }
}
