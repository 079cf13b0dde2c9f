//! Scenario loading and export validation

use serde_json::{json, Value};

use parking_sim::simulation::{
    Cell, ConfigError, Direction, PathsPayload, Scenario, SimEvent, SimWorld, TimedEvent,
    VehicleId,
};

fn scenario(value: Value) -> Scenario {
    serde_json::from_value(value).expect("scenario deserializes")
}

fn line_scenario() -> Value {
    json!({
        "width": 4,
        "height": 1,
        "layout": [". R R ."],
        "lots": [
            { "x": 0, "y": 0, "exit": ["right"] },
            { "x": 3, "y": 0 }
        ],
        "assignments": [[0, 1]]
    })
}

#[test]
fn test_downtown_scenario_loads() {
    let scenario = Scenario::downtown().expect("built-in scenario is valid");
    assert_eq!(scenario.name, "downtown");
    assert_eq!(scenario.vehicle_count(), 8);
    assert_eq!(scenario.capacity_pool(), 8);

    let layout = scenario.parse_layout().expect("layout parses");
    assert!(!layout.roads.is_empty());
    assert!(!layout.obstacles.is_empty());

    let world = SimWorld::from_scenario(&scenario).expect("world builds");
    assert_eq!(world.width(), 12);
    assert_eq!(world.height(), 9);
    assert_eq!(world.vehicles().len(), 8);
    assert_eq!(world.lights().len(), 3);
    assert!(world.skipped_vehicles().is_empty());
}

#[test]
fn test_layout_rows_are_listed_top_first() {
    let scenario = scenario(json!({
        "width": 2,
        "height": 2,
        "layout": ["R #", "U ."],
        "assignments": []
    }));
    let layout = scenario.parse_layout().expect("layout parses");

    assert!(layout
        .roads
        .iter()
        .any(|(cell, dirs)| *cell == Cell::new(0, 1) && dirs.contains(Direction::Right)));
    assert!(layout
        .roads
        .iter()
        .any(|(cell, dirs)| *cell == Cell::new(0, 0) && dirs.contains(Direction::Up)));
    assert_eq!(layout.obstacles, vec![Cell::new(1, 1)]);
}

#[test]
fn test_multi_letter_tokens() {
    let scenario = scenario(json!({
        "width": 1,
        "height": 1,
        "layout": ["DL"]
    }));
    let layout = scenario.parse_layout().expect("layout parses");
    let (_, dirs) = layout.roads[0];
    assert!(dirs.contains(Direction::Down));
    assert!(dirs.contains(Direction::Left));
    assert_eq!(dirs.len(), 2);
}

#[test]
fn test_unknown_token_is_rejected() {
    let scenario = scenario(json!({
        "width": 2,
        "height": 1,
        "layout": ["R X"]
    }));
    match scenario.parse_layout() {
        Err(ConfigError::UnknownLayoutToken { row, column, token }) => {
            assert_eq!((row, column), (0, 1));
            assert_eq!(token, "X");
        }
        other => panic!("expected unknown token error, got {:?}", other),
    }
}

#[test]
fn test_layout_shape_is_checked() {
    let wrong_rows = scenario(json!({ "width": 2, "height": 2, "layout": ["R R"] }));
    assert!(matches!(
        wrong_rows.parse_layout(),
        Err(ConfigError::LayoutRowCount { expected: 2, got: 1 })
    ));

    let wrong_width = scenario(json!({ "width": 3, "height": 1, "layout": ["R R"] }));
    assert!(matches!(
        wrong_width.parse_layout(),
        Err(ConfigError::LayoutRowWidth { row: 0, expected: 3, got: 2 })
    ));

    let empty = scenario(json!({ "width": 0, "height": 1, "layout": [""] }));
    assert!(matches!(
        empty.parse_layout(),
        Err(ConfigError::InvalidDimensions { .. })
    ));
}

#[test]
fn test_entities_must_be_placed_on_the_grid() {
    let mut value = line_scenario();
    value["lots"][1]["x"] = json!(9);
    assert!(matches!(
        SimWorld::from_scenario(&scenario(value)),
        Err(ConfigError::OutOfBounds { what: "parking lot", .. })
    ));

    let mut value = line_scenario();
    value["lights"] = json!([{ "x": 1, "y": 3, "phase": "red" }]);
    assert!(matches!(
        SimWorld::from_scenario(&scenario(value)),
        Err(ConfigError::OutOfBounds { what: "traffic light", .. })
    ));

    let mut value = line_scenario();
    value["obstacles"] = json!([{ "x": 3, "y": 0 }]);
    assert!(matches!(
        SimWorld::from_scenario(&scenario(value)),
        Err(ConfigError::OnObstacle { what: "parking lot", .. })
    ));
}

#[test]
fn test_duplicate_lot_is_rejected() {
    let mut value = line_scenario();
    value["lots"][1]["x"] = json!(0);
    assert!(matches!(
        SimWorld::from_scenario(&scenario(value)),
        Err(ConfigError::DuplicateLot(cell)) if cell == Cell::new(0, 0)
    ));
}

#[test]
fn test_bad_json_is_a_config_error() {
    assert!(matches!(
        Scenario::from_json_str("{ \"width\": 3"),
        Err(ConfigError::Json(_))
    ));
    assert!(matches!(
        Scenario::from_path("/definitely/not/here.json"),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn test_paths_payload_shape() {
    let world = SimWorld::from_scenario(&scenario(line_scenario())).expect("world builds");
    let payload = PathsPayload::from_world(&world);
    let json = payload.to_json_pretty().expect("payload serializes");
    let value: Value = serde_json::from_str(&json).expect("payload is JSON");

    assert_eq!(
        value,
        json!({
            "carPaths": [{
                "id": 0,
                "path": [
                    { "x": 0, "z": 0 },
                    { "x": 1, "z": 0 },
                    { "x": 2, "z": 0 },
                    { "x": 3, "z": 0 }
                ]
            }]
        })
    );
}

#[test]
fn test_event_serialization() {
    let event = TimedEvent {
        tick: 3,
        event: SimEvent::Moved {
            vehicle: VehicleId(1),
            from: Cell::new(0, 0),
            to: Cell::new(1, 0),
        },
    };
    let value = serde_json::to_value(&event).expect("event serializes");
    assert_eq!(
        value,
        json!({
            "tick": 3,
            "type": "moved",
            "vehicle": 1,
            "from": { "x": 0, "y": 0 },
            "to": { "x": 1, "y": 0 }
        })
    );

    let terminated = serde_json::to_value(TimedEvent {
        tick: 9,
        event: SimEvent::Terminated,
    })
    .expect("event serializes");
    assert_eq!(terminated, json!({ "tick": 9, "type": "terminated" }));
}

#[test]
fn test_seed_round_trips_through_config() {
    let mut value = line_scenario();
    value["seed"] = json!(7);
    assert_eq!(scenario(value).seed, Some(7));
    assert_eq!(scenario(line_scenario()).seed, None);
}
