use parking_sim::simulation::{
    Cell, LightId, LightPhase, SimTrafficLight, GREEN_TICKS, RED_TICKS, YELLOW_TICKS,
};

#[test]
fn test_phase_durations() {
    assert_eq!(LightPhase::Green.duration(), GREEN_TICKS);
    assert_eq!(LightPhase::Yellow.duration(), YELLOW_TICKS);
    assert_eq!(LightPhase::Red.duration(), RED_TICKS);
    assert_eq!((GREEN_TICKS, YELLOW_TICKS, RED_TICKS), (5, 2, 5));
}

#[test]
fn test_light_cycles_green_yellow_red() {
    let mut light = SimTrafficLight::new(LightId(0), Cell::new(0, 0), LightPhase::Green);

    let mut changes = Vec::new();
    for tick in 1..=24u32 {
        if let Some(phase) = light.advance() {
            changes.push((tick, phase));
        }
    }

    assert_eq!(
        changes,
        vec![
            (5, LightPhase::Yellow),
            (7, LightPhase::Red),
            (12, LightPhase::Green),
            (17, LightPhase::Yellow),
            (19, LightPhase::Red),
            (24, LightPhase::Green),
        ]
    );
}

#[test]
fn test_counter_resets_on_change() {
    let mut light = SimTrafficLight::new(LightId(1), Cell::new(2, 3), LightPhase::Yellow);

    assert_eq!(light.advance(), None);
    assert_eq!(light.ticks_in_phase(), 1);
    assert_eq!(light.advance(), Some(LightPhase::Red));
    assert_eq!(light.ticks_in_phase(), 0);
    assert!(light.is_red());
}

#[test]
fn test_only_red_is_red() {
    for phase in [LightPhase::Green, LightPhase::Yellow] {
        let light = SimTrafficLight::new(LightId(0), Cell::new(0, 0), phase);
        assert!(!light.is_red());
    }
    assert!(SimTrafficLight::new(LightId(0), Cell::new(0, 0), LightPhase::Red).is_red());
}
