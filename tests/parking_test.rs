//! Parking registry validation

use parking_sim::simulation::{distribute_capacity, Cell, LotId, ParkingRegistry};

#[test]
fn test_admit_until_full() {
    let mut parking = ParkingRegistry::new();
    let lot = parking.add_lot(Cell::new(0, 0), 2);

    assert!(parking.admit(lot));
    assert!(parking.admit(lot));
    assert!(!parking.admit(lot), "full lot must refuse admission");

    let status = parking.status();
    assert_eq!(status[&lot].occupancy, 2);
    assert_eq!(status[&lot].capacity, 2);
}

#[test]
fn test_release_on_empty_lot_is_noop() {
    let mut parking = ParkingRegistry::new();
    let lot = parking.add_lot(Cell::new(0, 0), 1);

    assert!(!parking.release(lot));
    assert_eq!(parking.lot(lot).map(|l| l.occupancy()), Some(0));

    assert!(parking.admit(lot));
    assert!(parking.release(lot));
    assert!(!parking.release(lot));
    assert_eq!(parking.lot(lot).map(|l| l.occupancy()), Some(0));
}

#[test]
fn test_unknown_lot_is_rejected() {
    let mut parking = ParkingRegistry::new();
    assert!(!parking.admit(LotId(3)));
    assert!(!parking.release(LotId(3)));
    assert!(parking.lot(LotId(3)).is_none());
}

#[test]
fn test_nearest_available_uses_manhattan_distance() {
    let mut parking = ParkingRegistry::new();
    let far = parking.add_lot(Cell::new(10, 10), 1);
    let near = parking.add_lot(Cell::new(2, 1), 1);

    let from = Cell::new(0, 0);
    assert_eq!(parking.nearest_available(from).map(|l| l.id), Some(near));

    assert!(parking.admit(near));
    assert_eq!(parking.nearest_available(from).map(|l| l.id), Some(far));
}

#[test]
fn test_nearest_available_ties_go_to_lowest_id() {
    let mut parking = ParkingRegistry::new();
    let first = parking.add_lot(Cell::new(0, 2), 1);
    let second = parking.add_lot(Cell::new(2, 0), 1);

    let from = Cell::new(0, 0);
    assert_eq!(parking.nearest_available(from).map(|l| l.id), Some(first));

    assert!(parking.admit(first));
    assert_eq!(parking.nearest_available(from).map(|l| l.id), Some(second));
}

#[test]
fn test_nearest_available_none_when_all_full() {
    let mut parking = ParkingRegistry::new();
    let a = parking.add_lot(Cell::new(0, 0), 1);
    let b = parking.add_lot(Cell::new(3, 3), 0);

    assert!(parking.admit(a));
    assert!(!parking.admit(b));
    assert!(parking.nearest_available(Cell::new(1, 1)).is_none());
    assert_eq!(parking.free_spaces(), 0);
}

#[test]
fn test_lot_lookup_by_position() {
    let mut parking = ParkingRegistry::new();
    let lot = parking.add_lot(Cell::new(4, 2), 3);

    assert_eq!(parking.lot_at(Cell::new(4, 2)), Some(lot));
    assert_eq!(parking.lot_at(Cell::new(2, 4)), None);
    assert_eq!(parking.len(), 1);
}

#[test]
fn test_capacity_pool_distribution() {
    assert_eq!(distribute_capacity(8, 6), vec![2, 2, 1, 1, 1, 1]);
    assert_eq!(distribute_capacity(3, 3), vec![1, 1, 1]);
    assert_eq!(distribute_capacity(2, 3), vec![1, 1, 0]);
    assert!(distribute_capacity(5, 0).is_empty());

    let spread = distribute_capacity(17, 4);
    assert_eq!(spread.iter().sum::<u32>(), 17);
}
