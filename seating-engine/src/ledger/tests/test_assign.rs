use super::*;

#[test]
fn test_assign_sets_both_directions() {
    let mut ledger = create_ledger(vec![accepted(1, 0)], vec![table(1, 4)]);

    let events = ledger.assign(1, 1).unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].payload,
        LedgerEventPayload::GuestAssigned {
            guest_id: 1,
            table_id: 1
        }
    );
    assert_eq!(events[0].revision, 1);
    assert_eq!(events[0].event_id, EVENT);
    assert_eq!(ledger.revision(), 1);
    assert_eq!(seated_at(&ledger, 1), vec![1]);
    assert_eq!(ledger.guest(1).unwrap().table_assignment, Some(1));
    assert_consistent(&ledger);
}

#[test]
fn test_assign_capacity_exceeded() {
    let mut ledger = create_ledger(vec![accepted(1, 1)], vec![table(1, 1)]);

    let err = ledger.assign(1, 1).unwrap_err();

    assert!(matches!(
        err,
        SeatingError::CapacityExceeded {
            guest_id: 1,
            table_id: 1,
            required: 2,
            available: 1
        }
    ));
    assert_eq!(ledger.revision(), 0);
    assert!(seated_at(&ledger, 1).is_empty());
}

#[test]
fn test_assign_fills_table_exactly() {
    let mut ledger = create_ledger(
        vec![accepted(1, 2), accepted(2, 0), accepted(3, 0)],
        vec![table(1, 4)],
    );

    ledger.assign(1, 1).unwrap();
    ledger.assign(2, 1).unwrap();
    assert_eq!(ledger.occupancy(1).unwrap().available_seats, 0);
    assert!(matches!(
        ledger.assign(3, 1),
        Err(SeatingError::CapacityExceeded { available: 0, .. })
    ));
}

#[test]
fn test_assign_rejects_non_accepted_guest() {
    let mut declined = accepted(1, 0);
    declined.rsvp_status = RsvpStatus::Declined;
    let mut ledger = create_ledger(vec![declined], vec![table(1, 4)]);

    let err = ledger.assign(1, 1).unwrap_err();
    assert!(matches!(
        err,
        SeatingError::GuestNotEligible {
            guest_id: 1,
            status: RsvpStatus::Declined
        }
    ));
}

#[test]
fn test_assign_unknown_ids() {
    let mut ledger = create_ledger(vec![accepted(1, 0)], vec![table(1, 4)]);
    assert!(matches!(ledger.assign(9, 1), Err(SeatingError::GuestNotFound(9))));
    assert!(matches!(ledger.assign(1, 9), Err(SeatingError::TableNotFound(9))));
}

#[test]
fn test_reassign_leaves_guest_only_at_new_table() {
    let mut ledger = create_ledger(vec![accepted(1, 0)], vec![table(1, 4), table(2, 4)]);

    ledger.assign(1, 1).unwrap();
    let events = ledger.assign(1, 2).unwrap();

    assert_eq!(
        events[0].payload,
        LedgerEventPayload::GuestMoved {
            guest_id: 1,
            from_table_id: Some(1),
            to_table_id: 2
        }
    );
    assert!(seated_at(&ledger, 1).is_empty());
    assert_eq!(seated_at(&ledger, 2), vec![1]);
    assert_consistent(&ledger);
}

#[test]
fn test_assign_same_table_is_noop() {
    let mut ledger = create_ledger(vec![accepted(1, 0)], vec![table(1, 4)]);
    ledger.assign(1, 1).unwrap();

    let events = ledger.assign(1, 1).unwrap();
    assert!(events.is_empty());
    assert_eq!(ledger.revision(), 1);
}

#[test]
fn test_assign_own_seat_not_counted_twice() {
    // Guest listed at a full table but back-reference missing
    let mut guest = accepted(1, 1);
    guest.table_assignment = None;
    let mut t1 = table(1, 2);
    t1.assigned_guests = vec![1];
    let mut ledger = create_ledger(vec![guest], vec![t1]);

    ledger.assign(1, 1).unwrap();
    assert_eq!(seated_at(&ledger, 1), vec![1]);
    assert_consistent(&ledger);
}

#[test]
fn test_assign_repairs_duplicate_listing() {
    let mut guest = accepted(1, 0);
    guest.table_assignment = Some(1);
    let mut t1 = table(1, 4);
    t1.assigned_guests = vec![1];
    let mut t2 = table(2, 4);
    t2.assigned_guests = vec![1];
    let mut ledger = create_ledger(vec![guest], vec![t1, t2, table(3, 4)]);

    ledger.assign(1, 3).unwrap();

    assert!(seated_at(&ledger, 1).is_empty());
    assert!(seated_at(&ledger, 2).is_empty());
    assert_eq!(seated_at(&ledger, 3), vec![1]);
    assert_consistent(&ledger);
}

#[test]
fn test_assign_to_locked_table_allowed() {
    let mut locked = table(1, 4);
    locked.is_locked = true;
    let mut ledger = create_ledger(vec![accepted(1, 0)], vec![locked]);

    ledger.assign(1, 1).unwrap();
    assert_eq!(seated_at(&ledger, 1), vec![1]);
}

#[test]
fn test_unassign_is_idempotent() {
    let mut ledger = create_ledger(vec![accepted(1, 0)], vec![table(1, 4)]);
    ledger.assign(1, 1).unwrap();

    let first = ledger.unassign(1).unwrap();
    assert_eq!(
        first[0].payload,
        LedgerEventPayload::GuestUnassigned {
            guest_id: 1,
            table_id: 1
        }
    );
    let revision = ledger.revision();

    let second = ledger.unassign(1).unwrap();
    assert!(second.is_empty());
    assert_eq!(ledger.revision(), revision);
    assert!(ledger.guest(1).unwrap().table_assignment.is_none());
    assert_consistent(&ledger);
}

#[test]
fn test_unassign_non_accepted_guest() {
    let mut ledger = create_ledger(vec![accepted(1, 0)], vec![table(1, 4)]);
    ledger.assign(1, 1).unwrap();
    ledger
        .sync_guest(
            1,
            &GuestUpdate {
                rsvp_status: Some(RsvpStatus::Declined),
                ..Default::default()
            },
        )
        .unwrap();

    ledger.unassign(1).unwrap();
    assert!(seated_at(&ledger, 1).is_empty());
}

#[test]
fn test_move_guest() {
    let mut ledger = create_ledger(vec![accepted(1, 0)], vec![table(1, 4), table(2, 4)]);
    ledger.assign(1, 1).unwrap();

    let events = ledger.move_guest(1, 2).unwrap();
    assert_eq!(events[0].payload.name(), "GUEST_MOVED");
    assert_eq!(seated_at(&ledger, 2), vec![1]);
    assert_consistent(&ledger);
}

#[test]
fn test_move_unseated_guest_has_no_origin() {
    let mut ledger = create_ledger(vec![accepted(1, 0)], vec![table(1, 4)]);

    let events = ledger.move_guest(1, 1).unwrap();
    assert_eq!(
        events[0].payload,
        LedgerEventPayload::GuestMoved {
            guest_id: 1,
            from_table_id: None,
            to_table_id: 1
        }
    );
}

#[test]
fn test_failed_move_keeps_original_seat() {
    let mut ledger = create_ledger(
        vec![accepted(1, 0), accepted(2, 1)],
        vec![table(1, 4), table(2, 2)],
    );
    ledger.assign(1, 1).unwrap();
    ledger.assign(2, 2).unwrap();

    assert!(matches!(
        ledger.move_guest(1, 2),
        Err(SeatingError::CapacityExceeded { .. })
    ));
    assert_eq!(seated_at(&ledger, 1), vec![1]);
    assert_eq!(ledger.guest(1).unwrap().table_assignment, Some(1));
    assert_consistent(&ledger);
}

#[test]
fn test_clear_table() {
    let mut ledger = create_ledger(
        vec![accepted(1, 0), accepted(2, 0), accepted(3, 0)],
        vec![table(1, 4), table(2, 4)],
    );
    ledger.assign(1, 1).unwrap();
    ledger.assign(2, 1).unwrap();
    ledger.assign(3, 2).unwrap();

    let events = ledger.clear_table(1).unwrap();
    assert_eq!(
        events[0].payload,
        LedgerEventPayload::TableCleared {
            table_id: 1,
            guest_ids: vec![1, 2]
        }
    );
    assert!(seated_at(&ledger, 1).is_empty());
    assert_eq!(seated_at(&ledger, 2), vec![3]);
    assert!(ledger.guest(1).unwrap().table_assignment.is_none());
    assert_consistent(&ledger);

    assert!(ledger.clear_table(1).unwrap().is_empty());
}

#[test]
fn test_clear_table_repairs_dangling_back_reference() {
    let mut guest = accepted(1, 0);
    guest.table_assignment = Some(1);
    let mut ledger = create_ledger(vec![guest], vec![table(1, 4)]);

    let events = ledger.clear_table(1).unwrap();
    assert_eq!(events.len(), 1);
    assert!(ledger.guest(1).unwrap().table_assignment.is_none());
    assert_consistent(&ledger);
}

#[test]
fn test_events_share_revision_and_increase() {
    let mut ledger = create_ledger(vec![accepted(1, 0), accepted(2, 0)], vec![table(1, 4)]);
    let a = ledger.assign(1, 1).unwrap();
    let b = ledger.assign(2, 1).unwrap();
    assert!(b[0].revision > a[0].revision);
    assert!(b[0].timestamp >= a[0].timestamp);
}
