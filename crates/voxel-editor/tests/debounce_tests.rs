//! Tests for the commit debouncer.

use std::time::Duration;

use voxel_editor::debounce::Clock;
use voxel_editor::{Debouncer, ManualClock};

const WINDOW: Duration = Duration::from_millis(800);

#[test]
fn test_fires_once_after_quiet_window() {
    let clock = ManualClock::new();
    let mut debouncer = Debouncer::new(WINDOW);
    assert!(!debouncer.poll(clock.now()));

    debouncer.schedule(clock.now());
    clock.advance(Duration::from_millis(799));
    assert!(!debouncer.poll(clock.now()));
    clock.advance(Duration::from_millis(1));
    assert!(debouncer.poll(clock.now()));
    assert!(!debouncer.poll(clock.now()));
    assert!(!debouncer.is_pending());
}

#[test]
fn test_rescheduling_extends_deadline() {
    let clock = ManualClock::new();
    let mut debouncer = Debouncer::new(WINDOW);
    for _ in 0..5 {
        debouncer.schedule(clock.now());
        clock.advance(Duration::from_millis(500));
        assert!(!debouncer.poll(clock.now()));
    }
    clock.advance(Duration::from_millis(300));
    assert!(debouncer.poll(clock.now()));
}

#[test]
fn test_cancel() {
    let clock = ManualClock::new();
    let mut debouncer = Debouncer::new(WINDOW);
    assert!(!debouncer.cancel());
    debouncer.schedule(clock.now());
    assert!(debouncer.cancel());
    clock.advance(WINDOW);
    assert!(!debouncer.poll(clock.now()));
}

#[test]
fn test_manual_clock_clones_share_time() {
    let clock = ManualClock::new();
    let other = clock.clone();
    clock.advance(Duration::from_secs(2));
    assert_eq!(other.now(), Duration::from_secs(2));
}
