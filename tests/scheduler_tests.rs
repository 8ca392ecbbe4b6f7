use chrono::{DateTime, Duration, TimeZone, Utc};

use fixture_scheduler::config::SchedulerConfig;
use fixture_scheduler::model::fixture::Fixture;
use fixture_scheduler::scheduler::FixtureScheduler;

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, h, m, 0).unwrap()
}

fn fixture(id: &str, home: &str, away: &str, kickoff: DateTime<Utc>) -> Fixture {
    Fixture::new(id, home, away, Some(kickoff))
}

/// `count` back-to-back matches for `team` starting at `start`.
fn busy_every_two_hours(team: &str, start: DateTime<Utc>, count: i64) -> Vec<Fixture> {
    (0..count)
        .map(|k| {
            let kickoff = start + Duration::hours(2 * k);
            fixture(&format!("f{}", k), team, &format!("opp{}", k), kickoff)
        })
        .collect()
}

#[test]
fn overlapping_windows_conflict() {
    let s = FixtureScheduler::new(vec![fixture("f0", "A", "B", at(10, 0))]);

    assert!(s.has_conflict("A", Some(at(11, 0)), None));
    assert!(s.has_conflict("B", Some(at(9, 0)), None));
    // Away side counts too
    assert!(s.has_conflict("B", Some(at(11, 59)), None));
}

#[test]
fn disjoint_and_touching_windows_do_not_conflict() {
    let s = FixtureScheduler::new(vec![fixture("f0", "A", "B", at(10, 0))]);

    assert!(!s.has_conflict("A", Some(at(15, 0)), None));
    // Starts exactly when the existing window ends
    assert!(!s.has_conflict("A", Some(at(12, 0)), None));
    // Ends exactly when the existing window starts
    assert!(!s.has_conflict("A", Some(at(8, 0)), None));
}

#[test]
fn other_teams_and_unscheduled_fixtures_are_ignored() {
    let s = FixtureScheduler::new(vec![
        fixture("f0", "A", "B", at(10, 0)),
        Fixture::new("f1", "C", "D", None),
    ]);

    assert!(!s.has_conflict("C", Some(at(10, 0)), None));
    assert!(!s.has_conflict("E", Some(at(10, 0)), None));
}

#[test]
fn empty_team_or_missing_kickoff_never_conflicts() {
    let s = FixtureScheduler::new(vec![fixture("f0", "", "B", at(10, 0))]);

    assert!(!s.has_conflict("", Some(at(10, 0)), None));
    assert!(!s.has_conflict("B", None, None));
    assert_eq!(s.find_next_free_slot("B", "C", None, None), None);
}

#[test]
fn excluded_fixture_is_ignored() {
    let s = FixtureScheduler::new(vec![fixture("f0", "A", "B", at(10, 0))]);

    assert!(!s.has_conflict("A", Some(at(10, 30)), Some("f0")));
    assert_eq!(s.find_next_free_slot("A", "B", Some(at(10, 30)), Some("f0")), Some(at(10, 30)));
    // Excluding an unrelated id changes nothing
    assert!(s.has_conflict("A", Some(at(10, 30)), Some("f9")));
}

#[test]
fn free_instant_is_returned_unchanged() {
    let s = FixtureScheduler::new(vec![fixture("f0", "A", "B", at(10, 0))]);

    assert_eq!(s.find_next_free_slot("A", "C", Some(at(14, 0)), None), Some(at(14, 0)));
}

#[test]
fn next_slot_lands_on_touching_boundary() {
    let s = FixtureScheduler::new(vec![fixture("f0", "A", "X", at(10, 0))]);

    assert!(s.has_conflict("A", Some(at(11, 0)), None));
    assert_eq!(s.find_next_free_slot("A", "C", Some(at(11, 0)), None), Some(at(12, 0)));
}

#[test]
fn next_slot_steps_from_the_proposed_instant() {
    let s = FixtureScheduler::new(vec![fixture("f0", "A", "X", at(10, 0))]);

    // 12:00 is not on the 15 minute grid anchored at 10:10, so the first clear step is 12:10
    assert_eq!(s.find_next_free_slot("A", "C", Some(at(10, 10)), None), Some(at(12, 10)));
    // 90 minutes of clash, cleared exactly on a step
    assert_eq!(s.find_next_free_slot("A", "C", Some(at(10, 30)), None), Some(at(12, 0)));
}

#[test]
fn next_slot_must_clear_both_teams() {
    let s = FixtureScheduler::new(vec![
        fixture("f0", "A", "X", at(10, 0)),
        fixture("f1", "Y", "B", at(12, 0)),
    ]);

    assert_eq!(s.find_next_free_slot("A", "B", Some(at(11, 0)), None), Some(at(14, 0)));
}

#[test]
fn densely_packed_horizon_has_no_free_slot() {
    let start = at(0, 0);
    let s = FixtureScheduler::new(busy_every_two_hours("A", start, 26));

    assert_eq!(s.find_next_free_slot("A", "B", Some(start), None), None);
}

#[test]
fn horizon_end_is_not_a_candidate() {
    let start = at(0, 0);
    // Busy for exactly [start, start + 48h); start + 48h itself would be free
    let s = FixtureScheduler::new(busy_every_two_hours("A", start, 24));

    assert!(!s.has_conflict("A", Some(start + Duration::hours(48)), None));
    assert_eq!(s.find_next_free_slot("A", "B", Some(start), None), None);
}

#[test]
fn search_is_deterministic() {
    let s = FixtureScheduler::new(vec![
        fixture("f0", "A", "X", at(10, 0)),
        fixture("f1", "B", "Y", at(12, 30)),
    ]);

    let first = s.find_next_free_slot("A", "B", Some(at(11, 0)), None);
    let second = s.find_next_free_slot("A", "B", Some(at(11, 0)), None);
    assert_eq!(first, second);
    assert_eq!(first, Some(at(14, 30)));
}

#[test]
fn custom_config_changes_window_and_step() {
    let config = SchedulerConfig {
        match_duration_minutes: 90,
        slot_step_minutes: 45,
        search_horizon_hours: 6,
    };
    let s = FixtureScheduler::with_config(vec![fixture("f0", "A", "X", at(10, 0))], config);

    // 90 minute matches: 11:30 touches the end of f0
    assert!(!s.has_conflict("A", Some(at(11, 30)), None));
    // 11:00 clashes; next 45 minute step is 11:45
    assert_eq!(s.find_next_free_slot("A", "C", Some(at(11, 0)), None), Some(at(11, 45)));
}

#[test]
fn conflicts_for_lists_every_clash() {
    let s = FixtureScheduler::new(vec![
        fixture("f0", "A", "X", at(10, 0)),
        fixture("f1", "Y", "A", at(12, 30)),
        fixture("f2", "A", "Z", at(18, 0)),
    ]);

    let ids: Vec<&str> = s
        .conflicts_for("A", Some(at(11, 0)), None)
        .map(|f| f.id.as_str())
        .collect();
    assert_eq!(ids, vec!["f0", "f1"]);
}

#[test]
fn records_with_bad_kickoffs_load_as_unscheduled() {
    let raw = std::fs::read_to_string("tests/sample_fixtures.json")
        .expect("failed to read sample_fixtures.json");
    let records = serde_json::from_str(&raw).expect("sample deserializes");
    let s = FixtureScheduler::from_records(records, SchedulerConfig::default());

    assert_eq!(s.fixtures().len(), 6);
    assert_eq!(s.config(), &SchedulerConfig::default());
    assert_eq!(s.fixture("f5").unwrap().kickoff_at, None);
    assert_eq!(s.fixture("f6").unwrap().kickoff_at, Some(at(12, 0)));
    // f5 is unscheduled, so it never blocks the hawks
    assert!(!s.has_conflict("hawks", Some(at(0, 0)), None));
}
