//! Tests for the record model and criteria matcher

use scholar_traits::{
    matches, AttributeCollector, AttributeKey, Criteria, MatchMode, Rank, ScientistRecord,
    DEFAULT_MATCH_MODE,
};

fn physicist() -> ScientistRecord {
    ScientistRecord {
        id: "s1".to_string(),
        full_name: "Marie Curie".to_string(),
        faculty: "Physics".to_string(),
        department: "Nuclear Physics".to_string(),
        degree_type: "PhD".to_string(),
        degree_value: "Doctor of Science".to_string(),
        ranks: vec![
            Rank::new("Lecturer", "1900-01-01"),
            Rank::new("Professor", "1906-11-05"),
        ],
    }
}

// ============== Criteria ==============

#[test]
fn empty_criteria_match_everything() {
    let criteria = Criteria::new();
    assert!(matches(&physicist(), &criteria, MatchMode::Exact));
    assert!(matches(&ScientistRecord::default(), &criteria, MatchMode::Exact));
    assert!(matches(&ScientistRecord::default(), &criteria, MatchMode::CaseInsensitiveContains));
}

#[test]
fn unknown_keys_are_ignored() {
    let criteria: Criteria = [("Faculty", "Physics"), ("Shoe size", "42")]
        .into_iter()
        .collect();
    assert_eq!(criteria.len(), 1);
    assert_eq!(criteria.get(AttributeKey::Faculty), Some("Physics"));
    assert!(matches(&physicist(), &criteria, MatchMode::Exact));
}

#[test]
fn insert_named_reports_unknown_key() {
    let mut criteria = Criteria::new();
    assert!(criteria.insert_named("Rank", "Dean"));
    assert!(!criteria.insert_named("rank", "Dean"), "keys are case-sensitive");
    assert_eq!(criteria.len(), 1);
}

// ============== Exact mode ==============

#[test]
fn exact_mode_trims_both_sides() {
    let criteria = Criteria::new().with(AttributeKey::Faculty, "  Physics\n");
    assert!(matches(&physicist(), &criteria, MatchMode::Exact));
}

#[test]
fn exact_mode_rejects_substring() {
    let criteria = Criteria::new().with(AttributeKey::Department, "Nuclear");
    assert!(!matches(&physicist(), &criteria, MatchMode::Exact));
}

#[test]
fn exact_mode_is_case_sensitive() {
    let criteria = Criteria::new().with(AttributeKey::Faculty, "physics");
    assert!(!matches(&physicist(), &criteria, MatchMode::Exact));
}

// ============== Contains mode ==============

#[test]
fn contains_mode_is_case_insensitive_substring() {
    let criteria = Criteria::new().with(AttributeKey::Department, "nuclear");
    assert!(matches(&physicist(), &criteria, MatchMode::CaseInsensitiveContains));
}

#[test]
fn contains_mode_fails_on_empty_field() {
    let mut record = physicist();
    record.faculty.clear();
    let criteria = Criteria::new().with(AttributeKey::Faculty, "Phys");
    assert!(!matches(&record, &criteria, MatchMode::CaseInsensitiveContains));
}

#[test]
fn default_mode_is_contains() {
    assert_eq!(DEFAULT_MATCH_MODE, MatchMode::CaseInsensitiveContains);
    assert_eq!(MatchMode::default(), DEFAULT_MATCH_MODE);
}

// ============== Rank and AND semantics ==============

#[test]
fn rank_matches_any_entry() {
    let record = physicist();
    let professor = Criteria::new().with(AttributeKey::Rank, "Professor");
    let dean = Criteria::new().with(AttributeKey::Rank, "Dean");
    assert!(matches(&record, &professor, MatchMode::Exact));
    assert!(!matches(&record, &dean, MatchMode::Exact));
    assert!(!matches(&record, &dean, MatchMode::CaseInsensitiveContains));
}

#[test]
fn rank_fails_without_ranks() {
    let mut record = physicist();
    record.ranks.clear();
    let criteria = Criteria::new().with(AttributeKey::Rank, "Professor");
    assert!(!matches(&record, &criteria, MatchMode::CaseInsensitiveContains));
}

#[test]
fn all_criteria_must_hold() {
    let criteria = Criteria::new()
        .with(AttributeKey::Faculty, "Physics")
        .with(AttributeKey::DegreeType, "MSc");
    assert!(!matches(&physicist(), &criteria, MatchMode::Exact));
    assert!(!matches(&physicist(), &criteria, MatchMode::CaseInsensitiveContains));

    let criteria = Criteria::new()
        .with(AttributeKey::Faculty, "Physics")
        .with(AttributeKey::DegreeType, "PhD");
    assert!(matches(&physicist(), &criteria, MatchMode::Exact));
}

// ============== Parsing ==============

#[test]
fn match_mode_from_str() {
    assert_eq!("exact".parse::<MatchMode>(), Ok(MatchMode::Exact));
    assert_eq!("Contains".parse::<MatchMode>(), Ok(MatchMode::CaseInsensitiveContains));
    assert!("fuzzy".parse::<MatchMode>().is_err());
}

#[test]
fn match_mode_serde_names() {
    let json = serde_json::to_string(&MatchMode::CaseInsensitiveContains).unwrap();
    assert_eq!(json, "\"contains\"");
    let mode: MatchMode = serde_json::from_str("\"exact\"").unwrap();
    assert_eq!(mode, MatchMode::Exact);
}

#[test]
fn attribute_key_round_trips_through_name() {
    for key in AttributeKey::ALL {
        assert_eq!(key.as_str().parse::<AttributeKey>(), Ok(key));
    }
    assert!("Title".parse::<AttributeKey>().is_err());
}

// ============== Attribute collection ==============

#[test]
fn collector_sorts_trims_and_dedups() {
    let mut collector = AttributeCollector::new();
    collector.insert(AttributeKey::Faculty, "Physics");
    collector.insert(AttributeKey::Faculty, " Chemistry ");
    collector.insert(AttributeKey::Faculty, "Physics");
    collector.insert(AttributeKey::Faculty, "   ");
    collector.insert(AttributeKey::Rank, "Professor");

    let attrs = collector.finish();
    assert_eq!(attrs.get(AttributeKey::Faculty), ["Chemistry", "Physics"]);
    assert_eq!(attrs.get(AttributeKey::Rank), ["Professor"]);
    assert!(attrs.get(AttributeKey::Department).is_empty());
    assert_eq!(attrs.len(), 3);
}

#[test]
fn filter_attributes_always_has_four_keys() {
    let attrs = AttributeCollector::new().finish();
    let map = attrs.to_map();
    assert_eq!(map.len(), 4);
    assert!(map.contains_key("DegreeType"));
    assert!(attrs.is_empty());

    let json = serde_json::to_value(&attrs).unwrap();
    assert!(json.get("Faculty").unwrap().as_array().unwrap().is_empty());
}
