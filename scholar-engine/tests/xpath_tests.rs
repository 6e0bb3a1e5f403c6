//! Tests for XPath record query construction

use scholar_engine::xpath::{string_literal, RecordQuery};
use scholar_traits::{AttributeKey, Criteria, MatchMode};

#[test]
fn literal_doubles_single_quotes() {
    assert_eq!(string_literal("O'Brien"), "'O''Brien'");
    assert_eq!(string_literal("say \"hi\""), "'say \"hi\"'");
    assert_eq!(string_literal(""), "''");
}

#[test]
fn empty_criteria_select_all_records() {
    let criteria = Criteria::new();
    let query = RecordQuery::new(&criteria, MatchMode::Exact);
    assert_eq!(query.to_xpath(), "//Scientist[not(ancestor::Scientist)]");
}

#[test]
fn one_predicate_per_criterion() {
    let criteria = Criteria::new()
        .with(AttributeKey::Faculty, "Physics")
        .with(AttributeKey::Department, "Optics");
    let xpath = RecordQuery::new(&criteria, MatchMode::Exact).to_xpath();
    assert_eq!(xpath.matches("][").count(), 2, "{xpath}");
    assert!(xpath.contains("string(Faculty[1])"), "{xpath}");
    assert!(xpath.contains("string(Department[1])"), "{xpath}");
}

#[test]
fn rank_predicate_is_existential() {
    let criteria = Criteria::new().with(AttributeKey::Rank, " Dean ");
    let xpath = RecordQuery::new(&criteria, MatchMode::CaseInsensitiveContains).to_xpath();
    assert!(
        xpath.ends_with("[.//Rank[contains(lower-case(string(@title)), 'dean')]]"),
        "{xpath}"
    );
}

#[test]
fn exact_predicate_trims_field() {
    let criteria = Criteria::new().with(AttributeKey::DegreeType, "PhD");
    let xpath = RecordQuery::new(&criteria, MatchMode::Exact).to_xpath();
    assert!(
        xpath.contains(r"replace(string(Degree[1]/@type), '^\s+|\s+$', '') = 'PhD'"),
        "{xpath}"
    );
}

#[test]
fn hostile_value_stays_inside_literal() {
    let criteria = Criteria::new().with(AttributeKey::Faculty, "x'] | //*['");
    let xpath = RecordQuery::new(&criteria, MatchMode::Exact).to_xpath();
    assert!(xpath.ends_with("= 'x''] | //*['''']"), "{xpath}");
}
