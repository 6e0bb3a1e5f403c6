//! Integration tests for scholar-engine
//!
//! Tests basic functionality of all three engines plus the serializer,
//! template transform, unified wrapper and consistency reporter.

use scholar_engine::transform::error_page;
use scholar_engine::{
    extract_records, serialize, Backend, ConsistencyReport, DeclarativeEngine, ScholarEngine,
    StreamingEngine, TemplateTransform, TreeEngine, DEFAULT_TEMPLATE,
};
use scholar_traits::{AttributeKey, Criteria, MatchMode, Rank, ScientistQuery, ScientistRecord};

const ROSTER: &str = include_str!("data/roster.xml");

const SINGLE_XML: &str = r#"<?xml version="1.0"?>
<Scientists>
    <Scientist id="7">
        <FullName>Lise Meitner</FullName>
        <Faculty>Physics</Faculty>
        <Department>Radiochemistry</Department>
        <Degree type="PhD">Physics</Degree>
        <Ranks>
            <Rank title="Lecturer" date="1922-01-01"/>
            <Rank title="Professor" date="1926-01-01"/>
        </Ranks>
    </Scientist>
</Scientists>"#;

fn engines(mode: MatchMode) -> Vec<Box<dyn ScientistQuery>> {
    vec![
        Box::new(StreamingEngine::with_mode(mode)),
        Box::new(TreeEngine::with_mode(mode)),
        Box::new(DeclarativeEngine::with_mode(mode)),
    ]
}

fn count(engine: &dyn ScientistQuery, criteria: &Criteria) -> usize {
    let xml = engine.search(SINGLE_XML, criteria).unwrap();
    extract_records(&xml).unwrap().len()
}

// ============== Search behaviour ==============

#[test]
fn single_record_rank_and_and_semantics() {
    for mode in [MatchMode::Exact, MatchMode::CaseInsensitiveContains] {
        for engine in engines(mode) {
            let engine = engine.as_ref();
            let professor = Criteria::new().with(AttributeKey::Rank, "Professor");
            let dean = Criteria::new().with(AttributeKey::Rank, "Dean");
            let physics_msc = Criteria::new()
                .with(AttributeKey::Faculty, "Physics")
                .with(AttributeKey::DegreeType, "MSc");

            assert_eq!(count(engine, &professor), 1, "{} ({mode})", engine.name());
            assert_eq!(count(engine, &dean), 0, "{} ({mode})", engine.name());
            assert_eq!(count(engine, &physics_msc), 0, "{} ({mode})", engine.name());
        }
    }
}

#[test]
fn no_match_yields_empty_collection() {
    let criteria = Criteria::new().with(AttributeKey::Faculty, "Astrology");
    for engine in engines(MatchMode::default()) {
        let xml = engine.search(ROSTER, &criteria).unwrap();
        assert!(xml.contains("ScientistsResults"), "{}: {xml}", engine.name());
        assert!(extract_records(&xml).unwrap().is_empty(), "{}: {xml}", engine.name());
    }

    let xml = StreamingEngine::new().search(ROSTER, &criteria).unwrap();
    assert_eq!(xml, "<ScientistsResults/>");
}

#[test]
fn search_all_returns_every_record() {
    for engine in engines(MatchMode::Exact) {
        let xml = engine.search_all(ROSTER).unwrap();
        let ids: Vec<String> = extract_records(&xml).unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["s1", "s2", "s3", "s4"], "{}", engine.name());
    }
}

#[test]
fn tree_engine_keeps_original_markup() {
    let criteria = Criteria::new().with(AttributeKey::Rank, "Reader");
    let xml = TreeEngine::new().search(ROSTER, &criteria).unwrap();
    assert!(xml.contains("Logic &amp; Computation"), "{xml}");
    assert!(xml.contains("<Ranks>"), "{xml}");
}

#[test]
fn nested_scientist_is_not_a_record() {
    let xml = r#"<Scientists>
        <Scientist id="outer">
            <Faculty>Biology</Faculty>
            <Students>
                <Scientist id="inner"><Faculty>Biology</Faculty></Scientist>
            </Students>
        </Scientist>
    </Scientists>"#;
    let criteria = Criteria::new().with(AttributeKey::Faculty, "Biology");
    for engine in engines(MatchMode::Exact) {
        let result = engine.search(xml, &criteria).unwrap();
        let ids: Vec<String> = extract_records(&result)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, ["outer"], "{}", engine.name());
    }
}

#[test]
fn first_field_occurrence_wins() {
    let xml = r#"<Scientists>
        <Scientist id="a">
            <Faculty>Law</Faculty>
            <Faculty>Medicine</Faculty>
        </Scientist>
    </Scientists>"#;
    let medicine = Criteria::new().with(AttributeKey::Faculty, "Medicine");
    for engine in engines(MatchMode::Exact) {
        let result = engine.search(xml, &medicine).unwrap();
        assert!(extract_records(&result).unwrap().is_empty(), "{}", engine.name());

        let attrs = engine.filter_attributes(xml).unwrap();
        assert_eq!(attrs.get(AttributeKey::Faculty), ["Law", "Medicine"], "{}", engine.name());
    }
}

// ============== Malformed input ==============

#[test]
fn malformed_documents_are_parse_errors() {
    let broken = [
        "",
        "<Scientists><Scientist id=\"1\">",
        "<Scientists><Faculty>Physics</Department></Scientists>",
        "<?xml version=\"1.0\"?><!DOCTYPE Scientists><Scientists>\
         <Scientist id=\"1\"><Faculty>Physics</Faculty></Scientist></Scientists>",
    ];
    for engine in engines(MatchMode::default()) {
        for doc in broken {
            let err = engine.filter_attributes(doc).unwrap_err();
            assert!(err.is_parse(), "{} on {doc:?}: {err}", engine.name());
            let err = engine.search(doc, &Criteria::new()).unwrap_err();
            assert!(err.is_parse(), "{} on {doc:?}: {err}", engine.name());
        }
    }
}

#[test]
fn streaming_rejects_content_outside_root() {
    let engine = StreamingEngine::new();
    for doc in ["<a/><b/>", "<a/>trailing", "leading<a/>"] {
        let err = engine.filter_attributes(doc).unwrap_err();
        assert!(err.is_parse(), "{doc:?}: {err}");
    }
    assert!(engine.filter_attributes("<?xml version=\"1.0\"?>\n<a/>\n<!-- end -->\n").is_ok());
}

// ============== Serializer ==============

#[test]
fn serializer_round_trips_records() {
    let records = vec![
        ScientistRecord {
            id: "x1".to_string(),
            full_name: "Grace <Hopper>".to_string(),
            faculty: "Computing & Maths".to_string(),
            degree_type: "PhD".to_string(),
            degree_value: "Mathematics".to_string(),
            ranks: vec![Rank::new("Rear \"Admiral\"", "1985-11-08")],
            ..ScientistRecord::default()
        },
        ScientistRecord {
            id: "x2".to_string(),
            ..ScientistRecord::default()
        },
    ];

    let xml = serialize(&records).unwrap();
    assert_eq!(extract_records(&xml).unwrap(), records);
}

#[test]
fn serializer_emits_empty_fields_and_ranks() {
    let xml = serialize(&[ScientistRecord::default()]).unwrap();
    for element in ["<FullName>", "<Faculty>", "<Department>", "<Degree type=\"\">", "<Ranks>"] {
        assert!(xml.contains(element), "missing {element} in {xml}");
    }
}

// ============== Template transform ==============

#[test]
fn default_template_renders_names() {
    let results = StreamingEngine::new().search_all(SINGLE_XML).unwrap();
    let html = TemplateTransform::render(&results, DEFAULT_TEMPLATE);
    assert!(html.contains("Lise Meitner"), "{html}");
    assert!(!html.contains("<h1>Error</h1>"), "{html}");
}

#[test]
fn malformed_template_renders_error_page() {
    let results = StreamingEngine::new().search_all(SINGLE_XML).unwrap();
    let html = TemplateTransform::render(&results, "<xsl:stylesheet version=\"1.0\"");
    assert!(html.contains("<h1>Error</h1>"), "{html}");
    assert!(TemplateTransform::try_render(&results, "not a stylesheet <").is_err());
}

#[test]
fn malformed_result_renders_error_page() {
    let html = TemplateTransform::render_default("<ScientistsResults>");
    assert!(html.starts_with("<html><body><h1>Error</h1>"), "{html}");
}

#[test]
fn error_page_escapes_message() {
    let html = error_page("unexpected <tag> & more");
    assert!(html.contains("unexpected &lt;tag&gt; &amp; more"), "{html}");
}

// ============== Unified engine ==============

#[test]
fn backend_names_parse() {
    assert_eq!("sax".parse::<Backend>(), Ok(Backend::Streaming));
    assert_eq!("Tree".parse::<Backend>(), Ok(Backend::Tree));
    assert_eq!("dom".parse::<Backend>(), Ok(Backend::Tree));
    assert_eq!("linq".parse::<Backend>(), Ok(Backend::Declarative));
    assert!("regex".parse::<Backend>().is_err());
}

#[test]
fn unified_engine_dispatches() {
    let engine = ScholarEngine::with_backend(Backend::Declarative, MatchMode::Exact);
    assert_eq!(engine.backend(), Backend::Declarative);
    assert_eq!(engine.name(), "Declarative (LINQ-style)");
    assert_eq!(engine.match_mode(), MatchMode::Exact);

    let names: Vec<&str> = ScholarEngine::all(MatchMode::default())
        .iter()
        .map(|e| e.name())
        .collect();
    assert_eq!(names, ["Streaming (SAX)", "Tree (XPath)", "Declarative (LINQ-style)"]);
}

// ============== Consistency report ==============

#[test]
fn report_shows_agreement() {
    let criteria = Criteria::new().with(AttributeKey::Faculty, "Physics");
    let report = ConsistencyReport::run(ROSTER, &criteria, MatchMode::CaseInsensitiveContains);

    assert!(report.is_consistent(), "{}", report.to_markdown());
    assert_eq!(report.strategies.len(), 3);
    for outcome in &report.strategies {
        assert_eq!(outcome.ids, ["s1", "s4"], "{}", outcome.name);
    }

    let md = report.to_markdown();
    assert!(md.contains("Faculty = \"Physics\""), "{md}");
    assert!(md.contains("Search results: agree"), "{md}");

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["results_agree"], true);
    assert_eq!(json["match_mode"], "contains");
}

#[test]
fn report_records_errors() {
    let report = ConsistencyReport::run("<Scientists>", &Criteria::new(), MatchMode::Exact);
    assert!(!report.is_consistent());
    assert!(report.strategies.iter().all(|s| s.error.is_some()));
}
