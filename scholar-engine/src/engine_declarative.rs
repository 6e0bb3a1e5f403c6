//! Declarative engine
//!
//! Both operations are iterator pipelines over a xot tree: descendants are
//! filtered and projected, and matching record nodes are moved as they are
//! into a new result document.

use xot::{NameId, Node, Xot};

use scholar_traits::{
    xml_trim, AttributeCollector, AttributeKey, Criteria, Error, FilterAttributes, MatchMode,
    Result, ScientistQuery, DEFAULT_MATCH_MODE, RECORD_ELEMENT, RESULTS_ELEMENT,
};

/// Interned element and attribute names used by the pipelines
struct Names {
    scientist: NameId,
    faculty: NameId,
    department: NameId,
    degree: NameId,
    rank: NameId,
    type_: NameId,
    title: NameId,
}

impl Names {
    fn new(xot: &mut Xot) -> Self {
        Self {
            scientist: xot.add_name(RECORD_ELEMENT),
            faculty: xot.add_name("Faculty"),
            department: xot.add_name("Department"),
            degree: xot.add_name("Degree"),
            rank: xot.add_name("Rank"),
            type_: xot.add_name("type"),
            title: xot.add_name("title"),
        }
    }
}

/// A parsed document with its names interned
struct Tree {
    xot: Xot,
    root: Node,
    names: Names,
}

impl Tree {
    fn parse(document: &str) -> Result<Self> {
        let mut xot = Xot::new();
        let root = xot.parse(document).map_err(|e| Error::parse(e.to_string()))?;
        let names = Names::new(&mut xot);
        Ok(Self { xot, root, names })
    }

    fn is_named(&self, node: Node, name: NameId) -> bool {
        self.xot.is_element(node) && self.xot.node_name(node) == Some(name)
    }

    /// Every element called `name`, in document order
    fn elements(&self, name: NameId) -> impl Iterator<Item = Node> + '_ {
        self.xot
            .descendants(self.root)
            .filter(move |&n| self.is_named(n, name))
    }

    /// First direct child element called `name`
    fn first_child(&self, node: Node, name: NameId) -> Option<Node> {
        self.xot.children(node).find(|&n| self.is_named(n, name))
    }

    /// XPath string value: all descendant text, concatenated
    fn string_value(&self, node: Node) -> String {
        self.xot
            .descendants(node)
            .filter_map(|n| self.xot.text_str(n))
            .collect()
    }

    fn attribute(&self, node: Node, name: NameId) -> Option<&str> {
        self.xot.get_attribute(node, name)
    }

    fn records(&self) -> impl Iterator<Item = Node> + '_ {
        let scientist = self.names.scientist;
        self.elements(scientist).filter(move |&n| {
            std::iter::successors(self.xot.parent(n), |&p| self.xot.parent(p))
                .all(|ancestor| !self.is_named(ancestor, scientist))
        })
    }

    /// Field value a single-valued criterion is compared against
    fn field(&self, record: Node, key: AttributeKey) -> String {
        match key {
            AttributeKey::Faculty => self.child_text(record, self.names.faculty),
            AttributeKey::Department => self.child_text(record, self.names.department),
            AttributeKey::DegreeType => self
                .first_child(record, self.names.degree)
                .and_then(|degree| self.attribute(degree, self.names.type_))
                .unwrap_or_default()
                .to_string(),
            AttributeKey::Rank => String::new(),
        }
    }

    fn child_text(&self, record: Node, name: NameId) -> String {
        self.first_child(record, name)
            .map(|child| xml_trim(&self.string_value(child)).to_string())
            .unwrap_or_default()
    }

    fn satisfies(&self, record: Node, key: AttributeKey, value: &str, mode: MatchMode) -> bool {
        match key {
            AttributeKey::Rank => self
                .xot
                .descendants(record)
                .filter(|&n| self.is_named(n, self.names.rank))
                .map(|rank| self.attribute(rank, self.names.title).unwrap_or_default())
                .any(|title| mode.matches_value(title, value)),
            _ => mode.matches_value(&self.field(record, key), value),
        }
    }
}

/// Declarative (LINQ-style) engine over xot
#[derive(Debug, Clone, Copy)]
pub struct DeclarativeEngine {
    mode: MatchMode,
}

impl Default for DeclarativeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclarativeEngine {
    pub fn new() -> Self {
        Self::with_mode(DEFAULT_MATCH_MODE)
    }

    pub fn with_mode(mode: MatchMode) -> Self {
        Self { mode }
    }
}

impl ScientistQuery for DeclarativeEngine {
    fn name(&self) -> &'static str {
        "Declarative (LINQ-style)"
    }

    fn match_mode(&self) -> MatchMode {
        self.mode
    }

    fn filter_attributes(&self, document: &str) -> Result<FilterAttributes> {
        let tree = Tree::parse(document)?;
        let names = &tree.names;
        let mut collector = AttributeCollector::new();

        tree.elements(names.faculty)
            .map(|n| tree.string_value(n))
            .for_each(|v| collector.insert(AttributeKey::Faculty, &v));
        tree.elements(names.department)
            .map(|n| tree.string_value(n))
            .for_each(|v| collector.insert(AttributeKey::Department, &v));
        tree.elements(names.degree)
            .filter_map(|n| tree.attribute(n, names.type_))
            .for_each(|v| collector.insert(AttributeKey::DegreeType, v));
        tree.elements(names.rank)
            .filter_map(|n| tree.attribute(n, names.title))
            .for_each(|v| collector.insert(AttributeKey::Rank, v));

        let attributes = collector.finish();
        tracing::debug!(
            strategy = self.name(),
            values = attributes.len(),
            "collected filter attributes"
        );
        Ok(attributes)
    }

    fn search(&self, document: &str, criteria: &Criteria) -> Result<String> {
        let mut tree = Tree::parse(document)?;
        let mode = self.mode;

        let matched: Vec<Node> = tree
            .records()
            .filter(|&record| {
                criteria
                    .iter()
                    .all(|(key, value)| tree.satisfies(record, key, value, mode))
            })
            .collect();
        tracing::debug!(strategy = self.name(), matched = matched.len(), "search complete");

        let xot = &mut tree.xot;
        let results_name = xot.add_name(RESULTS_ELEMENT);
        let results = xot.new_element(results_name);
        for record in matched {
            xot.append(results, record)
                .map_err(|e| Error::serialize(e.to_string()))?;
        }
        let doc = xot
            .new_document_with_element(results)
            .map_err(|e| Error::serialize(e.to_string()))?;
        xot.to_string(doc).map_err(|e| Error::serialize(e.to_string()))
    }
}
