use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use ldmlpath_core::{AttributeKind, Schema};

use crate::MockSchemaError;

static LDML: LazyLock<Arc<MockSchema>> = LazyLock::new(|| Arc::new(MockSchema::default()));

/// Shared instance of the embedded LDML schema.
pub fn ldml_schema() -> Arc<dyn Schema> {
    Arc::clone(&*LDML) as Arc<dyn Schema>
}

/// How the values of one attribute are ordered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ValueOrder {
    #[default]
    Lexical,
    /// Integers by value; non-numeric values sort last.
    Numeric,
    /// Listed values in list order; unlisted values sort last.
    Enumerated(Vec<String>),
}

impl ValueOrder {
    fn compare(&self, lhs: &str, rhs: &str) -> Ordering {
        match self {
            ValueOrder::Lexical => lhs.cmp(rhs),
            ValueOrder::Numeric => match (lhs.parse::<i64>(), rhs.parse::<i64>()) {
                (Ok(l), Ok(r)) => l.cmp(&r),
                (Ok(_), Err(_)) => Ordering::Less,
                (Err(_), Ok(_)) => Ordering::Greater,
                (Err(_), Err(_)) => lhs.cmp(rhs),
            },
            ValueOrder::Enumerated(values) => {
                let position = |v: &str| values.iter().position(|x| x == v).unwrap_or(values.len());
                position(lhs).cmp(&position(rhs))
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct AttributeSpec {
    name: String,
    kind: AttributeKind,
    order: ValueOrder,
}

impl AttributeSpec {
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self { name: name.into(), kind, order: ValueOrder::Lexical }
    }

    pub fn distinguishing(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Distinguishing)
    }

    pub fn value(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Value)
    }

    pub fn metadata(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Metadata)
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order = ValueOrder::Enumerated(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_numeric_values(mut self) -> Self {
        self.order = ValueOrder::Numeric;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AttributeKind {
        self.kind
    }
}

#[derive(Clone, Debug)]
pub struct ElementSpec {
    name: String,
    ordered: bool,
    attributes: Vec<AttributeSpec>,
}

impl ElementSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ordered: false, attributes: Vec::new() }
    }

    pub fn with_attribute(mut self, attribute: AttributeSpec) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Siblings of this element carry an explicit sort index.
    pub fn with_ordered(mut self, ordered: bool) -> Self {
        self.ordered = ordered;
        self
    }
}

#[derive(Debug)]
struct Element {
    position: usize,
    ordered: bool,
    attributes: HashMap<String, AttributeSpec>,
}

/// A schema defined by tables: element order, attribute order and the
/// attributes each element declares.
#[derive(Debug)]
pub struct MockSchema {
    root: String,
    elements: HashMap<String, Element>,
    attribute_positions: HashMap<String, usize>,
}

impl MockSchema {
    pub fn builder(root: impl Into<String>) -> MockSchemaBuilder {
        MockSchemaBuilder {
            root: root.into(),
            attribute_order: Vec::new(),
            common: Vec::new(),
            elements: Vec::new(),
        }
    }

    fn attribute(&self, element: &str, attribute: &str) -> Option<&AttributeSpec> {
        self.elements.get(element)?.attributes.get(attribute)
    }

    fn attribute_position(&self, name: &str) -> usize {
        self.attribute_positions.get(name).copied().unwrap_or(usize::MAX)
    }

    fn element_position(&self, name: &str) -> usize {
        self.elements.get(name).map_or(usize::MAX, |e| e.position)
    }
}

impl Default for MockSchema {
    fn default() -> Self {
        const XML: &str = include_str!("../assets/ldml_schema.xml");
        Self::from_xml(XML).expect("embedded ldml_schema.xml could not be loaded")
    }
}

impl Schema for MockSchema {
    fn root_element(&self) -> &str {
        &self.root
    }

    fn compare_elements(&self, lhs: &str, rhs: &str) -> Ordering {
        self.element_position(lhs).cmp(&self.element_position(rhs))
    }

    fn compare_attributes(&self, lhs: &str, rhs: &str) -> Ordering {
        self.attribute_position(lhs).cmp(&self.attribute_position(rhs))
    }

    fn compare_attribute_values(&self, element: &str, attribute: &str, lhs: &str, rhs: &str) -> Ordering {
        match self.attribute(element, attribute) {
            Some(spec) => spec.order.compare(lhs, rhs),
            None => lhs.cmp(rhs),
        }
    }

    fn attribute_kind(&self, element: &str, attribute: &str) -> Option<AttributeKind> {
        self.attribute(element, attribute).map(AttributeSpec::kind)
    }

    fn is_ordered(&self, element: &str) -> bool {
        self.elements.get(element).is_some_and(|e| e.ordered)
    }

    fn is_known_element(&self, element: &str) -> bool {
        self.elements.contains_key(element)
    }
}

#[derive(Debug)]
pub struct MockSchemaBuilder {
    root: String,
    attribute_order: Vec<String>,
    common: Vec<AttributeSpec>,
    elements: Vec<ElementSpec>,
}

impl MockSchemaBuilder {
    /// Appends attribute names to the global attribute order.
    pub fn with_attribute_order<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attribute_order.extend(names.into_iter().map(Into::into));
        self
    }

    /// Declares an attribute on every element except the root.
    pub fn with_common_attribute(mut self, attribute: AttributeSpec) -> Self {
        self.common.push(attribute);
        self
    }

    /// Appends an element; elements are ordered by declaration.
    pub fn with_element(mut self, element: ElementSpec) -> Self {
        self.elements.push(element);
        self
    }

    pub fn build(self) -> Result<MockSchema, MockSchemaError> {
        let mut elements = HashMap::with_capacity(self.elements.len());
        for (position, spec) in self.elements.into_iter().enumerate() {
            let mut attributes = HashMap::new();
            if spec.name != self.root {
                for common in &self.common {
                    attributes.insert(common.name.clone(), common.clone());
                }
            }
            for attribute in spec.attributes {
                attributes.insert(attribute.name.clone(), attribute);
            }
            let element = Element { position, ordered: spec.ordered, attributes };
            if elements.insert(spec.name.clone(), element).is_some() {
                return Err(MockSchemaError::DuplicateElement(spec.name));
            }
        }
        if !elements.contains_key(&self.root) {
            return Err(MockSchemaError::MissingRoot(self.root));
        }
        let mut attribute_positions = HashMap::with_capacity(self.attribute_order.len());
        for (position, name) in self.attribute_order.into_iter().enumerate() {
            attribute_positions.entry(name).or_insert(position);
        }
        Ok(MockSchema { root: self.root, elements, attribute_positions })
    }
}
