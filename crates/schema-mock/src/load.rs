use ldmlpath_core::AttributeKind;
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::{AttributeSpec, ElementSpec, MockSchema, MockSchemaError};

#[derive(Debug, Deserialize)]
struct XmlSchema {
    #[serde(rename = "@root")]
    root: String,
    #[serde(rename = "attribute", default)]
    attributes: Vec<XmlAttribute>,
    #[serde(rename = "element", default)]
    elements: Vec<XmlElement>,
}

#[derive(Debug, Deserialize)]
struct XmlElement {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@ordered")]
    ordered: Option<bool>,
    #[serde(rename = "attribute", default)]
    attributes: Vec<XmlAttribute>,
}

#[derive(Debug, Deserialize)]
struct XmlAttribute {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@kind")]
    kind: Option<String>,
    #[serde(rename = "@values")]
    values: Option<String>,
    #[serde(rename = "@numeric")]
    numeric: Option<bool>,
}

impl MockSchema {
    /// Loads a schema description.
    ///
    /// Top-level `<attribute>` entries define the attribute order; those with
    /// a `kind` are declared on every non-root element. `<element>` entries
    /// are in element order.
    pub fn from_xml(xml: &str) -> Result<Self, MockSchemaError> {
        let parsed: XmlSchema = from_str(xml)?;
        let mut builder = MockSchema::builder(parsed.root)
            .with_attribute_order(parsed.attributes.iter().map(|a| a.name.clone()));
        for attribute in parsed.attributes {
            if attribute.kind.is_some() {
                builder = builder.with_common_attribute(build_attribute(attribute)?);
            }
        }
        for element in parsed.elements {
            let mut spec = ElementSpec::new(element.name).with_ordered(element.ordered.unwrap_or(false));
            for attribute in element.attributes {
                spec = spec.with_attribute(build_attribute(attribute)?);
            }
            builder = builder.with_element(spec);
        }
        builder.build()
    }
}

fn build_attribute(attribute: XmlAttribute) -> Result<AttributeSpec, MockSchemaError> {
    let kind = match attribute.kind.as_deref() {
        Some("distinguishing") => AttributeKind::Distinguishing,
        Some("value") => AttributeKind::Value,
        Some("metadata") | None => AttributeKind::Metadata,
        Some(other) => {
            return Err(MockSchemaError::UnknownKind {
                attribute: attribute.name,
                kind: other.to_owned(),
            });
        }
    };
    let mut spec = AttributeSpec::new(attribute.name, kind);
    if let Some(values) = attribute.values.as_deref() {
        spec = spec.with_values(values.split_whitespace());
    } else if attribute.numeric.unwrap_or(false) {
        spec = spec.with_numeric_values();
    }
    Ok(spec)
}
