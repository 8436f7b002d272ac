use std::cmp::Ordering;
use std::sync::Arc;

use ldmlpath_core::{AttributeKind, ParseError, PathParser, Schema, compare};
use rstest::{fixture, rstest};

use crate::{AttributeSpec, ElementSpec, MockSchema, MockSchemaError, ldml_schema};

#[fixture]
fn schema() -> Arc<dyn Schema> {
    ldml_schema()
}

#[rstest]
fn embedded_schema_classifies_attributes(schema: Arc<dyn Schema>) {
    assert_eq!(schema.root_element(), "ldml");
    assert_eq!(schema.attribute_kind("calendar", "type"), Some(AttributeKind::Distinguishing));
    assert_eq!(schema.attribute_kind("calendar", "alt"), Some(AttributeKind::Distinguishing));
    assert_eq!(schema.attribute_kind("rbnfrule", "value"), Some(AttributeKind::Value));
    assert_eq!(schema.attribute_kind("month", "draft"), Some(AttributeKind::Metadata));
    assert_eq!(schema.attribute_kind("ldml", "draft"), None);
    assert_eq!(schema.attribute_kind("months", "type"), None);
    assert!(schema.is_ordered("rbnfrule"));
    assert!(!schema.is_ordered("month"));
    assert!(schema.is_known_element("special"));
    assert!(!schema.is_known_element("icu:scripts"));
}

#[rstest]
#[case("identity", "dates", Ordering::Less)]
#[case("numbers", "dates", Ordering::Greater)]
#[case("special", "unknown", Ordering::Less)]
fn elements_follow_declaration_order(
    schema: Arc<dyn Schema>,
    #[case] lhs: &str,
    #[case] rhs: &str,
    #[case] expected: Ordering,
) {
    assert_eq!(schema.compare_elements(lhs, rhs), expected);
}

#[rstest]
#[case("calendar", "type", "gregorian", "buddhist", Ordering::Less)]
#[case("calendar", "type", "coptic", "zzz", Ordering::Less)]
#[case("month", "type", "2", "10", Ordering::Less)]
#[case("day", "type", "sun", "mon", Ordering::Less)]
#[case("currency", "type", "USD", "EUR", Ordering::Greater)]
fn attribute_values_use_declared_order(
    schema: Arc<dyn Schema>,
    #[case] element: &str,
    #[case] attribute: &str,
    #[case] lhs: &str,
    #[case] rhs: &str,
    #[case] expected: Ordering,
) {
    assert_eq!(schema.compare_attribute_values(element, attribute, lhs, rhs), expected);
}

#[rstest]
fn paths_sort_by_declared_value_order(schema: Arc<dyn Schema>) {
    let parser = PathParser::new(schema);
    let month = |n: u32| {
        let raw = format!(
            "//ldml/dates/calendars/calendar[@type=\"gregorian\"]/months/monthContext[@type=\"format\"]/monthWidth[@type=\"wide\"]/month[@type=\"{n}\"]"
        );
        parser.parse(&raw, None).unwrap().0
    };
    assert_eq!(compare(&month(2), &month(10)).unwrap(), Ordering::Less);

    let gregorian = parser.parse("//ldml/dates/calendars/calendar[@type=\"gregorian\"]", None).unwrap().0;
    let buddhist = parser.parse("//ldml/dates/calendars/calendar[@type=\"buddhist\"]", None).unwrap().0;
    assert!(gregorian < buddhist);
}

#[rstest]
fn unknown_attribute_is_rejected(schema: Arc<dyn Schema>) {
    let err = PathParser::new(schema).parse("//ldml/dates/calendars[@type=\"x\"]", None).unwrap_err();
    assert!(matches!(err, ParseError::UnknownAttribute { ref attribute, .. } if attribute == "type"));
}

#[rstest]
fn builder_assembles_schema() {
    let schema = MockSchema::builder("supplementalData")
        .with_attribute_order(["type", "draft"])
        .with_common_attribute(AttributeSpec::metadata("draft"))
        .with_element(ElementSpec::new("supplementalData"))
        .with_element(ElementSpec::new("plurals").with_attribute(AttributeSpec::distinguishing("type")))
        .with_element(
            ElementSpec::new("pluralRule")
                .with_ordered(true)
                .with_attribute(AttributeSpec::value("count").with_values(["zero", "one", "other"])),
        )
        .build()
        .unwrap();
    assert_eq!(schema.root_element(), "supplementalData");
    assert!(schema.is_ordered("pluralRule"));
    assert_eq!(schema.compare_attribute_values("pluralRule", "count", "one", "other"), Ordering::Less);
    assert_eq!(schema.attribute_kind("supplementalData", "draft"), None);
    assert_eq!(schema.attribute_kind("plurals", "draft"), Some(AttributeKind::Metadata));
}

#[rstest]
fn builder_rejects_missing_root() {
    let err = MockSchema::builder("ldml").with_element(ElementSpec::new("dates")).build().unwrap_err();
    assert!(matches!(err, MockSchemaError::MissingRoot(ref root) if root == "ldml"));
}

#[rstest]
fn builder_rejects_duplicate_elements() {
    let err = MockSchema::builder("ldml")
        .with_element(ElementSpec::new("ldml"))
        .with_element(ElementSpec::new("ldml"))
        .build()
        .unwrap_err();
    assert!(matches!(err, MockSchemaError::DuplicateElement(_)));
}

#[rstest]
#[case("<schema root=\"ldml\"><element name=\"ldml\"><attribute name=\"x\" kind=\"bogus\"/></element></schema>")]
#[case("<schema><element name=\"ldml\"/></schema>")]
#[case("<schema root=\"ldml\">")]
fn invalid_xml_is_reported(#[case] xml: &str) {
    assert!(MockSchema::from_xml(xml).is_err());
}
