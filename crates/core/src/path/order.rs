//! DTD order over paths of a single schema.
//!
//! Parents are compared first, so a path always sorts next to its siblings
//! and a strict prefix sorts immediately before its first descendant. Within
//! one element the order is: element name, sort index, then distinguishing
//! attributes pairwise in schema attribute order.

use std::cmp::Ordering;

use super::Path;
use crate::error::PathError;

/// Compares two paths in DTD order.
///
/// Fails if the paths belong to different schemas.
pub fn compare(lhs: &Path, rhs: &Path) -> Result<Ordering, PathError> {
    if lhs.root_element() != rhs.root_element() {
        return Err(PathError::SchemaMismatch { lhs: lhs.to_string(), rhs: rhs.to_string() });
    }
    Ok(compare_paths(lhs, rhs))
}

fn compare_paths(lhs: &Path, rhs: &Path) -> Ordering {
    if lhs.ptr_eq(rhs) {
        return Ordering::Equal;
    }
    match lhs.length().cmp(&rhs.length()) {
        Ordering::Equal => match (lhs.parent(), rhs.parent()) {
            (Some(lp), Some(rp)) => {
                compare_paths(lp, rp).then_with(|| compare_current_element(lhs, rhs))
            }
            // Roots share a name but may still carry distinguishing attributes.
            _ => compare_current_element(lhs, rhs),
        },
        // The shorter path comes first when it is a prefix of the longer one.
        Ordering::Less => rhs
            .ancestor(lhs.length())
            .map_or(Ordering::Less, |r| compare_paths(lhs, r).then(Ordering::Less)),
        Ordering::Greater => lhs
            .ancestor(rhs.length())
            .map_or(Ordering::Greater, |l| compare_paths(l, rhs).then(Ordering::Greater)),
    }
}

fn compare_current_element(lhs: &Path, rhs: &Path) -> Ordering {
    let schema = lhs.schema();
    let element = lhs.name();
    let ordering = schema
        .compare_elements(element, rhs.name())
        .then_with(|| element.cmp(rhs.name()))
        // Almost always None on both sides.
        .then_with(|| lhs.sort_index().cmp(&rhs.sort_index()));
    if ordering != Ordering::Equal {
        return ordering;
    }
    let (la, ra) = (lhs.attribute_list(), rhs.attribute_list());
    for ((lname, lvalue), (rname, rvalue)) in la.iter().zip(ra.iter()) {
        // Inverted: for lhs="foo[@a][@b]" and rhs="foo[@b]", rhs is missing
        // "a" and must sort first, although "a" < "b" in attribute order.
        let ordering = schema
            .compare_attributes(lname, rname)
            .then_with(|| (**lname).cmp(&**rname))
            .reverse();
        if ordering != Ordering::Equal {
            return ordering;
        }
        let ordering = schema
            .compare_attribute_values(element, lname, lvalue, rvalue)
            .then_with(|| lvalue.cmp(rvalue));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    // Elements with more attributes sort after those without.
    la.len().cmp(&ra.len())
}

impl Ord for Path {
    /// DTD order.
    ///
    /// # Panics
    ///
    /// Panics if the paths belong to different schemas. Use [`compare`] for
    /// a fallible comparison.
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl PartialOrd for Path {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::PathParser;
    use crate::testing::{other_schema, test_schema};
    use rstest::{fixture, rstest};

    #[fixture]
    fn parser() -> PathParser {
        PathParser::new(test_schema())
    }

    fn parse(parser: &PathParser, s: &str) -> Path {
        parser.parse(s, None).unwrap().0
    }

    #[rstest]
    #[case("//ldml/identity", "//ldml/dates")]
    #[case("//ldml/dates", "//ldml/dates/calendars")]
    #[case("//ldml/dates/calendars", "//ldml/numbers")]
    #[case(
        "//ldml/dates/calendars/calendar[@type=\"buddhist\"]",
        "//ldml/dates/calendars/calendar[@type=\"gregorian\"]"
    )]
    #[case("//ldml/rbnf/rule#2", "//ldml/rbnf/rule#10")]
    fn orders_in_schema_order(parser: PathParser, #[case] first: &str, #[case] second: &str) {
        let a = parse(&parser, first);
        let b = parse(&parser, second);
        assert_eq!(compare(&a, &b).unwrap(), Ordering::Less);
        assert_eq!(compare(&b, &a).unwrap(), Ordering::Greater);
    }

    #[rstest]
    fn missing_attribute_sorts_first(parser: PathParser) {
        // "type" precedes "alt" in attribute order.
        let with_both = parse(&parser, "//ldml/numbers/symbols[@type=\"latn\"][@alt=\"short\"]");
        let with_alt = parse(&parser, "//ldml/numbers/symbols[@alt=\"short\"]");
        let with_type = parse(&parser, "//ldml/numbers/symbols[@type=\"latn\"]");
        assert_eq!(compare(&with_alt, &with_both).unwrap(), Ordering::Less);
        assert_eq!(compare(&with_type, &with_both).unwrap(), Ordering::Less);
        assert_eq!(compare(&with_both, &with_alt).unwrap(), Ordering::Greater);
    }

    #[rstest]
    fn equal_paths_compare_equal(parser: PathParser) {
        let a = parse(&parser, "//ldml/numbers/symbols[@type=\"latn\"]");
        let b = parse(&parser, "//ldml/numbers/symbols[@type=\"latn\"]");
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }

    #[rstest]
    fn root_attributes_distinguish_paths(parser: PathParser) {
        let one = parse(&parser, "//ldml[@icu:x=\"1\"]/identity");
        let two = parse(&parser, "//ldml[@icu:x=\"2\"]/identity");
        let bare = parse(&parser, "//ldml/identity");
        assert_ne!(one, two);
        assert_eq!(compare(&one, &two).unwrap(), Ordering::Less);
        assert_eq!(compare(&two, &one).unwrap(), Ordering::Greater);
        assert_eq!(compare(&bare, &one).unwrap(), Ordering::Less);
        assert_eq!(compare(one.parent().unwrap(), &two).unwrap(), Ordering::Less);
    }

    #[rstest]
    fn different_schemas_are_rejected(parser: PathParser) {
        let a = parse(&parser, "//ldml/dates");
        let b = PathParser::new(other_schema()).parse("//supplementalData/dates", None).unwrap().0;
        assert!(matches!(compare(&a, &b), Err(PathError::SchemaMismatch { .. })));
    }

    #[rstest]
    #[should_panic(expected = "different schema types")]
    fn ord_panics_on_schema_mismatch(parser: PathParser) {
        let a = parse(&parser, "//ldml/dates");
        let b = PathParser::new(other_schema()).parse("//supplementalData/dates", None).unwrap().0;
        let _ = a.cmp(&b);
    }
}
