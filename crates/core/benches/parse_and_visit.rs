use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ldmlpath_core::{
    DataSource, DataSourceBuilder, InMemoryDataSource, Path, PathOrder, PathParser, PrefixContext,
    PrefixVisitor, Value, VisitorError,
};
use ldmlpath_schema_mock::ldml_schema;
use std::hint::black_box;

fn month_paths(calendars: usize) -> Vec<String> {
    let mut paths = Vec::new();
    for calendar in ["gregorian", "buddhist", "chinese", "coptic"].iter().take(calendars) {
        for context in ["format", "stand-alone"] {
            for width in ["abbreviated", "narrow", "wide"] {
                for month in 1..=12 {
                    paths.push(format!(
                        "//ldml/dates/calendars/calendar[@type=\"{calendar}\"]/months/monthContext[@type=\"{context}\"]/monthWidth[@type=\"{width}\"]/month[@type=\"{month}\"]"
                    ));
                }
            }
        }
    }
    paths
}

fn build_source(paths: &[String]) -> InMemoryDataSource {
    let mut builder = DataSourceBuilder::new(ldml_schema());
    for path in paths {
        builder.add(path, "x").unwrap();
    }
    builder.build().unwrap()
}

fn benchmark_parsing(c: &mut Criterion) {
    let parser = PathParser::new(ldml_schema());
    let paths = month_paths(4);

    let mut group = c.benchmark_group("parse");
    group.bench_function("independent", |b| {
        b.iter(|| {
            for path in &paths {
                black_box(parser.parse(black_box(path), None).unwrap());
            }
        });
    });
    // Sorted input shares all but the last element with its predecessor.
    group.bench_function("with_prefix_reuse", |b| {
        b.iter(|| {
            let mut previous: Option<Path> = None;
            for path in &paths {
                let (parsed, _) = parser.parse(black_box(path), previous.as_ref()).unwrap();
                previous = Some(parsed);
            }
            black_box(previous)
        });
    });
    group.finish();
}

struct Counter {
    prefixes: usize,
}

impl PrefixVisitor for Counter {
    fn visit_prefix_start(
        &mut self,
        prefix: &Path,
        context: &mut PrefixContext<'_>,
    ) -> Result<(), VisitorError> {
        self.prefixes += 1;
        if prefix.name() == "monthWidth" {
            context.install(|value: &Value| -> Result<(), VisitorError> {
                black_box(value.payload());
                Ok(())
            });
        }
        Ok(())
    }
}

fn benchmark_visitation(c: &mut Criterion) {
    let mut group = c.benchmark_group("visit");
    for calendars in [1, 4] {
        let source = build_source(&month_paths(calendars));
        group.bench_with_input(BenchmarkId::new("prefix", source.len()), &source, |b, source| {
            b.iter(|| {
                let mut counter = Counter { prefixes: 0 };
                source.accept_prefix(PathOrder::Dtd, &mut counter).unwrap();
                black_box(counter.prefixes)
            });
        });
        group.bench_with_input(BenchmarkId::new("sort", source.len()), &source, |b, source| {
            b.iter(|| {
                let mut paths: Vec<&Path> = source.values(PathOrder::Unordered).map(Value::path).collect();
                paths.reverse();
                paths.sort();
                black_box(paths.len())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_parsing, benchmark_visitation);
criterion_main!(benches);
