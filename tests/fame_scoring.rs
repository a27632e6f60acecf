use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use star_power::billing::select_top_billed;
use star_power::normalize::parse_cast;
use star_power::{
    build_history_index, compute_fame_score, corpus, score_corpus, FameConfig, HistoryIndex, MovieRecord,
    TimelineBuilder,
};
use std::io::Write;

fn movie(id: &str, release: &str, revenue: f64, cast: &[&str]) -> MovieRecord {
    let cast: Vec<Value> = cast.iter().enumerate().map(|(i, n)| json!({"name": n, "order": i})).collect();
    MovieRecord {
        id: id.into(),
        release_date: Some(json!(release)),
        revenue: Some(json!(revenue)),
        cast: Some(Value::Array(cast)),
        ..Default::default()
    }
}

fn date(s: &str) -> chrono::NaiveDate {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn assert_same_index(a: &HistoryIndex, b: &HistoryIndex) {
    let mut actors_a: Vec<_> = a.actors().collect();
    let mut actors_b: Vec<_> = b.actors().collect();
    actors_a.sort_unstable();
    actors_b.sort_unstable();
    assert_eq!(actors_a, actors_b);
    for actor in actors_a {
        let left = a.timeline(actor).unwrap().entries();
        let right = b.timeline(actor).unwrap().entries();
        assert_eq!(left.len(), right.len(), "timeline length for {actor}");
        for (l, r) in left.iter().zip(right) {
            assert_eq!(l.date, r.date);
            assert_eq!(l.revenue.to_bits(), r.revenue.to_bits());
        }
    }
    assert_eq!(a.stats(), b.stats());
}

/// A corpus with plenty of shared actors and same-day releases.
fn busy_corpus() -> Vec<MovieRecord> {
    let actors = ["Ann", "Bo", "Cy", "Di", "Ed", "Flo"];
    let mut rng = StdRng::seed_from_u64(7);
    (0..300)
        .map(|i| {
            let year = rng.gen_range(2000..2016);
            let month = rng.gen_range(1..=12);
            let day = rng.gen_range(1..=28);
            let cast: Vec<&str> = (0..rng.gen_range(0..5)).map(|_| actors[rng.gen_range(0..actors.len())]).collect();
            let revenue = if i % 11 == 0 { 0.0 } else { rng.gen_range(1.0..1e9) };
            movie(&format!("m{i}"), &format!("{year}-{month:02}-{day:02}"), revenue, &cast)
        })
        .collect()
}

#[test]
fn windowed_average_example() {
    let records = vec![
        movie("a", "2010-01-01", 100.0, &["X"]),
        movie("b", "2011-06-01", 200.0, &["X"]),
        movie("c", "2013-01-01", 400.0, &["X"]),
    ];
    let index = build_history_index(&records);
    assert_eq!(index.score("X", date("2013-06-01")), 300.0);
}

#[test]
fn never_reads_the_reference_day_or_later() {
    let records = busy_corpus();
    let index = build_history_index(&records);
    let window = index.config().window_days;
    for actor in index.actors() {
        let entries = index.timeline(actor).unwrap().entries();
        for reference in entries.iter().map(|e| e.date) {
            let expected: Vec<f64> = entries
                .iter()
                .filter(|e| reference - chrono::Duration::days(window) <= e.date && e.date < reference)
                .map(|e| e.revenue)
                .collect();
            let expected = if expected.is_empty() { 0.0 } else { expected.iter().sum::<f64>() / expected.len() as f64 };
            assert_eq!(index.score(actor, reference), expected, "{actor} at {reference}");
        }
    }
}

#[test]
fn actor_without_history_scores_zero() {
    let index = build_history_index(&[]);
    assert_eq!(index.score("Nobody", date("2015-01-01")), 0.0);
}

#[test]
fn single_appearance_does_not_score_itself() {
    let records = vec![movie("only", "2014-08-01", 9_000_000.0, &["Lone"])];
    let index = build_history_index(&records);
    assert_eq!(compute_fame_score(&index, &records[0]), 0.0);
}

#[test]
fn scoring_is_repeatable() {
    let records = busy_corpus();
    let index = build_history_index(&records);
    for record in &records {
        let first = compute_fame_score(&index, record);
        assert_eq!(first.to_bits(), compute_fame_score(&index, record).to_bits());
        assert!(first >= 0.0);
    }
    let batch = score_corpus(&index, &records, indicatif::ProgressBar::hidden());
    for scored in &batch {
        assert_eq!(scored.id, records[scored.position].id);
        assert_eq!(scored.fame.to_bits(), compute_fame_score(&index, &records[scored.position]).to_bits());
    }
}

#[test]
fn billing_takes_first_three_by_order() {
    let cast = parse_cast(Some(&json!([
        {"name": "A", "order": 0},
        {"name": "B", "order": 1},
        {"name": "C", "order": 2},
        {"name": "D", "order": 3}
    ])))
    .unwrap();
    let names: Vec<_> = select_top_billed(&cast, 3).iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn unreadable_cast_scores_zero_and_adds_nothing() {
    let mut broken = movie("broken", "2012-01-01", 1e6, &[]);
    broken.cast = Some(json!("[{'name': 'A', 'order': 0"));
    let records = vec![movie("prior", "2011-01-01", 5e5, &["A"]), broken];
    let index = build_history_index(&records);
    assert_eq!(compute_fame_score(&index, &records[1]), 0.0);
    assert_eq!(index.timeline("A").unwrap().entries().len(), 1);
    assert_eq!(index.stats().records_indexed, 1);
}

#[test]
fn excluded_movies_still_feed_history() {
    // Revenue-less movies get a score; positive-revenue movies outside any
    // later sample still count as prior work.
    let records = vec![
        movie("foreign", "2006-05-01", 800.0, &["Star"]),
        movie("target", "2008-03-01", 0.0, &["Star", "Newcomer"]),
    ];
    let index = build_history_index(&records);
    assert_eq!(compute_fame_score(&index, &records[1]), 400.0);
}

#[test]
fn any_partitioning_matches_sequential_build() {
    let records = busy_corpus();
    let config = FameConfig::default();
    let sequential = HistoryIndex::build(&records, config);

    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..5 {
        let parts = rng.gen_range(1..9);
        let mut builders: Vec<TimelineBuilder> = (0..parts).map(|_| TimelineBuilder::new(config)).collect();
        for (position, record) in records.iter().enumerate() {
            builders[rng.gen_range(0..parts)].ingest(position, record);
        }
        // merge in a shuffled order too
        while builders.len() > 1 {
            let i = rng.gen_range(0..builders.len());
            let taken = builders.swap_remove(i);
            let j = rng.gen_range(0..builders.len());
            let other = builders.swap_remove(j);
            builders.push(taken.merge(other));
        }
        let merged = builders.pop().unwrap().finish();
        assert_same_index(&merged, &sequential);
    }

    for partitions in [1, 2, 7, 64] {
        let parallel = HistoryIndex::build_parallel(&records, config, partitions, indicatif::ProgressBar::hidden());
        assert_same_index(&parallel, &sequential);
    }
}

#[test]
fn corpus_round_trip_through_files() {
    let mut input = tempfile::NamedTempFile::new().unwrap();
    writeln!(input, r#"{{"id": 1, "title": "First", "release_date": "2009-01-01", "revenue": "1000", "cast": "[{{'name': 'Q', 'order': 0}}]"}}"#).unwrap();
    writeln!(input, r#"{{"id": 2, "title": "Second", "release_date": "2010-01-01", "revenue": 0, "cast": "[{{'name': 'Q', 'order': 0}}]"}}"#).unwrap();

    let records = corpus::read_corpus(input.path()).unwrap();
    let index = build_history_index(&records);
    let scores = score_corpus(&index, &records, indicatif::ProgressBar::hidden());

    let output = tempfile::NamedTempFile::new().unwrap();
    assert_eq!(corpus::write_scored(output.path(), &records, &scores).unwrap(), 2);

    let rows: Vec<Value> = std::fs::read_to_string(output.path())
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(rows[0]["title"], json!("First"));
    assert_eq!(rows[0]["actor_fame"], json!(0.0));
    assert_eq!(rows[1]["id"], json!(2));
    assert_eq!(rows[1]["actor_fame"], json!(1000.0));
    assert_eq!(rows[1]["actor_fame_log"], json!(1000f64.ln_1p()));
}
