use catalog_lens::data::aggregate::DurationPolicy;
use catalog_lens::data::loader::parse_csv;
use catalog_lens::{
    compute, Catalog, CatalogRow, ContentType, CountryMatch, DashboardOptions, FilterSelection,
};

const SCENARIO: &str = "\
type,title,country,release_year,listed_in,duration
Movie,First,USA,2020,\"Action, Comedy\",90 min
TV Show,Second,India,2019,Drama,2 Seasons
Movie,Third,\"USA,UK\",2021,Comedy,100 min
";

fn scenario() -> Catalog {
    parse_csv(SCENARIO.as_bytes()).unwrap()
}

/// A larger catalog with multi-country rows, missing countries and a
/// malformed duration.
fn mixed_catalog() -> Catalog {
    let countries = [Some("United States"), Some("India, United States"), None, Some("France")];
    let genres = ["Dramas", "Comedies, Dramas", "Documentaries", "Action & Adventure, Comedies"];
    let rows = (0..40)
        .map(|i| {
            let content_type = if i % 3 == 0 { ContentType::TvShow } else { ContentType::Movie };
            let duration = match (content_type, i) {
                (ContentType::TvShow, _) => "1 Season".to_string(),
                (_, 7) => "7".to_string(),
                _ => format!("{} min", 80 + i),
            };
            CatalogRow::new(
                content_type,
                countries[i % countries.len()],
                2000 + (i as i64 % 7),
                genres[i % genres.len()],
                Some(duration.as_str()),
            )
        })
        .collect();
    Catalog::from_rows(rows)
}

#[test]
fn three_row_scenario() {
    let catalog = scenario();
    let mut selection = FilterSelection::full(&catalog);
    selection.types.insert(ContentType::Movie);
    selection.set_years(&catalog, 2020, 2021);

    let results = compute(&catalog, &selection, &DashboardOptions::default());

    assert_eq!(results.total, 2);
    assert_eq!(results.movies, 2);
    assert_eq!(results.tv_shows, 0);
    assert_eq!(
        results.top_genres,
        vec![
            ("Comedy".to_string(), 2),
            ("Action".to_string(), 1),
            ("Drama".to_string(), 1),
        ]
    );
    assert_eq!(results.durations.as_ref().unwrap().minutes, vec![90.0, 100.0]);
}

#[test]
fn empty_selection_returns_full_catalog() {
    let catalog = mixed_catalog();
    let results = compute(&catalog, &FilterSelection::full(&catalog), &DashboardOptions::default());
    assert_eq!(results.total, catalog.len());
    assert_eq!(results.indices, (0..catalog.len()).collect::<Vec<_>>());
}

#[test]
fn filtered_counts_are_consistent() {
    let catalog = mixed_catalog();
    let options = DashboardOptions::default();

    let mut selections = Vec::new();
    for t in [None, Some(ContentType::Movie), Some(ContentType::TvShow)] {
        for c in [None, Some("United States"), Some("France"), Some("Nowhere")] {
            for (lo, hi) in [(2000, 2006), (2002, 2004), (2006, 2006)] {
                let mut sel = FilterSelection::full(&catalog);
                sel.types.extend(t);
                sel.countries.extend(c.map(str::to_string));
                sel.set_years(&catalog, lo, hi);
                selections.push(sel);
            }
        }
    }

    for sel in selections {
        let results = compute(&catalog, &sel, &options);
        assert!(results.total <= catalog.len());
        assert_eq!(
            results.type_counts.iter().map(|(_, n)| n).sum::<usize>(),
            results.total
        );
        assert_eq!(results.movies + results.tv_shows, results.total);
        assert_eq!(
            results.year_counts.iter().map(|(_, n)| n).sum::<usize>(),
            results.total
        );
    }
}

#[test]
fn top_lists_and_pivot_invariants() {
    let catalog = mixed_catalog();
    let results = compute(&catalog, &FilterSelection::full(&catalog), &DashboardOptions::default());

    for top in [&results.top_genres, &results.top_countries] {
        assert!(top.len() <= 10);
        assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
    }
    assert_eq!(results.top_countries[0], ("United States".to_string(), 20));

    let with_country = catalog.rows().iter().filter(|r| r.country.is_some()).count();
    assert_eq!(results.pivot.total(), with_country);
    // "India, United States" rows are keyed by India only.
    assert_eq!(results.pivot.countries, vec!["France", "India", "United States"]);

    assert_eq!(
        results.year_histogram.iter().map(|b| b.count).sum::<usize>(),
        catalog.len()
    );
}

#[test]
fn duration_policies() {
    let catalog = mixed_catalog();
    let sel = FilterSelection::full(&catalog);

    let lenient = compute(&catalog, &sel, &DashboardOptions::default());
    let summary = lenient.durations.as_ref().unwrap();
    assert_eq!(summary.skipped, 1);
    assert!(summary.minutes.iter().all(|m| *m >= 80.0));
    assert!(lenient.duration_stats.is_some());

    let strict = compute(
        &catalog,
        &sel,
        &DashboardOptions {
            duration_policy: DurationPolicy::Strict,
            ..DashboardOptions::default()
        },
    );
    let err = strict.durations.unwrap_err();
    assert_eq!(err.row, 7);
    assert_eq!(err.value, "7");
}

#[test]
fn country_match_modes_differ_on_multi_country_rows() {
    let catalog = scenario();
    let mut sel = FilterSelection::full(&catalog);
    sel.countries.insert("UK".to_string());

    let any = compute(&catalog, &sel, &DashboardOptions::default());
    let whole = compute(
        &catalog,
        &sel,
        &DashboardOptions {
            country_match: CountryMatch::WholeField,
            ..DashboardOptions::default()
        },
    );
    assert_eq!(any.total, 1);
    assert_eq!(whole.total, 0);
}

#[test]
fn results_serialize_to_json() {
    let catalog = scenario();
    let results = compute(&catalog, &FilterSelection::full(&catalog), &DashboardOptions::default());
    let value = serde_json::to_value(&results).unwrap();

    assert_eq!(value["total"], 3);
    assert_eq!(value["type_counts"][0][0], "Movie");
    assert_eq!(value["type_counts"][1][0], "TV Show");
    assert_eq!(value["pivot"]["countries"], serde_json::json!(["India", "USA"]));
    assert!(value["durations"]["Ok"]["minutes"].is_array());
    assert!(value.get("indices").is_none());
}
