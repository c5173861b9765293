//! Unit tests for the package list

use super::*;

use crate::cards::count_cards;
use crate::surface::Document;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rainmeas_registry::{ClientOptions, RegistryEndpoints};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn packages(count: usize) -> Vec<Package> {
    (0..count)
        .map(|i| {
            Package::new(
                format!("pkg-{:02}", i),
                if i % 2 == 0 { "nurashade" } else { "someone" },
                format!("Skin number {}", i),
                "1.0.0",
            )
        })
        .collect()
}

fn grid_cards(doc: &Document) -> usize {
    count_cards(doc.html(ids::PACKAGES_GRID).unwrap_or_default())
}

#[test]
fn test_pagination_sequence() {
    let mut doc = Document::new();
    let mut controller = ListController::from_packages(packages(14), 6, &mut doc);

    assert_eq!(grid_cards(&doc), 6);
    assert!(doc.is_visible(ids::LOAD_MORE));

    controller.load_more(&mut doc);
    assert_eq!(grid_cards(&doc), 12);
    assert!(doc.is_visible(ids::LOAD_MORE));

    controller.load_more(&mut doc);
    assert_eq!(grid_cards(&doc), 14);
    assert!(!doc.is_visible(ids::LOAD_MORE));
    assert_eq!(controller.state().current_page(), 3);
}

#[test]
fn test_load_more_when_exhausted_is_noop() {
    let mut doc = Document::new();
    let mut controller = ListController::from_packages(packages(4), 6, &mut doc);

    assert!(!doc.is_visible(ids::LOAD_MORE));
    let before = doc.html(ids::PACKAGES_GRID).map(str::to_string);

    controller.load_more(&mut doc);

    assert_eq!(doc.html(ids::PACKAGES_GRID).map(str::to_string), before);
    assert_eq!(controller.state().current_page(), 1);
}

#[test]
fn test_exact_page_boundary_hides_load_more() {
    let mut doc = Document::new();
    ListController::from_packages(packages(6), 6, &mut doc);

    assert_eq!(grid_cards(&doc), 6);
    assert!(!doc.is_visible(ids::LOAD_MORE));
}

#[test]
fn test_featured_is_first_package() {
    let mut doc = Document::new();
    ListController::from_packages(packages(3), 6, &mut doc);

    let featured = doc.html(ids::FEATURED_GRID).unwrap();
    assert_eq!(count_cards(featured), 1);
    assert!(featured.contains("data-package-name=\"pkg-00\""));
    assert!(featured.contains("Featured"));
}

#[test]
fn test_empty_list_messages() {
    let mut doc = Document::new();
    ListController::from_packages(Vec::new(), 6, &mut doc);

    assert_eq!(doc.html(ids::PACKAGES_GRID), Some(NO_PACKAGES_HTML));
    assert_eq!(doc.html(ids::FEATURED_GRID), Some(NO_FEATURED_HTML));
    assert!(!doc.is_visible(ids::LOAD_MORE));
}

#[test]
fn test_filter_matches_author_case_insensitively() {
    let mut doc = Document::new();
    let mut controller = ListController::from_packages(packages(14), 6, &mut doc);

    controller.filter("SOMEONE", &mut doc);
    assert_eq!(doc.text(ids::SEARCH_INPUT), Some("SOMEONE"));

    assert_eq!(controller.state().displayed_len(), 7);
    assert!(controller.state().displayed().all(|pkg| pkg.author == "someone"));
    assert_eq!(grid_cards(&doc), 6);
    assert!(doc.is_visible(ids::LOAD_MORE));
}

#[test]
fn test_filter_resets_to_first_page() {
    let mut doc = Document::new();
    let mut controller = ListController::from_packages(packages(14), 6, &mut doc);
    controller.load_more(&mut doc);
    assert_eq!(controller.state().current_page(), 2);

    controller.filter("skin number 1", &mut doc);

    // pkg-01 and pkg-10 through pkg-13
    assert_eq!(controller.state().current_page(), 1);
    assert_eq!(controller.state().displayed_len(), 5);
    assert_eq!(grid_cards(&doc), 5);
    assert!(!doc.is_visible(ids::LOAD_MORE));
}

#[test]
fn test_filter_without_matches() {
    let mut doc = Document::new();
    let mut controller = ListController::from_packages(packages(3), 6, &mut doc);

    controller.filter("no such skin", &mut doc);

    assert_eq!(doc.html(ids::PACKAGES_GRID), Some(NO_PACKAGES_HTML));
    assert!(!doc.is_visible(ids::LOAD_MORE));
    // The featured slot is not affected by search
    assert_eq!(count_cards(doc.html(ids::FEATURED_GRID).unwrap()), 1);
}

#[test]
fn test_empty_filter_shows_everything() {
    let mut list = PackageList::new(packages(9), 6);
    list.filter("pkg-03");
    assert_eq!(list.displayed_len(), 1);

    list.filter("");
    assert_eq!(list.displayed_len(), 9);
}

#[test]
fn test_page_slices() {
    let list = PackageList::new(packages(14), 6);

    let names = |page: Vec<&Package>| page.into_iter().map(|pkg| pkg.name.clone()).collect::<Vec<_>>();

    assert_eq!(names(list.page(1)).first().map(String::as_str), Some("pkg-00"));
    assert_eq!(list.page(2).len(), 6);
    assert_eq!(names(list.page(3)), vec!["pkg-12", "pkg-13"]);
    assert!(list.page(4).is_empty());
}

#[test]
fn test_zero_per_page_is_clamped() {
    let list = PackageList::new(packages(2), 0);
    assert_eq!(list.per_page(), 1);
    assert_eq!(list.page(1).len(), 1);
}

proptest! {
    #[test]
    fn prop_filter_is_idempotent(term in "[a-zA-Z0-9 -]{0,8}", count in 0usize..20) {
        let mut list = PackageList::new(packages(count), 6);

        list.filter(&term);
        let first: Vec<String> = list.displayed().map(|pkg| pkg.name.clone()).collect();
        list.filter(&term);
        let second: Vec<String> = list.displayed().map(|pkg| pkg.name.clone()).collect();

        prop_assert_eq!(first, second);
        prop_assert_eq!(list.current_page(), 1);
    }

    #[test]
    fn prop_paging_shows_every_match_once(count in 0usize..40, per_page in 1usize..10) {
        let mut list = PackageList::new(packages(count), per_page);
        let mut seen: Vec<String> = list.page(1).into_iter().map(|pkg| pkg.name.clone()).collect();

        while let Some(batch) = list.advance() {
            seen.extend(batch.into_iter().map(|pkg| pkg.name.clone()));
        }

        let expected: Vec<String> = list.displayed().map(|pkg| pkg.name.clone()).collect();
        prop_assert_eq!(seen, expected);
        prop_assert!(!list.has_more());
    }
}

#[tokio::test]
async fn test_load_from_registry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "alpha": { "latest": "2.0.0" },
            "beta": { "latest": "0.1.0" }
        })))
        .mount(&mock_server)
        .await;

    for (name, version) in [("alpha", "2.0.0"), ("beta", "0.1.0")] {
        Mock::given(method("GET"))
            .and(path(format!("/packages/{}.json", name)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": name,
                "author": "tester",
                "description": format!("The {} skin", name),
                "versions": { version: {}, "latest": version }
            })))
            .mount(&mock_server)
            .await;
    }

    let client = RegistryClient::with_options(ClientOptions {
        endpoints: RegistryEndpoints {
            registry_base: mock_server.uri(),
            github_api_base: mock_server.uri(),
        },
        ..ClientOptions::default()
    })
    .unwrap();

    let mut doc = Document::new();
    let controller = ListController::load(&client, DEFAULT_PER_PAGE, &mut doc).await.unwrap();

    let names: Vec<&str> = controller.state().all().iter().map(|pkg| pkg.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta"]);
    assert_eq!(grid_cards(&doc), 2);
    assert!(doc.html(ids::PACKAGES_GRID).unwrap().contains("v2.0.0"));
    assert!(doc.html(ids::FEATURED_GRID).unwrap().contains("data-package-name=\"alpha\""));
    assert!(!doc.is_visible(ids::LOAD_MORE));
}

#[tokio::test]
async fn test_load_with_supplied_fetch() {
    let mut doc = Document::new();
    let controller = ListController::load_with(async { packages(8) }, 6, &mut doc).await.unwrap();

    assert_eq!(controller.state().all().len(), 8);
    assert_eq!(grid_cards(&doc), 6);
    assert!(doc.is_visible(ids::LOAD_MORE));
}

#[tokio::test]
async fn test_failed_fetch_task_shows_load_error() {
    let mut doc = Document::new();
    doc.set_visible(ids::LOAD_MORE, true);

    let result = ListController::load_with(
        async {
            if true {
                panic!("registry task failed");
            }
            Vec::new()
        },
        6,
        &mut doc,
    )
    .await;

    assert!(matches!(result, Err(RainmeasError::Network { .. })));
    assert_eq!(doc.html(ids::PACKAGES_GRID), Some(LOAD_FAILED_HTML));
    assert!(!doc.is_visible(ids::LOAD_MORE));
    assert_eq!(doc.html(ids::FEATURED_GRID), None);
}
