//! Integration tests for curation.
//!
//! These tests run the eligibility filter, the curator and the sweep
//! together against an in-memory provider.

use catalog::{
    ActorCandidate, ActorRecord, CatalogIndex, CatalogStore, KnownFor, LanguageCode, MovieCredit, MovieId,
};
use curation::{
    CatalogFilter, CatalogSweep, CurationCache, EligibilityPolicy, InMemoryCurationCache,
    MovieCurator, SweepConfig,
};
use provider::{MetadataProvider, MovieDetail, PersonSummary, ReleaseType, StaticProvider};
use std::sync::Arc;

fn credit(id: MovieId, order: u32, date: &str, lang: &str) -> MovieCredit {
    MovieCredit {
        id,
        title: format!("Movie {}", id),
        release_date: Some(date.to_string()),
        revenue: None,
        billing_order: order,
        original_language: LanguageCode::new(lang),
    }
}

fn detail(id: MovieId, title: &str, revenue: u64, release_type: ReleaseType) -> MovieDetail {
    MovieDetail {
        id,
        title: title.to_string(),
        release_date: Some("2000-06-01".to_string()),
        revenue: Some(revenue),
        release_type: Some(release_type),
        original_language: LanguageCode::english(),
        poster_path: Some(format!("/poster{}.jpg", id)),
    }
}

/// Tom Hanks (31): 7 leading roles, one cameo, one TV movie, one lookup
/// that fails.
fn hanks_provider() -> StaticProvider {
    let mut provider = StaticProvider::new().with_person(31, "Tom Hanks");
    let movies = [
        (13, "Forrest Gump", 678_226_133),
        (862, "Toy Story", 394_436_586),
        (863, "Toy Story 2", 497_366_869),
        (10193, "Toy Story 3", 1_066_969_703),
        (857, "Saving Private Ryan", 481_840_909),
        (591, "The Da Vinci Code", 767_820_459),
        (568, "Apollo 13", 355_237_933),
    ];
    for (i, (id, title, revenue)) in movies.iter().enumerate() {
        provider = provider
            .with_credit(31, credit(*id, i as u32, "2000-01-01", "en"))
            .with_detail(detail(*id, title, *revenue, ReleaseType::Theatrical));
    }
    provider
        .with_credit(31, credit(301528, 15, "2019-06-19", "en"))
        .with_detail(detail(301528, "Toy Story 4", 1_073_394_593, ReleaseType::Theatrical))
        .with_credit(31, credit(777, 0, "2005-01-01", "en"))
        .with_detail(detail(777, "A TV Movie", 999_999_999_999, ReleaseType::Tv))
        .with_credit(31, credit(778, 1, "2006-01-01", "en"))
        .with_failing_detail(778)
}

#[tokio::test]
async fn test_curate_top_five_by_revenue() {
    let curator = MovieCurator::new(Arc::new(hanks_provider()));
    let answer = curator.curate("Tom Hanks").await.unwrap();

    let titles: Vec<&str> = answer.movies().iter().map(|m| m.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Toy Story 3",
            "The Da Vinci Code",
            "Forrest Gump",
            "Toy Story 2",
            "Saving Private Ryan",
        ]
    );
    // cameo (order 15) and TV movie never make it in
    assert!(!answer.contains(301528));
    assert!(!answer.contains(777));
    assert_eq!(answer.max_revenue(), 1_066_969_703);
    assert_eq!(answer.movies()[0].release_year, Some(2000));
}

#[tokio::test]
async fn test_cached_curation_survives_invalidate() {
    let provider = Arc::new(hanks_provider());
    let cache = Arc::new(InMemoryCurationCache::default());
    let curator = MovieCurator::new(provider.clone()).with_cache(cache.clone());

    curator.curate("Tom Hanks").await.unwrap();
    let calls = provider.detail_calls();
    curator.curate("Tom Hanks").await.unwrap();
    assert_eq!(provider.detail_calls(), calls);

    cache.invalidate("Tom Hanks");
    curator.curate("Tom Hanks").await.unwrap();
    assert_eq!(provider.detail_calls(), calls * 2);
}

fn candidate(credits: usize, known_for_english: usize, known_for_other: usize) -> ActorCandidate {
    let mut known_for: Vec<KnownFor> = (0..known_for_english)
        .map(|i| KnownFor::movie(format!("En {}", i), "en"))
        .collect();
    known_for.extend((0..known_for_other).map(|i| KnownFor::movie(format!("Fr {}", i), "fr")));
    ActorCandidate {
        id: 1,
        name: "Candidate".to_string(),
        popularity: 10.0,
        known_for,
        total_movie_credits: credits,
        recent_credit_languages: vec![],
    }
}

fn recent(english: usize, other: usize) -> Vec<LanguageCode> {
    let mut langs = vec![LanguageCode::english(); english];
    langs.extend(vec![LanguageCode::new("fr"); other]);
    langs
}

#[test]
fn test_thin_filmography_is_ineligible() {
    let filter = CatalogFilter::from_policy(&EligibilityPolicy::default());
    assert!(!filter.is_eligible(&candidate(10, 5, 0), &recent(20, 0)));
}

#[test]
fn test_recent_share_decides_eligibility() {
    let filter = CatalogFilter::from_policy(&EligibilityPolicy::default());
    let actor = candidate(20, 3, 2);

    assert!(filter.is_eligible(&actor, &recent(16, 4)));
    assert!(!filter.is_eligible(&actor, &recent(12, 8)));
}

fn popular(id: u32, name: &str, popularity: f32, known_for_lang: &str) -> PersonSummary {
    PersonSummary {
        id,
        name: name.to_string(),
        popularity,
        known_for_department: Some("Acting".to_string()),
        known_for: vec![KnownFor::movie("Known", known_for_lang)],
    }
}

#[tokio::test]
async fn test_sweep_fills_catalog() {
    let mut provider = hanks_provider()
        .with_popular(popular(31, "Tom Hanks", 80.0, "en"))
        .with_popular(popular(99, "Song Kang-ho", 60.0, "ko"))
        .with_popular(popular(5, "Newcomer", 90.0, "en"));

    // Hanks needs 15 credits: pad with older English roles without details
    for id in 0..6 {
        provider = provider.with_credit(31, credit(9000 + id, 20, "1990-01-01", "en"));
    }
    for id in 0..20 {
        provider = provider.with_credit(99, credit(5000 + id, 0, "2010-01-01", "ko"));
    }
    provider = provider.with_credit(5, credit(4000, 0, "2023-01-01", "en"));

    let provider: Arc<dyn MetadataProvider> = Arc::new(provider);
    let sweep = CatalogSweep::new(
        provider.clone(),
        CatalogFilter::default(),
        MovieCurator::new(provider.clone()),
        SweepConfig::default(),
    );

    let now = 1_700_000_000;
    let mut catalog = CatalogIndex::new();
    for (id, name, age_days) in [(700, "Silent Star", 400), (701, "Regular", 10)] {
        catalog.insert_actor(ActorRecord {
            id,
            name: name.to_string(),
            popularity: 1.0,
            last_updated: now - age_days * 86_400,
        });
    }
    let report = sweep.run_at(&mut catalog, now).await;

    assert_eq!(report.considered, 3);
    assert_eq!(report.admitted, vec!["Tom Hanks".to_string()]);
    assert_eq!(report.ineligible.len(), 2);
    assert_eq!(report.movies_added, 5);
    assert_eq!(report.pruned, vec!["Silent Star".to_string()]);
    assert!(catalog.get_actor(700).is_none());
    assert!(catalog.get_actor(701).is_some());

    let actor = catalog.get_actor(31).unwrap();
    assert_eq!(actor.last_updated, 1_700_000_000);

    let movies = catalog.actor_movies("tom hanks");
    assert_eq!(movies.len(), 5);
    assert_eq!(movies[0].title, "Toy Story 3");
    assert_eq!(catalog.random_eligible_actor().map(|a| a.id), Some(31));
}
