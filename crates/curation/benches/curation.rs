//! Benchmarks for eligibility screening and movie selection
//!
//! Run with: cargo bench --package curation

use catalog::{ActorCandidate, KnownFor, LanguageCode};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use curation::curator::select_movies;
use curation::CatalogFilter;
use provider::{MovieDetail, ReleaseType};

fn synthetic_pool(size: u32) -> Vec<ActorCandidate> {
    (0..size)
        .map(|id| {
            let lang = if id % 4 == 0 { "ko" } else { "en" };
            ActorCandidate {
                id,
                name: format!("Actor {}", id),
                popularity: (size - id) as f32,
                known_for: (0..3).map(|i| KnownFor::movie(format!("Movie {}", i), lang)).collect(),
                total_movie_credits: 10 + (id as usize % 40),
                recent_credit_languages: vec![LanguageCode::new(lang); 20],
            }
        })
        .collect()
}

fn synthetic_details(size: u32) -> Vec<(MovieDetail, u32)> {
    (0..size)
        .map(|id| {
            let detail = MovieDetail {
                id,
                title: format!("Movie {}", id),
                release_date: Some("2001-01-01".to_string()),
                revenue: Some((id as u64 * 7_919) % 1_000_003),
                release_type: Some(if id % 10 == 0 { ReleaseType::Tv } else { ReleaseType::Theatrical }),
                original_language: LanguageCode::english(),
                poster_path: None,
            };
            (detail, id % 12)
        })
        .collect()
}

fn bench_screen_pool(c: &mut Criterion) {
    let filter = CatalogFilter::default();
    let pool = synthetic_pool(1_000);

    c.bench_function("catalog_filter_screen_1000", |b| {
        b.iter(|| black_box(filter.screen(black_box(pool.clone()))))
    });
}

fn bench_select_movies(c: &mut Criterion) {
    let details = synthetic_details(200);

    c.bench_function("select_movies_200", |b| {
        b.iter(|| black_box(select_movies(black_box(details.clone()), 5)))
    });
}

criterion_group!(benches, bench_screen_pool, bench_select_movies);
criterion_main!(benches);
