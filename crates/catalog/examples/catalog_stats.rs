use catalog::CatalogIndex;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("data/catalog");

    println!("Loading catalog...\n");

    let start = Instant::now();
    let index = CatalogIndex::load_from_files(data_dir).expect("Failed to load catalog");
    let elapsed = start.elapsed();

    let stats = index.stats();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Actors: {}", stats.actors);
    println!("Movies: {}", stats.movies);
    println!("Actors with at least one movie: {}", stats.actors_with_movies);
    println!("Appearances: {}", stats.appearances);
}
