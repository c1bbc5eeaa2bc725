//! CatalogIndex loading, persistence and maintenance.
//!
//! - Load the three data files in parallel and build the index
//! - Validate referential integrity
//! - Write the index back to a directory
//! - Upsert freshly curated actors and prune stale ones

use crate::error::{CatalogError, Result};
use crate::parser;
use crate::types::*;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

impl CatalogIndex {
    /// Load a catalog directory.
    ///
    /// Steps:
    /// 1. Parse actors, movies and appearances in parallel
    /// 2. Build the index
    /// 3. Validate that every appearance points at a known actor and movie
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading catalog from {:?}", data_dir);

        let actors_path = data_dir.join(parser::ACTORS_FILE);
        let movies_path = data_dir.join(parser::MOVIES_FILE);
        let appearances_path = data_dir.join(parser::APPEARANCES_FILE);

        let ((actors, movies), appearances) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_actors(&actors_path),
                    || parser::parse_movies(&movies_path),
                )
            },
            || parser::parse_appearances(&appearances_path),
        );

        let actors = actors?;
        let movies = movies?;
        let appearances = appearances?;

        info!(
            "Loaded {} actors, {} movies, {} appearances",
            actors.len(),
            movies.len(),
            appearances.len()
        );

        let mut index = CatalogIndex::new();
        for actor in actors {
            index.insert_actor(actor);
        }
        for movie in movies {
            index.insert_movie(movie);
        }
        for appearance in appearances {
            index.insert_appearance(appearance);
        }

        index.validate()?;
        Ok(index)
    }

    /// Load a catalog directory, or start empty when it has never been written
    pub fn load_or_empty(data_dir: &Path) -> Result<Self> {
        if data_dir.join(parser::ACTORS_FILE).exists() {
            Self::load_from_files(data_dir)
        } else {
            info!("No catalog at {:?}, starting empty", data_dir);
            Ok(Self::new())
        }
    }

    /// Write the catalog to a directory, one file per table, sorted by id.
    pub fn write_to_dir(&self, data_dir: &Path) -> Result<()> {
        fs::create_dir_all(data_dir)?;

        let actor_ids = self.actor_ids();
        let actors = actor_ids.iter().filter_map(|id| self.actors.get(id));
        fs::write(data_dir.join(parser::ACTORS_FILE), parser::format_actors(actors))?;

        let movie_ids = self.movie_ids();
        let movies = movie_ids.iter().filter_map(|id| self.movies.get(id));
        fs::write(data_dir.join(parser::MOVIES_FILE), parser::format_movies(movies))?;

        let appearances = actor_ids.iter().flat_map(|id| self.get_appearances(*id).iter());
        fs::write(
            data_dir.join(parser::APPEARANCES_FILE),
            parser::format_appearances(appearances),
        )?;

        let (actors, movies, links) = self.counts();
        info!(
            "Wrote catalog to {:?} ({} actors, {} movies, {} appearances)",
            data_dir, actors, movies, links
        );
        Ok(())
    }

    /// Check that every appearance references a known actor and movie
    pub fn validate(&self) -> Result<()> {
        for (actor_id, appearances) in &self.appearances {
            if !self.actors.contains_key(actor_id) {
                return Err(CatalogError::MissingReference {
                    entity: "Actor".to_string(),
                    id: *actor_id,
                });
            }
            for appearance in appearances {
                if !self.movies.contains_key(&appearance.movie_id) {
                    return Err(CatalogError::MissingReference {
                        entity: "Movie".to_string(),
                        id: appearance.movie_id,
                    });
                }
            }
        }
        Ok(())
    }

    /// Aggregate numbers about the catalog
    pub fn stats(&self) -> CatalogStats {
        let (actors, movies, appearances) = self.counts();
        let actors_with_movies = self
            .actors
            .keys()
            .filter(|id| !self.get_appearances(**id).is_empty())
            .count();
        CatalogStats {
            actors,
            movies,
            actors_with_movies,
            appearances,
        }
    }

    /// Insert a curated actor together with their movies.
    ///
    /// An actor already in the catalog keeps their name and gets popularity
    /// and `last_updated` refreshed. Movies already in the catalog are not
    /// overwritten. Returns the number of newly inserted movies.
    pub fn upsert_actor(
        &mut self,
        actor: ActorRecord,
        movies: &[(CuratedMovie, u32)],
    ) -> usize {
        let actor_id = actor.id;
        match self.actors.get_mut(&actor_id) {
            Some(existing) => {
                existing.popularity = actor.popularity;
                existing.last_updated = actor.last_updated;
            }
            None => self.insert_actor(actor),
        }

        let mut inserted = 0;
        for (movie, billing_order) in movies {
            if self.insert_movie_if_absent(movie.clone()) {
                inserted += 1;
            }
            self.insert_appearance(Appearance {
                actor_id,
                movie_id: movie.id,
                billing_order: *billing_order,
            });
        }
        debug!(
            "Upserted actor {} with {} movies ({} new)",
            actor_id,
            movies.len(),
            inserted
        );
        inserted
    }

    /// Remove actors whose `last_updated` is strictly older than `cutoff`.
    ///
    /// Returns the removed actors ordered by id.
    pub fn prune_outdated(&mut self, cutoff: i64) -> Vec<ActorRecord> {
        let stale: Vec<ActorId> = self
            .actor_ids()
            .into_iter()
            .filter(|id| self.actors[id].last_updated < cutoff)
            .collect();

        let removed: Vec<ActorRecord> = stale
            .into_iter()
            .filter_map(|id| self.remove_actor(id))
            .collect();

        info!("Removed {} outdated actors", removed.len());
        removed
    }

    /// Prune relative to now: anything not refreshed within `max_age_days`
    pub fn prune_older_than_days(&mut self, max_age_days: i64) -> Vec<ActorRecord> {
        let cutoff = chrono::Utc::now() - chrono::Duration::days(max_age_days);
        self.prune_outdated(cutoff.timestamp())
    }
}
