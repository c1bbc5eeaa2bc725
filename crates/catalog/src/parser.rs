//! Parser and writer for the catalog data files.
//!
//! Three `::`-delimited files make up a catalog directory:
//! - actors.dat: actorId::name::popularity::lastUpdated
//! - movies.dat: movieId::title::year::revenue::posterPath
//! - actor_movies.dat: actorId::movieId::billingOrder
//!
//! Optional fields (year, poster path) are written as empty strings. Names and
//! titles sit between fixed-width ends, so they may themselves contain `::`.

use crate::error::{CatalogError, Result};
use crate::types::*;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub const ACTORS_FILE: &str = "actors.dat";
pub const MOVIES_FILE: &str = "movies.dat";
pub const APPEARANCES_FILE: &str = "actor_movies.dat";

const SEP: &str = "::";

fn read_lines(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(CatalogError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(path)?;
    Ok(content.lines().map(|s| s.to_string()).collect())
}

fn parse_error(file: &str, line: usize, reason: impl Into<String>) -> CatalogError {
    CatalogError::ParseError {
        file: file.to_string(),
        line,
        reason: reason.into(),
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T> {
    value.trim().parse::<T>().map_err(|_| CatalogError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Split `head::middle::t1::...::tN` into (head, middle, [t1..tN]).
fn split_framed<'a>(line: &'a str, tail_fields: usize) -> Option<(&'a str, &'a str, Vec<&'a str>)> {
    let (head, rest) = line.split_once(SEP)?;
    let mut tail: Vec<&str> = rest.rsplitn(tail_fields + 1, SEP).collect();
    if tail.len() != tail_fields + 1 {
        return None;
    }
    let middle = tail.pop()?;
    tail.reverse();
    Some((head, middle, tail))
}

/// Parse the actors.dat file
pub fn parse_actors(path: &Path) -> Result<Vec<ActorRecord>> {
    let lines = read_lines(path)?;
    let mut actors = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        let (id, name, tail) = split_framed(line, 2)
            .ok_or_else(|| parse_error(ACTORS_FILE, line_no, "Expected 4 fields"))?;

        if name.trim().is_empty() {
            return Err(parse_error(ACTORS_FILE, line_no, "Missing name"));
        }

        actors.push(ActorRecord {
            id: parse_number("actorId", id)?,
            name: name.to_string(),
            popularity: parse_number("popularity", tail[0])?,
            last_updated: parse_number("lastUpdated", tail[1])?,
        });
    }

    Ok(actors)
}

/// Parse the movies.dat file
pub fn parse_movies(path: &Path) -> Result<Vec<CuratedMovie>> {
    let lines = read_lines(path)?;
    let mut movies = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        let (id, title, tail) = split_framed(line, 3)
            .ok_or_else(|| parse_error(MOVIES_FILE, line_no, "Expected 5 fields"))?;

        let release_year = match tail[0].trim() {
            "" => None,
            year => {
                let year: u16 = parse_number("year", year)?;
                if !(1000..=9999).contains(&year) {
                    return Err(CatalogError::InvalidValue {
                        field: "year".to_string(),
                        value: year.to_string(),
                    });
                }
                Some(year)
            }
        };

        let poster_path = match tail[2].trim() {
            "" => None,
            path => Some(path.to_string()),
        };

        movies.push(CuratedMovie {
            id: parse_number("movieId", id)?,
            title: title.to_string(),
            release_year,
            revenue: parse_number("revenue", tail[1])?,
            poster_path,
        });
    }

    Ok(movies)
}

/// Parse the actor_movies.dat file
pub fn parse_appearances(path: &Path) -> Result<Vec<Appearance>> {
    let lines = read_lines(path)?;
    let mut appearances = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split(SEP).collect();
        if parts.len() != 3 {
            return Err(CatalogError::ParseError {
                file: APPEARANCES_FILE.to_string(),
                line: line_no,
                reason: format!("Expected 3 fields but found {}", parts.len()),
            });
        }

        appearances.push(Appearance {
            actor_id: parse_number("actorId", parts[0])?,
            movie_id: parse_number("movieId", parts[1])?,
            billing_order: parse_number("billingOrder", parts[2])?,
        });
    }

    Ok(appearances)
}

pub(crate) fn format_actors<'a>(actors: impl Iterator<Item = &'a ActorRecord>) -> String {
    let mut out = String::new();
    for actor in actors {
        let _ = writeln!(
            out,
            "{}{SEP}{}{SEP}{}{SEP}{}",
            actor.id,
            single_line(&actor.name),
            actor.popularity,
            actor.last_updated
        );
    }
    out
}

pub(crate) fn format_movies<'a>(movies: impl Iterator<Item = &'a CuratedMovie>) -> String {
    let mut out = String::new();
    for movie in movies {
        let _ = writeln!(
            out,
            "{}{SEP}{}{SEP}{}{SEP}{}{SEP}{}",
            movie.id,
            single_line(&movie.title),
            movie.release_year.map(|y| y.to_string()).unwrap_or_default(),
            movie.revenue,
            movie.poster_path.as_deref().unwrap_or("")
        );
    }
    out
}

pub(crate) fn format_appearances<'a>(appearances: impl Iterator<Item = &'a Appearance>) -> String {
    let mut out = String::new();
    for a in appearances {
        let _ = writeln!(out, "{}{SEP}{}{SEP}{}", a.actor_id, a.movie_id, a.billing_order);
    }
    out
}

fn single_line(s: &str) -> String {
    s.replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_movies_with_optional_fields() {
        let file = write_temp(
            "597::Titanic::1997::1845034188::/poster.jpg\n\
             \n\
             13::Forrest Gump::::677387716::\n",
        );

        let movies = parse_movies(file.path()).unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, 597);
        assert_eq!(movies[0].release_year, Some(1997));
        assert_eq!(movies[0].poster_path.as_deref(), Some("/poster.jpg"));
        assert_eq!(movies[1].release_year, None);
        assert_eq!(movies[1].revenue, 677387716);
        assert_eq!(movies[1].poster_path, None);
    }

    #[test]
    fn test_parse_title_containing_separator() {
        let file = write_temp("7::Star Wars::Episode IV::1977::775398007::\n");
        let movies = parse_movies(file.path()).unwrap();
        assert_eq!(movies[0].title, "Star Wars::Episode IV");
        assert_eq!(movies[0].release_year, Some(1977));
    }

    #[test]
    fn test_parse_actors() {
        let file = write_temp("31::Tom Hanks::55.4::1700000000\n");
        let actors = parse_actors(file.path()).unwrap();
        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].name, "Tom Hanks");
        assert_eq!(actors[0].last_updated, 1700000000);
    }

    #[test]
    fn test_parse_appearances_rejects_wrong_field_count() {
        let file = write_temp("31::13\n");
        let err = parse_appearances(file.path()).unwrap_err();
        assert!(matches!(err, CatalogError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_parse_movies_rejects_bad_revenue() {
        let file = write_temp("13::Forrest Gump::1994::lots::\n");
        let err = parse_movies(file.path()).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidValue { ref field, .. } if field == "revenue"));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_actors(Path::new("/definitely/not/here/actors.dat")).unwrap_err();
        assert!(matches!(err, CatalogError::FileNotFound { .. }));
    }
}
