//! Command-line surface.
//!
//! # Responsibility
//! - Declare commands and flags.
//! - Map parsed commands onto core operations.
//!
//! # Invariants
//! - Data goes to stdout; the single outcome notification goes to stderr.
//! - `clear` never touches storage without `--yes`.

use crate::config::{AppConfig, GlobalArgs};
use crate::notify::{self, Notice};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cocktail_log_core::db::open_db;
use cocktail_log_core::transfer::{
    export_backup_document, export_recipes_document, export_reviews_document,
    import_backup_document, import_recipes_document, import_reviews_document,
};
use cocktail_log_core::{
    classify, database_status, format_rating, RecipeService, RepoError, Review, ReviewDraft,
    ReviewListQuery, ReviewService, ReviewSort, SqliteRecipeRepository, SqliteReviewRepository,
};
use rusqlite::Connection;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cocktail-log")]
#[command(about = "Log, browse and back up cocktail reviews", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log a new review
    Log {
        /// Cocktail name
        name: String,
        /// Rating from 1.0 to 10.0 in steps of 0.5
        #[arg(short, long, default_value_t = 7.0)]
        rating: f64,
        /// Date the drink was made (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<chrono::NaiveDate>,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long, default_value = "")]
        venue: String,
        #[arg(long, default_value = "")]
        occasion: String,
        #[arg(long, default_value = "")]
        modifications: String,
    },
    /// List reviews
    List {
        /// Search name, notes, venue and occasion
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(short, long, value_enum, default_value_t = SortArg::DateAdded)]
        sort: SortArg,
    },
    /// Delete one review by id
    Delete { id: String },
    /// Import a JSON file
    Import {
        #[arg(value_enum)]
        target: Target,
        file: PathBuf,
    },
    /// Export as JSON (stdout unless --out is given)
    Export {
        #[arg(value_enum)]
        target: Target,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Permanently delete all recipes and reviews
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Show record counts
    Status,
    /// Suggest recipe names for a prefix
    Suggest {
        prefix: String,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show the rating band for a value
    Classify { rating: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    DateAdded,
    DateMade,
    Rating,
    Name,
}

impl From<SortArg> for ReviewSort {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::DateAdded => Self::DateAdded,
            SortArg::DateMade => Self::DateMade,
            SortArg::Rating => Self::Rating,
            SortArg::Name => Self::Name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Target {
    Reviews,
    Recipes,
    All,
}

/// Runs one command and returns its outcome notice.
pub fn run(command: Commands, config: &AppConfig) -> Result<Notice> {
    match command {
        Commands::Log {
            name,
            rating,
            date,
            notes,
            venue,
            occasion,
            modifications,
        } => {
            let draft = ReviewDraft {
                recipe_name: name,
                rating,
                date_made: date,
                notes,
                venue,
                occasion,
                modifications,
            };
            let mut conn = open(config)?;
            let mut service = ReviewService::new(SqliteReviewRepository::try_new(&mut conn)?);
            match service.create(&draft) {
                Ok(review) => {
                    println!("{}", review.id);
                    Ok(notify::review_logged())
                }
                Err(RepoError::Validation(err)) => Ok(notify::validation_failed(&err)),
                Err(err) => Err(err.into()),
            }
        }
        Commands::List { query, sort } => {
            let mut conn = open(config)?;
            let service = ReviewService::new(SqliteReviewRepository::try_new(&mut conn)?);
            let reviews = service.list(&ReviewListQuery::new(query, sort.into()))?;
            for review in &reviews {
                println!("{}", render_review_line(review));
            }
            Ok(notify::reviews_listed(reviews.len()))
        }
        Commands::Delete { id } => {
            let mut conn = open(config)?;
            let mut service = ReviewService::new(SqliteReviewRepository::try_new(&mut conn)?);
            let existed = service.delete(&id)?;
            Ok(notify::review_deleted(&id, existed))
        }
        Commands::Import { target, file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read `{}`", file.display()))?;
            let mut conn = open(config)?;
            let notice = match target {
                Target::Reviews => {
                    notify::imported("reviews", &import_reviews_document(&mut conn, &text)?)
                }
                Target::Recipes => {
                    notify::imported("recipes", &import_recipes_document(&mut conn, &text)?)
                }
                Target::All => notify::backup_imported(&import_backup_document(&mut conn, &text)?),
            };
            Ok(notice)
        }
        Commands::Export { target, out } => {
            let mut conn = open(config)?;
            let document = match target {
                Target::Reviews => export_reviews_document(&mut conn)?,
                Target::Recipes => export_recipes_document(&mut conn)?,
                Target::All => export_backup_document(&mut conn)?,
            };
            match out {
                Some(path) => std::fs::write(&path, document)
                    .with_context(|| format!("failed to write `{}`", path.display()))?,
                None => println!("{document}"),
            }
            Ok(notify::exported(target_label(target)))
        }
        Commands::Clear { yes: false } => Ok(notify::clear_needs_confirmation()),
        Commands::Clear { yes: true } => {
            let mut conn = open(config)?;
            let (recipes, reviews) = clear_everything(&mut conn)?;
            Ok(notify::cleared(recipes, reviews))
        }
        Commands::Status => {
            let mut conn = open(config)?;
            let status = database_status(&mut conn)?;
            println!("recipes={} reviews={}", status.recipes, status.reviews);
            Ok(notify::status(&status))
        }
        Commands::Suggest { prefix, limit } => {
            let mut conn = open(config)?;
            let service = RecipeService::new(SqliteRecipeRepository::try_new(&mut conn)?);
            let names = service.suggest_names(&prefix, limit)?;
            for name in &names {
                println!("{name}");
            }
            Ok(notify::suggestions(names.len()))
        }
        Commands::Classify { rating } => {
            let class = classify(rating);
            println!("{} {} {}", format_rating(rating), class.label, class.color_token);
            Ok(Notice::info(class.label))
        }
    }
}

fn open(config: &AppConfig) -> Result<Connection> {
    open_db(&config.db_path)
        .with_context(|| format!("failed to open database `{}`", config.db_path.display()))
}

fn clear_everything(conn: &mut Connection) -> Result<(usize, usize)> {
    let reviews = ReviewService::new(SqliteReviewRepository::try_new(conn)?).clear_all()?;
    let recipes = RecipeService::new(SqliteRecipeRepository::try_new(conn)?).clear_all()?;
    Ok((recipes, reviews))
}

fn target_label(target: Target) -> &'static str {
    match target {
        Target::Reviews => "Reviews",
        Target::Recipes => "Recipes",
        Target::All => "All data",
    }
}

fn render_review_line(review: &Review) -> String {
    let class = classify(review.rating);
    format!(
        "{id}  {rating:>4} {label:<9}  {made}  {name}",
        id = review.id,
        rating = format_rating(review.rating),
        label = class.label,
        made = review.date_made,
        name = review.recipe_name,
    )
}

#[cfg(test)]
mod tests {
    use super::{render_review_line, Cli, Commands, SortArg, Target};
    use chrono::NaiveDate;
    use clap::Parser;
    use cocktail_log_core::Review;

    #[test]
    fn parses_log_with_defaults() {
        let cli = Cli::try_parse_from(["cocktail-log", "log", "Mai Tai"]).unwrap();
        match cli.command {
            Commands::Log { name, rating, date, .. } => {
                assert_eq!(name, "Mai Tai");
                assert_eq!(rating, 7.0);
                assert!(date.is_none());
            }
            _ => panic!("expected log command"),
        }
    }

    #[test]
    fn parses_list_sort_and_import_target() {
        let cli =
            Cli::try_parse_from(["cocktail-log", "list", "--sort", "date-made", "-q", "tiki"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Commands::List { sort: SortArg::DateMade, ref query } if query == "tiki"
        ));

        let cli =
            Cli::try_parse_from(["cocktail-log", "import", "all", "backup.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Import { target: Target::All, .. }));
    }

    #[test]
    fn clear_defaults_to_unconfirmed() {
        let cli = Cli::try_parse_from(["cocktail-log", "clear"]).unwrap();
        assert!(matches!(cli.command, Commands::Clear { yes: false }));
    }

    #[test]
    fn review_line_shows_band_label() {
        let date = NaiveDate::from_ymd_opt(2022, 8, 11).unwrap();
        let review = Review {
            id: "1".to_string(),
            recipe_name: "Pago Pago Punch".to_string(),
            rating: 8.0,
            date_made: date,
            notes: String::new(),
            venue: String::new(),
            occasion: String::new(),
            modifications: String::new(),
            date_created: date,
        };
        let line = render_review_line(&review);
        assert!(line.contains(" 8.0 Good"));
        assert!(line.ends_with("Pago Pago Punch"));
    }

    #[test]
    fn delete_accepts_imported_text_ids() {
        let cli = Cli::try_parse_from(["cocktail-log", "delete", "2"]).unwrap();
        assert!(matches!(cli.command, Commands::Delete { ref id } if id == "2"));
    }
}
