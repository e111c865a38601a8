//! Command-line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use reviewhub_core::domain::{Category, CommentId, Rating, ReviewId};
use reviewhub_core::query::SortOrder;

use crate::config::Mode;

#[derive(Debug, Parser)]
#[command(name = "reviewhub", version, about = "Browse and share reviews")]
pub struct Cli {
    /// Backend to use: live or snapshot (prod/production also mean snapshot)
    #[arg(long, global = true)]
    pub mode: Option<Mode>,

    /// Base URL of the live collection endpoint
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Base URL the snapshot documents are served from
    #[arg(long, global = true, value_name = "URL", conflicts_with = "snapshot_dir")]
    pub snapshot_url: Option<String>,

    /// Directory holding reviews.json, users.json and comments.json
    #[arg(long, global = true, value_name = "DIR")]
    pub snapshot_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse and write reviews
    #[command(subcommand)]
    Reviews(ReviewCommand),

    /// Read and write comments on a review
    #[command(subcommand)]
    Comments(CommentCommand),

    /// Log in with email and password
    Login {
        email: String,
        #[arg(long, env = "REVIEWHUB_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,
}

#[derive(Debug, Subcommand)]
pub enum ReviewCommand {
    /// List reviews, optionally filtered, searched and sorted
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long, short)]
        search: Option<String>,
        /// latest, oldest, ratingHigh or ratingLow
        #[arg(long)]
        sort: Option<SortOrder>,
    },

    /// Show one review with its comments
    Show {
        /// Review id as it appears in the route, e.g. `3`
        id: String,
    },

    /// Write a new review
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        category: Category,
        #[arg(long)]
        rating: Rating,
        /// Image URL (repeatable)
        #[arg(long = "image")]
        images: Vec<String>,
        /// Tag (repeatable, at most 4)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Edit one of your reviews; omitted fields stay unchanged
    Edit {
        id: ReviewId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        rating: Option<Rating>,
        /// Replace all image URLs (repeatable)
        #[arg(long = "image")]
        images: Option<Vec<String>>,
        /// Replace all tags (repeatable)
        #[arg(long = "tag")]
        tags: Option<Vec<String>>,
    },

    /// Delete one of your reviews
    Delete { id: ReviewId },
}

#[derive(Debug, Subcommand)]
pub enum CommentCommand {
    /// List comments of a review, newest first
    List { review_id: ReviewId },

    /// Comment on a review
    Add { review_id: ReviewId, content: String },

    /// Edit one of your comments
    Edit {
        review_id: ReviewId,
        comment_id: CommentId,
        content: String,
    },

    /// Delete one of your comments
    Delete {
        review_id: ReviewId,
        comment_id: CommentId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::parse_from([
            "reviewhub", "reviews", "create", "--title", "Pho", "--content", "rich",
            "--category", "food", "--rating", "5", "--tag", "soup", "--tag", "hot",
        ]);
        match cli.command {
            Command::Reviews(ReviewCommand::Create {
                category,
                rating,
                tags,
                images,
                ..
            }) => {
                assert_eq!(category, Category::Food);
                assert_eq!(rating.get(), 5);
                assert_eq!(tags, vec!["soup", "hot"]);
                assert!(images.is_empty());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let rating = Cli::try_parse_from([
            "reviewhub", "reviews", "create", "--title", "t", "--content", "c",
            "--category", "food", "--rating", "6",
        ]);
        assert!(rating.is_err());

        let sort = Cli::try_parse_from(["reviewhub", "reviews", "list", "--sort", "newest"]);
        assert!(sort.is_err());

        let id = Cli::try_parse_from(["reviewhub", "comments", "list", "abc"]);
        assert!(id.is_err());
    }
}
