//! # Snapshot Export
//!
//! Reads the live endpoint's `db.json` and writes `reviews.json`,
//! `users.json` and `comments.json` with every id coerced to a number.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use reviewhub_core::domain::{Comment, Review, UserRecord};
use reviewhub_core::ports::Collection;
use reviewhub_shared::DatabaseDump;

#[derive(Debug, Parser)]
#[command(name = "snapshot-export", version, about)]
struct Args {
    /// The live endpoint's database file
    db_json: PathBuf,

    /// Directory the snapshot documents are written to
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let written = export(&args.db_json, &args.out_dir).await?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,snapshot_export=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn export(db_json: &Path, out_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let raw = tokio::fs::read_to_string(db_json)
        .await
        .with_context(|| format!("failed to read {}", db_json.display()))?;
    let mut dump = DatabaseDump::from_json(&raw)?;
    let coerced = dump.coerce_ids()?;
    tracing::info!(coerced, "Normalized record ids");

    validate(&dump)?;

    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let mut written = Vec::new();
    for (name, records) in dump.collections() {
        let path = out_dir.join(format!("{name}.json"));
        let body = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&path, body)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(collection = name, count = records.len(), path = %path.display(), "Snapshot written");
        written.push(path);
    }
    Ok(written)
}

/// Refuse to publish documents the snapshot source could not read.
fn validate(dump: &DatabaseDump) -> anyhow::Result<()> {
    fn check<T: serde::de::DeserializeOwned>(
        collection: Collection,
        records: &[serde_json::Value],
    ) -> anyhow::Result<()> {
        for (index, record) in records.iter().enumerate() {
            T::deserialize(record)
                .with_context(|| format!("{}[{index}] is not a valid record", collection.name()))?;
        }
        Ok(())
    }

    check::<Review>(Collection::Reviews, &dump.reviews)?;
    check::<UserRecord>(Collection::Users, &dump.users)?;
    check::<Comment>(Collection::Comments, &dump.comments)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    const DB: &str = r#"{
        "reviews": [{
            "id": "1", "userId": "1", "title": "Great ramen", "content": "so good",
            "category": "food", "rating": 4, "images": [], "tags": ["noodle"],
            "createdAt": "2024-03-01T10:00:00.000Z", "updatedAt": "2024-03-01T10:00:00.000Z"
        }],
        "users": [{
            "id": 1, "email": "test@example.com", "password": "password123",
            "username": "tester", "nickname": "Tess"
        }],
        "comments": [{
            "id": "4", "reviewId": "1", "userId": 1, "content": "agreed",
            "createdAt": "2024-03-02T10:00:00.000Z", "updatedAt": "2024-03-02T10:00:00.000Z"
        }]
    }"#;

    #[tokio::test]
    async fn test_export_writes_numeric_ids() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("db.json");
        tokio::fs::write(&db, DB).await.unwrap();
        let out = dir.path().join("public");

        let written = export(&db, &out).await.unwrap();
        assert_eq!(written.len(), 3);

        let reviews: Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("reviews.json")).unwrap())
                .unwrap();
        assert_eq!(reviews[0]["id"], json!(1));
        assert_eq!(reviews[0]["userId"], json!(1));

        let comments: Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("comments.json")).unwrap())
                .unwrap();
        assert_eq!(comments[0]["reviewId"], json!(1));
    }

    #[tokio::test]
    async fn test_invalid_record_aborts_export() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("db.json");
        tokio::fs::write(&db, r#"{ "reviews": [{ "id": 1, "rating": 9 }] }"#)
            .await
            .unwrap();
        let out = dir.path().join("public");

        assert!(export(&db, &out).await.is_err());
        assert!(!out.exists());
    }
}
