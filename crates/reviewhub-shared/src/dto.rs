//! Data Transfer Objects - the on-disk layout of the live endpoint's database.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields holding record ids. Snapshot documents always carry them as numbers.
pub const ID_FIELDS: [&str; 3] = ["id", "userId", "reviewId"];

/// The single `db.json` document served by the live endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseDump {
    #[serde(default)]
    pub reviews: Vec<Value>,
    #[serde(default)]
    pub users: Vec<Value>,
    #[serde(default)]
    pub comments: Vec<Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("Malformed database dump: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("{collection}[{index}].{field} is not a numeric id: {value}")]
    NonNumericId {
        collection: &'static str,
        index: usize,
        field: &'static str,
        value: String,
    },
}

impl DatabaseDump {
    pub fn from_json(raw: &str) -> Result<Self, DumpError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// `(collection name, records)` in snapshot file order.
    pub fn collections(&self) -> [(&'static str, &[Value]); 3] {
        [
            ("reviews", self.reviews.as_slice()),
            ("users", self.users.as_slice()),
            ("comments", self.comments.as_slice()),
        ]
    }

    /// Rewrite every id field to a JSON number. Returns how many values changed.
    pub fn coerce_ids(&mut self) -> Result<usize, DumpError> {
        let mut changed = 0;
        for (collection, records) in [
            ("reviews", &mut self.reviews),
            ("users", &mut self.users),
            ("comments", &mut self.comments),
        ] {
            for (index, record) in records.iter_mut().enumerate() {
                if let Value::Object(fields) = record {
                    changed += coerce_record(collection, index, fields)?;
                }
            }
        }
        Ok(changed)
    }
}

fn coerce_record(
    collection: &'static str,
    index: usize,
    fields: &mut Map<String, Value>,
) -> Result<usize, DumpError> {
    let mut changed = 0;
    for field in ID_FIELDS {
        let Some(value) = fields.get_mut(field) else {
            continue;
        };
        if let Value::String(raw) = value {
            let number: u64 = raw.trim().parse().map_err(|_| DumpError::NonNumericId {
                collection,
                index,
                field,
                value: raw.clone(),
            })?;
            *value = Value::from(number);
            changed += 1;
        }
    }
    Ok(changed)
}
