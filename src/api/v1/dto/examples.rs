/*
 * Responsibility
 * - Examples の request/response DTO
 * - validation (形式チェック) は validate() で行う
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::Example;

pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

const DEFAULT_LIMIT: usize = 10;

/// Body of both POST and PUT.
#[derive(Debug, Deserialize)]
pub struct ExampleRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl ExampleRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        let name_len = self.name.trim().chars().count();
        if name_len == 0 {
            return Err("name is required");
        }
        if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name_len) {
            return Err("name must be between 3 and 100 characters");
        }
        if self.description.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err("description must be <= 500 characters");
        }
        Ok(())
    }
}

/// Paging parameters, kept raw: unparsable values fall back instead of failing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListQuery {
    /// Positive integer, else the default page size.
    pub fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_LIMIT)
    }

    /// Non-negative integer, else 0.
    pub fn offset(&self) -> usize {
        self.offset
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(0)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub description: String,
    pub status: String,
}

impl From<Example> for ExampleResponse {
    fn from(e: Example) -> Self {
        Self {
            id: e.id,
            created_at: e.created_at,
            updated_at: e.updated_at,
            name: e.name,
            description: e.description,
            status: e.status,
        }
    }
}
