//! Persistence collaborator for people, chores and completions
//!
//! Every mutation runs in a single transaction: a reader never sees a chore
//! whose subtask or assignee lists are half replaced.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use crate::error::{ChoreField, ValidationErrors};
use crate::models::{Chore, Completion, NewChore, Person, PersonSeed, Subtask};
use crate::schedule::Frequency;
use crate::uuid_utils;
use crate::{Error, Result};

/// CRUD operations the board needs from storage
#[async_trait]
pub trait ChoreStore: Send + Sync {
    /// All people, ordered by name
    async fn list_people(&self) -> Result<Vec<Person>>;

    /// Insert or refresh a person keyed by name
    async fn upsert_person(&self, seed: &PersonSeed) -> Result<Person>;

    /// All chores with resolved assignees and ordered subtasks
    async fn list_chores(&self) -> Result<Vec<Chore>>;

    async fn get_chore(&self, chore_id: Uuid) -> Result<Chore>;

    /// Store a new chore; ids are assigned here and subtask order follows input order
    async fn create_chore(&self, chore: &NewChore) -> Result<Chore>;

    /// Replace title, frequency, assignees and subtasks wholesale
    async fn replace_chore(&self, chore_id: Uuid, chore: &NewChore) -> Result<Chore>;

    /// Delete a chore along with its subtasks and assignment links
    async fn delete_chore(&self, chore_id: Uuid) -> Result<()>;

    /// Set `last_done_at` and append a completion record
    async fn record_completion(
        &self,
        chore_id: Uuid,
        completed_at: DateTime<Utc>,
        completed_by: Option<Uuid>,
    ) -> Result<Completion>;

    /// Completion history for a chore, newest first
    async fn list_completions(&self, chore_id: Uuid) -> Result<Vec<Completion>>;
}

/// Seed the household roster (idempotent)
pub async fn seed_people<S: ChoreStore + ?Sized>(store: &S, roster: &[PersonSeed]) -> Result<Vec<Person>> {
    let mut people = Vec::with_capacity(roster.len());
    for seed in roster {
        people.push(store.upsert_person(seed).await?);
    }
    info!("Seeded {} household member(s)", people.len());
    Ok(people)
}

/// SQLite-backed [`ChoreStore`]
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn person_from_row(row: &SqliteRow, id_column: &str) -> Result<Person> {
    Ok(Person {
        id: uuid_utils::from_column(&row.try_get::<String, _>(id_column)?)?,
        name: row.try_get("name")?,
        initials: row.try_get("initials")?,
        color: row.try_get("color")?,
    })
}

fn completion_from_row(row: &SqliteRow) -> Result<Completion> {
    let completed_by: Option<String> = row.try_get("completed_by_person_id")?;
    Ok(Completion {
        id: uuid_utils::from_column(&row.try_get::<String, _>("id")?)?,
        chore_id: uuid_utils::from_column(&row.try_get::<String, _>("chore_id")?)?,
        completed_at: row.try_get("completed_at")?,
        completed_by_person_id: completed_by
            .as_deref()
            .map(uuid_utils::from_column)
            .transpose()?,
    })
}

/// Load chores (all, or just `only`) with their children, ordered by title
async fn load_chores(conn: &mut SqliteConnection, only: Option<Uuid>) -> Result<Vec<Chore>> {
    let only = only.map(|id| id.to_string());

    let chore_rows = sqlx::query(
        "SELECT id, title, frequency, last_done_at FROM chores
         WHERE (? IS NULL OR id = ?)
         ORDER BY title ASC",
    )
    .bind(&only)
    .bind(&only)
    .fetch_all(&mut *conn)
    .await?;

    let subtask_rows = sqlx::query(
        "SELECT id, chore_id, text, sort_order FROM subtasks
         WHERE (? IS NULL OR chore_id = ?)
         ORDER BY chore_id, sort_order ASC",
    )
    .bind(&only)
    .bind(&only)
    .fetch_all(&mut *conn)
    .await?;

    let assignee_rows = sqlx::query(
        "SELECT ca.chore_id, p.id AS person_id, p.name, p.initials, p.color
         FROM chore_assignees ca
         JOIN people p ON p.id = ca.person_id
         WHERE (? IS NULL OR ca.chore_id = ?)
         ORDER BY p.name ASC",
    )
    .bind(&only)
    .bind(&only)
    .fetch_all(&mut *conn)
    .await?;

    let mut subtasks: HashMap<Uuid, Vec<Subtask>> = HashMap::new();
    for row in &subtask_rows {
        let chore_id = uuid_utils::from_column(&row.try_get::<String, _>("chore_id")?)?;
        subtasks.entry(chore_id).or_default().push(Subtask {
            id: uuid_utils::from_column(&row.try_get::<String, _>("id")?)?,
            chore_id,
            text: row.try_get("text")?,
            order: row.try_get("sort_order")?,
        });
    }

    let mut assignees: HashMap<Uuid, Vec<Person>> = HashMap::new();
    for row in &assignee_rows {
        let chore_id = uuid_utils::from_column(&row.try_get::<String, _>("chore_id")?)?;
        assignees
            .entry(chore_id)
            .or_default()
            .push(person_from_row(row, "person_id")?);
    }

    chore_rows
        .iter()
        .map(|row| -> Result<Chore> {
            let id = uuid_utils::from_column(&row.try_get::<String, _>("id")?)?;
            let frequency: String = row.try_get("frequency")?;
            Ok(Chore {
                id,
                title: row.try_get("title")?,
                frequency: frequency
                    .parse::<Frequency>()
                    .map_err(|e| Error::Internal(format!("Chore {}: {}", id, e)))?,
                last_done_at: row.try_get("last_done_at")?,
                assignees: assignees.remove(&id).unwrap_or_default(),
                subtasks: subtasks.remove(&id).unwrap_or_default(),
            })
        })
        .collect()
}

async fn load_chore(conn: &mut SqliteConnection, chore_id: Uuid) -> Result<Chore> {
    load_chores(conn, Some(chore_id))
        .await?
        .pop()
        .ok_or_else(|| Error::NotFound(format!("chore {}", chore_id)))
}

async fn person_exists(conn: &mut SqliteConnection, person_id: Uuid) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM people WHERE id = ?")
        .bind(person_id.to_string())
        .fetch_one(&mut *conn)
        .await?;
    Ok(count > 0)
}

/// Reject assignee ids that do not name a known person
async fn check_assignees(conn: &mut SqliteConnection, chore: &NewChore) -> Result<()> {
    let mut errors = ValidationErrors::new();
    for person_id in &chore.assignee_ids {
        if !person_exists(conn, *person_id).await? {
            errors.push(ChoreField::AssigneeIds, format!("unknown assignee {}", person_id));
        }
    }
    errors.into_result(()).map_err(Error::from)
}

/// Insert assignee links and subtasks for a chore (order = input order)
async fn insert_children(conn: &mut SqliteConnection, chore_id: Uuid, chore: &NewChore) -> Result<()> {
    for person_id in &chore.assignee_ids {
        sqlx::query("INSERT INTO chore_assignees (chore_id, person_id) VALUES (?, ?)")
            .bind(chore_id.to_string())
            .bind(person_id.to_string())
            .execute(&mut *conn)
            .await?;
    }

    for (order, text) in chore.subtasks.iter().enumerate() {
        sqlx::query("INSERT INTO subtasks (id, chore_id, text, sort_order) VALUES (?, ?, ?, ?)")
            .bind(uuid_utils::generate().to_string())
            .bind(chore_id.to_string())
            .bind(text)
            .bind(order as i64)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

#[async_trait]
impl ChoreStore for SqliteStore {
    async fn list_people(&self) -> Result<Vec<Person>> {
        let rows = sqlx::query("SELECT id, name, initials, color FROM people ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(|row| person_from_row(row, "id")).collect()
    }

    async fn upsert_person(&self, seed: &PersonSeed) -> Result<Person> {
        sqlx::query(
            r#"
            INSERT INTO people (id, name, initials, color)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(name) DO UPDATE SET
                initials = excluded.initials,
                color = excluded.color
            "#,
        )
        .bind(uuid_utils::generate().to_string())
        .bind(&seed.name)
        .bind(&seed.initials)
        .bind(&seed.color)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query("SELECT id, name, initials, color FROM people WHERE name = ?")
            .bind(&seed.name)
            .fetch_one(&self.pool)
            .await?;
        person_from_row(&row, "id")
    }

    async fn list_chores(&self) -> Result<Vec<Chore>> {
        // One transaction so the three reads see the same snapshot
        let mut tx = self.pool.begin().await?;
        let chores = load_chores(&mut *tx, None).await?;
        tx.commit().await?;
        Ok(chores)
    }

    async fn get_chore(&self, chore_id: Uuid) -> Result<Chore> {
        let mut tx = self.pool.begin().await?;
        let chore = load_chore(&mut *tx, chore_id).await?;
        tx.commit().await?;
        Ok(chore)
    }

    async fn create_chore(&self, chore: &NewChore) -> Result<Chore> {
        let mut tx = self.pool.begin().await?;
        check_assignees(&mut *tx, chore).await?;

        let chore_id = uuid_utils::generate();
        sqlx::query("INSERT INTO chores (id, title, frequency, last_done_at) VALUES (?, ?, ?, NULL)")
            .bind(chore_id.to_string())
            .bind(&chore.title)
            .bind(chore.frequency.as_str())
            .execute(&mut *tx)
            .await?;
        insert_children(&mut *tx, chore_id, chore).await?;

        let created = load_chore(&mut *tx, chore_id).await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn replace_chore(&self, chore_id: Uuid, chore: &NewChore) -> Result<Chore> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE chores SET title = ?, frequency = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(&chore.title)
        .bind(chore.frequency.as_str())
        .bind(chore_id.to_string())
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(Error::NotFound(format!("chore {}", chore_id)));
        }
        check_assignees(&mut *tx, chore).await?;

        sqlx::query("DELETE FROM chore_assignees WHERE chore_id = ?")
            .bind(chore_id.to_string())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM subtasks WHERE chore_id = ?")
            .bind(chore_id.to_string())
            .execute(&mut *tx)
            .await?;
        insert_children(&mut *tx, chore_id, chore).await?;

        let replaced = load_chore(&mut *tx, chore_id).await?;
        tx.commit().await?;
        Ok(replaced)
    }

    async fn delete_chore(&self, chore_id: Uuid) -> Result<()> {
        let deleted = sqlx::query("DELETE FROM chores WHERE id = ?")
            .bind(chore_id.to_string())
            .execute(&self.pool)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(Error::NotFound(format!("chore {}", chore_id)));
        }
        Ok(())
    }

    async fn record_completion(
        &self,
        chore_id: Uuid,
        completed_at: DateTime<Utc>,
        completed_by: Option<Uuid>,
    ) -> Result<Completion> {
        let mut tx = self.pool.begin().await?;

        if let Some(person_id) = completed_by {
            if !person_exists(&mut *tx, person_id).await? {
                return Err(Error::NotFound(format!("person {}", person_id)));
            }
        }

        let updated = sqlx::query(
            "UPDATE chores SET last_done_at = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(completed_at)
        .bind(chore_id.to_string())
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(Error::NotFound(format!("chore {}", chore_id)));
        }

        let completion = Completion {
            id: uuid_utils::generate(),
            chore_id,
            completed_at,
            completed_by_person_id: completed_by,
        };
        sqlx::query(
            "INSERT INTO completions (id, chore_id, completed_at, completed_by_person_id)
             VALUES (?, ?, ?, ?)",
        )
        .bind(completion.id.to_string())
        .bind(chore_id.to_string())
        .bind(completed_at)
        .bind(completed_by.map(|id| id.to_string()))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(completion)
    }

    async fn list_completions(&self, chore_id: Uuid) -> Result<Vec<Completion>> {
        let rows = sqlx::query(
            "SELECT id, chore_id, completed_at, completed_by_person_id FROM completions
             WHERE chore_id = ?
             ORDER BY completed_at DESC",
        )
        .bind(chore_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(completion_from_row).collect()
    }
}
