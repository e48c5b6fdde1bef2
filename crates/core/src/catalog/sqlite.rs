//! SQLite-backed catalog store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{CatalogEntry, CatalogError, CatalogStore, NewEntry};

const ENTRY_COLUMNS: &str =
    "id, name, slug, types, category, abilities, weakness, description, sprite";

/// SQL function lowercasing its argument with full Unicode rules.
/// SQLite's own `lower()` and `LIKE` only fold ASCII.
const FOLD_CASE_FN: &str = "fold_case";

/// SQLite-backed catalog store.
pub struct SqliteCatalogStore {
    conn: Mutex<Connection>,
}

/// A row as stored, before list columns are decoded.
struct StoredRow {
    id: i64,
    name: String,
    slug: String,
    types: String,
    category: String,
    abilities: String,
    weakness: Option<String>,
    description: String,
    sprite: String,
}

impl TryFrom<StoredRow> for CatalogEntry {
    type Error = CatalogError;

    fn try_from(row: StoredRow) -> Result<Self, Self::Error> {
        let types: Vec<String> = serde_json::from_str(&row.types).map_err(|e| {
            CatalogError::validation("types", format!("stored value for id {}: {}", row.id, e))
        })?;

        let weakness: Option<Vec<String>> = row
            .weakness
            .as_deref()
            .map(|json| serde_json::from_str::<Vec<String>>(json))
            .transpose()
            .map_err(|e| {
                CatalogError::validation(
                    "weakness",
                    format!("stored value for id {}: {}", row.id, e),
                )
            })?;

        Ok(CatalogEntry {
            id: row.id,
            name: row.name,
            slug: row.slug,
            types,
            category: row.category,
            abilities: row.abilities,
            weakness,
            description: row.description,
            sprite: row.sprite,
        })
    }
}

impl SqliteCatalogStore {
    /// Create a new SQLite store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path).map_err(db_error)?;
        Self::register_functions(&conn)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite store (useful for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn = Connection::open_in_memory().map_err(db_error)?;
        Self::register_functions(&conn)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn register_functions(conn: &Connection) -> Result<(), CatalogError> {
        conn.create_scalar_function(
            FOLD_CASE_FN,
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let value: String = ctx.get(0)?;
                Ok(value.to_lowercase())
            },
        )
        .map_err(db_error)
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CatalogError> {
        conn.execute_batch(
            r#"
            -- One row per entry; list columns hold JSON arrays
            CREATE TABLE IF NOT EXISTS pokemon (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                types TEXT NOT NULL DEFAULT '[]',
                category TEXT NOT NULL,
                abilities TEXT NOT NULL,
                weakness TEXT,
                description TEXT NOT NULL,
                sprite TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_pokemon_name ON pokemon(name);
            "#,
        )
        .map_err(db_error)?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CatalogError> {
        self.conn
            .lock()
            .map_err(|_| CatalogError::Database("connection lock poisoned".to_string()))
    }

    fn read_row(row: &rusqlite::Row) -> rusqlite::Result<StoredRow> {
        Ok(StoredRow {
            id: row.get(0)?,
            name: row.get(1)?,
            slug: row.get(2)?,
            types: row.get(3)?,
            category: row.get(4)?,
            abilities: row.get(5)?,
            weakness: row.get(6)?,
            description: row.get(7)?,
            sprite: row.get(8)?,
        })
    }

    fn query_entries(
        conn: &Connection,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<CatalogEntry>, CatalogError> {
        let mut stmt = conn.prepare(sql).map_err(db_error)?;
        let rows = stmt.query_map(params, Self::read_row).map_err(db_error)?;

        let mut entries = Vec::new();
        for row in rows {
            let stored = row.map_err(db_error)?;
            entries.push(CatalogEntry::try_from(stored)?);
        }
        Ok(entries)
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn insert(&self, entry: &NewEntry) -> Result<CatalogEntry, CatalogError> {
        let types_json = serde_json::to_string(&entry.types)
            .map_err(|e| CatalogError::validation("types", e.to_string()))?;
        let weakness_json = entry
            .weakness
            .as_ref()
            .map(|weakness| serde_json::to_string(weakness))
            .transpose()
            .map_err(|e| CatalogError::validation("weakness", e.to_string()))?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO pokemon (name, slug, types, category, abilities, weakness, description, sprite)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                &entry.name,
                &entry.slug,
                &types_json,
                &entry.category,
                &entry.abilities,
                &weakness_json,
                &entry.description,
                &entry.sprite,
            ],
        )
        .map_err(insert_error)?;

        let id = conn.last_insert_rowid();
        Ok(CatalogEntry::from_new(id, entry.clone()))
    }

    fn find_all(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM pokemon ORDER BY name COLLATE BINARY ASC, id ASC",
            ENTRY_COLUMNS
        );
        Self::query_entries(&conn, &sql, &[])
    }

    fn find_by_name_substrings(
        &self,
        names: &[String],
        limit: usize,
    ) -> Result<Vec<CatalogEntry>, CatalogError> {
        if names.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let condition = format!("instr({}(name), ?) > 0", FOLD_CASE_FN);
        let conditions = vec![condition.as_str(); names.len()].join(" OR ");
        let sql = format!(
            "SELECT {} FROM pokemon WHERE {} ORDER BY id ASC LIMIT ?",
            ENTRY_COLUMNS, conditions
        );
        debug!(names = names.len(), limit, "Searching catalog by name");

        let mut params: Vec<Box<dyn rusqlite::ToSql>> = names
            .iter()
            .map(|name| Box::new(name.to_lowercase()) as Box<dyn rusqlite::ToSql>)
            .collect();
        params.push(Box::new(limit as i64));
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let conn = self.lock()?;
        Self::query_entries(&conn, &sql, param_refs.as_slice())
    }

    fn find_by_types(&self, types: &[String]) -> Result<Vec<CatalogEntry>, CatalogError> {
        if types.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; types.len()].join(", ");
        let sql = format!(
            "SELECT {} FROM pokemon
             WHERE EXISTS (
                 SELECT 1 FROM json_each(pokemon.types) WHERE json_each.value IN ({})
             )
             ORDER BY name COLLATE BINARY ASC, id ASC",
            ENTRY_COLUMNS, placeholders
        );
        debug!(types = ?types, "Filtering catalog by type");

        let param_refs: Vec<&dyn rusqlite::ToSql> =
            types.iter().map(|t| t as &dyn rusqlite::ToSql).collect();

        let conn = self.lock()?;
        Self::query_entries(&conn, &sql, param_refs.as_slice())
    }

    fn find_by_slug(&self, slug: &str) -> Result<Option<CatalogEntry>, CatalogError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM pokemon WHERE slug = ?", ENTRY_COLUMNS);

        let stored = conn
            .query_row(&sql, params![slug], Self::read_row)
            .optional()
            .map_err(db_error)?;

        stored.map(CatalogEntry::try_from).transpose()
    }

    fn count(&self) -> Result<u64, CatalogError> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM pokemon", [], |row| row.get(0))
            .map_err(db_error)?;
        Ok(count as u64)
    }
}

fn db_error(e: rusqlite::Error) -> CatalogError {
    CatalogError::Database(e.to_string())
}

/// Map insert failures, turning UNIQUE violations into conflicts that name
/// the offending column.
fn insert_error(e: rusqlite::Error) -> CatalogError {
    if let rusqlite::Error::SqliteFailure(_, Some(message)) = &e {
        if let Some(columns) = message.strip_prefix("UNIQUE constraint failed: ") {
            let field = columns
                .split(',')
                .next()
                .and_then(|column| column.trim().rsplit('.').next())
                .filter(|column| !column.is_empty())
                .map(str::to_string);

            return CatalogError::Conflict {
                message: match &field {
                    Some(field) => format!("an entry with this {} already exists", field),
                    None => message.clone(),
                },
                field,
            };
        }
    }
    db_error(e)
}
