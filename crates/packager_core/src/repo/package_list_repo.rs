//! Package list repository contract and SQLite implementation.
//!
//! # Invariants
//! - Listing is deterministic: `name COLLATE NOCASE ASC, id ASC`.
//! - `rename_list` applies name and description together or not at all.

use crate::model::package_list::{PackageList, PackageListId};
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const LIST_SELECT_SQL: &str = "SELECT id, name, description FROM package_lists";

/// Repository interface for package lists.
pub trait PackageListRepository {
    fn create_list(&self, list: &PackageList) -> RepoResult<PackageListId>;
    /// Replaces name and description of an existing list.
    fn rename_list(
        &self,
        id: PackageListId,
        name: &str,
        description: Option<&str>,
    ) -> RepoResult<PackageList>;
    fn get_list(&self, id: PackageListId) -> RepoResult<Option<PackageList>>;
    fn list_lists(&self) -> RepoResult<Vec<PackageList>>;
    /// Removes one list; `NotFound` when no row was deleted.
    fn delete_list(&self, id: PackageListId) -> RepoResult<()>;
    /// Exact, case-sensitive name lookup used by read-only validation.
    fn list_name_exists(&self, name: &str) -> RepoResult<bool>;
}

/// SQLite-backed package list repository.
pub struct SqlitePackageListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePackageListRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PackageListRepository for SqlitePackageListRepository<'_> {
    fn create_list(&self, list: &PackageList) -> RepoResult<PackageListId> {
        self.conn
            .execute(
                "INSERT INTO package_lists (id, name, description) VALUES (?1, ?2, ?3);",
                params![
                    list.id.to_string(),
                    list.name.as_str(),
                    list.description.as_deref()
                ],
            )
            .map_err(|err| RepoError::from_write(err, &list.name))?;
        Ok(list.id)
    }

    fn rename_list(
        &self,
        id: PackageListId,
        name: &str,
        description: Option<&str>,
    ) -> RepoResult<PackageList> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx
            .execute(
                "UPDATE package_lists SET name = ?2, description = ?3 WHERE id = ?1;",
                params![id.to_string(), name, description],
            )
            .map_err(|err| RepoError::from_write(err, name))?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        let renamed = load_list(&tx, id)?.ok_or(RepoError::NotFound(id))?;
        tx.commit()?;
        Ok(renamed)
    }

    fn get_list(&self, id: PackageListId) -> RepoResult<Option<PackageList>> {
        load_list(self.conn, id)
    }

    fn list_lists(&self) -> RepoResult<Vec<PackageList>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LIST_SELECT_SQL} ORDER BY name COLLATE NOCASE ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut lists = Vec::new();
        while let Some(row) = rows.next()? {
            lists.push(parse_list_row(row)?);
        }
        Ok(lists)
    }

    fn delete_list(&self, id: PackageListId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM package_lists WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn list_name_exists(&self, name: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM package_lists WHERE name = ?1);",
            [name],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn load_list(conn: &Connection, id: PackageListId) -> RepoResult<Option<PackageList>> {
    let mut stmt = conn.prepare(&format!("{LIST_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_list_row(row)?));
    }
    Ok(None)
}

fn parse_list_row(row: &Row<'_>) -> RepoResult<PackageList> {
    let id_text: String = row.get("id")?;
    Ok(PackageList {
        id: parse_uuid(&id_text, "package_lists.id")?,
        name: row.get("name")?,
        description: row.get("description")?,
    })
}
