//! Inventory category/item repository contract and SQLite implementation.
//!
//! # Invariants
//! - Items are only written when their category exists; the check and the
//!   write share one transaction.
//! - A category that still owns items cannot be deleted.
//! - Listing is deterministic: `name COLLATE NOCASE ASC, id ASC`.

use crate::model::inventory::{
    Category, CategoryId, CategoryWithItems, InventoryItem, ItemId,
};
use crate::repo::{parse_uuid, parse_weight, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const ITEM_SELECT_SQL: &str = "SELECT id, name, description, weight, category_id
FROM inventory_items";

/// Repository interface for inventory categories and items.
pub trait InventoryRepository {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId>;
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    /// Lists every category with its items, including empty categories.
    fn list_categories_with_items(&self) -> RepoResult<Vec<CategoryWithItems>>;
    /// Removes one category; `StillReferenced` while it owns items.
    fn delete_category(&self, id: CategoryId) -> RepoResult<()>;

    fn create_item(&self, item: &InventoryItem) -> RepoResult<ItemId>;
    /// Replaces all editable fields of an existing item.
    fn update_item(&self, item: &InventoryItem) -> RepoResult<()>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<InventoryItem>>;
    fn list_items(&self, category_id: Option<CategoryId>) -> RepoResult<Vec<InventoryItem>>;
    fn delete_item(&self, id: ItemId) -> RepoResult<()>;
    fn item_name_exists(&self, name: &str) -> RepoResult<bool>;
    /// Sum of all item weights in grams.
    fn total_weight(&self) -> RepoResult<u64>;
}

/// SQLite-backed inventory repository.
pub struct SqliteInventoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteInventoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl InventoryRepository for SqliteInventoryRepository<'_> {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId> {
        self.conn
            .execute(
                "INSERT INTO inventory_categories (id, name, description) VALUES (?1, ?2, ?3);",
                params![
                    category.id.to_string(),
                    category.name.as_str(),
                    category.description.as_deref()
                ],
            )
            .map_err(|err| RepoError::from_write(err, &category.name))?;
        Ok(category.id)
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description FROM inventory_categories WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description
             FROM inventory_categories
             ORDER BY name COLLATE NOCASE ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn list_categories_with_items(&self) -> RepoResult<Vec<CategoryWithItems>> {
        let categories = self.list_categories()?;
        let mut items = self.list_items(None)?;
        let grouped = categories
            .into_iter()
            .map(|category| {
                let (owned, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut items)
                    .into_iter()
                    .partition(|item| item.category_id == category.id);
                items = rest;
                CategoryWithItems {
                    category,
                    items: owned,
                }
            })
            .collect();
        Ok(grouped)
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "DELETE FROM inventory_categories WHERE id = ?1;",
                [id.to_string()],
            )
            .map_err(|err| RepoError::from_delete(err, id))?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn create_item(&self, item: &InventoryItem) -> RepoResult<ItemId> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_category_exists(&tx, item.category_id)?;
        tx.execute(
            "INSERT INTO inventory_items (id, name, description, weight, category_id)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                item.id.to_string(),
                item.name.as_str(),
                item.description.as_deref(),
                i64::from(item.weight),
                item.category_id.to_string(),
            ],
        )
        .map_err(|err| RepoError::from_write(err, &item.name))?;
        tx.commit()?;
        Ok(item.id)
    }

    fn update_item(&self, item: &InventoryItem) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_category_exists(&tx, item.category_id)?;
        let changed = tx
            .execute(
                "UPDATE inventory_items
                 SET name = ?2, description = ?3, weight = ?4, category_id = ?5
                 WHERE id = ?1;",
                params![
                    item.id.to_string(),
                    item.name.as_str(),
                    item.description.as_deref(),
                    i64::from(item.weight),
                    item.category_id.to_string(),
                ],
            )
            .map_err(|err| RepoError::from_write(err, &item.name))?;
        if changed == 0 {
            return Err(RepoError::NotFound(item.id));
        }
        tx.commit()?;
        Ok(())
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<InventoryItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }
        Ok(None)
    }

    fn list_items(&self, category_id: Option<CategoryId>) -> RepoResult<Vec<InventoryItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL}
             WHERE (?1 IS NULL OR category_id = ?1)
             ORDER BY name COLLATE NOCASE ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([category_id.map(|id| id.to_string())])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM inventory_items WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn item_name_exists(&self, name: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM inventory_items WHERE name = ?1);",
            [name],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn total_weight(&self) -> RepoResult<u64> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(weight), 0) FROM inventory_items;",
            [],
            |row| row.get(0),
        )?;
        u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative total weight `{total}`")))
    }
}

fn ensure_category_exists(conn: &Connection, id: CategoryId) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM inventory_categories WHERE id = ?1);",
        [id.to_string()],
        |row| row.get(0),
    )?;
    if exists == 1 {
        Ok(())
    } else {
        Err(RepoError::NotFound(id))
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let id_text: String = row.get("id")?;
    Ok(Category {
        id: parse_uuid(&id_text, "inventory_categories.id")?,
        name: row.get("name")?,
        description: row.get("description")?,
    })
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<InventoryItem> {
    let id_text: String = row.get("id")?;
    let category_text: String = row.get("category_id")?;
    Ok(InventoryItem {
        id: parse_uuid(&id_text, "inventory_items.id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        weight: parse_weight(row.get("weight")?, "inventory_items.weight")?,
        category_id: parse_uuid(&category_text, "inventory_items.category_id")?,
    })
}
