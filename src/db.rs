//! SQLite persistence for goal and stash selections

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::selection::Selection;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Goal list in display order; disabled goals stay listed
        CREATE TABLE IF NOT EXISTS goals (
            item_id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            disabled INTEGER NOT NULL DEFAULT 0
        );

        -- Items the user already holds enough of
        CREATE TABLE IF NOT EXISTS stash (
            item_id TEXT PRIMARY KEY
        );

        CREATE INDEX IF NOT EXISTS idx_goals_position ON goals(position);
        "#,
    )?;
    Ok(())
}

/// Load the persisted selection, restoring its invariants
pub fn load_selection(conn: &Connection) -> Result<Selection> {
    let mut stmt = conn.prepare("SELECT item_id, disabled FROM goals ORDER BY position")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?)))?;

    let mut goals = Vec::new();
    let mut disabled = Vec::new();
    for row in rows {
        let (id, is_disabled) = row.context("Failed to read goal row")?;
        if is_disabled {
            disabled.push(id.clone());
        }
        goals.push(id);
    }

    let mut stmt = conn.prepare("SELECT item_id FROM stash ORDER BY item_id")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut stash = Vec::new();
    for row in rows {
        stash.push(row.context("Failed to read stash row")?);
    }

    Ok(Selection::from_parts(goals, disabled, stash))
}

/// Replace the persisted selection with `selection` in one transaction
pub fn save_selection(conn: &mut Connection, selection: &Selection) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch("DELETE FROM goals; DELETE FROM stash;")?;

    {
        let mut insert_goal =
            tx.prepare("INSERT INTO goals (item_id, position, disabled) VALUES (?1, ?2, ?3)")?;
        for (position, id) in selection.goals().iter().enumerate() {
            insert_goal.execute((id, position as i64, selection.is_disabled(id)))?;
        }

        let mut insert_stash = tx.prepare("INSERT INTO stash (item_id) VALUES (?1)")?;
        let mut stash: Vec<_> = selection.stash().iter().collect();
        stash.sort();
        for id in stash {
            insert_stash.execute([id])?;
        }
    }

    tx.commit().context("Failed to save selection")?;
    Ok(())
}
