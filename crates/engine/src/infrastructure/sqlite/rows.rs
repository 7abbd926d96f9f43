//! Row mapping and the reads shared by pooled queries and units of work.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use arena_domain::{
    Battle, BattleId, BattleMove, CharacterId, CharacterName, CombatSnapshot, Health, Item,
    ItemCategory, Level, Move, RaceSkill,
};

use crate::infrastructure::ports::RepoError;

pub(super) const BATTLE_SELECT: &str = r#"
    SELECT b.id, b.opponent1_id, b.opponent2_id, b.active, b.last_move_id,
           b.start_date, b.end_date,
           m.id AS m_id, m.battle_id AS m_battle_id, m.opponent_id AS m_opponent_id,
           m.move AS m_move, m.create_date AS m_create_date
    FROM battles b
    LEFT JOIN battle_moves m ON m.id = b.last_move_id
"#;

const CHARACTER_SELECT: &str = r#"
    SELECT c.id, c.name, c.health, c.level, c.race_skill, c.in_battle,
           p.item_id AS p_id, p.category AS p_category, p.value AS p_value,
           s.item_id AS s_id, s.category AS s_category, s.value AS s_value
    FROM characters c
    LEFT JOIN inventory_items p ON p.character_id = c.id AND p.item_id = c.primary_item_id
    LEFT JOIN inventory_items s ON s.character_id = c.id AND s.item_id = c.secondary_item_id
    WHERE c.id = ?
"#;

pub(super) fn parse_id<T: From<Uuid>>(raw: &str) -> Result<T, RepoError> {
    Uuid::parse_str(raw)
        .map(T::from)
        .map_err(|e| RepoError::serialization(format!("invalid id '{raw}': {e}")))
}

pub(super) fn battle_move_from_row(row: &SqliteRow, prefix: &str) -> Result<BattleMove, RepoError> {
    let col = |name: &str| format!("{prefix}{name}");
    let raw_move: String = row.get(col("move").as_str());
    Ok(BattleMove {
        id: parse_id(&row.get::<String, _>(col("id").as_str()))?,
        battle_id: parse_id(&row.get::<String, _>(col("battle_id").as_str()))?,
        opponent_id: parse_id(&row.get::<String, _>(col("opponent_id").as_str()))?,
        mv: raw_move.parse::<Move>().map_err(RepoError::serialization)?,
        create_date: row.get::<DateTime<Utc>, _>(col("create_date").as_str()),
    })
}

pub(super) fn battle_from_row(row: &SqliteRow) -> Result<Battle, RepoError> {
    let last_move = match row.get::<Option<String>, _>("m_id") {
        Some(_) => Some(battle_move_from_row(row, "m_")?),
        None => None,
    };
    let last_move_id = row
        .get::<Option<String>, _>("last_move_id")
        .map(|raw| parse_id(&raw))
        .transpose()?;

    Ok(Battle {
        id: parse_id(&row.get::<String, _>("id"))?,
        opponent1_id: parse_id(&row.get::<String, _>("opponent1_id"))?,
        opponent2_id: parse_id(&row.get::<String, _>("opponent2_id"))?,
        active: row.get("active"),
        last_move_id,
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        last_move,
    })
}

fn slot_from_row(row: &SqliteRow, prefix: &str) -> Result<Option<Item>, RepoError> {
    let Some(raw_id) = row.get::<Option<String>, _>(format!("{prefix}id").as_str()) else {
        return Ok(None);
    };
    let category: String = row.get(format!("{prefix}category").as_str());
    Ok(Some(Item {
        id: parse_id(&raw_id)?,
        category: category
            .parse::<ItemCategory>()
            .map_err(RepoError::serialization)?,
        value: row.get(format!("{prefix}value").as_str()),
    }))
}

fn character_from_row(row: &SqliteRow) -> Result<CombatSnapshot, RepoError> {
    let name = CharacterName::new(row.get::<String, _>("name")).map_err(RepoError::serialization)?;
    let health = Health::new(row.get("health")).map_err(RepoError::serialization)?;
    let level = Level::new(row.get("level")).map_err(RepoError::serialization)?;
    let race_skill = row
        .get::<String, _>("race_skill")
        .parse::<RaceSkill>()
        .map_err(RepoError::serialization)?;

    Ok(CombatSnapshot::new(parse_id(&row.get::<String, _>("id"))?, name)
        .with_health(health)
        .with_level(level)
        .with_race_skill(race_skill)
        .with_primary_item(slot_from_row(row, "p_")?)
        .with_secondary_item(slot_from_row(row, "s_")?)
        .with_in_battle(row.get("in_battle")))
}

pub(super) async fn fetch_character(
    conn: &mut SqliteConnection,
    id: CharacterId,
) -> Result<Option<CombatSnapshot>, RepoError> {
    let row = sqlx::query(CHARACTER_SELECT)
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| RepoError::database("get_character", e))?;
    row.as_ref().map(character_from_row).transpose()
}

pub(super) async fn fetch_inventory(
    conn: &mut SqliteConnection,
    id: CharacterId,
) -> Result<Vec<Item>, RepoError> {
    let rows = sqlx::query(
        "SELECT item_id, category, value FROM inventory_items WHERE character_id = ? ORDER BY seq",
    )
    .bind(id.to_string())
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| RepoError::database("get_inventory", e))?;

    rows.iter()
        .map(|row| {
            let category: String = row.get("category");
            Ok(Item {
                id: parse_id(&row.get::<String, _>("item_id"))?,
                category: category
                    .parse::<ItemCategory>()
                    .map_err(RepoError::serialization)?,
                value: row.get("value"),
            })
        })
        .collect()
}

pub(super) async fn fetch_battle(
    conn: &mut SqliteConnection,
    id: BattleId,
) -> Result<Option<Battle>, RepoError> {
    let row = sqlx::query(&format!("{BATTLE_SELECT} WHERE b.id = ?"))
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| RepoError::database("get_battle", e))?;
    row.as_ref().map(battle_from_row).transpose()
}
