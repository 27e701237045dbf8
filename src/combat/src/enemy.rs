// src/combat/src/enemy.rs

use std::io::Read;

use dungeon::Position;
use error::GameError;
use serde::{Deserialize, Serialize};

use crate::combatant::Stats;

/// 敌人名单每行的字段数：name,row,col,health,attack,defense,speed,vision
pub const FIELD_COUNT: usize = 8;

/// 从敌人名单读出的一名敌人(尚未放入地图)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub name: String,
    pub position: Position,
    pub stats: Stats,
    /// 发现玩家的曼哈顿距离阈值
    pub vision: i32,
}

impl EnemySpec {
    /// 解析单行，`line_no` 从 1 开始，仅用于错误信息
    pub fn parse_line(line: &str, line_no: usize) -> error::Result<Self> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != FIELD_COUNT {
            return Err(GameError::parse(
                line_no,
                line,
                format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
            ));
        }
        if fields[0].is_empty() {
            return Err(GameError::parse(line_no, line, "enemy name is empty"));
        }

        let number = |index: usize, field: &str| -> error::Result<i32> {
            fields[index].parse::<i32>().map_err(|e| {
                GameError::parse(line_no, line, format!("{field} {:?}: {e}", fields[index]))
            })
        };

        Ok(Self {
            name: fields[0].to_string(),
            position: Position::new(number(1, "row")?, number(2, "col")?),
            stats: Stats::new(
                number(3, "health")?,
                number(4, "attack")?,
                number(5, "defense")?,
                number(6, "speed")?,
            ),
            vision: number(7, "vision")?,
        })
    }

    /// 解析整份名单，空行跳过；任何一行出错则整份名单作废
    pub fn parse_roster(text: &str) -> error::Result<Vec<Self>> {
        text.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| Self::parse_line(line, i + 1))
            .collect()
    }

    pub fn roster_from_reader<R: Read>(mut reader: R) -> error::Result<Vec<Self>> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| GameError::FormatError(format!("unreadable enemy roster: {e}")))?;
        Self::parse_roster(&text)
    }
}
