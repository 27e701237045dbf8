//! 游戏错误处理模块
//!
//! 处理加载地图、敌人名单、配置文件以及创建英雄时可能出现的各种错误。
//! 越界或撞墙的移动请求不是错误，由会话直接返回 `false`。

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 游戏加载过程中可能出现的错误类型
#[derive(Debug, Error)]
pub enum GameError {
    /// 资源文件缺失或无法读取
    #[error("Resource error: {}: {source}", path.display())]
    ResourceError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 地图内容无效(为空或无法解码)
    #[error("Format error: {0}")]
    FormatError(String),

    /// 敌人名单中的某一行无法解析
    #[error("Parse error on line {line} ({content:?}): {reason}")]
    ParseError {
        line: usize,
        content: String,
        reason: String,
    },

    /// 实体无法放置到指定格子
    #[error("Cannot place {name} at ({row}, {col}): {reason}")]
    InvalidPlacement {
        name: String,
        row: i32,
        col: i32,
        reason: String,
    },

    /// 英雄属性无效
    #[error("Invalid hero: {0}")]
    InvalidHero(String),

    /// 配置文件解析失败
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// 战役中没有任何关卡
    #[error("No levels configured")]
    NoLevels,
}

impl GameError {
    pub fn resource(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GameError::ResourceError {
            path: path.into(),
            source,
        }
    }

    pub fn parse(line: usize, content: &str, reason: impl Into<String>) -> Self {
        GameError::ParseError {
            line,
            content: content.to_string(),
            reason: reason.into(),
        }
    }

    /// 加载类错误对当前加载尝试都是致命的，调用方只能从头重新加载
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            GameError::ResourceError { .. }
                | GameError::FormatError(_)
                | GameError::ParseError { .. }
                | GameError::InvalidPlacement { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

/// 处理游戏错误并转换为用户友好的消息
pub fn handle_error(error: &GameError) -> String {
    match error {
        GameError::ResourceError { path, source } => match source.kind() {
            io::ErrorKind::NotFound => format!("资源文件不存在: {}", path.display()),
            io::ErrorKind::PermissionDenied => {
                format!("没有权限访问资源文件: {}", path.display())
            }
            _ => format!("无法读取资源文件 {}: {}", path.display(), source),
        },
        GameError::ParseError { line, reason, .. } => {
            format!("敌人文件第 {} 行格式错误: {}", line, reason)
        }
        GameError::NoLevels => "配置中没有任何关卡".to_string(),
        _ => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_the_line() {
        let err = GameError::parse(3, "goblin,1,x", "expected 8 fields, found 3");
        let msg = err.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains("goblin,1,x"));
        assert!(err.is_load_error());
    }

    #[test]
    fn missing_resource_message() {
        let err = GameError::resource(
            "levels/map1.txt",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(handle_error(&err), "资源文件不存在: levels/map1.txt");
    }

    #[test]
    fn hero_errors_are_not_load_errors() {
        assert!(!GameError::InvalidHero("too many points".into()).is_load_error());
        assert!(!GameError::NoLevels.is_load_error());
    }
}
