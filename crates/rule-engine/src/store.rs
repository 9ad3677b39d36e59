//! 规则存储管理
//!
//! 使用 DashMap 提供线程安全的规则存储，保存规则字符串及其序列化语法树，
//! 支持规则的创建、合并、评估、修改和删除。

use crate::compiler;
use crate::error::{Result, RuleError};
use crate::models::Record;
use crate::serialization::SerializedTree;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::{info, instrument, warn};

/// 已存储的规则
#[derive(Debug, Clone, Serialize)]
pub struct StoredRule {
    pub id: i64,
    pub rule_string: String,
    pub ast: SerializedTree,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 规则列表项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSummary {
    pub id: i64,
    pub rule_string: String,
}

/// 规则存储
#[derive(Clone)]
pub struct RuleStore {
    rules: Arc<DashMap<i64, StoredRule>>,
    next_id: Arc<AtomicI64>,
}

impl RuleStore {
    /// 创建新的规则存储
    pub fn new() -> Self {
        Self {
            rules: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// 获取当前存储的规则数量
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// 检查存储是否为空
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 检查规则是否存在
    pub fn contains(&self, rule_id: i64) -> bool {
        self.rules.contains_key(&rule_id)
    }

    /// 获取规则
    pub fn get(&self, rule_id: i64) -> Option<StoredRule> {
        self.rules.get(&rule_id).map(|r| r.clone())
    }

    /// 编译并创建规则
    #[instrument(skip(self))]
    pub fn create(&self, rule_string: &str) -> Result<StoredRule> {
        let ast = compiler::compile(rule_string)?;
        let rule = self.insert(rule_string.to_string(), ast);

        info!("规则已创建: {}", rule.id);
        Ok(rule)
    }

    /// 按给定顺序以 AND 合并多条规则，结果作为新规则保存
    #[instrument(skip(self))]
    pub fn combine(&self, rule_ids: &[i64]) -> Result<StoredRule> {
        if rule_ids.is_empty() {
            return Err(RuleError::EmptyCombination);
        }

        let mut trees = Vec::with_capacity(rule_ids.len());
        let mut sources = Vec::with_capacity(rule_ids.len());
        for &rule_id in rule_ids {
            let rule = self.get(rule_id).ok_or_else(|| {
                warn!("合并不存在的规则: {}", rule_id);
                RuleError::RuleNotFound(rule_id)
            })?;
            trees.push(rule.ast);
            sources.push(format!("({})", rule.rule_string));
        }

        let ast = compiler::combine(&trees)?;
        let rule = self.insert(sources.join(" AND "), ast);

        info!("规则已合并: {:?} -> {}", rule_ids, rule.id);
        Ok(rule)
    }

    /// 针对记录评估规则
    #[instrument(skip(self, record))]
    pub fn evaluate(&self, rule_id: i64, record: &Record) -> Result<bool> {
        // 先克隆语法树再评估，避免评估期间持有分片锁
        let ast = self
            .rules
            .get(&rule_id)
            .map(|r| r.ast.clone())
            .ok_or(RuleError::RuleNotFound(rule_id))?;

        compiler::evaluate(&ast, record)
    }

    /// 修改规则：重新编译并整体替换已存储的语法树
    #[instrument(skip(self))]
    pub fn modify(&self, rule_id: i64, rule_string: &str) -> Result<StoredRule> {
        let ast = compiler::compile(rule_string)?;

        let mut entry = self.rules.get_mut(&rule_id).ok_or_else(|| {
            warn!("修改不存在的规则: {}", rule_id);
            RuleError::RuleNotFound(rule_id)
        })?;

        let replaced = StoredRule {
            id: rule_id,
            rule_string: rule_string.to_string(),
            ast,
            created_at: entry.created_at,
            updated_at: Utc::now(),
        };
        *entry = replaced.clone();

        info!("规则已修改: {}", rule_id);
        Ok(replaced)
    }

    /// 按 ID 顺序列出所有规则
    pub fn list(&self) -> Vec<RuleSummary> {
        let mut rules: Vec<RuleSummary> = self
            .rules
            .iter()
            .map(|r| RuleSummary {
                id: r.id,
                rule_string: r.rule_string.clone(),
            })
            .collect();
        rules.sort_by_key(|r| r.id);
        rules
    }

    /// 删除规则
    #[instrument(skip(self))]
    pub fn delete(&self, rule_id: i64) -> Result<()> {
        if self.rules.remove(&rule_id).is_some() {
            info!("规则已删除: {}", rule_id);
            Ok(())
        } else {
            warn!("删除不存在的规则: {}", rule_id);
            Err(RuleError::RuleNotFound(rule_id))
        }
    }

    /// 清空所有规则，返回删除的数量
    #[instrument(skip(self))]
    pub fn delete_all(&self) -> usize {
        let count = self.rules.len();
        self.rules.clear();
        info!("已清空 {} 条规则", count);
        count
    }

    fn insert(&self, rule_string: String, ast: SerializedTree) -> StoredRule {
        let now = Utc::now();
        let rule = StoredRule {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            rule_string,
            ast,
            created_at: now,
            updated_at: now,
        };
        self.rules.insert(rule.id, rule.clone());
        rule
    }
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new()
    }
}
