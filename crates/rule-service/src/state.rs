//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use rule_engine::RuleStore;

/// Axum 应用共享状态
///
/// 规则存储本身可廉价克隆，在 handler 间共享同一份数据
#[derive(Clone, Default)]
pub struct AppState {
    pub store: RuleStore,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(store: RuleStore) -> Self {
        Self { store }
    }
}
