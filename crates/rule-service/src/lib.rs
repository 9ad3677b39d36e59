//! 规则管理服务
//!
//! 以 REST API 暴露 AST 规则引擎：规则的创建、合并、评估、修改与删除。
//!
//! ## 模块结构
//!
//! - `dto`: 请求和响应的数据传输对象
//! - `error`: 错误类型定义
//! - `handlers`: HTTP 请求处理器
//! - `routes`: 路由配置
//! - `state`: 应用状态

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use dto::{ApiResponse, EvaluateResponse, MessageResponse, RuleDto, RuleListItemDto};
pub use error::{Result, ServiceError};
pub use routes::app;
pub use state::AppState;
