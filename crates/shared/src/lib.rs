//! 共享库
//!
//! 包含规则服务共用的配置加载和可观测性基础设施代码。

pub mod config;
pub mod observability;
