//! 服务信道管理模块
//!
//! 由服务发现驱动的 RPC 信道管理：每个被关注的服务维护一个信道池，
//! 池内按轮询策略向请求处理方提供可复用的信道。

pub mod manager;
pub mod pool;

pub use manager::ServiceManager;
pub use pool::{ChannelRef, ServiceChannel};

use async_trait::async_trait;

/// 服务发现推送接口
///
/// 发现侧的监听任务在节点上下线时调用，实例标识约定为
/// `<服务名>/<实例后缀>`，`host` 为可连接的 `地址:端口`。
/// 事件之间没有顺序保证，实现方必须容忍乱序与重复。
#[async_trait]
pub trait ServiceNotify: Send + Sync {
    /// 服务节点上线
    async fn on_service_online(&self, service_instance: &str, host: &str);

    /// 服务节点下线
    async fn on_service_offline(&self, service_instance: &str, host: &str);
}
