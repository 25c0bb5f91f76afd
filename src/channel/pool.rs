//! 单个服务的信道池
//!
//! 维护一个服务当前所有在线节点的信道，按轮询（Round Robin）策略对外提供选取。

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tonic::transport::Channel;
use tracing::{error, warn};

use crate::client::ChannelBuilder;
use crate::config::ChannelConfig;

/// 共享信道引用
///
/// 池持有规范槽位，调用方持有计数引用；节点下线后，
/// 已经发出去的引用依然有效，只是不会再被选中。
pub type ChannelRef = Arc<Channel>;

/// 池内状态，信道序列与地址映射始终包含同一组信道
struct PoolState {
    /// 当前服务对应的信道集合（轮询顺序）
    channels: Vec<ChannelRef>,
    /// 主机地址与信道映射关系
    hosts: HashMap<String, ChannelRef>,
}

/// 单个服务的信道管理类
///
/// 服务上线调用 [`append`](Self::append) 新增信道，下线调用
/// [`remove`](Self::remove) 释放信道，请求路径调用
/// [`choose`](Self::choose) 轮询取一个信道发起 RPC。
pub struct ServiceChannel {
    service_name: String,
    config: ChannelConfig,
    /// 轮转下标计数器，只取模使用，溢出回绕无影响
    index: AtomicU64,
    state: RwLock<PoolState>,
}

impl ServiceChannel {
    pub fn new(service_name: impl Into<String>, config: ChannelConfig) -> Self {
        Self {
            service_name: service_name.into(),
            config,
            index: AtomicU64::new(0),
            state: RwLock::new(PoolState {
                channels: Vec::new(),
                hosts: HashMap::new(),
            }),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// 服务上线，新增该节点的信道
    ///
    /// 信道构建失败时记录日志并放弃，不会留下半插入状态。
    /// 注意：同一地址重复 append 不做去重，会产生两个都可被选中的信道；
    /// 调用方（注册中心）在没有先 remove 的情况下不应对同一地址重复调用。
    pub async fn append(&self, host: &str) {
        let channel = match ChannelBuilder::new(host)
            .service(&self.service_name)
            .config(self.config.clone())
            .build()
        {
            Ok(channel) => Arc::new(channel),
            Err(e) => {
                error!(
                    service = %self.service_name,
                    host = %host,
                    error = %e,
                    "Failed to initialize channel"
                );
                return;
            }
        };

        let mut state = self.state.write().await;
        state.hosts.insert(host.to_string(), channel.clone());
        state.channels.push(channel);
    }

    /// 服务下线，删除该节点的信道
    ///
    /// 地址未注册时记录警告并忽略。序列中只删除第一个匹配项，
    /// 与上面的非去重策略保持一致。
    pub async fn remove(&self, host: &str) {
        let mut state = self.state.write().await;
        let channel = match state.hosts.get(host) {
            Some(channel) => channel.clone(),
            None => {
                warn!(
                    service = %self.service_name,
                    host = %host,
                    "Channel not found on removal"
                );
                return;
            }
        };
        if let Some(pos) = state
            .channels
            .iter()
            .position(|c| Arc::ptr_eq(c, &channel))
        {
            state.channels.remove(pos);
        }
        state.hosts.remove(host);
    }

    /// 通过轮询策略获取一个信道，用于发起对应的 RPC 调用
    ///
    /// 没有在线节点时返回 `None`，调用方必须检查后再使用。
    /// 下标总是对当前集合大小取模，集合在两次调用之间增减不影响正确性。
    pub async fn choose(&self) -> Option<ChannelRef> {
        let state = self.state.read().await;
        if state.channels.is_empty() {
            error!(
                service = %self.service_name,
                "No available node for service"
            );
            return None;
        }
        let idx = self.index.fetch_add(1, Ordering::Relaxed) as usize % state.channels.len();
        Some(state.channels[idx].clone())
    }

    /// 获取指定地址的信道
    pub async fn get(&self, host: &str) -> Option<ChannelRef> {
        let state = self.state.read().await;
        state.hosts.get(host).cloned()
    }

    /// 当前在线节点数（按信道序列计）
    pub async fn len(&self) -> usize {
        let state = self.state.read().await;
        state.channels.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// 当前注册的主机地址数
    pub async fn host_count(&self) -> usize {
        let state = self.state.read().await;
        state.hosts.len()
    }
}
