//! 总体服务信道管理
//!
//! 按服务名称管理各自的信道池，只跟踪显式声明关注的服务，
//! 并把服务发现推送的上下线事件路由到对应的池。

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use super::pool::{ChannelRef, ServiceChannel};
use super::ServiceNotify;
use crate::config::ChannelConfig;

struct ManagerState {
    /// 关注的服务名称集合，只增不减
    follow_services: HashSet<String>,
    /// 服务名称 -> 该服务对应的信道池，首个上线事件时惰性创建
    services: HashMap<String, Arc<ServiceChannel>>,
}

/// 总体的服务信道管理类
///
/// 进程内应当只构造一个实例，显式传递给需要它的调用方。
/// 上下线事件来自发现侧的推送线程，选取来自请求处理线程，
/// 注册中心锁只保护结构性读写，信道构建在各自池的锁下进行。
pub struct ServiceManager {
    config: ChannelConfig,
    state: RwLock<ManagerState>,
}

impl ServiceManager {
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            config,
            state: RwLock::new(ManagerState {
                follow_services: HashSet::new(),
                services: HashMap::new(),
            }),
        }
    }

    /// 先声明关注哪些服务的上下线，不关心的不管理
    ///
    /// 幂等：重复声明没有额外效果。声明在进程生命周期内不可撤销。
    pub async fn declare(&self, service_name: &str) {
        let mut state = self.state.write().await;
        state.follow_services.insert(service_name.to_string());
    }

    /// 获取指定服务的节点信道
    ///
    /// 该服务没有任何池（未声明或从未有节点上线）时返回 `None`。
    pub async fn choose(&self, service_name: &str) -> Option<ChannelRef> {
        let service = {
            let state = self.state.read().await;
            match state.services.get(service_name) {
                Some(service) => service.clone(),
                None => {
                    error!(service = %service_name, "No available node for service");
                    return None;
                }
            }
        };
        service.choose().await
    }

    /// 从服务实例标识中解析服务名称
    ///
    /// 实例标识约定为 `<服务名>/<实例后缀>`，取最后一个 `/` 之前的部分。
    fn service_name_of(service_instance: &str) -> &str {
        match service_instance.rfind('/') {
            Some(pos) => &service_instance[..pos],
            None => service_instance,
        }
    }
}

#[async_trait]
impl ServiceNotify for ServiceManager {
    /// 服务上线时调用的回调接口，将服务节点管理起来
    async fn on_service_online(&self, service_instance: &str, host: &str) {
        let service_name = Self::service_name_of(service_instance);
        // 锁内只做结构性读写，信道构建放到锁外，由池自己的锁保护
        let service = {
            let mut state = self.state.write().await;
            if !state.follow_services.contains(service_name) {
                debug!(
                    service = %service_name,
                    host = %host,
                    "Service online but not followed, ignored"
                );
                return;
            }
            state
                .services
                .entry(service_name.to_string())
                .or_insert_with(|| {
                    Arc::new(ServiceChannel::new(service_name, self.config.clone()))
                })
                .clone()
        };
        service.append(host).await;
        debug!(service = %service_name, host = %host, "Service node online, channel added");
    }

    /// 服务下线时调用的回调接口，从信道管理中删除指定节点信道
    async fn on_service_offline(&self, service_instance: &str, host: &str) {
        let service_name = Self::service_name_of(service_instance);
        let service = {
            let state = self.state.read().await;
            if !state.follow_services.contains(service_name) {
                debug!(
                    service = %service_name,
                    host = %host,
                    "Service offline but not followed, ignored"
                );
                return;
            }
            match state.services.get(service_name) {
                Some(service) => service.clone(),
                None => {
                    // 没有上线事件却收到下线事件，发现侧状态不一致
                    warn!(
                        service = %service_name,
                        host = %host,
                        "Channel pool not found on service offline"
                    );
                    return;
                }
            }
        };
        service.remove(host).await;
        debug!(service = %service_name, host = %host, "Service node offline, channel removed");
    }
}
