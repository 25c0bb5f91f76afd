//! gRPC 客户端信道构建模块
//!
//! 按固定的传输参数为单个节点地址构建 tonic 信道。
//! 采用惰性连接：构建时只校验地址，真正的连接在首次 RPC 时建立。

use tonic::transport::{Channel, Endpoint};

use crate::config::ChannelConfig;
use crate::error::{CoreError, Result};

/// 信道构建器
pub struct ChannelBuilder {
    service: String,
    host: String,
    config: ChannelConfig,
}

impl ChannelBuilder {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            service: String::new(),
            host: host.into(),
            config: ChannelConfig::default(),
        }
    }

    /// 设置信道所属的服务名称（仅用于错误信息）
    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn config(mut self, config: ChannelConfig) -> Self {
        self.config = config;
        self
    }

    /// 构建惰性连接的信道
    ///
    /// 地址非法时返回错误，不会产生半初始化的信道。
    pub fn build(self) -> Result<Channel> {
        let uri = format!("http://{}", self.host);
        let mut endpoint = Endpoint::from_shared(uri)
            .map_err(|e| CoreError::channel_init(&self.service, &self.host, e.to_string()))?;

        if let Some(timeout) = self.config.connect_timeout() {
            endpoint = endpoint.connect_timeout(timeout);
        }
        if let Some(timeout) = self.config.timeout() {
            endpoint = endpoint.timeout(timeout);
        }

        Ok(endpoint.connect_lazy())
    }
}
