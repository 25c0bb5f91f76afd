//! 信道池单元集成测试
//!
//! 信道采用惰性连接，测试不需要真实的服务端节点。

use chatim_server_core::{ChannelConfig, ChannelRef, ServiceChannel};
use std::sync::Arc;

/// 创建测试用的信道池
fn create_test_pool(service: &str) -> ServiceChannel {
    ServiceChannel::new(service, ChannelConfig::default())
}

/// 测试：空池选取返回 None
#[tokio::test]
async fn test_choose_on_empty_pool() {
    let pool = create_test_pool("chat");
    assert!(pool.choose().await.is_none());
}

/// 测试：轮询顺序与插入顺序一致，循环回绕
#[tokio::test]
async fn test_round_robin_order() {
    let pool = create_test_pool("chat");
    pool.append("10.0.0.1:9000").await;
    pool.append("10.0.0.2:9000").await;
    pool.append("10.0.0.3:9000").await;

    let a = pool.get("10.0.0.1:9000").await.expect("channel for A");
    let b = pool.get("10.0.0.2:9000").await.expect("channel for B");
    let c = pool.get("10.0.0.3:9000").await.expect("channel for C");

    let picks: Vec<ChannelRef> = [
        pool.choose().await.unwrap(),
        pool.choose().await.unwrap(),
        pool.choose().await.unwrap(),
        pool.choose().await.unwrap(),
    ]
    .into();

    assert!(Arc::ptr_eq(&picks[0], &a));
    assert!(Arc::ptr_eq(&picks[1], &b));
    assert!(Arc::ptr_eq(&picks[2], &c));
    assert!(Arc::ptr_eq(&picks[3], &a), "fourth pick wraps back to A");
}

/// 测试：稳定池上轮询分布均匀
#[tokio::test]
async fn test_round_robin_distribution() {
    let pool = create_test_pool("chat");
    pool.append("10.0.0.1:9000").await;
    pool.append("10.0.0.2:9000").await;
    pool.append("10.0.0.3:9000").await;

    let a = pool.get("10.0.0.1:9000").await.unwrap();
    let mut hits_a = 0;
    for _ in 0..9 {
        if Arc::ptr_eq(&pool.choose().await.unwrap(), &a) {
            hits_a += 1;
        }
    }
    assert_eq!(hits_a, 3, "9 picks over 3 nodes hit each node 3 times");
}

/// 测试：序列与地址映射在增删后保持一致
#[tokio::test]
async fn test_sequence_and_map_stay_consistent() {
    let pool = create_test_pool("chat");
    assert_eq!(pool.len().await, 0);
    assert_eq!(pool.host_count().await, 0);

    pool.append("10.0.0.1:9000").await;
    pool.append("10.0.0.2:9000").await;
    assert_eq!(pool.len().await, 2);
    assert_eq!(pool.host_count().await, 2);
    assert!(pool.get("10.0.0.1:9000").await.is_some());
    assert!(pool.get("10.0.0.2:9000").await.is_some());

    pool.remove("10.0.0.1:9000").await;
    assert_eq!(pool.len().await, 1);
    assert_eq!(pool.host_count().await, 1);
    assert!(pool.get("10.0.0.1:9000").await.is_none());
    assert!(pool.get("10.0.0.2:9000").await.is_some());

    pool.remove("10.0.0.2:9000").await;
    assert_eq!(pool.len().await, 0);
    assert_eq!(pool.host_count().await, 0);
    assert!(pool.choose().await.is_none());
}

/// 测试：删除未注册的地址是无副作用的空操作
#[tokio::test]
async fn test_remove_unknown_host_is_noop() {
    let pool = create_test_pool("chat");
    pool.append("10.0.0.1:9000").await;

    pool.remove("10.0.0.9:9000").await;
    assert_eq!(pool.len().await, 1);
    assert_eq!(pool.host_count().await, 1);
    assert!(pool.get("10.0.0.1:9000").await.is_some());
}

/// 测试：删除后已持有的引用依然有效
#[tokio::test]
async fn test_removed_channel_stays_valid_for_holder() {
    let pool = create_test_pool("chat");
    pool.append("10.0.0.1:9000").await;

    let held = pool.choose().await.unwrap();
    pool.remove("10.0.0.1:9000").await;

    // 池不再选中它，但持有方的引用没有失效
    assert!(pool.choose().await.is_none());
    assert_eq!(Arc::strong_count(&held), 1);
}

/// 测试：同一地址重复 append 不去重，两个信道都可被选中
#[tokio::test]
async fn test_duplicate_append_is_not_deduplicated() {
    let pool = create_test_pool("chat");
    pool.append("10.0.0.1:9000").await;
    pool.append("10.0.0.1:9000").await;

    assert_eq!(pool.len().await, 2);
    assert!(pool.choose().await.is_some());
    assert!(pool.choose().await.is_some());
}

/// 测试：非法地址构建失败，不产生半插入状态
#[tokio::test]
async fn test_append_invalid_host_leaves_pool_unchanged() {
    let pool = create_test_pool("chat");
    pool.append("bad host with spaces").await;

    assert_eq!(pool.len().await, 0);
    assert_eq!(pool.host_count().await, 0);
    assert!(pool.choose().await.is_none());
}

/// 测试：并发 append 与 choose，选取结果始终指向池内某个信道
#[tokio::test]
async fn test_concurrent_append_and_choose() {
    let pool = Arc::new(create_test_pool("chat"));

    let writer = {
        let pool = pool.clone();
        tokio::spawn(async move {
            for i in 0..32 {
                pool.append(&format!("10.0.1.{}:9000", i)).await;
                tokio::task::yield_now().await;
            }
        })
    };

    let reader = {
        let pool = pool.clone();
        tokio::spawn(async move {
            let mut picks = Vec::new();
            for _ in 0..128 {
                if let Some(channel) = pool.choose().await {
                    picks.push(channel);
                }
                tokio::task::yield_now().await;
            }
            picks
        })
    };

    writer.await.unwrap();
    let picks = reader.await.unwrap();

    // 没有删除发生，曾经可选中的信道必然在最终集合里
    let mut registered = Vec::new();
    for i in 0..32 {
        registered.push(pool.get(&format!("10.0.1.{}:9000", i)).await.unwrap());
    }
    for pick in &picks {
        assert!(
            registered.iter().any(|c| Arc::ptr_eq(c, pick)),
            "choose returned a channel that was never registered"
        );
    }
    assert_eq!(pool.len().await, 32);
    assert_eq!(pool.host_count().await, 32);
}
