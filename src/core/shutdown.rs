//! 取消与关闭信号
//!
//! 所有跨进程边界的调用（存储查询、写入、LLM 调用）都接受 CancellationToken；
//! `cancellable` 在 token 触发时丢弃进行中的 future 并返回 `PlanningError::Cancelled`。

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::core::PlanningError;

/// 在取消令牌与 future 之间竞速；令牌先触发则返回 Cancelled
pub async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> Result<T, PlanningError>
where
    F: Future<Output = Result<T, PlanningError>>,
{
    if cancel.is_cancelled() {
        return Err(PlanningError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(PlanningError::Cancelled),
        result = fut => result,
    }
}

/// 关闭信号管理器：Ctrl+C / SIGTERM 触发根令牌
#[derive(Clone, Default)]
pub struct ShutdownManager {
    shutdown_token: CancellationToken,
}

impl ShutdownManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 根令牌的子令牌，可交给单次规划请求
    pub fn token(&self) -> CancellationToken {
        self.shutdown_token.child_token()
    }

    pub fn shutdown(&self) {
        self.shutdown_token.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }

    /// 安装系统信号处理器 (Ctrl+C, SIGTERM)
    pub fn install_signal_handlers(self: &Arc<Self>) {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            if let Ok(()) = tokio::signal::ctrl_c().await {
                tracing::info!("Received Ctrl+C, cancelling in-flight planning");
                manager.shutdown();
            }
        });

        #[cfg(unix)]
        {
            let manager = Arc::clone(self);
            tokio::spawn(async move {
                use tokio::signal::unix::{signal, SignalKind};
                if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                    sigterm.recv().await;
                    tracing::info!("Received SIGTERM, cancelling in-flight planning");
                    manager.shutdown();
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancellable_passes_result_through() {
        let token = CancellationToken::new();
        let result = cancellable(&token, async { Ok::<_, PlanningError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_cancellable_already_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let result = cancellable(&token, async { Ok::<_, PlanningError>(7) }).await;
        assert!(matches!(result, Err(PlanningError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancellable_aborts_pending_future() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });
        let result = cancellable(&token, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<_, PlanningError>(())
        })
        .await;
        assert!(matches!(result, Err(PlanningError::Cancelled)));
    }

    #[test]
    fn test_shutdown_cancels_child_tokens() {
        let manager = ShutdownManager::new();
        let child = manager.token();
        assert!(!child.is_cancelled());
        manager.shutdown();
        assert!(manager.is_shutdown());
        assert!(child.is_cancelled());
    }
}
