use super::session::{CommitOutcome, ImportSession};
use crate::error::{ReconcileError, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// 进行中的导入会话 (内存), 每个会话的修改互相独立串行
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<u64, ImportSession>,
    next_id: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: ImportSession) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.sessions.insert(id, session);
        id
    }

    /// 只读访问会话
    pub fn with_session<T>(&self, id: u64, f: impl FnOnce(&ImportSession) -> T) -> Result<T> {
        let session = self.sessions.get(&id).ok_or(ReconcileError::SessionNotFound(id))?;
        Ok(f(session.value()))
    }

    /// 修改会话; 同一会话的调用在条目锁内串行执行
    pub fn with_session_mut<T>(
        &self,
        id: u64,
        f: impl FnOnce(&mut ImportSession) -> Result<T>,
    ) -> Result<T> {
        let mut session = self.sessions.get_mut(&id).ok_or(ReconcileError::SessionNotFound(id))?;
        f(session.value_mut())
    }

    /// 提交会话并移除
    pub fn commit(&self, id: u64) -> Result<CommitOutcome> {
        self.commit_with(id, |_| Ok(())).map(|(outcome, ())| outcome)
    }

    /// 提交会话, 执行 `finalize` (如导出), 全部成功后才移除会话
    ///
    /// 整个过程持有条目写锁, 期间的编辑会等待提交结束。任一步失败时会话保持原样。
    pub fn commit_with<T>(
        &self,
        id: u64,
        finalize: impl FnOnce(&CommitOutcome) -> Result<T>,
    ) -> Result<(CommitOutcome, T)> {
        match self.sessions.entry(id) {
            Entry::Occupied(entry) => {
                let outcome = entry.get().commit()?;
                let finalized = finalize(&outcome)?;
                entry.remove();
                Ok((outcome, finalized))
            }
            Entry::Vacant(_) => Err(ReconcileError::SessionNotFound(id)),
        }
    }

    pub fn remove(&self, id: u64) -> Result<ImportSession> {
        self.sessions
            .remove(&id)
            .map(|(_, session)| session)
            .ok_or(ReconcileError::SessionNotFound(id))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Catalog, ItemPatch, PaymentRole, RawOrderItem};
    use bigdecimal::BigDecimal;

    fn session() -> ImportSession {
        let raw = RawOrderItem {
            shop_name: "星河".to_string(),
            product_url: String::new(),
            raw_name: "星河JSK（定金）".to_string(),
            style_spec: String::new(),
            price: BigDecimal::from(200),
            order_time: String::new(),
            parsed_color: None,
            parsed_size: None,
            parsed_type: None,
        };
        ImportSession::new(vec![raw], &Catalog::default()).unwrap()
    }

    #[test]
    fn ids_are_distinct() {
        let registry = SessionRegistry::new();
        let a = registry.insert(session());
        let b = registry.insert(session());
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn mutate_then_remove() {
        let registry = SessionRegistry::new();
        let id = registry.insert(session());
        registry.with_session_mut(id, |s| s.set_role(0, None)).unwrap();
        let role = registry.with_session(id, |s| s.items()[0].payment_role).unwrap();
        assert_eq!(role, None);
        registry.with_session_mut(id, |s| s.set_role(0, Some(PaymentRole::Balance))).unwrap();

        registry.remove(id).unwrap();
        assert!(registry.is_empty());
        assert!(matches!(registry.remove(id), Err(ReconcileError::SessionNotFound(_))));
    }

    #[test]
    fn commit_failure_keeps_session() {
        let registry = SessionRegistry::new();
        let id = registry.insert(session());
        // 无品牌/类型, 没有可提交项
        assert!(matches!(registry.commit(id), Err(ReconcileError::NothingToCommit)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn failed_finalize_keeps_session() {
        let registry = SessionRegistry::new();
        let mut ready = session();
        ready
            .update_item(0, ItemPatch { brand_id: Some(1), category_id: Some(2), ..Default::default() })
            .unwrap();
        let id = registry.insert(ready);

        let failed = registry.commit_with(id, |_| -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "export dir missing").into())
        });
        assert!(matches!(failed, Err(ReconcileError::Io(_))));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.with_session(id, |s| s.items()[0].brand_id).unwrap(), Some(1));

        let (outcome, exported) = registry.commit_with(id, |o| Ok(o.records.len())).unwrap();
        assert_eq!(exported, 1);
        assert_eq!(outcome.summary.imported_count, 1);
        assert!(registry.is_empty());
        assert!(matches!(registry.commit(id), Err(ReconcileError::SessionNotFound(_))));
    }
}
