use super::AppState;
use crate::error::ReconcileError;
use crate::export::export_to_csv;
use crate::models::{
    CandidateItem, Catalog, ImportSummary, ItemPatch, MissingDataItem, PaymentRole, PurchaseRecord,
    RawOrderItem,
};
use crate::service::{scan_missing, ImportSession};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// 请求体: 订单商品 + 品牌/类型目录
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub items: Vec<RawOrderItem>,
    #[serde(flatten)]
    pub catalog: Catalog,
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: Option<PaymentRole>,
}

#[derive(Debug, Deserialize)]
pub struct PairRequest {
    pub a: usize,
    pub b: usize,
}

/// 会话视图: 候选项 (含核心名称/关键词) 与配对列表
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: u64,
    pub items: Vec<CandidateItem>,
    pub pairs: Vec<(usize, usize)>,
}

impl SessionView {
    fn new(id: u64, session: &ImportSession) -> Self {
        let items = session.items().to_vec();
        let pairs = items
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| item.paired_with.filter(|&p| idx < p).map(|p| (idx, p)))
            .collect();
        Self { id, items, pairs }
    }
}

#[derive(Debug, Serialize)]
pub struct CommitResponse {
    pub success: bool,
    pub message: String,
    pub summary: ImportSummary,
    pub records: Vec<PurchaseRecord>,
    pub export_path: Option<String>,
}

/// 错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

pub struct ApiError(ReconcileError);

impl From<ReconcileError> for ApiError {
    fn from(e: ReconcileError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ReconcileError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ReconcileError::IndexOutOfRange { .. } | ReconcileError::SelfPair(_) => StatusCode::BAD_REQUEST,
            ReconcileError::EmptyBatch | ReconcileError::NothingToCommit => StatusCode::UNPROCESSABLE_ENTITY,
            ReconcileError::Io(_) | ReconcileError::Csv(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("request failed: {}", self.0);
        } else {
            tracing::warn!("request rejected: {}", self.0);
        }
        let body = ErrorResponse {
            success: false,
            message: format!("Error: {}", self.0),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 预处理: 扫描缺失的品牌和类型
pub async fn prepare(Json(req): Json<ImportRequest>) -> Json<Vec<MissingDataItem>> {
    Json(scan_missing(&req.items, &req.catalog))
}

/// 创建导入会话 (执行角色识别与自动配对)
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<ImportRequest>,
) -> ApiResult<(StatusCode, Json<SessionView>)> {
    let session = ImportSession::new(req.items, &req.catalog)?;
    let id = state.registry.insert(session);
    tracing::info!("Session {} created", id);
    let view = state.registry.with_session(id, |s| SessionView::new(id, s))?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Json<SessionView>> {
    let view = state.registry.with_session(id, |s| SessionView::new(id, s))?;
    Ok(Json(view))
}

/// 放弃会话
pub async fn discard_session(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    state.registry.remove(id)?;
    tracing::info!("Session {} discarded", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_item(
    State(state): State<AppState>,
    Path((id, index)): Path<(u64, usize)>,
    Json(patch): Json<ItemPatch>,
) -> ApiResult<Json<CandidateItem>> {
    let item = state
        .registry
        .with_session_mut(id, |s| s.update_item(index, patch).cloned())?;
    Ok(Json(item))
}

/// 手动设置定金/尾款角色
pub async fn set_role(
    State(state): State<AppState>,
    Path((id, index)): Path<(u64, usize)>,
    Json(req): Json<RoleRequest>,
) -> ApiResult<Json<SessionView>> {
    let view = state.registry.with_session_mut(id, |s| {
        s.set_role(index, req.role)?;
        Ok(SessionView::new(id, s))
    })?;
    Ok(Json(view))
}

/// 手动配对
pub async fn manual_pair(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<PairRequest>,
) -> ApiResult<Json<SessionView>> {
    let view = state.registry.with_session_mut(id, |s| {
        s.manual_pair(req.a, req.b)?;
        Ok(SessionView::new(id, s))
    })?;
    Ok(Json(view))
}

/// 取消配对
pub async fn unpair(
    State(state): State<AppState>,
    Path((id, index)): Path<(u64, usize)>,
) -> ApiResult<Json<SessionView>> {
    let view = state.registry.with_session_mut(id, |s| {
        s.unpair(index)?;
        Ok(SessionView::new(id, s))
    })?;
    Ok(Json(view))
}

/// 提交会话, 返回合并后的购买记录
pub async fn commit(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Json<CommitResponse>> {
    // 导出失败时会话保留, 可修正后重新提交
    let (outcome, export_path) = state.registry.commit_with(id, |outcome| {
        match &state.config.export.dir {
            Some(dir) => {
                let path = dir.join(format!("session-{}.csv", id));
                export_to_csv(&outcome.records, &path)?;
                Ok(Some(path.display().to_string()))
            }
            None => Ok(None),
        }
    })?;

    Ok(Json(CommitResponse {
        success: true,
        message: format!(
            "Imported {} records ({} merged, {} skipped)",
            outcome.summary.imported_count, outcome.summary.merged_count, outcome.summary.skipped_count
        ),
        summary: outcome.summary,
        records: outcome.records,
        export_path,
    }))
}
