//! 페이지네이션 타입.

use serde::Serialize;

use crate::error::{FloginError, FloginResult};

/// 0부터 시작하는 페이지 요청.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    size: i64,
}

impl PageRequest {
    /// 페이지 요청 생성.
    ///
    /// # Errors
    ///
    /// 페이지 번호가 음수이거나 페이지 크기가 1 미만이면
    /// `FloginError::InvalidArgument`를 반환합니다.
    pub fn new(page: i64, size: i64) -> FloginResult<Self> {
        if page < 0 {
            return Err(FloginError::InvalidArgument(
                "Page index must not be less than zero".to_string(),
            ));
        }
        if size < 1 {
            return Err(FloginError::InvalidArgument(
                "Page size must not be less than one".to_string(),
            ));
        }
        Ok(Self { page, size })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    /// 건너뛸 레코드 수.
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }
}

/// 한 페이지 분량의 결과.
///
/// JSON은 camelCase(`content`, `totalElements`, `totalPages`, ...)로 직렬화됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    /// 현재 페이지 번호 (0부터 시작)
    pub number: i64,
    /// 요청한 페이지 크기
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: i64) -> Self {
        let total_pages = if total_elements == 0 {
            0
        } else {
            total_elements / request.size() + i64::from(total_elements % request.size() != 0)
        };

        Self {
            content,
            number: request.page(),
            size: request.size(),
            total_elements,
            total_pages,
        }
    }

    /// 내용물을 다른 타입으로 변환 (페이지 메타데이터 유지).
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}
