pub mod metadata;

use serde::Serialize;

/// Success envelope every endpoint answers with.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub res: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(res: T) -> Self {
        Self { success: true, res }
    }
}
