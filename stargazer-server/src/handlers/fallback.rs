use crate::errors::AppError;

pub async fn method_not_supported() -> AppError {
    AppError::method_not_supported()
}

pub async fn not_found() -> AppError {
    AppError::unknown_route()
}
