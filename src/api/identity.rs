use actix_web::HttpRequest;

/// 标识请求者身份的请求头 / Header naming the requesting participant
pub const USER_HEADER: &str = "user";

/// 读取 `user` 请求头（去除首尾空白，空值视为缺失）
/// Read the `user` header, trimmed; blank counts as missing
pub fn request_user(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
