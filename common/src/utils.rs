use serde::Serialize;

/// 编码 JSON 数组列，失败时回退为 `[]`
///
/// 输出为 UTF-8，不转义斜杠和非 ASCII 字符。
pub fn encode_json_array<T: Serialize + ?Sized>(value: &T) -> String {
    encode_or(value, "[]")
}

/// 编码 JSON 对象列，失败时回退为 `{}`
pub fn encode_json_object<T: Serialize + ?Sized>(value: &T) -> String {
    encode_or(value, "{}")
}

fn encode_or<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    match serde_json::to_string(value) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("JSON 编码失败，使用 {} 代替: {}", fallback, e);
            fallback.to_string()
        }
    }
}
