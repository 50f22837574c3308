//! 记录适配辅助函数
//!
//! 两种存储后端共享的键翻译与取值清洗逻辑：
//! - 逻辑键 `id` 与原生主键 `_id` 之间的转换
//! - 标识符形态的取值统一为小写原生形式
//! - `search` 过滤翻译为 name 的 LIKE 匹配（`%` 任意串，`_` 单字符）
//! - 数组过滤值表示成员匹配

use crate::traits::Document;
use serde_json::Value;

/// 原生主键字段。
pub const NATIVE_ID: &str = "_id";
/// 逻辑主键字段。
pub const LOGICAL_ID: &str = "id";
/// 名称模糊匹配过滤键。
pub const SEARCH_KEY: &str = "search";

/// 生成 24 位小写十六进制记录 ID。
pub fn generate_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    hex::encode(&uuid.as_bytes()[..12])
}

/// 判断字符串是否为记录 ID 形态（24 位十六进制）。
pub fn is_record_id(value: &str) -> bool {
    value.len() == 24 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// 逻辑键翻译为原生键。
pub fn native_key(key: &str) -> &str {
    if key == LOGICAL_ID { NATIVE_ID } else { key }
}

/// 清洗单个取值：ID 形态的字符串转为小写，数组逐项处理。
pub fn scrub_value(value: &Value) -> Value {
    match value {
        Value::String(text) if is_record_id(text) => Value::String(text.to_ascii_lowercase()),
        Value::Array(items) => Value::Array(items.iter().map(scrub_value).collect()),
        other => other.clone(),
    }
}

/// 翻译过滤条件的键并清洗取值。
pub fn scrub_filter(filter: &Document) -> Document {
    filter
        .iter()
        .map(|(key, value)| {
            let value = if key == SEARCH_KEY {
                value.clone()
            } else {
                scrub_value(value)
            };
            (native_key(key).to_string(), value)
        })
        .collect()
}

fn is_reference_key(key: &str) -> bool {
    key == NATIVE_ID || key.ends_with("Id")
}

/// 逻辑记录转为存储文档。
pub fn to_native(record: Document) -> Document {
    record
        .into_iter()
        .map(|(key, value)| {
            let key = native_key(&key).to_string();
            let value = if is_reference_key(&key) {
                scrub_value(&value)
            } else {
                value
            };
            (key, value)
        })
        .collect()
}

/// 存储文档转为逻辑记录。
pub fn to_logical(document: Document) -> Document {
    document
        .into_iter()
        .map(|(key, value)| {
            if key == NATIVE_ID {
                (LOGICAL_ID.to_string(), value)
            } else {
                (key, value)
            }
        })
        .collect()
}

/// 搜索词转为 LIKE 模式，不含通配符时按子串匹配。
pub fn like_pattern(search: &str) -> String {
    if search.contains('%') || search.contains('_') {
        search.to_string()
    } else {
        format!("%{search}%")
    }
}

/// 大小写不敏感的 LIKE 匹配。
pub fn like_match(search: &str, text: &str) -> bool {
    let pattern: Vec<char> = like_pattern(search).to_lowercase().chars().collect();
    let text: Vec<char> = text.to_lowercase().chars().collect();
    // matched[j]：text 的前 j 个字符能否被当前模式前缀匹配
    let mut matched = vec![false; text.len() + 1];
    matched[0] = true;
    for token in pattern {
        let mut next = vec![false; text.len() + 1];
        match token {
            '%' => {
                let mut reachable = false;
                for j in 0..=text.len() {
                    reachable |= matched[j];
                    next[j] = reachable;
                }
            }
            '_' => {
                for j in 1..=text.len() {
                    next[j] = matched[j - 1];
                }
            }
            ch => {
                for j in 1..=text.len() {
                    next[j] = matched[j - 1] && text[j - 1] == ch;
                }
            }
        }
        matched = next;
    }
    matched[text.len()]
}

/// 判断存储文档是否满足（已清洗的）过滤条件。
pub fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, expected)| {
        if key == SEARCH_KEY {
            let search = expected.as_str().unwrap_or_default();
            return document
                .get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| like_match(search, name));
        }
        let actual = document.get(key.as_str());
        match expected {
            Value::Null => actual.is_none_or(Value::is_null),
            Value::Array(items) => {
                let actual = actual.unwrap_or(&Value::Null);
                items.iter().any(|item| item == actual)
            }
            value => actual == Some(value),
        }
    })
}

/// 合并字段，Null 表示移除该字段。
pub fn merge(target: &mut Document, patch: Document) {
    for (key, value) in patch {
        if value.is_null() {
            target.remove(&key);
        } else {
            target.insert(key, value);
        }
    }
}
