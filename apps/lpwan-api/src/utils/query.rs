//! 查询参数到存储层 ListOptions 的转换

use api_contract::ListQuery;
use lpwan_storage::ListOptions;
use serde_json::Value;

/// 分页与名称搜索
pub fn list_options(query: &ListQuery) -> ListOptions {
    let mut options = ListOptions::new();
    if let Some(limit) = query.limit {
        options = options.limit(limit);
    }
    if let Some(offset) = query.offset {
        options = options.offset(offset);
    }
    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        options = options.search(search);
    }
    options
}

/// 值存在时追加过滤条件
pub fn with_filter(options: ListOptions, key: &str, value: Option<&str>) -> ListOptions {
    match value {
        Some(value) => options.filter(key, value),
        None => options,
    }
}

/// 成员匹配过滤（字段取值属于 ids 之一）
pub fn with_members(options: ListOptions, key: &str, ids: Vec<String>) -> ListOptions {
    options.filter(key, Value::from(ids))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_becomes_options() {
        let query = ListQuery {
            limit: Some(5),
            search: Some(String::new()),
            ..ListQuery::default()
        };
        let options = with_filter(list_options(&query), "companyId", Some("c1"));
        assert_eq!(options.limit, Some(5));
        assert_eq!(options.offset, None);
        assert_eq!(options.search, None);
        assert_eq!(options.filters.get("companyId"), Some(&Value::from("c1")));

        let options = with_members(options, "applicationId", vec!["a1".into(), "a2".into()]);
        assert_eq!(
            options.filters.get("applicationId"),
            Some(&serde_json::json!(["a1", "a2"]))
        );
    }
}
