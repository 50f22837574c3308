//! Postgres 记录存储实现
//!
//! 表结构：`records(collection, id, seq, body jsonb)`，主键 (collection, id)。
//!
//! 设计要点：
//! - 过滤条件通过 QueryBuilder 参数绑定，不拼接取值
//! - 等值过滤使用 jsonb 包含（@>），由 GIN 索引支持
//! - 分页前单独统计总数，结果按插入序号排序
//! - update / upsert 先读出文档，在内存中合并后整体写回

use crate::adapter::{
    LOGICAL_ID, NATIVE_ID, SEARCH_KEY, generate_id, like_pattern, merge, native_key,
    scrub_filter, scrub_value, to_logical, to_native,
};
use crate::error::StorageError;
use crate::traits::{Document, RecordPage, RecordQuery, RecordStore};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

const SCHEMA: [&str; 2] = [
    "create table if not exists records ( \
       collection text not null, \
       id text not null, \
       seq bigserial, \
       body jsonb not null, \
       primary key (collection, id))",
    "create index if not exists records_body_idx on records using gin (body jsonb_path_ops)",
];

pub struct PgRecordStore {
    pub pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 建立连接池并确保表结构存在
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), StorageError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// 按过滤条件取第一条（原生 ID + 原生文档）
    async fn find_first(
        &self,
        table: &str,
        filter: &Document,
    ) -> Result<Option<(String, Document)>, StorageError> {
        let mut builder = QueryBuilder::<Postgres>::new("select id, body from records");
        push_filter(&mut builder, table, filter);
        builder.push(" order by seq limit 1");
        let row = builder.build().fetch_optional(&self.pool).await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let id: String = row.try_get("id")?;
        let body: Json<Value> = row.try_get("body")?;
        Ok(Some((id, into_document(body.0)?)))
    }

    async fn write_body(
        &self,
        table: &str,
        id: &str,
        document: &Document,
    ) -> Result<(), StorageError> {
        sqlx::query("update records set body = $1 where collection = $2 and id = $3")
            .bind(Json(Value::Object(document.clone())))
            .bind(table)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn into_document(value: Value) -> Result<Document, StorageError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(StorageError::new("record body is not an object")),
    }
}

fn key_filter(key: &str, value: &Value) -> Document {
    let mut filter = Document::new();
    filter.insert(native_key(key).to_string(), scrub_value(value));
    filter
}

/// 追加 where 子句（过滤条件须已清洗）
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, table: &str, filter: &Document) {
    builder
        .push(" where collection = ")
        .push_bind(table.to_string());
    for (key, value) in filter {
        if key == SEARCH_KEY {
            let search = value.as_str().unwrap_or_default();
            builder
                .push(" and body->>'name' ilike ")
                .push_bind(like_pattern(search));
            continue;
        }
        match value {
            Value::Null => {
                builder
                    .push(" and coalesce(body -> ")
                    .push_bind(key.clone())
                    .push(", 'null'::jsonb) = 'null'::jsonb");
            }
            Value::Array(_) => {
                builder
                    .push(" and ")
                    .push_bind(Json(value.clone()))
                    .push(" @> jsonb_build_array(body -> ")
                    .push_bind(key.clone())
                    .push(")");
            }
            _ => {
                let mut contained = Document::new();
                contained.insert(key.clone(), value.clone());
                builder
                    .push(" and body @> ")
                    .push_bind(Json(Value::Object(contained)));
            }
        }
    }
}

#[async_trait::async_trait]
impl RecordStore for PgRecordStore {
    async fn insert(&self, table: &str, record: Document) -> Result<Document, StorageError> {
        let mut document = to_native(record);
        let id = match document.get(NATIVE_ID).and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                let id = generate_id();
                document.insert(NATIVE_ID.to_string(), Value::String(id.clone()));
                id
            }
        };
        sqlx::query("insert into records (collection, id, body) values ($1, $2, $3)")
            .bind(table)
            .bind(&id)
            .bind(Json(Value::Object(document.clone())))
            .execute(&self.pool)
            .await?;
        tracing::debug!(target: "lpwan.storage", table, id = %id, "record inserted");
        Ok(to_logical(document))
    }

    async fn fetch_one(
        &self,
        table: &str,
        key: &str,
        value: &Value,
    ) -> Result<Option<Document>, StorageError> {
        let found = self.find_first(table, &key_filter(key, value)).await?;
        Ok(found.map(|(_, document)| to_logical(document)))
    }

    async fn fetch_many(
        &self,
        table: &str,
        query: &RecordQuery,
    ) -> Result<RecordPage, StorageError> {
        let filter = scrub_filter(&query.filter);

        let mut count = QueryBuilder::<Postgres>::new("select count(*) as total from records");
        push_filter(&mut count, table, &filter);
        let total: i64 = count.build().fetch_one(&self.pool).await?.try_get("total")?;

        let mut select = QueryBuilder::<Postgres>::new("select body from records");
        push_filter(&mut select, table, &filter);
        select.push(" order by seq");
        if let Some(limit) = query.limit.filter(|limit| *limit > 0) {
            select.push(" limit ").push_bind(limit as i64);
        }
        if let Some(offset) = query.offset.filter(|offset| *offset > 0) {
            select.push(" offset ").push_bind(offset as i64);
        }
        let rows = select.build().fetch_all(&self.pool).await?;
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let body: Json<Value> = row.try_get("body")?;
            records.push(to_logical(into_document(body.0)?));
        }
        Ok(RecordPage {
            total_count: usize::try_from(total).unwrap_or(0),
            records,
        })
    }

    async fn update(
        &self,
        table: &str,
        key: &str,
        record: Document,
    ) -> Result<Option<Document>, StorageError> {
        let Some(value) = record.get(key).cloned() else {
            return Err(StorageError::new(format!("{table}: update without {key}")));
        };
        let Some((id, mut document)) = self.find_first(table, &key_filter(key, &value)).await?
        else {
            return Ok(None);
        };
        let mut patch = to_native(record);
        patch.remove(NATIVE_ID);
        merge(&mut document, patch);
        self.write_body(table, &id, &document).await?;
        Ok(Some(to_logical(document)))
    }

    async fn upsert(
        &self,
        table: &str,
        key: &str,
        record: Document,
    ) -> Result<Document, StorageError> {
        if let Some(updated) = self.update(table, key, record.clone()).await? {
            return Ok(updated);
        }
        let mut record = record;
        if key != LOGICAL_ID {
            record.remove(LOGICAL_ID);
        }
        self.insert(table, record).await
    }

    async fn delete(&self, table: &str, key: &str, value: &Value) -> Result<bool, StorageError> {
        let Some((id, _)) = self.find_first(table, &key_filter(key, value)).await? else {
            return Ok(false);
        };
        let result = sqlx::query("delete from records where collection = $1 and id = $2")
            .bind(table)
            .bind(&id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
