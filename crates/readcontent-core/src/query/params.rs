//! QueryParams - デコード済みクエリパラメータの multimap
//!
//! HTTP 層から受け取るのは `name -> [values]` の対応だけです。
//! 同じ名前が複数回現れることがあるので（`groupName=a&groupName=b`）、
//! 値はすべて保持しておきます。

use std::collections::HashMap;

use crate::domain::{ReadError, Result};

#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    values: HashMap<String, Vec<String>>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(name, value)` の列から構築（出現順を保つ）
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (k, v) in pairs {
            params.push(k, v);
        }
        params
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.entry(name.into()).or_default().push(value.into());
    }

    /// 最初の値。空文字は「指定なし」とみなす
    pub fn first(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|vs| vs.first())
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn all(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// 整数パラメータ。指定なしなら `Ok(None)`、整数でなければ client error
    pub fn int(&self, name: &'static str) -> Result<Option<i64>> {
        self.first(name)
            .map(|raw| {
                raw.parse::<i64>()
                    .map_err(|e| ReadError::invalid(name, format!("`{raw}` is not an integer ({e})")))
            })
            .transpose()
    }

    pub fn required(&self, name: &'static str) -> Result<&str> {
        self.first(name).ok_or(ReadError::MissingParameter(name))
    }
}
