use url::form_urlencoded;

use crate::models::GenreId;

pub const PAGE_PARAM: &str = "p";
pub const KEYWORD_PARAM: &str = "q";
pub const GENRE_PARAM: &str = "g";

/// URL 查询参数
///
/// 保持参数原有顺序；`set` 只改一个字段，其余参数原样保留。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParams {
    pairs: Vec<(String, String)>,
}

impl UrlParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析查询字符串，可带或不带前导 `?`
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            pairs: form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 设置参数：替换第一个同名参数并删除其余同名参数，不存在则追加
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(index) => {
                self.pairs[index].1 = value;
                let mut seen = 0;
                self.pairs.retain(|(k, _)| {
                    if k != key {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    /// 页码，缺失或无效时为 1
    pub fn page(&self) -> u32 {
        self.get(PAGE_PARAM)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1)
    }

    /// 关键词，空白视为没有关键词
    pub fn keyword(&self) -> Option<String> {
        self.get(KEYWORD_PARAM)
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
            .map(str::to_string)
    }

    /// 类型ID，非数字视为没有类型筛选
    pub fn genre(&self) -> Option<GenreId> {
        self.get(GENRE_PARAM).and_then(|raw| raw.trim().parse().ok())
    }
}

impl std::fmt::Display for UrlParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UrlParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
