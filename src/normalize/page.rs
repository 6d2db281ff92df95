use serde_json::Value;
use crate::adapter::LogicalParams;
use crate::errors::CtemError;
use crate::models::{CanonicalPage, PageInfo};
use super::fields::{boolean, number};
use super::records::normalize_records;

/// Where a variant's response keeps its attack path list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageShape {
    /// Top-level field of `data`.
    pub root: &'static str,
    /// List field under `root`; `None` when `root` is itself the list.
    pub items: Option<&'static str>,
}

impl PageShape {
    pub const fn paged(root: &'static str, items: &'static str) -> Self {
        Self { root, items: Some(items) }
    }

    pub const fn list(root: &'static str) -> Self {
        Self { root, items: None }
    }
}

pub fn normalize_page(
    data: &Value,
    shape: &PageShape,
    _params: &LogicalParams,
    variant: &str,
) -> Result<CanonicalPage, CtemError> {
    let root = required(data, shape.root)?;

    let (items, page_info) = match shape.items {
        Some(key) => (root.get(key).unwrap_or(&Value::Null), root.get("page_info")),
        None => (root, None),
    };
    let items = list_items(items, shape.root)?;
    let attack_paths = normalize_records(items);

    let pi = page_info.unwrap_or(&Value::Null);
    let page_info = PageInfo {
        page_num: number(pi, &["page_num"]).map(|n| n as u32).unwrap_or(1),
        page_size: number(pi, &["page_size"])
            .map(|n| n as u32)
            .unwrap_or(attack_paths.len() as u32),
        has_next: boolean(pi, "has_next"),
        total: number(pi, &["total"]).map(|n| n as u64),
        variant: variant.to_string(),
    };

    Ok(CanonicalPage { page_info, attack_paths })
}

/// A missing or null top-level field means the variant does not fit this tenant.
pub fn required<'a>(data: &'a Value, key: &str) -> Result<&'a Value, CtemError> {
    match data.get(key) {
        Some(v) if !v.is_null() => Ok(v),
        _ => Err(CtemError::Schema(format!("Response lacks `{}`", key))),
    }
}

/// Null lists are empty; anything other than an array is malformed.
pub fn list_items<'a>(value: &'a Value, field: &str) -> Result<&'a [Value], CtemError> {
    match value {
        Value::Null => Ok(&[]),
        Value::Array(items) => Ok(items),
        _ => Err(CtemError::Schema(format!("`{}` is not a list", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params() -> LogicalParams {
        LogicalParams::for_op("op-1").with_page(2, 50)
    }

    #[test]
    fn test_paged_shape_with_page_info() {
        let data = json!({"attack_paths_page": {
            "page_info": {"page_num": 2, "page_size": 50, "has_next": true, "total": 120},
            "attack_paths": [{"id": "a"}, {"id": "b"}]
        }});
        let page = normalize_page(&data, &PageShape::paged("attack_paths_page", "attack_paths"), &params(), "v1").unwrap();
        assert_eq!(page.page_info.page_num, 2);
        assert_eq!(page.page_info.page_size, 50);
        assert_eq!(page.page_info.has_next, Some(true));
        assert_eq!(page.page_info.total, Some(120));
        assert_eq!(page.page_info.variant, "v1");
        assert_eq!(page.attack_paths.len(), 2);
    }

    #[test]
    fn test_missing_page_info_defaults() {
        let data = json!({"attack_paths_page": {"items": [{"id": "a"}, {"id": "b"}, {"id": "c"}]}});
        let page = normalize_page(&data, &PageShape::paged("attack_paths_page", "items"), &params(), "v3").unwrap();
        assert_eq!(page.page_info.page_num, 1);
        assert_eq!(page.page_info.page_size, 3);
        assert_eq!(page.page_info.has_next, None);
        assert_eq!(page.page_info.total, None);
    }

    #[test]
    fn test_list_shape() {
        let data = json!({"attack_paths": [{"uuid": "u1"}]});
        let page = normalize_page(&data, &PageShape::list("attack_paths"), &params(), "v5").unwrap();
        assert_eq!(page.page_info.page_num, 1);
        assert_eq!(page.page_info.page_size, 1);
        assert_eq!(page.attack_paths[0].id, "u1");
    }

    #[test]
    fn test_missing_root_is_schema_error() {
        let data = json!({"something_else": {}});
        let err = normalize_page(&data, &PageShape::list("attack_paths"), &params(), "v5").unwrap_err();
        assert!(matches!(err, CtemError::Schema(_)));
    }

    #[test]
    fn test_non_list_items_is_schema_error() {
        let data = json!({"attack_paths_page": {"attack_paths": "oops"}});
        let shape = PageShape::paged("attack_paths_page", "attack_paths");
        assert!(normalize_page(&data, &shape, &params(), "v1").is_err());
    }

    #[test]
    fn test_null_items_is_empty_page() {
        let data = json!({"attack_paths_page": {"attack_paths": null}});
        let shape = PageShape::paged("attack_paths_page", "attack_paths");
        let page = normalize_page(&data, &shape, &params(), "v1").unwrap();
        assert!(page.attack_paths.is_empty());
        assert_eq!(page.page_info.page_size, 0);
    }
}
