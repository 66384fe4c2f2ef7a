//! Query-string validation
//!
//! Bad numeric parameters are rejected here with `InvalidInput` before any
//! store access happens.

use crate::paging::{PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE};
use crate::utils::{AppError, AppResult};
use std::collections::HashMap;

/// Bounds and default for one numeric query parameter
#[derive(Debug, Clone, Copy)]
pub struct NumberOptions {
    pub default: usize,
    pub min: Option<usize>,
    pub max: Option<usize>,
}

/// Read an integer parameter, falling back to `options.default` when absent
pub fn number_from_query(
    params: &HashMap<String, String>,
    key: &str,
    options: NumberOptions,
) -> AppResult<usize> {
    let Some(raw) = params.get(key) else {
        return Ok(options.default);
    };

    let value: usize = raw.trim().parse().map_err(|_| {
        AppError::InvalidInput(format!("{} must be a non-negative integer, got '{}'", key, raw))
    })?;

    if let Some(min) = options.min {
        if value < min {
            return Err(AppError::InvalidInput(format!(
                "{} must be at least {}, got {}",
                key, min, value
            )));
        }
    }

    if let Some(max) = options.max {
        if value > max {
            return Err(AppError::InvalidInput(format!(
                "{} must be at most {}, got {}",
                key, max, value
            )));
        }
    }

    Ok(value)
}

/// Parameters of `GET /records`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRecordsParams {
    pub recorder_id: Option<String>,
    pub page: PageRequest,
}

impl ListRecordsParams {
    pub fn from_query(params: &HashMap<String, String>) -> AppResult<Self> {
        let page = number_from_query(
            params,
            "page",
            NumberOptions {
                default: MIN_PAGE,
                min: Some(MIN_PAGE),
                max: None,
            },
        )?;
        let page_size = number_from_query(
            params,
            "pageSize",
            NumberOptions {
                default: DEFAULT_PAGE_SIZE,
                min: Some(1),
                max: Some(MAX_PAGE_SIZE),
            },
        )?;

        Ok(Self {
            recorder_id: params.get("recorderId").cloned(),
            page: PageRequest::new(page, page_size),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let parsed = ListRecordsParams::from_query(&params(&[])).unwrap();
        assert_eq!(parsed.recorder_id, None);
        assert_eq!(parsed.page, PageRequest::new(1, 10));
    }

    #[test]
    fn test_explicit_values() {
        let parsed = ListRecordsParams::from_query(&params(&[
            ("recorderId", "bili-42"),
            ("page", "3"),
            ("pageSize", "9999"),
        ]))
        .unwrap();

        assert_eq!(parsed.recorder_id.as_deref(), Some("bili-42"));
        assert_eq!(parsed.page, PageRequest::new(3, 9999));
    }

    #[test]
    fn test_rejects_out_of_range() {
        for (key, value) in [("page", "0"), ("pageSize", "0"), ("pageSize", "10000")] {
            let result = ListRecordsParams::from_query(&params(&[(key, value)]));
            assert!(
                matches!(result, Err(AppError::InvalidInput(_))),
                "{}={} should be rejected",
                key,
                value
            );
        }
    }

    #[test]
    fn test_rejects_non_numeric() {
        for value in ["abc", "1.5", "-1", ""] {
            let result = ListRecordsParams::from_query(&params(&[("page", value)]));
            assert!(matches!(result, Err(AppError::InvalidInput(_))));
        }
    }
}
